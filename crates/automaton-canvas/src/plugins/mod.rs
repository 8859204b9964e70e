//! Diagram kind plugins
//!
//! Each plugin implements the core traits for one kind of structure; the
//! orchestrator dispatches a [`Structure`](crate::core::Structure) to the
//! right one.

pub mod nfa;
pub mod orchestrator;

pub use nfa::*;
pub use orchestrator::*;
