//! Core model and drawing abstractions
//!
//! The automaton graph model, its structure wrapper, plane geometry, and
//! the traits the per-kind plugins implement (layout, rendering, diagram).

mod canvas;
mod config;
mod database;
mod diagram;
mod edge_routing;
mod error;
mod geometry;
mod graph;
mod layout;
pub mod logging;
mod renderer;
mod structure;
mod text;
mod types;

pub use canvas::*;
pub use config::*;
pub use database::*;
pub use diagram::*;
pub use edge_routing::*;
pub use error::*;
pub use geometry::*;
pub use graph::*;
pub use layout::*;
pub use logging::*;
pub use renderer::*;
pub use structure::*;
pub use text::*;
pub use types::*;
