//! Capability trait implemented once per automaton kind
//!
//! Every kind of [`Structure`](super::Structure) is drawn by a type
//! implementing [`Diagram`]. Callers dispatch on the structure variant and
//! then drive layout, arrow resolution, rendering and export through this
//! trait, so adding a kind never touches the editing or viewport code.

use anyhow::Result;

use super::{Database, LayoutResult, RenderOptions, Scene, TransitionArrow};

/// Layout, routing and rendering for one diagram kind
pub trait Diagram {
    /// The model this diagram draws
    type Model: Database;

    /// Get the name of this diagram kind
    fn name(&self) -> &'static str;

    /// Get the version of this implementation
    fn version(&self) -> &'static str;

    /// Position every node of the model
    fn layout(&self, model: &Self::Model) -> Result<LayoutResult>;

    /// Merge edges into drawn arrows with their geometry
    fn resolve_arrows(&self, model: &Self::Model, layout: &LayoutResult) -> Vec<TransitionArrow>;

    /// Build the primitive scene for the live view
    fn render(&self, model: &Self::Model, options: &RenderOptions) -> Result<Scene>;

    /// Standalone SVG of the model with default styling
    fn export(&self, model: &Self::Model) -> Result<String>;
}
