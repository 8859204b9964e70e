//! Core layout trait and its output
//!
//! A layout assigns every node a position in diagram space. Positions are
//! derived data: they are recomputed from the model on every pass and never
//! stored in it.

use std::collections::HashMap;

use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use super::{Database, Point, StateId};

/// Core trait for layout algorithms
pub trait LayoutAlgorithm<D: Database> {
    /// The output type of this layout algorithm
    type Output;

    /// Arrange the nodes of `database`
    fn layout(&self, database: &D) -> Result<Self::Output>;

    /// Get the name of this layout algorithm
    fn name(&self) -> &'static str;

    /// Get the version of this layout algorithm
    fn version(&self) -> &'static str;
}

/// A state together with its computed position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionedState {
    pub id: StateId,
    pub position: Point,
}

/// Positions of every state, in state order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutResult {
    /// Radius of the circle the states sit on
    pub radius: f64,
    pub states: Vec<PositionedState>,
    #[serde(skip)]
    index: HashMap<StateId, usize>,
}

impl LayoutResult {
    pub fn new(radius: f64, states: Vec<PositionedState>) -> Self {
        let index = states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id, i))
            .collect();
        Self {
            radius,
            states,
            index,
        }
    }

    pub fn get(&self, id: StateId) -> Option<Point> {
        self.index.get(&id).map(|&i| self.states[i].position)
    }

    /// Position of `id`; an id missing from the layout maps to the origin.
    pub fn position(&self, id: StateId) -> Point {
        match self.get(id) {
            Some(p) => p,
            None => {
                warn!(state_id = id, "State missing from layout, using origin");
                Point::ORIGIN
            }
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
