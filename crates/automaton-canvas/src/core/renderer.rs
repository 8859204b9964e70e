//! Core renderer trait and the options shared by renderers

use std::collections::BTreeSet;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{Database, StateId, Stroke, TransitionId};

/// Core trait for diagram renderers
///
/// A renderer is configured up front (options, metrics) and then turns a
/// model into its output format.
pub trait Renderer<D: Database> {
    /// The output type of this renderer
    type Output;

    /// Render the diagram model into the output format
    fn render(&self, database: &D) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the version of this renderer
    fn version(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}

/// What the live view highlights and whether it accepts taps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Attach hit targets to states, names, arrows and labels
    pub editable: bool,
    pub selected_state: Option<StateId>,
    /// Member ids of the selected arrow
    pub selected_arrow: BTreeSet<TransitionId>,
    /// States the engine reports as active for the current input prefix
    pub active_states: BTreeSet<StateId>,
}

impl RenderOptions {
    pub fn editable() -> Self {
        Self {
            editable: true,
            ..Self::default()
        }
    }

    /// Stroke for a state: selection wins over the active highlight
    pub fn state_stroke(&self, id: StateId) -> Stroke {
        if self.selected_state == Some(id) {
            Stroke::Blue
        } else if self.active_states.contains(&id) {
            Stroke::Red
        } else {
            Stroke::Black
        }
    }

    /// Stroke for an arrow, given its member transition ids
    pub fn arrow_stroke(&self, members: &BTreeSet<TransitionId>) -> Stroke {
        if !self.selected_arrow.is_empty() && &self.selected_arrow == members {
            Stroke::Blue
        } else {
            Stroke::Black
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_stroke_priority() {
        let options = RenderOptions {
            selected_state: Some(1),
            active_states: BTreeSet::from([1, 2]),
            ..RenderOptions::default()
        };
        assert_eq!(options.state_stroke(1), Stroke::Blue);
        assert_eq!(options.state_stroke(2), Stroke::Red);
        assert_eq!(options.state_stroke(3), Stroke::Black);
    }

    #[test]
    fn test_arrow_stroke() {
        let options = RenderOptions {
            selected_arrow: BTreeSet::from([0, 1]),
            ..RenderOptions::editable()
        };
        assert!(options.editable);
        assert_eq!(options.arrow_stroke(&BTreeSet::from([0, 1])), Stroke::Blue);
        assert_eq!(options.arrow_stroke(&BTreeSet::from([0])), Stroke::Black);
        assert_eq!(
            RenderOptions::default().arrow_stroke(&BTreeSet::new()),
            Stroke::Black
        );
    }
}
