//! Interactive editing of an automaton
//!
//! [`Editor`] turns taps on states and arrows, menu choices and text input
//! into edits of a [`Graph`]. It only remembers ids and flags: every call
//! takes the current graph, and a successful edit hands back a brand-new
//! graph built through [`Graph::clone_graph`]. The caller owns the graph and
//! swaps it in.
//!
//! A typical "add transitions" exchange:
//!
//! 1. [`Editor::tap_state`] on the source returns the state menu.
//! 2. [`Editor::choose_state_action`] with [`StateAction::AddTransitions`]
//!    waits for a target.
//! 3. [`Editor::tap_state`] on the target asks for tokens.
//! 4. [`Editor::submit_text`] with `"0,1"` returns the new graph.
//!
//! Any call that does not fit the current mode is an error and drops the
//! editor back to [`EditMode::Idle`] with the graph untouched.

mod tokens;

pub use tokens::{parse_tokens, token_list};

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::core::{
    DiagramError, Graph, GraphDraft, RenderOptions, State, StateId, Token, Transition,
    TransitionId,
};

/// Errors raised by edit operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Cannot {action} while {mode}")]
    InvalidInMode { action: &'static str, mode: String },

    #[error("Unknown state {id}")]
    UnknownState { id: StateId },

    #[error("Unknown transition {id}")]
    UnknownTransition { id: TransitionId },

    #[error("No transitions selected")]
    EmptySelection,

    #[error("Graph update failed: {message}")]
    Graph { message: String },
}

impl From<DiagramError> for EditError {
    fn from(err: DiagramError) -> Self {
        match err {
            DiagramError::UnknownState { id } => EditError::UnknownState { id },
            DiagramError::UnknownTransition { id } => EditError::UnknownTransition { id },
            other => EditError::Graph {
                message: other.to_string(),
            },
        }
    }
}

/// Where the editor is in a multi-step edit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Idle,
    StateSelected(StateId),
    TransitionSelected(BTreeSet<TransitionId>),
    /// Waiting for the target of new transitions from this state
    AwaitingNewTransitionTarget(StateId),
    /// Waiting for the new end state of these transitions
    AwaitingRetargetEnd(BTreeSet<TransitionId>),
    /// Waiting for the new start state of these transitions
    AwaitingRetargetStart(BTreeSet<TransitionId>),
}

impl EditMode {
    /// Whether the next state tap completes an action
    pub fn awaits_state_tap(&self) -> bool {
        matches!(
            self,
            EditMode::AwaitingNewTransitionTarget(_)
                | EditMode::AwaitingRetargetEnd(_)
                | EditMode::AwaitingRetargetStart(_)
        )
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditMode::Idle => write!(f, "idle"),
            EditMode::StateSelected(id) => write!(f, "state {} is selected", id),
            EditMode::TransitionSelected(ids) => write!(f, "transitions {:?} are selected", ids),
            EditMode::AwaitingNewTransitionTarget(id) => {
                write!(f, "waiting for the target of transitions from state {}", id)
            }
            EditMode::AwaitingRetargetEnd(_) => write!(f, "waiting for a new end state"),
            EditMode::AwaitingRetargetStart(_) => write!(f, "waiting for a new start state"),
        }
    }
}

/// Modal input the editor is waiting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    Rename(StateId),
    DeleteState(StateId),
    NewTransitions { from: StateId, to: StateId },
    ChangeTokens(BTreeSet<TransitionId>),
    DeleteTransitions(BTreeSet<TransitionId>),
}

/// Entries of the state menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateAction {
    Cancel,
    Rename,
    AddTransitions,
    ToggleStart,
    ToggleFinal,
    Delete,
}

/// Entries of the arrow menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowAction {
    Cancel,
    ChangeStart,
    ChangeEnd,
    ChangeTokens,
    ToggleEpsilon,
    Delete,
}

/// Kinds of state the palette can add
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteState {
    Rejecting,
    Accepting,
    Start,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption<A> {
    pub action: A,
    pub label: String,
    pub destructive: bool,
}

impl<A> MenuOption<A> {
    fn new(action: A, label: impl Into<String>) -> Self {
        Self {
            action,
            label: label.into(),
            destructive: false,
        }
    }

    fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }
}

/// What the host should show next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    StateMenu {
        state: StateId,
        options: Vec<MenuOption<StateAction>>,
    },
    ArrowMenu {
        transitions: BTreeSet<TransitionId>,
        options: Vec<MenuOption<ArrowAction>>,
    },
    /// Ask the user to tap a state
    PickState { message: String },
    /// Ask for text; `allow_epsilon` adds a button for a single ε transition
    TextInput {
        message: String,
        placeholder: String,
        allow_epsilon: bool,
    },
    Confirm {
        message: String,
        confirm_label: String,
    },
}

/// Informational messages raised by an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    AlreadyExists,
    InvalidTokenFormat { detail: String },
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::AlreadyExists => "Transition(s) already exist",
            Notice::InvalidTokenFormat { .. } => {
                "The inputted text was not in the correct format. Tokens should be single characters separated by commas."
            }
        }
    }
}

/// Result of one editor call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditOutcome {
    /// The new graph, when the call committed an edit
    pub graph: Option<Graph>,
    pub prompt: Option<Prompt>,
    pub notices: Vec<Notice>,
}

impl EditOutcome {
    pub fn none() -> Self {
        Self::default()
    }

    fn prompt(prompt: Prompt) -> Self {
        Self {
            prompt: Some(prompt),
            ..Self::default()
        }
    }

    fn committed(graph: Graph) -> Self {
        Self {
            graph: Some(graph),
            ..Self::default()
        }
    }

    fn notice(notice: Notice) -> Self {
        Self {
            notices: vec![notice],
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_none() && self.prompt.is_none() && self.notices.is_empty()
    }
}

type EditResult = Result<EditOutcome, EditError>;

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Start,
    End,
}

/// The edit interaction state machine
#[derive(Debug, Clone, Default)]
pub struct Editor {
    mode: EditMode,
    pending: Option<Pending>,
    editable: bool,
}

impl Editor {
    /// A read-only editor; taps are ignored until [`Editor::set_editable`]
    pub fn new() -> Self {
        Self::default()
    }

    /// An editor that accepts taps
    pub fn editing() -> Self {
        Self {
            editable: true,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn pending(&self) -> Option<&Pending> {
        self.pending.as_ref()
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Turn editing on or off. Either way all selection and pending input
    /// is dropped.
    pub fn set_editable(&mut self, editable: bool) {
        debug!(editable, "Editor editability changed");
        self.editable = editable;
        self.reset();
    }

    /// Abandon whatever is in progress
    pub fn cancel(&mut self) {
        trace!(mode = %self.mode, "Edit cancelled");
        self.reset();
    }

    /// Highlighting for the current selection
    pub fn render_options(&self) -> RenderOptions {
        let mut options = RenderOptions {
            editable: self.editable,
            ..RenderOptions::default()
        };
        match &self.mode {
            EditMode::StateSelected(id) | EditMode::AwaitingNewTransitionTarget(id) => {
                options.selected_state = Some(*id);
            }
            EditMode::TransitionSelected(ids)
            | EditMode::AwaitingRetargetEnd(ids)
            | EditMode::AwaitingRetargetStart(ids) => {
                options.selected_arrow = ids.clone();
            }
            EditMode::Idle => {}
        }
        options
    }

    fn reset(&mut self) {
        self.mode = EditMode::Idle;
        self.pending = None;
    }

    fn fail(&mut self, err: EditError) -> EditResult {
        warn!(error = %err, mode = %self.mode, "Edit rejected");
        self.reset();
        Err(err)
    }

    fn invalid(&mut self, action: &'static str) -> EditResult {
        let mode = match &self.pending {
            Some(_) => format!("{} and input is pending", self.mode),
            None => self.mode.to_string(),
        };
        self.fail(EditError::InvalidInMode { action, mode })
    }

    /// Return to idle after a finished step, passing its result through
    fn finish(&mut self, action: &'static str, result: EditResult) -> EditResult {
        match result {
            Ok(outcome) => {
                if let Some(graph) = &outcome.graph {
                    info!(
                        action,
                        states = graph.states().len(),
                        transitions = graph.transitions().len(),
                        "Committed edit"
                    );
                }
                self.reset();
                Ok(outcome)
            }
            Err(err) => self.fail(err),
        }
    }

    /// A tap on a state
    pub fn tap_state(&mut self, graph: &Graph, id: StateId) -> EditResult {
        if !self.editable {
            trace!(state_id = id, "Ignoring state tap, not editable");
            return Ok(EditOutcome::none());
        }
        if self.pending.is_some() {
            return self.invalid("select a state");
        }
        let Some(state) = graph.state(id) else {
            return self.fail(EditError::UnknownState { id });
        };

        match self.mode.clone() {
            EditMode::Idle | EditMode::StateSelected(_) | EditMode::TransitionSelected(_) => {
                self.mode = EditMode::StateSelected(id);
                Ok(EditOutcome::prompt(state_menu(state)))
            }
            EditMode::AwaitingNewTransitionTarget(from) => {
                self.pending = Some(Pending::NewTransitions { from, to: id });
                Ok(EditOutcome::prompt(Prompt::TextInput {
                    message: format!(
                        "Enter the token(s) for the new transition to '{}':",
                        state.name
                    ),
                    placeholder: String::new(),
                    allow_epsilon: true,
                }))
            }
            EditMode::AwaitingRetargetStart(ids) => {
                let result = retarget(graph, &ids, id, Endpoint::Start);
                self.finish("change start", result)
            }
            EditMode::AwaitingRetargetEnd(ids) => {
                let result = retarget(graph, &ids, id, Endpoint::End);
                self.finish("change end", result)
            }
        }
    }

    /// A tap on an arrow or its label; `ids` are the arrow's member transitions
    pub fn tap_arrow(&mut self, graph: &Graph, ids: &BTreeSet<TransitionId>) -> EditResult {
        if !self.editable {
            trace!("Ignoring arrow tap, not editable");
            return Ok(EditOutcome::none());
        }
        if self.mode.awaits_state_tap() {
            trace!(mode = %self.mode, "Ignoring arrow tap while waiting for a state");
            return Ok(EditOutcome::none());
        }
        if self.pending.is_some() {
            return self.invalid("select an arrow");
        }
        let members = match members(graph, ids) {
            Ok(members) => members,
            Err(err) => return self.fail(err),
        };

        self.mode = EditMode::TransitionSelected(ids.clone());
        Ok(EditOutcome::prompt(arrow_menu(ids, &members)))
    }

    /// A choice from the state menu
    pub fn choose_state_action(&mut self, graph: &Graph, action: StateAction) -> EditResult {
        let EditMode::StateSelected(id) = self.mode else {
            return self.invalid("use the state menu");
        };
        if self.pending.is_some() {
            return self.invalid("use the state menu");
        }
        let Some(state) = graph.state(id) else {
            return self.fail(EditError::UnknownState { id });
        };

        match action {
            StateAction::Cancel => {
                self.reset();
                Ok(EditOutcome::none())
            }
            StateAction::Rename => {
                self.pending = Some(Pending::Rename(id));
                Ok(EditOutcome::prompt(Prompt::TextInput {
                    message: "Enter the new name for the state:".to_string(),
                    placeholder: state.name.clone(),
                    allow_epsilon: false,
                }))
            }
            StateAction::AddTransitions => {
                self.mode = EditMode::AwaitingNewTransitionTarget(id);
                Ok(EditOutcome::prompt(Prompt::PickState {
                    message: format!(
                        "Tap the state the new transition(s) from '{}' should go to",
                        state.name
                    ),
                }))
            }
            StateAction::ToggleStart => {
                let is_start = !state.is_start;
                let result = edit(graph, |draft| draft.set_start(id, is_start));
                self.finish("toggle start", result)
            }
            StateAction::ToggleFinal => {
                let is_final = !state.is_final;
                let result = edit(graph, |draft| draft.set_final(id, is_final));
                self.finish("toggle final", result)
            }
            StateAction::Delete => {
                self.pending = Some(Pending::DeleteState(id));
                Ok(EditOutcome::prompt(Prompt::Confirm {
                    message: format!(
                        "Are you sure you want to delete state '{}'? This will also delete any connected transitions.",
                        state.name
                    ),
                    confirm_label: "Delete State".to_string(),
                }))
            }
        }
    }

    /// A choice from the arrow menu
    pub fn choose_arrow_action(&mut self, graph: &Graph, action: ArrowAction) -> EditResult {
        let EditMode::TransitionSelected(ids) = self.mode.clone() else {
            return self.invalid("use the arrow menu");
        };
        if self.pending.is_some() {
            return self.invalid("use the arrow menu");
        }
        let members = match members(graph, &ids) {
            Ok(members) => members,
            Err(err) => return self.fail(err),
        };

        match action {
            ArrowAction::Cancel => {
                self.reset();
                Ok(EditOutcome::none())
            }
            ArrowAction::ChangeStart => {
                self.mode = EditMode::AwaitingRetargetStart(ids);
                Ok(EditOutcome::prompt(Prompt::PickState {
                    message: "Tap the new start state".to_string(),
                }))
            }
            ArrowAction::ChangeEnd => {
                self.mode = EditMode::AwaitingRetargetEnd(ids);
                Ok(EditOutcome::prompt(Prompt::PickState {
                    message: "Tap the new end state".to_string(),
                }))
            }
            ArrowAction::ChangeTokens => {
                let placeholder = members
                    .iter()
                    .map(|t| t.token.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                self.pending = Some(Pending::ChangeTokens(ids));
                Ok(EditOutcome::prompt(Prompt::TextInput {
                    message: "Enter the new tokens:".to_string(),
                    placeholder,
                    allow_epsilon: false,
                }))
            }
            ArrowAction::ToggleEpsilon => {
                let result = toggle_epsilon(graph, &members);
                self.finish("toggle epsilon", result)
            }
            ArrowAction::Delete => {
                self.pending = Some(Pending::DeleteTransitions(ids));
                Ok(EditOutcome::prompt(Prompt::Confirm {
                    message: "Are you sure you want to delete these transition(s)?".to_string(),
                    confirm_label: "Delete Transition(s)".to_string(),
                }))
            }
        }
    }

    /// Text typed into the pending input
    pub fn submit_text(&mut self, graph: &Graph, text: &str) -> EditResult {
        let Some(pending) = self.pending.clone() else {
            return self.invalid("submit text");
        };

        match pending {
            Pending::Rename(id) => {
                if text.is_empty() {
                    self.reset();
                    return Ok(EditOutcome::none());
                }
                let result = edit(graph, |draft| draft.rename_state(id, text));
                self.finish("rename", result)
            }
            Pending::NewTransitions { from, to } => {
                if text.is_empty() {
                    self.reset();
                    return Ok(EditOutcome::none());
                }
                let result = match parse_tokens(text) {
                    Ok(tokens) => add_transitions(graph, from, to, &tokens),
                    Err(detail) => Ok(format_error(detail)),
                };
                self.finish("add transitions", result)
            }
            Pending::ChangeTokens(ids) => {
                let result = match parse_tokens(text) {
                    Ok(tokens) => change_tokens(graph, &ids, &tokens),
                    Err(detail) => Ok(format_error(detail)),
                };
                self.finish("change tokens", result)
            }
            Pending::DeleteState(_) | Pending::DeleteTransitions(_) => self.invalid("submit text"),
        }
    }

    /// The ε button of the new-transition input
    pub fn add_epsilon(&mut self, graph: &Graph) -> EditResult {
        let Some(Pending::NewTransitions { from, to }) = self.pending.clone() else {
            return self.invalid("add an ε transition");
        };
        let result = add_transitions(graph, from, to, &[Token::EPSILON]);
        self.finish("add epsilon", result)
    }

    /// Accept the pending delete confirmation
    pub fn confirm(&mut self, graph: &Graph) -> EditResult {
        match self.pending.clone() {
            Some(Pending::DeleteState(id)) => {
                let result = edit(graph, |draft| draft.remove_state(id).map(|_| ()));
                self.finish("delete state", result)
            }
            Some(Pending::DeleteTransitions(ids)) => {
                let result = edit(graph, |draft| draft.remove_transitions(&ids).map(|_| ()));
                self.finish("delete transitions", result)
            }
            _ => self.invalid("confirm"),
        }
    }

    /// Add a state from the palette, named `q<id>` after its new id
    pub fn add_state(&mut self, graph: &Graph, kind: PaletteState) -> EditResult {
        if !self.editable {
            return Ok(EditOutcome::none());
        }
        let (is_start, is_final) = match kind {
            PaletteState::Rejecting => (false, false),
            PaletteState::Accepting => (false, true),
            PaletteState::Start => (true, false),
        };
        let mut draft = graph.clone_graph();
        let id = draft.add_state_with(is_start, is_final, |id| format!("q{}", id));
        let graph = draft.commit();
        info!(state_id = id, ?kind, "Added state from palette");
        Ok(EditOutcome::committed(graph))
    }
}

fn state_menu(state: &State) -> Prompt {
    let options = vec![
        MenuOption::new(StateAction::Cancel, "Cancel"),
        MenuOption::new(StateAction::Rename, "Rename"),
        MenuOption::new(
            StateAction::AddTransitions,
            format!("Add Transition(s) From '{}'", state.name),
        ),
        MenuOption::new(
            StateAction::ToggleStart,
            if state.is_start { "Remove Start" } else { "Make Start" },
        ),
        MenuOption::new(
            StateAction::ToggleFinal,
            if state.is_final { "Remove Final" } else { "Make Final" },
        ),
        MenuOption::new(StateAction::Delete, "Delete State").destructive(),
    ];
    Prompt::StateMenu {
        state: state.id,
        options,
    }
}

fn arrow_menu(ids: &BTreeSet<TransitionId>, members: &[Transition]) -> Prompt {
    let has_epsilon = members.iter().any(|t| t.token.is_epsilon());
    let options = vec![
        MenuOption::new(ArrowAction::Cancel, "Cancel"),
        MenuOption::new(ArrowAction::ChangeStart, "Change Start"),
        MenuOption::new(ArrowAction::ChangeEnd, "Change End"),
        MenuOption::new(ArrowAction::ChangeTokens, "Change Tokens"),
        MenuOption::new(
            ArrowAction::ToggleEpsilon,
            if has_epsilon {
                "Remove ε transition"
            } else {
                "Add ε Transition"
            },
        ),
        MenuOption::new(ArrowAction::Delete, "Delete Transition(s)").destructive(),
    ];
    Prompt::ArrowMenu {
        transitions: ids.clone(),
        options,
    }
}

/// The transitions behind an arrow, in id order
fn members(graph: &Graph, ids: &BTreeSet<TransitionId>) -> Result<Vec<Transition>, EditError> {
    if ids.is_empty() {
        return Err(EditError::EmptySelection);
    }
    ids.iter()
        .map(|&id| {
            graph
                .transition(id)
                .copied()
                .ok_or(EditError::UnknownTransition { id })
        })
        .collect()
}

fn format_error(detail: String) -> EditOutcome {
    debug!(%detail, "Rejected token input");
    EditOutcome::notice(Notice::InvalidTokenFormat { detail })
}

/// Clone, apply `f`, commit
fn edit(
    graph: &Graph,
    f: impl FnOnce(&mut GraphDraft) -> Result<(), DiagramError>,
) -> EditResult {
    let mut draft = graph.clone_graph();
    f(&mut draft)?;
    Ok(EditOutcome::committed(draft.commit()))
}

fn add_transitions(graph: &Graph, from: StateId, to: StateId, tokens: &[Token]) -> EditResult {
    let mut draft = graph.clone_graph();
    let mut added = 0;
    let mut duplicate = false;
    for &token in tokens {
        if draft.graph().find_transition(from, to, token).is_some() {
            duplicate = true;
            continue;
        }
        draft.add_transition(from, to, token)?;
        added += 1;
    }

    let mut outcome = EditOutcome::none();
    if duplicate {
        outcome.notices.push(Notice::AlreadyExists);
    }
    if added > 0 {
        outcome.graph = Some(draft.commit());
    }
    Ok(outcome)
}

fn retarget(
    graph: &Graph,
    ids: &BTreeSet<TransitionId>,
    state: StateId,
    endpoint: Endpoint,
) -> EditResult {
    let mut draft = graph.clone_graph();
    for &id in ids {
        let transition = *draft
            .graph()
            .transition(id)
            .ok_or(EditError::UnknownTransition { id })?;
        let (from, to) = match endpoint {
            Endpoint::Start => (state, transition.to),
            Endpoint::End => (transition.from, state),
        };
        let duplicate = draft
            .graph()
            .transitions()
            .iter()
            .any(|t| t.id != id && t.from == from && t.to == to && t.token == transition.token);
        if duplicate {
            info!(transition_id = id, from, to, "Retarget duplicates an existing transition, deleting it");
            draft.remove_transitions(&BTreeSet::from([id]))?;
            continue;
        }
        match endpoint {
            Endpoint::Start => draft.set_transition_from(id, state)?,
            Endpoint::End => draft.set_transition_to(id, state)?,
        }
    }
    Ok(EditOutcome::committed(draft.commit()))
}

fn change_tokens(graph: &Graph, ids: &BTreeSet<TransitionId>, tokens: &[Token]) -> EditResult {
    let old = members(graph, ids)?;
    let (from, to) = (old[0].from, old[0].to);
    let mut draft = graph.clone_graph();

    let mut seen = BTreeSet::new();
    let mut planned = Vec::new();
    for &token in tokens {
        if !seen.insert(token) {
            continue;
        }
        // old members are still in the draft, so fresh ids cannot collide with them
        let id = match old.iter().find(|t| t.token == token) {
            Some(existing) => existing.id,
            None => draft.allocate_transition_id(),
        };
        planned.push(Transition::new(id, from, to, token));
    }

    draft.remove_transitions(ids)?;
    for transition in planned {
        draft.insert_transition(transition)?;
    }
    Ok(EditOutcome::committed(draft.commit()))
}

fn toggle_epsilon(graph: &Graph, members: &[Transition]) -> EditResult {
    let mut draft = graph.clone_graph();
    match members.iter().find(|t| t.token.is_epsilon()) {
        Some(epsilon) => {
            draft.remove_transitions(&BTreeSet::from([epsilon.id]))?;
        }
        None => {
            let first = members.first().ok_or(EditError::EmptySelection)?;
            draft.add_transition(first.from, first.to, Token::EPSILON)?;
        }
    }
    Ok(EditOutcome::committed(draft.commit()))
}
