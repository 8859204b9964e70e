//! The main view and edit session around a structure
//!
//! [`Workspace`] holds the structure on screen, the last saved one and the
//! state of string runs, and routes engine calls through a one-at-a-time
//! guard. [`EditSession`] wraps an [`Editor`] over a working copy that only
//! reaches the workspace on a successful save.
//!
//! Engine calls can be driven two ways. The blocking helpers
//! ([`Workspace::simplify`], [`Workspace::run`], ...) call an
//! [`AutomatonEngine`] directly. Hosts with an asynchronous engine take a
//! ticket with [`Workspace::begin_call`] and hand the reply to
//! [`Workspace::apply_structure`], [`Workspace::apply_run`] or
//! [`Workspace::apply_prefix`].

use std::collections::BTreeSet;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, error, info, span, warn, Level};

use crate::core::{Graph, RenderOptions, StateId, Structure};
use crate::editor::{EditError, EditOutcome, Editor, Notice, Prompt};
use crate::engine::{
    parse_photo_output, parse_structure_output, AutomatonEngine, CallTicket, EngineCall,
    EngineError, InFlight, ValidationCode,
};
use crate::gallery::{Gallery, GalleryError, KeyValueStore};
use crate::viewport::ViewportController;

/// Shown when closing an edit session with unsaved changes
pub const UNSAVED_WARNING: &str = "Closing without saving will remove any progress";

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Engine call '{running}' is still in progress")]
    Busy { running: EngineCall },

    #[error("'{call}' is not available for this structure")]
    Unavailable { call: EngineCall },

    #[error("Result of '{call}' arrived after it was cancelled")]
    Stale { call: EngineCall },

    #[error("Cannot save structure: {0}")]
    Invalid(ValidationCode),

    #[error("No structure has been saved")]
    NothingSaved,

    #[error("Prefix '{prefix}' does not continue the current run")]
    PrefixMismatch { prefix: String },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Gallery(#[from] GalleryError),
}

/// Progress of running a string through the structure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    /// Text to run
    pub input: String,
    /// Prefix already stepped through
    pub consumed: String,
    /// Outcome of the last full run
    pub result: Option<bool>,
    /// States active after `consumed`
    pub active: BTreeSet<StateId>,
}

impl RunState {
    /// Clear results but keep the input text
    fn reset(&mut self) {
        self.consumed.clear();
        self.result = None;
        self.active.clear();
    }

    /// The next prefix to step to, if any characters remain
    fn next_prefix(&self) -> Option<String> {
        let next = self
            .input
            .strip_prefix(self.consumed.as_str())?
            .chars()
            .next()?;
        let mut prefix = self.consumed.clone();
        prefix.push(next);
        Some(prefix)
    }
}

/// The structure on screen and its engine interactions
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    structure: Structure,
    saved: Option<Structure>,
    run: RunState,
    in_flight: InFlight,
}

impl Workspace {
    pub fn new(structure: Structure) -> Self {
        Self {
            structure,
            ..Self::default()
        }
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn saved(&self) -> Option<&Structure> {
        self.saved.as_ref()
    }

    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// "DFA" or "NFA", for display
    pub fn type_label(&self) -> &'static str {
        match &self.structure {
            Structure::Nfa(graph) if graph.is_dfa() => "DFA",
            Structure::Nfa(_) => "NFA",
        }
    }

    /// Whether minimisation is offered
    pub fn can_simplify(&self) -> bool {
        self.structure.graph().is_dfa()
    }

    /// Whether NFA to DFA conversion is offered
    pub fn can_convert(&self) -> bool {
        !self.structure.graph().is_dfa()
    }

    /// Highlighting for the run in progress
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            active_states: self.run.active.clone(),
            ..RenderOptions::default()
        }
    }

    fn ensure_idle(&self) -> Result<(), WorkspaceError> {
        match self.in_flight.current() {
            Some(running) => Err(WorkspaceError::Busy {
                running: running.call(),
            }),
            None => Ok(()),
        }
    }

    fn replace_structure(&mut self, structure: Structure) {
        info!(
            kind = %structure.kind(),
            states = structure.graph().states().len(),
            transitions = structure.graph().transitions().len(),
            "Replaced structure"
        );
        self.structure = structure;
        self.run.reset();
    }

    /// Set the text to run, clearing earlier results
    pub fn set_run_input(&mut self, input: impl Into<String>) -> Result<(), WorkspaceError> {
        self.ensure_idle()?;
        self.run.input = input.into();
        self.run.reset();
        Ok(())
    }

    /// Start an engine call; fails while another one is outstanding
    pub fn begin_call(&mut self, call: EngineCall) -> Result<CallTicket, WorkspaceError> {
        let available = match call {
            EngineCall::Simplify => self.can_simplify(),
            EngineCall::ConvertToDfa => self.can_convert(),
            _ => true,
        };
        if !available {
            return Err(WorkspaceError::Unavailable { call });
        }
        self.in_flight
            .begin(call)
            .map_err(|running| WorkspaceError::Busy {
                running: running.call(),
            })
    }

    /// Give up on the outstanding call; its result will be dropped
    pub fn abandon_call(&mut self) -> Option<CallTicket> {
        let abandoned = self.in_flight.abandon();
        if let Some(ticket) = abandoned {
            warn!(call = %ticket.call(), "Abandoned engine call");
        }
        abandoned
    }

    fn finish_call<T>(
        &mut self,
        ticket: CallTicket,
        reply: Result<T, EngineError>,
    ) -> Result<T, WorkspaceError> {
        if !self.in_flight.finish(ticket) {
            return Err(WorkspaceError::Stale {
                call: ticket.call(),
            });
        }
        reply.map_err(|err| {
            if !err.is_user_facing() {
                error!(call = %ticket.call(), error = %err, "Engine call failed");
            }
            WorkspaceError::Engine(err)
        })
    }

    /// Apply the JSON returned by simplify, convert or photo recognition
    pub fn apply_structure(
        &mut self,
        ticket: CallTicket,
        reply: Result<String, EngineError>,
    ) -> Result<&Structure, WorkspaceError> {
        let call = ticket.call();
        let structure = self.finish_call(ticket, reply).and_then(|output| {
            let parsed = match call {
                EngineCall::PhotoToAutomaton => parse_photo_output(&output),
                _ => parse_structure_output(call, &output),
            };
            parsed.map_err(WorkspaceError::Engine)
        })?;
        self.replace_structure(structure);
        Ok(&self.structure)
    }

    /// Apply the result of a full run
    pub fn apply_run(
        &mut self,
        ticket: CallTicket,
        reply: Result<bool, EngineError>,
    ) -> Result<bool, WorkspaceError> {
        let accepted = self.finish_call(ticket, reply)?;
        self.run.result = Some(accepted);
        self.run.consumed.clear();
        self.run.active.clear();
        info!(accepted, input = %self.run.input, "Ran input");
        Ok(accepted)
    }

    /// Apply the active states after `prefix`, which must be the consumed
    /// text plus the next character of the input
    pub fn apply_prefix(
        &mut self,
        ticket: CallTicket,
        prefix: String,
        reply: Result<BTreeSet<StateId>, EngineError>,
    ) -> Result<&BTreeSet<StateId>, WorkspaceError> {
        let active = self.finish_call(ticket, reply)?;
        if self.run.next_prefix().as_deref() != Some(prefix.as_str()) {
            warn!(prefix = %prefix, consumed = %self.run.consumed, "Dropped out-of-step prefix");
            return Err(WorkspaceError::PrefixMismatch { prefix });
        }
        debug!(prefix = %prefix, active = active.len(), "Stepped input");
        self.run.active = active;
        self.run.consumed = prefix;
        Ok(&self.run.active)
    }

    /// Minimise the current DFA
    pub fn simplify<E: AutomatonEngine>(&mut self, engine: &E) -> Result<&Structure, WorkspaceError> {
        let ticket = self.begin_call(EngineCall::Simplify)?;
        let reply = engine.simplify(self.structure.graph());
        self.apply_structure(ticket, reply)
    }

    /// Replace the current NFA with an equivalent DFA
    pub fn convert_to_dfa<E: AutomatonEngine>(
        &mut self,
        engine: &E,
    ) -> Result<&Structure, WorkspaceError> {
        let ticket = self.begin_call(EngineCall::ConvertToDfa)?;
        let reply = engine.convert_to_dfa(self.structure.graph());
        self.apply_structure(ticket, reply)
    }

    /// Run the whole input
    pub fn run<E: AutomatonEngine>(&mut self, engine: &E) -> Result<bool, WorkspaceError> {
        let ticket = self.begin_call(EngineCall::Run)?;
        let reply = engine.run(self.structure.graph(), &self.run.input);
        self.apply_run(ticket, reply)
    }

    /// Step one more character. Once the whole input is consumed this runs
    /// it in full instead.
    pub fn run_character<E: AutomatonEngine>(&mut self, engine: &E) -> Result<(), WorkspaceError> {
        let Some(prefix) = self.run.next_prefix() else {
            self.run(engine)?;
            return Ok(());
        };
        let ticket = self.begin_call(EngineCall::RunPrefix)?;
        let reply = engine.run_prefix(self.structure.graph(), &prefix);
        self.apply_prefix(ticket, prefix, reply)?;
        Ok(())
    }

    /// Load a structure recognised from a photo
    pub fn load_photo<E: AutomatonEngine>(
        &mut self,
        engine: &E,
        path: &Path,
    ) -> Result<&Structure, WorkspaceError> {
        let ticket = self.begin_call(EngineCall::PhotoToAutomaton)?;
        let reply = engine.photo_to_automaton(path);
        self.apply_structure(ticket, reply)
    }

    /// Replace the structure, e.g. from the gallery
    pub fn set_structure(&mut self, structure: Structure) -> Result<(), WorkspaceError> {
        self.ensure_idle()?;
        self.replace_structure(structure);
        Ok(())
    }

    /// Mark the current structure saved and add it to the gallery
    pub fn save<S: KeyValueStore>(&mut self, gallery: &mut Gallery<S>) -> Result<(), WorkspaceError> {
        self.ensure_idle()?;
        gallery.add(&self.structure)?;
        self.saved = Some(self.structure.clone());
        Ok(())
    }

    /// Go back to the last saved structure
    pub fn use_last_saved(&mut self) -> Result<&Structure, WorkspaceError> {
        self.ensure_idle()?;
        let saved = self.saved.clone().ok_or(WorkspaceError::NothingSaved)?;
        self.replace_structure(saved);
        Ok(&self.structure)
    }

    /// Start editing a copy of the current structure
    pub fn open_editor(&self) -> Result<EditSession, WorkspaceError> {
        self.ensure_idle()?;
        Ok(EditSession::new(self.structure.clone()))
    }

    /// Validate the edited structure, recompute its DFA flag, then make it
    /// both current and saved and add it to the gallery.
    pub fn commit_edit<E: AutomatonEngine, S: KeyValueStore>(
        &mut self,
        session: &EditSession,
        engine: &E,
        gallery: &mut Gallery<S>,
    ) -> Result<&Structure, WorkspaceError> {
        let save_span = span!(Level::INFO, "commit_edit");
        let _enter = save_span.enter();

        let graph = session.structure().graph();
        let ticket = self.begin_call(EngineCall::Validate)?;
        let code = self.finish_call(ticket, engine.validate(graph))?;
        if !code.is_valid() {
            warn!(code = code.code(), reason = %code, "Edited structure failed validation");
            return Err(WorkspaceError::Invalid(code));
        }

        let ticket = self.begin_call(EngineCall::IsDfa)?;
        let is_dfa = self.finish_call(ticket, engine.is_dfa(graph))?;
        let saved = session
            .structure()
            .with_graph(graph.clone().with_is_dfa(is_dfa));

        gallery.add(&saved)?;
        self.replace_structure(saved.clone());
        self.saved = Some(saved);
        info!(is_dfa, "Saved edited structure");
        Ok(&self.structure)
    }
}

/// Whether an edit session can close without losing work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseCheck {
    Clean,
    UnsavedChanges { warning: &'static str },
}

/// What an edit call left for the host to show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditResponse {
    pub changed: bool,
    pub prompt: Option<Prompt>,
    pub notices: Vec<Notice>,
}

/// Editing a working copy of a structure
#[derive(Debug, Clone)]
pub struct EditSession {
    original: Structure,
    structure: Structure,
    editor: Editor,
    viewport: ViewportController,
}

impl EditSession {
    pub fn new(structure: Structure) -> Self {
        Self {
            original: structure.clone(),
            structure,
            editor: Editor::editing(),
            viewport: ViewportController::default(),
        }
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn graph(&self) -> &Graph {
        self.structure.graph()
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    /// Switch between editing and pan-and-zoom
    pub fn toggle_editing(&mut self) -> bool {
        let editable = !self.editor.is_editable();
        self.editor.set_editable(editable);
        editable
    }

    pub fn is_dirty(&self) -> bool {
        self.structure != self.original
    }

    pub fn close(&self) -> CloseCheck {
        if self.is_dirty() {
            CloseCheck::UnsavedChanges {
                warning: UNSAVED_WARNING,
            }
        } else {
            CloseCheck::Clean
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        self.editor.render_options()
    }

    /// Run one editor call against the working copy and swap in its result
    ///
    /// ```
    /// use automaton_canvas::core::Structure;
    /// use automaton_canvas::workspace::EditSession;
    ///
    /// let mut session = EditSession::new(Structure::default_nfa());
    /// let response = session.edit(|editor, graph| editor.tap_state(graph, 0)).unwrap();
    /// assert!(response.prompt.is_some());
    /// ```
    pub fn edit(
        &mut self,
        f: impl FnOnce(&mut Editor, &Graph) -> Result<EditOutcome, EditError>,
    ) -> Result<EditResponse, EditError> {
        let outcome = f(&mut self.editor, self.structure.graph())?;
        let changed = match outcome.graph {
            Some(graph) => {
                self.structure = self.structure.with_graph(graph);
                true
            }
            None => false,
        };
        Ok(EditResponse {
            changed,
            prompt: outcome.prompt,
            notices: outcome.notices,
        })
    }
}
