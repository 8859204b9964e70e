//! Boundary to the automaton engine
//!
//! Validation, minimisation, conversion, string runs and photo recognition
//! live outside this crate. [`AutomatonEngine`] is the call contract; the
//! helpers here decode what comes back. Structure results arrive as the same
//! JSON the gallery stores.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, error};

use crate::core::{DiagramError, Graph, StateId, Structure};

/// Result of `validate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCode {
    Valid,
    DuplicateNames,
    StartStateCount,
    DuplicateTransitions,
    Unknown(i32),
}

impl ValidationCode {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ValidationCode::Valid,
            1 => ValidationCode::DuplicateNames,
            2 => ValidationCode::StartStateCount,
            3 => ValidationCode::DuplicateTransitions,
            other => ValidationCode::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            ValidationCode::Valid => 0,
            ValidationCode::DuplicateNames => 1,
            ValidationCode::StartStateCount => 2,
            ValidationCode::DuplicateTransitions => 3,
            ValidationCode::Unknown(code) => *code,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationCode::Valid)
    }

    /// User-facing reason a structure cannot be saved
    pub fn message(&self) -> &'static str {
        match self {
            ValidationCode::Valid => "Valid",
            ValidationCode::DuplicateNames => "States cannot have duplicate names",
            ValidationCode::StartStateCount => "There must be one starting state",
            ValidationCode::DuplicateTransitions => "Duplicate transitions exist",
            ValidationCode::Unknown(_) => "Unknown error",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Problems with a photo the user should fix themselves
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoError {
    #[error("No start state")]
    NoStartState,

    #[error("More than 1 start state")]
    MultipleStartStates,
}

impl PhotoError {
    /// Recognise one of the engine's sentinel replies
    pub fn from_sentinel(output: &str) -> Option<Self> {
        match output {
            "No start state" => Some(PhotoError::NoStartState),
            "More than 1 start state" => Some(PhotoError::MultipleStartStates),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Photo(#[from] PhotoError),

    #[error("Engine call '{call}' failed: {message}")]
    Call { call: EngineCall, message: String },

    #[error("Engine call '{call}' returned an invalid structure: {source}")]
    InvalidOutput {
        call: EngineCall,
        #[source]
        source: DiagramError,
    },
}

impl EngineError {
    pub fn call(call: EngineCall, message: impl Into<String>) -> Self {
        EngineError::Call {
            call,
            message: message.into(),
        }
    }

    /// Whether the message is meant for the user rather than the log
    pub fn is_user_facing(&self) -> bool {
        matches!(self, EngineError::Photo(_))
    }
}

/// The engine calls, for logging and the in-flight guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineCall {
    Validate,
    IsDfa,
    Simplify,
    ConvertToDfa,
    Run,
    RunPrefix,
    PhotoToAutomaton,
}

impl fmt::Display for EngineCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineCall::Validate => "validate",
            EngineCall::IsDfa => "isDfa",
            EngineCall::Simplify => "simplify",
            EngineCall::ConvertToDfa => "convert",
            EngineCall::Run => "run",
            EngineCall::RunPrefix => "runPrefix",
            EngineCall::PhotoToAutomaton => "photoToAutomaton",
        };
        write!(f, "{}", name)
    }
}

/// Automaton algorithms provided by the host
///
/// Calls that produce a structure return its JSON unparsed; use
/// [`parse_structure_output`] or [`parse_photo_output`] on it.
pub trait AutomatonEngine {
    fn validate(&self, graph: &Graph) -> Result<ValidationCode, EngineError>;

    fn is_dfa(&self, graph: &Graph) -> Result<bool, EngineError>;

    /// Minimise a DFA
    fn simplify(&self, graph: &Graph) -> Result<String, EngineError>;

    fn convert_to_dfa(&self, graph: &Graph) -> Result<String, EngineError>;

    /// Whether the whole input is accepted
    fn run(&self, graph: &Graph, input: &str) -> Result<bool, EngineError>;

    /// States active after reading `prefix`
    fn run_prefix(&self, graph: &Graph, prefix: &str) -> Result<BTreeSet<StateId>, EngineError>;

    /// Structure JSON, or one of the photo sentinels
    fn photo_to_automaton(&self, path: &Path) -> Result<String, EngineError>;
}

/// Decode a structure returned by `call`
pub fn parse_structure_output(call: EngineCall, output: &str) -> Result<Structure, EngineError> {
    match Structure::from_json(output) {
        Ok(structure) => {
            debug!(%call, states = structure.graph().states().len(), "Decoded engine structure");
            Ok(structure)
        }
        Err(source) => {
            error!(%call, error = %source, "Engine returned an invalid structure");
            Err(EngineError::InvalidOutput { call, source })
        }
    }
}

/// Decode photo recognition output: a structure, or a sentinel the user
/// should see
pub fn parse_photo_output(output: &str) -> Result<Structure, EngineError> {
    match Structure::from_json(output) {
        Ok(structure) => Ok(structure),
        Err(source) => match PhotoError::from_sentinel(output) {
            Some(photo) => {
                debug!(reason = %photo, "Photo rejected");
                Err(photo.into())
            }
            None => {
                error!(error = %source, "Unexpected photo recognition output");
                Err(EngineError::InvalidOutput {
                    call: EngineCall::PhotoToAutomaton,
                    source,
                })
            }
        },
    }
}

/// Handle for an outstanding engine call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallTicket {
    id: u64,
    call: EngineCall,
}

impl CallTicket {
    pub fn call(&self) -> EngineCall {
        self.call
    }
}

/// Allows one engine call at a time
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    next: u64,
    current: Option<CallTicket>,
}

impl InFlight {
    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<CallTicket> {
        self.current
    }

    /// Start a call, or report the one already running
    pub fn begin(&mut self, call: EngineCall) -> Result<CallTicket, CallTicket> {
        if let Some(running) = self.current {
            return Err(running);
        }
        let ticket = CallTicket {
            id: self.next,
            call,
        };
        self.next += 1;
        self.current = Some(ticket);
        debug!(%call, ticket = ticket.id, "Engine call started");
        Ok(ticket)
    }

    /// Finish `ticket`. False when it was abandoned or superseded, in which
    /// case its result must be dropped.
    pub fn finish(&mut self, ticket: CallTicket) -> bool {
        if self.current == Some(ticket) {
            self.current = None;
            debug!(call = %ticket.call, ticket = ticket.id, "Engine call finished");
            true
        } else {
            debug!(call = %ticket.call, ticket = ticket.id, "Dropping stale engine result");
            false
        }
    }

    /// Forget the running call
    pub fn abandon(&mut self) -> Option<CallTicket> {
        self.current.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_codes() {
        assert!(ValidationCode::from_code(0).is_valid());
        assert_eq!(
            ValidationCode::from_code(1).message(),
            "States cannot have duplicate names"
        );
        assert_eq!(
            ValidationCode::from_code(2).message(),
            "There must be one starting state"
        );
        assert_eq!(
            ValidationCode::from_code(3).message(),
            "Duplicate transitions exist"
        );
        assert_eq!(ValidationCode::from_code(7), ValidationCode::Unknown(7));
        assert_eq!(ValidationCode::from_code(7).message(), "Unknown error");
        assert_eq!(ValidationCode::Unknown(7).code(), 7);
    }

    #[test]
    fn test_photo_sentinels() {
        let err = parse_photo_output("No start state").unwrap_err();
        assert!(err.is_user_facing());
        assert_eq!(err.to_string(), "No start state");

        let err = parse_photo_output("More than 1 start state").unwrap_err();
        assert!(matches!(err, EngineError::Photo(PhotoError::MultipleStartStates)));

        let err = parse_photo_output("segfault").unwrap_err();
        assert!(!err.is_user_facing());
        assert!(matches!(err, EngineError::InvalidOutput { .. }));
    }

    #[test]
    fn test_photo_structure() {
        let json = Structure::default_nfa().to_json().unwrap();
        assert_eq!(parse_photo_output(&json).unwrap(), Structure::default_nfa());
    }

    #[test]
    fn test_in_flight_guard() {
        let mut guard = InFlight::default();
        let first = guard.begin(EngineCall::Simplify).unwrap();
        assert_eq!(guard.begin(EngineCall::Run).unwrap_err(), first);
        assert!(guard.finish(first));
        assert!(!guard.is_busy());

        let second = guard.begin(EngineCall::Run).unwrap();
        assert_eq!(guard.abandon(), Some(second));
        assert!(!guard.finish(second));
    }
}
