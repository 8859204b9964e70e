//! Core error types for diagram processing
//!
//! This module defines the error types shared by the layout, routing and
//! rendering pipeline and by structure (de)serialization.

use thiserror::Error;

use super::{StateId, TransitionId};

/// Core error types for diagram processing
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Parse error: {message} at line {line}, column {column}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Layout error: {message}")]
    LayoutError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Unknown state {id} referenced by transition {transition}")]
    DanglingTransition { id: StateId, transition: TransitionId },

    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u32 },

    #[error("Unknown state {id}")]
    UnknownState { id: StateId },

    #[error("Unknown transition {id}")]
    UnknownTransition { id: TransitionId },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Unknown structure kind: {kind}")]
    UnknownStructureKind { kind: String },
}

impl DiagramError {
    /// Create a new parse error
    pub fn parse_error(message: String, line: usize, column: usize) -> Self {
        Self::ParseError {
            message,
            line,
            column,
        }
    }

    /// Create a new layout error
    pub fn layout_error(message: String) -> Self {
        Self::LayoutError { message }
    }

    /// Create a new render error
    pub fn render_error(message: String) -> Self {
        Self::RenderError { message }
    }
}

impl From<serde_json::Error> for DiagramError {
    fn from(err: serde_json::Error) -> Self {
        let (line, column) = (err.line(), err.column());
        // serde_json reports "unknown variant" for a bad `type` tag
        let message = err.to_string();
        if let Some(kind) = unknown_variant(&message) {
            return Self::UnknownStructureKind { kind };
        }
        Self::ParseError {
            message,
            line,
            column,
        }
    }
}

fn unknown_variant(message: &str) -> Option<String> {
    let rest = message.strip_prefix("unknown variant `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error() {
        let error = DiagramError::parse_error("Invalid syntax".to_string(), 5, 10);
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Parse error"));
        assert!(error_msg.contains("Invalid syntax"));
        assert!(error_msg.contains("line 5"));
        assert!(error_msg.contains("column 10"));
    }

    #[test]
    fn test_layout_error() {
        let error = DiagramError::layout_error("Layout failed".to_string());
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Layout error"));
        assert!(error_msg.contains("Layout failed"));
    }

    #[test]
    fn test_render_error() {
        let error = DiagramError::render_error("Render failed".to_string());
        assert!(format!("{}", error).contains("Render failed"));
    }

    #[test]
    fn test_dangling_transition() {
        let error = DiagramError::DanglingTransition {
            id: 7,
            transition: 2,
        };
        assert_eq!(
            error.to_string(),
            "Unknown state 7 referenced by transition 2"
        );
    }

    #[test]
    fn test_duplicate_id() {
        let error = DiagramError::DuplicateId {
            kind: "state",
            id: 3,
        };
        assert_eq!(error.to_string(), "Duplicate state id 3");
    }

    #[test]
    fn test_unknown_variant_extraction() {
        assert_eq!(
            unknown_variant("unknown variant `pda`, expected `nfa`"),
            Some("pda".to_string())
        );
        assert_eq!(unknown_variant("missing field `id`"), None);
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: DiagramError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }
}
