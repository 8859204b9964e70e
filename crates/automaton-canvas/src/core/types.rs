//! Core type definitions for automaton diagrams
//!
//! Identifiers, the transition token type, and the small display enums shared
//! by the renderer and the editor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a state, unique within a graph
pub type StateId = u32;

/// Identifier of a transition, unique within a graph
pub type TransitionId = u32;

/// The epsilon token
pub const EPSILON: char = 'ε';

/// Label of a single transition: one character, possibly [`EPSILON`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Token(char);

impl Token {
    /// The epsilon token
    pub const EPSILON: Token = Token(EPSILON);

    pub fn new(c: char) -> Self {
        Self(c)
    }

    pub fn as_char(self) -> char {
        self.0
    }

    pub fn is_epsilon(self) -> bool {
        self.0 == EPSILON
    }
}

impl From<char> for Token {
    fn from(c: char) -> Self {
        Self(c)
    }
}

impl TryFrom<String> for Token {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self(c)),
            _ => Err(format!(
                "token must be exactly one character, got {:?}",
                value
            )),
        }
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0.to_string()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stroke colour of a drawn primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stroke {
    #[default]
    Black,
    /// Selected state or arrow
    Blue,
    /// State in the engine's active set
    Red,
}

impl Stroke {
    /// Id of the arrowhead marker drawn with this stroke
    pub fn marker_id(self) -> &'static str {
        match self {
            Stroke::Black => "arrow",
            Stroke::Blue => "blueArrow",
            Stroke::Red => "redArrow",
        }
    }
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stroke::Black => write!(f, "black"),
            Stroke::Blue => write!(f, "blue"),
            Stroke::Red => write!(f, "red"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_string() {
        assert_eq!(Token::try_from("a".to_string()), Ok(Token::new('a')));
        assert_eq!(Token::try_from("ε".to_string()), Ok(Token::EPSILON));
        assert!(Token::try_from("ab".to_string()).is_err());
        assert!(Token::try_from(String::new()).is_err());
    }

    #[test]
    fn test_token_json() {
        let token: Token = serde_json::from_str("\"1\"").unwrap();
        assert_eq!(token.as_char(), '1');
        assert_eq!(serde_json::to_string(&Token::EPSILON).unwrap(), "\"ε\"");
        assert!(serde_json::from_str::<Token>("\"10\"").is_err());
    }

    #[test]
    fn test_stroke_display() {
        assert_eq!(Stroke::Black.to_string(), "black");
        assert_eq!(Stroke::Blue.to_string(), "blue");
        assert_eq!(Stroke::Red.to_string(), "red");
        assert_eq!(Stroke::Blue.marker_id(), "blueArrow");
    }
}
