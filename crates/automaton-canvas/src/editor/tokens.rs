//! Parser for comma-separated token lists
//!
//! Users type transition tokens as `a, b ,c`. Each entry is trimmed of
//! surrounding spaces and must then be exactly one character. Other
//! whitespace, such as a tab, is an ordinary token.

use chumsky::prelude::*;

use crate::core::Token;

type ParserError<'src> = extra::Err<Rich<'src, char>>;

fn padding<'src>() -> impl Parser<'src, &'src str, (), ParserError<'src>> + Clone {
    just(' ').repeated().ignored()
}

fn token<'src>() -> impl Parser<'src, &'src str, Token, ParserError<'src>> + Clone {
    none_of(", ").map(Token::new)
        .padded_by(padding())
}

/// Parser for one or more tokens separated by commas
pub fn token_list<'src>() -> impl Parser<'src, &'src str, Vec<Token>, ParserError<'src>> + Clone {
    token()
        .separated_by(just(','))
        .at_least(1)
        .collect::<Vec<_>>()
        .then_ignore(end())
}

/// Parse a token list, returning a readable description of the first
/// problem on failure.
pub fn parse_tokens(input: &str) -> Result<Vec<Token>, String> {
    token_list().parse(input).into_result().map_err(|errors| {
        errors
            .into_iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    })
}
