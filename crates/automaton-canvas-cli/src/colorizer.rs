//! Terminal colorization for JSON output
//!
//! Applies ANSI escape codes to JSON tokens using crossterm.

use crossterm::style::{Color, Stylize};

/// Colorize pretty-printed JSON
///
/// - Object keys: Cyan
/// - String values: Green
/// - Numbers: Yellow
/// - `true`, `false`, `null`: Magenta
/// - Punctuation: Default (terminal color)
pub fn colorize_json(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 2);
    let mut chars = input.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            '"' => {
                let mut end = start + 1;
                let mut escaped = false;
                for (i, c) in chars.by_ref() {
                    end = i + c.len_utf8();
                    match c {
                        '\\' if !escaped => escaped = true,
                        '"' if !escaped => break,
                        _ => escaped = false,
                    }
                }
                let literal = &input[start..end];
                let color = if is_key(&input[end..]) {
                    Color::Cyan
                } else {
                    Color::Green
                };
                result.push_str(&format!("{}", literal.with(color)));
            }
            '-' | '0'..='9' => {
                let mut end = start + 1;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-') {
                        end = i + 1;
                        chars.next();
                    } else {
                        break;
                    }
                }
                result.push_str(&format!("{}", input[start..end].with(Color::Yellow)));
            }
            't' | 'f' | 'n' => {
                let rest = &input[start..];
                match ["true", "false", "null"].iter().find(|w| rest.starts_with(**w)) {
                    Some(word) => {
                        for _ in 1..word.len() {
                            chars.next();
                        }
                        result.push_str(&format!("{}", (*word).with(Color::Magenta)));
                    }
                    None => result.push(c),
                }
            }
            _ => result.push(c),
        }
    }

    result
}

/// A string is a key when the next non-space character is a colon
fn is_key(after: &str) -> bool {
    after.trim_start().starts_with(':')
}
