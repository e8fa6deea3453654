//! Syntax highlighting for the REPL.

use std::borrow::Cow;

/// Highlighter for REPL input: `:commands`, numbers, quoted strings,
/// `#` comments, and category punctuation.
pub struct CategorialHighlighter {}

impl CategorialHighlighter {
    /// Creates a new highlighter.
    pub const fn new() -> Self {
        Self {}
    }

    /// Highlight a line of input.
    #[allow(clippy::unused_self)]
    pub fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.is_empty() {
            return Cow::Borrowed(line);
        }

        let mut result = String::with_capacity(line.len() * 2);
        let mut chars = line.chars().peekable();
        let mut in_string = false;
        let mut at_start = true;

        while let Some(c) = chars.next() {
            match c {
                // Comments run to end of line
                '#' if !in_string => {
                    result.push_str("\x1b[2;3m"); // dim italic
                    result.push(c);
                    result.extend(chars.by_ref());
                    result.push_str("\x1b[0m");
                }

                // Strings
                '"' => {
                    if in_string {
                        result.push(c);
                        result.push_str("\x1b[0m");
                    } else {
                        result.push_str("\x1b[33m"); // yellow
                        result.push(c);
                    }
                    in_string = !in_string;
                }

                '\\' if in_string => {
                    result.push(c);
                    if let Some(next) = chars.next() {
                        result.push(next);
                    }
                }

                // REPL commands, only in command position
                ':' if at_start => {
                    result.push_str("\x1b[1;36m"); // bold cyan
                    result.push(c);
                    while let Some(&next) = chars.peek() {
                        if next.is_alphanumeric() || next == '-' {
                            result.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    result.push_str("\x1b[0m");
                }

                // Numbers
                c if c.is_ascii_digit() && !in_string => {
                    result.push_str("\x1b[35m"); // magenta
                    result.push(c);
                    while let Some(&next) = chars.peek() {
                        if next.is_ascii_digit() || next == '.' {
                            result.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    result.push_str("\x1b[0m");
                }

                // Category slashes
                '/' | '\\' if !in_string => {
                    result.push_str("\x1b[1;34m"); // bold blue
                    result.push(c);
                    result.push_str("\x1b[0m");
                }

                // Delimiters
                '(' | ')' | '[' | ']' | '{' | '}' if !in_string => {
                    result.push_str("\x1b[1m"); // bold
                    result.push(c);
                    result.push_str("\x1b[0m");
                }

                _ => result.push(c),
            }
            if !c.is_whitespace() {
                at_start = false;
            }
        }

        if in_string {
            result.push_str("\x1b[0m");
        }

        Cow::Owned(result)
    }
}

impl Default for CategorialHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
