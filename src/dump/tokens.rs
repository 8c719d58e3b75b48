//! Token file format
//!
//! A token stream is stored as one XML-ish record per token:
//!
//! ```text
//! <project>
//! <token>
//! <number>0</number>
//! <value>int</value>
//! <type>int</type>
//! <line>1</line>
//! <valid>true</valid>
//! </token>
//! </project>
//! ```
//!
//! The end-of-file token is not stored; [`read_tokens`] appends it.

use crate::parser::token::{Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenFileError {
    #[error("line {line}: expected `{expected}`, found `{found}`")]
    Malformed {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("line {line}: unknown token type `{name}`")]
    UnknownKind { line: usize, name: String },

    #[error("line {line}: invalid {field} `{value}`")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("token file ends after line {line} without `</project>`")]
    UnexpectedEnd { line: usize },
}

/// Serialize `tokens` (minus the end-of-file marker) in the token file format.
pub fn write_tokens(tokens: &[Token]) -> String {
    let mut out = String::from("<project>\n");

    for token in tokens.iter().filter(|token| token.kind != TokenKind::Eof) {
        out.push_str(&format!(
            "<token>\n<number>{}</number>\n<value>{}</value>\n<type>{}</type>\n<line>{}</line>\n<valid>{}</valid>\n</token>\n",
            token.number,
            escape(&token.lexeme),
            token.kind.name(),
            token.line,
            token.valid
        ));
    }

    out.push_str("</project>\n");
    out
}

/// Load a token file, appending an end-of-file token after the last record.
pub fn read_tokens(text: &str) -> Result<Vec<Token>, TokenFileError> {
    let mut lines = Lines::new(text);
    lines.exact("<project>")?;

    let mut tokens = Vec::new();
    loop {
        let (line, content) = lines.next_line()?;
        match content {
            "</project>" => break,
            "<token>" => tokens.push(read_record(&mut lines)?),
            other => {
                return Err(TokenFileError::Malformed {
                    line,
                    expected: "<token>".to_string(),
                    found: other.to_string(),
                })
            }
        }
    }

    if let Some((line, content)) = lines.rest().find(|(_, content)| !content.is_empty()) {
        return Err(TokenFileError::Malformed {
            line,
            expected: "end of file".to_string(),
            found: content.to_string(),
        });
    }

    let last_line = tokens.last().map(|token: &Token| token.line).unwrap_or(1);
    tokens.push(Token::eof(last_line));
    Ok(tokens)
}

fn read_record(lines: &mut Lines<'_>) -> Result<Token, TokenFileError> {
    let (number_line, number) = lines.field("number")?;
    let number = number.parse().map_err(|_| TokenFileError::InvalidField {
        line: number_line,
        field: "number",
        value: number.to_string(),
    })?;

    let (_, value) = lines.field("value")?;
    let lexeme = unescape(value);

    let (kind_line, name) = lines.field("type")?;
    let kind = TokenKind::from_name(name).ok_or_else(|| TokenFileError::UnknownKind {
        line: kind_line,
        name: name.to_string(),
    })?;

    let (line_line, line) = lines.field("line")?;
    let line = line.parse().map_err(|_| TokenFileError::InvalidField {
        line: line_line,
        field: "line",
        value: line.to_string(),
    })?;

    let (valid_line, valid) = lines.field("valid")?;
    let valid = match valid {
        "true" => true,
        "false" => false,
        other => {
            return Err(TokenFileError::InvalidField {
                line: valid_line,
                field: "valid",
                value: other.to_string(),
            })
        }
    };

    lines.exact("</token>")?;
    Ok(Token::with_number(number, lexeme, kind, line, valid))
}

/// Line cursor over a token file; line numbers are 1-based.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Lines {
            inner: text.lines().enumerate(),
            last: 0,
        }
    }

    fn next_line(&mut self) -> Result<(usize, &'a str), TokenFileError> {
        match self.inner.next() {
            Some((index, content)) => {
                self.last = index + 1;
                Ok((index + 1, content.trim_end()))
            }
            None => Err(TokenFileError::UnexpectedEnd { line: self.last }),
        }
    }

    fn exact(&mut self, expected: &str) -> Result<(), TokenFileError> {
        let (line, content) = self.next_line()?;
        if content == expected {
            Ok(())
        } else {
            Err(TokenFileError::Malformed {
                line,
                expected: expected.to_string(),
                found: content.to_string(),
            })
        }
    }

    /// `<tag>value</tag>` on a line of its own
    fn field(&mut self, tag: &str) -> Result<(usize, &'a str), TokenFileError> {
        let (line, content) = self.next_line()?;
        let open = format!("<{}>", tag);
        let close = format!("</{}>", tag);

        content
            .strip_prefix(open.as_str())
            .and_then(|rest| rest.strip_suffix(close.as_str()))
            .map(|value| (line, value))
            .ok_or_else(|| TokenFileError::Malformed {
                line,
                expected: format!("{}...{}", open, close),
                found: content.to_string(),
            })
    }

    fn rest(self) -> impl Iterator<Item = (usize, &'a str)> {
        self.inner.map(|(index, content)| (index + 1, content.trim()))
    }
}

pub(crate) fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
