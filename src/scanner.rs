//! Quote-aware scanning of `VALUES` tuples.
//!
//! Everything here walks raw bytes. The structural characters (`'`, `\`, `(`, `)`,
//! `,`, `;`) are all ASCII and never occur inside a multi-byte UTF-8 sequence, so
//! every offset reported by [`Structural`] is a valid `str` boundary.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Default,
    InQuotedString,
}

/// Why a span of dump text could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    UnterminatedQuote,
    UnbalancedParen { offset: usize },
    UnexpectedText { offset: usize },
    MissingTerminator,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::UnterminatedQuote => write!(f, "unterminated quoted string"),
            ScanError::UnbalancedParen { offset } => {
                write!(f, "unbalanced parenthesis at offset {}", offset)
            }
            ScanError::UnexpectedText { offset } => {
                write!(f, "unexpected text between row tuples at offset {}", offset)
            }
            ScanError::MissingTerminator => write!(f, "statement has no terminating ';'"),
        }
    }
}

/// Yields `(offset, byte)` for every `(`, `)`, `,` and `;` that sits outside a
/// single-quoted literal.
///
/// Inside a literal, `\x` and `''` are consumed as content so neither an escaped
/// quote nor a doubled quote closes the string.
pub(crate) struct Structural<'a> {
    bytes: &'a [u8],
    pos: usize,
    state: State,
    escaped: bool,
}

impl<'a> Structural<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
            state: State::Default,
            escaped: false,
        }
    }

    /// True when the walk stopped (or ran out) inside a quoted literal.
    pub(crate) fn in_quote(&self) -> bool {
        self.state == State::InQuotedString
    }
}

impl Iterator for Structural<'_> {
    type Item = (usize, u8);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.bytes.len() {
            let i = self.pos;
            let b = self.bytes[i];
            self.pos += 1;

            match self.state {
                State::Default => match b {
                    b'\'' => self.state = State::InQuotedString,
                    b'(' | b')' | b',' | b';' => return Some((i, b)),
                    _ => {}
                },
                State::InQuotedString => {
                    if self.escaped {
                        self.escaped = false;
                        continue;
                    }
                    match b {
                        b'\\' => self.escaped = true,
                        b'\'' if self.bytes.get(self.pos) == Some(&b'\'') => self.pos += 1,
                        b'\'' => self.state = State::Default,
                        _ => {}
                    }
                }
            }
        }
        None
    }
}

/// Splits one row tuple body (the text between its outer parentheses) into raw fields.
///
/// Fields keep their quotes and escape sequences; only whitespace outside the
/// literal is trimmed. Commas split fields only outside quotes and outside any
/// unquoted parentheses such as `NOW()`.
pub fn scan_fields(body: &str) -> Result<Vec<String>, ScanError> {
    let mut fields = Vec::new();
    let mut walker = Structural::new(body);
    let mut depth: u32 = 0;
    let mut field_start = 0;

    while let Some((offset, byte)) = walker.next() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                if depth == 0 {
                    return Err(ScanError::UnbalancedParen { offset });
                }
                depth -= 1;
            }
            b',' if depth == 0 => {
                fields.push(body[field_start..offset].trim().to_string());
                field_start = offset + 1;
            }
            _ => {}
        }
    }

    if walker.in_quote() {
        return Err(ScanError::UnterminatedQuote);
    }
    if depth != 0 {
        return Err(ScanError::UnbalancedParen { offset: body.len() });
    }

    fields.push(body[field_start..].trim().to_string());
    Ok(fields)
}
