use std::{error::Error, fmt};

use crate::comment::CommentKind;
use crate::types::Position;

/// A recoverable defect noticed while scanning or parsing.
///
/// Diagnostics are collected in detection order and never stop the
/// pass: every input yields a capture total and a (possibly empty)
/// list of these records.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// A byte no lexical rule recognizes; it was skipped.
    InvalidCharacter { ch: u8, pos: Position },
    /// Consecutive round markers did not advance by one, or a
    /// continuation marker did not match the round it continues.
    RoundNumber {
        expected: u64,
        actual: u64,
        pos: Position,
    },
    /// The input ended inside an open comment of this kind.
    UnterminatedComment { kind: CommentKind, pos: Position },
    /// A comment closer of the wrong kind; one frame was force-popped
    /// and the comment stayed open.
    MismatchedCloser {
        expected: CommentKind,
        found: CommentKind,
        pos: Position,
    },
    /// The token sequence matches no production; parsing stopped here
    /// with whatever total had been accumulated.
    Syntax { pos: Option<Position> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidCharacter { ch, pos } => {
                write!(f, "invalid character '{}' at {}", ch.escape_ascii(), pos)
            }
            Diagnostic::RoundNumber {
                expected,
                actual,
                pos,
            } => write!(
                f,
                "incorrect round number at {pos}: expected {expected}, got {actual}"
            ),
            Diagnostic::UnterminatedComment { kind, pos } => {
                write!(f, "unterminated {kind} comment opened at {pos}")
            }
            Diagnostic::MismatchedCloser {
                expected,
                found,
                pos,
            } => write!(
                f,
                "cannot close {expected} comment with {found} closer at {pos}"
            ),
            Diagnostic::Syntax { pos: Some(pos) } => write!(f, "syntax error at {pos}"),
            Diagnostic::Syntax { pos: None } => f.write_str("syntax error at end of input"),
        }
    }
}

impl Error for Diagnostic {}
