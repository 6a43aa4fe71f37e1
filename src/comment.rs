//! The exclusive comment-scanning mode.
//!
//! Comments open with `{` or `(` and may nest both delimiter kinds in
//! any combination. The whole nested span becomes a single token whose
//! payload is the number of capturing moves mentioned anywhere inside.

use std::fmt;

use crate::diagnostic::Diagnostic;
use crate::lexer::Lexer;
use crate::san;
use crate::token::{Token, TokenKind};
use crate::types::Position;

/// The two comment delimiter families.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommentKind {
    /// `{` ... `}`
    Brace,
    /// `(` ... `)`
    Paren,
}

impl fmt::Display for CommentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommentKind::Brace => "brace",
            CommentKind::Paren => "parenthesis",
        })
    }
}

/// One open delimiter. The frame stack is the entire state of the
/// comment mode: the top frame decides which closer matches, so a
/// cross-kind opener switches modes by becoming the new top.
struct Frame {
    kind: CommentKind,
    start: Position,
}

/// Scans one comment starting at the opening delimiter the lexer is
/// positioned on. Returns the comment token, or `None` when the
/// comment never closes cleanly; diagnostics record why.
pub(crate) fn scan<'a>(
    lexer: &mut Lexer<'a>,
    kind: CommentKind,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Token<'a>> {
    let start = lexer.pos;
    let pos = lexer.position();
    let mut frames = vec![Frame { kind, start: pos }];
    lexer.pos += 1;

    while let Some(&ch) = lexer.pgn.get(lexer.pos) {
        let top = frames.last()?.kind;
        match ch {
            b'\n' => {
                lexer.pos += 1;
                lexer.line += 1;
            }
            b'{' => {
                frames.push(Frame {
                    kind: CommentKind::Brace,
                    start: lexer.position(),
                });
                lexer.pos += 1;
            }
            b'(' => {
                frames.push(Frame {
                    kind: CommentKind::Paren,
                    start: lexer.position(),
                });
                lexer.pos += 1;
            }
            b'}' | b')' => {
                let closer = if ch == b'}' {
                    CommentKind::Brace
                } else {
                    CommentKind::Paren
                };
                let closer_pos = lexer.position();
                lexer.pos += 1;
                frames.pop();
                if closer == top {
                    if frames.is_empty() {
                        let span = &lexer.pgn[start..lexer.pos];
                        return Some(Token {
                            kind: TokenKind::Comment {
                                captures: san::count_capture_moves(span),
                            },
                            pos,
                        });
                    }
                } else {
                    // Wrong closer kind: force-pop one frame as
                    // best-effort recovery, but the comment does not
                    // close here and yields no token.
                    diagnostics.push(Diagnostic::MismatchedCloser {
                        expected: top,
                        found: closer,
                        pos: closer_pos,
                    });
                    if frames.is_empty() {
                        return None;
                    }
                }
            }
            _ => lexer.pos += 1,
        }
    }

    // End of input with frames still open: report each still-open kind
    // once, innermost first. The partial span contributes no token and
    // no capture count.
    let mut open_brace = false;
    let mut open_paren = false;
    for frame in frames.iter().rev() {
        let seen = match frame.kind {
            CommentKind::Brace => &mut open_brace,
            CommentKind::Paren => &mut open_paren,
        };
        if !*seen {
            *seen = true;
            diagnostics.push(Diagnostic::UnterminatedComment {
                kind: frame.kind,
                pos: frame.start,
            });
        }
    }
    None
}
