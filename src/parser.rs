//! The grammar-driven validator.
//!
//! A recursive descent over the token stream with one token of
//! lookahead. Every rule returns the capture total of its subtree, and
//! round/continuation rules additionally hand the marker they read to
//! the enclosing round, which checks the sequence as the recursion
//! unwinds. Totals are folded through return values; there is no
//! shared running counter.

use crate::diagnostic::Diagnostic;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::types::Position;

/// The result of scanning and validating one game body.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Analysis {
    /// Total number of capturing moves, moves and comments combined.
    pub captures: u64,
    /// Everything that looked wrong, in detection order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Scans and parses one game body, returning the capture total
/// together with all diagnostics. Never fails: malformed input
/// degrades to diagnostics and a best-effort total.
///
/// # Examples
///
/// ```
/// use pgn_captures::analyze;
///
/// let analysis = analyze(b"1. exd5 {threatens Nxc3} 1... Qxd5 2. Nc3 1-0");
/// assert_eq!(analysis.captures, 3);
/// assert!(analysis.diagnostics.is_empty());
/// ```
pub fn analyze(pgn: &[u8]) -> Analysis {
    let mut parser = Parser::new(pgn);
    let captures = parser.game();
    Analysis {
        captures,
        diagnostics: parser.diagnostics,
    }
}

/// A round marker as actually read.
#[derive(Copy, Clone, Debug)]
struct Marker {
    num: u64,
    pos: Position,
}

/// What a completed subtree tells the enclosing round. Carrying the
/// marker together with its relation keeps the comparison exact for
/// round 0 as well.
enum Expectation {
    /// A result token ended the branch; nothing left to check.
    Terminated,
    /// The next round marker read; the enclosing round must be one
    /// less.
    Next(Marker),
    /// A continuation marker; the enclosing round must equal it.
    Continuation(Marker),
}

/// Capture total and expectation handed up by `after`/`cont`.
struct Follow {
    captures: u64,
    expect: Expectation,
}

impl Follow {
    fn terminated(captures: u64) -> Follow {
        Follow {
            captures,
            expect: Expectation::Terminated,
        }
    }
}

/// Capture total of a `round` subtree plus the marker it opened with
/// (`None` when a result token stood in its place).
struct Rounds {
    captures: u64,
    marker: Option<Marker>,
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Option<Token<'a>>>,
    diagnostics: Vec<Diagnostic>,
    failed: bool,
}

impl<'a> Parser<'a> {
    fn new(pgn: &'a [u8]) -> Parser<'a> {
        Parser {
            lexer: Lexer::new(pgn),
            peeked: None,
            diagnostics: Vec::new(),
            failed: false,
        }
    }

    fn peek(&mut self) -> Option<&Token<'a>> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token(&mut self.diagnostics));
        }
        self.peeked.as_ref().and_then(|token| token.as_ref())
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token(&mut self.diagnostics),
        }
    }

    /// One diagnostic per failure; reduction stops for the branch, so
    /// nothing is consumed afterwards.
    fn syntax_error(&mut self, token: Option<Token<'a>>) {
        if !self.failed {
            self.failed = true;
            self.diagnostics.push(Diagnostic::Syntax {
                pos: token.map(|t| t.pos),
            });
        }
    }

    /// game : header* round?
    ///
    /// The empty token stream — or headers followed by nothing — is a
    /// valid empty game totalling zero.
    fn game(&mut self) -> u64 {
        while matches!(
            self.peek(),
            Some(Token {
                kind: TokenKind::Header(_),
                ..
            })
        ) {
            self.bump();
        }
        if self.peek().is_none() {
            return 0;
        }
        self.round().captures
    }

    /// round : ROUND_WHITE ply after | RESULT
    fn round(&mut self) -> Rounds {
        if self.failed {
            return Rounds {
                captures: 0,
                marker: None,
            };
        }
        match self.bump() {
            Some(Token {
                kind: TokenKind::RoundWhite(num),
                pos,
            }) => {
                let white = self.ply();
                let after = self.after_white();
                if !self.failed {
                    match after.expect {
                        Expectation::Terminated => (),
                        Expectation::Next(next) => {
                            if next.num != num.saturating_add(1) {
                                self.diagnostics.push(Diagnostic::RoundNumber {
                                    expected: num.saturating_add(1),
                                    actual: next.num,
                                    pos: next.pos,
                                });
                            }
                        }
                        Expectation::Continuation(cont) => {
                            if cont.num != num {
                                self.diagnostics.push(Diagnostic::RoundNumber {
                                    expected: num,
                                    actual: cont.num,
                                    pos: cont.pos,
                                });
                            }
                        }
                    }
                }
                Rounds {
                    captures: white + after.captures,
                    marker: Some(Marker { num, pos }),
                }
            }
            Some(Token {
                kind: TokenKind::Result(_),
                ..
            }) => Rounds {
                captures: 0,
                marker: None,
            },
            other => {
                self.syntax_error(other);
                Rounds {
                    captures: 0,
                    marker: None,
                }
            }
        }
    }

    /// ply : MOVE | CASTLE_KINGSIDE | CASTLE_QUEENSIDE
    fn ply(&mut self) -> u64 {
        if self.failed {
            return 0;
        }
        match self.bump() {
            Some(Token {
                kind: TokenKind::Move { captures },
                ..
            }) => captures,
            Some(Token {
                kind: TokenKind::CastleKingside | TokenKind::CastleQueenside,
                ..
            }) => 0,
            other => {
                self.syntax_error(other);
                0
            }
        }
    }

    /// after : COMMENT cont | black round | RESULT
    ///
    /// A comment directly after the white move forces the continuation
    /// form; the black move then needs its three-period marker.
    fn after_white(&mut self) -> Follow {
        if self.failed {
            return Follow::terminated(0);
        }
        match self.peek().copied() {
            Some(Token {
                kind: TokenKind::Comment { .. },
                ..
            }) => {
                let comment = self.trailing_comment();
                let cont = self.continuation();
                Follow {
                    captures: comment + cont.captures,
                    expect: cont.expect,
                }
            }
            Some(Token {
                kind:
                    TokenKind::Move { .. } | TokenKind::CastleKingside | TokenKind::CastleQueenside,
                ..
            }) => {
                let black = self.black();
                let next = self.round();
                let expect = match next.marker {
                    Some(marker) => Expectation::Next(marker),
                    None => Expectation::Terminated,
                };
                Follow {
                    captures: black + next.captures,
                    expect,
                }
            }
            Some(Token {
                kind: TokenKind::Result(_),
                ..
            }) => {
                self.bump();
                Follow::terminated(0)
            }
            _ => {
                let token = self.bump();
                self.syntax_error(token);
                Follow::terminated(0)
            }
        }
    }

    /// cont : ROUND_CONTINUATION black round | RESULT
    fn continuation(&mut self) -> Follow {
        if self.failed {
            return Follow::terminated(0);
        }
        match self.bump() {
            Some(Token {
                kind: TokenKind::RoundContinuation(num),
                pos,
            }) => {
                let black = self.black();
                let next = self.round();
                if let Some(inner) = next.marker {
                    if !self.failed && inner.num != num.saturating_add(1) {
                        self.diagnostics.push(Diagnostic::RoundNumber {
                            expected: num.saturating_add(1),
                            actual: inner.num,
                            pos: inner.pos,
                        });
                    }
                }
                Follow {
                    captures: black + next.captures,
                    expect: Expectation::Continuation(Marker { num, pos }),
                }
            }
            Some(Token {
                kind: TokenKind::Result(_),
                ..
            }) => Follow::terminated(0),
            other => {
                self.syntax_error(other);
                Follow::terminated(0)
            }
        }
    }

    /// black : ply COMMENT?
    fn black(&mut self) -> u64 {
        let moved = self.ply();
        moved + self.trailing_comment()
    }

    fn trailing_comment(&mut self) -> u64 {
        if self.failed {
            return 0;
        }
        if let Some(Token {
            kind: TokenKind::Comment { captures },
            ..
        }) = self.peek().copied()
        {
            self.bump();
            captures
        } else {
            0
        }
    }
}
