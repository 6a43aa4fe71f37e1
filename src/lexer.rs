//! The default-mode scanner.
//!
//! Tokens are produced on demand from a byte slice; nothing is
//! allocated per token. Comment delimiters hand control to the
//! exclusive mode in [`crate::comment`]. An unrecognized byte records a
//! diagnostic, skips exactly one position and resumes — scanning never
//! aborts.

use crate::comment::{self, CommentKind};
use crate::diagnostic::Diagnostic;
use crate::san;
use crate::token::{Token, TokenKind};
use crate::types::{Color, Outcome, Position, RawHeader};

/// On-demand tokenizer for one game body.
#[derive(Clone, Debug)]
pub struct Lexer<'a> {
    pub(crate) pgn: &'a [u8],
    pub(crate) pos: usize,
    pub(crate) line: u64,
}

impl<'a> Lexer<'a> {
    pub fn new(pgn: &'a [u8]) -> Lexer<'a> {
        Lexer {
            pgn,
            pos: 0,
            line: 1,
        }
    }

    pub(crate) fn position(&self) -> Position {
        Position {
            offset: self.pos,
            line: self.line,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.pgn.get(self.pos) {
            match ch {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                }
                _ => break,
            }
        }
    }

    /// Produces the next token, appending any lexical diagnostics to
    /// `diagnostics`. Returns `None` at the end of the input.
    pub fn next_token(&mut self, diagnostics: &mut Vec<Diagnostic>) -> Option<Token<'a>> {
        loop {
            self.skip_whitespace();
            let pos = self.position();
            let ch = *self.pgn.get(self.pos)?;

            if let b'{' | b'(' = ch {
                let kind = if ch == b'{' {
                    CommentKind::Brace
                } else {
                    CommentKind::Paren
                };
                match comment::scan(self, kind, diagnostics) {
                    Some(token) => return Some(token),
                    // A malformed comment produced no token; resume.
                    None => continue,
                }
            }

            let token = match ch {
                b'[' => self.header(pos),
                b'0'..=b'9' => self.result_or_round(pos),
                b'O' => self.castle(pos),
                _ => self.movetext(pos),
            };
            match token {
                Some(token) => return Some(token),
                None => {
                    diagnostics.push(Diagnostic::InvalidCharacter { ch, pos });
                    self.pos += 1;
                }
            }
        }
    }

    /// `O-O-O` must win over its own prefix `O-O`.
    fn castle(&mut self, pos: Position) -> Option<Token<'a>> {
        let rest = &self.pgn[self.pos..];
        if rest.starts_with(b"O-O-O") {
            self.pos += 5;
            Some(Token {
                kind: TokenKind::CastleQueenside,
                pos,
            })
        } else if rest.starts_with(b"O-O") {
            self.pos += 3;
            Some(Token {
                kind: TokenKind::CastleKingside,
                pos,
            })
        } else {
            None
        }
    }

    /// Digits open a canonical result, a round marker, or (via a bare
    /// rank disambiguator) a move.
    fn result_or_round(&mut self, pos: Position) -> Option<Token<'a>> {
        let rest = &self.pgn[self.pos..];
        let result = if rest.starts_with(b"1/2-1/2") {
            Some((7, Outcome::Draw))
        } else if rest.starts_with(b"1-0") {
            Some((
                3,
                Outcome::Decisive {
                    winner: Color::White,
                },
            ))
        } else if rest.starts_with(b"0-1") {
            Some((
                3,
                Outcome::Decisive {
                    winner: Color::Black,
                },
            ))
        } else {
            None
        };
        if let Some((len, outcome)) = result {
            self.pos += len;
            return Some(Token {
                kind: TokenKind::Result(outcome),
                pos,
            });
        }

        let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
        let periods = rest[digits..]
            .iter()
            .take(3)
            .take_while(|&&b| b == b'.')
            .count();
        if periods == 0 {
            return self.movetext(pos);
        }
        let num = btoi::btou(&rest[..digits]).unwrap_or(u64::MAX);
        if periods == 3 {
            self.pos += digits + 3;
            Some(Token {
                kind: TokenKind::RoundContinuation(num),
                pos,
            })
        } else {
            // Two periods lex as a one-period marker plus a stray dot.
            self.pos += digits + 1;
            Some(Token {
                kind: TokenKind::RoundWhite(num),
                pos,
            })
        }
    }

    fn movetext(&mut self, pos: Position) -> Option<Token<'a>> {
        let m = san::match_move(&self.pgn[self.pos..])?;
        self.pos += m.len;
        Some(Token {
            kind: TokenKind::Move {
                captures: m.captures,
            },
            pos,
        })
    }

    /// A header line: `[`, a key, one whitespace byte, a quoted value,
    /// `]`, then end of line or end of input. The key admits ASCII
    /// alphanumerics and any non-ASCII byte; the value admits anything
    /// but `[`, `]` and `|`, with its closing quote immediately before
    /// the bracket. The trailing line break is consumed with the match
    /// but excluded from the token.
    fn header(&mut self, pos: Position) -> Option<Token<'a>> {
        let rest = &self.pgn[self.pos..];
        let mut i = 1;
        while matches!(rest.get(i), Some(&b) if b.is_ascii_alphanumeric() || b >= 0x80) {
            i += 1;
        }
        if i == 1 {
            return None;
        }
        if !matches!(rest.get(i), Some(&(b' ' | b'\t' | b'\r' | b'\n'))) {
            return None;
        }
        i += 1;
        if rest.get(i) != Some(&b'"') {
            return None;
        }
        i += 1;
        let value = i;
        while matches!(rest.get(i), Some(&b) if !matches!(b, b'[' | b']' | b'|')) {
            i += 1;
        }
        if rest.get(i) != Some(&b']') || i < value + 2 || rest[i - 1] != b'"' {
            return None;
        }
        i += 1;
        let matched = match rest.get(i) {
            None => i,
            Some(&b'\n') => i + 1,
            Some(_) => return None,
        };
        self.line += memchr::memchr_iter(b'\n', &rest[..matched]).count() as u64;
        self.pos += matched;
        Some(Token {
            kind: TokenKind::Header(RawHeader(&rest[..i])),
            pos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(pgn: &[u8]) -> (Vec<TokenKind<'_>>, Vec<Diagnostic>) {
        let mut lexer = Lexer::new(pgn);
        let mut diagnostics = Vec::new();
        let mut kinds = Vec::new();
        while let Some(token) = lexer.next_token(&mut diagnostics) {
            kinds.push(token.kind);
        }
        (kinds, diagnostics)
    }

    #[test]
    fn plain_game() {
        let (kinds, diagnostics) = lex(b"1. e4 e5 2. Nf3 Nc6 1-0");
        assert_eq!(
            kinds,
            vec![
                TokenKind::RoundWhite(1),
                TokenKind::Move { captures: 0 },
                TokenKind::Move { captures: 0 },
                TokenKind::RoundWhite(2),
                TokenKind::Move { captures: 0 },
                TokenKind::Move { captures: 0 },
                TokenKind::Result(Outcome::Decisive {
                    winner: Color::White,
                }),
            ]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn continuation_marker_beats_single_periods() {
        let (kinds, diagnostics) = lex(b"12... exd5");
        assert_eq!(
            kinds,
            vec![
                TokenKind::RoundContinuation(12),
                TokenKind::Move { captures: 1 },
            ]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn two_periods_leave_a_stray_dot() {
        let (kinds, diagnostics) = lex(b"3.. e4");
        assert_eq!(
            kinds,
            vec![TokenKind::RoundWhite(3), TokenKind::Move { captures: 0 }]
        );
        assert_eq!(
            diagnostics,
            vec![Diagnostic::InvalidCharacter {
                ch: b'.',
                pos: Position { offset: 2, line: 1 },
            }]
        );
    }

    #[test]
    fn castles() {
        let (kinds, diagnostics) = lex(b"O-O-O O-O");
        assert_eq!(
            kinds,
            vec![TokenKind::CastleQueenside, TokenKind::CastleKingside]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn draw_result() {
        let (kinds, _) = lex(b"1/2-1/2");
        assert_eq!(kinds, vec![TokenKind::Result(Outcome::Draw)]);
    }

    #[test]
    fn header_line() {
        let (kinds, diagnostics) = lex(b"[Event \"F/S Return Match\"]\n1. e4 e5 0-1");
        assert_eq!(kinds.len(), 5);
        assert!(
            matches!(kinds[0], TokenKind::Header(raw) if raw.as_bytes() == b"[Event \"F/S Return Match\"]")
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn header_at_end_of_input_needs_no_newline() {
        let (kinds, diagnostics) = lex(b"[Site \"?\"]");
        assert_eq!(kinds.len(), 1);
        assert!(matches!(kinds[0], TokenKind::Header(_)));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn malformed_header_is_an_invalid_bracket() {
        let (_, diagnostics) = lex(b"[Event broken\n");
        assert_eq!(
            diagnostics.first(),
            Some(&Diagnostic::InvalidCharacter {
                ch: b'[',
                pos: Position { offset: 0, line: 1 },
            })
        );
    }

    #[test]
    fn invalid_character_recovery_is_one_byte() {
        let (kinds, diagnostics) = lex(b"& e4");
        assert_eq!(kinds, vec![TokenKind::Move { captures: 0 }]);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::InvalidCharacter {
                ch: b'&',
                pos: Position { offset: 0, line: 1 },
            }]
        );
    }

    #[test]
    fn lines_advance_on_newlines() {
        let mut lexer = Lexer::new(b"1. e4\ne5");
        let mut diagnostics = Vec::new();
        lexer.next_token(&mut diagnostics);
        lexer.next_token(&mut diagnostics);
        let black = lexer.next_token(&mut diagnostics);
        assert!(matches!(
            black,
            Some(Token {
                pos: Position { line: 2, offset: 6 },
                ..
            })
        ));
    }
}
