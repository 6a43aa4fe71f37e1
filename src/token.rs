use crate::types::{Outcome, Position, RawHeader};

/// A single lexical item of game text.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub pos: Position,
}

/// What a token is, with its scalar payload where one exists.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TokenKind<'a> {
    /// A round marker like `12.`, introducing a white move.
    RoundWhite(u64),
    /// A continuation marker like `12...`, resuming a round whose white
    /// move was followed by a comment.
    RoundContinuation(u64),
    /// A move in algebraic notation. The payload is the number of
    /// capture markers in the matched text (a count, not a flag).
    Move { captures: u64 },
    /// `O-O`.
    CastleKingside,
    /// `O-O-O`.
    CastleQueenside,
    /// A game result.
    Result(Outcome),
    /// One complete comment, however deeply nested, with the number of
    /// capturing moves mentioned anywhere in its span.
    Comment { captures: u64 },
    /// A header line, opaque to the grammar.
    Header(RawHeader<'a>),
}
