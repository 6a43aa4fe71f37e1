//! Matching of move text like `exd5`, `Nf3+` or `R1xe4`.
//!
//! The same pattern is used in two modes: the scanner matches moves
//! with an optional capture marker, while comment spans are swept for
//! non-overlapping occurrences with the marker required.

use memchr::memchr_iter;

/// A successful move-text match.
#[derive(Copy, Clone, Debug)]
pub(crate) struct MoveMatch {
    /// Matched length in bytes.
    pub len: usize,
    /// Number of `x` bytes in the matched text (a count, not a flag).
    pub captures: u64,
}

fn is_piece(b: u8) -> bool {
    matches!(b, b'P' | b'N' | b'B' | b'Q' | b'K' | b'R')
}

fn is_file(b: u8) -> bool {
    matches!(b, b'a'..=b'h')
}

fn is_rank(b: u8) -> bool {
    matches!(b, b'1'..=b'8')
}

fn is_capture(b: u8) -> bool {
    b == b'x'
}

/// Matches `piece? file? rank? x? <file><rank> suffix?` at the start of
/// `s`. Optional elements prefer presence, earlier elements first, so
/// the winner is what a backtracking matcher would pick.
fn match_san(s: &[u8], capture_required: bool) -> Option<MoveMatch> {
    'combos: for mask in (0u8..16).rev() {
        if capture_required && mask & 1 == 0 {
            continue;
        }
        let groups: [(bool, fn(u8) -> bool); 4] = [
            (mask & 8 != 0, is_piece),
            (mask & 4 != 0, is_file),
            (mask & 2 != 0, is_rank),
            (mask & 1 != 0, is_capture),
        ];
        let mut len = 0;
        for (present, in_class) in groups {
            if present {
                match s.get(len) {
                    Some(&b) if in_class(b) => len += 1,
                    _ => continue 'combos,
                }
            }
        }
        match (s.get(len), s.get(len + 1)) {
            (Some(&file), Some(&rank)) if is_file(file) && is_rank(rank) => len += 2,
            _ => continue 'combos,
        }
        if matches!(s.get(len), Some(&(b'+' | b'#' | b'?' | b'!'))) {
            len += 1;
        }
        return Some(MoveMatch {
            len,
            captures: memchr_iter(b'x', &s[..len]).count() as u64,
        });
    }
    None
}

/// Matches one move at the start of `s`, capture marker optional.
pub(crate) fn match_move(s: &[u8]) -> Option<MoveMatch> {
    match_san(s, false)
}

/// Counts non-overlapping capturing moves anywhere in `span`, nested
/// delimiters and all.
pub(crate) fn count_capture_moves(span: &[u8]) -> u64 {
    let mut captures = 0;
    let mut pos = 0;
    while pos < span.len() {
        match match_san(&span[pos..], true) {
            Some(m) => {
                captures += 1;
                pos += m.len;
            }
            None => pos += 1,
        }
    }
    captures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(s: &[u8]) -> Option<(usize, u64)> {
        match_move(s).map(|m| (m.len, m.captures))
    }

    #[test]
    fn plain_moves() {
        assert_eq!(matched(b"e4"), Some((2, 0)));
        assert_eq!(matched(b"Nf3"), Some((3, 0)));
        assert_eq!(matched(b"Pe4"), Some((3, 0)));
        assert_eq!(matched(b"h8"), Some((2, 0)));
    }

    #[test]
    fn captures() {
        assert_eq!(matched(b"exd5"), Some((4, 1)));
        assert_eq!(matched(b"Qxd5"), Some((4, 1)));
        assert_eq!(matched(b"bxc4"), Some((4, 1)));
        assert_eq!(matched(b"xe4"), Some((3, 1)));
    }

    #[test]
    fn disambiguation() {
        assert_eq!(matched(b"Ngf3"), Some((4, 0)));
        assert_eq!(matched(b"N1f3"), Some((4, 0)));
        assert_eq!(matched(b"R1xe4"), Some((5, 1)));
        // A bare rank can disambiguate without a piece letter.
        assert_eq!(matched(b"1d4"), Some((3, 0)));
    }

    #[test]
    fn suffixes() {
        assert_eq!(matched(b"Nf3+"), Some((4, 0)));
        assert_eq!(matched(b"dxe4#"), Some((5, 1)));
        assert_eq!(matched(b"e4!"), Some((3, 0)));
        // Only a single suffix character belongs to the move.
        assert_eq!(matched(b"e4!?"), Some((3, 0)));
    }

    #[test]
    fn rejections() {
        assert_eq!(matched(b""), None);
        assert_eq!(matched(b"x"), None);
        assert_eq!(matched(b"O-O"), None);
        assert_eq!(matched(b"1-0"), None);
        assert_eq!(matched(b"i9"), None);
    }

    #[test]
    fn longest_prefix_wins() {
        // Trailing text does not extend the match.
        assert_eq!(matched(b"e4 e5"), Some((2, 0)));
        assert_eq!(matched(b"exd5)"), Some((4, 1)));
    }

    #[test]
    fn comment_sweep() {
        assert_eq!(count_capture_moves(b"comment text Nxc3"), 1);
        assert_eq!(count_capture_moves(b"{exd4 (Nxf3)}"), 2);
        assert_eq!(count_capture_moves(b"no captures, just e4 and Nf3"), 0);
        assert_eq!(count_capture_moves(b"xd4xe5"), 2);
        assert_eq!(count_capture_moves(b""), 0);
    }
}
