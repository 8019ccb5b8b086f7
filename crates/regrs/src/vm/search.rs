// Forward search: advance a candidate start position across the search
// range, invoking the matcher at each candidate.

use super::executor::{MatchOutcome, match_at};
use super::params::MatchParam;
use crate::compiler::{Program, StartAnchor};
use crate::error::{RegexError, RegexResult};
use crate::options::SearchOptions;

/// Search `program` over `search_range`, with anchors evaluated against
/// `full_range`. Returns the first (leftmost) match position with its
/// outcome.
pub(crate) fn search(
    program: &Program,
    subject: &[u8],
    full_range: (usize, usize),
    search_range: (usize, usize),
    opts: SearchOptions,
    param: &MatchParam,
) -> RegexResult<Option<(usize, MatchOutcome)>> {
    let (full_begin, full_end) = full_range;
    let (range_begin, range_end) = search_range;
    if full_begin > full_end || full_end > subject.len() {
        return Err(RegexError::InvalidRange {
            pos: full_end,
            len: subject.len(),
        });
    }
    if range_begin > range_end || range_begin < full_begin || range_end > full_end {
        return Err(RegexError::InvalidRange {
            pos: range_end,
            len: subject.len(),
        });
    }

    let enc = program.encoding();
    let mut retry_in_search = 0usize;

    // a subject-start-anchored program has exactly one candidate
    if program.start_anchor == StartAnchor::Buf {
        if full_begin < range_begin || full_begin > range_end {
            return Ok(None);
        }
        return Ok(match_at(
            program,
            subject,
            full_begin,
            full_end,
            full_begin,
            range_begin,
            opts,
            param,
            &mut retry_in_search,
        )?
        .map(|outcome| (full_begin, outcome)));
    }

    let mut pos = range_begin;
    loop {
        if pos > range_end {
            return Ok(None);
        }

        // candidate skipping; never changes which match is found
        if let Some(prefix) = &program.prefix {
            match find_bytes(&subject[pos..full_end], prefix) {
                Some(off) => {
                    let cand = pos + off;
                    if cand > range_end {
                        return Ok(None);
                    }
                    pos = cand;
                }
                None => return Ok(None),
            }
        } else if let Some(first_bytes) = &program.first_bytes {
            while pos < full_end && pos <= range_end && !first_bytes[subject[pos] as usize] {
                pos += enc.char_len_at(subject, pos);
            }
            if pos > range_end || pos >= full_end {
                return Ok(None);
            }
        } else if program.start_anchor == StartAnchor::Line {
            // only line-begin candidates can match
            while pos <= range_end && pos > full_begin && subject[pos - 1] != b'\n' {
                if pos >= full_end {
                    return Ok(None);
                }
                pos += enc.char_len_at(subject, pos);
            }
            if pos > range_end {
                return Ok(None);
            }
        }

        if let Some(outcome) = match_at(
            program,
            subject,
            full_begin,
            full_end,
            pos,
            range_begin,
            opts,
            param,
            &mut retry_in_search,
        )? {
            return Ok(Some((pos, outcome)));
        }

        if pos >= range_end {
            return Ok(None);
        }
        pos += enc.char_len_at(subject, pos).max(1);
    }
}

/// Naive byte-sequence scan, the prefix fast path.
#[inline]
pub(crate) fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
