// Multi-pattern simultaneous search over one subject.

use std::ops::Range;

use crate::error::{RegexError, RegexResult};
use crate::options::{Options, SearchOptions};
use crate::regex::Regex;
use crate::region::Region;
use crate::vm::{MatchParam, match_at};

/// Which loop leads the set search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lead {
    /// Outer loop over subject positions: the reported position is the
    /// leftmost where any member matches.
    Position,
    /// Outer loop over members, same reported position as `Position`.
    Regex,
    /// First member (by registration order) that matches anywhere wins,
    /// even when a later member matches earlier in the subject.
    PriorityToRegexOrder,
}

/// An ordered collection of `Regex` values sharing one encoding.
/// Members compiled with FIND_LONGEST are rejected: that option conflicts
/// with the set search's leftmost strategy.
#[derive(Debug, Default)]
pub struct RegexSet {
    members: Vec<Regex>,
}

impl RegexSet {
    pub fn new() -> RegexSet {
        RegexSet::default()
    }

    fn validate(&self, re: &Regex) -> RegexResult<()> {
        if re.options().contains(Options::FIND_LONGEST) {
            return Err(RegexError::FindLongestNotAllowed);
        }
        if let Some(first) = self.members.first()
            && first.encoding() != re.encoding()
        {
            return Err(RegexError::EncodingMismatch);
        }
        Ok(())
    }

    /// Append a member. The set is unchanged on rejection.
    pub fn push(&mut self, re: Regex) -> RegexResult<()> {
        self.validate(&re)?;
        self.members.push(re);
        Ok(())
    }

    /// Insert a member at `index`. The set is unchanged on rejection.
    pub fn insert(&mut self, index: usize, re: Regex) -> RegexResult<()> {
        if index > self.members.len() {
            return Err(RegexError::InvalidRange {
                pos: index,
                len: self.members.len(),
            });
        }
        self.validate(&re)?;
        self.members.insert(index, re);
        Ok(())
    }

    /// Replace the member at `index`, returning the old one. The set is
    /// unchanged on rejection.
    pub fn replace(&mut self, index: usize, re: Regex) -> RegexResult<Regex> {
        if index >= self.members.len() {
            return Err(RegexError::InvalidRange {
                pos: index,
                len: self.members.len(),
            });
        }
        self.validate(&re)?;
        Ok(std::mem::replace(&mut self.members[index], re))
    }

    pub fn remove(&mut self, index: usize) -> Option<Regex> {
        if index < self.members.len() {
            Some(self.members.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Regex> {
        self.members.get(index)
    }

    /// One fresh region per member, ready to pass to `search`.
    pub fn regions(&self) -> Vec<Region> {
        self.members.iter().map(|_| Region::new()).collect()
    }

    /// Search all members. On a match, returns `(member_index,
    /// match_start)` and fills that member's entry in `regions`.
    pub fn search(
        &self,
        subject: &[u8],
        range: Range<usize>,
        lead: Lead,
        opts: SearchOptions,
        regions: Option<&mut [Region]>,
    ) -> RegexResult<Option<(usize, usize)>> {
        self.search_with_params(subject, range, lead, opts, &[], regions)
    }

    /// `search` with per-member limit overrides. `params` must be empty
    /// or exactly one entry per member.
    pub fn search_with_params(
        &self,
        subject: &[u8],
        range: Range<usize>,
        lead: Lead,
        opts: SearchOptions,
        params: &[MatchParam],
        mut regions: Option<&mut [Region]>,
    ) -> RegexResult<Option<(usize, usize)>> {
        if !params.is_empty() && params.len() != self.members.len() {
            return Err(RegexError::ParamCountMismatch {
                expected: self.members.len(),
                got: params.len(),
            });
        }
        if let Some(regions) = &regions
            && regions.len() != self.members.len()
        {
            return Err(RegexError::ParamCountMismatch {
                expected: self.members.len(),
                got: regions.len(),
            });
        }
        if range.start > range.end || range.end > subject.len() {
            return Err(RegexError::InvalidRange {
                pos: range.end,
                len: subject.len(),
            });
        }
        if let Some(regions) = regions.as_deref_mut() {
            for region in regions.iter_mut() {
                region.clear();
            }
        }
        if self.members.is_empty() {
            return Ok(None);
        }

        let default_param = MatchParam::default();
        let param_of = |i: usize| -> &MatchParam {
            if params.is_empty() {
                &default_param
            } else {
                &params[i]
            }
        };

        match lead {
            Lead::Position => {
                let enc = self.members[0].encoding();
                let mut retries: Vec<usize> = vec![0; self.members.len()];
                let mut pos = range.start;
                loop {
                    for (i, re) in self.members.iter().enumerate() {
                        let program = match re.program_ref() {
                            Some(p) => p,
                            None => return Err(RegexError::RegexInvalidated),
                        };
                        if let Some(outcome) = match_at(
                            program,
                            subject,
                            0,
                            subject.len(),
                            pos,
                            range.start,
                            opts,
                            param_of(i),
                            &mut retries[i],
                        )? {
                            if let Some(regions) = regions.as_deref_mut() {
                                regions[i].fill(&outcome);
                            }
                            return Ok(Some((i, pos)));
                        }
                    }
                    if pos >= range.end {
                        return Ok(None);
                    }
                    pos += enc.char_len_at(subject, pos).max(1);
                }
            }
            Lead::Regex => {
                let mut best: Option<(usize, usize)> = None;
                for (i, re) in self.members.iter().enumerate() {
                    let upper = match best {
                        // a later member only wins with a strictly
                        // earlier position
                        Some((_, best_pos)) => {
                            if best_pos == range.start {
                                break;
                            }
                            best_pos - 1
                        }
                        None => range.end,
                    };
                    let found = re.search_with_param(
                        subject,
                        range.start..upper.min(range.end),
                        opts,
                        param_of(i),
                        None,
                    )?;
                    if let Some(pos) = found
                        && best.is_none_or(|(_, bp)| pos < bp)
                    {
                        best = Some((i, pos));
                    }
                }
                match best {
                    Some((i, pos)) => {
                        if regions.is_some() {
                            // re-run the winner to populate its region
                            let region = regions
                                .as_deref_mut()
                                .and_then(|r| r.get_mut(i));
                            if let Some(region) = region {
                                self.members[i].search_with_param(
                                    subject,
                                    pos..range.end,
                                    opts,
                                    param_of(i),
                                    Some(region),
                                )?;
                            }
                        }
                        Ok(Some((i, pos)))
                    }
                    None => Ok(None),
                }
            }
            Lead::PriorityToRegexOrder => {
                for (i, re) in self.members.iter().enumerate() {
                    let region = regions.as_deref_mut().and_then(|r| r.get_mut(i));
                    let found = re.search_with_param(
                        subject,
                        range.clone(),
                        opts,
                        param_of(i),
                        region,
                    )?;
                    if let Some(pos) = found {
                        return Ok(Some((i, pos)));
                    }
                }
                Ok(None)
            }
        }
    }
}
