// A compiled pattern. Owns the program and snapshots of the Syntax,
// Encoding and Options it was built with; the snapshot never changes even
// if the caller mutates the preset it came from.

use std::ops::Range;

use crate::compiler::{Program, compile};
use crate::defaults;
use crate::encoding::Encoding;
use crate::error::{RegexError, RegexResult};
use crate::options::{Options, SearchOptions};
use crate::region::Region;
use crate::syntax::Syntax;
use crate::vm::{MatchParam, match_at, search};

pub struct Regex {
    /// `None` after a failed recompile: the regex is poisoned and every
    /// match/search reports `RegexInvalidated`.
    program: Option<Program>,
    pattern: Vec<u8>,
    syntax: Syntax,
    encoding: Encoding,
    options: Options,
}

impl Regex {
    /// Compile with the process-wide default syntax and encoding.
    pub fn new(pattern: &[u8]) -> RegexResult<Regex> {
        let syntax = defaults::default_syntax();
        Regex::with_options(
            pattern,
            defaults::default_encoding(),
            Options::NONE,
            &syntax,
        )
    }

    /// Compile with an explicit syntax, default encoding, no options.
    pub fn with_syntax(pattern: &[u8], syntax: &Syntax) -> RegexResult<Regex> {
        Regex::with_options(pattern, defaults::default_encoding(), Options::NONE, syntax)
    }

    /// Full-argument constructor.
    pub fn with_options(
        pattern: &[u8],
        encoding: Encoding,
        options: Options,
        syntax: &Syntax,
    ) -> RegexResult<Regex> {
        let program = compile(pattern, encoding, options, syntax)?;
        Ok(Regex {
            program: Some(program),
            pattern: pattern.to_vec(),
            syntax: syntax.clone(),
            encoding,
            options,
        })
    }

    /// Recompile in place. Either the new program fully replaces the old
    /// one, or the error poisons this regex: it never keeps executing a
    /// stale program after a failed reset.
    pub fn reset(&mut self, pattern: &[u8]) -> RegexResult<()> {
        match compile(pattern, self.encoding, self.options, &self.syntax) {
            Ok(program) => {
                self.program = Some(program);
                self.pattern = pattern.to_vec();
                Ok(())
            }
            Err(e) => {
                self.program = None;
                self.pattern = pattern.to_vec();
                Err(e.into())
            }
        }
    }

    fn program(&self) -> RegexResult<&Program> {
        self.program.as_ref().ok_or(RegexError::RegexInvalidated)
    }

    pub(crate) fn program_ref(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    // ===== matching =====

    /// Match requiring the match to begin exactly at `at`. Returns the
    /// matched byte length; `Ok(None)` is a mismatch, not an error.
    pub fn match_at(&self, subject: &[u8], at: usize) -> RegexResult<Option<usize>> {
        self.match_at_with(
            subject,
            at,
            SearchOptions::NONE,
            &MatchParam::default(),
            None,
        )
    }

    /// `match_at` with search options, limits, and an optional region to
    /// populate on success.
    pub fn match_at_with(
        &self,
        subject: &[u8],
        at: usize,
        opts: SearchOptions,
        param: &MatchParam,
        region: Option<&mut Region>,
    ) -> RegexResult<Option<usize>> {
        let program = self.program()?;
        if at > subject.len() {
            return Err(RegexError::InvalidRange {
                pos: at,
                len: subject.len(),
            });
        }
        let mut retry_in_search = 0usize;
        let outcome = match_at(
            program,
            subject,
            0,
            subject.len(),
            at,
            at,
            opts,
            param,
            &mut retry_in_search,
        )?;
        match outcome {
            Some(outcome) => {
                if let Some(region) = region {
                    region.fill(&outcome);
                }
                Ok(Some(outcome.len))
            }
            None => {
                if let Some(region) = region {
                    region.clear();
                }
                Ok(None)
            }
        }
    }

    /// Whole-string convenience: does the pattern match somewhere?
    pub fn is_match(&self, subject: &[u8]) -> RegexResult<bool> {
        Ok(self.search(subject)?.is_some())
    }

    // ===== searching =====

    /// First match anywhere in `subject` as `(begin, end)`.
    pub fn search(&self, subject: &[u8]) -> RegexResult<Option<(usize, usize)>> {
        let mut region = Region::new();
        match self.search_with_region(subject, &mut region)? {
            Some(start) => {
                let end = region.end(0).unwrap_or(start);
                Ok(Some((start, end)))
            }
            None => Ok(None),
        }
    }

    /// First match anywhere, populating `region`. Returns the match
    /// start.
    pub fn search_with_region(
        &self,
        subject: &[u8],
        region: &mut Region,
    ) -> RegexResult<Option<usize>> {
        self.search_with_param(
            subject,
            0..subject.len(),
            SearchOptions::NONE,
            &MatchParam::default(),
            Some(region),
        )
    }

    /// Search a sub-range. Anchors still evaluate against the whole
    /// subject, so resuming after a previous match keeps `^`/`\A`
    /// semantics intact.
    pub fn search_in(
        &self,
        subject: &[u8],
        range: Range<usize>,
        opts: SearchOptions,
        region: Option<&mut Region>,
    ) -> RegexResult<Option<usize>> {
        self.search_with_param(subject, range, opts, &MatchParam::default(), region)
    }

    /// The full search entry point.
    pub fn search_with_param(
        &self,
        subject: &[u8],
        range: Range<usize>,
        opts: SearchOptions,
        param: &MatchParam,
        region: Option<&mut Region>,
    ) -> RegexResult<Option<usize>> {
        let program = self.program()?;
        let found = search(
            program,
            subject,
            (0, subject.len()),
            (range.start, range.end),
            opts,
            param,
        )?;
        match found {
            Some((pos, outcome)) => {
                if let Some(region) = region {
                    region.fill(&outcome);
                }
                Ok(Some(pos))
            }
            None => {
                if let Some(region) = region {
                    region.clear();
                }
                Ok(None)
            }
        }
    }

    /// Repeated non-overlapping search. `callback` receives the match
    /// index, the match start and the populated region; returning `false`
    /// stops the scan. Returns the number of matches reported.
    pub fn scan<F>(
        &self,
        subject: &[u8],
        opts: SearchOptions,
        region: &mut Region,
        mut callback: F,
    ) -> RegexResult<usize>
    where
        F: FnMut(usize, usize, &Region) -> bool,
    {
        let program = self.program()?;
        let enc = program.encoding();
        let mut count = 0usize;
        let mut from = 0usize;
        loop {
            let found = self.search_with_param(
                subject,
                from..subject.len(),
                opts,
                &MatchParam::default(),
                Some(&mut *region),
            )?;
            let start = match found {
                Some(start) => start,
                None => return Ok(count),
            };
            let end = region.end(0).unwrap_or(start);
            if !callback(count, start, region) {
                return Ok(count + 1);
            }
            count += 1;
            // step over empty matches so the scan always advances
            from = if end > start {
                end
            } else if end < subject.len() {
                end + enc.char_len_at(subject, end)
            } else {
                return Ok(count);
            };
            if from > subject.len() {
                return Ok(count);
            }
        }
    }

    // ===== introspection =====

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Capture groups, the whole-match slot excluded. Fixed at compile.
    pub fn group_count(&self) -> usize {
        self.program
            .as_ref()
            .map_or(0, |p| p.group_count() as usize)
    }

    /// Distinct group names. Fixed at compile.
    pub fn named_group_count(&self) -> usize {
        self.program
            .as_ref()
            .map_or(0, |p| p.named_group_count() as usize)
    }

    /// Capture-history groups. Fixed at compile.
    pub fn history_count(&self) -> usize {
        self.program
            .as_ref()
            .map_or(0, |p| p.history_count() as usize)
    }

    /// All group numbers a name maps to, ascending. Multiplex names map
    /// to several.
    pub fn group_numbers_by_name(&self, name: &str) -> Option<&[u16]> {
        self.program.as_ref()?.group_numbers_by_name(name)
    }

    /// Iterate the name table; the callback returns `false` to stop.
    /// Returns `false` when stopped early.
    pub fn foreach_name<F>(&self, mut callback: F) -> bool
    where
        F: FnMut(&str, &[u16]) -> bool,
    {
        if let Some(program) = &self.program {
            for (name, groups) in program.names() {
                if !callback(name.as_str(), groups) {
                    return false;
                }
            }
        }
        true
    }

    /// The group number for `name` that participated in the match held
    /// by `region`. With multiplex names the most recently numbered
    /// participating group wins.
    pub fn backref_by_name(&self, name: &str, region: &Region) -> Option<u16> {
        let groups = self.group_numbers_by_name(name)?;
        groups
            .iter()
            .rev()
            .find(|&&g| region.range(g as usize).is_some())
            .copied()
    }

    /// Ranges of every slot `name` maps to, in group-number order.
    pub fn name_ranges(&self, name: &str, region: &Region) -> Option<Vec<Option<(usize, usize)>>> {
        let groups = self.group_numbers_by_name(name)?;
        Some(
            groups
                .iter()
                .map(|&g| region.range(g as usize))
                .collect(),
        )
    }
}

impl std::fmt::Debug for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Regex")
            .field("pattern", &String::from_utf8_lossy(&self.pattern))
            .field("encoding", &self.encoding)
            .field("valid", &self.program.is_some())
            .finish()
    }
}
