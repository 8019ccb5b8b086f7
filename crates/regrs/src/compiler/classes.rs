// Character classes: sorted scalar ranges, named properties, negation and
// `&&` intersection chains.

use crate::encoding::Encoding;

/// A named character property, matched through the encoding's
/// classification tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharProp {
    Alpha,
    Alnum,
    Ascii,
    Blank,
    Cntrl,
    Digit,
    Graph,
    Lower,
    Print,
    Punct,
    Space,
    Upper,
    Word,
    XDigit,
}

impl CharProp {
    /// Look up a POSIX bracket / property name (ASCII case-insensitive).
    pub fn by_name(name: &str) -> Option<CharProp> {
        let lower = name.to_ascii_lowercase();
        Some(match lower.as_str() {
            "alpha" | "alphabetic" | "l" | "letter" => CharProp::Alpha,
            "alnum" => CharProp::Alnum,
            "ascii" => CharProp::Ascii,
            "blank" => CharProp::Blank,
            "cntrl" => CharProp::Cntrl,
            "digit" | "n" | "nd" => CharProp::Digit,
            "graph" => CharProp::Graph,
            "lower" | "lowercase" => CharProp::Lower,
            "print" => CharProp::Print,
            "punct" => CharProp::Punct,
            "space" | "whitespace" => CharProp::Space,
            "upper" | "uppercase" => CharProp::Upper,
            "word" | "w" => CharProp::Word,
            "xdigit" => CharProp::XDigit,
            _ => return None,
        })
    }

    pub fn matches(self, c: u32, enc: Encoding) -> bool {
        let ch = match char::from_u32(c) {
            Some(ch) => ch,
            None => return false,
        };
        match self {
            CharProp::Alpha => match enc {
                Encoding::Ascii => ch.is_ascii_alphabetic(),
                _ => ch.is_alphabetic(),
            },
            CharProp::Alnum => match enc {
                Encoding::Ascii => ch.is_ascii_alphanumeric(),
                _ => ch.is_alphanumeric(),
            },
            CharProp::Ascii => c < 0x80,
            CharProp::Blank => matches!(ch, ' ' | '\t'),
            CharProp::Cntrl => ch.is_control(),
            CharProp::Digit => enc.is_digit(c),
            CharProp::Graph => ch.is_ascii_graphic() || (c >= 0x80 && !ch.is_whitespace() && !ch.is_control()),
            CharProp::Lower => ch.is_lowercase(),
            CharProp::Print => ch == ' ' || CharProp::Graph.matches(c, enc),
            CharProp::Punct => ch.is_ascii_punctuation() || (c >= 0x80 && !ch.is_alphanumeric() && !ch.is_whitespace() && !ch.is_control()),
            CharProp::Space => enc.is_space(c),
            CharProp::Upper => ch.is_uppercase(),
            CharProp::Word => enc.is_word(c),
            CharProp::XDigit => ch.is_ascii_hexdigit(),
        }
    }
}

/// One property item inside a class; `negated` covers `\W`-style members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropItem {
    pub prop: CharProp,
    pub negated: bool,
}

/// A character class. Membership is
/// `(in ranges || any prop matches) ^ negated`, then intersected with the
/// chained class when `&&` was used.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharClass {
    ranges: Vec<(u32, u32)>,
    props: Vec<PropItem>,
    /// Nested classes unioned in as members (e.g. `[[^a-c]x]`).
    subs: Vec<CharClass>,
    negated: bool,
    intersect: Option<Box<CharClass>>,
}

impl CharClass {
    pub fn new() -> CharClass {
        CharClass::default()
    }

    pub fn from_prop(prop: CharProp, negated: bool) -> CharClass {
        let mut cc = CharClass::new();
        cc.add_prop(prop, negated);
        cc
    }

    pub fn add_char(&mut self, c: u32) {
        self.add_range(c, c);
    }

    /// Insert `[lo, hi]`, keeping ranges sorted and merged.
    pub fn add_range(&mut self, lo: u32, hi: u32) {
        debug_assert!(lo <= hi);
        let idx = self
            .ranges
            .partition_point(|&(_, h)| lo > 0 && h < lo - 1);
        let mut lo = lo;
        let mut hi = hi;
        let mut end = idx;
        while end < self.ranges.len() && self.ranges[end].0 <= hi.saturating_add(1) {
            lo = lo.min(self.ranges[end].0);
            hi = hi.max(self.ranges[end].1);
            end += 1;
        }
        self.ranges.splice(idx..end, [(lo, hi)]);
    }

    pub fn add_prop(&mut self, prop: CharProp, negated: bool) {
        self.props.push(PropItem { prop, negated });
    }

    /// Merge another plain class's members into this one.
    pub fn union(&mut self, other: &CharClass) {
        for &(lo, hi) in &other.ranges {
            self.add_range(lo, hi);
        }
        self.props.extend(other.props.iter().copied());
        self.subs.extend(other.subs.iter().cloned());
    }

    /// Add a nested class as a member: a character in the nested class
    /// is in this one.
    pub fn add_sub(&mut self, sub: CharClass) {
        self.subs.push(sub);
    }

    pub fn negate(&mut self) {
        self.negated = !self.negated;
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty() && self.props.is_empty() && self.subs.is_empty() && !self.negated
    }

    /// Chain an `&&` intersection operand.
    pub fn set_intersect(&mut self, other: CharClass) {
        self.intersect = Some(Box::new(other));
    }

    #[inline]
    fn in_ranges(&self, c: u32) -> bool {
        let idx = self.ranges.partition_point(|&(_, h)| h < c);
        idx < self.ranges.len() && self.ranges[idx].0 <= c
    }

    /// True when this class is a plain positive member set that can be
    /// merged into another via `union`.
    pub fn is_plain(&self) -> bool {
        !self.negated && self.intersect.is_none()
    }

    pub fn matches(&self, c: u32, enc: Encoding) -> bool {
        let mut hit = self.in_ranges(c);
        if !hit {
            for item in &self.props {
                if item.prop.matches(c, enc) != item.negated {
                    hit = true;
                    break;
                }
            }
        }
        if !hit {
            hit = self.subs.iter().any(|sub| sub.matches(c, enc));
        }
        // intersection binds before negation: [^a&&b] is ¬(a ∩ b)
        if hit && let Some(rhs) = &self.intersect {
            hit = rhs.matches(c, enc);
        }
        hit != self.negated
    }

    /// Class membership under case folding: the character or its fold
    /// partner is in the class.
    pub fn matches_fold(&self, c: u32, enc: Encoding) -> bool {
        if self.matches(c, enc) {
            return true;
        }
        let folded = enc.simple_fold(c);
        if folded != c && self.matches(folded, enc) {
            return true;
        }
        let unfolded = simple_unfold(c, enc);
        unfolded != c && self.matches(unfolded, enc)
    }

    /// Single first-byte candidates for the search prefilter: `Some` only
    /// when every member is a known ASCII scalar.
    pub fn ascii_byte_set(&self) -> Option<Vec<u8>> {
        if self.negated
            || !self.props.is_empty()
            || !self.subs.is_empty()
            || self.intersect.is_some()
        {
            return None;
        }
        let mut out = Vec::new();
        for &(lo, hi) in &self.ranges {
            if hi >= 0x80 {
                return None;
            }
            for b in lo..=hi {
                out.push(b as u8);
            }
        }
        Some(out)
    }
}

/// Inverse of `Encoding::simple_fold`: lower to upper, single char only.
fn simple_unfold(c: u32, enc: Encoding) -> u32 {
    match enc {
        Encoding::Ascii => {
            if (c as u8).is_ascii_lowercase() {
                c - 32
            } else {
                c
            }
        }
        Encoding::Latin1 => {
            if (c as u8).is_ascii_lowercase() || (0xe0..=0xfe).contains(&c) && c != 0xf7 {
                c - 32
            } else {
                c
            }
        }
        Encoding::Utf8 => match char::from_u32(c) {
            Some(ch) => {
                let mut it = ch.to_uppercase();
                let first = it.next().unwrap_or(ch);
                if it.next().is_some() { c } else { first as u32 }
            }
            None => c,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_merge() {
        let mut cc = CharClass::new();
        cc.add_range(b'a' as u32, b'f' as u32);
        cc.add_range(b'e' as u32, b'k' as u32);
        cc.add_char(b'l' as u32);
        assert!(cc.matches(b'a' as u32, Encoding::Ascii));
        assert!(cc.matches(b'l' as u32, Encoding::Ascii));
        assert!(!cc.matches(b'm' as u32, Encoding::Ascii));
    }

    #[test]
    fn test_negation_and_props() {
        let mut cc = CharClass::from_prop(CharProp::Digit, false);
        assert!(cc.matches(b'7' as u32, Encoding::Ascii));
        cc.negate();
        assert!(!cc.matches(b'7' as u32, Encoding::Ascii));
        assert!(cc.matches(b'x' as u32, Encoding::Ascii));
    }

    #[test]
    fn test_intersection() {
        // [a-w] && [^c-g]
        let mut lhs = CharClass::new();
        lhs.add_range(b'a' as u32, b'w' as u32);
        let mut rhs = CharClass::new();
        rhs.add_range(b'c' as u32, b'g' as u32);
        rhs.negate();
        lhs.set_intersect(rhs);
        assert!(lhs.matches(b'a' as u32, Encoding::Ascii));
        assert!(!lhs.matches(b'd' as u32, Encoding::Ascii));
        assert!(!lhs.matches(b'z' as u32, Encoding::Ascii));
    }

    #[test]
    fn test_fold_match() {
        let mut cc = CharClass::new();
        cc.add_char(b'a' as u32);
        assert!(cc.matches_fold(b'A' as u32, Encoding::Ascii));
        let mut upper = CharClass::new();
        upper.add_char(b'A' as u32);
        assert!(upper.matches_fold(b'a' as u32, Encoding::Ascii));
    }
}
