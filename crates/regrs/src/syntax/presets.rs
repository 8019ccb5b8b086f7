// Built-in syntax presets. Each constructor returns a fresh value; callers
// clone and mutate copies freely without affecting other holders.

use super::{MetaCharTable, Syntax, behavior, op};
use crate::options::Options;

const COMMON_ESCAPES: u64 =
    op::ESC_CONTROL_CHARS | op::ESC_OCTAL3 | op::ESC_X_HEX2;

const PERL_CLASSES: u64 =
    op::ESC_W_WORD | op::ESC_D_DIGIT | op::ESC_S_WHITE_SPACE;

impl Syntax {
    /// Plain text: no operators at all, every character matches itself.
    pub fn asis() -> Syntax {
        Syntax::new(0, 0, Options::NONE, MetaCharTable::standard())
    }

    /// POSIX basic regular expressions: grouping and intervals take the
    /// escaped forms, `+`/`?`/`|` are literals.
    pub fn posix_basic() -> Syntax {
        Syntax::new(
            op::DOT_ANYCHAR
                | op::ASTERISK_ZERO_INF
                | op::ESC_BRACE_INTERVAL
                | op::ESC_LPAREN_SUBEXP
                | op::LINE_ANCHOR
                | op::BRACKET_CC
                | op::POSIX_BRACKET
                | op::DECIMAL_BACKREF,
            behavior::ALLOW_INTERVAL_LOW_ABBREV
                | behavior::ALLOW_INVALID_INTERVAL
                | behavior::FIRST_RBRACKET_IN_CC_IS_LITERAL
                | behavior::REPEAT_OP_WITHOUT_TARGET_IS_LITERAL,
            Options::SINGLE_LINE,
            MetaCharTable::standard(),
        )
    }

    /// POSIX extended regular expressions.
    pub fn posix_extended() -> Syntax {
        Syntax::new(
            op::DOT_ANYCHAR
                | op::ASTERISK_ZERO_INF
                | op::PLUS_ONE_INF
                | op::QMARK_ZERO_ONE
                | op::BRACE_INTERVAL
                | op::VBAR_ALT
                | op::LPAREN_SUBEXP
                | op::LINE_ANCHOR
                | op::BRACKET_CC
                | op::POSIX_BRACKET,
            behavior::ALLOW_INTERVAL_LOW_ABBREV
                | behavior::ALLOW_INVALID_INTERVAL
                | behavior::CONTEXT_INDEP_ANCHORS
                | behavior::FIRST_RBRACKET_IN_CC_IS_LITERAL,
            Options::SINGLE_LINE,
            MetaCharTable::standard(),
        )
    }

    /// grep: POSIX basic plus `\|` alternation.
    pub fn grep() -> Syntax {
        let mut s = Syntax::posix_basic();
        s.enable_operators(op::ESC_VBAR_ALT);
        s
    }

    /// Perl-flavored syntax.
    pub fn perl() -> Syntax {
        Syntax::new(
            op::DOT_ANYCHAR
                | op::ASTERISK_ZERO_INF
                | op::PLUS_ONE_INF
                | op::QMARK_ZERO_ONE
                | op::BRACE_INTERVAL
                | op::VBAR_ALT
                | op::LPAREN_SUBEXP
                | op::LINE_ANCHOR
                | op::BRACKET_CC
                | op::POSIX_BRACKET
                | op::DECIMAL_BACKREF
                | op::ESC_AZ_BUF_ANCHOR
                | op::ESC_CAPITAL_Z_BUF_ANCHOR
                | op::ESC_G_BEGIN_ANCHOR
                | op::ESC_B_WORD_BOUND
                | PERL_CLASSES
                | COMMON_ESCAPES
                | op::ESC_X_BRACE_HEX8
                | op::QMARK_NON_CAPTURE_GROUP
                | op::QMARK_OPTION_GROUP
                | op::QMARK_NAMED_GROUP
                | op::ESC_K_NAMED_BACKREF
                | op::QMARK_ATOMIC_GROUP
                | op::QMARK_LOOKAHEAD
                | op::QMARK_LOOKBEHIND
                | op::QMARK_NON_GREEDY
                | op::ESC_P_BRACE_CHAR_PROPERTY
                | op::ESC_CAPITAL_Q_QUOTE,
            behavior::ALLOW_INTERVAL_LOW_ABBREV
                | behavior::ALLOW_INVALID_INTERVAL
                | behavior::BACKSLASH_ESCAPE_IN_CC
                | behavior::FIRST_RBRACKET_IN_CC_IS_LITERAL,
            Options::SINGLE_LINE,
            MetaCharTable::standard(),
        )
    }

    /// Java-flavored syntax: Perl plus possessive repeats and class set
    /// operations.
    pub fn java() -> Syntax {
        let mut s = Syntax::perl();
        s.enable_operators(op::PLUS_POSSESSIVE_REPEAT | op::CCLASS_SET_OP);
        s
    }

    /// Ruby-flavored syntax: named groups, named backreferences,
    /// subexpression calls and capture history.
    pub fn ruby() -> Syntax {
        Syntax::new(
            op::DOT_ANYCHAR
                | op::ASTERISK_ZERO_INF
                | op::PLUS_ONE_INF
                | op::QMARK_ZERO_ONE
                | op::BRACE_INTERVAL
                | op::VBAR_ALT
                | op::LPAREN_SUBEXP
                | op::LINE_ANCHOR
                | op::BRACKET_CC
                | op::POSIX_BRACKET
                | op::DECIMAL_BACKREF
                | op::ESC_AZ_BUF_ANCHOR
                | op::ESC_CAPITAL_Z_BUF_ANCHOR
                | op::ESC_G_BEGIN_ANCHOR
                | op::ESC_B_WORD_BOUND
                | PERL_CLASSES
                | COMMON_ESCAPES
                | op::ESC_X_BRACE_HEX8
                | op::QMARK_NON_CAPTURE_GROUP
                | op::QMARK_OPTION_GROUP
                | op::QMARK_NAMED_GROUP
                | op::ESC_K_NAMED_BACKREF
                | op::ESC_G_SUBEXP_CALL
                | op::ATMARK_CAPTURE_HISTORY
                | op::QMARK_ATOMIC_GROUP
                | op::QMARK_LOOKAHEAD
                | op::QMARK_LOOKBEHIND
                | op::QMARK_NON_GREEDY
                | op::ESC_H_XDIGIT
                | op::ESC_P_BRACE_CHAR_PROPERTY
                | op::ESC_CAPITAL_Q_QUOTE,
            behavior::ALLOW_INTERVAL_LOW_ABBREV
                | behavior::ALLOW_INVALID_INTERVAL
                | behavior::CAPTURE_ONLY_NAMED_GROUP
                | behavior::FORBID_MULTIPLEX_DEFINED_NAME
                | behavior::BACKSLASH_ESCAPE_IN_CC
                | behavior::DIFFERENT_LEN_ALT_LOOK_BEHIND,
            Options::NONE,
            MetaCharTable::standard(),
        )
    }

    /// The engine's native dialect and the process-wide default: Ruby's
    /// operator set plus possessive repeats and class set operations, with
    /// multiplex group names permitted.
    pub fn standard() -> Syntax {
        let mut s = Syntax::ruby();
        s.enable_operators(op::PLUS_POSSESSIVE_REPEAT | op::CCLASS_SET_OP);
        s.set_behaviors(
            behavior::ALLOW_INTERVAL_LOW_ABBREV
                | behavior::ALLOW_INVALID_INTERVAL
                | behavior::CAPTURE_ONLY_NAMED_GROUP
                | behavior::BACKSLASH_ESCAPE_IN_CC
                | behavior::DIFFERENT_LEN_ALT_LOOK_BEHIND,
        );
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ() {
        assert!(Syntax::ruby().enabled(op::ATMARK_CAPTURE_HISTORY));
        assert!(!Syntax::perl().enabled(op::ATMARK_CAPTURE_HISTORY));
        assert!(Syntax::java().enabled(op::PLUS_POSSESSIVE_REPEAT));
        assert!(!Syntax::posix_extended().enabled(op::DECIMAL_BACKREF));
        assert!(Syntax::posix_basic().enabled(op::ESC_LPAREN_SUBEXP));
        assert!(!Syntax::posix_basic().enabled(op::LPAREN_SUBEXP));
        assert_eq!(Syntax::asis().operators(), 0);
    }

    #[test]
    fn test_default_is_standard() {
        assert_eq!(Syntax::default(), Syntax::standard());
    }
}
