//! Shell-style wildcard patterns for ACL objects and functions.
//!
//! # Syntax
//!
//! | Token | Matches |
//! |-------|---------|
//! | `*` | Any sequence of characters, including `/` and `.` |
//! | `?` | Exactly one character |
//! | `[abc]`, `[a-z]` | One character from the class |
//! | `[!a]`, `[^a]` | One character outside the class |
//! | `[[:digit:]]` | Named classes (`alpha`, `digit`, `alnum`, `upper`, `lower`, `xdigit`, `space`, `blank`, `punct`, `cntrl`, `print`, `graph`), ASCII only |
//! | `[[.c.]]`, `[[=c=]]` | The single character `c` |
//!
//! There is no escape character: `\` is an ordinary literal. A `]` directly
//! after the opening `[` (or `[!`, `[^`) is a class member. A `[` with no
//! closing `]` is an ordinary character and the rest of the pattern keeps
//! its wildcards. A class naming an unknown `[:class:]` matches nothing.
//!
//! Patterns are rewritten into the dialect of [`glob::Pattern`] once, when
//! compiled; matching never re-parses.
//!
//! # Prefix Keys
//!
//! Every pattern has a *prefix key*: its literal text up to the first
//! wildcard character. ACL entries are ordered by this key so a lookup only
//! needs to consider entries whose key is a literal prefix of the queried
//! object name.

use glob::{MatchOptions, Pattern};
use tracing::warn;

/// Characters that start a wildcard construct.
pub const WILDCARD_CHARS: &[char] = &['*', '?', '['];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Returns the literal leading part of `pattern`, before any of `*?[`.
///
/// # Example
///
/// ```
/// use warden_auth::pattern::prefix_key;
///
/// assert_eq!(prefix_key("network.interface.*"), "network.interface.");
/// assert_eq!(prefix_key("file"), "file");
/// assert_eq!(prefix_key("*"), "");
/// ```
#[must_use]
pub fn prefix_key(pattern: &str) -> &str {
    let end = pattern.find(WILDCARD_CHARS).unwrap_or(pattern.len());
    &pattern[..end]
}

/// A compiled wildcard pattern.
///
/// # Example
///
/// ```
/// use warden_auth::pattern::GlobPattern;
///
/// let p = GlobPattern::new("fs.*");
/// assert!(p.matches("fs.read"));
/// assert!(!p.matches("net.read"));
///
/// let p = GlobPattern::new("cfg.[^s]*");
/// assert!(p.matches("cfg.network"));
/// assert!(!p.matches("cfg.system"));
/// ```
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Glob(Pattern),
    Never,
}

impl GlobPattern {
    /// Compiles `source`.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let matcher = match translate(source) {
            None => Matcher::Never,
            Some(rewritten) => match Pattern::new(&rewritten) {
                Ok(pattern) => Matcher::Glob(pattern),
                Err(e) => {
                    warn!(pattern = %source, rewritten = %rewritten, error = %e, "wildcard pattern rejected, it will match nothing");
                    Matcher::Never
                }
            },
        };
        Self {
            source: source.to_string(),
            matcher,
        }
    }

    /// Returns the pattern text as granted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if `candidate` matches.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match &self.matcher {
            Matcher::Glob(pattern) => pattern.matches_with(candidate, MATCH_OPTIONS),
            Matcher::Never => false,
        }
    }
}

/// Inclusive character range; a single character is `(c, c)`.
type Span = (char, char);

enum Bracket {
    /// No closing `]`: the `[` is an ordinary character.
    Unterminated,
    /// Names an unknown `[:class:]`.
    Invalid,
    Class {
        negated: bool,
        members: Vec<Span>,
        /// Characters consumed after the opening `[`, closing `]` included.
        len: usize,
    },
}

/// Rewrites a shell pattern into `glob` syntax.
///
/// Returns `None` for a pattern that can never match.
fn translate(source: &str) -> Option<String> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len() + 8);
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                // `glob` only accepts `**` as a whole path component.
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
                out.push('*');
            }
            '?' => out.push('?'),
            '[' => match parse_bracket(&chars[i + 1..]) {
                Bracket::Unterminated => push_literal('[', &mut out),
                Bracket::Invalid => return None,
                Bracket::Class {
                    negated,
                    members,
                    len,
                } => {
                    if !render_class(negated, &members, &mut out) {
                        return None;
                    }
                    i += len;
                }
            },
            c => push_literal(c, &mut out),
        }
        i += 1;
    }
    Some(out)
}

/// Parses a bracket expression; `rest` starts just after the `[`.
fn parse_bracket(rest: &[char]) -> Bracket {
    let mut i = 0;
    let negated = matches!(rest.first(), Some('!' | '^'));
    if negated {
        i += 1;
    }

    let mut members = Vec::new();
    let mut first = true;
    loop {
        let Some(&c) = rest.get(i) else {
            return Bracket::Unterminated;
        };
        if c == ']' && !first {
            return Bracket::Class {
                negated,
                members,
                len: i + 1,
            };
        }
        first = false;

        if c == '[' && rest.get(i + 1) == Some(&':') {
            if let Some((name, used)) = class_name(&rest[i + 2..]) {
                match named_class(&name) {
                    Some(spans) => members.extend_from_slice(spans),
                    None => return Bracket::Invalid,
                }
                i += 2 + used;
                continue;
            }
        }

        let (lo, used) = match (c, rest.get(i + 1), rest.get(i + 2), rest.get(i + 3)) {
            ('[', Some(&(d @ ('.' | '='))), Some(&sym), Some(&end))
                if end == d && rest.get(i + 4) == Some(&']') =>
            {
                (sym, 5)
            }
            _ => (c, 1),
        };
        i += used;

        match (rest.get(i), rest.get(i + 1)) {
            (Some('-'), Some(&hi)) if hi != ']' => {
                members.push((lo, hi));
                i += 2;
            }
            _ => members.push((lo, lo)),
        }
    }
}

/// Reads `name:]` after a `[:`; returns the name and characters consumed.
fn class_name(rest: &[char]) -> Option<(String, usize)> {
    let len = rest.iter().take_while(|c| c.is_ascii_lowercase()).count();
    (rest.get(len) == Some(&':') && rest.get(len + 1) == Some(&']'))
        .then(|| (rest[..len].iter().collect(), len + 2))
}

fn named_class(name: &str) -> Option<&'static [Span]> {
    let spans: &'static [Span] = match name {
        "alpha" => &[('a', 'z'), ('A', 'Z')],
        "digit" => &[('0', '9')],
        "alnum" => &[('0', '9'), ('a', 'z'), ('A', 'Z')],
        "upper" => &[('A', 'Z')],
        "lower" => &[('a', 'z')],
        "xdigit" => &[('0', '9'), ('a', 'f'), ('A', 'F')],
        "space" => &[(' ', ' '), ('\t', '\r')],
        "blank" => &[(' ', ' '), ('\t', '\t')],
        "punct" => &[('!', '/'), (':', '@'), ('[', '`'), ('{', '~')],
        "cntrl" => &[('\0', '\x1f'), ('\x7f', '\x7f')],
        "print" => &[(' ', '~')],
        "graph" => &[('!', '~')],
        _ => return None,
    };
    Some(spans)
}

/// Characters `glob` treats specially inside a class, with their neighbours.
const CLASS_SPECIALS: [(char, char, char); 3] = [('!', ' ', '"'), ('-', ',', '.'), (']', '\\', '^')];

/// Appends `[..]` in `glob` syntax; returns `false` if the class is empty.
///
/// `glob` ends a class at the first `]` after its first member, reads any
/// `x-y` triple as a range, and treats a leading `!` as negation. So `]`
/// goes first, `-` goes last, and `!` never leads a non-negated class.
fn render_class(negated: bool, members: &[Span], out: &mut String) -> bool {
    let mut specials = [false; CLASS_SPECIALS.len()];
    let mut plain: Vec<Span> = Vec::new();

    for &(lo, hi) in members {
        if lo > hi {
            continue;
        }
        let mut start = lo;
        for (slot, &(special, before, after)) in CLASS_SPECIALS.iter().enumerate() {
            if special < start || special > hi {
                continue;
            }
            if special > start {
                plain.push((start, before));
            }
            specials[slot] = true;
            start = after;
        }
        if start <= hi {
            plain.push((start, hi));
        }
    }
    let [bang, dash, bracket] = specials;

    if plain.is_empty() && !bracket {
        match (negated, bang, dash) {
            (false, false, false) => return false,
            (true, false, false) => {
                out.push('?');
                return true;
            }
            (false, true, false) => {
                out.push('!');
                return true;
            }
            _ => {}
        }
    }

    let has_lead = negated || bracket || !plain.is_empty();
    out.push('[');
    if negated {
        out.push('!');
    }
    if bracket {
        out.push(']');
    }
    for (lo, hi) in plain {
        out.push(lo);
        if hi != lo {
            out.push('-');
            out.push(hi);
        }
    }
    match (has_lead, bang, dash) {
        // `!` cannot open a non-negated class.
        (false, true, true) => out.push_str("-!"),
        (_, true, true) => out.push_str("!-"),
        (_, true, false) => out.push('!'),
        (_, false, true) => out.push('-'),
        (_, false, false) => {}
    }
    out.push(']');
    true
}

/// Appends `c` so that `glob` reads it literally.
fn push_literal(c: char, out: &mut String) {
    if matches!(c, '*' | '?' | '[' | ']') {
        out.push('[');
        out.push(c);
        out.push(']');
    } else {
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_key_stops_at_first_wildcard() {
        assert_eq!(prefix_key("a.b?c*"), "a.b");
        assert_eq!(prefix_key("uci.[ab]*"), "uci.");
        assert_eq!(prefix_key(""), "");
        assert_eq!(prefix_key("plain"), "plain");
    }

    #[test]
    fn prefix_key_respects_multibyte() {
        assert_eq!(prefix_key("ünïcode*"), "ünïcode");
    }

    #[test]
    fn star_crosses_separators() {
        let p = GlobPattern::new("*");
        assert!(p.matches(""));
        assert!(p.matches("a/b.c"));

        let p = GlobPattern::new("network.*");
        assert!(p.matches("network.interface.lan"));
        assert!(p.matches("network."));
        assert!(!p.matches("network"));
    }

    #[test]
    fn question_mark_is_single_char() {
        let p = GlobPattern::new("eth?");
        assert!(p.matches("eth0"));
        assert!(!p.matches("eth"));
        assert!(!p.matches("eth10"));
    }

    #[test]
    fn character_classes() {
        let p = GlobPattern::new("wlan[0-2]");
        assert!(p.matches("wlan1"));
        assert!(!p.matches("wlan3"));

        let p = GlobPattern::new("x[!a]");
        assert!(p.matches("xb"));
        assert!(!p.matches("xa"));
    }

    #[test]
    fn caret_negates_like_bang() {
        let p = GlobPattern::new("[^a]");
        assert!(!p.matches("a"));
        assert!(p.matches("b"));
        assert!(p.matches("^"));

        let p = GlobPattern::new("cfg.[^s]*");
        assert!(!p.matches("cfg.system"));
        assert!(p.matches("cfg.network"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(!GlobPattern::new("Read").matches("read"));
    }

    #[test]
    fn leading_dot_is_not_special() {
        assert!(GlobPattern::new("*").matches(".hidden"));
    }

    #[test]
    fn double_star_behaves_like_single() {
        let p = GlobPattern::new("fs.**");
        assert!(p.matches("fs.a/b"));
        assert!(!p.matches("net.a"));
    }

    #[test]
    fn backslash_is_literal() {
        let p = GlobPattern::new(r"a\*");
        assert!(p.matches(r"a\xyz"));
        assert!(!p.matches("a*"));
    }

    #[test]
    fn unterminated_bracket_is_literal_and_rest_stays_wild() {
        let p = GlobPattern::new("broken[");
        assert!(p.matches("broken["));
        assert!(!p.matches("broken"));
        assert_eq!(p.as_str(), "broken[");

        assert!(GlobPattern::new("a[*").matches("a[xyz"));
        assert!(GlobPattern::new("*[").matches("ab["));
    }

    #[test]
    fn unknown_named_class_matches_nothing() {
        let p = GlobPattern::new("x[[:bogus:]]");
        assert!(!p.matches("x"));
        assert!(!p.matches("xa"));
        assert!(!p.matches("x[[:bogus:]]"));
    }

    /// Expected results follow POSIX `fnmatch` with `FNM_NOESCAPE`.
    #[test]
    fn fnmatch_parity() {
        let cases: &[(&str, &str, bool)] = &[
            // negation
            ("[^a]", "a", false),
            ("[^a]", "b", true),
            ("[^a]", "^", true),
            ("[!a]", "^", true),
            ("[!a-c]", "d", true),
            ("[!a-c]", "b", false),
            ("[!!]", "!", false),
            ("[!!]", "x", true),
            // `]` as first member
            ("[]]", "]", true),
            ("[]a]", "a", true),
            ("[]a]", "b", false),
            ("[!]]", "]", false),
            ("[!]]", "x", true),
            ("[^]a]", "]", false),
            ("[^]a]", "b", true),
            ("[]-a]", "^", true),
            // `-` and `!` placement
            ("[a-]", "-", true),
            ("[-a]", "-", true),
            ("[-a]", "b", false),
            ("[!-]", "-", false),
            ("[!-]", "a", true),
            ("[a!]", "!", true),
            ("[--/]", ".", true),
            ("[--/]", "0", false),
            ("[ -\"]", "!", true),
            ("[c-a]", "b", false),
            // literal metacharacters inside classes
            ("[[]", "[", true),
            ("[*?]", "*", true),
            ("[*?]", "x", false),
            ("a?c", "a]c", true),
            // unterminated brackets
            ("a[*", "a[xyz", true),
            ("*[", "ab[", true),
            ("[", "[", true),
            ("[]", "[]", true),
            ("[!]", "[!]", true),
            ("a[b", "ab", false),
            // named classes
            ("x[[:digit:]]", "x1", true),
            ("x[[:digit:]]", "xa", false),
            ("[[:alpha:][:digit:]]", "Q", true),
            ("[[:alpha:]_]", "_", true),
            ("[![:space:]]", " ", false),
            ("[![:space:]]", "a", true),
            ("[[:upper:]]", "a", false),
            ("[[:punct:]]", "-", true),
            ("[[:punct:]]", "]", true),
            ("[[:punct:]]", "!", true),
            ("[[:punct:]]", "a", false),
            ("[[:xdigit:]]*", "Fz", true),
            ("[[:]", ":", true),
            // collating and equivalence forms
            ("[[.a.]]", "a", true),
            ("[[=b=]]", "b", true),
            ("[[.a.]-c]", "b", true),
        ];
        for &(pattern, candidate, expected) in cases {
            assert_eq!(
                GlobPattern::new(pattern).matches(candidate),
                expected,
                "{pattern:?} vs {candidate:?}"
            );
        }
    }

    #[test]
    fn translate_output() {
        assert_eq!(translate("a***b*c").as_deref(), Some("a*b*c"));
        assert_eq!(translate("[^a]").as_deref(), Some("[!a]"));
        assert_eq!(translate("a[").as_deref(), Some("a[[]"));
        assert_eq!(translate("[!]").as_deref(), Some("[[]![]]"));
        assert_eq!(translate("[a!-]").as_deref(), Some("[a!-]"));
        assert_eq!(translate("[!-]").as_deref(), Some("[!-]"));
        assert_eq!(translate("[-!]").as_deref(), Some("[-!]"));
        assert_eq!(translate("[[:bogus:]]"), None);
        assert_eq!(translate("[c-a]"), None);
    }
}
