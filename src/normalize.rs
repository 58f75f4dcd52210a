//! URL normalization for user-entered link text.
//!
//! Turns free text such as `example.com` or `localhost:8080/path` into an absolute
//! `http://`/`https://` URL, or rejects it. Matching is purely lexical: nothing is
//! parsed into scheme/host/path, and IPv4 groups are not range-checked.

use regex::Regex;
use std::sync::LazyLock;

// Patterns follow ECMAScript regex semantics rather than Unicode-aware `regex` defaults:
// case folding is ASCII-only, `.` stops at every line terminator, and whitespace is the
// set `String.prototype.trim` strips (which includes U+FEFF but not U+0085).

/// Whitespace characters, for use inside a character class.
macro_rules! ws {
    () => {
        r"\t\n\x0B\x0C\r \xA0\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}"
    };
}

/// Any single character except a line terminator.
macro_rules! any {
    () => {
        r"[^\n\r\x{2028}\x{2029}]"
    };
}

/// Optional `:port` and `/path` tail shared by the host patterns.
macro_rules! port_path {
    () => {
        concat!(r"(:[0-9]+)?(/", any!(), r"*)?$")
    };
}

macro_rules! ipv4 {
    () => {
        r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}"
    };
}

static HTTP_SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i-u:https?)://").unwrap());

static LOCALHOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(concat!(r"^(?i-u:localhost)", port_path!())).unwrap());

// `999.999.999.999` is accepted here on purpose; groups are 1-3 digits, nothing more.
static IPV4_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(concat!("^", ipv4!(), port_path!())).unwrap());

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^([a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}",
        port_path!()
    ))
    .unwrap()
});

static WWW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?i-u:www)\.").unwrap());

/// Scheme-prefixed shapes accepted by [`has_valid_protocol`], in the order they are tried.
static VALID_PROTOCOL_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(concat!(
            r"^(?i-u:https?)://[^",
            ws!(),
            r"/$.?#]",
            any!(),
            "[^",
            ws!(),
            "]*$"
        ))
        .unwrap(),
        Regex::new(concat!(r"^(?i-u:https?)://(?i-u:localhost)", port_path!())).unwrap(),
        Regex::new(concat!(r"^(?i-u:https?)://", ipv4!(), port_path!())).unwrap(),
    ]
});

fn is_trim_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Strip leading/trailing whitespace, byte order marks included.
pub fn trim_input(input: &str) -> &str {
    input.trim_matches(is_trim_whitespace)
}

/// Lexical shape of scheme-less input, which decides the scheme that gets prepended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPattern {
    /// `localhost[:port][/path]`
    Localhost,
    /// `a.b.c.d[:port][/path]` with 1-3 digit groups
    Ipv4,
    /// Dotted labels ending in an alphabetic TLD, optional port and path
    Domain,
    /// Anything starting with `www.` that the domain rule rejected
    WwwPrefixed,
}

impl HostPattern {
    /// Every pattern, in match priority order.
    pub const ALL: [HostPattern; 4] = [
        HostPattern::Localhost,
        HostPattern::Ipv4,
        HostPattern::Domain,
        HostPattern::WwwPrefixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostPattern::Localhost => "localhost",
            HostPattern::Ipv4 => "ipv4",
            HostPattern::Domain => "domain",
            HostPattern::WwwPrefixed => "www",
        }
    }

    /// Scheme prepended to input of this shape. Local targets get plain HTTP.
    pub fn scheme(&self) -> &'static str {
        match self {
            HostPattern::Localhost | HostPattern::Ipv4 => "http://",
            HostPattern::Domain | HostPattern::WwwPrefixed => "https://",
        }
    }

    fn regex(&self) -> &'static Regex {
        match self {
            HostPattern::Localhost => &LOCALHOST_RE,
            HostPattern::Ipv4 => &IPV4_RE,
            HostPattern::Domain => &DOMAIN_RE,
            HostPattern::WwwPrefixed => &WWW_RE,
        }
    }

    fn matches(&self, text: &str) -> bool {
        self.regex().is_match(text)
    }
}

/// Returns true if `text` starts with `http://` or `https://`, ignoring case.
pub fn has_http_scheme(text: &str) -> bool {
    HTTP_SCHEME_RE.is_match(text)
}

/// Classify scheme-less text (after trimming). First matching pattern wins.
pub fn classify(input: &str) -> Option<HostPattern> {
    let text = trim_input(input);
    if text.is_empty() {
        return None;
    }
    HostPattern::ALL.into_iter().find(|p| p.matches(text))
}

/// Returns true if `url` has an http(s) scheme followed by something host-shaped.
pub fn has_valid_protocol(url: &str) -> bool {
    VALID_PROTOCOL_RES.iter().any(|re| re.is_match(url))
}

/// Normalize user input into an absolute HTTP(S) URL.
///
/// Input that already carries `http://` or `https://` is returned unchanged (trimmed)
/// when it passes [`has_valid_protocol`]. Otherwise a scheme is inferred from the
/// [`HostPattern`] and the result must still pass [`has_valid_protocol`].
///
/// Returns `None` when the input cannot be read as a URL; there is no finer error.
///
/// ```
/// use miniurl::normalize;
///
/// assert_eq!(normalize("example.com").as_deref(), Some("https://example.com"));
/// assert_eq!(normalize("localhost:8080/path").as_deref(), Some("http://localhost:8080/path"));
/// assert_eq!(normalize("not a url"), None);
/// ```
pub fn normalize(input: &str) -> Option<String> {
    let text = trim_input(input);
    if text.is_empty() {
        return None;
    }

    if has_http_scheme(text) {
        return has_valid_protocol(text).then(|| text.to_string());
    }

    let pattern = classify(text)?;
    let candidate = format!("{}{}", pattern.scheme(), text);
    has_valid_protocol(&candidate).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank_rejected() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize("\t\n"), None);
    }

    #[test]
    fn test_scheme_inference() {
        assert_eq!(normalize("example.com").as_deref(), Some("https://example.com"));
        assert_eq!(normalize("www.example.com").as_deref(), Some("https://www.example.com"));
        assert_eq!(
            normalize("localhost:8080/path").as_deref(),
            Some("http://localhost:8080/path")
        );
        assert_eq!(normalize("192.168.1.1:3000").as_deref(), Some("http://192.168.1.1:3000"));
        assert_eq!(
            normalize("  sub.example.co.uk:8443/a/b?c=d  ").as_deref(),
            Some("https://sub.example.co.uk:8443/a/b?c=d")
        );
    }

    #[test]
    fn test_existing_scheme_kept_verbatim() {
        assert_eq!(normalize("http://example.com").as_deref(), Some("http://example.com"));
        assert_eq!(normalize("HTTPS://Example.com/X").as_deref(), Some("HTTPS://Example.com/X"));
        assert_eq!(normalize("  https://x.co  ").as_deref(), Some("https://x.co"));
    }

    #[test]
    fn test_existing_scheme_must_be_valid() {
        // Needs at least two characters after `://`.
        assert_eq!(normalize("http://a"), None);
        assert_eq!(normalize("https://"), None);
        assert_eq!(normalize("https://.example.com"), None);
        // The second character is unconstrained, only the tail must be whitespace-free.
        assert_eq!(normalize("http://a b").as_deref(), Some("http://a b"));
        assert_eq!(normalize("http://example .com"), None);
    }

    #[test]
    fn test_unsupported_scheme_rejected() {
        assert_eq!(normalize("ftp://example.com"), None);
        assert_eq!(normalize("mailto:someone@example.com"), None);
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(normalize("not a url"), None);
        assert_eq!(normalize("example"), None);
        assert_eq!(normalize("example.c"), None);
        assert_eq!(normalize("-example.com"), None);
        assert_eq!(normalize("example-.com"), None);
    }

    #[test]
    fn test_numeric_tld_rejected() {
        // Three groups fail the IPv4 rule and digits are not a valid TLD.
        assert_eq!(normalize("1.2.3"), None);
        assert_eq!(normalize("1.2.3.4.5"), None);
    }

    #[test]
    fn test_ipv4_groups_not_range_checked() {
        assert_eq!(normalize("999.999.999.999").as_deref(), Some("http://999.999.999.999"));
        assert_eq!(classify("256.0.0.1"), Some(HostPattern::Ipv4));
        assert_eq!(classify("1234.0.0.1"), None);
    }

    #[test]
    fn test_label_length_limit() {
        let ok = format!("{}.com", "a".repeat(63));
        let too_long = format!("{}.com", "a".repeat(64));
        assert_eq!(classify(&ok), Some(HostPattern::Domain));
        assert_ne!(classify(&too_long), Some(HostPattern::Domain));
        assert_eq!(normalize(&too_long), None);
    }

    #[test]
    fn test_www_fallback() {
        // Underscore breaks the domain rule, but the `www.` prefix still rescues it.
        assert_eq!(classify("www.my_site.com"), Some(HostPattern::WwwPrefixed));
        assert_eq!(normalize("www.my_site.com").as_deref(), Some("https://www.my_site.com"));
        assert_eq!(classify("www.example.com"), Some(HostPattern::Domain));
    }

    #[test]
    fn test_www_fallback_still_checked() {
        // `www.` then whitespace only fails the final protocol check.
        assert_eq!(classify("www. x"), Some(HostPattern::WwwPrefixed));
        assert_eq!(normalize("www. x"), None);
        assert_eq!(normalize("www.").as_deref(), Some("https://www."));
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify("localhost"), Some(HostPattern::Localhost));
        assert_eq!(classify("LOCALHOST:3000"), Some(HostPattern::Localhost));
        assert_eq!(classify("10.0.0.1/admin"), Some(HostPattern::Ipv4));
        assert_eq!(classify("example.com"), Some(HostPattern::Domain));
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_host_pattern_scheme() {
        assert_eq!(HostPattern::Localhost.scheme(), "http://");
        assert_eq!(HostPattern::Ipv4.scheme(), "http://");
        assert_eq!(HostPattern::Domain.scheme(), "https://");
        assert_eq!(HostPattern::WwwPrefixed.scheme(), "https://");
        assert_eq!(HostPattern::WwwPrefixed.as_str(), "www");
    }

    #[test]
    fn test_has_valid_protocol() {
        assert!(has_valid_protocol("https://example.com"));
        assert!(has_valid_protocol("http://localhost"));
        assert!(has_valid_protocol("http://127.0.0.1:8000/x"));
        assert!(!has_valid_protocol("https://"));
        assert!(!has_valid_protocol("https:// example.com"));
        assert!(!has_valid_protocol("example.com"));
    }

    #[test]
    fn test_case_folding_is_ascii_only() {
        // U+017F LATIN SMALL LETTER LONG S folds to `s` under Unicode rules.
        assert!(!has_http_scheme("http\u{17F}://example.com"));
        assert_eq!(normalize("http\u{17F}://example.com"), None);
        assert_eq!(classify("localho\u{17F}t:8080"), None);
        assert_eq!(normalize("localho\u{17F}t:8080"), None);
        assert!(!has_valid_protocol("http\u{17F}://example.com"));
        assert!(!has_valid_protocol("http\u{17F}://localhost"));
        // U+212A KELVIN SIGN folds to `k`.
        assert_eq!(classify("\u{212A}.example.com"), None);
        assert_eq!(classify("WwW.my_site"), Some(HostPattern::WwwPrefixed));
    }

    #[test]
    fn test_line_terminators_rejected() {
        assert_eq!(normalize("localhost/a\rb"), None);
        assert_eq!(normalize("localhost/a\nb"), None);
        assert_eq!(normalize("10.0.0.1/a\u{2029}b"), None);
        assert_eq!(normalize("http://10.0.0.1/a\u{2028}b"), None);
        assert_eq!(normalize("example.com/a\rb"), None);
        // Second character after `://` may be anything but a line terminator.
        assert_eq!(normalize("http://a\rb"), None);
        // Only line terminators are excluded there; other whitespace passes.
        assert_eq!(normalize("http://a\u{A0}b").as_deref(), Some("http://a\u{A0}b"));
    }

    #[test]
    fn test_trim_matches_script_whitespace() {
        assert_eq!(normalize("\u{FEFF}example.com").as_deref(), Some("https://example.com"));
        assert_eq!(normalize("example.com\u{3000}").as_deref(), Some("https://example.com"));
        assert_eq!(normalize("\u{FEFF}\u{A0}"), None);
        // NEL is not stripped, so it is left in the path-less host and rejected.
        assert_eq!(trim_input("\u{85}x\u{85}"), "\u{85}x\u{85}");
        assert_eq!(normalize("example.com\u{85}"), None);
        // BOM counts as whitespace inside the URL too.
        assert_eq!(normalize("https://exa\u{FEFF}mple.com"), None);
    }

    #[test]
    fn test_has_http_scheme() {
        assert!(has_http_scheme("http://"));
        assert!(has_http_scheme("HtTpS://x"));
        assert!(!has_http_scheme("ftp://x"));
        assert!(!has_http_scheme(" http://x"));
    }
}
