//! Count extraction: find an employee-count mention in free-form text.
//!
//! Patterns are tried in list order and the first one that yields a
//! parseable number wins, regardless of where in the text the other
//! patterns would have matched.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use tracing::trace;

use crate::error::ExtractorError;

/// Placeholder expanded to the number capture inside pattern sources.
pub const NUMBER_PLACEHOLDER: &str = "{n}";

/// Digits with `,`/`.` separators and an optional `k` scale suffix.
const NUMBER_CAPTURE: &str = r"\b(\d[\d,.]*(?:\s?k\b)?)";

/// Default pattern order.
///
/// Headcount phrases come before labelled fields, so a range such as
/// "Company size: 201-500 employees" reads as its upper bound.
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"(?:approximately|approx\.?|about|around|nearly|over|more\s+than)\s+{n}\s*\+?\s*employees",
    r"{n}\s*\+?\s*employees",
    r"{n}\s*\+?\s*workers",
    r"{n}\s*\+?\s*staff",
    r"company\s+size\s*:?\s*{n}",
    r"team\s+of\s*{n}",
];

/// A successful extraction with its location in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountMatch {
    /// Normalized headcount
    pub count: u64,
    /// Byte offset where the whole pattern match starts
    pub start: usize,
    /// Byte offset where the whole pattern match ends
    pub end: usize,
    /// Index of the winning pattern
    pub pattern: usize,
}

#[derive(Debug, Clone)]
struct CountPattern {
    source: String,
    regex: Regex,
}

impl CountPattern {
    fn compile(source: &str) -> Result<Self, ExtractorError> {
        let expanded = source.replace(NUMBER_PLACEHOLDER, NUMBER_CAPTURE);
        let regex = RegexBuilder::new(&expanded)
            .case_insensitive(true)
            .build()
            .map_err(|e| ExtractorError::InvalidPattern {
                pattern: source.to_string(),
                source: e,
            })?;

        // captures_len counts the implicit whole-match group
        let groups = regex.captures_len() - 1;
        if groups != 1 {
            return Err(ExtractorError::CaptureGroups {
                pattern: source.to_string(),
                groups,
            });
        }

        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }
}

/// Ordered, case-insensitive employee-count patterns.
///
/// Pure and deterministic; safe to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CountExtractor {
    patterns: Vec<CountPattern>,
}

static DEFAULT_COMPILED: LazyLock<Vec<CountPattern>> = LazyLock::new(|| {
    DEFAULT_PATTERNS
        .iter()
        .map(|p| CountPattern::compile(p).unwrap())
        .collect()
});

impl Default for CountExtractor {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_COMPILED.clone(),
        }
    }
}

impl CountExtractor {
    /// Extractor with the default pattern order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor with a custom pattern order.
    ///
    /// Each pattern either contains the `{n}` placeholder or exactly one
    /// capture group holding the number.
    pub fn with_patterns<I, S>(patterns: I) -> Result<Self, ExtractorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| CountPattern::compile(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        if patterns.is_empty() {
            return Err(ExtractorError::Empty);
        }

        Ok(Self { patterns })
    }

    /// Pattern sources in precedence order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.source.as_str())
    }

    /// Find the first pattern (in list order) that yields a count.
    pub fn find(&self, text: &str) -> Option<CountMatch> {
        for (index, pattern) in self.patterns.iter().enumerate() {
            let Some(caps) = pattern.regex.captures(text) else {
                continue;
            };
            let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            match normalize_count(number.as_str()) {
                Some(count) => {
                    trace!(pattern = %pattern.source, raw = number.as_str(), count, "Pattern matched");
                    return Some(CountMatch {
                        count,
                        start: whole.start(),
                        end: whole.end(),
                        pattern: index,
                    });
                }
                None => {
                    trace!(pattern = %pattern.source, raw = number.as_str(), "Capture did not parse");
                }
            }
        }
        None
    }

    /// Extract just the count.
    pub fn extract(&self, text: &str) -> Option<u64> {
        self.find(text).map(|m| m.count)
    }
}

/// Normalize a captured number token to an integer.
///
/// Commas are dropped; a period is a grouping separator when followed by
/// exactly three digits and a decimal point otherwise. A trailing `k`
/// multiplies by 1000. Fractions are truncated. Returns `None` for
/// anything that does not parse.
pub fn normalize_count(raw: &str) -> Option<u64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let (digits, scale) = match compact.strip_suffix(['k', 'K']) {
        Some(rest) => (rest, 1000.0),
        None => (compact.as_str(), 1.0),
    };

    let cleaned = strip_separators(digits);
    if cleaned.is_empty() {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    let product = value * scale;
    // 1.15 * 1000 lands just below 1150 in binary floating point
    let scaled = if (product - product.round()).abs() < 1e-6 {
        product.round()
    } else {
        product.trunc()
    };
    if !scaled.is_finite() || scaled < 0.0 || scaled >= u64::MAX as f64 {
        return None;
    }
    Some(scaled as u64)
}

fn strip_separators(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len());
    for (i, c) in digits.char_indices() {
        match c {
            ',' => {}
            '.' => {
                let run = digits[i + 1..]
                    .chars()
                    .take_while(|d| d.is_ascii_digit())
                    .count();
                if run != 3 {
                    out.push('.');
                }
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grouped_thousands() {
        let extractor = CountExtractor::new();
        assert_eq!(extractor.extract("1,234 employees"), Some(1234));
        assert_eq!(extractor.extract("1.234 Employees worldwide"), Some(1234));
    }

    #[test]
    fn test_k_suffix() {
        let extractor = CountExtractor::new();
        assert_eq!(extractor.extract("5k+ employees"), Some(5000));
        assert_eq!(extractor.extract("1.5K employees"), Some(1500));
        assert_eq!(extractor.extract("about 12 k employees"), Some(12000));
    }

    #[test]
    fn test_no_digits_no_match() {
        let extractor = CountExtractor::new();
        assert_eq!(extractor.extract("abc employees"), None);
        assert_eq!(extractor.extract(""), None);
        assert_eq!(extractor.extract("we are hiring"), None);
    }

    #[test]
    fn test_case_insensitive() {
        let extractor = CountExtractor::new();
        assert_eq!(extractor.extract("COMPANY SIZE: 250"), Some(250));
        assert_eq!(extractor.extract("Team Of 12"), Some(12));
    }

    #[test]
    fn test_pattern_order_beats_text_position() {
        let extractor =
            CountExtractor::with_patterns([r"team\s+of\s*{n}", r"{n}\s*employees"]).unwrap();
        let text = "We have 200 employees. Our core is a team of 50 engineers.";
        let found = extractor.find(text).unwrap();
        assert_eq!(found.count, 50);
        assert_eq!(found.pattern, 0);

        let reversed =
            CountExtractor::with_patterns([r"{n}\s*employees", r"team\s+of\s*{n}"]).unwrap();
        assert_eq!(reversed.extract(text), Some(200));
    }

    #[test]
    fn test_default_order_prefers_employees_over_staff() {
        let extractor = CountExtractor::new();
        let text = "Over 300 staff. Company size: 1,001 employees";
        assert_eq!(extractor.extract(text), Some(1001));
    }

    #[test]
    fn test_size_range_reads_upper_bound() {
        let extractor = CountExtractor::new();
        assert_eq!(extractor.extract("company size: 201-500 employees"), Some(500));
        assert_eq!(
            extractor.extract("Company size\n1,001-5,000 Employees"),
            Some(5000)
        );
        // a bare labelled field still matches when no phrase does
        assert_eq!(extractor.extract("Company size: 51-200"), Some(51));
    }

    #[test]
    fn test_qualified_phrase_span_includes_qualifier() {
        let extractor = CountExtractor::new();
        let text = "Acme has approximately 210 employees.";
        let found = extractor.find(text).unwrap();
        assert_eq!(found.pattern, 0);
        assert_eq!(&text[found.start..found.end], "approximately 210 employees");
    }

    #[test]
    fn test_unparseable_capture_falls_through() {
        let extractor = CountExtractor::new();
        let text = "Company size: 1..5, and a team of 40";
        assert_eq!(extractor.extract(text), Some(40));
    }

    #[test]
    fn test_match_span_covers_phrase() {
        let extractor = CountExtractor::new();
        let text = "Intro. 450 employees in Singapore.";
        let found = extractor.find(text).unwrap();
        assert_eq!(&text[found.start..found.end], "450 employees");
    }

    #[test]
    fn test_custom_patterns_validated() {
        assert!(matches!(
            CountExtractor::with_patterns(Vec::<String>::new()),
            Err(ExtractorError::Empty)
        ));
        assert!(matches!(
            CountExtractor::with_patterns([r"(\d+) (\w+) employees"]),
            Err(ExtractorError::CaptureGroups { groups: 2, .. })
        ));
        assert!(matches!(
            CountExtractor::with_patterns([r"([\d"]),
            Err(ExtractorError::InvalidPattern { .. })
        ));
        assert!(CountExtractor::with_patterns([r"headcount:\s*(\d+)"]).is_ok());
    }

    #[test]
    fn test_normalize_count() {
        assert_eq!(normalize_count("1,234"), Some(1234));
        assert_eq!(normalize_count("1.234.567"), Some(1_234_567));
        assert_eq!(normalize_count("12.7"), Some(12));
        assert_eq!(normalize_count("5k"), Some(5000));
        assert_eq!(normalize_count("2.5 K"), Some(2500));
        assert_eq!(normalize_count("1.15k"), Some(1150));
        assert_eq!(normalize_count("500."), Some(500));
        assert_eq!(normalize_count("1..5"), None);
        assert_eq!(normalize_count(","), None);
        assert_eq!(normalize_count("k"), None);
    }

    proptest! {
        #[test]
        fn prop_extract_never_panics(text in ".{0,300}") {
            let extractor = CountExtractor::new();
            let _ = extractor.extract(&text);
        }

        #[test]
        fn prop_plain_counts_roundtrip(n in 0u32..10_000_000) {
            let extractor = CountExtractor::new();
            let text = format!("The firm has {} employees today", n);
            prop_assert_eq!(extractor.extract(&text), Some(n as u64));
        }

        #[test]
        fn prop_comma_grouped_counts(n in 1_000u32..10_000_000) {
            let extractor = CountExtractor::new();
            let digits = n.to_string();
            let mut grouped = String::new();
            for (i, c) in digits.chars().enumerate() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    grouped.push(',');
                }
                grouped.push(c);
            }
            let text = format!("{} staff", grouped);
            prop_assert_eq!(extractor.extract(&text), Some(n as u64));
        }
    }
}
