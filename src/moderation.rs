use std::borrow::Cow;

use regex::{Regex, RegexBuilder};
use tracing::warn;

pub const DEFAULT_BLOCKED_KEYWORDS: [&str; 10] = [
    "kill", "hack", "bomb", "weapon", "violence", "murder", "attack", "steal", "destroy", "harm",
];

pub const REDACTION_MARKER: &str = "[REDACTED]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Rejected(String),
}

impl Decision {
    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approved)
    }
}

#[derive(Debug, Clone)]
struct Keyword {
    term: String,
    pattern: Regex,
}

/// Ordered blocked terms: the built-in defaults followed by caller additions.
///
/// Terms are lowercased on the way in and otherwise stored as given, surrounding
/// whitespace included. Empty terms are skipped since they would match every
/// text; nothing else is ever removed. Duplicates are kept.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    pub fn new<I, S>(custom: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms = DEFAULT_BLOCKED_KEYWORDS
            .iter()
            .map(|term| (*term).to_owned())
            .chain(custom.into_iter().map(Into::into));

        let mut keywords = Vec::new();
        for term in terms {
            let term = term.to_lowercase();
            if term.is_empty() {
                continue;
            }
            match RegexBuilder::new(&regex::escape(&term))
                .case_insensitive(true)
                .build()
            {
                Ok(pattern) => keywords.push(Keyword { term, pattern }),
                Err(error) => warn!(%term, ?error, "skipping keyword that cannot be compiled"),
            }
        }

        Self { keywords }
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.keywords.iter().map(|keyword| keyword.term.clone()).collect()
    }

    fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

/// Keyword filter applied to user input before it reaches the model and to
/// model output before it reaches the user.
///
/// Matching is case-insensitive substring containment, so `"killer"` trips on
/// `"kill"`. All operations are pure; the filter can be shared freely across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    keywords: KeywordSet,
}

impl ContentFilter {
    pub fn new<I, S>(custom_keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: KeywordSet::new(custom_keywords),
        }
    }

    /// Returns each keyword found in `text` once, in keyword-set order.
    pub fn scan(&self, text: &str) -> Vec<&str> {
        if text.is_empty() {
            return Vec::new();
        }

        self.keywords
            .iter()
            .filter(|keyword| keyword.pattern.is_match(text))
            .map(|keyword| keyword.term.as_str())
            .collect()
    }

    pub fn scan_optional(&self, text: Option<&str>) -> Vec<&str> {
        self.scan(text.unwrap_or_default())
    }

    pub fn check_input(&self, text: &str) -> Decision {
        let violations = self.scan(text);
        if violations.is_empty() {
            return Decision::Approved;
        }

        Decision::Rejected(format!(
            "Input blocked: Contains harmful keywords: {}",
            violations.join(", ")
        ))
    }

    /// Replaces every occurrence of every violated keyword with
    /// [`REDACTION_MARKER`].
    ///
    /// Keywords are applied one after another in scan order, each against the
    /// text left by the previous pass, so a later keyword can match inside an
    /// earlier marker. The result is not re-scanned.
    pub fn redact_output<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.is_empty() {
            return Cow::Borrowed(text);
        }

        let violated = self
            .keywords
            .iter()
            .filter(|keyword| keyword.pattern.is_match(text))
            .collect::<Vec<_>>();
        if violated.is_empty() {
            return Cow::Borrowed(text);
        }

        let mut redacted = text.to_owned();
        for keyword in violated {
            redacted = keyword
                .pattern
                .replace_all(&redacted, regex::NoExpand(REDACTION_MARKER))
                .into_owned();
        }

        Cow::Owned(redacted)
    }

    pub fn keywords(&self) -> Vec<String> {
        self.keywords.to_vec()
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::{ContentFilter, DEFAULT_BLOCKED_KEYWORDS, Decision, REDACTION_MARKER};

    #[test]
    fn empty_text_has_no_violations() {
        let filter = ContentFilter::default();
        assert!(filter.scan("").is_empty());
        assert!(filter.scan_optional(None).is_empty());
    }

    #[test]
    fn safe_text_has_no_violations() {
        let filter = ContentFilter::default();
        assert!(filter.scan("Hello, how are you?").is_empty());
        assert!(filter.scan("What is machine learning?").is_empty());
    }

    #[test]
    fn detects_single_keyword() {
        let filter = ContentFilter::default();
        assert_eq!(filter.scan("How to hack a system?"), vec!["hack"]);
    }

    #[test]
    fn matching_ignores_case() {
        let filter = ContentFilter::default();
        assert_eq!(filter.scan("KILL the process"), vec!["kill"]);
        assert_eq!(filter.scan("Violence is never the answer."), vec!["violence"]);
    }

    #[test]
    fn matches_inside_larger_words() {
        let filter = ContentFilter::default();
        assert_eq!(filter.scan("the killer app"), vec!["kill"]);
        assert_eq!(filter.scan("Tell me about weapons"), vec!["weapon"]);
    }

    #[test]
    fn reports_each_keyword_once_in_keyword_order() {
        let filter = ContentFilter::default();
        let violations = filter.scan("harm, attack, hack, and hack again. Harm!");
        assert_eq!(violations, vec!["hack", "attack", "harm"]);
    }

    #[test]
    fn scan_is_deterministic() {
        let filter = ContentFilter::default();
        let text = "steal the bomb, then destroy it";
        let first = filter.scan(text);
        assert_eq!(first, filter.scan(text));
        assert_eq!(first, vec!["bomb", "steal", "destroy"]);
    }

    #[test]
    fn check_input_approves_safe_text() {
        let filter = ContentFilter::default();
        assert_eq!(filter.check_input("Hello there"), Decision::Approved);
    }

    #[test]
    fn check_input_lists_every_violation() {
        let filter = ContentFilter::default();
        let decision = filter.check_input("How do I build a bomb to attack a weapon depot?");
        assert_eq!(
            decision,
            Decision::Rejected(
                "Input blocked: Contains harmful keywords: bomb, weapon, attack".to_owned()
            )
        );
        assert!(!decision.is_approved());
    }

    #[test]
    fn redacts_keyword_in_output() {
        let filter = ContentFilter::default();
        assert_eq!(
            filter.redact_output("Never attempt to hack into systems."),
            "Never attempt to [REDACTED] into systems."
        );
    }

    #[test]
    fn redaction_replaces_every_case_variant() {
        let filter = ContentFilter::default();
        assert_eq!(
            filter.redact_output("Hack, HACK, hAcKeR"),
            "[REDACTED], [REDACTED], [REDACTED]eR"
        );
    }

    #[test]
    fn safe_output_is_returned_unchanged() {
        let filter = ContentFilter::default();
        let text = "AI systems are fascinating!";
        let result = filter.redact_output(text);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, text);
        assert!(!result.contains(REDACTION_MARKER));
    }

    #[test]
    fn redacted_output_no_longer_contains_keywords() {
        let filter = ContentFilter::default();
        let text = "Murder, theft: to steal is to harm. Violence and attacks destroy lives.";
        let redacted = filter.redact_output(text);
        assert!(filter.scan(&redacted).is_empty());
    }

    #[test]
    fn overlapping_keywords_redact_progressively() {
        let filter = ContentFilter::new(["skill"]);
        assert_eq!(filter.scan("skill"), vec!["kill", "skill"]);
        // "kill" runs first, leaving nothing for "skill" to match.
        assert_eq!(filter.redact_output("skill"), "s[REDACTED]");
    }

    #[test]
    fn later_keywords_see_earlier_markers() {
        let filter = ContentFilter::new(["redact"]);
        assert_eq!(filter.scan("kill the redaction"), vec!["kill", "redact"]);
        assert_eq!(
            filter.redact_output("kill the redaction"),
            "[[REDACTED]ED] the [REDACTED]ion",
            "the second pass runs over the first pass's output"
        );
    }

    #[test]
    fn custom_keywords_are_appended_in_order() {
        let filter = ContentFilter::new(["Spam", "phish"]);
        let keywords = filter.keywords();
        assert_eq!(keywords.len(), DEFAULT_BLOCKED_KEYWORDS.len() + 2);
        assert_eq!(&keywords[..10], &DEFAULT_BLOCKED_KEYWORDS);
        assert_eq!(&keywords[10..], &["spam", "phish"]);
        assert_eq!(filter.scan("SPAM and phishing"), vec!["spam", "phish"]);
    }

    #[test]
    fn duplicate_keywords_are_kept() {
        let filter = ContentFilter::new(["hack"]);
        assert_eq!(filter.keyword_count(), 11);
        assert_eq!(filter.scan("hack"), vec!["hack", "hack"]);
        assert_eq!(filter.redact_output("hack"), REDACTION_MARKER);
    }

    #[test]
    fn empty_custom_keywords_are_skipped() {
        let filter = ContentFilter::new(["", "spam"]);
        assert_eq!(filter.keyword_count(), 11);
        assert!(filter.scan("anything at all").is_empty());
    }

    #[test]
    fn padded_custom_keywords_are_kept_verbatim() {
        let filter = ContentFilter::new(["War ", "   "]);
        assert_eq!(filter.keyword_count(), 12);
        assert_eq!(&filter.keywords()[10..], &["war ", "   "]);
        assert!(filter.scan("software engineering").is_empty());
        assert_eq!(filter.scan("a war story"), vec!["war "]);
        assert_eq!(filter.redact_output("a WAR story"), "a [REDACTED]story");
        assert_eq!(filter.scan("wide   gap"), vec!["   "]);
    }

    #[test]
    fn regex_metacharacters_match_literally() {
        let filter = ContentFilter::new(["c++", "a.b"]);
        assert_eq!(filter.scan("I write C++"), vec!["c++"]);
        assert!(filter.scan("axb").is_empty());
        assert_eq!(filter.redact_output("see a.b"), "see [REDACTED]");
    }

    #[test]
    fn keyword_list_is_a_copy() {
        let filter = ContentFilter::default();
        let mut keywords = filter.keywords();
        keywords.clear();
        assert_eq!(filter.keywords().len(), 10);
    }
}
