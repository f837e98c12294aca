//! Suspicious-content denylist: markup injection, script execution, and
//! common scam phrasing. Not a security boundary; output is still escaped
//! by whatever renders it.

use once_cell::sync::Lazy;
use regex::RegexSet;

/// Word boundaries and classes are ASCII-only, so a non-ASCII letter
/// next to a word separates it.
const PATTERNS: &[(&str, &str)] = &[
    ("script-tag", r"<script[^>]*>.*?</script>"),
    ("iframe-tag", r"<iframe[^>]*>.*?</iframe>"),
    ("javascript-uri", r"javascript:"),
    ("html-data-uri", r"data:text/html"),
    ("vbscript-uri", r"vbscript:"),
    ("event-handler", r"on[0-9A-Za-z_]+\s*="),
    ("eval-call", r"eval\s*\("),
    ("document-write", r"document\.write"),
    ("window-location", r"window\.location"),
    ("phishing", r"(?-u:\b)phishing(?-u:\b)"),
    ("scam", r"(?-u:\b)scam(?-u:\b)"),
    ("urgent-click", r"urgent.*click.*here"),
    ("verify-account", r"verify.*account.*immediately"),
    ("suspended-account", r"suspended.*account"),
    ("click-here-now", r"click.*here.*now"),
    ("limited-offer", r"limited.*time.*offer"),
    ("money-per-day", r"\$[0-9]+.*per.*day"),
    ("work-from-home", r"work.*from.*home.*\$[0-9]+"),
    ("crypto-guarantee", r"crypto.*investment.*guaranteed"),
    ("bitcoin-double", r"bitcoin.*double.*money"),
    ("pharmacy-spam", r"(?-u:\b)(?:viagra|cialis|pharmacy|meds|pills)(?-u:\b)"),
    ("gambling-spam", r"(?-u:\b)(?:casino|poker|gambling|lottery|jackpot)(?-u:\b)"),
];

static SUSPICIOUS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new(PATTERNS.iter().map(|(_, pattern)| format!("(?i){pattern}")))
        .expect("SUSPICIOUS regex set")
});

pub fn has_suspicious_pattern(text: &str) -> bool {
    SUSPICIOUS.is_match(text)
}

/// Label of the first pattern `text` trips, for logs.
pub fn matched_pattern(text: &str) -> Option<&'static str> {
    SUSPICIOUS
        .matches(text)
        .iter()
        .next()
        .map(|index| PATTERNS[index].0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_markup_and_script_injection() {
        assert!(has_suspicious_pattern("<SCRIPT>alert(1)</script>"));
        assert!(has_suspicious_pattern("<a href=\"javascript:void(0)\">x</a>"));
        assert!(has_suspicious_pattern("<img onerror = 'x'>"));
        assert!(has_suspicious_pattern("eval (payload)"));
        assert_eq!(
            matched_pattern("<iframe src=x></iframe>"),
            Some("iframe-tag")
        );
    }

    #[test]
    fn flags_scam_phrasing() {
        assert!(has_suspicious_pattern("URGENT: please click right here"));
        assert!(has_suspicious_pattern("Earn $500 per day"));
        assert!(has_suspicious_pattern("best casino in town"));
        assert_eq!(matched_pattern("this is a scam"), Some("scam"));
    }

    #[test]
    fn word_boundaries_are_ascii() {
        assert!(has_suspicious_pattern("éscam"));
        assert!(has_suspicious_pattern("bonus scamé"));
        assert!(!has_suspicious_pattern("scams"));
    }

    #[test]
    fn ordinary_text_passes() {
        assert!(!has_suspicious_pattern("Lovely site, thanks for sharing!"));
        assert!(!has_suspicious_pattern("scampi for dinner"));
        assert_eq!(matched_pattern("hello there"), None);
    }
}
