use regex::{Regex, RegexBuilder};

/// Substring matcher over a fixed set of literal keywords, compiled into one
/// alternation. Keyword text is escaped, so nothing is interpreted as a
/// pattern.
#[derive(Debug)]
pub struct KeywordMatcher {
    pattern: Regex,
}

impl KeywordMatcher {
    /// Returns None when there are no keywords to match on.
    pub fn compile(keywords: &[String], case_sensitive: bool) -> Option<Self> {
        if keywords.is_empty() {
            return None;
        }

        let alternation = keywords
            .iter()
            .map(|keyword| regex::escape(keyword))
            .collect::<Vec<_>>()
            .join("|");

        match RegexBuilder::new(&alternation)
            .case_insensitive(!case_sensitive)
            .build()
        {
            Ok(pattern) => Some(Self { pattern }),
            // Escaped literals always compile; this only trips on a pattern
            // exceeding the regex size limit.
            Err(e) => {
                tracing::warn!("Keyword pattern failed to compile: {e}");
                None
            }
        }
    }

    /// True iff any keyword occurs as a substring. Absent text is treated as
    /// the empty string.
    pub fn is_match(&self, text: Option<&str>) -> bool {
        self.pattern.is_match(text.unwrap_or(""))
    }
}
