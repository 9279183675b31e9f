// Text Processing Service
// Sentence segmentation and lexicon matching shared by every detector

use regex::Regex;
use std::sync::OnceLock;

fn sentence_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+(?:\s+|$)|\n+").expect("sentence break regex"))
}

/// Case-insensitive substring count, summed over every lexicon entry.
///
/// Each entry counts its own non-overlapping matches independently, so
/// entries that overlap one another ("cover-up" and "cover up", "outrage"
/// and "outrageous") all contribute.
pub fn count_keyword_occurrences<S: AsRef<str>>(text: &str, lexicon: &[S]) -> u32 {
    if text.is_empty() || lexicon.is_empty() {
        return 0;
    }

    let text_lower = text.to_lowercase();
    lexicon
        .iter()
        .map(|kw| kw.as_ref().to_lowercase())
        .filter(|kw| !kw.is_empty())
        .map(|kw| text_lower.matches(kw.as_str()).count() as u32)
        .sum()
}

/// Same semantics as [`count_keyword_occurrences`], for multi-word phrases.
pub fn count_phrase_occurrences<S: AsRef<str>>(text: &str, phrases: &[S]) -> u32 {
    count_keyword_occurrences(text, phrases)
}

/// Split on runs of `.`, `!`, `?` followed by whitespace (or the end of the
/// text), or on newline runs. Terminal punctuation is not kept.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }

    sentence_break_re()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// True on the first lexicon entry found as a substring of the lowercased sentence.
pub fn contains_any_phrase<S: AsRef<str>>(sentence: &str, lexicon: &[S]) -> bool {
    if sentence.is_empty() {
        return false;
    }
    let lower = sentence.to_lowercase();
    lexicon.iter().any(|p| {
        let p = p.as_ref().to_lowercase();
        !p.is_empty() && lower.contains(p.as_str())
    })
}

/// Whole-word matcher built once from a word list.
///
/// `\b` boundaries keep "all" from matching inside "really" or "ballot".
#[derive(Debug, Clone)]
pub struct WordMatcher {
    re: Option<Regex>,
}

impl WordMatcher {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Result<Self, regex::Error> {
        let alternation = words
            .iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .map(|w| regex::escape(&w))
            .collect::<Vec<_>>()
            .join("|");

        if alternation.is_empty() {
            return Ok(Self { re: None });
        }

        let re = Regex::new(&format!(r"\b(?:{})\b", alternation))?;
        Ok(Self { re: Some(re) })
    }

    pub fn is_match(&self, sentence: &str) -> bool {
        match &self.re {
            Some(re) if !sentence.is_empty() => re.is_match(&sentence.to_lowercase()),
            _ => false,
        }
    }
}

/// The four per-sentence predicates used when screening claims.
#[derive(Debug, Clone)]
pub struct SentenceScreen {
    vague_sources: Vec<String>,
    extreme_language: WordMatcher,
    evidence_markers: Vec<String>,
    conspiracy_markers: Vec<String>,
}

impl SentenceScreen {
    pub fn new(
        vague_sources: &[String],
        extreme_language: &[String],
        evidence_markers: &[String],
        conspiracy_markers: &[String],
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            vague_sources: vague_sources.to_vec(),
            extreme_language: WordMatcher::new(extreme_language)?,
            evidence_markers: evidence_markers.to_vec(),
            conspiracy_markers: conspiracy_markers.to_vec(),
        })
    }

    pub fn contains_vague_source(&self, sentence: &str) -> bool {
        contains_any_phrase(sentence, &self.vague_sources)
    }

    pub fn contains_extreme_language(&self, sentence: &str) -> bool {
        self.extreme_language.is_match(sentence)
    }

    pub fn contains_evidence_markers(&self, sentence: &str) -> bool {
        contains_any_phrase(sentence, &self.evidence_markers)
    }

    pub fn contains_conspiracy_markers(&self, sentence: &str) -> bool {
        contains_any_phrase(sentence, &self.conspiracy_markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::config_store::Lexicons;

    fn default_screen() -> SentenceScreen {
        let lex = Lexicons::default();
        SentenceScreen::new(
            &lex.vague_sources,
            &lex.extreme_language,
            &lex.evidence_markers,
            &lex.conspiracy,
        )
        .unwrap()
    }

    #[test]
    fn test_count_keywords_case_insensitive() {
        assert_eq!(count_keyword_occurrences("Shocking! SHOCKING news", &["shocking"]), 2);
        assert_eq!(count_keyword_occurrences("", &["shocking"]), 0);
        let empty: [&str; 0] = [];
        assert_eq!(count_keyword_occurrences("shocking", &empty), 0);
    }

    #[test]
    fn test_count_keywords_overlapping_entries_all_count() {
        let text = "This outrageous cover-up";
        assert_eq!(count_keyword_occurrences(text, &["outrage", "outrageous"]), 2);
        assert_eq!(count_phrase_occurrences(text, &["cover-up", "cover"]), 2);
    }

    #[test]
    fn test_split_into_sentences() {
        let sentences =
            split_into_sentences("First sentence. Second sentence! Third sentence? Fourth sentence.");
        assert_eq!(
            sentences,
            vec!["First sentence", "Second sentence", "Third sentence", "Fourth sentence"]
        );
    }

    #[test]
    fn test_split_into_sentences_newlines_and_blanks() {
        assert!(split_into_sentences("").is_empty());
        assert!(split_into_sentences("  \n\n  ").is_empty());
        let sentences = split_into_sentences("Headline\n\nBody text here!!  Next one");
        assert_eq!(sentences, vec!["Headline", "Body text here", "Next one"]);
    }

    #[test]
    fn test_split_keeps_decimal_points() {
        let sentences = split_into_sentences("Rates rose 2.5 points. Then fell.");
        assert_eq!(sentences, vec!["Rates rose 2.5 points", "Then fell"]);
    }

    #[test]
    fn test_extreme_language_uses_word_boundaries() {
        let screen = default_screen();
        assert!(screen.contains_extreme_language("They ALWAYS lie."));
        assert!(!screen.contains_extreme_language("It was really a small ballot."));
        assert!(!screen.contains_extreme_language(""));
    }

    #[test]
    fn test_sentence_predicates() {
        let screen = default_screen();
        assert!(screen.contains_vague_source("Insiders say the deal is off"));
        assert!(screen.contains_evidence_markers("Dr. Lee presented the findings"));
        assert!(screen.contains_conspiracy_markers("The DEEP STATE is behind it"));
        assert!(!screen.contains_conspiracy_markers("The council met on Tuesday"));
    }

    #[test]
    fn test_word_matcher_empty_list_never_matches() {
        let empty: [&str; 0] = [];
        let matcher = WordMatcher::new(&empty).unwrap();
        assert!(!matcher.is_match("always"));
    }
}
