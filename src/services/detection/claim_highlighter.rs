// Claim Highlighter
// Scores sentences for fact-check worthiness and surfaces the most suspicious ones

use crate::services::text_processor::{split_into_sentences, SentenceScreen};

const VAGUE_SOURCE_POINTS: u32 = 2;
const EXTREME_LANGUAGE_POINTS: u32 = 1;
const MISSING_EVIDENCE_POINTS: u32 = 1;
const CONSPIRACY_POINTS: u32 = 2;

#[derive(Debug, Clone)]
pub struct ClaimHighlighter {
    screen: SentenceScreen,
    threshold: u32,
    max_claims: usize,
}

impl ClaimHighlighter {
    pub fn new(screen: SentenceScreen, threshold: u32, max_claims: usize) -> Self {
        Self {
            screen,
            threshold,
            max_claims,
        }
    }

    /// Suspicion score of a single sentence, 0..=6.
    pub fn score_sentence(&self, sentence: &str) -> u32 {
        let mut score = 0;
        if self.screen.contains_vague_source(sentence) {
            score += VAGUE_SOURCE_POINTS;
        }
        if self.screen.contains_extreme_language(sentence) {
            score += EXTREME_LANGUAGE_POINTS;
        }
        if !self.screen.contains_evidence_markers(sentence) {
            score += MISSING_EVIDENCE_POINTS;
        }
        if self.screen.contains_conspiracy_markers(sentence) {
            score += CONSPIRACY_POINTS;
        }
        score
    }

    /// Sentences at or above the threshold, in document order, truncated.
    pub fn identify_suspicious_claims(&self, text: &str) -> Vec<String> {
        split_into_sentences(text)
            .into_iter()
            .filter(|sentence| self.score_sentence(sentence) >= self.threshold)
            .take(self.max_claims)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::config_store::Lexicons;

    fn highlighter() -> ClaimHighlighter {
        let lex = Lexicons::default();
        let screen = SentenceScreen::new(
            &lex.vague_sources,
            &lex.extreme_language,
            &lex.evidence_markers,
            &lex.conspiracy,
        )
        .unwrap();
        ClaimHighlighter::new(screen, 3, 5)
    }

    #[test]
    fn test_empty_text_has_no_claims() {
        assert!(highlighter().identify_suspicious_claims("").is_empty());
    }

    #[test]
    fn test_sentence_scores() {
        let h = highlighter();
        assert_eq!(h.score_sentence("The council met on Tuesday"), 1);
        assert_eq!(h.score_sentence("Sources say the vote was rigged"), 3);
        assert_eq!(h.score_sentence("Sources say it is always a cover-up"), 6);
        assert_eq!(h.score_sentence("Allegedly, a study found otherwise"), 2);
    }

    #[test]
    fn test_claims_keep_document_order() {
        let text = "Sources say the mayor resigned. The budget passed on Monday. \
                    Wake up, the deep state controlled by elites is hiding it!";
        let claims = highlighter().identify_suspicious_claims(text);
        assert_eq!(
            claims,
            vec![
                "Sources say the mayor resigned",
                "Wake up, the deep state controlled by elites is hiding it"
            ]
        );
    }

    #[test]
    fn test_claims_truncated_to_limit() {
        let text = (0..8)
            .map(|i| format!("Insiders say claim number {} is true.", i))
            .collect::<Vec<_>>()
            .join(" ");
        let claims = highlighter().identify_suspicious_claims(&text);
        assert_eq!(claims.len(), 5);
        assert_eq!(claims[0], "Insiders say claim number 0 is true");
    }
}
