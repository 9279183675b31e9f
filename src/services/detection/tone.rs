// Emotional Tone
// Maps pattern signals to a descriptive tone label

use crate::models::PatternSignals;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EmotionalTone {
    Manipulative,
    Sensationalized,
    Conspiratorial,
    ModeratelyEmotional,
    Neutral,
}

impl EmotionalTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manipulative => "Highly emotional and manipulative",
            Self::Sensationalized => "Sensationalized and attention-seeking",
            Self::Conspiratorial => "Conspiratorial and fear-inducing",
            Self::ModeratelyEmotional => "Moderately emotional",
            Self::Neutral => "Neutral and analytical",
        }
    }
}

/// First matching rule wins. `_text` is accepted so text-level cues can be
/// added without changing callers; it does not affect the result today.
pub fn classify_tone(signals: &PatternSignals, _text: &str) -> EmotionalTone {
    match signals {
        s if s.emotional_manipulation > 3 => EmotionalTone::Manipulative,
        s if s.sensational_phrases > 3 => EmotionalTone::Sensationalized,
        s if s.conspiracy_framing > 0 => EmotionalTone::Conspiratorial,
        s if s.emotional_manipulation > 0 => EmotionalTone::ModeratelyEmotional,
        _ => EmotionalTone::Neutral,
    }
}
