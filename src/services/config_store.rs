// Configuration Storage Service
// Lexicon tables, scoring policy, and config file read/write with version backup

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_VERSION: &str = "1.0.0";
const BACKUP_KEEP: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid scoring policy: {0}")]
    InvalidPolicy(String),
    #[error("invalid lexicon '{name}': {reason}")]
    InvalidLexicon { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub version: String,
    pub lexicons: Lexicons,
    pub policy: ScoringPolicy,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            lexicons: Lexicons::default(),
            policy: ScoringPolicy::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lexicons.validate()?;
        self.policy.validate()
    }
}

// ============ Lexicons ============

/// Fixed phrase tables. Matching is case-insensitive, so entries may be
/// written in any case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Lexicons {
    pub sensational: Vec<String>,
    pub vague_sources: Vec<String>,
    pub conspiracy: Vec<String>,
    pub emotional: Vec<String>,
    pub balance: Vec<String>,
    pub evidence: Vec<String>,
    pub extreme_adjectives: Vec<String>,
    pub clickbait: Vec<String>,
    /// Whole-word matched per sentence by the claim highlighter.
    pub extreme_language: Vec<String>,
    /// Sentence-level evidence markers (superset of `evidence`).
    pub evidence_markers: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Lexicons {
    fn default() -> Self {
        Self {
            sensational: owned(&[
                "SHOCKING", "BREAKING", "UNBELIEVABLE", "EXPOSED", "REVEALED", "SECRET",
                "HIDDEN", "TRUTH", "BOMBSHELL", "EXPLOSIVE", "STUNNING", "INCREDIBLE",
            ]),
            vague_sources: owned(&[
                "sources say", "experts claim", "reports suggest", "allegedly", "rumored",
                "according to sources", "insiders say", "it is believed", "some say",
                "many believe",
            ]),
            conspiracy: owned(&[
                "cover-up", "cover up", "conspiracy", "they don't want you to know",
                "mainstream media", "wake up", "sheeple", "hidden truth", "secret agenda",
                "deep state", "false flag", "controlled by",
            ]),
            emotional: owned(&[
                "outrage", "terrifying", "devastating", "horrifying", "shocking", "disgusting",
                "appalling", "outrageous", "scandalous", "alarming", "disturbing",
            ]),
            balance: owned(&[
                "however", "although", "on the other hand", "but", "despite", "nevertheless",
                "yet", "while", "whereas", "conversely", "alternatively",
            ]),
            evidence: owned(&[
                "study", "research", "data", "statistics", "percent", "according to",
                "published", "journal", "university", "professor", "analysis", "survey",
                "report",
            ]),
            extreme_adjectives: owned(&[
                "always", "never", "every", "all", "none", "completely", "totally",
                "absolutely", "definitely", "entirely", "utterly", "wholly",
            ]),
            clickbait: owned(&[
                "you won't believe", "what happened next", "number", "will shock you",
                "doctors hate", "one weird trick", "this is why", "the reason why",
                "you need to see",
            ]),
            extreme_language: owned(&[
                "always", "never", "every", "all", "none", "completely", "totally",
                "absolutely", "definitely", "shocking", "unbelievable", "terrifying",
                "devastating", "horrifying", "disgusting", "appalling",
            ]),
            evidence_markers: owned(&[
                "study", "research", "data", "statistics", "percent", "according to",
                "published", "journal", "university", "professor", "dr.", "phd", "analysis",
                "survey", "report",
            ]),
        }
    }
}

impl Lexicons {
    fn tables(&self) -> [(&'static str, &[String]); 10] {
        [
            ("sensational", self.sensational.as_slice()),
            ("vague_sources", self.vague_sources.as_slice()),
            ("conspiracy", self.conspiracy.as_slice()),
            ("emotional", self.emotional.as_slice()),
            ("balance", self.balance.as_slice()),
            ("evidence", self.evidence.as_slice()),
            ("extreme_adjectives", self.extreme_adjectives.as_slice()),
            ("clickbait", self.clickbait.as_slice()),
            ("extreme_language", self.extreme_language.as_slice()),
            ("evidence_markers", self.evidence_markers.as_slice()),
        ]
    }

    /// Blank entries would match everywhere, so they are rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, entries) in self.tables() {
            if let Some(pos) = entries.iter().position(|e| e.trim().is_empty()) {
                return Err(ConfigError::InvalidLexicon {
                    name,
                    reason: format!("entry {} is blank", pos),
                });
            }
        }
        Ok(())
    }
}

// ============ Scoring Policy ============

/// Per-signal weights of the pattern score. Defaults sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignalWeights {
    pub sensational_phrases: f64,
    pub excessive_caps: f64,
    pub vague_sources: f64,
    pub conspiracy_framing: f64,
    pub emotional_manipulation: f64,
    pub one_sided: f64,
    pub no_evidence: f64,
    pub extreme_adjectives: f64,
    pub clickbait: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            sensational_phrases: 0.12,
            excessive_caps: 0.08,
            vague_sources: 0.16,
            conspiracy_framing: 0.18,
            emotional_manipulation: 0.12,
            one_sided: 0.08,
            no_evidence: 0.10,
            extreme_adjectives: 0.08,
            clickbait: 0.08,
        }
    }
}

impl SignalWeights {
    fn values(&self) -> [f64; 9] {
        [
            self.sensational_phrases,
            self.excessive_caps,
            self.vague_sources,
            self.conspiracy_framing,
            self.emotional_manipulation,
            self.one_sided,
            self.no_evidence,
            self.extreme_adjectives,
            self.clickbait,
        ]
    }
}

/// Occurrence counts at which a count signal saturates to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignalCaps {
    pub sensational_phrases: u32,
    pub vague_sources: u32,
    pub conspiracy_framing: u32,
    pub emotional_manipulation: u32,
    pub extreme_adjectives: u32,
    pub clickbait: u32,
}

impl Default for SignalCaps {
    fn default() -> Self {
        Self {
            sensational_phrases: 5,
            vague_sources: 5,
            conspiracy_framing: 5,
            emotional_manipulation: 5,
            extreme_adjectives: 10,
            clickbait: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Texts shorter than this (in chars, after trimming) are UNVERIFIED.
    pub min_text_chars: usize,
    /// Model confidence below this is UNVERIFIED.
    pub confidence_threshold: f64,
    pub weights: SignalWeights,
    pub caps: SignalCaps,
    pub balance_cap: u32,
    pub evidence_cap: u32,
    /// Credible predictions with a pattern score below this are REAL.
    pub real_cut: f64,
    /// Not-credible predictions with a pattern score at or above this are FAKE.
    pub fake_cut: f64,
    pub credible_base: f64,
    pub credible_confidence_gain: f64,
    pub not_credible_base: f64,
    pub not_credible_confidence_loss: f64,
    /// Fraction of the base score removed at pattern score 1.0.
    pub pattern_penalty: f64,
    pub low_risk_min_score: i32,
    pub medium_risk_min_score: i32,
    pub caps_indicator_ratio: f64,
    pub one_sided_indicator: f64,
    pub no_evidence_indicator: f64,
    pub claim_threshold: u32,
    pub max_claims: usize,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            min_text_chars: 50,
            confidence_threshold: 0.5,
            weights: SignalWeights::default(),
            caps: SignalCaps::default(),
            balance_cap: 3,
            evidence_cap: 5,
            real_cut: 0.2,
            fake_cut: 0.5,
            credible_base: 55.0,
            credible_confidence_gain: 45.0,
            not_credible_base: 45.0,
            not_credible_confidence_loss: 25.0,
            pattern_penalty: 0.5,
            low_risk_min_score: 70,
            medium_risk_min_score: 40,
            caps_indicator_ratio: 0.1,
            one_sided_indicator: 0.5,
            no_evidence_indicator: 0.5,
            claim_threshold: 3,
            max_claims: 5,
        }
    }
}

impl ScoringPolicy {
    /// Rejects tables that would break score monotonicity or the label bands.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::InvalidPolicy(msg));

        if self.weights.values().iter().any(|w| !w.is_finite() || *w < 0.0) {
            return invalid("signal weights must be finite and non-negative".to_string());
        }
        let caps = &self.caps;
        let all_caps = [
            caps.sensational_phrases,
            caps.vague_sources,
            caps.conspiracy_framing,
            caps.emotional_manipulation,
            caps.extreme_adjectives,
            caps.clickbait,
            self.balance_cap,
            self.evidence_cap,
        ];
        if all_caps.contains(&0) {
            return invalid("saturation caps must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return invalid(format!(
                "confidence_threshold {} outside [0, 1]",
                self.confidence_threshold
            ));
        }
        if !(0.0 < self.real_cut && self.real_cut <= self.fake_cut && self.fake_cut <= 1.0) {
            return invalid(format!(
                "cut points must satisfy 0 < real_cut <= fake_cut <= 1 (got {} / {})",
                self.real_cut, self.fake_cut
            ));
        }
        if !(self.pattern_penalty > 0.0 && self.pattern_penalty < 1.0) {
            return invalid(format!("pattern_penalty {} outside (0, 1)", self.pattern_penalty));
        }
        let score_terms = [
            ("credible_base", self.credible_base),
            ("credible_confidence_gain", self.credible_confidence_gain),
            ("not_credible_base", self.not_credible_base),
            ("not_credible_confidence_loss", self.not_credible_confidence_loss),
        ];
        if let Some((name, v)) = score_terms.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(format!("{} must be finite, got {}", name, v));
        }
        let credible_min = self.credible_base;
        let not_credible_max = self.not_credible_base;
        let not_credible_min = self.not_credible_base - self.not_credible_confidence_loss;
        if self.credible_confidence_gain < 0.0 || self.not_credible_confidence_loss < 0.0 {
            return invalid("confidence gain/loss must be non-negative".to_string());
        }
        if credible_min <= not_credible_max {
            return invalid("credible_base must exceed not_credible_base".to_string());
        }
        if not_credible_min <= 0.0 || credible_min + self.credible_confidence_gain > 100.0 {
            return invalid("base scores must stay inside (0, 100]".to_string());
        }
        if !(0 < self.medium_risk_min_score
            && self.medium_risk_min_score < self.low_risk_min_score
            && self.low_risk_min_score <= 100)
        {
            return invalid("risk bounds must satisfy 0 < medium < low <= 100".to_string());
        }
        if self.max_claims == 0 {
            return invalid("max_claims must be positive".to_string());
        }
        Ok(())
    }
}

// ============ Config Store ============

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("credscore"))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Load configuration from file; a missing file yields the defaults.
    pub fn load(&self) -> Result<AnalyzerConfig, ConfigError> {
        if !self.config_file.exists() {
            return Ok(AnalyzerConfig::default());
        }
        load_config_file(&self.config_file)
    }

    /// Save configuration to file
    pub fn save(&self, config: &AnalyzerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Write {
            path: self.config_dir.clone(),
            source,
        })?;

        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_file, content).map_err(|source| ConfigError::Write {
            path: self.config_file.clone(),
            source,
        })
    }

    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.config_dir.join("backups");
        let write_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| ConfigError::Write { path, source }
        };
        fs::create_dir_all(&backup_dir).map_err(write_err(&backup_dir))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));
        fs::copy(&self.config_file, &backup_file).map_err(write_err(&backup_file))?;

        self.cleanup_old_backups(&backup_dir, BACKUP_KEEP)
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), ConfigError> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(|source| ConfigError::Read {
                path: backup_dir.to_path_buf(),
                source,
            })?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        entries.sort_by_key(|e| {
            e.metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
        });

        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }
}

/// Read and validate a config file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<AnalyzerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AnalyzerConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
