use anyhow::{anyhow, bail, Context, Result};
use credscore_lib::models::ModelLabel;
use credscore_lib::services::classifier::PrecomputedPrediction;
use credscore_lib::services::config_store::{load_config_file, AnalyzerConfig, ConfigStore};
use credscore_lib::services::detection::{format_json_output, label_from_prediction, CredibilityAnalyzer};

fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

const VALUE_FLAGS: [&str; 4] = ["--prediction", "--confidence", "--config", "--out"];

/// First argument that is neither a flag nor the value of one.
fn positional_arg(args: &[String]) -> Option<String> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            return Some(arg.clone());
        }
    }
    None
}

fn parse_label(args: &[String]) -> Result<ModelLabel> {
    let raw = parse_arg_value(args, "--prediction")
        .ok_or_else(|| anyhow!("--prediction <0|1> is required"))?;
    let value: i64 = raw
        .parse()
        .with_context(|| format!("--prediction must be an integer, got '{}'", raw))?;
    Ok(label_from_prediction(value)?)
}

fn parse_confidence(args: &[String]) -> Result<Option<f64>> {
    let Some(raw) = parse_arg_value(args, "--confidence") else {
        return Ok(None);
    };
    let value: f64 = raw
        .parse()
        .with_context(|| format!("--confidence must be a number, got '{}'", raw))?;
    if !(0.0..=1.0).contains(&value) {
        bail!("--confidence must be within [0, 1], got {}", value);
    }
    Ok(Some(value))
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || has_flag(&args, "--help") {
        eprintln!(
            "Usage:\n  analyze_article <path> --prediction <0|1> [--confidence <0..1>] [--config <json>] [--out <json_path>] [--verbose]\n\nNotes:\n  - The prediction is the stored output of the credibility model (1 = credible).\n  - Without --confidence the verdict is UNVERIFIED.\n  - Without --config the stored config under the user config dir is used, if present.\n  - Set CREDSCORE_DISABLE_FILE_LOG=1 to keep logs on the console only."
        );
        return Ok(());
    }

    credscore_lib::init_logging();

    let path = positional_arg(&args).ok_or_else(|| anyhow!("article path is required"))?;
    let label = parse_label(&args)?;
    let confidence = parse_confidence(&args)?;
    let out_path = parse_arg_value(&args, "--out");
    let verbose = has_flag(&args, "--verbose");

    let config = match parse_arg_value(&args, "--config") {
        Some(p) => load_config_file(std::path::Path::new(&p))?,
        None => match ConfigStore::default_config_dir() {
            Some(dir) => ConfigStore::new(dir).load()?,
            None => AnalyzerConfig::default(),
        },
    };
    let analyzer = CredibilityAnalyzer::new(config)?;

    let text = std::fs::read_to_string(&path).with_context(|| format!("read file failed: {}", path))?;

    let model = match confidence {
        Some(c) => PrecomputedPrediction::with_probability(label, c),
        None => PrecomputedPrediction { label, signal: None },
    };
    let result = analyzer.analyze(&text, &model, &model)?;

    if verbose {
        eprintln!("File: {}", path);
        eprintln!("Chars: {}", text.chars().count());
        eprintln!("Pattern score: {:.3}", result.pattern_score);
        eprintln!("Signals: {:?}", result.signals);
        for (i, claim) in result.suspicious_claims.iter().enumerate() {
            eprintln!("[C{:02}] {}", i, preview(claim, 120));
        }
        eprintln!();
    }

    let report = format_json_output(&result)?;
    let json = serde_json::to_string_pretty(&report)?;

    match out_path {
        Some(out) => {
            std::fs::write(&out, json).with_context(|| format!("write output failed: {}", out))?;
            eprintln!("Saved report: {}", out);
        }
        None => println!("{}", json),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_path_after_flags() {
        let a = args(&["analyze_article", "--prediction", "1", "a.txt"]);
        assert_eq!(positional_arg(&a).as_deref(), Some("a.txt"));
        let a = args(&["analyze_article", "--verbose", "--config", "c.json", "b.txt", "--out", "o.json"]);
        assert_eq!(positional_arg(&a).as_deref(), Some("b.txt"));
    }

    #[test]
    fn test_path_first() {
        let a = args(&["analyze_article", "a.txt", "--prediction", "0"]);
        assert_eq!(positional_arg(&a).as_deref(), Some("a.txt"));
    }

    #[test]
    fn test_missing_path() {
        let a = args(&["analyze_article", "--prediction", "1", "--confidence", "0.9"]);
        assert_eq!(positional_arg(&a), None);
    }

    #[test]
    fn test_parse_label_and_confidence() {
        let a = args(&["analyze_article", "a.txt", "--prediction", "1", "--confidence", "0.8"]);
        assert_eq!(parse_label(&a).unwrap(), ModelLabel::Credible);
        assert_eq!(parse_confidence(&a).unwrap(), Some(0.8));
        let bad = args(&["analyze_article", "a.txt", "--prediction", "2", "--confidence", "1.5"]);
        assert!(parse_label(&bad).is_err());
        assert!(parse_confidence(&bad).is_err());
    }
}
