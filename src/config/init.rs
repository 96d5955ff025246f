use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, Config, ReportConfig};
use crate::prompt::Prompter;
use crate::report::REPORT_TITLE;
use crate::scoring::{validate_weights, Criterion, WeightConfig};

fn check_weight(weight: &f64) -> Result<(), String> {
    if !weight.is_finite() {
        Err("must be a finite number".to_string())
    } else if *weight < 0.0 {
        Err("must be non-negative".to_string())
    } else {
        Ok(())
    }
}

/// Ask for every criterion weight until the user accepts the result.
///
/// Quality and delivery are always rated, so they always get a weight.
/// Price and support are dropped from the config when set to 0.
fn prompt_weights<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<WeightConfig> {
    let defaults = WeightConfig::default();

    loop {
        let mut weights = WeightConfig::default();
        for criterion in Criterion::ALL {
            let default = defaults.get(criterion).unwrap_or(0.0);
            let weight: f64 = p.prompt_parsed(
                &format!("{} weight (%)", criterion.label()),
                &default.to_string(),
                check_weight,
            )?;
            let optional = matches!(criterion, Criterion::Price | Criterion::Support);
            if optional && weight == 0.0 {
                weights.remove(criterion);
            } else {
                weights.set(criterion, weight);
            }
        }

        match validate_weights(&weights) {
            Ok(warnings) if warnings.is_empty() => {
                p.say(&format!("  Total: {}%", weights.total()))?;
                return Ok(weights);
            }
            Ok(warnings) => {
                for warning in &warnings {
                    p.say(&format!("  Warning: {}", warning))?;
                }
                if p.prompt_yes_no("Keep these weights anyway?", false)? {
                    return Ok(weights);
                }
            }
            Err(errors) => {
                for error in &errors {
                    p.say(&format!("  Invalid: {}", error))?;
                }
            }
        }
        p.say("")?;
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the suggested config file path.
/// Returns the written path, or None when the user declined to overwrite.
pub fn run_init_wizard<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    default_path: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    p.say("")?;
    p.typewriter("Supplier Scorecard Configuration Wizard")?;
    p.say("=======================================")?;
    p.say("")?;

    // 1. Weights
    p.typewriter("Each criterion is rated 1-10. Its weight is the share (in percent) it contributes to the final score.")?;
    p.typewriter("Weights should add up to 100 so final scores land between 10 and 100.")?;
    let configure_weights = p.prompt_yes_no("Configure weights? (n accepts 50/50 quality/delivery)", true)?;
    let weights = if configure_weights {
        p.say("")?;
        Some(prompt_weights(p)?)
    } else {
        None
    };

    // 2. Report settings
    p.say("")?;
    let title = p.prompt_with_default("Report title", REPORT_TITLE)?;
    let output_dir = p.prompt_with_default("Directory for exported reports", ".")?;
    let report = ReportConfig {
        title: (title != REPORT_TITLE).then_some(title),
        output_dir: (output_dir != ".").then(|| PathBuf::from(output_dir)),
    };
    let report = (report != ReportConfig::default()).then_some(report);

    // 3. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    p.say("")?;
    let path_str = p.prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = p.prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            p.say("Aborted.")?;
            return Ok(None);
        }
    }

    // 4. Write config
    let config = Config { weights, report };
    save_config(&config_path, &config)?;
    tracing::debug!(path = %config_path.display(), "config written");

    p.say("")?;
    p.say(&format!("Config written to {}", config_path.display()))?;
    p.say("Run `supplier-scorecard weights` to check it.")?;

    Ok(Some(config_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use std::env;
    use std::fs;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_accept_defaults() {
        let dir = env::temp_dir().join("supplier_scorecard_init_defaults");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("config.yaml");

        // no weights, default title, default dir, default path
        let mut p = prompter("n\n\n\n\n");
        let written = run_init_wizard(&mut p, Some(path.clone())).unwrap();
        assert_eq!(written, Some(path.clone()));

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config, Config::default());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_custom_weights_written() {
        let dir = env::temp_dir().join("supplier_scorecard_init_custom");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("config.yaml");

        let mut p = prompter("y\n40\n30\n20\n10\nQ3 Review\n./out\n\n");
        run_init_wizard(&mut p, Some(path.clone())).unwrap();

        let config = load_config(Some(path)).unwrap();
        let weights = config.effective_weights();
        assert_eq!(weights.get(Criterion::Quality), Some(40.0));
        assert_eq!(weights.get(Criterion::Support), Some(10.0));
        assert_eq!(config.report_title(), "Q3 Review");
        assert_eq!(config.output_dir(), PathBuf::from("./out"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_sum_warning_reprompts() {
        let dir = env::temp_dir().join("supplier_scorecard_init_reprompt");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("config.yaml");

        // first pass sums to 90 and is rejected, second pass drops price/support
        let input = "y\n60\n30\n0\n0\nn\n70\n30\n0\n0\n\n\n\n";
        let mut p = prompter(input);
        run_init_wizard(&mut p, Some(path.clone())).unwrap();
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("weights sum to 90 instead of 100"));

        let weights = load_config(Some(path)).unwrap().effective_weights();
        assert_eq!(weights.get(Criterion::Quality), Some(70.0));
        assert_eq!(weights.get(Criterion::Price), None);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_negative_weight_rejected_inline() {
        let mut p = prompter("-5\n50\n50\n0\n0\n");
        let weights = prompt_weights(&mut p).unwrap();
        assert_eq!(weights.get(Criterion::Quality), Some(50.0));
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("must be non-negative"));
    }

    #[test]
    fn test_existing_file_not_overwritten() {
        let dir = env::temp_dir().join("supplier_scorecard_init_existing");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        fs::write(&path, "weights:\n  quality: 100\n").unwrap();

        let mut p = prompter("n\n\n\n\n\n");
        let written = run_init_wizard(&mut p, Some(path.clone())).unwrap();
        assert_eq!(written, None);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "weights:\n  quality: 100\n"
        );

        let _ = fs::remove_dir_all(&dir);
    }
}
