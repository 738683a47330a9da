use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::error::{Rule, ValidationError};
use crate::grading::{ScoreBreakdown, TreatmentBonus};

/// Format a score breakdown as the line-by-line report.
///
/// Lines follow the scoring steps: health subtotal, deaths, one line per
/// treatment bonus, then the final score.
pub fn format_breakdown(breakdown: &ScoreBreakdown, use_colors: bool) -> String {
    let mut lines = Vec::with_capacity(breakdown.bonuses.len() + 5);

    lines.push(format!(
        "Day {}: {} patients",
        breakdown.day, breakdown.patients
    ));
    lines.push(format!("Health total: {}", breakdown.health_total));

    let deaths = format!(
        "Deaths: {} (penalty -{})",
        breakdown.deaths, breakdown.death_penalty
    );
    if use_colors && breakdown.deaths > 0 {
        lines.push(deaths.red().to_string());
    } else {
        lines.push(deaths);
    }

    lines.push("Conservation bonus:".to_string());
    for bonus in &breakdown.bonuses {
        lines.push(format_bonus_line(bonus, use_colors));
    }

    let total = format!("Total score: {}", breakdown.score);
    if use_colors {
        lines.push(total.bold().to_string());
    } else {
        lines.push(total);
    }

    lines.join("\n")
}

fn format_bonus_line(bonus: &TreatmentBonus, use_colors: bool) -> String {
    if use_colors {
        format!(
            "  {:<14} {} of {} remaining ({} used), bonus {}",
            bonus.name.cyan(),
            bonus.remaining,
            bonus.daily_quantity,
            bonus.used,
            format!("+{}", bonus.bonus).green()
        )
    } else {
        format!(
            "  {:<14} {} of {} remaining ({} used), bonus +{}",
            bonus.name, bonus.remaining, bonus.daily_quantity, bonus.used, bonus.bonus
        )
    }
}

/// The single line reported for a rejected submission
pub fn format_invalid(err: &ValidationError, use_colors: bool) -> String {
    let line = format!("Invalid entry: {}", err);
    if use_colors {
        line.red().to_string()
    } else {
        line
    }
}

#[derive(Debug, Serialize)]
struct InvalidReport<'a> {
    valid: bool,
    rule: Rule,
    treatment: Option<&'a str>,
    message: String,
}

#[derive(Debug, Serialize)]
struct ScoreReport<'a> {
    valid: bool,
    #[serde(flatten)]
    breakdown: &'a ScoreBreakdown,
}

/// JSON document for a scored submission
pub fn format_json(breakdown: &ScoreBreakdown) -> Result<String> {
    serde_json::to_string_pretty(&ScoreReport {
        valid: true,
        breakdown,
    })
    .context("Failed to serialize score report")
}

/// JSON document for a rejected submission
pub fn format_invalid_json(err: &ValidationError) -> Result<String> {
    serde_json::to_string_pretty(&InvalidReport {
        valid: false,
        rule: err.rule(),
        treatment: err.treatment(),
        message: err.to_string(),
    })
    .context("Failed to serialize validation report")
}

/// Write a JSON report atomically so a reader never sees a partial file.
pub fn save_report(path: &Path, json: &str) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    std::io::Write::write_all(&mut file, json.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    file.commit().context("Failed to save report")?;

    Ok(())
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TreatmentKind;
    use std::env;
    use std::fs;

    fn sample_breakdown() -> ScoreBreakdown {
        ScoreBreakdown {
            day: 2,
            patients: 3,
            health_total: 191.0,
            deaths: 1,
            death_penalty: 50.0,
            bonuses: vec![
                TreatmentBonus {
                    name: "ventilator".to_string(),
                    kind: TreatmentKind::Reusable,
                    daily_quantity: 10,
                    used: 1,
                    remaining: 9,
                    bonus: 135,
                },
                TreatmentBonus {
                    name: "chloroquine".to_string(),
                    kind: TreatmentKind::Onetime,
                    daily_quantity: 17,
                    used: 0,
                    remaining: 17,
                    bonus: 85,
                },
            ],
            score: 361,
        }
    }

    #[test]
    fn test_format_breakdown_lines() {
        let output = format_breakdown(&sample_breakdown(), false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "Day 2: 3 patients");
        assert_eq!(lines[1], "Health total: 191");
        assert_eq!(lines[2], "Deaths: 1 (penalty -50)");
        assert!(lines[4].contains("ventilator"));
        assert!(lines[4].contains("9 of 10 remaining"));
        assert!(lines[4].ends_with("bonus +135"));
        assert!(lines[5].contains("chloroquine"));
        assert!(lines[5].contains("17 of 17 remaining"));
        assert_eq!(lines[6], "Total score: 361");
    }

    #[test]
    fn test_format_invalid() {
        let err = ValidationError::VentilatorWithOxygen { row: 4 };
        let line = format_invalid(&err, false);
        assert!(line.starts_with("Invalid entry: "));
        assert!(line.contains("Row 4"));
    }

    #[test]
    fn test_format_json() {
        let json = format_json(&sample_breakdown()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["valid"], true);
        assert_eq!(value["score"], 361);
        assert_eq!(value["bonuses"][0]["kind"], "reusable");
    }

    #[test]
    fn test_format_invalid_json() {
        let err = ValidationError::QuantityExceeded {
            treatment: "plasma".to_string(),
            used: 6,
            limit: 5,
        };
        let value: serde_json::Value =
            serde_json::from_str(&format_invalid_json(&err).unwrap()).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["rule"], "quantity");
        assert_eq!(value["treatment"], "plasma");
    }

    #[test]
    fn test_save_report() {
        let path = env::temp_dir().join("triage_grader_test_report.json");
        let _ = fs::remove_file(&path);
        save_report(&path, "{\"valid\": true}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"valid\": true}");
        let _ = fs::remove_file(&path);
    }
}
