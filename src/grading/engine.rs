use serde::Serialize;

use crate::catalog::{Catalog, TreatmentKind};
use crate::config::ScoringConfig;
use crate::table::Table;

/// Columns left out of a patient's recomputed total.
const EXCLUDED_FROM_TOTAL: [&str; 2] = ["id", "total"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentBonus {
    pub name: String,
    pub kind: TreatmentKind,
    pub daily_quantity: u32,
    pub used: usize,
    pub remaining: i64,
    pub bonus: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub day: u32,
    pub patients: usize,
    /// Sum of per-patient totals clipped to [0, health_cap]
    pub health_total: f64,
    pub deaths: usize,
    pub death_penalty: f64,
    pub bonuses: Vec<TreatmentBonus>,
    /// Health total less penalties, floored, plus bonuses. Whole-number
    /// inputs give the exact value.
    pub score: i64,
}

impl ScoreBreakdown {
    pub fn bonus_total(&self) -> i64 {
        self.bonuses.iter().map(|b| b.bonus).sum()
    }
}

/// Recompute each patient's outcome: the sum of every column except `id`
/// and the submitted `total`. The table itself is left untouched.
pub fn patient_totals(submission: &Table) -> Vec<f64> {
    let included: Vec<usize> = submission
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| !EXCLUDED_FROM_TOTAL.contains(&name.as_str()))
        .map(|(i, _)| i)
        .collect();

    (0..submission.len())
        .map(|row| included.iter().map(|&col| submission.number(row, col)).sum())
        .collect()
}

/// Score a submission that has already passed validation.
pub fn calculate_score(
    submission: &Table,
    catalog: &Catalog,
    scoring: &ScoringConfig,
    day: u32,
) -> ScoreBreakdown {
    let totals = patient_totals(submission);
    let cap = scoring.health_cap();

    let health_total: f64 = totals.iter().map(|t| t.clamp(0.0, cap)).sum();

    let deaths = totals.iter().filter(|&&t| t <= 0.0).count();
    let death_penalty = scoring.death_penalty() * deaths as f64;

    let rate = scoring.bonus_rate();
    let bonuses: Vec<TreatmentBonus> = catalog
        .iter()
        .map(|treatment| {
            // An absent column means the treatment was never used
            let used = submission
                .column_index(treatment.name)
                .map(|col| {
                    (0..submission.len())
                        .filter(|&row| submission.number(row, col) != 0.0)
                        .count()
                })
                .unwrap_or(0);
            let remaining = i64::from(treatment.daily_quantity) - used as i64;
            TreatmentBonus {
                name: treatment.name.to_string(),
                kind: treatment.kind,
                daily_quantity: treatment.daily_quantity,
                used,
                remaining,
                bonus: (treatment.efficacy * rate * remaining as f64).floor() as i64,
            }
        })
        .collect();

    let bonus_total: i64 = bonuses.iter().map(|b| b.bonus).sum();

    ScoreBreakdown {
        day,
        patients: submission.len(),
        health_total,
        deaths,
        death_penalty,
        bonuses,
        score: (health_total - death_penalty).floor() as i64 + bonus_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TreatmentSpec;
    use crate::table::Cell;

    fn row(id: &str, values: &[f64]) -> Vec<Cell> {
        std::iter::once(Cell::Text(id.to_string()))
            .chain(values.iter().map(|v| Cell::Number(*v)))
            .collect()
    }

    fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    fn remdesivir_only() -> Catalog {
        Catalog::from_specs(vec![TreatmentSpec {
            name: "remdesivir",
            kind: TreatmentKind::Onetime,
            daily_quantity: 10,
            efficacy: 20.0,
        }])
    }

    #[test]
    fn test_totals_skip_id_and_submitted_total() {
        let t = table(
            &["id", "health", "decline", "bed", "oxygen", "total"],
            vec![row("1", &[80.0, 5.0, 1.0, 20.0, 999.0])],
        );
        assert_eq!(patient_totals(&t), vec![106.0]);
    }

    #[test]
    fn test_over_cap_is_clipped() {
        let t = table(
            &["id", "health", "decline", "casirivimab", "total"],
            vec![row("1", &[80.0, 5.0, 35.0, 0.0])],
        );
        assert_eq!(patient_totals(&t), vec![120.0]);
        let result = calculate_score(&t, &Catalog::from_specs(vec![]), &ScoringConfig::default(), 1);
        assert_eq!(result.health_total, 100.0);
        assert_eq!(result.deaths, 0);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_negative_total_is_a_death() {
        let t = table(
            &["id", "health", "decline"],
            vec![row("1", &[5.0, -15.0])],
        );
        let result = calculate_score(&t, &Catalog::from_specs(vec![]), &ScoringConfig::default(), 1);
        assert_eq!(result.health_total, 0.0);
        assert_eq!(result.deaths, 1);
        assert_eq!(result.death_penalty, 50.0);
        assert_eq!(result.score, -50);
    }

    #[test]
    fn test_zero_total_is_a_death() {
        let t = table(&["id", "health", "decline"], vec![row("1", &[0.0, 0.0])]);
        let result = calculate_score(&t, &Catalog::from_specs(vec![]), &ScoringConfig::default(), 1);
        assert_eq!(result.deaths, 1);
    }

    #[test]
    fn test_conservation_bonus() {
        let t = table(
            &["id", "health", "decline", "bed", "remdesivir"],
            vec![
                row("1", &[10.0, 0.0, 1.0, 20.0]),
                row("2", &[10.0, 0.0, 1.0, 20.0]),
                row("3", &[10.0, 0.0, 1.0, 20.0]),
                row("4", &[10.0, 0.0, 1.0, 0.0]),
            ],
        );
        let result = calculate_score(&t, &remdesivir_only(), &ScoringConfig::default(), 1);
        assert_eq!(result.bonuses.len(), 1);
        let bonus = &result.bonuses[0];
        assert_eq!(bonus.used, 3);
        assert_eq!(bonus.remaining, 7);
        assert_eq!(bonus.daily_quantity, 10);
        assert_eq!(bonus.bonus, 70);
    }

    #[test]
    fn test_bonus_is_floored() {
        let catalog = Catalog::from_specs(vec![TreatmentSpec {
            name: "chloroquine",
            kind: TreatmentKind::Onetime,
            daily_quantity: 3,
            efficacy: 5.0,
        }]);
        let t = table(&["id", "health", "decline"], vec![row("1", &[50.0, 0.0])]);
        let result = calculate_score(&t, &catalog, &ScoringConfig::default(), 1);
        // 5 * 0.5 * 3 = 7.5
        assert_eq!(result.bonuses[0].bonus, 7);
    }

    #[test]
    fn test_absent_column_means_unused() {
        let t = table(&["id", "health", "decline"], vec![row("1", &[50.0, 0.0])]);
        let result = calculate_score(&t, &remdesivir_only(), &ScoringConfig::default(), 1);
        assert_eq!(result.bonuses[0].used, 0);
        assert_eq!(result.bonuses[0].remaining, 10);
        assert_eq!(result.bonuses[0].bonus, 100);
    }

    #[test]
    fn test_full_score() {
        let t = table(
            &["id", "health", "decline", "bed", "remdesivir", "total"],
            vec![
                row("1", &[80.0, 5.0, 1.0, 20.0, 0.0]),  // 106 -> 100
                row("2", &[40.0, 10.0, 1.0, 0.0, 0.0]),  // 51
                row("3", &[-20.0, 10.0, 0.0, 0.0, 0.0]), // -10 -> dead
            ],
        );
        let result = calculate_score(&t, &remdesivir_only(), &ScoringConfig::default(), 3);
        assert_eq!(result.day, 3);
        assert_eq!(result.patients, 3);
        assert_eq!(result.health_total, 151.0);
        assert_eq!(result.deaths, 1);
        // remdesivir: 9 remaining -> floor(20 * 0.5 * 9) = 90
        assert_eq!(result.bonus_total(), 90);
        assert_eq!(result.score, 151 - 50 + 90);
    }

    #[test]
    fn test_scoring_twice_is_identical() {
        let t = table(
            &["id", "health", "decline", "bed", "remdesivir", "total"],
            vec![row("1", &[80.0, 5.0, 1.0, 20.0, 0.0])],
        );
        let before = t.clone();
        let first = calculate_score(&t, &remdesivir_only(), &ScoringConfig::default(), 1);
        let second = calculate_score(&t, &remdesivir_only(), &ScoringConfig::default(), 1);
        assert_eq!(first, second);
        assert_eq!(t, before);
    }

    #[test]
    fn test_custom_scoring_constants() {
        let t = table(&["id", "health", "decline"], vec![row("1", &[150.0, 0.0]), row("2", &[-1.0, 0.0])]);
        let scoring = ScoringConfig {
            health_cap: Some(120.0),
            death_penalty: Some(10.0),
            bonus_rate: Some(1.0),
        };
        let result = calculate_score(&t, &remdesivir_only(), &scoring, 1);
        assert_eq!(result.health_total, 120.0);
        assert_eq!(result.death_penalty, 10.0);
        assert_eq!(result.bonuses[0].bonus, 200);
    }
}
