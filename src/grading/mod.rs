pub mod engine;
pub mod validation;

pub use engine::{calculate_score, patient_totals, ScoreBreakdown, TreatmentBonus};
pub use validation::validate;

use std::path::Path;

use crate::catalog::Catalog;
use crate::config::ScoringConfig;
use crate::error::{FormatError, ValidationError};
use crate::table::{load_reference, load_submission, ReferenceTable, SubmissionFormat, Table};

/// One grading run: a reference table, a submission, and the rules to apply.
///
/// The tables are only read; each submission gets its own `Grader`.
#[derive(Debug, Clone)]
pub struct Grader {
    reference: ReferenceTable,
    submission: Table,
    catalog: Catalog,
    scoring: ScoringConfig,
}

impl Grader {
    pub fn new(
        reference: ReferenceTable,
        submission: Table,
        catalog: Catalog,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            reference,
            submission,
            catalog,
            scoring,
        }
    }

    /// Load both files. Format problems surface here, before any rule runs.
    pub fn load(
        reference_path: &Path,
        submission_path: &Path,
        format: Option<SubmissionFormat>,
        catalog: Catalog,
        scoring: ScoringConfig,
    ) -> Result<Self, FormatError> {
        let reference = ReferenceTable::new(load_reference(reference_path)?);
        let submission = load_submission(submission_path, format)?;
        Ok(Self::new(reference, submission, catalog, scoring))
    }

    pub fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    pub fn submission(&self) -> &Table {
        &self.submission
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(&self.submission, &self.reference, &self.catalog)
    }

    /// Score without validating. Prefer [`Grader::grade`].
    pub fn score(&self, day: u32) -> ScoreBreakdown {
        calculate_score(&self.submission, &self.catalog, &self.scoring, day)
    }

    /// Validate, then score. No score is produced for an invalid submission.
    pub fn grade(&self, day: u32) -> Result<ScoreBreakdown, ValidationError> {
        self.validate()?;
        Ok(self.score(day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Rule;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    const REFERENCE: &str = "patient,health,decline\n1,80,5\n2,40,10\n3,10,-20\n";

    #[test]
    fn test_grade_valid_submission_end_to_end() {
        let reference = write_temp("triage_grader_test_e2e_ref.csv", REFERENCE);
        let submission = write_temp(
            "triage_grader_test_e2e_sub.csv",
            "id,health,decline,bed,ventilator,remdesivir,total\n\
             1,80,5,1,0,30,116\n\
             2,40,10,1,30,0,81\n\
             3,10,-20,0,0,0,-10\n",
        );
        let grader = Grader::load(
            &reference,
            &submission,
            None,
            Catalog::standard(),
            ScoringConfig::default(),
        )
        .unwrap();
        let result = grader.grade(2).unwrap();

        // 116 -> 100, 81, -10 -> 0 and dead
        assert_eq!(result.health_total, 181.0);
        assert_eq!(result.deaths, 1);
        assert_eq!(result.death_penalty, 50.0);
        let ventilator = &result.bonuses[0];
        assert_eq!(ventilator.name, "ventilator");
        assert_eq!(ventilator.used, 1);
        assert_eq!(ventilator.bonus, 135);
        // 135 + 100 + 90 + 250 + 75 + 75 + 85
        assert_eq!(result.bonus_total(), 810);
        assert_eq!(result.score, 181 - 50 + 810);

        let _ = fs::remove_file(&reference);
        let _ = fs::remove_file(&submission);
    }

    #[test]
    fn test_grade_invalid_submission_produces_no_score() {
        let reference = write_temp("triage_grader_test_invalid_ref.csv", REFERENCE);
        let submission = write_temp(
            "triage_grader_test_invalid_sub.csv",
            "id,health,decline,bed,ventilator,oxygen\n1,80,5,1,30,20\n",
        );
        let grader = Grader::load(
            &reference,
            &submission,
            None,
            Catalog::standard(),
            ScoringConfig::default(),
        )
        .unwrap();
        let err = grader.grade(1).unwrap_err();
        assert_eq!(err.rule(), Rule::Combo);

        let _ = fs::remove_file(&reference);
        let _ = fs::remove_file(&submission);
    }

    #[test]
    fn test_text_in_unknown_column_fails_column_check() {
        let reference = write_temp("triage_grader_test_textcol_ref.csv", REFERENCE);
        let submission = write_temp(
            "triage_grader_test_textcol_sub.csv",
            "id,health,decline,bed,name\n1,80,5,1,alice\n",
        );
        let grader = Grader::load(
            &reference,
            &submission,
            None,
            Catalog::standard(),
            ScoringConfig::default(),
        )
        .unwrap();
        let err = grader.grade(1).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownColumn {
                column: "name".to_string()
            }
        );

        let _ = fs::remove_file(&reference);
        let _ = fs::remove_file(&submission);
    }

    #[test]
    fn test_load_rejects_unsupported_format_before_validation() {
        let reference = write_temp("triage_grader_test_fmt_ref.csv", REFERENCE);
        let err = Grader::load(
            &reference,
            Path::new("submission.ods"),
            None,
            Catalog::standard(),
            ScoringConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedFormat { .. }));
        let _ = fs::remove_file(&reference);
    }
}
