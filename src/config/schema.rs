use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::Catalog;

/// Top-level configuration file.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   health_cap: 100
///   death_penalty: 50
///   bonus_rate: 0.5
/// treatments:
///   remdesivir: { daily_quantity: 8, efficacy: 20 }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    /// Per-treatment overrides of the built-in catalog, keyed by treatment name
    #[serde(default)]
    pub treatments: Option<BTreeMap<String, TreatmentOverride>>,
}

impl Config {
    /// Scoring constants with built-in defaults filled in
    pub fn effective_scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    /// The standard catalog with any overrides applied.
    ///
    /// Unknown names are skipped here; `validate_config` reports them.
    pub fn catalog(&self) -> Catalog {
        let mut catalog = Catalog::standard();
        if let Some(ref overrides) = self.treatments {
            for (name, o) in overrides {
                if let Some(spec) = catalog.get_mut(name) {
                    if let Some(quantity) = o.daily_quantity {
                        spec.daily_quantity = quantity;
                    }
                    if let Some(efficacy) = o.efficacy {
                        spec.efficacy = efficacy;
                    }
                }
            }
        }
        catalog
    }
}

/// Constants of the scoring formula.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Upper bound each patient's total is clipped to (default: 100)
    #[serde(default)]
    pub health_cap: Option<f64>,

    /// Points lost per patient whose total is at or below zero (default: 50)
    #[serde(default)]
    pub death_penalty: Option<f64>,

    /// Multiplier in `floor(efficacy * rate * remaining)` (default: 0.5)
    #[serde(default)]
    pub bonus_rate: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            health_cap: Some(100.0),
            death_penalty: Some(50.0),
            bonus_rate: Some(0.5),
        }
    }
}

impl ScoringConfig {
    pub fn health_cap(&self) -> f64 {
        self.health_cap.unwrap_or(100.0)
    }

    pub fn death_penalty(&self) -> f64 {
        self.death_penalty.unwrap_or(50.0)
    }

    pub fn bonus_rate(&self) -> f64 {
        self.bonus_rate.unwrap_or(0.5)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TreatmentOverride {
    #[serde(default)]
    pub daily_quantity: Option<u32>,

    #[serde(default)]
    pub efficacy: Option<f64>,
}
