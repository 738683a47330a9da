use super::schema::Config;
use crate::catalog::Catalog;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref scoring) = config.scoring {
        if let Some(cap) = scoring.health_cap {
            if !cap.is_finite() || cap <= 0.0 {
                errors.push("scoring.health_cap: must be a positive number".to_string());
            }
        }
        if let Some(penalty) = scoring.death_penalty {
            if !penalty.is_finite() || penalty < 0.0 {
                errors.push("scoring.death_penalty: must be non-negative".to_string());
            }
        }
        if let Some(rate) = scoring.bonus_rate {
            if !rate.is_finite() || rate < 0.0 {
                errors.push("scoring.bonus_rate: must be non-negative".to_string());
            }
        }
    }

    if let Some(ref treatments) = config.treatments {
        let catalog = Catalog::standard();
        for (name, o) in treatments {
            if catalog.get(name).is_none() {
                errors.push(format!("treatments.{}: unknown treatment", name));
                continue;
            }
            if let Some(efficacy) = o.efficacy {
                if !efficacy.is_finite() || efficacy == 0.0 {
                    errors.push(format!(
                        "treatments.{}.efficacy: must be a non-zero number",
                        name
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
