use serde::Deserialize;

use crate::error::AppError;

pub const AGE_RANGE: (f64, f64) = (20.0, 79.0);
pub const TOTAL_CHOLESTEROL_RANGE: (f64, f64) = (100.0, 400.0);

#[derive(Debug, Clone, Deserialize)]
pub struct FormPayload {
    #[serde(rename = "edad")]
    pub age: f64,
    #[serde(rename = "colesterol_total")]
    pub total_cholesterol: f64,
}

fn within((low, high): (f64, f64), value: f64) -> bool {
    low <= value && value <= high
}

/// Pre-submission range checks on the two fields the form guards locally.
pub fn validate_form(payload: &FormPayload) -> Result<(), String> {
    if !within(AGE_RANGE, payload.age) {
        return Err(AppError::Message("Edad fuera de rango (20-79)".into()).into());
    }
    if !within(TOTAL_CHOLESTEROL_RANGE, payload.total_cholesterol) {
        return Err(AppError::Message("Colesterol total fuera de rango (100-400)".into()).into());
    }
    Ok(())
}
