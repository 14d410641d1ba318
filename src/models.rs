use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::severity::SeverityLevel;

/// One of the three independent risk-estimation scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleId {
    Framingham,
    Score,
    AccAha,
}

impl ScaleId {
    /// Fixed display and consensus order.
    pub const ALL: [ScaleId; 3] = [ScaleId::Framingham, ScaleId::Score, ScaleId::AccAha];

    pub fn key(self) -> &'static str {
        match self {
            ScaleId::Framingham => "framingham",
            ScaleId::Score => "score",
            ScaleId::AccAha => "acc_aha",
        }
    }

    pub fn chart_label(self) -> &'static str {
        match self {
            ScaleId::Framingham => "Framingham",
            ScaleId::Score => "SCORE",
            ScaleId::AccAha => "ACC/AHA",
        }
    }

    pub fn report_label(self) -> &'static str {
        match self {
            ScaleId::Framingham => "Framingham",
            ScaleId::Score => "SCORE2",
            ScaleId::AccAha => "ACC/AHA",
        }
    }

    fn index(self) -> usize {
        match self {
            ScaleId::Framingham => 0,
            ScaleId::Score => 1,
            ScaleId::AccAha => 2,
        }
    }
}

impl fmt::Display for ScaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// Absent and `null` both read as the zero value, like the form's `|| ""` coercion.
fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleResult {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub percent: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    /// Normalized severity, when the calculation service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<SeverityLevel>,
}

impl ScaleResult {
    pub fn new(percent: f64, category: impl Into<String>) -> Self {
        Self {
            percent,
            category: category.into(),
            severity: None,
        }
    }
}

/// The decoded `result` object before the three-scale invariant is checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRiskResult {
    #[serde(default)]
    pub framingham: Option<ScaleResult>,
    #[serde(default)]
    pub score: Option<ScaleResult>,
    #[serde(default)]
    pub acc_aha: Option<ScaleResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRiskResult")]
pub struct RiskResult {
    pub framingham: ScaleResult,
    pub score: ScaleResult,
    pub acc_aha: ScaleResult,
}

impl RiskResult {
    pub fn new(framingham: ScaleResult, score: ScaleResult, acc_aha: ScaleResult) -> Self {
        Self {
            framingham,
            score,
            acc_aha,
        }
    }

    /// Refuses results that do not carry all three scales.
    pub fn from_raw(raw: RawRiskResult) -> Result<Self, AppError> {
        let Some(framingham) = raw.framingham else {
            return Err(AppError::MissingScale(ScaleId::Framingham));
        };
        let Some(score) = raw.score else {
            return Err(AppError::MissingScale(ScaleId::Score));
        };
        let Some(acc_aha) = raw.acc_aha else {
            return Err(AppError::MissingScale(ScaleId::AccAha));
        };
        Ok(Self::new(framingham, score, acc_aha))
    }

    pub fn scale(&self, id: ScaleId) -> &ScaleResult {
        match id {
            ScaleId::Framingham => &self.framingham,
            ScaleId::Score => &self.score,
            ScaleId::AccAha => &self.acc_aha,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScaleId, &ScaleResult)> {
        ScaleId::ALL.into_iter().map(move |id| (id, self.scale(id)))
    }
}

impl TryFrom<RawRiskResult> for RiskResult {
    type Error = AppError;

    fn try_from(raw: RawRiskResult) -> Result<Self, Self::Error> {
        RiskResult::from_raw(raw)
    }
}

/// Response envelope returned by the external calculation service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceResponse {
    pub status: String,
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub result: Option<RawRiskResult>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ServiceResponse {
    pub fn into_result(self) -> Result<(Uuid, RiskResult, Vec<String>), AppError> {
        if self.status != "ok" {
            let message = if self.errors.is_empty() {
                "Error desconocido".to_string()
            } else {
                self.errors.join(", ")
            };
            return Err(AppError::Service(message));
        }
        let session_id = self
            .session_id
            .ok_or_else(|| AppError::Service("response carries no session_id".into()))?;
        let result = RiskResult::from_raw(self.result.unwrap_or_default())?;
        Ok((session_id, result, self.warnings))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsensusOutcome {
    pub global_level: SeverityLevel,
    pub dispersion: u8,
    /// Original category strings in Framingham, SCORE, ACC/AHA order.
    pub per_scale_categories: [String; 3],
}

impl ConsensusOutcome {
    pub fn category(&self, id: ScaleId) -> &str {
        &self.per_scale_categories[id.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    pub primary: String,
    pub secondary: String,
    pub discordant: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_complete_result() {
        let result: RiskResult = serde_json::from_value(json!({
            "framingham": {"percent": 18.0, "category": "alto"},
            "score": {"percent": 12.0, "category": "intermedio"},
            "acc_aha": {"percent": 25.0, "category": "muy alto"}
        }))
        .unwrap();
        assert_eq!(result.score.category, "intermedio");
        let order: Vec<ScaleId> = result.iter().map(|(id, _)| id).collect();
        assert_eq!(order, ScaleId::ALL.to_vec());
    }

    #[test]
    fn missing_category_defaults_to_empty() {
        let scale: ScaleResult = serde_json::from_value(json!({"percent": 3.5})).unwrap();
        assert_eq!(scale.category, "");
        assert_eq!(scale.severity, None);
    }

    #[test]
    fn absent_or_null_fields_read_as_zero_values() {
        let result: RiskResult = serde_json::from_value(json!({
            "framingham": {"category": "bajo"},
            "score": {"percent": null, "category": null},
            "acc_aha": {}
        }))
        .unwrap();
        assert_eq!(result.framingham.percent, 0.0);
        assert_eq!(result.framingham.category, "bajo");
        assert_eq!(result.score.percent, 0.0);
        assert_eq!(result.score.category, "");
        assert_eq!(result.acc_aha, ScaleResult::new(0.0, ""));

        let response: ServiceResponse = serde_json::from_value(json!({
            "status": "ok",
            "session_id": "0b8a3c4e-6f0e-4c47-9a0e-3f1f8e1c2d3a",
            "result": {
                "framingham": {"percent": null, "category": null},
                "score": {"percent": 3, "category": "bajo"},
                "acc_aha": {"percent": 5, "category": "bajo"}
            }
        }))
        .unwrap();
        let (_, result, _) = response.into_result().unwrap();
        assert_eq!(result.framingham.percent, 0.0);
        assert_eq!(result.framingham.category, "");
    }

    #[test]
    fn refuses_result_without_all_scales() {
        let raw: RawRiskResult = serde_json::from_value(json!({
            "framingham": {"percent": 4, "category": "bajo"},
            "acc_aha": {"percent": 5, "category": "bajo"}
        }))
        .unwrap();
        let err = RiskResult::from_raw(raw).unwrap_err();
        assert!(matches!(err, AppError::MissingScale(ScaleId::Score)));

        let direct = serde_json::from_value::<RiskResult>(json!({
            "framingham": {"percent": 4, "category": "bajo"},
            "score": {"percent": 3, "category": "bajo"}
        }));
        assert!(direct.is_err());
    }

    #[test]
    fn error_envelope_joins_messages() {
        let response: ServiceResponse = serde_json::from_value(json!({
            "status": "error",
            "errors": ["edad fuera de rango (20-79)", "Falta el parámetro sexo"]
        }))
        .unwrap();
        let err = response.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "edad fuera de rango (20-79), Falta el parámetro sexo"
        );

        let bare: ServiceResponse = serde_json::from_value(json!({"status": "error"})).unwrap();
        assert_eq!(bare.into_result().unwrap_err().to_string(), "Error desconocido");
    }

    #[test]
    fn ok_envelope_yields_session_and_result() {
        let response: ServiceResponse = serde_json::from_value(json!({
            "status": "ok",
            "session_id": "0b8a3c4e-6f0e-4c47-9a0e-3f1f8e1c2d3a",
            "result": {
                "framingham": {"percent": 4, "category": "bajo"},
                "score": {"percent": 3, "category": "bajo"},
                "acc_aha": {"percent": 5, "category": "bajo"}
            },
            "warnings": ["hdl en el límite permitido"]
        }))
        .unwrap();
        let (session_id, result, warnings) = response.into_result().unwrap();
        assert_eq!(
            session_id.to_string(),
            "0b8a3c4e-6f0e-4c47-9a0e-3f1f8e1c2d3a"
        );
        assert_eq!(result.acc_aha.percent, 5.0);
        assert_eq!(warnings.len(), 1);
    }
}
