use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    chart::{build_series, draw_series, BarSeries, ChartSink},
    error::AppError,
    models::{ConsensusOutcome, Interpretation, ServiceResponse},
    state::DisplayState,
};

#[derive(Debug, Deserialize)]
pub struct DisplayResultsPayload {
    pub response: ServiceResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplayResponse {
    #[serde(rename = "sessionId")]
    pub session_id: Uuid,
    pub interpretation: Interpretation,
    pub outcome: ConsensusOutcome,
    pub series: BarSeries,
    pub warnings: Vec<String>,
}

/// Accepts a calculation-service response and rebuilds the interpretation and chart series.
pub fn display_results(
    state: &DisplayState,
    payload: DisplayResultsPayload,
) -> Result<DisplayResponse, String> {
    state.reset();
    let (session_id, result, warnings) = payload.response.into_result().map_err(|err| {
        if let AppError::MissingScale(scale) = &err {
            warn!(%scale, "refusing consensus for incomplete result");
        }
        err
    })?;

    let cycle = state.begin(session_id, result, Utc::now());
    if cycle.interpretation.discordant {
        info!(
            session_id = %session_id,
            dispersion = cycle.outcome.dispersion,
            "scales disagree by two or more tiers"
        );
    }

    Ok(DisplayResponse {
        session_id,
        series: build_series(&cycle.result),
        interpretation: cycle.interpretation,
        outcome: cycle.outcome,
        warnings,
    })
}

/// Draws the current cycle's result onto `sink`.
pub fn render_chart<S: ChartSink + ?Sized>(
    state: &DisplayState,
    sink: &mut S,
) -> Result<(), String> {
    let Some(cycle) = state.current() else {
        return Err(AppError::Message("No results to display.".into()).into());
    };
    draw_series(&build_series(&cycle.result), sink);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::chart::SvgChartSink;
    use crate::severity::SeverityLevel;

    fn payload(value: serde_json::Value) -> DisplayResultsPayload {
        DisplayResultsPayload {
            response: serde_json::from_value(value).unwrap(),
        }
    }

    #[test]
    fn successful_response_starts_a_cycle() {
        let state = DisplayState::default();
        let response = display_results(
            &state,
            payload(json!({
                "status": "ok",
                "session_id": "6a1f2c34-0d5e-4b6f-8a7b-9c0d1e2f3a4b",
                "result": {
                    "framingham": {"percent": 2, "category": "bajo"},
                    "score": {"percent": 30, "category": "muy alto"},
                    "acc_aha": {"percent": 9, "category": "moderado"}
                }
            })),
        )
        .unwrap();
        assert_eq!(response.outcome.global_level, SeverityLevel::Moderate);
        assert!(response.interpretation.discordant);
        assert_eq!(response.series.bars.len(), 3);
        assert_eq!(
            state.current().map(|cycle| cycle.session_id),
            Some(response.session_id)
        );

        let mut sink = SvgChartSink::default();
        render_chart(&state, &mut sink).unwrap();
        assert!(sink.document().contains("<title>30% — muy alto</title>"));
    }

    #[test]
    fn failed_response_clears_previous_cycle() {
        let state = DisplayState::default();
        display_results(
            &state,
            payload(json!({
                "status": "ok",
                "session_id": "6a1f2c34-0d5e-4b6f-8a7b-9c0d1e2f3a4b",
                "result": {
                    "framingham": {"percent": 4, "category": "bajo"},
                    "score": {"percent": 3, "category": "bajo"},
                    "acc_aha": {"percent": 5, "category": "bajo"}
                }
            })),
        )
        .unwrap();

        let err = display_results(
            &state,
            payload(json!({
                "status": "ok",
                "session_id": "7b2f3d45-1e6f-4c70-9b8c-0d1e2f3a4b5c",
                "result": {
                    "framingham": {"percent": 4, "category": "bajo"},
                    "acc_aha": {"percent": 5, "category": "bajo"}
                }
            })),
        )
        .unwrap_err();
        assert_eq!(err, "missing scale in risk result: score");
        assert!(state.current().is_none());

        let mut sink = SvgChartSink::default();
        assert!(render_chart(&state, &mut sink).is_err());
    }
}
