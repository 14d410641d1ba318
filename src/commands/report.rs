use chrono::Utc;

use crate::state::DisplayState;

/// Returns the report download link for the current session, if it is still live.
pub fn report_link(state: &DisplayState) -> Result<String, String> {
    Ok(state.report_url(Utc::now())?)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::{RiskResult, ScaleResult};

    #[test]
    fn link_is_available_only_after_results() {
        let state = DisplayState::default();
        assert_eq!(
            report_link(&state).unwrap_err(),
            "No results to report yet."
        );

        let session_id = Uuid::new_v4();
        let result = RiskResult::new(
            ScaleResult::new(18.0, "alto"),
            ScaleResult::new(12.0, "intermedio"),
            ScaleResult::new(25.0, "muy alto"),
        );
        state.begin(session_id, result, Utc::now());
        let link = report_link(&state).unwrap();
        assert!(link.ends_with(&format!("/generate-report/{}", session_id)));
    }
}
