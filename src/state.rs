use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    consensus::{build_consensus, interpret},
    error::AppError,
    models::{ConsensusOutcome, Interpretation, RiskResult},
};

/// Everything derived from one result delivered by the calculation service.
#[derive(Debug, Clone)]
pub struct DisplayCycle {
    pub session_id: Uuid,
    pub received_at: DateTime<Utc>,
    pub result: RiskResult,
    pub outcome: ConsensusOutcome,
    pub interpretation: Interpretation,
}

pub struct DisplayState {
    config: AppConfig,
    current: Mutex<Option<DisplayCycle>>,
}

impl DisplayState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            current: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Replaces the previous cycle with one built from `result`.
    pub fn begin(&self, session_id: Uuid, result: RiskResult, now: DateTime<Utc>) -> DisplayCycle {
        let outcome = build_consensus(&result);
        let interpretation = interpret(&outcome, self.config.locale);
        let cycle = DisplayCycle {
            session_id,
            received_at: now,
            result,
            outcome,
            interpretation,
        };
        debug!(
            session_id = %session_id,
            global_level = cycle.outcome.global_level.as_u8(),
            dispersion = cycle.outcome.dispersion,
            "display cycle started"
        );
        *self.current.lock() = Some(cycle.clone());
        cycle
    }

    pub fn reset(&self) {
        self.current.lock().take();
    }

    pub fn current(&self) -> Option<DisplayCycle> {
        self.current.lock().clone()
    }

    pub fn report_url(&self, now: DateTime<Utc>) -> Result<String, AppError> {
        let guard = self.current.lock();
        let Some(cycle) = guard.as_ref() else {
            return Err(AppError::Message("No results to report yet.".into()));
        };
        let Some(ttl) = Duration::try_minutes(self.config.session_ttl_minutes) else {
            return Err(AppError::Message(format!(
                "session_ttl_minutes out of range: {}",
                self.config.session_ttl_minutes
            )));
        };
        if now - cycle.received_at > ttl {
            warn!(session_id = %cycle.session_id, "report requested for expired session");
            return Err(AppError::Message("Session expired, recalculate first.".into()));
        }
        Ok(format!(
            "{}/generate-report/{}",
            self.config.api_base_url.trim_end_matches('/'),
            cycle.session_id
        ))
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
