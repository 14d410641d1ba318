use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::severity::Locale;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
/// Sessions are dropped by the calculation service after an hour.
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub locale: Locale,
    pub session_ttl_minutes: i64,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            locale: Locale::Es,
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
            chart_width: 640,
            chart_height: 360,
        }
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let data =
            fs::read(path).with_context(|| format!("failed to read config file {:?}", path))?;
        serde_json::from_slice(&data)
            .with_context(|| format!("failed to parse config file {:?}", path))
    }
}
