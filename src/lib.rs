//! Consensus and charting for three cardiovascular risk scales.
//!
//! Framingham, SCORE2 and ACC/AHA results arrive already computed by an
//! external calculation service. This crate normalizes their category labels
//! onto one ordinal scale, derives a median consensus with a discordance
//! signal, and renders the percentages as a colored bar chart through a
//! [`chart::ChartSink`].

pub mod chart;
pub mod commands;
pub mod config;
pub mod consensus;
pub mod error;
pub mod models;
pub mod severity;
pub mod state;

pub use chart::{build_series, render, BarSeries, ChartSink, SvgChartSink};
pub use consensus::{build_consensus, interpret, DISCORDANCE_THRESHOLD};
pub use error::AppError;
pub use models::{ConsensusOutcome, Interpretation, RiskResult, ScaleId, ScaleResult};
pub use severity::{level_of, ColorClass, Locale, SeverityLevel};
