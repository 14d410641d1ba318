mod form;
mod report;
mod results;

pub use form::{validate_form, FormPayload, AGE_RANGE, TOTAL_CHOLESTEROL_RANGE};
pub use report::report_link;
pub use results::{display_results, render_chart, DisplayResponse, DisplayResultsPayload};
