//! Rendering of backend responses into an output region.
//!
//! Both flows go through [`render_response`]. Values are interpolated into
//! markup verbatim. Nothing is HTML-escaped, so a backend or city name that
//! carries markup will inject it into the region.
//!
//! A report with a missing inner field (`weather: [{}]`, `sys: {}`) never
//! reaches this module: it is rejected as malformed while parsing, logged by
//! the flow, and the region keeps its previous content. Nothing is rendered
//! as `undefined`.

use crate::output::OutputRegion;
use crate::types::{format_number, ForecastEntry, ForecastResponse, WeatherReport, WeatherResponse};
use chrono::DateTime;

/// Which branch a rendered response took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendered {
    Report,
    BackendError,
}

/// Write a current-weather response into `region`.
///
/// A backend failure is written as plain text and no other field is read;
/// a report is written as markup.
pub fn render_response(response: &WeatherResponse, region: &mut dyn OutputRegion) -> Rendered {
    match response {
        WeatherResponse::Failure { error } => {
            region.set_text(error);
            Rendered::BackendError
        }
        WeatherResponse::Report(report) => {
            region.set_markup(&report_markup(report));
            Rendered::Report
        }
    }
}

pub fn report_markup(report: &WeatherReport) -> String {
    format!(
        "<p>City: {}</p>\n<p>Country: {}</p>\n<p>Temperature: {} °C</p>\n<p>Description: {}</p>\n",
        report.name,
        report.sys.country,
        format_number(report.main.temp),
        report.description().unwrap_or_default(),
    )
}

/// Write a forecast response into `region`, one paragraph per slot.
pub fn render_forecast(response: &ForecastResponse, region: &mut dyn OutputRegion) -> Rendered {
    match response {
        ForecastResponse::Failure { error } => {
            region.set_text(error);
            Rendered::BackendError
        }
        ForecastResponse::Forecast(entries) => {
            let markup: String = entries.iter().map(forecast_line).collect();
            region.set_markup(&markup);
            Rendered::Report
        }
    }
}

fn forecast_line(entry: &ForecastEntry) -> String {
    let when = DateTime::from_timestamp(entry.dt, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| entry.dt.to_string());
    let description = entry
        .weather
        .first()
        .map(|c| c.description.as_str())
        .unwrap_or_default();
    format!(
        "<p>{}: {} °C, {}</p>\n",
        when,
        format_number(entry.main.temp),
        description
    )
}
