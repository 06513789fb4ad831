use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Geographic position reported by a [`crate::Geolocator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Free-text city lookup, taken verbatim from the search field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityQuery {
    pub location: String,
}

impl CityQuery {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

/// One current-weather lookup: by coordinates or by city name, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Coordinates(Coordinate),
    City(CityQuery),
}

impl WeatherQuery {
    /// Query-string pairs for the backend, unencoded.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            WeatherQuery::Coordinates(c) => vec![
                ("lat", format_number(c.latitude)),
                ("lon", format_number(c.longitude)),
            ],
            WeatherQuery::City(city) => vec![("location", city.location.clone())],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SysInfo {
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainInfo {
    pub temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub description: String,
}

/// Successful current-weather body. Only the rendered fields are modelled;
/// anything else the backend forwards is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub name: String,
    pub sys: SysInfo,
    pub main: MainInfo,
    pub weather: Vec<Condition>,
}

impl WeatherReport {
    /// Description of the first reported condition.
    pub fn description(&self) -> Option<&str> {
        self.weather.first().map(|c| c.description.as_str())
    }
}

/// Parsed body of `/api/current_weather`.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherResponse {
    /// The backend reported a failure through a truthy `error` field.
    Failure { error: String },
    Report(WeatherReport),
}

impl WeatherResponse {
    /// Classify a JSON body.
    ///
    /// A truthy `error` field wins and nothing else is read. Otherwise the
    /// body must be a complete report with at least one condition.
    pub fn from_value(value: Value) -> Result<Self, WeatherError> {
        if let Some(error) = backend_error(&value) {
            return Ok(Self::Failure { error });
        }

        let report: WeatherReport =
            serde_json::from_value(value).map_err(|e| WeatherError::Malformed(e.to_string()))?;

        if report.weather.is_empty() {
            return Err(WeatherError::Malformed(
                "weather conditions list is empty".to_string(),
            ));
        }

        Ok(Self::Report(report))
    }
}

/// One forecast slot from `/api/weather_forecast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Unix timestamp (seconds, UTC)
    pub dt: i64,
    pub main: MainInfo,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

/// Parsed body of `/api/weather_forecast`.
///
/// The backend forwards the upstream forecast body, so a failure arrives
/// either as `{"error": ...}` or as the upstream `{"cod": "404", "message": ...}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastResponse {
    Failure { error: String },
    Forecast(Vec<ForecastEntry>),
}

impl ForecastResponse {
    pub fn from_value(value: Value) -> Result<Self, WeatherError> {
        if let Some(error) = backend_error(&value) {
            return Ok(Self::Failure { error });
        }
        if value.get("list").is_none() {
            if let Some(error) = upstream_failure(&value) {
                return Ok(Self::Failure { error });
            }
        }

        #[derive(Deserialize)]
        struct Body {
            list: Vec<ForecastEntry>,
        }

        let body: Body =
            serde_json::from_value(value).map_err(|e| WeatherError::Malformed(e.to_string()))?;
        Ok(Self::Forecast(body.list))
    }
}

/// Print a number the way a JavaScript template literal would: integral
/// values without a fraction, and no negative zero.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

/// The `error` field of a body, if present and truthy.
fn backend_error(value: &Value) -> Option<String> {
    let error = value.get("error")?;
    if !is_truthy(error) {
        return None;
    }
    Some(value_text(error))
}

/// The failure reported by an upstream body that carries no `list`: its
/// `message`, or failing that a non-200 `cod`.
fn upstream_failure(value: &Value) -> Option<String> {
    if let Some(message) = value.get("message").filter(|m| is_truthy(m)) {
        return Some(value_text(message));
    }

    let cod = value.get("cod")?;
    let ok = match cod {
        Value::String(s) => s == "200",
        Value::Number(n) => n.as_u64() == Some(200),
        _ => false,
    };
    (!ok).then(|| format!("Forecast request failed with code {}", value_text(cod)))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truthiness as a JavaScript `if` would see it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Geolocation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Position unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Weather lookup errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unexpected response shape: {0}")]
    Malformed(String),
}
