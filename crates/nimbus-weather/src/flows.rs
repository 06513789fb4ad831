//! The geolocation and search flows.
//!
//! Each flow ends either in one region write (report or backend error) or
//! in exactly one `error`-level log entry with the region left untouched.

use crate::location::Geolocator;
use crate::output::SharedRegion;
use crate::provider::WeatherProvider;
use crate::render::{render_response, Rendered};
use crate::types::{CityQuery, WeatherQuery};

pub const GEOLOCATION_UNSUPPORTED: &str = "Geolocation is not supported by this environment.";

/// How a flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// A weather report was written as markup.
    Rendered,
    /// The backend's `error` text was written.
    BackendError,
    /// Transport, parse or position failure; logged, region untouched.
    Failed,
    /// No geolocation capability; logged, region untouched.
    Unsupported,
}

impl From<Rendered> for FlowOutcome {
    fn from(r: Rendered) -> Self {
        match r {
            Rendered::Report => FlowOutcome::Rendered,
            Rendered::BackendError => FlowOutcome::BackendError,
        }
    }
}

/// A submission of the lookup form.
#[derive(Debug, Clone)]
pub struct SubmitEvent {
    city: String,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Take over the submission: suppress the default action and read the
    /// city field verbatim.
    pub fn accept(&mut self) -> CityQuery {
        self.prevent_default();
        CityQuery::new(self.city.clone())
    }
}

/// Query the backend and render the answer.
pub async fn fetch_and_render(
    provider: &WeatherProvider,
    query: &WeatherQuery,
    region: &SharedRegion,
) -> FlowOutcome {
    match provider.current_weather(query).await {
        Ok(response) => {
            let rendered = render_response(&response, &mut *region.lock());
            tracing::debug!(?rendered, "Weather response rendered");
            rendered.into()
        }
        Err(e) => {
            tracing::error!("Error: {}", e);
            FlowOutcome::Failed
        }
    }
}

/// Look up the weather at the current position.
///
/// `None` stands for an environment without any location capability.
pub async fn geolocation_flow(
    geolocator: Option<&dyn Geolocator>,
    provider: &WeatherProvider,
    region: &SharedRegion,
) -> FlowOutcome {
    let Some(geolocator) = geolocator.filter(|g| g.is_available()) else {
        tracing::error!("{}", GEOLOCATION_UNSUPPORTED);
        return FlowOutcome::Unsupported;
    };

    match geolocator.current_position().await {
        Ok(position) => {
            tracing::info!(
                "Got location: {}, {}",
                position.latitude,
                position.longitude
            );
            fetch_and_render(provider, &WeatherQuery::Coordinates(position), region).await
        }
        Err(e) => {
            tracing::error!("Geolocation error: {}", e);
            FlowOutcome::Failed
        }
    }
}

/// Look up a submitted city.
///
/// The caller accepts the [`SubmitEvent`] first, so the default action is
/// suppressed before any await point.
pub async fn search_flow(
    city: CityQuery,
    provider: &WeatherProvider,
    region: &SharedRegion,
) -> FlowOutcome {
    fetch_and_render(provider, &WeatherQuery::City(city), region).await
}
