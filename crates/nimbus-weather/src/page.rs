//! Hosts both flows against one provider and one output region.
//! Flows are spawned on the tokio runtime and never cancelled.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::flows::{self, FlowOutcome, SubmitEvent};
use crate::location::Geolocator;
use crate::output::SharedRegion;
use crate::provider::WeatherProvider;

#[derive(Clone)]
pub struct Page {
    provider: Arc<WeatherProvider>,
    region: SharedRegion,
    geolocator: Option<Arc<dyn Geolocator>>,
}

impl Page {
    /// A page without a geolocation capability.
    pub fn new(provider: WeatherProvider, region: SharedRegion) -> Self {
        Self {
            provider: Arc::new(provider),
            region,
            geolocator: None,
        }
    }

    pub fn with_geolocator(mut self, geolocator: Arc<dyn Geolocator>) -> Self {
        self.geolocator = Some(geolocator);
        self
    }

    /// Fire the geolocation flow. Must be called from within a tokio runtime.
    pub fn on_load(&self) -> JoinHandle<FlowOutcome> {
        let provider = self.provider.clone();
        let region = self.region.clone();
        let geolocator = self.geolocator.clone();

        tokio::spawn(async move {
            flows::geolocation_flow(geolocator.as_deref(), &provider, &region).await
        })
    }

    /// Fire the search flow for one submission.
    ///
    /// The default action is suppressed before this returns; the lookup
    /// itself runs in the background and races any other in-flight flow.
    pub fn on_submit(&self, event: &mut SubmitEvent) -> JoinHandle<FlowOutcome> {
        let city = event.accept();
        let provider = self.provider.clone();
        let region = self.region.clone();

        tracing::debug!("Search submitted");

        tokio::spawn(async move { flows::search_flow(city, &provider, &region).await })
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("provider", &self.provider)
            .field("has_geolocator", &self.geolocator.is_some())
            .finish_non_exhaustive()
    }
}
