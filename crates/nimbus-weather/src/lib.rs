//! Current-weather lookups for Nimbus.
//!
//! Two flows feed one shared output region: a geolocation lookup fired when
//! the page loads, and a city search fired on every form submission. Both
//! query the backend's `/api/current_weather` endpoint and render through
//! the same function.

pub mod flows;
pub mod location;
pub mod output;
pub mod page;
pub mod provider;
pub mod render;
pub mod types;

pub use flows::{FlowOutcome, SubmitEvent};
pub use location::{FixedGeolocator, Geolocator, Unsupported};
pub use output::{ConsoleRegion, MemoryRegion, OutputRegion, RegionContent, SharedRegion};
pub use page::Page;
pub use provider::WeatherProvider;
pub use types::*;
