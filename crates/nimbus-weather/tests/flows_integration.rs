//! Integration tests for the weather flows using wiremock.
//!
//! Each test runs a mock backend exposing `/api/current_weather` and checks
//! what ends up in the shared output region.

use std::sync::Arc;
use std::time::Duration;

use nimbus_weather::{
    CityQuery, FixedGeolocator, FlowOutcome, ForecastResponse, MemoryRegion, Page,
    RegionContent, SharedRegion, SubmitEvent, WeatherProvider,
};
use parking_lot::Mutex;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn london_body() -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": -0.12, "lat": 51.5},
        "name": "London",
        "sys": {"country": "GB"},
        "main": {"temp": 15.2, "humidity": 81},
        "weather": [{"description": "light rain"}],
        "cod": 200
    })
}

fn page_for(uri: &str, region: &Arc<Mutex<MemoryRegion>>) -> Page {
    let provider = WeatherProvider::new(uri, Some(Duration::from_secs(5))).unwrap();
    let shared: SharedRegion = region.clone();
    Page::new(provider, shared)
}

#[tokio::test]
async fn test_coordinate_lookup_renders_report() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/current_weather"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let region = MemoryRegion::new().shared();
    let page = page_for(&mock_server.uri(), &region)
        .with_geolocator(Arc::new(FixedGeolocator::new(51.5, -0.12)));

    let outcome = page.on_load().await.unwrap();
    assert_eq!(outcome, FlowOutcome::Rendered);

    let content = region.lock().content().clone();
    let RegionContent::Markup(markup) = &content else {
        panic!("expected markup, got {content:?}");
    };

    let positions: Vec<usize> = [
        "City: London",
        "Country: GB",
        "Temperature: 15.2 °C",
        "Description: light rain",
    ]
    .iter()
    .map(|needle| markup.find(needle).unwrap())
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "out of order: {markup}");
}

#[tokio::test]
async fn test_backend_error_is_shown_as_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/current_weather"))
        .and(query_param("location", "Paris"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "City not found"})),
        )
        .mount(&mock_server)
        .await;

    let region = MemoryRegion::new().shared();
    let page = page_for(&mock_server.uri(), &region);

    let mut event = SubmitEvent::new("Paris");
    let outcome = page.on_submit(&mut event).await.unwrap();

    assert!(event.default_prevented());
    assert_eq!(outcome, FlowOutcome::BackendError);
    assert_eq!(
        region.lock().content(),
        &RegionContent::Text("City not found".to_string())
    );
}

#[tokio::test]
async fn test_error_body_on_bad_request_status_is_still_rendered() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/current_weather"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            serde_json::json!({"error": "Location or coordinates are required"}),
        ))
        .mount(&mock_server)
        .await;

    let region = MemoryRegion::new().shared();
    let page = page_for(&mock_server.uri(), &region);

    let outcome = page.on_submit(&mut SubmitEvent::new("")).await.unwrap();

    assert_eq!(outcome, FlowOutcome::BackendError);
    assert_eq!(
        region.lock().content(),
        &RegionContent::Text("Location or coordinates are required".to_string())
    );
}

#[tokio::test]
async fn test_network_failure_keeps_previous_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/current_weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(london_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let previous = RegionContent::Markup("<p>City: London</p>".to_string());
    let region = MemoryRegion::with_content(previous.clone()).shared();
    let provider =
        WeatherProvider::new(&mock_server.uri(), Some(Duration::from_millis(100))).unwrap();
    let shared: SharedRegion = region.clone();
    let page = Page::new(provider, shared);

    let mut event = SubmitEvent::new("New York");
    let outcome = page.on_submit(&mut event).await.unwrap();

    assert_eq!(outcome, FlowOutcome::Failed);
    assert!(event.default_prevented());
    assert_eq!(region.lock().content(), &previous);
    assert_eq!(region.lock().writes(), 0);
}

#[tokio::test]
async fn test_malformed_json_keeps_previous_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/current_weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let region = MemoryRegion::with_content(RegionContent::Text("before".into())).shared();
    let page = page_for(&mock_server.uri(), &region);

    let outcome = page.on_submit(&mut SubmitEvent::new("Oslo")).await.unwrap();

    assert_eq!(outcome, FlowOutcome::Failed);
    assert_eq!(region.lock().content(), &RegionContent::Text("before".into()));
}

#[tokio::test]
async fn test_city_is_url_encoded() {
    let mock_server = MockServer::start().await;
    let city = "New York & Co/?x=1";

    Mock::given(method("GET"))
        .and(path("/api/current_weather"))
        .and(query_param("location", city))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let region = MemoryRegion::new().shared();
    let page = page_for(&mock_server.uri(), &region);

    let outcome = page.on_submit(&mut SubmitEvent::new(city)).await.unwrap();
    assert_eq!(outcome, FlowOutcome::Rendered);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let pairs: Vec<_> = requests[0].url.query_pairs().collect();
    assert_eq!(pairs.len(), 1);
}

#[tokio::test]
async fn test_slowest_response_wins_the_region() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/current_weather"))
        .and(query_param("location", "Slowtown"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"error": "slow answer"}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/current_weather"))
        .and(query_param("location", "Fastville"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "fast answer"})),
        )
        .mount(&mock_server)
        .await;

    let region = MemoryRegion::new().shared();
    let page = page_for(&mock_server.uri(), &region);

    let slow = page.on_submit(&mut SubmitEvent::new("Slowtown"));
    let fast = page.on_submit(&mut SubmitEvent::new("Fastville"));

    assert_eq!(fast.await.unwrap(), FlowOutcome::BackendError);
    assert_eq!(slow.await.unwrap(), FlowOutcome::BackendError);

    assert_eq!(
        region.lock().content(),
        &RegionContent::Text("slow answer".to_string())
    );
    assert_eq!(region.lock().writes(), 2);
}

#[tokio::test]
async fn test_forecast_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather_forecast"))
        .and(query_param("location", "Prague"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "list": [
                {"dt": 1609459200, "main": {"temp": 10}, "weather": [{"description": "cloudy"}]},
                {"dt": 1609470000, "main": {"temp": 8.5}, "weather": [{"description": "snow"}]}
            ]
        })))
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::new(&mock_server.uri(), None).unwrap();
    let response = provider.forecast(&CityQuery::new("Prague")).await.unwrap();

    let ForecastResponse::Forecast(entries) = response else {
        panic!("expected forecast entries");
    };
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].main.temp, 8.5);
}

#[tokio::test]
async fn test_forecast_for_unknown_city_is_a_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather_forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::new(&mock_server.uri(), None).unwrap();
    let response = provider.forecast(&CityQuery::new("Atlantis")).await.unwrap();

    assert_eq!(
        response,
        ForecastResponse::Failure {
            error: "city not found".to_string()
        }
    );
}

struct DeniedGeolocator;

#[async_trait::async_trait]
impl nimbus_weather::Geolocator for DeniedGeolocator {
    async fn current_position(
        &self,
    ) -> Result<nimbus_weather::Coordinate, nimbus_weather::LocationError> {
        Err(nimbus_weather::LocationError::PermissionDenied)
    }
}

#[tokio::test]
async fn test_position_failures_never_reach_the_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let previous = RegionContent::Text("before".to_string());
    let region = MemoryRegion::with_content(previous.clone()).shared();

    let denied = page_for(&mock_server.uri(), &region).with_geolocator(Arc::new(DeniedGeolocator));
    assert_eq!(denied.on_load().await.unwrap(), FlowOutcome::Failed);

    let missing = page_for(&mock_server.uri(), &region);
    assert_eq!(missing.on_load().await.unwrap(), FlowOutcome::Unsupported);

    assert_eq!(region.lock().content(), &previous);
    assert_eq!(region.lock().writes(), 0);
}
