//! Maps weather crate errors to `nimbus_core::AppError` for consistent
//! user-facing messages.

use nimbus_core::{AppError, NetworkError, ReqwestErrorExt, WeatherError as CoreWeatherError};
use nimbus_weather::WeatherError;

pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}

impl IntoAppError for WeatherError {
    fn into_app_error(self) -> AppError {
        match self {
            WeatherError::Network(e) => AppError::Network(e.into_network_error()),
            WeatherError::InvalidUrl(e) => AppError::Network(NetworkError::ConnectionFailed(
                format!("invalid backend URL: {e}"),
            )),
            WeatherError::Parse(s) => AppError::Network(NetworkError::InvalidResponse(s)),
            WeatherError::Malformed(s) => AppError::Weather(CoreWeatherError::MalformedPayload(s)),
        }
    }
}
