//! Weather forecast dialog
//!
//! Geocode the requested city, report the resolved address, then report the
//! current temperature at those coordinates. The whole chain is awaited before
//! the dispatcher ends the turn, so both replies land inside it.

use super::Dialog;
use crate::clients::{Geocoder, WeatherProvider};
use crate::models::{roles, ClassificationResult};
use crate::session::Session;
use crate::Result;
use std::sync::Arc;
use tracing::info;

pub struct WeatherDialog {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherProvider>,
}

impl WeatherDialog {
    pub fn new(geocoder: Arc<dyn Geocoder>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { geocoder, weather }
    }
}

#[async_trait::async_trait]
impl Dialog for WeatherDialog {
    fn name(&self) -> &'static str {
        "WeatherDialog"
    }

    async fn run(&self, session: &mut Session, args: &ClassificationResult) -> Result<()> {
        let city = args.require(roles::LOCATION)?;

        let location = self.geocoder.geocode(city).await?;
        info!(
            city,
            address = %location.formatted_address,
            "Resolved forecast location"
        );

        // Sent before the forecast call so the user sees it even if that fails.
        session.send(format!("Location: {}", location.formatted_address));

        let reading = self
            .weather
            .current(location.latitude, location.longitude)
            .await?;

        session.send(format!(
            "Temperature is {} but feels like {}",
            reading.temperature, reading.apparent_temperature
        ));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::testing::{services, StubGeocoder, StubWeather};
    use crate::dialogs::create_default_registry;
    use crate::error::UNREACHABLE_MESSAGE;
    use crate::models::Entity;

    fn paris() -> ClassificationResult {
        ClassificationResult::new("Weather.GetForecast", vec![Entity::new(roles::LOCATION, "Paris")])
    }

    async fn run_with(geocoder: StubGeocoder, weather: StubWeather, args: ClassificationResult) -> Vec<String> {
        let registry = create_default_registry(services(geocoder, weather));
        let mut session = Session::new("conv", "weather please");
        registry.dispatch(&mut session, &args).await;
        assert!(session.is_ended());
        session.into_replies()
    }

    #[tokio::test]
    async fn test_address_precedes_temperature() {
        let geocoder = Arc::new(StubGeocoder::with_status("OK"));
        let weather = Arc::new(StubWeather::reading(15.0, 13.0));
        let dialog = WeatherDialog::new(geocoder.clone(), weather.clone());

        let mut session = Session::new("conv", "weather in Paris");
        dialog.run(&mut session, &paris()).await.unwrap();

        assert_eq!(
            session.replies(),
            [
                "Location: Paris, France".to_string(),
                "Temperature is 15 but feels like 13".to_string()
            ]
        );
        assert_eq!(*geocoder.calls.lock().unwrap(), vec!["Paris".to_string()]);
        assert_eq!(*weather.calls.lock().unwrap(), vec![(48.85, 2.35)]);
    }

    #[tokio::test]
    async fn test_zero_results_reports_location_not_found() {
        let replies = run_with(
            StubGeocoder::with_status("ZERO_RESULTS"),
            StubWeather::reading(15.0, 13.0),
            paris(),
        )
        .await;
        assert_eq!(replies, vec!["unable to find the address"]);
    }

    #[tokio::test]
    async fn test_over_query_limit_reports_rate_limit() {
        let replies = run_with(
            StubGeocoder::with_status("OVER_QUERY_LIMIT"),
            StubWeather::reading(15.0, 13.0),
            paris(),
        )
        .await;
        assert_eq!(replies, vec!["exceeded request limit"]);
    }

    #[tokio::test]
    async fn test_unreachable_uses_generic_message() {
        let replies = run_with(
            StubGeocoder::with_status("ENOTFOUND"),
            StubWeather::reading(15.0, 13.0),
            paris(),
        )
        .await;
        assert_eq!(replies, vec![UNREACHABLE_MESSAGE]);
    }

    #[tokio::test]
    async fn test_forecast_failure_after_address() {
        let replies = run_with(
            StubGeocoder::with_status("OK"),
            StubWeather::failing(),
            paris(),
        )
        .await;
        assert_eq!(
            replies,
            vec!["Location: Paris, France", "weather API returned 500"]
        );
    }

    #[tokio::test]
    async fn test_missing_city_is_invalid_entities() {
        let geocoder = StubGeocoder::with_status("OK");
        let replies = run_with(
            geocoder,
            StubWeather::reading(15.0, 13.0),
            ClassificationResult::new("Weather.GetForecast", vec![]),
        )
        .await;
        assert_eq!(
            replies,
            vec!["Invalid entities: missing 'Weather.Location' entity"]
        );
    }

    #[tokio::test]
    async fn test_same_inputs_same_replies() {
        let first = run_with(
            StubGeocoder::with_status("OK"),
            StubWeather::reading(15.5, 13.25),
            paris(),
        )
        .await;
        let second = run_with(
            StubGeocoder::with_status("OK"),
            StubWeather::reading(15.5, 13.25),
            paris(),
        )
        .await;

        assert_eq!(first, second);
        assert_eq!(first[1], "Temperature is 15.5 but feels like 13.25");
    }
}
