//! [`GoogleGeocoder`] — HTTP client for the Google Geocoding API.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::{Candidate, Error, Geocoder, Result};

/// Connection settings for the geocoding provider.
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
  /// Endpoint URL, e.g. `"https://maps.googleapis.com/maps/api/geocode/json"`.
  pub base_url: String,
  pub api_key:  String,
}

/// Async client for the Google Geocoding JSON endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GoogleGeocoder {
  client: Client,
  config: GeocodeConfig,
}

impl GoogleGeocoder {
  pub fn new(config: GeocodeConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }
}

impl Geocoder for GoogleGeocoder {
  type Error = Error;

  async fn geocode(&self, place: &str) -> Result<Vec<Candidate>> {
    let resp = self
      .client
      .get(&self.config.base_url)
      .query(&[("address", place), ("key", &self.config.api_key)])
      .send()
      .await?;

    if !resp.status().is_success() {
      let status = resp.status();
      let text = resp.text().await.unwrap_or_default();
      return Err(Error::UnexpectedResponse(format!(
        "geocode request failed with status {status}: {text}"
      )));
    }

    let parsed: GeocodeResponse = resp.json().await?;
    candidates_from(parsed)
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
  status:  String,
  #[serde(default)]
  results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
  geometry:          Geometry,
  formatted_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
  location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
  lat: f64,
  lng: f64,
}

/// Map a provider response to candidates. `ZERO_RESULTS` is not an error —
/// it yields an empty list.
fn candidates_from(resp: GeocodeResponse) -> Result<Vec<Candidate>> {
  match resp.status.as_str() {
    "OK" | "ZERO_RESULTS" => Ok(
      resp
        .results
        .into_iter()
        .map(|r| Candidate {
          latitude:  r.geometry.location.lat,
          longitude: r.geometry.location.lng,
          label:     r.formatted_address,
        })
        .collect(),
    ),
    other => Err(Error::UnexpectedResponse(format!(
      "geocoder returned status {other:?}"
    ))),
  }
}

#[cfg(test)]
mod tests {
  use super::{GeocodeResponse, candidates_from};

  #[test]
  fn parses_ok_response() {
    let resp: GeocodeResponse = serde_json::from_str(
      r#"{
        "status": "OK",
        "results": [
          {
            "formatted_address": "London, UK",
            "geometry": { "location": { "lat": 51.5073509, "lng": -0.1277583 } }
          },
          {
            "formatted_address": "London, ON, Canada",
            "geometry": { "location": { "lat": 42.9849233, "lng": -81.2452768 } }
          }
        ]
      }"#,
    )
    .unwrap();

    let candidates = candidates_from(resp).unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].latitude, 51.5073509);
    assert_eq!(candidates[0].label.as_deref(), Some("London, UK"));
  }

  #[test]
  fn zero_results_is_empty_not_error() {
    let resp: GeocodeResponse =
      serde_json::from_str(r#"{"status": "ZERO_RESULTS", "results": []}"#)
        .unwrap();
    assert!(candidates_from(resp).unwrap().is_empty());
  }

  #[test]
  fn provider_error_status_is_an_error() {
    let resp: GeocodeResponse =
      serde_json::from_str(r#"{"status": "REQUEST_DENIED", "results": []}"#)
        .unwrap();
    assert!(candidates_from(resp).is_err());
  }
}
