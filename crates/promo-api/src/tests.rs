//! Handler tests driving the router with in-memory infrastructure: a real
//! [`SqliteStore`] and a canned geocoder.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use axum::{
  Router,
  body::Body,
  http::{Request, Response, StatusCode},
};
use chrono::{NaiveDate, Utc};
use promo_core::{
  code,
  event::{Event, Location},
  polyline,
  promo::{HydratedPromo, NewPromo, Promo},
  store::{EventStore, PromoStore},
};
use promo_geocode::{Candidate, Geocoder};
use promo_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::AppState;

// ─── Fixtures ────────────────────────────────────────────────────────────────

const LONDON: (f64, f64) = (51.50732, -0.12765);
const PARIS: (f64, f64) = (48.85661, 2.35222);

/// Geocoder that resolves two fixed places and nothing else.
struct StubGeocoder;

impl Geocoder for StubGeocoder {
  type Error = promo_geocode::Error;

  async fn geocode(&self, place: &str) -> Result<Vec<Candidate>, Self::Error> {
    Ok(match place {
      "London" => vec![Candidate {
        latitude:  LONDON.0,
        longitude: LONDON.1,
        label:     Some("London, UK".into()),
      }],
      "Paris" => vec![Candidate {
        latitude:  PARIS.0,
        longitude: PARIS.1,
        label:     Some("Paris, France".into()),
      }],
      _ => vec![],
    })
  }
}

async fn setup() -> (Router, SqliteStore, Event) {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");

  let event = Event {
    event_id:   Uuid::new_v4(),
    name:       "Harbour Lights Festival".into(),
    location:   Location {
      latitude:  LONDON.0,
      longitude: LONDON.1,
      address:   Some("Victoria Embankment, London".into()),
    },
    created_at: Utc::now(),
  };
  store.insert_event(&event).await.expect("seed event");

  let app = crate::api_router(AppState {
    store:    Arc::new(store.clone()),
    geocoder: Arc::new(StubGeocoder),
  });

  (app, store, event)
}

async fn seed_promo(store: &SqliteStore, event_id: Uuid, expiry: NaiveDate) -> promo_core::promo::Promo {
  store
    .create_promo(NewPromo {
      event_id,
      code: code::generate(),
      amount: 10.0,
      radius: 5.0,
      expiry_date: expiry,
    })
    .await
    .expect("seed promo")
}

fn far_future() -> NaiveDate { NaiveDate::from_ymd_opt(2099, 1, 1).unwrap() }

fn get(uri: &str) -> Request<Body> {
  Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri(uri)
    .header("content-type", "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri(uri)
    .body(Body::empty())
    .unwrap()
}

async fn body_json(resp: Response<Body>) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .expect("response body");
  serde_json::from_slice(&bytes).expect("json body")
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_returns_201_and_active_promo() {
  let (app, _store, event) = setup().await;

  let resp = app
    .oneshot(post_json(
      "/promos",
      json!({
        "event_id": event.event_id,
        "amount": 10.0,
        "expiry_date": "2099-01-01",
        "event_radius": 5.0
      }),
    ))
    .await
    .unwrap();

  assert_eq!(resp.status(), StatusCode::CREATED);
  let body = body_json(resp).await;
  let promo = &body["promo"];
  assert_eq!(promo["active"], json!(true));
  assert_eq!(promo["event"], json!(event.event_id));
  assert_eq!(promo["expiry_date"], "2099-01-01");
  assert!(!promo["code"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn create_unknown_event_is_structured_400() {
  let (app, _store, _event) = setup().await;

  let resp = app
    .oneshot(post_json(
      "/promos",
      json!({
        "event_id": Uuid::new_v4(),
        "amount": 10.0,
        "expiry_date": "2099-01-01",
        "event_radius": 5.0
      }),
    ))
    .await
    .unwrap();

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(
    body_json(resp).await,
    json!({ "message": "event id does not exist" })
  );
}

/// Store whose event exists for exactly one lookup, then disappears —
/// the owning service deleting it mid-request. Promo writes delegate to a
/// real store with no events seeded.
struct VanishingEventStore {
  inner:  SqliteStore,
  served: AtomicBool,
}

impl EventStore for VanishingEventStore {
  type Error = promo_store_sqlite::Error;

  async fn get_event(
    &self,
    event_id: Uuid,
  ) -> Result<Option<Event>, Self::Error> {
    if self.served.swap(true, Ordering::SeqCst) {
      return Ok(None);
    }
    Ok(Some(Event {
      event_id,
      name: "Harbour Lights Festival".into(),
      location: Location {
        latitude:  LONDON.0,
        longitude: LONDON.1,
        address:   None,
      },
      created_at: Utc::now(),
    }))
  }
}

impl PromoStore for VanishingEventStore {
  type Error = promo_store_sqlite::Error;

  async fn create_promo(&self, input: NewPromo) -> Result<Promo, Self::Error> {
    self.inner.create_promo(input).await
  }

  async fn list_promos(
    &self,
    active_only: bool,
  ) -> Result<Vec<HydratedPromo>, Self::Error> {
    self.inner.list_promos(active_only).await
  }

  async fn find_by_code(
    &self,
    code: &str,
  ) -> Result<Option<HydratedPromo>, Self::Error> {
    self.inner.find_by_code(code).await
  }

  async fn deactivate(&self, promo_id: Uuid) -> Result<(), Self::Error> {
    self.inner.deactivate(promo_id).await
  }

  async fn set_radius(
    &self,
    promo_id: Uuid,
    radius: f64,
  ) -> Result<(), Self::Error> {
    self.inner.set_radius(promo_id, radius).await
  }
}

#[tokio::test]
async fn create_event_vanishing_mid_request_keeps_not_found_shape() {
  let inner = SqliteStore::open_in_memory().await.expect("in-memory store");
  let app = crate::api_router(AppState {
    store:    Arc::new(VanishingEventStore {
      inner,
      served: AtomicBool::new(false),
    }),
    geocoder: Arc::new(StubGeocoder),
  });

  let resp = app
    .oneshot(post_json(
      "/promos",
      json!({
        "event_id": Uuid::new_v4(),
        "amount": 10.0,
        "expiry_date": "2099-01-01",
        "event_radius": 5.0
      }),
    ))
    .await
    .unwrap();

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(
    body_json(resp).await,
    json!({ "message": "event id does not exist" })
  );
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_all_counts_and_hydrates() {
  let (app, store, event) = setup().await;
  seed_promo(&store, event.event_id, far_future()).await;
  seed_promo(&store, event.event_id, far_future()).await;

  let resp = app.oneshot(get("/promos")).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);

  let body = body_json(resp).await;
  assert_eq!(body["count"], json!(2));
  let promos = body["promos"].as_array().unwrap();
  assert_eq!(promos.len(), 2);
  // Events come back expanded, location included.
  assert_eq!(promos[0]["event"]["id"], json!(event.event_id));
  assert_eq!(promos[0]["event"]["location"]["latitude"], json!(LONDON.0));
}

#[tokio::test]
async fn list_active_excludes_deactivated() {
  let (app, store, event) = setup().await;
  let keep = seed_promo(&store, event.event_id, far_future()).await;
  let retired = seed_promo(&store, event.event_id, far_future()).await;
  store.deactivate(retired.promo_id).await.unwrap();

  let resp = app.clone().oneshot(get("/promos/active")).await.unwrap();
  let body = body_json(resp).await;
  assert_eq!(body["count"], json!(1));
  assert_eq!(body["promos"][0]["id"], json!(keep.promo_id));

  // The unfiltered listing still returns both.
  let resp = app.oneshot(get("/promos")).await.unwrap();
  assert_eq!(body_json(resp).await["count"], json!(2));
}

// ─── Deactivate ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn deactivate_reports_success_and_is_idempotent() {
  let (app, store, event) = setup().await;
  let promo = seed_promo(&store, event.event_id, far_future()).await;
  let uri = format!("/promos/{}/deactivate", promo.promo_id);

  for _ in 0..2 {
    let resp = app.clone().oneshot(post_empty(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      body_json(resp).await,
      json!({ "message": "promo has been deactivated" })
    );
  }

  let found = store.find_by_code(&promo.code).await.unwrap().unwrap();
  assert!(!found.promo.active);
}

#[tokio::test]
async fn deactivate_unknown_id_is_400() {
  let (app, _store, _event) = setup().await;

  let resp = app
    .oneshot(post_empty(&format!("/promos/{}/deactivate", Uuid::new_v4())))
    .await
    .unwrap();

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(
    body_json(resp).await,
    json!({ "error": "Could not deactivated the promo" })
  );
}

// ─── Change radius ───────────────────────────────────────────────────────────

#[tokio::test]
async fn change_radius_updates_store() {
  let (app, store, event) = setup().await;
  let promo = seed_promo(&store, event.event_id, far_future()).await;

  let resp = app
    .oneshot(post_json(
      &format!("/promos/{}/radius", promo.promo_id),
      json!({ "radius": 12.5 }),
    ))
    .await
    .unwrap();

  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(
    body_json(resp).await,
    json!({ "message": "promo radius has been updated" })
  );

  let found = store.find_by_code(&promo.code).await.unwrap().unwrap();
  assert_eq!(found.promo.radius, 12.5);
}

#[tokio::test]
async fn change_radius_unknown_id_is_400() {
  let (app, _store, _event) = setup().await;

  let resp = app
    .oneshot(post_json(
      &format!("/promos/{}/radius", Uuid::new_v4()),
      json!({ "radius": 3.0 }),
    ))
    .await
    .unwrap();

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(
    body_json(resp).await,
    json!({ "error": "Could not update promo radius" })
  );
}

// ─── Validate ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn validate_returns_decodable_route() {
  let (app, store, event) = setup().await;
  let promo = seed_promo(&store, event.event_id, far_future()).await;

  let resp = app
    .oneshot(post_json(
      "/promos/validate",
      json!({ "code": promo.code, "origin": "London", "destination": "Paris" }),
    ))
    .await
    .unwrap();

  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  let vp = &body["validate_promo"];

  assert_eq!(vp["origin"], "London");
  assert_eq!(vp["destination"], "Paris");
  assert_eq!(vp["promo"]["code"], json!(promo.code));
  assert_eq!(vp["promo"]["event"]["id"], json!(event.event_id));

  // The polyline decodes back to the geocoded pair.
  let path = polyline::decode(vp["polyline"].as_str().unwrap()).unwrap();
  assert_eq!(path, vec![LONDON, PARIS]);
}

#[tokio::test]
async fn get_one_returns_hydrated_promo() {
  let (_app, store, event) = setup().await;
  let promo = seed_promo(&store, event.event_id, far_future()).await;

  let found = crate::promos::get_one(&store, &promo.code)
    .await
    .unwrap()
    .expect("promo found");
  assert_eq!(found.promo.promo_id, promo.promo_id);
  assert_eq!(
    found.event.as_ref().map(|e| e.event_id),
    Some(event.event_id)
  );

  let missing = crate::promos::get_one(&store, "NOSUCHCD").await.unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn validate_unknown_code_is_400() {
  let (app, _store, _event) = setup().await;

  let resp = app
    .oneshot(post_json(
      "/promos/validate",
      json!({ "code": "NOSUCHCD", "origin": "London", "destination": "Paris" }),
    ))
    .await
    .unwrap();

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(
    body_json(resp).await,
    json!({ "error": "Promo code does not exist" })
  );
}

#[tokio::test]
async fn validate_expired_code_is_400() {
  let (app, store, event) = setup().await;
  let expired = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
  let promo = seed_promo(&store, event.event_id, expired).await;

  let resp = app
    .oneshot(post_json(
      "/promos/validate",
      json!({ "code": promo.code, "origin": "London", "destination": "Paris" }),
    ))
    .await
    .unwrap();

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(
    body_json(resp).await,
    json!({ "error": "Promo code has expired" })
  );
}

#[tokio::test]
async fn validate_unresolvable_place_is_upstream_failure() {
  let (app, store, event) = setup().await;
  let promo = seed_promo(&store, event.event_id, far_future()).await;

  let resp = app
    .oneshot(post_json(
      "/promos/validate",
      json!({ "code": promo.code, "origin": "Atlantis", "destination": "Paris" }),
    ))
    .await
    .unwrap();

  assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
  let body = body_json(resp).await;
  assert!(
    body["error"]
      .as_str()
      .unwrap()
      .contains("no geocoding results")
  );
}
