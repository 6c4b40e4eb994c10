//! Handlers for `/promos` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/promos` | Body: [`CreateBody`]; returns 201 + the new promo |
//! | `GET`  | `/promos` | All promos, hydrated with their events |
//! | `GET`  | `/promos/active` | Same, filtered to `active == true` |
//! | `POST` | `/promos/:promo_id/deactivate` | One-way; no reactivation |
//! | `POST` | `/promos/:promo_id/radius` | Body: `{"radius": ...}` |
//! | `POST` | `/promos/validate` | Body: [`ValidateBody`]; geocodes a route |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use promo_core::{
  code, dates,
  event::Event,
  polyline,
  promo::{HydratedPromo, NewPromo, Promo},
  store::{EventStore, PromoStore},
};
use promo_geocode::Geocoder;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Wire types ───────────────────────────────────────────────────────────────

/// A bare promo as it appears on the wire. `event` is the event id; list
/// endpoints use [`HydratedPromoBody`] instead.
#[derive(Debug, Serialize)]
pub struct PromoBody {
  pub id:          Uuid,
  pub code:        String,
  pub amount:      f64,
  pub event:       Uuid,
  pub radius:      f64,
  pub active:      bool,
  pub expiry_date: NaiveDate,
  pub created:     NaiveDate,
}

impl From<Promo> for PromoBody {
  fn from(p: Promo) -> Self {
    Self {
      id:          p.promo_id,
      code:        p.code,
      amount:      p.amount,
      event:       p.event_id,
      radius:      p.radius,
      active:      p.active,
      expiry_date: p.expiry_date,
      created:     p.created,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct LocationBody {
  pub latitude:  f64,
  pub longitude: f64,
  pub address:   Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventBody {
  pub id:       Uuid,
  pub name:     String,
  pub location: LocationBody,
}

impl From<Event> for EventBody {
  fn from(e: Event) -> Self {
    Self {
      id:       e.event_id,
      name:     e.name,
      location: LocationBody {
        latitude:  e.location.latitude,
        longitude: e.location.longitude,
        address:   e.location.address,
      },
    }
  }
}

/// A promo with its event (and the event's location) expanded.
#[derive(Debug, Serialize)]
pub struct HydratedPromoBody {
  pub id:          Uuid,
  pub code:        String,
  pub amount:      f64,
  pub radius:      f64,
  pub active:      bool,
  pub expiry_date: NaiveDate,
  pub created:     NaiveDate,
  pub event:       Option<EventBody>,
}

impl From<HydratedPromo> for HydratedPromoBody {
  fn from(hp: HydratedPromo) -> Self {
    Self {
      id:          hp.promo.promo_id,
      code:        hp.promo.code,
      amount:      hp.promo.amount,
      radius:      hp.promo.radius,
      active:      hp.promo.active,
      expiry_date: hp.promo.expiry_date,
      created:     hp.promo.created,
      event:       hp.event.map(EventBody::from),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub count:  usize,
  pub promos: Vec<HydratedPromoBody>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
  pub message: &'static str,
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /promos`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub event_id:     Uuid,
  pub amount:       f64,
  pub expiry_date:  NaiveDate,
  /// Initial geofence radius, in the event location's distance unit.
  pub event_radius: f64,
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
  pub promo: PromoBody,
}

/// `POST /promos` — returns 201 + the stored promo.
pub async fn create<S, G>(
  State(state): State<AppState<S, G>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PromoStore + EventStore,
  G: Geocoder,
{
  // The event must exist before we mint a code for it.
  let event = state
    .store
    .get_event(body.event_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if event.is_none() {
    return Err(ApiError::EventNotFound);
  }

  let input = NewPromo {
    event_id:    body.event_id,
    code:        code::generate(),
    amount:      body.amount,
    radius:      body.event_radius,
    expiry_date: body.expiry_date,
  };

  let promo = match state.store.create_promo(input).await {
    Ok(promo) => promo,
    Err(e) => {
      // The event can vanish between our check and the store's own; keep
      // the contractual not-found shape in that case.
      let gone = state
        .store
        .get_event(body.event_id)
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))?
        .is_none();
      if gone {
        return Err(ApiError::EventNotFound);
      }
      return Err(ApiError::CreateFailed(e.to_string()));
    }
  };

  Ok((
    StatusCode::CREATED,
    Json(CreateResponse { promo: PromoBody::from(promo) }),
  ))
}

// ─── Listing ─────────────────────────────────────────────────────────────────

/// `GET /promos`
pub async fn list_all<S, G>(
  State(state): State<AppState<S, G>>,
) -> Result<Json<ListResponse>, ApiError>
where
  S: PromoStore + EventStore,
  G: Geocoder,
{
  list(state, false).await
}

/// `GET /promos/active`
pub async fn list_active<S, G>(
  State(state): State<AppState<S, G>>,
) -> Result<Json<ListResponse>, ApiError>
where
  S: PromoStore + EventStore,
  G: Geocoder,
{
  list(state, true).await
}

async fn list<S, G>(
  state: AppState<S, G>,
  active_only: bool,
) -> Result<Json<ListResponse>, ApiError>
where
  S: PromoStore + EventStore,
  G: Geocoder,
{
  let promos = state
    .store
    .list_promos(active_only)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let promos: Vec<HydratedPromoBody> =
    promos.into_iter().map(HydratedPromoBody::from).collect();

  Ok(Json(ListResponse { count: promos.len(), promos }))
}

// ─── Deactivate ──────────────────────────────────────────────────────────────

/// `POST /promos/:promo_id/deactivate`
pub async fn deactivate<S, G>(
  State(state): State<AppState<S, G>>,
  Path(promo_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError>
where
  S: PromoStore + EventStore,
  G: Geocoder,
{
  if let Err(e) = state.store.deactivate(promo_id).await {
    tracing::warn!(%promo_id, error = %e, "deactivate did not apply");
    return Err(ApiError::DeactivateFailed);
  }
  Ok(Json(MessageResponse { message: "promo has been deactivated" }))
}

// ─── Change radius ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RadiusBody {
  pub radius: f64,
}

/// `POST /promos/:promo_id/radius` — body: `{"radius": ...}`
pub async fn change_radius<S, G>(
  State(state): State<AppState<S, G>>,
  Path(promo_id): Path<Uuid>,
  Json(body): Json<RadiusBody>,
) -> Result<Json<MessageResponse>, ApiError>
where
  S: PromoStore + EventStore,
  G: Geocoder,
{
  if let Err(e) = state.store.set_radius(promo_id, body.radius).await {
    tracing::warn!(%promo_id, error = %e, "radius update did not apply");
    return Err(ApiError::RadiusUpdateFailed);
  }
  Ok(Json(MessageResponse { message: "promo radius has been updated" }))
}

// ─── Validate ────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /promos/validate`.
#[derive(Debug, Deserialize)]
pub struct ValidateBody {
  pub code:        String,
  /// Free-text pickup location.
  pub origin:      String,
  /// Free-text dropoff location.
  pub destination: String,
}

#[derive(Debug, Serialize)]
pub struct ValidatedPromo {
  pub promo:       HydratedPromoBody,
  /// Encoded two-point origin→destination path.
  pub polyline:    String,
  pub origin:      String,
  pub destination: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
  pub validate_promo: ValidatedPromo,
}

/// `POST /promos/validate` — checks code existence and expiry, then geocodes
/// the route and returns it as an encoded polyline.
pub async fn validate<S, G>(
  State(state): State<AppState<S, G>>,
  Json(body): Json<ValidateBody>,
) -> Result<Json<ValidateResponse>, ApiError>
where
  S: PromoStore + EventStore,
  G: Geocoder,
{
  let hydrated = state
    .store
    .find_by_code(&body.code)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(ApiError::PromoNotFound)?;

  if hydrated.promo.is_expired(dates::today()) {
    return Err(ApiError::PromoExpired);
  }

  let origin_point = geocode_first(&*state.geocoder, &body.origin).await?;
  let destination_point = geocode_first(&*state.geocoder, &body.destination).await?;

  let polyline = polyline::encode(&[
    (origin_point.latitude, origin_point.longitude),
    (destination_point.latitude, destination_point.longitude),
  ]);

  Ok(Json(ValidateResponse {
    validate_promo: ValidatedPromo {
      promo: HydratedPromoBody::from(hydrated),
      polyline,
      origin: body.origin,
      destination: body.destination,
    },
  }))
}

/// Take the provider's best match; no candidates at all is an upstream
/// failure, not a guess.
async fn geocode_first<G: Geocoder>(
  geocoder: &G,
  place: &str,
) -> Result<promo_geocode::Candidate, ApiError> {
  geocoder
    .geocode(place)
    .await
    .map_err(|e| ApiError::Upstream(e.to_string()))?
    .into_iter()
    .next()
    .ok_or_else(|| ApiError::Upstream(format!("no geocoding results for {place:?}")))
}

/// Look up a promo by code with its event expanded. Not routed; used by
/// sibling services embedding this crate.
pub async fn get_one<S>(
  store: &S,
  code: &str,
) -> Result<Option<HydratedPromo>, ApiError>
where
  S: PromoStore,
{
  store
    .find_by_code(code)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))
}
