//! [`SqliteStore`] — the SQLite implementation of [`PromoStore`] and
//! [`EventStore`].

use std::path::Path;

use promo_core::{
  dates,
  event::Event,
  promo::{HydratedPromo, NewPromo, Promo},
  store::{EventStore, PromoStore},
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawEvent, RawPromoRow, encode_date, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row mapping ─────────────────────────────────────────────────────────────

const PROMO_SELECT: &str = "
  SELECT
    p.promo_id, p.event_id, p.code, p.amount, p.radius,
    p.active, p.expiry_date, p.created,
    e.name, e.latitude, e.longitude, e.address, e.created_at
  FROM promos p
  LEFT JOIN events e ON e.event_id = p.event_id";

fn promo_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPromoRow> {
  Ok(RawPromoRow {
    promo_id:    row.get(0)?,
    event_id:    row.get(1)?,
    code:        row.get(2)?,
    amount:      row.get(3)?,
    radius:      row.get(4)?,
    active:      row.get(5)?,
    expiry_date: row.get(6)?,
    created:     row.get(7)?,
    event_name:       row.get(8)?,
    event_latitude:   row.get(9)?,
    event_longitude:  row.get(10)?,
    event_address:    row.get(11)?,
    event_created_at: row.get(12)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A promo store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Seed an event row. Events are owned by the events service; this exists
  /// for tests and for replicating the upstream read model.
  pub async fn insert_event(&self, event: &Event) -> Result<()> {
    let id_str     = encode_uuid(event.event_id);
    let name       = event.name.clone();
    let latitude   = event.location.latitude;
    let longitude  = event.location.longitude;
    let address    = event.location.address.clone();
    let at_str     = encode_dt(event.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (event_id, name, latitude, longitude, address, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, latitude, longitude, address, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a promo UPDATE and translate "zero rows matched" into
  /// [`Error::PromoNotFound`].
  async fn update_promo(
    &self,
    promo_id: Uuid,
    sql: &'static str,
    value: Option<f64>,
  ) -> Result<()> {
    let id_str = encode_uuid(promo_id);

    let changed = self
      .conn
      .call(move |conn| {
        let changed = match value {
          Some(v) => conn.execute(sql, rusqlite::params![id_str, v])?,
          None => conn.execute(sql, rusqlite::params![id_str])?,
        };
        Ok(changed)
      })
      .await?;

    if changed == 0 {
      return Err(Error::PromoNotFound(promo_id));
    }
    Ok(())
  }
}

// ─── PromoStore impl ─────────────────────────────────────────────────────────

impl PromoStore for SqliteStore {
  type Error = Error;

  async fn create_promo(&self, input: NewPromo) -> Result<Promo> {
    let event_id_str = encode_uuid(input.event_id);
    let code_check   = input.code.clone();

    // Pre-checks: the referenced event must exist and the code must be free.
    let (event_exists, code_taken): (bool, bool) = self
      .conn
      .call(move |conn| {
        let event_exists: bool = conn
          .query_row(
            "SELECT 1 FROM events WHERE event_id = ?1",
            rusqlite::params![event_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        let code_taken: bool = conn
          .query_row(
            "SELECT 1 FROM promos WHERE code = ?1",
            rusqlite::params![code_check],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        Ok((event_exists, code_taken))
      })
      .await?;

    if !event_exists {
      return Err(Error::EventNotFound(input.event_id));
    }
    if code_taken {
      return Err(Error::DuplicateCode(input.code));
    }

    let promo = Promo {
      promo_id:    Uuid::new_v4(),
      event_id:    input.event_id,
      code:        input.code,
      amount:      input.amount,
      radius:      input.radius,
      active:      true,
      expiry_date: input.expiry_date,
      created:     dates::today(),
    };

    let promo_id_str = encode_uuid(promo.promo_id);
    let event_id_str = encode_uuid(promo.event_id);
    let code         = promo.code.clone();
    let amount       = promo.amount;
    let radius       = promo.radius;
    let expiry_str   = encode_date(promo.expiry_date);
    let created_str  = encode_date(promo.created);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO promos (
             promo_id, event_id, code, amount, radius,
             active, expiry_date, created
           ) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7)",
          rusqlite::params![
            promo_id_str,
            event_id_str,
            code,
            amount,
            radius,
            expiry_str,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(promo)
  }

  async fn list_promos(&self, active_only: bool) -> Result<Vec<HydratedPromo>> {
    let raws: Vec<RawPromoRow> = self
      .conn
      .call(move |conn| {
        let sql = if active_only {
          format!("{PROMO_SELECT} WHERE p.active = 1 ORDER BY p.created, p.promo_id")
        } else {
          format!("{PROMO_SELECT} ORDER BY p.created, p.promo_id")
        };

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], promo_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPromoRow::into_hydrated).collect()
  }

  async fn find_by_code(&self, code: &str) -> Result<Option<HydratedPromo>> {
    let code = code.to_owned();

    let raw: Option<RawPromoRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{PROMO_SELECT} WHERE p.code = ?1"),
              rusqlite::params![code],
              promo_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPromoRow::into_hydrated).transpose()
  }

  async fn deactivate(&self, promo_id: Uuid) -> Result<()> {
    self
      .update_promo(
        promo_id,
        "UPDATE promos SET active = 0 WHERE promo_id = ?1",
        None,
      )
      .await
  }

  async fn set_radius(&self, promo_id: Uuid, radius: f64) -> Result<()> {
    self
      .update_promo(
        promo_id,
        "UPDATE promos SET radius = ?2 WHERE promo_id = ?1",
        Some(radius),
      )
      .await
  }
}

// ─── EventStore impl ─────────────────────────────────────────────────────────

impl EventStore for SqliteStore {
  type Error = Error;

  async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>> {
    let id_str = encode_uuid(event_id);

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT event_id, name, latitude, longitude, address, created_at
               FROM events WHERE event_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawEvent {
                  event_id:   row.get(0)?,
                  name:       row.get(1)?,
                  latitude:   row.get(2)?,
                  longitude:  row.get(3)?,
                  address:    row.get(4)?,
                  created_at: row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }
}
