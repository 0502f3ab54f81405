//! [`SqliteStore`], the SQLite implementation of [`ScheduleStore`].

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use rota_core::{
  concierge::{Concierge, ConciergeFilter, ConciergeUpdate, NewConcierge},
  period::Period,
  shift::{AssignmentRequest, ShiftAssignment},
  snapshot::{MonthSnapshot, NewSnapshot},
  store::{ScheduleStore, SnapshotQuery},
};

use crate::{
  Error, Result,
  encode::{
    CONCIERGE_COLUMNS, RawConcierge, RawShift, RawSnapshot, SHIFT_SELECT,
    SNAPSHOT_COLUMNS, encode_color, encode_date, encode_dt, encode_uuid,
  },
  error::is_unique_violation,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rota schedule store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
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

  /// Open an in-memory store, for tests.
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
    debug!("sqlite schema ready");
    Ok(())
  }

  async fn concierge_where(
    &self,
    clause: &'static str,
    param: String,
  ) -> Result<Option<Concierge>> {
    let raw: Option<RawConcierge> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {CONCIERGE_COLUMNS} FROM concierges
                 WHERE deleted = 0 AND {clause}"
              ),
              rusqlite::params![param],
              RawConcierge::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawConcierge::into_concierge).transpose()
  }

  async fn shift_where(
    &self,
    clause: &'static str,
    param: String,
  ) -> Result<Option<ShiftAssignment>> {
    let raw: Option<RawShift> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{SHIFT_SELECT} AND {clause}"),
              rusqlite::params![param],
              RawShift::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawShift::into_shift).transpose()
  }

  async fn shifts_where(
    &self,
    clause: &'static str,
    params: Vec<String>,
  ) -> Result<Vec<ShiftAssignment>> {
    let raws: Vec<RawShift> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{SHIFT_SELECT} AND {clause} ORDER BY s.shift_date"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(params.iter()),
            RawShift::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawShift::into_shift).collect()
  }
}

// ─── ScheduleStore impl ──────────────────────────────────────────────────────

impl ScheduleStore for SqliteStore {
  type Error = Error;

  // ── Concierges ────────────────────────────────────────────────────────

  async fn insert_concierge(&self, input: NewConcierge) -> Result<Concierge> {
    let concierge = Concierge {
      id:         Uuid::new_v4(),
      name:       input.name,
      color:      input.color,
      active:     input.active,
      created_at: Utc::now(),
      updated_at: Utc::now(),
    };

    let id_str    = encode_uuid(concierge.id);
    let name      = concierge.name.clone();
    let color_str = encode_color(concierge.color);
    let active    = concierge.active;
    let at_str    = encode_dt(concierge.created_at);

    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO concierges
             (concierge_id, name, color, active, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![id_str, name, color_str, active, at_str],
        )?;
        Ok(())
      })
      .await;

    match result {
      Err(e) if is_unique_violation(&e) => {
        Err(Error::DuplicateConciergeName(concierge.name))
      }
      other => {
        other?;
        Ok(concierge)
      }
    }
  }

  async fn update_concierge(
    &self,
    id: Uuid,
    update: ConciergeUpdate,
  ) -> Result<Option<Concierge>> {
    let id_str    = encode_uuid(id);
    let name      = update.name.clone();
    let color_str = encode_color(update.color);
    let at_str    = encode_dt(Utc::now());

    let result = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE concierges SET name = ?2, color = ?3, updated_at = ?4
           WHERE concierge_id = ?1 AND deleted = 0",
          rusqlite::params![id_str, name, color_str, at_str],
        )?)
      })
      .await;

    let changed = match result {
      Err(e) if is_unique_violation(&e) => {
        return Err(Error::DuplicateConciergeName(update.name));
      }
      other => other?,
    };
    if changed == 0 {
      return Ok(None);
    }
    self.get_concierge(id).await
  }

  async fn set_concierge_active(
    &self,
    id: Uuid,
    active: bool,
  ) -> Result<Option<Concierge>> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE concierges SET active = ?2, updated_at = ?3
           WHERE concierge_id = ?1 AND deleted = 0",
          rusqlite::params![id_str, active, at_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_concierge(id).await
  }

  async fn soft_delete_concierge(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE concierges SET deleted = 1, updated_at = ?2
           WHERE concierge_id = ?1 AND deleted = 0",
          rusqlite::params![id_str, at_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn get_concierge(&self, id: Uuid) -> Result<Option<Concierge>> {
    self.concierge_where("concierge_id = ?1", encode_uuid(id)).await
  }

  async fn find_concierge_by_name(
    &self,
    name: String,
  ) -> Result<Option<Concierge>> {
    // `name` is declared COLLATE NOCASE, so `=` ignores ASCII case.
    self.concierge_where("name = ?1", name).await
  }

  async fn list_concierges(
    &self,
    filter: ConciergeFilter,
  ) -> Result<Vec<Concierge>> {
    let active_only = filter.active_only;
    let color_str   = filter.color.map(encode_color);

    let raws: Vec<RawConcierge> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CONCIERGE_COLUMNS} FROM concierges
           WHERE deleted = 0
             AND (?1 = 0 OR active = 1)
             AND (?2 IS NULL OR color = ?2)
           ORDER BY name"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![active_only, color_str],
            RawConcierge::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawConcierge::into_concierge).collect()
  }

  // ── Shifts ────────────────────────────────────────────────────────────

  async fn insert_shift(
    &self,
    request: AssignmentRequest,
  ) -> Result<ShiftAssignment> {
    let date      = request.date;
    let id_str    = encode_uuid(Uuid::new_v4());
    let date_str  = encode_date(date);
    let c_id_str  = encode_uuid(request.concierge_id);
    let type_str  = request.shift_type.as_str();
    let notes     = request.notes;
    let at_str    = encode_dt(Utc::now());

    // Insert and read back in one call so the row is seen as written.
    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO shift_assignments
             (shift_id, shift_date, concierge_id, shift_type, notes,
              created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
          rusqlite::params![id_str, date_str, c_id_str, type_str, notes, at_str],
        )?;
        Ok(conn.query_row(
          &format!("{SHIFT_SELECT} AND s.shift_id = ?1"),
          rusqlite::params![id_str],
          RawShift::from_row,
        )?)
      })
      .await;

    match result {
      Err(e) if is_unique_violation(&e) => Err(Error::ShiftConflict(date)),
      other => other?.into_shift(),
    }
  }

  async fn update_shift(
    &self,
    id: Uuid,
    request: AssignmentRequest,
  ) -> Result<Option<ShiftAssignment>> {
    let date     = request.date;
    let id_str   = encode_uuid(id);
    let date_str = encode_date(date);
    let c_id_str = encode_uuid(request.concierge_id);
    let type_str = request.shift_type.as_str();
    let notes    = request.notes;
    let at_str   = encode_dt(Utc::now());

    let result = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE shift_assignments
           SET shift_date = ?2, concierge_id = ?3, shift_type = ?4,
               notes = ?5, updated_at = ?6
           WHERE shift_id = ?1 AND deleted = 0",
          rusqlite::params![id_str, date_str, c_id_str, type_str, notes, at_str],
        )?)
      })
      .await;

    let changed = match result {
      Err(e) if is_unique_violation(&e) => {
        return Err(Error::ShiftConflict(date));
      }
      other => other?,
    };
    if changed == 0 {
      return Ok(None);
    }
    self.get_shift(id).await
  }

  async fn soft_delete_shift(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE shift_assignments SET deleted = 1, updated_at = ?2
           WHERE shift_id = ?1 AND deleted = 0",
          rusqlite::params![id_str, at_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn get_shift(&self, id: Uuid) -> Result<Option<ShiftAssignment>> {
    self.shift_where("s.shift_id = ?1", encode_uuid(id)).await
  }

  async fn shift_on(&self, date: NaiveDate) -> Result<Option<ShiftAssignment>> {
    self.shift_where("s.shift_date = ?1", encode_date(date)).await
  }

  async fn shifts_in_range(
    &self,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<ShiftAssignment>> {
    self
      .shifts_where("s.shift_date BETWEEN ?1 AND ?2", vec![
        encode_date(start),
        encode_date(end),
      ])
      .await
  }

  async fn shifts_for_concierge(
    &self,
    concierge_id: Uuid,
  ) -> Result<Vec<ShiftAssignment>> {
    self
      .shifts_where("s.concierge_id = ?1", vec![encode_uuid(concierge_id)])
      .await
  }

  async fn count_shifts_for_concierge(
    &self,
    concierge_id: Uuid,
    range: Option<(NaiveDate, NaiveDate)>,
  ) -> Result<usize> {
    let id_str = encode_uuid(concierge_id);
    let start  = range.map(|(start, _)| encode_date(start));
    let end    = range.map(|(_, end)| encode_date(end));

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM shift_assignments
           WHERE deleted = 0 AND concierge_id = ?1
             AND (?2 IS NULL OR shift_date >= ?2)
             AND (?3 IS NULL OR shift_date <= ?3)",
          rusqlite::params![id_str, start, end],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as usize)
  }

  // ── Snapshots ─────────────────────────────────────────────────────────

  async fn insert_snapshot(&self, input: NewSnapshot) -> Result<MonthSnapshot> {
    let now = Utc::now();
    let snapshot = MonthSnapshot {
      id:           Uuid::new_v4(),
      period:       input.period,
      description:  input.description,
      total_shifts: input.total_shifts,
      taken_at:     input.taken_at,
      payload:      input.payload,
      deleted:      false,
      created_at:   now,
      updated_at:   now,
    };

    let id_str      = encode_uuid(snapshot.id);
    let year        = snapshot.period.year();
    let month       = snapshot.period.month();
    let payload     = snapshot.payload.clone();
    let description = snapshot.description.clone();
    let total       = snapshot.total_shifts as i64;
    let taken_str   = encode_dt(snapshot.taken_at);
    let at_str      = encode_dt(now);

    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO month_snapshots
             (snapshot_id, year_value, month_value, payload, description,
              total_shifts, taken_at, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            id_str,
            year,
            month,
            payload,
            description,
            total,
            taken_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await;

    match result {
      Err(e) if is_unique_violation(&e) => {
        Err(Error::SnapshotAlreadyExists(snapshot.period))
      }
      other => {
        other?;
        Ok(snapshot)
      }
    }
  }

  async fn reactivate_snapshot(
    &self,
    id: Uuid,
    description: Option<String>,
    taken_at: DateTime<Utc>,
  ) -> Result<Option<MonthSnapshot>> {
    let id_str    = encode_uuid(id);
    let taken_str = encode_dt(taken_at);
    let at_str    = encode_dt(Utc::now());

    let raw: Option<RawSnapshot> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE month_snapshots
           SET deleted = 0, description = ?2, taken_at = ?3, updated_at = ?4
           WHERE snapshot_id = ?1 AND deleted = 1",
          rusqlite::params![id_str, description, taken_str, at_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(Some(conn.query_row(
          &format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM month_snapshots
             WHERE snapshot_id = ?1"
          ),
          rusqlite::params![id_str],
          RawSnapshot::from_row,
        )?))
      })
      .await?;

    raw.map(RawSnapshot::into_snapshot).transpose()
  }

  async fn soft_delete_snapshot(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE month_snapshots SET deleted = 1, updated_at = ?2
           WHERE snapshot_id = ?1 AND deleted = 0",
          rusqlite::params![id_str, at_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn get_snapshot(&self, id: Uuid) -> Result<Option<MonthSnapshot>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSnapshot> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SNAPSHOT_COLUMNS} FROM month_snapshots
                 WHERE snapshot_id = ?1 AND deleted = 0"
              ),
              rusqlite::params![id_str],
              RawSnapshot::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSnapshot::into_snapshot).transpose()
  }

  async fn snapshot_for_period(
    &self,
    period: Period,
    include_deleted: bool,
  ) -> Result<Option<MonthSnapshot>> {
    let year  = period.year();
    let month = period.month();

    let raw: Option<RawSnapshot> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SNAPSHOT_COLUMNS} FROM month_snapshots
                 WHERE year_value = ?1 AND month_value = ?2
                   AND (?3 OR deleted = 0)"
              ),
              rusqlite::params![year, month, include_deleted],
              RawSnapshot::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSnapshot::into_snapshot).transpose()
  }

  async fn list_snapshots(
    &self,
    query: SnapshotQuery,
  ) -> Result<Vec<MonthSnapshot>> {
    let year       = query.year;
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val  = query.limit.map_or(-1, |l| l as i64);
    let offset_val = query.offset as i64;

    let raws: Vec<RawSnapshot> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SNAPSHOT_COLUMNS} FROM month_snapshots
           WHERE deleted = 0 AND (?1 IS NULL OR year_value = ?1)
           ORDER BY year_value DESC, month_value DESC
           LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![year, limit_val, offset_val],
            RawSnapshot::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSnapshot::into_snapshot).collect()
  }

  async fn count_snapshots(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM month_snapshots WHERE deleted = 0",
          [],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as usize)
  }
}
