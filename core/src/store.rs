//! SQLite persistence layer.
//!
//! RULE: Only store code talks to the database.
//! Stages call store methods — they never execute SQL directly.
//!
//! The store also owns the tick transaction boundary: the engine
//! brackets every weekly tick with begin_tick/commit_tick so a failed
//! tick leaves the week counter and all other state untouched.

mod generation;
mod roster;
mod scouting;
mod world;

use crate::{
    error::{SimError, SimResult},
    inbox::{InboxItem, InboxKind},
    types::{CompanyId, ShowId, Week},
};
use rusqlite::{params, Connection};

/// Static description of a show, the entity the weekly loop is keyed
/// on. The week counter lives here.
#[derive(Debug, Clone)]
pub struct ShowDefinition {
    pub show_id: ShowId,
    pub name: String,
    pub company_id: CompanyId,
    pub week: Week,
    pub has_tv_deal: bool,
}

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only works for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../migrations/002_generation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../migrations/003_scouting.sql"))?;
        self.conn
            .execute_batch(include_str!("../../migrations/004_backstage.sql"))?;
        Ok(())
    }

    // ── Tick transaction boundary ──────────────────────────────

    pub fn begin_tick(&self) -> SimResult<()> {
        self.conn.execute_batch("BEGIN IMMEDIATE;")?;
        Ok(())
    }

    pub fn commit_tick(&self) -> SimResult<()> {
        self.conn.execute_batch("COMMIT;")?;
        Ok(())
    }

    pub fn rollback_tick(&self) -> SimResult<()> {
        self.conn.execute_batch("ROLLBACK;")?;
        Ok(())
    }

    // ── Shows / week counter ───────────────────────────────────

    pub fn insert_show(&self, show: &ShowDefinition) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO shows (show_id, name, company_id, week, has_tv_deal)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                show.show_id,
                show.name,
                show.company_id,
                show.week as i64,
                if show.has_tv_deal { 1 } else { 0 }
            ],
        )?;
        Ok(())
    }

    pub fn show_definition(&self, show_id: &str) -> SimResult<ShowDefinition> {
        self.conn
            .query_row(
                "SELECT show_id, name, company_id, week, has_tv_deal
                 FROM shows WHERE show_id = ?1",
                params![show_id],
                |row| {
                    Ok(ShowDefinition {
                        show_id: row.get(0)?,
                        name: row.get(1)?,
                        company_id: row.get(2)?,
                        week: row.get::<_, i64>(3)? as Week,
                        has_tv_deal: row.get::<_, i32>(4)? != 0,
                    })
                },
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => SimError::ShowNotFound {
                    show_id: show_id.to_string(),
                },
                other => other.into(),
            })
    }

    /// Advance the show's week counter by one and return the new week.
    pub fn increment_week(&self, show_id: &str) -> SimResult<Week> {
        self.conn.execute(
            "UPDATE shows SET week = week + 1 WHERE show_id = ?1",
            params![show_id],
        )?;
        let week: i64 = self.conn.query_row(
            "SELECT week FROM shows WHERE show_id = ?1",
            params![show_id],
            |row| row.get(0),
        )?;
        Ok(week as Week)
    }

    // ── Inbox ──────────────────────────────────────────────────

    pub fn append_inbox_item(&self, item: &InboxItem) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO inbox_items (kind, title, body, week, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                item.kind.as_str(),
                item.title,
                item.body,
                item.week as i64,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn inbox_for_week(&self, week: Week) -> SimResult<Vec<InboxItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT kind, title, body, week FROM inbox_items
             WHERE week = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![week as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)? as Week,
            ))
        })?;
        let mut items = Vec::new();
        for row in rows {
            let (kind, title, body, week) = row?;
            items.push(InboxItem {
                kind: InboxKind::parse(&kind)?,
                title,
                body,
                week,
            });
        }
        Ok(items)
    }

    pub fn inbox_count(&self) -> SimResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM inbox_items", [], |row| row.get(0))
            .map_err(Into::into)
    }
}
