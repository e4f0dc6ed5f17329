//! Roster, contract and offer queries.

use super::SimStore;
use crate::{
    contract_stage::{ContractRow, OfferRow},
    error::SimResult,
    generation_stage::GeneratedWorker,
    incident_stage::{BackstageIncident, RosterWorker},
    types::Week,
};
use rusqlite::params;
use std::collections::HashMap;

impl SimStore {
    /// Passive weekly fatigue recovery for every active performer.
    pub fn recover_weekly_fatigue(&self, amount: i32) -> SimResult<()> {
        self.conn.execute(
            "UPDATE workers SET fatigue = MAX(0, fatigue - ?1) WHERE active = 1",
            params![amount],
        )?;
        Ok(())
    }

    pub fn company_roster(&self, company_id: &str) -> SimResult<Vec<RosterWorker>> {
        let mut stmt = self.conn.prepare(
            "SELECT worker_id, name, morale FROM workers
             WHERE company_id = ?1 AND active = 1
             ORDER BY worker_id ASC",
        )?;
        let rows = stmt.query_map(params![company_id], |row| {
            Ok(RosterWorker {
                worker_id: row.get(0)?,
                name: row.get(1)?,
                morale: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Morale stays in [0, 100]; clamped in the UPDATE itself.
    pub fn apply_morale_delta(&self, worker_id: &str, delta: i32) -> SimResult<()> {
        self.conn.execute(
            "UPDATE workers SET morale = MAX(0, MIN(100, morale + ?1))
             WHERE worker_id = ?2",
            params![delta, worker_id],
        )?;
        Ok(())
    }

    pub fn insert_generated_worker(&self, worker: &GeneratedWorker) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO workers (worker_id, name, company_id, region, worker_type, age,
                                  in_ring, entertainment, story, popularity, fatigue,
                                  morale, specialty, active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, 1)",
            params![
                worker.worker_id,
                worker.name,
                worker.company_id,
                worker.region,
                worker.worker_type,
                worker.age,
                worker.in_ring,
                worker.entertainment,
                worker.story,
                worker.popularity,
                worker.fatigue,
                worker.morale,
                worker.specialty,
            ],
        )?;
        Ok(())
    }

    pub fn worker_names(&self) -> SimResult<HashMap<String, String>> {
        let mut stmt = self.conn.prepare("SELECT worker_id, name FROM workers")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut names = HashMap::new();
        for row in rows {
            let (id, name) = row?;
            names.insert(id, name);
        }
        Ok(names)
    }

    pub fn worker_morale(&self, worker_id: &str) -> SimResult<i32> {
        self.conn
            .query_row(
                "SELECT morale FROM workers WHERE worker_id = ?1",
                params![worker_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    pub fn worker_fatigue(&self, worker_id: &str) -> SimResult<i32> {
        self.conn
            .query_row(
                "SELECT fatigue FROM workers WHERE worker_id = ?1",
                params![worker_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    pub fn worker_count(&self) -> SimResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM workers", [], |row| row.get(0))
            .map_err(Into::into)
    }

    // ── Contracts ──────────────────────────────────────────────

    pub fn insert_contract(
        &self,
        contract_id: &str,
        worker_id: &str,
        company_id: &str,
        weekly_cost: f64,
        end_week: Week,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO contracts (contract_id, worker_id, company_id, weekly_cost, end_week)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![contract_id, worker_id, company_id, weekly_cost, end_week as i64],
        )?;
        Ok(())
    }

    pub fn active_contracts(&self, company_id: &str) -> SimResult<Vec<ContractRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT worker_id, weekly_cost, end_week FROM contracts
             WHERE company_id = ?1 AND status = 'active'
             ORDER BY contract_id ASC",
        )?;
        let rows = stmt.query_map(params![company_id], contract_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn all_active_contracts(&self) -> SimResult<Vec<ContractRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT worker_id, weekly_cost, end_week FROM contracts
             WHERE status = 'active'
             ORDER BY contract_id ASC",
        )?;
        let rows = stmt.query_map([], contract_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Backstage incidents ────────────────────────────────────

    pub fn insert_backstage_incident(&self, incident: &BackstageIncident) -> SimResult<()> {
        let participants = serde_json::to_string(&incident.participants)?;
        self.conn.execute(
            "INSERT INTO backstage_incidents (incident_id, company_id, week, type_id,
                 title, description, severity, participants)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                incident.incident_id,
                incident.company_id,
                incident.week as i64,
                incident.type_id,
                incident.title,
                incident.description,
                incident.severity,
                participants,
            ],
        )?;
        Ok(())
    }

    pub fn incident_count(&self, week: Week) -> SimResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM backstage_incidents WHERE week = ?1",
                params![week as i64],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    // ── Offers ─────────────────────────────────────────────────

    pub fn insert_offer(
        &self,
        offer_id: &str,
        worker_id: &str,
        company_id: &str,
        weekly_cost: f64,
        expires_week: Week,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO contract_offers (offer_id, worker_id, company_id, weekly_cost, expires_week)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![offer_id, worker_id, company_id, weekly_cost, expires_week as i64],
        )?;
        Ok(())
    }

    pub fn pending_offers(&self) -> SimResult<Vec<OfferRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT offer_id, worker_id, company_id, expires_week FROM contract_offers
             WHERE status = 'pending'
             ORDER BY offer_id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(OfferRow {
                offer_id: row.get(0)?,
                worker_id: row.get(1)?,
                company_id: row.get(2)?,
                expires_week: row.get::<_, i64>(3)? as Week,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn mark_offer_expired(&self, offer_id: &str) -> SimResult<()> {
        self.conn.execute(
            "UPDATE contract_offers SET status = 'expired' WHERE offer_id = ?1",
            params![offer_id],
        )?;
        Ok(())
    }
}

fn contract_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContractRow> {
    Ok(ContractRow {
        worker_id: row.get(0)?,
        weekly_cost: row.get(1)?,
        end_week: row.get::<_, i64>(2)? as Week,
    })
}
