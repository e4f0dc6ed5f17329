//! Scouting targets, missions and reports.

use super::SimStore;
use crate::{
    error::SimResult,
    scouting_stage::{ScoutMission, ScoutReport, ScoutingTarget},
    types::Week,
};
use rusqlite::params;

impl SimStore {
    pub fn insert_scouting_target(&self, target: &ScoutingTarget) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO scouting_targets (worker_id, full_name, region,
                 in_ring, entertainment, story)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                target.worker_id,
                target.full_name,
                target.region,
                target.in_ring,
                target.entertainment,
                target.story,
            ],
        )?;
        Ok(())
    }

    /// Candidate pool for a refresh, capped to the observation window.
    pub fn scouting_targets(&self, limit: usize) -> SimResult<Vec<ScoutingTarget>> {
        let mut stmt = self.conn.prepare(
            "SELECT worker_id, full_name, region, in_ring, entertainment, story
             FROM scouting_targets ORDER BY worker_id ASC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(ScoutingTarget {
                worker_id: row.get(0)?,
                full_name: row.get(1)?,
                region: row.get(2)?,
                in_ring: row.get(3)?,
                entertainment: row.get(4)?,
                story: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn report_exists(&self, worker_id: &str) -> SimResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM scout_reports WHERE worker_id = ?1",
            params![worker_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn insert_scout_report(&self, report: &ScoutReport) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO scout_reports (report_id, worker_id, full_name, region,
                 potential, in_ring, entertainment, story, summary, notes, week, source)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                report.report_id,
                report.worker_id,
                report.full_name,
                report.region,
                report.potential,
                report.in_ring,
                report.entertainment,
                report.story,
                report.summary,
                report.notes,
                report.week as i64,
                report.source,
            ],
        )?;
        Ok(())
    }

    pub fn insert_scout_mission(&self, mission: &ScoutMission) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO scout_missions (mission_id, title, region, focus, progress,
                 objective, status, created_week, updated_week)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                mission.mission_id,
                mission.title,
                mission.region,
                mission.focus,
                mission.progress,
                mission.objective,
                mission.status,
                mission.created_week as i64,
                mission.updated_week as i64,
            ],
        )?;
        Ok(())
    }

    pub fn active_scout_missions(&self) -> SimResult<Vec<ScoutMission>> {
        let mut stmt = self.conn.prepare(
            "SELECT mission_id, title, region, focus, progress, objective, status,
                    created_week, updated_week
             FROM scout_missions WHERE status = 'active' ORDER BY mission_id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ScoutMission {
                mission_id: row.get(0)?,
                title: row.get(1)?,
                region: row.get(2)?,
                focus: row.get(3)?,
                progress: row.get(4)?,
                objective: row.get(5)?,
                status: row.get(6)?,
                created_week: row.get::<_, i64>(7)? as Week,
                updated_week: row.get::<_, i64>(8)? as Week,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn update_mission_progress(
        &self,
        mission_id: &str,
        progress: i32,
        status: &str,
        week: Week,
    ) -> SimResult<()> {
        self.conn.execute(
            "UPDATE scout_missions
             SET progress = ?1, status = ?2, updated_week = ?3
             WHERE mission_id = ?4",
            params![progress, status, week as i64, mission_id],
        )?;
        Ok(())
    }

    pub fn scout_report_count(&self) -> SimResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM scout_reports", [], |row| row.get(0))
            .map_err(Into::into)
    }
}
