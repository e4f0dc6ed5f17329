//! Generation counters, youth structures, trainees and the persisted
//! generation settings.

use super::SimStore;
use crate::{
    error::SimResult,
    generation_stage::{
        CounterKind, CounterScope, CounterSnapshot, GenerationOptions, WorldGenerationMode,
        YouthGenerationMode, YouthStructureRow,
    },
    types::Week,
    youth_stage::TraineeProgressRow,
};
use rusqlite::params;
use std::collections::HashMap;

impl SimStore {
    // ── Generation counters ────────────────────────────────────
    //
    // Counters are keyed by (year, scope, id, kind) and only ever
    // increase within a year; year rollover starts fresh rows.

    /// Increment a counter by `by`. An empty scope id on a region or
    /// company scope is invalid input: that scope's increment is
    /// skipped (with a warning) rather than failing the tick.
    pub fn increment_generation_counter(
        &self,
        year: u32,
        scope: CounterScope,
        scope_id: &str,
        kind: CounterKind,
        by: u32,
    ) -> SimResult<()> {
        if scope != CounterScope::Global && scope_id.trim().is_empty() {
            log::warn!(
                "empty scope id for {:?}/{:?} counter increment, skipping",
                scope,
                kind
            );
            return Ok(());
        }
        let scope_id = if scope == CounterScope::Global { "" } else { scope_id };
        self.conn.execute(
            "INSERT INTO generation_counters (year, scope_type, scope_id, kind, count)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(year, scope_type, scope_id, kind)
             DO UPDATE SET count = count + ?5",
            params![year as i64, scope.as_str(), scope_id, kind.as_str(), by as i64],
        )?;
        Ok(())
    }

    pub fn generation_counter(
        &self,
        year: u32,
        scope: CounterScope,
        scope_id: &str,
        kind: CounterKind,
    ) -> SimResult<u32> {
        let scope_id = if scope == CounterScope::Global { "" } else { scope_id };
        let count: i64 = match self.conn.query_row(
            "SELECT count FROM generation_counters
             WHERE year = ?1 AND scope_type = ?2 AND scope_id = ?3 AND kind = ?4",
            params![year as i64, scope.as_str(), scope_id, kind.as_str()],
            |row| row.get(0),
        ) {
            Ok(count) => count,
            Err(rusqlite::Error::QueryReturnedNoRows) => 0,
            Err(other) => return Err(other.into()),
        };
        Ok(count as u32)
    }

    /// Everything worker generation needs to enforce the annual caps.
    pub fn counter_snapshot(&self, year: u32) -> SimResult<CounterSnapshot> {
        let mut stmt = self.conn.prepare(
            "SELECT scope_type, scope_id, kind, count FROM generation_counters
             WHERE year = ?1",
        )?;
        let rows = stmt.query_map(params![year as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)? as u32,
            ))
        })?;

        let mut snapshot = CounterSnapshot {
            year,
            global_trainees: 0,
            global_free_agents: 0,
            trainees_per_region: HashMap::new(),
            trainees_per_company: HashMap::new(),
            free_agents_per_region: HashMap::new(),
        };
        for row in rows {
            let (scope, scope_id, kind, count) = row?;
            match (scope.as_str(), kind.as_str()) {
                ("global", "trainee") => snapshot.global_trainees = count,
                ("global", "free_agent") => snapshot.global_free_agents = count,
                ("region", "trainee") => {
                    snapshot.trainees_per_region.insert(scope_id, count);
                }
                ("company", "trainee") => {
                    snapshot.trainees_per_company.insert(scope_id, count);
                }
                ("region", "free_agent") => {
                    snapshot.free_agents_per_region.insert(scope_id, count);
                }
                _ => {}
            }
        }
        Ok(snapshot)
    }

    // ── Youth structures ───────────────────────────────────────

    pub fn insert_youth_structure(&self, row: &YouthStructureRow) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO youth_structures (youth_id, name, company_id, region,
                 structure_type, philosophy, equipment_level, coaching_quality,
                 annual_budget, active, last_generation_week, active_trainees)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                row.youth_id,
                row.name,
                row.company_id,
                row.region,
                row.structure_type,
                row.philosophy,
                row.equipment_level,
                row.coaching_quality,
                row.annual_budget,
                if row.active { 1 } else { 0 },
                row.last_generation_week.map(|w| w as i64),
                row.active_trainees,
            ],
        )?;
        Ok(())
    }

    pub fn youth_structures(&self) -> SimResult<Vec<YouthStructureRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT youth_id, name, company_id, region, structure_type, philosophy,
                    equipment_level, coaching_quality, annual_budget, active,
                    last_generation_week, active_trainees
             FROM youth_structures ORDER BY youth_id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(YouthStructureRow {
                youth_id: row.get(0)?,
                name: row.get(1)?,
                company_id: row.get(2)?,
                region: row.get(3)?,
                structure_type: row.get(4)?,
                philosophy: row.get(5)?,
                equipment_level: row.get(6)?,
                coaching_quality: row.get(7)?,
                annual_budget: row.get(8)?,
                active: row.get::<_, i32>(9)? != 0,
                last_generation_week: row.get::<_, Option<i64>>(10)?.map(|w| w as Week),
                active_trainees: row.get(11)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn mark_structure_generated(
        &self,
        youth_id: &str,
        week: Week,
        added: u32,
    ) -> SimResult<()> {
        self.conn.execute(
            "UPDATE youth_structures
             SET last_generation_week = ?1, active_trainees = active_trainees + ?2
             WHERE youth_id = ?3",
            params![week as i64, added as i64, youth_id],
        )?;
        Ok(())
    }

    // ── Trainees ───────────────────────────────────────────────

    pub fn insert_trainee(&self, worker_id: &str, youth_id: &str, week: Week) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO youth_trainees (worker_id, youth_id, enrolled_week)
             VALUES (?1, ?2, ?3)",
            params![worker_id, youth_id, week as i64],
        )?;
        Ok(())
    }

    /// Trainees still in training, joined with the structure factors
    /// that drive their weekly progression.
    pub fn trainees_in_training(&self) -> SimResult<Vec<TraineeProgressRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.worker_id, t.youth_id, w.name, w.in_ring, w.entertainment, w.story,
                    t.enrolled_week, s.equipment_level, s.coaching_quality,
                    s.annual_budget, s.philosophy
             FROM youth_trainees t
             JOIN workers w ON w.worker_id = t.worker_id
             JOIN youth_structures s ON s.youth_id = t.youth_id
             WHERE t.status = 'EN_FORMATION'
             ORDER BY t.worker_id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(TraineeProgressRow {
                worker_id: row.get(0)?,
                youth_id: row.get(1)?,
                name: row.get(2)?,
                in_ring: row.get(3)?,
                entertainment: row.get(4)?,
                story: row.get(5)?,
                enrolled_week: row.get::<_, i64>(6)? as Week,
                equipment_level: row.get(7)?,
                coaching_quality: row.get(8)?,
                annual_budget: row.get(9)?,
                philosophy: row.get(10)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn update_trainee_attributes(
        &self,
        worker_id: &str,
        in_ring: i32,
        entertainment: i32,
        story: i32,
    ) -> SimResult<()> {
        self.conn.execute(
            "UPDATE workers SET in_ring = ?1, entertainment = ?2, story = ?3
             WHERE worker_id = ?4",
            params![in_ring, entertainment, story, worker_id],
        )?;
        Ok(())
    }

    pub fn graduate_trainee(&self, worker_id: &str) -> SimResult<()> {
        self.conn.execute(
            "UPDATE youth_trainees SET status = 'GRADUE' WHERE worker_id = ?1",
            params![worker_id],
        )?;
        self.conn.execute(
            "UPDATE youth_structures SET active_trainees = MAX(0, active_trainees - 1)
             WHERE youth_id = (SELECT youth_id FROM youth_trainees WHERE worker_id = ?1)",
            params![worker_id],
        )?;
        Ok(())
    }

    pub fn trainee_count(&self) -> SimResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM youth_trainees", [], |row| row.get(0))
            .map_err(Into::into)
    }

    pub fn graduated_count(&self) -> SimResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM youth_trainees WHERE status = 'GRADUE'",
                [],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    // ── Generation settings ────────────────────────────────────

    pub fn load_generation_options(&self) -> SimResult<GenerationOptions> {
        let result = self.conn.query_row(
            "SELECT youth_generation_mode, world_generation_mode, annual_pivot_week
             FROM game_settings WHERE id = 1",
            [],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<i64>>(2)?,
                ))
            },
        );
        match result {
            Ok((youth, world, pivot)) => Ok(GenerationOptions {
                youth_mode: YouthGenerationMode::parse(&youth)?,
                world_mode: WorldGenerationMode::parse(&world)?,
                annual_pivot_week: pivot.map(|w| w as Week),
            }),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(GenerationOptions::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_generation_options(&self, options: &GenerationOptions) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO game_settings (id, youth_generation_mode, world_generation_mode,
                                        annual_pivot_week)
             VALUES (1, ?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                youth_generation_mode = excluded.youth_generation_mode,
                world_generation_mode = excluded.world_generation_mode,
                annual_pivot_week = excluded.annual_pivot_week",
            params![
                options.youth_mode.as_str(),
                options.world_mode.as_str(),
                options.annual_pivot_week.map(|w| w as i64),
            ],
        )?;
        Ok(())
    }
}
