//! Weekly scouting refresh.
//!
//! Observes up to 6 targets and writes at most 2 new reports (targets
//! already covered by a report are skipped), then advances every
//! active mission by 1 to 3 progress points, completing missions that
//! reach their objective. The week's activity is condensed into a
//! single summary notice.

use crate::{
    error::SimResult,
    inbox::{InboxItem, InboxKind},
    rng::GameRng,
    stage::{StageContext, WeeklyStage},
    store::SimStore,
    types::Week,
};

const TARGETS_PER_WEEK: usize = 6;
const REPORTS_PER_WEEK: usize = 2;
const REPORT_CHANCE: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct ScoutingTarget {
    pub worker_id: String,
    pub full_name: String,
    pub region: String,
    pub in_ring: i32,
    pub entertainment: i32,
    pub story: i32,
}

#[derive(Debug, Clone)]
pub struct ScoutMission {
    pub mission_id: String,
    pub title: String,
    pub region: String,
    pub focus: String,
    pub progress: i32,
    pub objective: i32,
    pub status: String,
    pub created_week: Week,
    pub updated_week: Week,
}

#[derive(Debug, Clone)]
pub struct ScoutReport {
    pub report_id: String,
    pub worker_id: String,
    pub full_name: String,
    pub region: String,
    pub potential: i32,
    pub in_ring: i32,
    pub entertainment: i32,
    pub story: i32,
    pub summary: String,
    pub notes: String,
    pub week: Week,
    pub source: String,
}

pub struct ScoutingStage;

impl WeeklyStage for ScoutingStage {
    fn name(&self) -> &'static str {
        "scouting"
    }

    fn run(
        &mut self,
        ctx: &StageContext,
        store: &SimStore,
        rng: &mut GameRng,
    ) -> SimResult<Vec<InboxItem>> {
        let week = ctx.week;
        // Reproducibility contract: the refresh depends on the week
        // alone, so reloading a save replays the same observations.
        rng.reseed(u64::from(week) * 7919);

        let mut reports_created = 0usize;
        for target in store.scouting_targets(TARGETS_PER_WEEK)? {
            if reports_created == REPORTS_PER_WEEK {
                break;
            }
            if store.report_exists(&target.worker_id)? || !rng.chance(REPORT_CHANCE) {
                continue;
            }
            let base = (target.in_ring + target.entertainment + target.story) / 3;
            let potential = (base + rng.next_i64_in(0, 2) as i32).clamp(1, 20);
            let report = ScoutReport {
                report_id: format!("RPT-{}-{}", target.worker_id, week),
                worker_id: target.worker_id.clone(),
                full_name: target.full_name.clone(),
                region: target.region.clone(),
                potential,
                in_ring: target.in_ring,
                entertainment: target.entertainment,
                story: target.story,
                summary: format!("Potentiel estimé : {potential}/20."),
                notes: format!("Observé en {} durant la semaine {week}.", target.region),
                week,
                source: "free_agent".to_string(),
            };
            store.insert_scout_report(&report)?;
            reports_created += 1;
        }

        let mut missions_advanced = 0usize;
        let mut missions_completed = 0usize;
        for mission in store.active_scout_missions()? {
            let progress = mission.progress + rng.next_i64_in(1, 3) as i32;
            let status = if progress >= mission.objective {
                missions_completed += 1;
                "terminee"
            } else {
                "active"
            };
            store.update_mission_progress(&mission.mission_id, progress, status, week)?;
            missions_advanced += 1;
        }

        if reports_created == 0 && missions_advanced == 0 {
            return Ok(Vec::new());
        }
        log::debug!(
            "scouting week {week}: {reports_created} report(s), \
             {missions_advanced} mission(s) advanced, {missions_completed} completed"
        );
        Ok(vec![InboxItem::new(
            InboxKind::Scouting,
            "Rapport de scouting hebdomadaire",
            format!(
                "{reports_created} rapport(s) établi(s), {missions_advanced} mission(s) \
                 avancée(s), dont {missions_completed} terminée(s)."
            ),
            week,
        )])
    }
}
