//! Youth progression stage.
//!
//! Trainees enrolled in a youth structure gain attribute points week
//! by week, driven by the structure's infrastructure, coaching and
//! budget, weighted by its philosophy. Trainees past the minimum
//! training time whose attributes clear the threshold graduate to the
//! main roster.

use crate::{
    config::{PhilosophyFocus, YouthSpec},
    error::SimResult,
    inbox::{InboxItem, InboxKind},
    rng::GameRng,
    stage::{StageContext, WeeklyStage},
    store::SimStore,
    types::Week,
};

/// One trainee joined with the structure factors driving progression.
#[derive(Debug, Clone)]
pub struct TraineeProgressRow {
    pub worker_id: String,
    pub youth_id: String,
    pub name: String,
    pub in_ring: i32,
    pub entertainment: i32,
    pub story: i32,
    pub enrolled_week: Week,
    pub equipment_level: i32,
    pub coaching_quality: i32,
    pub annual_budget: i64,
    pub philosophy: String,
}

const ATTRIBUTE_CAP: i32 = 20;
const NEUTRAL_FOCUS: PhilosophyFocus = PhilosophyFocus {
    in_ring: 0.8,
    entertainment: 0.8,
    story: 0.8,
};

pub struct YouthStage {
    spec: YouthSpec,
}

impl YouthStage {
    pub fn new(spec: YouthSpec) -> Self {
        Self { spec }
    }

    fn gain_chance(&self, row: &TraineeProgressRow) -> f64 {
        let budget_bonus = self
            .spec
            .budget_tiers
            .iter()
            .find(|t| row.annual_budget >= t.min && row.annual_budget <= t.max)
            .map_or(0.0, |t| t.bonus);
        self.spec.base_gain_chance
            + self.spec.infrastructure_bonus_per_level * f64::from(row.equipment_level)
            + self.spec.coaching_bonus_per_point * f64::from(row.coaching_quality)
            + budget_bonus
    }
}

impl WeeklyStage for YouthStage {
    fn name(&self) -> &'static str {
        "youth"
    }

    fn run(
        &mut self,
        ctx: &StageContext,
        store: &SimStore,
        rng: &mut GameRng,
    ) -> SimResult<Vec<InboxItem>> {
        let week = ctx.week;
        let mut items = Vec::new();

        for row in store.trainees_in_training()? {
            let chance = self.gain_chance(&row);
            let focus = self
                .spec
                .philosophies
                .get(&row.philosophy)
                .copied()
                .unwrap_or(NEUTRAL_FOCUS);

            let mut in_ring = row.in_ring;
            let mut entertainment = row.entertainment;
            let mut story = row.story;
            let mut budget_left = self.spec.max_gain_per_week;
            // Draw order is fixed so replays stay byte-identical.
            for (attr, weight) in [
                (&mut in_ring, focus.in_ring),
                (&mut entertainment, focus.entertainment),
                (&mut story, focus.story),
            ] {
                if budget_left > 0 && *attr < ATTRIBUTE_CAP && rng.chance(chance * weight) {
                    *attr += 1;
                    budget_left -= 1;
                }
            }
            if (in_ring, entertainment, story) != (row.in_ring, row.entertainment, row.story) {
                store.update_trainee_attributes(&row.worker_id, in_ring, entertainment, story)?;
            }

            let weeks_enrolled = week.saturating_sub(row.enrolled_week);
            let average = f64::from(in_ring + entertainment + story) / 3.0;
            if weeks_enrolled >= self.spec.graduation_min_weeks
                && average >= self.spec.graduation_avg_threshold
            {
                store.graduate_trainee(&row.worker_id)?;
                log::info!("trainee {} graduates (week {week})", row.worker_id);
                items.push(InboxItem::new(
                    InboxKind::Youth,
                    "Diplômé du centre de formation",
                    format!(
                        "{} termine sa formation et rejoint l'effectif principal.",
                        row.name
                    ),
                    week,
                ));
            }
        }
        Ok(items)
    }
}
