//! Worker generation stage.
//!
//! Two independent pipelines share this stage: youth intake (trainees
//! joining active youth structures) and world spawns (free agents
//! appearing on the open market). Both are gated by persisted modes
//! and by annual counters scoped globally, per region and per company.
//! When both modes are disabled the stage is a strict no-op: no
//! counter mutation, no notices.

use crate::{
    config::{BudgetTier, RegionBonus, WorkerGenerationSpec, WorkerProfile},
    error::{SimError, SimResult},
    inbox::{InboxItem, InboxKind},
    rng::{derive_seed, GameRng},
    stage::{StageContext, WeeklyStage},
    store::SimStore,
    types::{week_in_year, year_of_week, Week},
};
use std::collections::HashMap;

// ── Persisted modes ────────────────────────────────────────────────
//
// Stored as strings in game_settings through these mapping tables.
// A variant rename breaks compilation here, not data at runtime.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YouthGenerationMode {
    Disabled,
    Realistic,
    Abundant,
}

impl YouthGenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "desactivee",
            Self::Realistic => "realiste",
            Self::Abundant => "abondante",
        }
    }

    pub fn parse(value: &str) -> SimResult<Self> {
        match value {
            "desactivee" => Ok(Self::Disabled),
            "realiste" => Ok(Self::Realistic),
            "abondante" => Ok(Self::Abundant),
            other => Err(SimError::UnknownGenerationMode {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldGenerationMode {
    Disabled,
    Low,
}

impl WorldGenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "desactivee",
            Self::Low => "faible",
        }
    }

    pub fn parse(value: &str) -> SimResult<Self> {
        match value {
            "desactivee" => Ok(Self::Disabled),
            "faible" => Ok(Self::Low),
            other => Err(SimError::UnknownGenerationMode {
                value: other.to_string(),
            }),
        }
    }
}

/// The generation switches persisted in game_settings.
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub youth_mode: YouthGenerationMode,
    pub world_mode: WorldGenerationMode,
    /// Overrides the configured annual pivot week when set.
    pub annual_pivot_week: Option<Week>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            youth_mode: YouthGenerationMode::Realistic,
            world_mode: WorldGenerationMode::Disabled,
            annual_pivot_week: None,
        }
    }
}

// ── Counter keys ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterScope {
    Global,
    Region,
    Company,
}

impl CounterScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Region => "region",
            Self::Company => "company",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Trainee,
    FreeAgent,
}

impl CounterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trainee => "trainee",
            Self::FreeAgent => "free_agent",
        }
    }
}

/// The year's counter state, read once per tick.
#[derive(Debug, Clone)]
pub struct CounterSnapshot {
    pub year: u32,
    pub global_trainees: u32,
    pub global_free_agents: u32,
    pub trainees_per_region: HashMap<String, u32>,
    pub trainees_per_company: HashMap<String, u32>,
    pub free_agents_per_region: HashMap<String, u32>,
}

impl CounterSnapshot {
    fn trainees_in(&self, region: &str) -> u32 {
        self.trainees_per_region.get(region).copied().unwrap_or(0)
    }

    fn trainees_for(&self, company_id: &str) -> u32 {
        self.trainees_per_company.get(company_id).copied().unwrap_or(0)
    }

    fn free_agents_in(&self, region: &str) -> u32 {
        self.free_agents_per_region.get(region).copied().unwrap_or(0)
    }
}

// ── Rows ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct YouthStructureRow {
    pub youth_id: String,
    pub name: String,
    pub company_id: String,
    pub region: String,
    pub structure_type: String,
    pub philosophy: String,
    pub equipment_level: i32,
    pub coaching_quality: i32,
    pub annual_budget: i64,
    pub active: bool,
    pub last_generation_week: Option<Week>,
    pub active_trainees: i32,
}

/// A fully rolled worker ready for insertion. Ids are deterministic
/// (scope, week, index) so a replayed tick produces identical rows.
#[derive(Debug, Clone)]
pub struct GeneratedWorker {
    pub worker_id: String,
    pub name: String,
    pub company_id: Option<String>,
    pub region: String,
    pub worker_type: String,
    pub age: u32,
    pub in_ring: i32,
    pub entertainment: i32,
    pub story: i32,
    pub popularity: i32,
    pub fatigue: i32,
    pub morale: i32,
    pub specialty: String,
}

// ── Stage ──────────────────────────────────────────────────────────

pub struct GenerationStage {
    spec: WorkerGenerationSpec,
}

impl GenerationStage {
    pub fn new(spec: WorkerGenerationSpec) -> Self {
        Self { spec }
    }

    /// Whether the youth pipeline fires this week under `mode`.
    fn youth_intake_due(
        &self,
        mode: YouthGenerationMode,
        options: &GenerationOptions,
        week: Week,
    ) -> bool {
        let pivot = options
            .annual_pivot_week
            .unwrap_or(self.spec.frequencies.annual_pivot_week);
        if week_in_year(week) == pivot {
            return true;
        }
        let interval = self.spec.frequencies.monthly_interval_weeks;
        mode == YouthGenerationMode::Abundant
            && self.spec.frequencies.monthly_active
            && interval > 0
            && week % interval == 0
    }

    fn cooldown_weeks(&self, mode: YouthGenerationMode) -> Week {
        match mode {
            YouthGenerationMode::Abundant => self.spec.frequencies.monthly_cooldown_weeks,
            _ => self.spec.frequencies.annual_cooldown_weeks,
        }
    }

    /// Intake size for one structure from its type, infrastructure,
    /// coaching and budget factors, before cap enforcement.
    fn structure_intake(&self, structure: &YouthStructureRow, mode: YouthGenerationMode) -> u32 {
        let factors = &self.spec.factors;
        let Some(type_factor) = factors.structure_types.get(&structure.structure_type) else {
            log::warn!(
                "unknown structure type '{}' for {}, no intake",
                structure.structure_type,
                structure.youth_id
            );
            return 0;
        };
        let raw = type_factor.base
            + factors.infrastructure_bonus_per_level * f64::from(structure.equipment_level)
            + factors.coaching_bonus_per_point * f64::from(structure.coaching_quality)
            + budget_bonus(&factors.budget_tiers, structure.annual_budget);
        let multiplier = match mode {
            YouthGenerationMode::Abundant => self.spec.mode_multipliers.abundant,
            _ => self.spec.mode_multipliers.realistic,
        };
        let capped = (raw * multiplier).min(type_factor.max);
        (capped.floor() as u32).min(self.spec.caps.trainees.per_structure_max_per_period)
    }

    fn roll_worker(
        &self,
        rng: &mut GameRng,
        worker_id: String,
        company_id: Option<String>,
        region: &str,
        profile: &WorkerProfile,
        philosophy: Option<&str>,
    ) -> GeneratedWorker {
        let names = &self.spec.names;
        let first = &names.first_names[rng.next_u64_below(names.first_names.len() as u64) as usize];
        let last = &names.last_names[rng.next_u64_below(names.last_names.len() as u64) as usize];

        let region_bonus = self.spec.factors.regions.get(region);
        let philosophy_bonus = philosophy.and_then(|p| self.spec.factors.philosophies.get(p));
        let mut roll = |pick: fn(&RegionBonus) -> i32| {
            let base = rng.next_i64_in(1, 20) as i32;
            let bonus = region_bonus.map_or(0, pick) + philosophy_bonus.map_or(0, pick);
            (base + bonus).clamp(1, 20)
        };
        let in_ring = roll(|b| b.in_ring);
        let entertainment = roll(|b| b.entertainment);
        let story = roll(|b| b.story);

        let age = profile.age_min
            + rng.next_u64_below(u64::from(profile.age_max - profile.age_min + 1)) as u32;
        let specialty = pick_specialty(rng, &profile.specialties);
        let initial = &self.spec.initial_values;

        GeneratedWorker {
            worker_id,
            name: format!("{first} {last}"),
            company_id,
            region: region.to_string(),
            worker_type: "CATCHEUR".to_string(),
            age,
            in_ring,
            entertainment,
            story,
            popularity: initial.popularity,
            fatigue: initial.fatigue,
            morale: initial.morale,
            specialty,
        }
    }

    fn run_youth_intake(
        &self,
        options: &GenerationOptions,
        week: Week,
        snapshot: &mut CounterSnapshot,
        store: &SimStore,
        rng: &mut GameRng,
        items: &mut Vec<InboxItem>,
    ) -> SimResult<()> {
        let mode = options.youth_mode;
        if mode == YouthGenerationMode::Disabled || !self.youth_intake_due(mode, options, week) {
            return Ok(());
        }
        let caps = &self.spec.caps.trainees;
        let cooldown = self.cooldown_weeks(mode);

        for structure in store.youth_structures()? {
            if !structure.active {
                continue;
            }
            if let Some(last) = structure.last_generation_week {
                if week.saturating_sub(last) < cooldown {
                    continue;
                }
            }
            let free_slots = caps
                .per_structure_max_active
                .saturating_sub(structure.active_trainees.max(0) as u32);
            let remaining_global = caps.global_annual.saturating_sub(snapshot.global_trainees);
            let remaining_region = caps
                .per_region_annual
                .saturating_sub(snapshot.trainees_in(&structure.region));
            let remaining_company = caps
                .per_company_annual
                .saturating_sub(snapshot.trainees_for(&structure.company_id));
            let count = self
                .structure_intake(&structure, mode)
                .min(free_slots)
                .min(remaining_global)
                .min(remaining_region)
                .min(remaining_company);
            if count == 0 {
                continue;
            }

            for n in 1..=count {
                let worker_id = format!("TR-{}-{}-{}", structure.youth_id, week, n);
                let worker = self.roll_worker(
                    rng,
                    worker_id,
                    Some(structure.company_id.clone()),
                    &structure.region,
                    &self.spec.profiles.trainee,
                    Some(structure.philosophy.as_str()),
                );
                store.insert_generated_worker(&worker)?;
                store.insert_trainee(&worker.worker_id, &structure.youth_id, week)?;
            }

            let year = snapshot.year;
            store.increment_generation_counter(
                year,
                CounterScope::Global,
                "",
                CounterKind::Trainee,
                count,
            )?;
            store.increment_generation_counter(
                year,
                CounterScope::Region,
                &structure.region,
                CounterKind::Trainee,
                count,
            )?;
            store.increment_generation_counter(
                year,
                CounterScope::Company,
                &structure.company_id,
                CounterKind::Trainee,
                count,
            )?;
            snapshot.global_trainees += count;
            *snapshot
                .trainees_per_region
                .entry(structure.region.clone())
                .or_insert(0) += count;
            *snapshot
                .trainees_per_company
                .entry(structure.company_id.clone())
                .or_insert(0) += count;

            store.mark_structure_generated(&structure.youth_id, week, count)?;
            log::info!(
                "youth intake: {count} trainee(s) at {} (week {week})",
                structure.youth_id
            );
            items.push(InboxItem::new(
                InboxKind::Generation,
                format!("Nouvelle promotion : {}", structure.name),
                format!(
                    "{count} recrue(s) rejoignent {} ({}).",
                    structure.name, structure.region
                ),
                week,
            ));
        }
        Ok(())
    }

    fn run_world_spawns(
        &self,
        options: &GenerationOptions,
        week: Week,
        snapshot: &mut CounterSnapshot,
        store: &SimStore,
        rng: &mut GameRng,
        items: &mut Vec<InboxItem>,
    ) -> SimResult<()> {
        if options.world_mode == WorldGenerationMode::Disabled {
            return Ok(());
        }
        let caps = &self.spec.caps.free_agents;
        // Sorted so the region draw is independent of map iteration order.
        let mut regions: Vec<&String> = self.spec.factors.regions.keys().collect();
        regions.sort();
        if regions.is_empty() {
            return Ok(());
        }

        for n in 1..=self.spec.world_spawn.max_per_week {
            if !rng.chance(self.spec.world_spawn.weekly_chance) {
                continue;
            }
            if snapshot.global_free_agents >= caps.global_annual {
                break;
            }
            let region = regions[rng.next_u64_below(regions.len() as u64) as usize].clone();
            if snapshot.free_agents_in(&region) >= caps.per_region_annual {
                continue;
            }

            let worker_id = format!("FA-{region}-{week}-{n}");
            let worker = self.roll_worker(
                rng,
                worker_id,
                None,
                &region,
                &self.spec.profiles.free_agent,
                None,
            );
            store.insert_generated_worker(&worker)?;

            let year = snapshot.year;
            store.increment_generation_counter(
                year,
                CounterScope::Global,
                "",
                CounterKind::FreeAgent,
                1,
            )?;
            store.increment_generation_counter(
                year,
                CounterScope::Region,
                &region,
                CounterKind::FreeAgent,
                1,
            )?;
            snapshot.global_free_agents += 1;
            *snapshot.free_agents_per_region.entry(region.clone()).or_insert(0) += 1;

            items.push(InboxItem::new(
                InboxKind::Generation,
                "Un agent libre apparaît",
                format!("{} ({}) est disponible sur le marché.", worker.name, region),
                week,
            ));
        }
        Ok(())
    }
}

impl WeeklyStage for GenerationStage {
    fn name(&self) -> &'static str {
        "generation"
    }

    fn run(
        &mut self,
        ctx: &StageContext,
        store: &SimStore,
        rng: &mut GameRng,
    ) -> SimResult<Vec<InboxItem>> {
        let options = store.load_generation_options()?;
        if options.youth_mode == YouthGenerationMode::Disabled
            && options.world_mode == WorldGenerationMode::Disabled
        {
            return Ok(Vec::new());
        }

        // Reproducibility contract: the stream for this tick depends
        // only on the show, the week and the active modes.
        let week = ctx.week;
        rng.reseed(derive_seed(&[
            ctx.show.show_id.as_bytes(),
            &u64::from(week).to_le_bytes(),
            options.youth_mode.as_str().as_bytes(),
            options.world_mode.as_str().as_bytes(),
        ]));

        let mut snapshot = store.counter_snapshot(year_of_week(week))?;
        let mut items = Vec::new();
        self.run_youth_intake(&options, week, &mut snapshot, store, rng, &mut items)?;
        self.run_world_spawns(&options, week, &mut snapshot, store, rng, &mut items)?;
        Ok(items)
    }
}

fn budget_bonus(tiers: &[BudgetTier], budget: i64) -> f64 {
    tiers
        .iter()
        .find(|t| budget >= t.min && budget <= t.max)
        .map_or(0.0, |t| t.bonus)
}

fn pick_specialty(rng: &mut GameRng, weights: &[(String, f64)]) -> String {
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    if total <= 0.0 || weights.is_empty() {
        return "polyvalent".to_string();
    }
    let mut draw = rng.next_f64() * total;
    for (specialty, weight) in weights {
        draw -= weight;
        if draw <= 0.0 {
            return specialty.clone();
        }
    }
    weights[weights.len() - 1].0.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_mapping_round_trips() {
        for mode in [
            YouthGenerationMode::Disabled,
            YouthGenerationMode::Realistic,
            YouthGenerationMode::Abundant,
        ] {
            assert_eq!(YouthGenerationMode::parse(mode.as_str()).unwrap(), mode);
        }
        for mode in [WorldGenerationMode::Disabled, WorldGenerationMode::Low] {
            assert_eq!(WorldGenerationMode::parse(mode.as_str()).unwrap(), mode);
        }
        assert!(YouthGenerationMode::parse("maximale").is_err());
    }

    #[test]
    fn zero_monthly_interval_turns_the_cadence_off() {
        let mut spec = WorkerGenerationSpec::default();
        spec.frequencies.monthly_active = true;
        spec.frequencies.monthly_interval_weeks = 0;
        let stage = GenerationStage::new(spec);
        let options = GenerationOptions {
            youth_mode: YouthGenerationMode::Abundant,
            world_mode: WorldGenerationMode::Disabled,
            annual_pivot_week: None,
        };
        // Off-pivot week: must not divide by the zero interval.
        assert!(!stage.youth_intake_due(YouthGenerationMode::Abundant, &options, 6));
    }

    #[test]
    fn budget_bonus_uses_matching_tier() {
        let tiers = vec![
            BudgetTier { min: 0, max: 99, bonus: 0.0 },
            BudgetTier { min: 100, max: 499, bonus: 0.5 },
            BudgetTier { min: 500, max: i64::MAX, bonus: 1.0 },
        ];
        assert_eq!(budget_bonus(&tiers, 50), 0.0);
        assert_eq!(budget_bonus(&tiers, 100), 0.5);
        assert_eq!(budget_bonus(&tiers, 1_000_000), 1.0);
    }

    #[test]
    fn specialty_draw_respects_weights() {
        let weights = vec![("inring".to_string(), 1.0)];
        let mut rng = GameRng::seeded(3);
        assert_eq!(pick_specialty(&mut rng, &weights), "inring");
    }
}
