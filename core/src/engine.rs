//! The weekly engine — one call advances the game world by one week.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   0. Preconditions: show + player company must exist (pre-mutation)
//!   1. Week counter increment + passive fatigue recovery
//!   2. Finance stage
//!   3. Worker generation stage
//!   4. Youth progression stage
//!   5. Backstage incident stage
//!   6. Flavor news stage
//!   7. Contract/offer expiration stage
//!   8. World simulation stage
//!   9. Scouting refresh stage
//!  10. Notice persistence, commit
//!
//! RULES:
//!   - Stages execute in registration order, every week.
//!   - No stage calls another stage directly; no two stages write
//!     overlapping state slices.
//!   - All randomness flows through the RngBank or a stage's own
//!     documented reseed.
//!   - Any stage error rolls the whole tick back; no partial weeks.

use crate::{
    config::GameConfig,
    contract_stage::ContractStage,
    error::SimResult,
    finance_stage::FinanceStage,
    generation_stage::GenerationStage,
    inbox::InboxItem,
    incident_stage::IncidentStage,
    news_stage::NewsStage,
    rng::{RngBank, StageSlot},
    scouting_stage::ScoutingStage,
    stage::{StageContext, WeeklyStage},
    store::SimStore,
    world_sim_stage::WorldSimStage,
    youth_stage::YouthStage,
};

pub struct WeeklyEngine {
    rng_bank: RngBank,
    fatigue_recovery: i32,
    stages: Vec<(StageSlot, Box<dyn WeeklyStage>)>,
    store: SimStore,
}

impl WeeklyEngine {
    pub fn new(seed: u64, fatigue_recovery: i32, store: SimStore) -> Self {
        Self {
            rng_bank: RngBank::new(seed),
            fatigue_recovery,
            stages: Vec::new(),
            store,
        }
    }

    /// Build a fully wired engine with all stages registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(config: &GameConfig, store: SimStore) -> Self {
        let mut engine = WeeklyEngine::new(
            config.world_sim.seed_base,
            config.finance.fatigue_recovery_per_week,
            store,
        );

        // EXECUTION ORDER — fixed, documented, never reordered.
        engine.register(
            StageSlot::Finance,
            Box::new(FinanceStage::new(config.finance.clone())),
        );
        engine.register(
            StageSlot::Generation,
            Box::new(GenerationStage::new(config.generation.clone())),
        );
        engine.register(StageSlot::Youth, Box::new(YouthStage::new(config.youth.clone())));
        engine.register(
            StageSlot::Backstage,
            Box::new(IncidentStage::new(config.incidents.clone())),
        );
        engine.register(StageSlot::News, Box::new(NewsStage));
        engine.register(StageSlot::Contracts, Box::new(ContractStage));
        engine.register(
            StageSlot::WorldSim,
            Box::new(WorldSimStage::new(config.world_sim.clone())),
        );
        engine.register(StageSlot::Scouting, Box::new(ScoutingStage));
        engine
    }

    /// Register a stage. Call in the documented execution order.
    pub fn register(&mut self, slot: StageSlot, stage: Box<dyn WeeklyStage>) {
        self.stages.push((slot, stage));
    }

    pub fn store(&self) -> &SimStore {
        &self.store
    }

    /// Advance the given show by one week. Returns every notification
    /// produced, in stage order. On error the tick is rolled back and
    /// the week counter is untouched.
    pub fn advance_week(&mut self, show_id: &str) -> SimResult<Vec<InboxItem>> {
        // Preconditions, checked before any mutation.
        let show = self.store.show_definition(show_id)?;
        self.store.company(&show.company_id)?;

        self.store.begin_tick()?;
        match self.run_tick(&show.show_id) {
            Ok(items) => {
                self.store.commit_tick()?;
                Ok(items)
            }
            Err(e) => {
                log::error!("week advance for '{show_id}' failed: {e}");
                self.store.rollback_tick()?;
                Err(e)
            }
        }
    }

    fn run_tick(&mut self, show_id: &str) -> SimResult<Vec<InboxItem>> {
        let week = self.store.increment_week(show_id)?;
        self.store.recover_weekly_fatigue(self.fatigue_recovery)?;

        // Stages see the incremented week and the post-recovery state.
        let show = self.store.show_definition(show_id)?;
        let company = self.store.company(&show.company_id)?;
        let ctx = StageContext { show, company, week };

        let mut items = Vec::new();
        for (slot, stage) in &mut self.stages {
            let mut rng = self.rng_bank.for_stage(*slot, u64::from(week));
            let produced = stage.run(&ctx, &self.store, &mut rng)?;
            log::debug!("stage {} produced {} notice(s)", stage.name(), produced.len());
            items.extend(produced);
        }

        for item in &items {
            self.store.append_inbox_item(item)?;
        }
        Ok(items)
    }
}
