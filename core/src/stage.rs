//! Stage trait and per-tick context.
//!
//! RULE: Every weekly stage implements WeeklyStage.
//! The engine calls run() on each registered stage in registration
//! order, every week. Execution order is fixed and documented in
//! engine.rs.

use crate::{
    error::SimResult,
    inbox::InboxItem,
    rng::GameRng,
    store::{ShowDefinition, SimStore},
    types::Week,
    world_sim_stage::CompanyState,
};

/// Read-only facts about the week being simulated, loaded once by the
/// engine before any stage runs.
pub struct StageContext {
    pub show: ShowDefinition,
    pub company: CompanyState,
    pub week: Week,
}

/// The contract every weekly stage must fulfill.
pub trait WeeklyStage {
    /// Unique stable name for this stage.
    fn name(&self) -> &'static str;

    /// Called once per week by the engine.
    ///
    /// - `ctx`:   the show, player company and week under simulation
    /// - `store`: the open game database, inside the tick transaction
    /// - `rng`:   this stage's deterministic RNG for this week
    ///
    /// Returns the inbox items this stage produced; the engine
    /// persists them in stage order after all stages have run.
    fn run(
        &mut self,
        ctx: &StageContext,
        store: &SimStore,
        rng: &mut GameRng,
    ) -> SimResult<Vec<InboxItem>>;
}
