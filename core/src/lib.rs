//! RingSim core — the deterministic weekly simulation behind the
//! promotion-management game.
//!
//! One call to [`engine::WeeklyEngine::advance_week`] advances a show
//! by one in-game week: finances, worker generation, youth
//! progression, backstage incidents, news, contract expirations, the
//! world simulation and the scouting refresh, in that fixed order,
//! inside a single transaction. Same seed + same state = same week,
//! byte for byte.

pub mod config;
pub mod contract_stage;
pub mod engine;
pub mod error;
pub mod finance_stage;
pub mod generation_stage;
pub mod inbox;
pub mod incident_stage;
pub mod news_stage;
pub mod rng;
pub mod scouting_stage;
pub mod stage;
pub mod store;
pub mod types;
pub mod world_sim_stage;
pub mod youth_stage;

pub use config::GameConfig;
pub use engine::WeeklyEngine;
pub use error::{SimError, SimResult};
pub use inbox::{InboxItem, InboxKind};
pub use store::SimStore;
