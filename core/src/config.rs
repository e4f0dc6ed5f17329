//! Configuration port.
//!
//! Every section loads from its own JSON file under the data dir.
//! A missing file is NOT fatal: the loader falls back to the built-in
//! default for that section and logs a warning. A present-but-invalid
//! file is a real error and does fail.

use crate::types::Week;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// ── World simulation ───────────────────────────────────────────────

/// Amplitude bounds and simulated cost for one LOD tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierAmplitude {
    /// Prestige delta drawn uniformly from [-prestige_amp, prestige_amp].
    pub prestige_amp: i64,
    /// Treasury delta drawn uniformly from [-treasury_amp, treasury_amp].
    pub treasury_amp: f64,
    /// Abstract cost units used by the budget-driven plan demotion.
    pub cost_units: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSimSettings {
    /// Master seed; the world-sim stream for a tick is seed_base + week.
    pub seed_base: u64,
    /// Soft per-tick budget in milliseconds. Advisory only: exceeding it
    /// emits a performance warning, never aborts the tick.
    pub budget_ms: u64,
    /// How many non-player companies get the Detail tier (top prestige).
    pub detail_count: usize,
    /// Every N weeks, non-detail companies drop to Coarse for the week.
    pub coarse_interval_weeks: Week,
    pub detail: TierAmplitude,
    pub summary: TierAmplitude,
    pub coarse: TierAmplitude,
}

impl Default for WorldSimSettings {
    fn default() -> Self {
        Self {
            seed_base: 42,
            budget_ms: 120,
            detail_count: 10,
            coarse_interval_weeks: 4,
            detail: TierAmplitude { prestige_amp: 4, treasury_amp: 6500.0, cost_units: 14 },
            summary: TierAmplitude { prestige_amp: 3, treasury_amp: 4200.0, cost_units: 6 },
            coarse: TierAmplitude { prestige_amp: 2, treasury_amp: 1800.0, cost_units: 2 },
        }
    }
}

// ── Backstage incidents ────────────────────────────────────────────

/// One entry of the backstage incident catalog. Each incident rolls
/// independently every week with `chance` scaled by roster morale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentDefinition {
    pub type_id: String,
    pub title: String,
    /// `{worker}` expands to the first participant, `{workers}` to all.
    pub description_template: String,
    pub chance: f64,
    pub participants_min: u32,
    pub participants_max: u32,
    pub severity_min: i32,
    pub severity_max: i32,
    pub morale_impact_min: i32,
    pub morale_impact_max: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentCatalog {
    pub incidents: Vec<IncidentDefinition>,
}

impl Default for IncidentCatalog {
    fn default() -> Self {
        Self {
            incidents: vec![
                IncidentDefinition {
                    type_id: "altercation".into(),
                    title: "Altercation en coulisses".into(),
                    description_template:
                        "Une altercation éclate entre {workers} dans les vestiaires.".into(),
                    chance: 0.08,
                    participants_min: 2,
                    participants_max: 3,
                    severity_min: 2,
                    severity_max: 4,
                    morale_impact_min: -8,
                    morale_impact_max: -3,
                },
                IncidentDefinition {
                    type_id: "retard".into(),
                    title: "Retard répété".into(),
                    description_template:
                        "{worker} arrive en retard aux entraînements cette semaine.".into(),
                    chance: 0.12,
                    participants_min: 1,
                    participants_max: 1,
                    severity_min: 1,
                    severity_max: 2,
                    morale_impact_min: -4,
                    morale_impact_max: -1,
                },
                IncidentDefinition {
                    type_id: "entraide".into(),
                    title: "Bon esprit d'équipe".into(),
                    description_template:
                        "{worker} prend un jeune talent sous son aile.".into(),
                    chance: 0.10,
                    participants_min: 1,
                    participants_max: 2,
                    severity_min: 1,
                    severity_max: 1,
                    morale_impact_min: 2,
                    morale_impact_max: 6,
                },
            ],
        }
    }
}

// ── Worker generation ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraineeCaps {
    pub global_annual: u32,
    pub per_region_annual: u32,
    pub per_company_annual: u32,
    pub per_structure_max_active: u32,
    pub per_structure_max_per_period: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeAgentCaps {
    pub global_annual: u32,
    pub per_region_annual: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationCaps {
    pub trainees: TraineeCaps,
    pub free_agents: FreeAgentCaps,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationFrequencies {
    /// Week-in-year on which the annual youth intake happens.
    pub annual_pivot_week: Week,
    pub annual_cooldown_weeks: Week,
    /// Abundant mode may switch to a shorter monthly cadence.
    pub monthly_interval_weeks: Week,
    pub monthly_cooldown_weeks: Week,
    pub monthly_active: bool,
}

/// Per-structure-type base and cap on trainees per intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureTypeFactor {
    pub base: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetTier {
    pub min: i64,
    pub max: i64,
    pub bonus: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionBonus {
    #[serde(default)]
    pub in_ring: i32,
    #[serde(default)]
    pub entertainment: i32,
    #[serde(default)]
    pub story: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationFactors {
    pub structure_types: HashMap<String, StructureTypeFactor>,
    pub infrastructure_bonus_per_level: f64,
    pub coaching_bonus_per_point: f64,
    pub budget_tiers: Vec<BudgetTier>,
    pub regions: HashMap<String, RegionBonus>,
    pub philosophies: HashMap<String, RegionBonus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub age_min: u32,
    pub age_max: u32,
    /// Specialty → weight; drawn proportionally.
    pub specialties: Vec<(String, f64)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationProfiles {
    pub trainee: WorkerProfile,
    pub free_agent: WorkerProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialWorkerValues {
    pub popularity: i32,
    pub fatigue: i32,
    pub morale: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamePools {
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSpawn {
    /// Weekly probability of a free agent appearing in world mode Low.
    pub weekly_chance: f64,
    pub max_per_week: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeMultipliers {
    pub realistic: f64,
    pub abundant: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerGenerationSpec {
    pub caps: GenerationCaps,
    pub frequencies: GenerationFrequencies,
    pub factors: GenerationFactors,
    pub profiles: GenerationProfiles,
    pub initial_values: InitialWorkerValues,
    pub names: NamePools,
    pub world_spawn: WorldSpawn,
    pub mode_multipliers: ModeMultipliers,
}

impl Default for WorkerGenerationSpec {
    fn default() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            caps: GenerationCaps {
                trainees: TraineeCaps {
                    global_annual: 60,
                    per_region_annual: 20,
                    per_company_annual: 12,
                    per_structure_max_active: 18,
                    per_structure_max_per_period: 6,
                },
                free_agents: FreeAgentCaps {
                    global_annual: 30,
                    per_region_annual: 10,
                },
            },
            frequencies: GenerationFrequencies {
                annual_pivot_week: 32,
                annual_cooldown_weeks: 40,
                monthly_interval_weeks: 4,
                monthly_cooldown_weeks: 3,
                monthly_active: true,
            },
            factors: GenerationFactors {
                structure_types: [
                    ("DOJO".to_string(), StructureTypeFactor { base: 3.0, max: 6.0 }),
                    ("PERFORMANCE_CENTER".to_string(), StructureTypeFactor { base: 4.0, max: 8.0 }),
                    ("ECOLE".to_string(), StructureTypeFactor { base: 2.0, max: 4.0 }),
                ]
                .into(),
                infrastructure_bonus_per_level: 0.5,
                coaching_bonus_per_point: 0.1,
                budget_tiers: vec![
                    BudgetTier { min: 0, max: 99_999, bonus: 0.0 },
                    BudgetTier { min: 100_000, max: 499_999, bonus: 0.5 },
                    BudgetTier { min: 500_000, max: i64::MAX, bonus: 1.0 },
                ],
                regions: [
                    ("JAPON".to_string(), RegionBonus { in_ring: 2, entertainment: 0, story: 0 }),
                    ("MEXIQUE".to_string(), RegionBonus { in_ring: 1, entertainment: 1, story: 0 }),
                    ("USA".to_string(), RegionBonus { in_ring: 0, entertainment: 2, story: 0 }),
                ]
                .into(),
                philosophies: [
                    ("TECHNIQUE".to_string(), RegionBonus { in_ring: 2, entertainment: 0, story: 0 }),
                    ("SPORTS_ENTERTAINMENT".to_string(), RegionBonus { in_ring: 0, entertainment: 2, story: 1 }),
                    ("HYBRIDE".to_string(), RegionBonus { in_ring: 1, entertainment: 1, story: 1 }),
                ]
                .into(),
            },
            profiles: GenerationProfiles {
                trainee: WorkerProfile {
                    age_min: 18,
                    age_max: 23,
                    specialties: vec![
                        ("inring".into(), 0.4),
                        ("divertissement".into(), 0.3),
                        ("histoire".into(), 0.3),
                    ],
                },
                free_agent: WorkerProfile {
                    age_min: 22,
                    age_max: 34,
                    specialties: vec![
                        ("inring".into(), 0.35),
                        ("divertissement".into(), 0.35),
                        ("histoire".into(), 0.3),
                    ],
                },
            },
            initial_values: InitialWorkerValues {
                popularity: 5,
                fatigue: 0,
                morale: 60,
            },
            names: NamePools {
                first_names: names(&[
                    "Alex", "Kenji", "Diego", "Marcus", "Hiro", "Tommy", "Rafael",
                    "Jun", "Victor", "Eddie", "Sota", "Luis", "Dante", "Rey",
                ]),
                last_names: names(&[
                    "Storm", "Tanaka", "Reyes", "Steele", "Nakamura", "Cruz",
                    "Blackwood", "Sato", "Vega", "Cole", "Fujita", "Moreno",
                ]),
            },
            world_spawn: WorldSpawn {
                weekly_chance: 0.15,
                max_per_week: 1,
            },
            mode_multipliers: ModeMultipliers {
                realistic: 1.0,
                abundant: 1.6,
            },
        }
    }
}

// ── Youth progression ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhilosophyFocus {
    pub in_ring: f64,
    pub entertainment: f64,
    pub story: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouthSpec {
    /// Base weekly chance of a +1 gain on each attribute.
    pub base_gain_chance: f64,
    pub infrastructure_bonus_per_level: f64,
    pub coaching_bonus_per_point: f64,
    pub budget_tiers: Vec<BudgetTier>,
    pub max_gain_per_week: u32,
    pub philosophies: HashMap<String, PhilosophyFocus>,
    /// Graduation: at least this many weeks enrolled...
    pub graduation_min_weeks: Week,
    /// ...and attribute average at or above this threshold.
    pub graduation_avg_threshold: f64,
}

impl Default for YouthSpec {
    fn default() -> Self {
        Self {
            base_gain_chance: 0.35,
            infrastructure_bonus_per_level: 0.05,
            coaching_bonus_per_point: 0.01,
            budget_tiers: vec![
                BudgetTier { min: 0, max: 99_999, bonus: 0.0 },
                BudgetTier { min: 100_000, max: 499_999, bonus: 0.05 },
                BudgetTier { min: 500_000, max: i64::MAX, bonus: 0.10 },
            ],
            max_gain_per_week: 2,
            philosophies: [
                ("TECHNIQUE".to_string(), PhilosophyFocus { in_ring: 1.0, entertainment: 0.6, story: 0.6 }),
                ("SPORTS_ENTERTAINMENT".to_string(), PhilosophyFocus { in_ring: 0.6, entertainment: 1.0, story: 0.8 }),
                ("HYBRIDE".to_string(), PhilosophyFocus { in_ring: 0.8, entertainment: 0.8, story: 0.8 }),
            ]
            .into(),
            graduation_min_weeks: 26,
            graduation_avg_threshold: 11.0,
        }
    }
}

// ── Weekly finance ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceSettings {
    /// Fixed weekly running costs (venues, staff, logistics).
    pub weekly_overhead: f64,
    /// Ticket revenue per average audience member per week.
    pub ticket_rate: f64,
    /// Merchandising revenue per average audience member per week.
    pub merch_rate: f64,
    /// Flat weekly TV rights payment for shows with a broadcast deal.
    pub tv_weekly_revenue: f64,
    /// Weekly fatigue recovered by every active performer.
    pub fatigue_recovery_per_week: i32,
}

impl Default for FinanceSettings {
    fn default() -> Self {
        Self {
            weekly_overhead: 4_500.0,
            ticket_rate: 2.4,
            merch_rate: 0.8,
            tv_weekly_revenue: 9_000.0,
            fatigue_recovery_per_week: 12,
        }
    }
}

// ── Aggregate ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct GameConfig {
    pub world_sim: WorldSimSettings,
    pub incidents: IncidentCatalog,
    pub generation: WorkerGenerationSpec,
    pub youth: YouthSpec,
    pub finance: FinanceSettings,
}

impl GameConfig {
    /// Load from the data/ directory. Each section falls back to its
    /// built-in default when its file is absent.
    /// In tests, use GameConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        Ok(Self {
            world_sim: load_section(data_dir, "world_sim.json")?,
            incidents: load_section(data_dir, "incidents.json")?,
            generation: load_section(data_dir, "worker_generation.json")?,
            youth: load_section(data_dir, "youth.json")?,
            finance: load_section(data_dir, "finance.json")?,
        })
    }

    /// Built-in defaults, used by unit tests and as the per-section
    /// fallback for missing files.
    pub fn default_test() -> Self {
        Self::default()
    }
}

fn load_section<T>(data_dir: &str, file: &str) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    let path = Path::new(data_dir).join(file);
    match std::fs::read_to_string(&path) {
        Ok(content) => serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display())),
        Err(_) => {
            log::warn!("Config {} absent, using built-in defaults", path.display());
            Ok(T::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dir_falls_back_to_defaults() {
        let config = GameConfig::load("/nonexistent/ringsim-data").unwrap();
        assert_eq!(config.world_sim.budget_ms, 120);
        assert!(!config.incidents.incidents.is_empty());
    }

    #[test]
    fn tier_amplitudes_are_monotonic() {
        let ws = WorldSimSettings::default();
        assert!(ws.detail.prestige_amp >= ws.summary.prestige_amp);
        assert!(ws.summary.prestige_amp >= ws.coarse.prestige_amp);
        assert!(ws.detail.treasury_amp >= ws.summary.treasury_amp);
        assert!(ws.summary.treasury_amp >= ws.coarse.treasury_amp);
    }
}
