//! World simulation: budget warnings, prestige clamping, notice caps.

use ringsim_core::{
    config::GameConfig,
    engine::WeeklyEngine,
    generation_stage::{GenerationOptions, WorldGenerationMode, YouthGenerationMode},
    inbox::InboxKind,
    store::{ShowDefinition, SimStore},
    world_sim_stage::CompanyState,
};

fn seeded_store(company_count: usize, prestige: i64) -> SimStore {
    let store = SimStore::in_memory().expect("store");
    store.migrate().expect("migration");
    store
        .insert_show(&ShowDefinition {
            show_id: "SHOW-1".into(),
            name: "Vendredi Chaos".into(),
            company_id: "RGP".into(),
            week: 0,
            has_tv_deal: false,
        })
        .expect("show");
    store
        .insert_company(&CompanyState {
            company_id: "RGP".into(),
            name: "Ring General Promotions".into(),
            region: "USA".into(),
            prestige: 50,
            treasury: 100_000.0,
            average_audience: 1_000,
            reach: "regional".into(),
        })
        .expect("player");
    for n in 0..company_count {
        store
            .insert_company(&CompanyState {
                company_id: format!("SIM-{n:02}"),
                name: format!("Promotion {n:02}"),
                region: "USA".into(),
                prestige,
                treasury: 100_000.0,
                average_audience: 1_000,
                reach: "regional".into(),
            })
            .expect("company");
    }
    store
        .save_generation_options(&GenerationOptions {
            youth_mode: YouthGenerationMode::Disabled,
            world_mode: WorldGenerationMode::Disabled,
            annual_pivot_week: None,
        })
        .expect("options");
    store
}

#[test]
fn zero_budget_warns_exactly_once_per_week() {
    let mut config = GameConfig::default_test();
    config.world_sim.budget_ms = 0;
    let mut engine = WeeklyEngine::build(&config, seeded_store(5, 50));

    for _ in 0..4 {
        let items = engine.advance_week("SHOW-1").expect("advance");
        let warnings = items
            .iter()
            .filter(|i| i.kind == InboxKind::Performance)
            .count();
        assert_eq!(warnings, 1, "zero budget must warn exactly once per week");
    }
}

#[test]
fn huge_budget_never_warns() {
    let mut config = GameConfig::default_test();
    config.world_sim.budget_ms = u64::MAX;
    let mut engine = WeeklyEngine::build(&config, seeded_store(5, 50));

    for _ in 0..4 {
        let items = engine.advance_week("SHOW-1").expect("advance");
        assert!(items.iter().all(|i| i.kind != InboxKind::Performance));
    }
}

#[test]
fn max_seed_base_reseeds_without_overflow() {
    let mut config = GameConfig::default_test();
    config.world_sim.seed_base = u64::MAX;
    let mut engine = WeeklyEngine::build(&config, seeded_store(3, 50));

    for _ in 0..3 {
        let items = engine.advance_week("SHOW-1").expect("advance");
        assert!(items.iter().any(|i| i.kind == InboxKind::WorldSim));
    }
}

#[test]
fn prestige_stays_clamped_at_both_bounds() {
    let mut engine = WeeklyEngine::build(&GameConfig::default_test(), seeded_store(3, 100));
    for _ in 0..30 {
        engine.advance_week("SHOW-1").expect("advance");
        for company in engine.store().companies().expect("companies") {
            assert!(
                (0..=100).contains(&company.prestige),
                "prestige escaped [0, 100]: {} = {}",
                company.company_id,
                company.prestige
            );
        }
    }

    let mut engine_low = WeeklyEngine::build(&GameConfig::default_test(), seeded_store(3, 0));
    for _ in 0..30 {
        engine_low.advance_week("SHOW-1").expect("advance");
        for company in engine_low.store().companies().expect("companies") {
            assert!((0..=100).contains(&company.prestige));
        }
    }
}

#[test]
fn at_most_three_world_notices() {
    let mut engine = WeeklyEngine::build(&GameConfig::default_test(), seeded_store(12, 50));
    for _ in 0..6 {
        let items = engine.advance_week("SHOW-1").expect("advance");
        let world = items
            .iter()
            .filter(|i| i.kind == InboxKind::WorldSim)
            .count();
        assert!(world <= 3, "got {world} world notices");
    }
}
