//! THE MOST IMPORTANT TEST IN THE PROJECT.
//!
//! Two worlds, same seed, same starting state, same weeks advanced.
//! They must produce byte-identical notification lists and identical
//! company state. Any divergence is a blocker — do not merge until
//! fixed.

use ringsim_core::{
    config::GameConfig,
    engine::WeeklyEngine,
    store::{ShowDefinition, SimStore},
    world_sim_stage::CompanyState,
};

fn seeded_world() -> WeeklyEngine {
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
        .insert_show(&ShowDefinition {
            show_id: "SHOW-1".into(),
            name: "Lundi de Fureur".into(),
            company_id: "RGP".into(),
            week: 5,
            has_tv_deal: true,
        })
        .expect("insert show");
    for (id, name, prestige) in [
        ("RGP", "Ring General Promotions", 55),
        ("AAW", "All Action Wrestling", 70),
        ("NHW", "New Heights Wrestling", 40),
        ("ZWO", "Zenith Wrestling Org", 70),
    ] {
        store
            .insert_company(&CompanyState {
                company_id: id.into(),
                name: name.into(),
                region: "USA".into(),
                prestige,
                treasury: 250_000.0,
                average_audience: 3_000,
                reach: "regional".into(),
            })
            .expect("insert company");
    }
    WeeklyEngine::build(&GameConfig::default_test(), store)
}

fn company_fingerprint(engine: &WeeklyEngine) -> Vec<String> {
    engine
        .store()
        .companies()
        .expect("companies")
        .iter()
        .map(|c| format!("{}|{}|{:.2}", c.company_id, c.prestige, c.treasury))
        .collect()
}

#[test]
fn same_seed_produces_identical_weeks() {
    const WEEKS: u32 = 26;

    let mut world_a = seeded_world();
    let mut world_b = seeded_world();

    let mut notices_a = Vec::new();
    let mut notices_b = Vec::new();
    for _ in 0..WEEKS {
        notices_a.extend(world_a.advance_week("SHOW-1").expect("world_a week"));
        notices_b.extend(world_b.advance_week("SHOW-1").expect("world_b week"));
    }

    assert_eq!(
        notices_a.len(),
        notices_b.len(),
        "Notice counts differ: {} vs {}",
        notices_a.len(),
        notices_b.len()
    );
    for (i, (a, b)) in notices_a.iter().zip(notices_b.iter()).enumerate() {
        assert_eq!(a, b, "Notices diverged at entry {i}:\n  A: {a:?}\n  B: {b:?}");
    }

    assert_eq!(
        company_fingerprint(&world_a),
        company_fingerprint(&world_b),
        "Company state diverged after {WEEKS} weeks"
    );
}

#[test]
fn different_seeds_diverge() {
    let mut world_a = seeded_world();

    let store = SimStore::in_memory().expect("store");
    store.migrate().expect("migration");
    store
        .insert_show(&ShowDefinition {
            show_id: "SHOW-1".into(),
            name: "Lundi de Fureur".into(),
            company_id: "RGP".into(),
            week: 5,
            has_tv_deal: true,
        })
        .expect("insert show");
    for (id, name, prestige) in [
        ("RGP", "Ring General Promotions", 55),
        ("AAW", "All Action Wrestling", 70),
        ("NHW", "New Heights Wrestling", 40),
        ("ZWO", "Zenith Wrestling Org", 70),
    ] {
        store
            .insert_company(&CompanyState {
                company_id: id.into(),
                name: name.into(),
                region: "USA".into(),
                prestige,
                treasury: 250_000.0,
                average_audience: 3_000,
                reach: "regional".into(),
            })
            .expect("insert company");
    }
    let mut config = GameConfig::default_test();
    config.world_sim.seed_base = 987_654_321;
    let mut world_b = WeeklyEngine::build(&config, store);

    for _ in 0..8 {
        world_a.advance_week("SHOW-1").expect("world_a week");
        world_b.advance_week("SHOW-1").expect("world_b week");
    }
    assert_ne!(
        company_fingerprint(&world_a),
        company_fingerprint(&world_b),
        "Different seeds produced identical company state over 8 weeks"
    );
}
