//! Youth progression: weekly gains, the per-week cap, graduation.

use ringsim_core::{
    config::GameConfig,
    engine::WeeklyEngine,
    generation_stage::{
        GeneratedWorker, GenerationOptions, WorldGenerationMode, YouthGenerationMode,
        YouthStructureRow,
    },
    inbox::InboxKind,
    store::{ShowDefinition, SimStore},
    types::Week,
    world_sim_stage::CompanyState,
};

fn seeded_store(start_week: Week) -> SimStore {
    let store = SimStore::in_memory().expect("store");
    store.migrate().expect("migration");
    store
        .insert_show(&ShowDefinition {
            show_id: "SHOW-1".into(),
            name: "Lundi de Fureur".into(),
            company_id: "RGP".into(),
            week: start_week,
            has_tv_deal: false,
        })
        .expect("show");
    store
        .insert_company(&CompanyState {
            company_id: "RGP".into(),
            name: "Ring General Promotions".into(),
            region: "USA".into(),
            prestige: 50,
            treasury: 300_000.0,
            average_audience: 1_500,
            reach: "regional".into(),
        })
        .expect("company");
    store
        .insert_youth_structure(&YouthStructureRow {
            youth_id: "Y-1".into(),
            name: "Dojo Central".into(),
            company_id: "RGP".into(),
            region: "JAPON".into(),
            structure_type: "DOJO".into(),
            philosophy: "TECHNIQUE".into(),
            equipment_level: 3,
            coaching_quality: 15,
            annual_budget: 200_000,
            active: true,
            last_generation_week: None,
            active_trainees: 1,
        })
        .expect("structure");
    store
        .save_generation_options(&GenerationOptions {
            youth_mode: YouthGenerationMode::Disabled,
            world_mode: WorldGenerationMode::Disabled,
            annual_pivot_week: None,
        })
        .expect("options");
    store
}

fn enroll(store: &SimStore, worker_id: &str, attrs: (i32, i32, i32), enrolled_week: Week) {
    store
        .insert_generated_worker(&GeneratedWorker {
            worker_id: worker_id.into(),
            name: format!("Espoir {worker_id}"),
            company_id: Some("RGP".into()),
            region: "JAPON".into(),
            worker_type: "CATCHEUR".into(),
            age: 19,
            in_ring: attrs.0,
            entertainment: attrs.1,
            story: attrs.2,
            popularity: 5,
            fatigue: 0,
            morale: 60,
            specialty: "inring".into(),
        })
        .expect("worker");
    store.insert_trainee(worker_id, "Y-1", enrolled_week).expect("trainee");
}

#[test]
fn ready_trainee_graduates_with_a_notice() {
    let store = seeded_store(29);
    enroll(&store, "TR-1", (15, 14, 13), 0);

    let mut engine = WeeklyEngine::build(&GameConfig::default_test(), store);
    let items = engine.advance_week("SHOW-1").expect("advance");

    let youth: Vec<_> = items.iter().filter(|i| i.kind == InboxKind::Youth).collect();
    assert_eq!(youth.len(), 1);
    assert!(youth[0].body.contains("Espoir TR-1"));
    assert_eq!(engine.store().graduated_count().expect("graduated"), 1);
    // Graduates leave the weekly progression pool.
    assert!(engine.store().trainees_in_training().expect("pool").is_empty());
}

#[test]
fn weak_trainee_stays_in_training() {
    let store = seeded_store(29);
    enroll(&store, "TR-2", (2, 2, 2), 0);

    let mut engine = WeeklyEngine::build(&GameConfig::default_test(), store);
    let items = engine.advance_week("SHOW-1").expect("advance");

    assert!(items.iter().all(|i| i.kind != InboxKind::Youth));
    assert_eq!(engine.store().graduated_count().expect("graduated"), 0);
}

#[test]
fn weekly_gains_respect_the_cap_and_attribute_ceiling() {
    let store = seeded_store(0);
    enroll(&store, "TR-3", (5, 5, 5), 0);
    enroll(&store, "TR-4", (20, 20, 20), 0);

    let mut config = GameConfig::default_test();
    config.youth.base_gain_chance = 1.0;
    let mut engine = WeeklyEngine::build(&config, store);
    engine.advance_week("SHOW-1").expect("advance");

    let pool = engine.store().trainees_in_training().expect("pool");
    let growing = pool.iter().find(|t| t.worker_id == "TR-3").expect("TR-3");
    let gained =
        (growing.in_ring - 5) + (growing.entertainment - 5) + (growing.story - 5);
    assert!((1..=2).contains(&gained), "weekly gain out of range: {gained}");
    assert_eq!(growing.in_ring, 6, "technique focus trains in-ring first");

    let maxed = pool.iter().find(|t| t.worker_id == "TR-4").expect("TR-4");
    assert_eq!(
        (maxed.in_ring, maxed.entertainment, maxed.story),
        (20, 20, 20),
        "attributes never exceed the ceiling"
    );
}
