//! weekly-runner: headless weekly-loop runner for RingSim.
//!
//! Usage:
//!   weekly-runner --seed 42 --weeks 12 --db save.db
//!   weekly-runner --weeks 4 --json

use anyhow::Result;
use ringsim_core::{
    engine::WeeklyEngine,
    store::{ShowDefinition, SimStore},
    world_sim_stage::CompanyState,
    GameConfig, InboxItem,
};
use std::env;

#[derive(serde::Serialize)]
struct RunSummary {
    weeks: u32,
    last_week_notices: Vec<InboxItem>,
    standings: Vec<Standing>,
}

#[derive(serde::Serialize)]
struct Standing {
    company_id: String,
    name: String,
    prestige: i64,
    treasury: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let weeks = parse_arg(&args, "--weeks", 12u32);
    let json_output = args.iter().any(|a| a == "--json");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    if !json_output {
        println!("RingSim — weekly-runner");
        println!("  seed:      {seed}");
        println!("  weeks:     {weeks}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!("  started:   {}", chrono::Local::now().to_rfc3339());
        println!();
    }

    // For :memory: use a SQLite shared-memory URI so reopening the
    // same run (e.g. from an attached inspector) sees the same data.
    let db_effective: String = if db == ":memory:" {
        format!("file:ringsim_{}?mode=memory&cache=shared", uuid::Uuid::new_v4())
    } else {
        db.to_string()
    };
    let store = SimStore::open(&db_effective)?;
    store.migrate()?;

    let mut config = GameConfig::load(data_dir)?;
    config.world_sim.seed_base = seed;

    if store.show_definition("SHOW-1").is_err() {
        seed_demo_world(&store)?;
        if !json_output {
            println!("(seeded demo world: 1 player company, 5 rivals)");
            println!();
        }
    }

    let mut engine = WeeklyEngine::build(&config, store);
    let mut last_week: Vec<InboxItem> = Vec::new();
    for _ in 0..weeks {
        last_week = engine.advance_week("SHOW-1")?;
        if !json_output {
            print_week(&last_week);
        }
    }

    log::info!("run complete: {weeks} week(s) simulated");
    if json_output {
        let mut companies = engine.store().companies()?;
        companies.sort_by(|a, b| {
            b.prestige
                .cmp(&a.prestige)
                .then_with(|| a.company_id.cmp(&b.company_id))
        });
        let summary = RunSummary {
            weeks,
            last_week_notices: last_week,
            standings: companies
                .into_iter()
                .map(|c| Standing {
                    company_id: c.company_id,
                    name: c.name,
                    prestige: c.prestige,
                    treasury: c.treasury,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&engine)?;
    }
    Ok(())
}

fn seed_demo_world(store: &SimStore) -> Result<()> {
    store.insert_show(&ShowDefinition {
        show_id: "SHOW-1".into(),
        name: "Lundi de Fureur".into(),
        company_id: "RGP".into(),
        week: 0,
        has_tv_deal: true,
    })?;
    let companies = [
        ("RGP", "Ring General Promotions", "USA", 55, 250_000.0, 3_200),
        ("AAW", "All Action Wrestling", "USA", 72, 900_000.0, 8_500),
        ("NJD", "Nihon Joshi Dojo", "JAPON", 64, 400_000.0, 4_100),
        ("LLM", "Lucha Libre Maxima", "MEXIQUE", 58, 310_000.0, 5_000),
        ("ICW", "Iron City Wrestling", "USA", 35, 90_000.0, 1_200),
        ("PWZ", "Pro Wrestling Zero", "JAPON", 47, 150_000.0, 2_300),
    ];
    for (id, name, region, prestige, treasury, audience) in companies {
        store.insert_company(&CompanyState {
            company_id: id.into(),
            name: name.into(),
            region: region.into(),
            prestige,
            treasury,
            average_audience: audience,
            reach: "regional".into(),
        })?;
    }
    Ok(())
}

fn print_week(items: &[InboxItem]) {
    let week = items.first().map_or(0, |i| i.week);
    println!("── Semaine {week} ──");
    for item in items {
        println!("  [{}] {} — {}", item.kind.as_str(), item.title, item.body);
    }
    println!();
}

fn print_summary(engine: &WeeklyEngine) -> Result<()> {
    let store = engine.store();
    println!("Classement par prestige :");
    let mut companies = store.companies()?;
    companies.sort_by(|a, b| {
        b.prestige
            .cmp(&a.prestige)
            .then_with(|| a.company_id.cmp(&b.company_id))
    });
    for (rank, company) in companies.iter().enumerate() {
        println!(
            "  {}. {:<28} prestige {:>3}  trésorerie {:>12.2}",
            rank + 1,
            company.name,
            company.prestige,
            company.treasury
        );
    }
    println!();
    println!("{} notification(s) au total.", store.inbox_count()?);
    Ok(())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
