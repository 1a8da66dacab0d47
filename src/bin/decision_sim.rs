//! Headless decision simulation
//!
//! Runs a small agent population against a hand-built drive/mapping
//! setup and reports what the agents chose and how their drives moved.
//! Drives track a depleting resource (satiation, wakefulness), so their
//! need levels climb over time until an action replenishes them.

use std::collections::BTreeMap;

use clap::Parser;
use volition::attribute::{AttributeType, AttributeTypeId, AttributeTypeRegistry};
use volition::core::types::GameHours;
use volition::curve::{Curve, CurveShape};
use volition::drive::{DriveType, DriveTypeId, DriveTypeRegistry, SyncDirection};
use volition::plan::{MappingCatalog, MappingType};
use volition::utility::UtilityFunction;
use volition::Engine;

/// Headless decision loop over a sample drive configuration
#[derive(Parser, Debug)]
#[command(name = "decision_sim")]
#[command(about = "Run utility-driven agents and print their decisions")]
struct Args {
    /// Number of agents to spawn
    #[arg(long, default_value_t = 10)]
    agents: usize,

    /// Number of simulation steps
    #[arg(long, default_value_t = 48)]
    steps: u32,

    /// Simulated hours per step
    #[arg(long, default_value_t = 0.5)]
    step_hours: GameHours,

    /// Random seed for deterministic runs
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn build_drives() -> DriveTypeRegistry {
    let mut drives = DriveTypeRegistry::new();
    drives
        .register(
            DriveType::new("hunger", 3, Curve::over_levels(CurveShape::Quadratic))
                .with_bounds(0.0, 100.0, 100.0)
                .with_constant_rate(-6.0),
        )
        .expect("hunger drive");
    drives
        .register(
            DriveType::new("rest", 2, Curve::over_levels(CurveShape::Linear))
                .with_bounds(0.0, 100.0, 100.0)
                // Wakefulness drains fastest around mid-day activity
                .with_time_of_day_rate(Curve::new(CurveShape::Sine, 0.0, 1.0, 0.0, -8.0)),
        )
        .expect("rest drive");
    drives
        .register(
            DriveType::new("social", 1, Curve::over_levels(CurveShape::Linear))
                .with_bounds(0.0, 100.0, 100.0)
                .with_constant_rate(-2.0)
                .with_continue_modifier(0.5),
        )
        .expect("social drive");
    drives
        .register(
            DriveType::new("vitality", 4, Curve::over_levels(CurveShape::Quadratic))
                .synced_to_attribute(AttributeTypeId::from("health"), SyncDirection::Opposite),
        )
        .expect("vitality drive");
    drives
}

fn build_attributes() -> AttributeTypeRegistry {
    let mut attributes = AttributeTypeRegistry::new();
    attributes
        .register(AttributeType::numeric("health", 0.0, 100.0, 90.0))
        .expect("health attribute");
    attributes
}

fn drive_rate(id: &str, drive: &str, amount: f32, hours: GameHours) -> MappingType {
    MappingType::new(
        id,
        DriveTypeId::from(drive),
        UtilityFunction::DriveRate {
            du_influence: 0.0,
            se_influence: 0.2,
        },
    )
    .with_drive_amount(amount)
    .with_duration(hours)
}

fn build_catalog() -> MappingCatalog {
    let mut catalog = MappingCatalog::new();
    catalog.register(drive_rate("eat-meal", "hunger", -60.0, 1.0));
    catalog.register(drive_rate("snack", "hunger", -15.0, 0.25));
    catalog.register(
        drive_rate("sleep", "rest", -90.0, 8.0)
            .with_side_effect(DriveTypeId::from("social"), 10.0),
    );
    catalog.register(drive_rate("nap", "rest", -25.0, 1.0));
    catalog.register(
        drive_rate("chat", "social", -30.0, 0.5)
            .with_side_effect(DriveTypeId::from("rest"), 5.0),
    );
    catalog
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("volition=info")),
        )
        .init();

    let args = Args::parse();

    let mut engine = Engine::new(build_drives(), build_attributes(), build_catalog(), args.seed);
    let agents: Vec<_> = (0..args.agents).map(|_| engine.spawn_agent()).collect();

    println!(
        "decision_sim: {} agents, {} steps of {}h, seed {}",
        args.agents, args.steps, args.step_hours, args.seed
    );

    let mut decision_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut idle_cycles = 0usize;

    for step in 0..args.steps {
        engine.tick(args.step_hours);
        for &agent in &agents {
            let result = engine.decide(agent, None).expect("decision cycle");
            match (result.chosen, result.drive) {
                (Some(mapping), Some(drive)) => {
                    *decision_counts.entry(mapping.id().0.clone()).or_default() += 1;
                    // Resolve the outcome instantly: a headless run has no
                    // execution layer to play the action out over time
                    let amount = mapping.mapping_type.drive_amount;
                    engine
                        .apply_output_change(agent, &drive, amount, &mapping)
                        .expect("outcome application");
                }
                _ => idle_cycles += 1,
            }
        }
        if step % 8 == 7 {
            println!(
                "  day {} hour {:02}: {} decisions so far",
                engine.clock().current_day(),
                engine.clock().current_hour(),
                decision_counts.values().sum::<usize>()
            );
        }
    }

    println!("\nDecisions by mapping:");
    for (mapping, count) in &decision_counts {
        println!("  {mapping:<12} {count}");
    }
    println!("Idle cycles: {idle_cycles}");
}
