//! # Particle Demo
//!
//! Runs the showcase script headless and prints a report.
//!
//! Usage: `particle_demo [config.toml]`
//!
//! Without a config file the defaults are used with a fixed seed, so two
//! runs print the same particle counts.

use std::path::Path;
use std::process;

use ember::demo::{self, DemoScript};
use ember::EffectsConfig;

/// Seed used when no config file is given.
const DEMO_SEED: u64 = 0xE3BE;

fn load_config() -> EffectsConfig {
    match std::env::args().nth(1) {
        Some(path) => match EffectsConfig::from_toml_file(Path::new(&path)) {
            Ok(config) => {
                println!("Loaded config from {path}");
                config
            }
            Err(err) => {
                eprintln!("error: {err}");
                process::exit(1);
            }
        },
        None => {
            println!("Using default config (seed {DEMO_SEED:#x})");
            EffectsConfig::default().with_seed(DEMO_SEED)
        }
    }
}

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║           EMBER PARTICLE DEMO                                    ║");
    println!("║           Explosion → Implosion → Explosion                      ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let config = load_config();
    let script = DemoScript::showcase();

    println!();
    println!("┌─ CONFIG ─────────────────────────────────────────────────────────┐");
    println!("│ Drag:               {:.2}", config.drag_coefficient);
    println!("│ Explosion duration: {:.2}s", config.explosion_duration);
    println!("│ Implosion duration: {:.2}s", config.implosion_duration);
    println!("│ Implosion fade:     {}", config.implosion_fade);
    println!("│ Emissions:          {}", script.emissions().len());
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let report = match demo::run(config, &script) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };

    println!("┌─ RESULTS ────────────────────────────────────────────────────────┐");
    println!("│ Frames:             {}", report.frames);
    println!("│ Simulated time:     {:.3}s", report.sim_time);
    println!("│ Particles spawned:  {}", report.stats.spawned_particles);
    println!("│ Peak particles:     {}", report.peak_particles);
    println!("│ Batches expired:    {}", report.stats.expired_batches);
    println!("│ Visuals created:    {}", report.visuals_created);
    println!("│ Visuals leaked:     {}", report.visuals_live);
    println!("│ Wall time:          {:.3} ms", report.wall_time_us as f64 / 1000.0);
    println!("└──────────────────────────────────────────────────────────────────┘");

    if report.visuals_live > 0 || report.stats.active_batches > 0 {
        println!("✗ run ended with live effects");
        process::exit(1);
    }
    println!("✓ all effects cleaned up");
}
