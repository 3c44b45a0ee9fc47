//! # Scripted Headless Runs
//!
//! Plays a timed list of emissions through a `ParticleSystem` at a fixed
//! frame step, with a state-only recording host standing in for the
//! renderer, and reports what happened.

use std::time::Instant;

use ember_effects::{
    EffectsConfig, EffectsResult, EffectsStats, EmissionRequest, ParticleSystem, RecordingHost,
};
use ember_shared::{Color, Vec2};

/// Default frame step, 60 FPS.
pub const DEFAULT_FRAME_DT: f32 = 1.0 / 60.0;

/// Hard stop so a script can never run forever.
pub const DEFAULT_MAX_FRAMES: u32 = 60 * 60;

/// An emission fired once the simulation clock reaches `at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedEmission {
    /// Simulation time to fire at
    pub at: f64,
    /// What to spawn
    pub request: EmissionRequest,
}

/// A timed sequence of emissions.
#[derive(Debug, Clone)]
pub struct DemoScript {
    emissions: Vec<ScriptedEmission>,
    frame_dt: f32,
    max_frames: u32,
}

impl DemoScript {
    /// Empty script stepping at `frame_dt`.
    #[must_use]
    pub fn new(frame_dt: f32) -> Self {
        Self {
            emissions: Vec::new(),
            frame_dt,
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }

    /// Adds an emission at time `at`.
    #[must_use]
    pub fn at(mut self, at: f64, request: EmissionRequest) -> Self {
        self.emissions.push(ScriptedEmission { at, request });
        self.emissions.sort_by(|a, b| a.at.total_cmp(&b.at));
        self
    }

    /// Caps the number of frames.
    #[must_use]
    pub fn max_frames(mut self, max_frames: u32) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Scheduled emissions, earliest first.
    #[must_use]
    pub fn emissions(&self) -> &[ScriptedEmission] {
        &self.emissions
    }

    /// A short sequence: a red burst, an implosion overlapping it, and a
    /// late orange burst.
    #[must_use]
    pub fn showcase() -> Self {
        Self::new(DEFAULT_FRAME_DT)
            .at(0.0, EmissionRequest::explosion(Vec2::new(320.0, 240.0), Color::RED, 60.0, 64))
            .at(0.5, EmissionRequest::implosion(Vec2::new(160.0, 120.0), Color::BLUE, 80.0, 48))
            .at(1.25, EmissionRequest::explosion(Vec2::new(480.0, 360.0), Color::ORANGE, 120.0, 96))
    }
}

impl Default for DemoScript {
    fn default() -> Self {
        Self::showcase()
    }
}

/// Summary of a scripted run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoReport {
    /// Frames stepped
    pub frames: u32,
    /// Simulation time at the end
    pub sim_time: f64,
    /// Particle system statistics at the end
    pub stats: EffectsStats,
    /// Most particles alive at once
    pub peak_particles: usize,
    /// Host visuals ever created
    pub visuals_created: usize,
    /// Host visuals still alive at the end
    pub visuals_live: usize,
    /// Wall-clock time of the run in microseconds
    pub wall_time_us: u64,
}

/// Plays `script` until every emission has fired and every batch expired,
/// or the frame cap is hit.
///
/// # Errors
///
/// Returns `InvalidConfig` if `config` fails validation.
pub fn run(config: EffectsConfig, script: &DemoScript) -> EffectsResult<DemoReport> {
    let start = Instant::now();
    let mut fx = ParticleSystem::new(config, RecordingHost::state_only())?;

    let mut pending = script.emissions.iter().peekable();
    let mut frames = 0;
    let mut peak_particles = 0;

    while frames < script.max_frames {
        while let Some(emission) = pending.next_if(|e| e.at <= fx.time()) {
            fx.spawn(emission.request);
        }
        peak_particles = peak_particles.max(fx.particle_count());

        if pending.peek().is_none() && fx.batch_count() == 0 {
            break;
        }

        fx.tick(script.frame_dt);
        frames += 1;
    }

    if pending.peek().is_some() || fx.batch_count() > 0 {
        tracing::warn!(frames, "demo hit its frame cap before finishing");
    }

    let report = DemoReport {
        frames,
        sim_time: fx.time(),
        stats: fx.stats(),
        peak_particles,
        visuals_created: fx.host().created_count(),
        visuals_live: fx.host().live_count(),
        wall_time_us: u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX),
    };
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_showcase_runs_to_completion() {
        let report = run(EffectsConfig::default().with_seed(3), &DemoScript::showcase()).unwrap();

        assert_eq!(report.stats.spawned_particles, 64 + 48 + 96);
        assert_eq!(report.stats.expired_batches, 3);
        assert_eq!(report.visuals_created, 208);
        assert_eq!(report.visuals_live, 0);
        // last burst at 1.25 lives 2.0
        assert!(report.sim_time >= 3.25);
        assert!(report.sim_time < 3.25 + 2.0 * f64::from(DEFAULT_FRAME_DT));
    }

    #[test]
    fn test_overlap_raises_peak() {
        let script = DemoScript::new(0.25)
            .at(0.0, EmissionRequest::explosion(Vec2::ZERO, Color::RED, 10.0, 10))
            .at(0.5, EmissionRequest::implosion(Vec2::ZERO, Color::RED, 10.0, 5));
        let report = run(EffectsConfig::default().with_seed(1), &script).unwrap();

        assert_eq!(report.peak_particles, 15);
        assert_eq!(report.frames, 8);
        assert_eq!(report.sim_time, 2.0);
    }

    #[test]
    fn test_frame_cap() {
        let script = DemoScript::new(0.1)
            .at(0.0, EmissionRequest::explosion(Vec2::ZERO, Color::RED, 10.0, 1))
            .max_frames(3);
        let report = run(EffectsConfig::default().with_seed(1), &script).unwrap();

        assert_eq!(report.frames, 3);
        assert_eq!(report.stats.active_batches, 1);
    }

    #[test]
    fn test_empty_script_does_nothing() {
        let report = run(EffectsConfig::default().with_seed(1), &DemoScript::new(0.1)).unwrap();
        assert_eq!(report.frames, 0);
        assert_eq!(report.visuals_created, 0);
    }
}
