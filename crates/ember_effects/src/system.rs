//! Particle Effect System
//!
//! Architecture:
//! 1. `spawn` turns an `EmissionRequest` into a batch, creates one host
//!    visual per particle and schedules the batch's expiry
//! 2. `tick` advances the clock, steps every particle, pushes position /
//!    orientation / opacity to the host
//! 3. Batches whose deadline was reached are destroyed at the end of the tick,
//!    after their particles got the final update, so the host always sees the
//!    last frame of an effect before the destroy
//!
//! Everything runs on the caller's thread inside `spawn` / `tick`.

use std::collections::BTreeMap;

use ember_shared::{Color, Vec2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::EffectsConfig;
use crate::emission::{self, EmissionRequest};
use crate::error::EffectsResult;
use crate::host::VisualHost;
use crate::kinematics::{self, KinematicsConfig};
use crate::particle::{Batch, BatchId, EffectKind, Motion, Particle};
use crate::timeline::ExpiryTimeline;
use crate::transition::LinearTransition;

/// Statistics from the particle system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectsStats {
    /// Batches currently alive
    pub active_batches: usize,
    /// Particles currently alive
    pub active_particles: usize,
    /// Particles spawned since creation
    pub spawned_particles: u64,
    /// Batches removed by reaching their deadline
    pub expired_batches: u64,
    /// Batches removed early by `cancel_batch` or `clear`
    pub cancelled_batches: u64,
}

/// Owns every live particle batch and drives the host's visuals.
pub struct ParticleSystem<H> {
    host: H,
    config: EffectsConfig,
    kinematics: KinematicsConfig,
    rng: ChaCha8Rng,
    batches: BTreeMap<BatchId, Batch>,
    timeline: ExpiryTimeline<BatchId>,
    next_batch: u64,
    spawned_particles: u64,
    expired_batches: u64,
    cancelled_batches: u64,
}

impl<H: VisualHost> ParticleSystem<H> {
    /// Creates a particle system drawing through `host`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` fails validation.
    pub fn new(config: EffectsConfig, host: H) -> EffectsResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            host,
            kinematics: config.kinematics(),
            config,
            rng,
            batches: BTreeMap::new(),
            timeline: ExpiryTimeline::new(),
            next_batch: 1,
            spawned_particles: 0,
            expired_batches: 0,
            cancelled_batches: 0,
        })
    }

    /// Spawns an explosion: particles fly out of `origin` and slow down.
    pub fn spawn_explosion(
        &mut self,
        origin: Vec2,
        color: Color,
        radius: f32,
        count: u32,
    ) -> Option<BatchId> {
        self.spawn(EmissionRequest::explosion(origin, color, radius, count))
    }

    /// Spawns an implosion: particles appear around `origin` and converge on it.
    pub fn spawn_implosion(
        &mut self,
        origin: Vec2,
        color: Color,
        radius: f32,
        count: u32,
    ) -> Option<BatchId> {
        self.spawn(EmissionRequest::implosion(origin, color, radius, count))
    }

    /// Spawns the batch described by `request`.
    ///
    /// Returns `None` for an empty request; nothing is created or scheduled.
    pub fn spawn(&mut self, request: EmissionRequest) -> Option<BatchId> {
        if request.is_empty() {
            tracing::trace!(kind = ?request.kind, "ignoring empty emission");
            return None;
        }

        let id = BatchId(self.next_batch);
        self.next_batch += 1;

        let kind = request.kind;
        let duration = self.config.duration(kind);
        let mut particles = Vec::with_capacity(request.count as usize);

        for _ in 0..request.count {
            let offset = emission::random_offset(&mut self.rng, request.radius);
            let (position, motion) = match kind {
                EffectKind::Explosion => (request.origin, Motion::Ballistic { velocity: offset }),
                EffectKind::Implosion => {
                    let start = request.origin + offset;
                    let transition = LinearTransition::new(start, request.origin, duration);
                    (start, Motion::Converging(transition))
                }
            };

            let visual = self.host.create_visual(self.config.shape, request.color);
            let orientation = kinematics::heading_degrees(offset).unwrap_or(0.0);

            self.host.set_position(visual, position);
            self.host.set_orientation(visual, orientation);
            self.host.set_opacity(visual, 1.0);

            particles.push(Particle {
                position,
                origin: request.origin,
                color: request.color,
                orientation,
                opacity: 1.0,
                lifetime: duration,
                motion,
                visual,
            });
        }

        let timer = self.timeline.schedule_once(f64::from(duration), id);
        self.batches.insert(
            id,
            Batch {
                id,
                kind,
                particles,
                duration,
                spawned_at: self.timeline.now(),
                timer,
            },
        );
        self.spawned_particles += u64::from(request.count);

        tracing::debug!(
            batch = %id,
            kind = ?kind,
            count = request.count,
            duration,
            "spawned particle batch"
        );

        Some(id)
    }

    /// Advances the simulation by `dt` time units.
    ///
    /// Call this once per frame. Returns the number of batches that expired.
    pub fn tick(&mut self, dt: f32) -> usize {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            tracing::warn!(dt, "rejecting invalid tick delta, treating as zero");
            0.0
        };

        let expired = self.timeline.advance(f64::from(dt));
        let now = self.timeline.now();

        for batch in self.batches.values_mut() {
            #[allow(clippy::cast_possible_truncation)]
            let age = ((now - batch.spawned_at) as f32).min(batch.duration);
            let fades = self.config.fades(batch.kind);

            for particle in &mut batch.particles {
                let turned = match batch.kind {
                    EffectKind::Explosion => {
                        kinematics::step_explosion(particle, dt, &self.kinematics)
                    }
                    EffectKind::Implosion => {
                        kinematics::step_implosion(particle, age, batch.duration)
                    }
                };
                if fades {
                    particle.opacity = kinematics::linear_fade(age, batch.duration);
                }

                self.host.set_position(particle.visual, particle.position);
                if turned {
                    self.host.set_orientation(particle.visual, particle.orientation);
                }
                self.host.set_opacity(particle.visual, particle.opacity);
            }
        }

        let expired_count = expired.len();
        for id in expired {
            self.expire(id);
        }

        tracing::trace!(
            time = now,
            batches = self.batches.len(),
            expired = expired_count,
            "effects tick"
        );

        expired_count
    }

    /// Removes a live batch before its deadline.
    ///
    /// Returns false if the batch already expired or was cancelled.
    pub fn cancel_batch(&mut self, id: BatchId) -> bool {
        let Some(batch) = self.batches.remove(&id) else {
            return false;
        };

        self.timeline.cancel(batch.timer);
        self.destroy(&batch);
        self.cancelled_batches += 1;

        tracing::debug!(batch = %id, "cancelled particle batch");
        true
    }

    /// Tears everything down: cancels all pending expiries and destroys every
    /// visual. Safe to call more than once.
    pub fn clear(&mut self) {
        let dropped = self.timeline.clear();
        let batches = std::mem::take(&mut self.batches);

        for batch in batches.values() {
            self.destroy(batch);
        }
        self.cancelled_batches += batches.len() as u64;

        if !batches.is_empty() {
            tracing::debug!(batches = batches.len(), timers = dropped, "cleared particle system");
        }
    }

    /// Current simulation time.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.timeline.now()
    }

    /// Live batch by ID.
    #[must_use]
    pub fn batch(&self, id: BatchId) -> Option<&Batch> {
        self.batches.get(&id)
    }

    /// Live batches in spawn order.
    pub fn batches(&self) -> impl Iterator<Item = &Batch> {
        self.batches.values()
    }

    /// Number of live batches.
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Number of live particles across all batches.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.batches.values().map(Batch::len).sum()
    }

    /// Expiries still waiting on the timeline.
    #[must_use]
    pub fn pending_expiries(&self) -> usize {
        self.timeline.pending()
    }

    /// Returns current statistics
    #[must_use]
    pub fn stats(&self) -> EffectsStats {
        EffectsStats {
            active_batches: self.batch_count(),
            active_particles: self.particle_count(),
            spawned_particles: self.spawned_particles,
            expired_batches: self.expired_batches,
            cancelled_batches: self.cancelled_batches,
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &EffectsConfig {
        &self.config
    }

    /// The host collaborator
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host collaborator, mutably
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Tears the system down and hands the host back.
    pub fn into_host(mut self) -> H {
        self.clear();
        self.host
    }

    fn expire(&mut self, id: BatchId) {
        if let Some(batch) = self.batches.remove(&id) {
            self.destroy(&batch);
            self.expired_batches += 1;
            tracing::debug!(batch = %id, particles = batch.len(), "particle batch expired");
        }
    }

    fn destroy(&mut self, batch: &Batch) {
        for particle in &batch.particles {
            self.host.destroy_visual(particle.visual);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;

    fn system() -> ParticleSystem<RecordingHost> {
        ParticleSystem::new(EffectsConfig::default().with_seed(1234), RecordingHost::new()).unwrap()
    }

    #[test]
    fn test_spawn_creates_visuals() {
        let mut fx = system();
        let id = fx.spawn_explosion(Vec2::ZERO, Color::RED, 10.0, 5).unwrap();

        assert_eq!(fx.batch(id).unwrap().len(), 5);
        assert_eq!(fx.host().live_count(), 5);
        assert_eq!(fx.pending_expiries(), 1);
    }

    #[test]
    fn test_zero_count_is_noop() {
        let mut fx = system();
        assert_eq!(fx.spawn_implosion(Vec2::ZERO, Color::RED, 10.0, 0), None);
        assert_eq!(fx.batch_count(), 0);
        assert_eq!(fx.pending_expiries(), 0);
        assert!(fx.host().calls().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EffectsConfig {
            explosion_duration: -1.0,
            ..EffectsConfig::default()
        };
        assert!(ParticleSystem::new(config, RecordingHost::new()).is_err());
    }

    #[test]
    fn test_invalid_dt_treated_as_zero() {
        let mut fx = system();
        fx.spawn_explosion(Vec2::ZERO, Color::RED, 10.0, 3);

        fx.tick(f32::NAN);
        fx.tick(-1.0);
        fx.tick(f32::INFINITY);

        assert_eq!(fx.time(), 0.0);
        assert_eq!(fx.batch_count(), 1);
    }

    #[test]
    fn test_stats_track_lifecycle() {
        let mut fx = system();
        fx.spawn_explosion(Vec2::ZERO, Color::RED, 10.0, 4);
        let cancelled = fx.spawn_implosion(Vec2::ZERO, Color::BLUE, 10.0, 2).unwrap();
        fx.spawn_implosion(Vec2::ZERO, Color::BLUE, 10.0, 3);

        assert!(fx.cancel_batch(cancelled));
        fx.tick(1.0); // implosion expires
        let stats = fx.stats();

        assert_eq!(stats.spawned_particles, 9);
        assert_eq!(stats.cancelled_batches, 1);
        assert_eq!(stats.expired_batches, 1);
        assert_eq!(stats.active_batches, 1);
        assert_eq!(stats.active_particles, 4);
    }

    #[test]
    fn test_into_host_tears_down() {
        let mut fx = system();
        fx.spawn_explosion(Vec2::ZERO, Color::RED, 10.0, 6);
        let host = fx.into_host();
        assert_eq!(host.created_count(), 6);
        assert_eq!(host.live_count(), 0);
    }
}
