//! # Host Integration
//!
//! The renderer implements [`VisualHost`]; the particle system only ever
//! talks to it through this trait.
//!
//! ```text
//! ember_effects defines:   renderer implements:
//! ┌─────────────────┐      ┌─────────────────┐
//! │ trait VisualHost│ ←─── │ impl VisualHost │
//! └─────────────────┘      └─────────────────┘
//! ```
//!
//! Host failures (a visual that could not be created, a stale handle) are the
//! host's business. The trait is infallible on purpose so the simulation never
//! has to unwind half a tick.

use std::collections::BTreeMap;

use ember_shared::{Color, Vec2};

use crate::particle::ParticleShape;

/// Opaque handle to a host-side visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(pub u64);

/// Interface to the host's scene graph.
pub trait VisualHost {
    /// Creates a visual for a new particle.
    fn create_visual(&mut self, shape: ParticleShape, color: Color) -> VisualHandle;

    /// Moves a visual.
    fn set_position(&mut self, handle: VisualHandle, position: Vec2);

    /// Rotates a visual, degrees.
    fn set_orientation(&mut self, handle: VisualHandle, degrees: f32);

    /// Sets a visual's opacity in `0.0..=1.0`.
    fn set_opacity(&mut self, handle: VisualHandle, opacity: f32);

    /// Removes a visual from the scene.
    fn destroy_visual(&mut self, handle: VisualHandle);
}

impl<H: VisualHost + ?Sized> VisualHost for &mut H {
    fn create_visual(&mut self, shape: ParticleShape, color: Color) -> VisualHandle {
        (**self).create_visual(shape, color)
    }

    fn set_position(&mut self, handle: VisualHandle, position: Vec2) {
        (**self).set_position(handle, position);
    }

    fn set_orientation(&mut self, handle: VisualHandle, degrees: f32) {
        (**self).set_orientation(handle, degrees);
    }

    fn set_opacity(&mut self, handle: VisualHandle, opacity: f32) {
        (**self).set_opacity(handle, opacity);
    }

    fn destroy_visual(&mut self, handle: VisualHandle) {
        (**self).destroy_visual(handle);
    }
}

// ============================================================================
// RECORDING IMPLEMENTATION (For Testing and headless runs)
// ============================================================================

/// One call made on a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    /// `create_visual`
    Create {
        /// Handle returned
        handle: VisualHandle,
        /// Requested shape
        shape: ParticleShape,
        /// Requested color
        color: Color,
    },
    /// `set_position`
    Position(VisualHandle, Vec2),
    /// `set_orientation`
    Orientation(VisualHandle, f32),
    /// `set_opacity`
    Opacity(VisualHandle, f32),
    /// `destroy_visual`
    Destroy(VisualHandle),
}

/// Last known state of a visual.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualState {
    /// Shape it was created with
    pub shape: ParticleShape,
    /// Fill color
    pub color: Color,
    /// Last position pushed
    pub position: Vec2,
    /// Last orientation pushed
    pub orientation: f32,
    /// Last opacity pushed
    pub opacity: f32,
}

/// In-memory host that records every call and the resulting scene state.
///
/// Destroyed visuals are dropped from the scene, so a state-only host stays
/// proportional to the live particle count however long it runs. The call
/// log of a recording host grows with every call.
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    visuals: BTreeMap<VisualHandle, VisualState>,
    next_handle: u64,
    record_calls: bool,
}

impl RecordingHost {
    /// Creates a host that keeps the full call log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            record_calls: true,
            ..Self::default()
        }
    }

    /// Creates a host that only tracks scene state (for long runs).
    #[must_use]
    pub fn state_only() -> Self {
        Self::default()
    }

    /// Every call received, in order.
    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// State of a live visual. `None` once destroyed.
    #[must_use]
    pub fn visual(&self, handle: VisualHandle) -> Option<&VisualState> {
        self.visuals.get(&handle)
    }

    /// Visuals created and not yet destroyed.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.visuals.len()
    }

    /// Visuals ever created.
    #[must_use]
    pub fn created_count(&self) -> usize {
        usize::try_from(self.next_handle).unwrap_or(usize::MAX)
    }

    /// Last position pushed to `handle` according to the call log.
    ///
    /// Still answers after the visual is destroyed; always `None` on a
    /// state-only host.
    #[must_use]
    pub fn last_position(&self, handle: VisualHandle) -> Option<Vec2> {
        self.calls.iter().rev().find_map(|call| match call {
            HostCall::Position(h, position) if *h == handle => Some(*position),
            _ => None,
        })
    }

    /// Number of `destroy_visual` calls received for `handle`.
    #[must_use]
    pub fn destroy_calls(&self, handle: VisualHandle) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::Destroy(h) if *h == handle))
            .count()
    }

    fn record(&mut self, call: HostCall) {
        if self.record_calls {
            self.calls.push(call);
        }
    }
}

impl VisualHost for RecordingHost {
    fn create_visual(&mut self, shape: ParticleShape, color: Color) -> VisualHandle {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        self.visuals.insert(
            handle,
            VisualState {
                shape,
                color,
                position: Vec2::ZERO,
                orientation: 0.0,
                opacity: 1.0,
            },
        );
        self.record(HostCall::Create { handle, shape, color });
        handle
    }

    fn set_position(&mut self, handle: VisualHandle, position: Vec2) {
        if let Some(v) = self.visuals.get_mut(&handle) {
            v.position = position;
        }
        self.record(HostCall::Position(handle, position));
    }

    fn set_orientation(&mut self, handle: VisualHandle, degrees: f32) {
        if let Some(v) = self.visuals.get_mut(&handle) {
            v.orientation = degrees;
        }
        self.record(HostCall::Orientation(handle, degrees));
    }

    fn set_opacity(&mut self, handle: VisualHandle, opacity: f32) {
        if let Some(v) = self.visuals.get_mut(&handle) {
            v.opacity = opacity;
        }
        self.record(HostCall::Opacity(handle, opacity));
    }

    fn destroy_visual(&mut self, handle: VisualHandle) {
        self.visuals.remove(&handle);
        self.record(HostCall::Destroy(handle));
    }
}
