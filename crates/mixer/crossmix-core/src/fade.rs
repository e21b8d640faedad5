//! Frame-granular crossfade timelines.
//!
//! Clip crossfades and layer-weight crossfades share this timeline: a plain
//! elapsed-vs-duration state struct advanced once per tick. Cancellation is
//! replacement; there is no merge between an old timeline and a new one.

use serde::{Deserialize, Serialize};

#[inline]
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Elapsed-vs-duration timeline yielding a rate in [0,1].
/// A zero (or negative) duration reads as already complete.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Fade {
    pub elapsed: f32,
    pub duration: f32,
}

impl Fade {
    pub fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
        }
    }

    /// Advance by one frame's worth of time and return the new rate.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt;
        self.rate()
    }

    pub fn rate(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            clamp01(self.elapsed / self.duration)
        }
    }

    pub fn done(&self) -> bool {
        self.rate() >= 1.0
    }
}
