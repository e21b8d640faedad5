//! Play-request contract submitted by the host.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clip::Clip;

/// One "play this clip" submission. Immutable once submitted; the addressed
/// track either transitions immediately or enqueues it.
///
/// Construct with [`PlayRequest::new`] and struct-update syntax for the
/// non-default knobs:
///
/// ```
/// # use crossmix_core::{Clip, PlayRequest};
/// let walk = Clip::new("walk", 1.2, true, vec![]);
/// let req = PlayRequest {
///     fade_duration: 0.25,
///     layer: 1,
///     ..PlayRequest::new(walk)
/// };
/// # assert!(req.is_override);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayRequest {
    /// `None` models a request carrying no clip; the compositor treats it as
    /// a documented no-op, never an error.
    pub clip: Option<Arc<Clip>>,
    /// Playback speed multiplier for the new cursor.
    pub speed: f32,
    /// Crossfade length in seconds; 0 means an instantaneous switch.
    pub fade_duration: f32,
    /// Target layer index on the compositor.
    pub layer: usize,
    /// Bypass the pending queue and take effect now, clearing the queue.
    pub is_override: bool,
    /// Drop the request if the addressed track already plays this clip.
    pub cancel_if_same_clip: bool,
    /// Tear the track down to idle once the clip completes unlooped.
    pub auto_destroy: bool,
}

impl Default for PlayRequest {
    fn default() -> Self {
        Self {
            clip: None,
            speed: 1.0,
            fade_duration: 0.0,
            layer: 0,
            is_override: true,
            cancel_if_same_clip: false,
            auto_destroy: false,
        }
    }
}

impl PlayRequest {
    pub fn new(clip: Arc<Clip>) -> Self {
        Self {
            clip: Some(clip),
            ..Self::default()
        }
    }
}
