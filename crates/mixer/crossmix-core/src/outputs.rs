//! Per-tick output contracts.
//!
//! `Outputs` carries the weighted cursor samples the downstream pose
//! evaluator consumes, plus the semantic event stream for the host's event
//! sink. The compositor rebuilds samples every tick; events are delivered at
//! the first tick after they occur and never re-delivered.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clip::Clip;

/// One weighted playback position inside a layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CursorSample {
    pub clip: Arc<Clip>,
    /// Raw elapsed seconds on the cursor.
    pub time: f32,
    /// In-layer crossfade weight, in [0,1].
    pub weight: f32,
}

/// One layer's contribution for this tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayerSample {
    pub layer: usize,
    /// Layer output weight, independent of the in-layer crossfade.
    pub weight: f32,
    /// At most two entries: the outgoing cursor first, then the current one.
    pub cursors: Vec<CursorSample>,
}

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub enum MixEvent {
    /// A new cursor took over a track (queued dequeue or direct play).
    PlaybackStarted { layer: usize, clip: String },
    /// A clip marker whose timestamp was reached this tick.
    Marker {
        layer: usize,
        clip: String,
        name: String,
        time: f32,
        payload: serde_json::Value,
    },
    /// A non-looping clip ran past its duration; fired once per completion.
    ClipCompleted { layer: usize, clip: String, time: f32 },
    /// A looping clip wrapped back to its start.
    ClipLooped { layer: usize, clip: String },
    /// Auto-destroy returned the track to idle.
    TrackCleared { layer: usize },
}

/// Outputs returned by `LayerCompositor::tick`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub samples: Vec<LayerSample>,
    #[serde(default)]
    pub events: Vec<MixEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.samples.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: MixEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty() && self.events.is_empty()
    }
}
