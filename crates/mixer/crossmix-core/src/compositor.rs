//! Layer composition over per-layer clip tracks.
//!
//! The compositor owns one [`ClipTrack`] per declared layer, routes play
//! requests, drives every track once per frame, and manages layer-level
//! weight crossfades independently of any clip crossfade. It is the public
//! control surface of the crate; the host's frame scheduler calls
//! [`LayerCompositor::tick`] exactly once per frame with the elapsed real
//! time, and the pose evaluator reads the returned [`Outputs`].

use std::sync::Arc;

use crate::clip::Clip;
use crate::config::{Config, LayerPolicy};
use crate::error::CompositorError;
use crate::fade::{clamp01, lerp, Fade};
use crate::outputs::{CursorSample, LayerSample, Outputs};
use crate::request::PlayRequest;
use crate::track::ClipTrack;

/// In-flight layer-weight crossfade. Starting a new one replaces the old
/// timeline, picking up from the currently-displayed weight (no snap).
#[derive(Clone, Copy, Debug)]
struct WeightFade {
    fade: Fade,
    start: f32,
    target: f32,
}

#[derive(Debug)]
pub struct LayerCompositor {
    cfg: Config,
    tracks: Vec<ClipTrack>,
    weights: Vec<f32>,
    weight_fades: Vec<Option<WeightFade>>,
    frozen: bool,
    initialized: bool,
    outputs: Outputs,
}

impl LayerCompositor {
    /// Create an uninitialized compositor. Every control call and query is a
    /// safe no-op until [`initialize`](Self::initialize) runs.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            tracks: Vec::new(),
            weights: Vec::new(),
            weight_fades: Vec::new(),
            frozen: false,
            initialized: false,
            outputs: Outputs::default(),
        }
    }

    /// Build the fixed layer set. Exclusive weighting is defined for exactly
    /// two layers (base/override); any other count falls back to independent
    /// weighting. Initial weights: exclusive `[1, 0]`, independent all `1`.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        if self.cfg.layer_policy == LayerPolicy::Exclusive && self.cfg.layer_count != 2 {
            log::warn!(
                "exclusive layer policy requires exactly 2 layers, got {}; using independent weights",
                self.cfg.layer_count
            );
            self.cfg.layer_policy = LayerPolicy::Independent;
        }
        self.tracks = (0..self.cfg.layer_count).map(ClipTrack::new).collect();
        self.weights = match self.cfg.layer_policy {
            LayerPolicy::Exclusive => vec![1.0, 0.0],
            LayerPolicy::Independent => vec![1.0; self.cfg.layer_count],
        };
        self.weight_fades = vec![None; self.cfg.layer_count];
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn layer_count(&self) -> usize {
        self.tracks.len()
    }

    /// Block every control call and suspend ticking; already-computed state is
    /// left exactly as it was.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Resume ticking from the exact frozen state.
    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    fn check_layer(&self, layer: usize) -> Result<(), CompositorError> {
        if layer < self.tracks.len() {
            Ok(())
        } else {
            Err(CompositorError::LayerOutOfRange {
                layer,
                count: self.tracks.len(),
            })
        }
    }

    /// Route a play request to its layer's track. A request without a clip is
    /// a documented no-op; a bad layer index is a caller bug and surfaces as
    /// an error.
    pub fn play(&mut self, req: PlayRequest) -> Result<(), CompositorError> {
        if !self.initialized || self.frozen {
            return Ok(());
        }
        self.check_layer(req.layer)?;
        if req.clip.is_none() {
            log::debug!("play request without a clip ignored (layer {})", req.layer);
            return Ok(());
        }
        let layer = req.layer;
        self.tracks[layer].request(req);
        Ok(())
    }

    pub fn pause(&mut self, layer: usize) -> Result<(), CompositorError> {
        if !self.initialized || self.frozen {
            return Ok(());
        }
        self.check_layer(layer)?;
        self.tracks[layer].pause();
        Ok(())
    }

    pub fn resume(&mut self, layer: usize) -> Result<(), CompositorError> {
        if !self.initialized || self.frozen {
            return Ok(());
        }
        self.check_layer(layer)?;
        self.tracks[layer].resume();
        Ok(())
    }

    /// Rescale a layer's playback and crossfade speed from the next tick on.
    pub fn set_time_scale(&mut self, scale: f32, layer: usize) -> Result<(), CompositorError> {
        if !self.initialized || self.frozen {
            return Ok(());
        }
        self.check_layer(layer)?;
        self.tracks[layer].set_time_scale(scale);
        Ok(())
    }

    /// Set a layer's output weight, immediately (`duration == 0`) or via a
    /// weight crossfade. Under the exclusive policy the complementary layer
    /// mirrors the change toward `1 - weight`; under the independent policy
    /// no other layer is touched.
    pub fn set_layer_weight(
        &mut self,
        layer: usize,
        weight: f32,
        duration: f32,
    ) -> Result<(), CompositorError> {
        if !self.initialized || self.frozen {
            return Ok(());
        }
        self.check_layer(layer)?;
        let weight = clamp01(weight);
        self.apply_weight(layer, weight, duration);
        if self.cfg.layer_policy == LayerPolicy::Exclusive {
            // Exclusive is pinned to two layers at initialize time.
            self.apply_weight(1 - layer, 1.0 - weight, duration);
        }
        Ok(())
    }

    fn apply_weight(&mut self, layer: usize, target: f32, duration: f32) {
        if duration <= 0.0 {
            self.weight_fades[layer] = None;
            self.weights[layer] = target;
        } else {
            self.weight_fades[layer] = Some(WeightFade {
                fade: Fade::new(duration),
                start: self.weights[layer],
                target,
            });
        }
    }

    /// Debug scrub of a layer's current cursor by normalized time.
    pub fn set_normalized_time(
        &mut self,
        layer: usize,
        normalized: f32,
        stop: bool,
    ) -> Result<(), CompositorError> {
        if !self.initialized || self.frozen {
            return Ok(());
        }
        self.check_layer(layer)?;
        self.tracks[layer].set_normalized_time(normalized, stop);
        Ok(())
    }

    /// One frame of compositor time. Per layer, in declaration order: the
    /// track advances (crossfade, cursor time, markers, completion) and its
    /// events are drained; then layer-weight fades advance; then the sample
    /// list for the pose evaluator is rebuilt.
    ///
    /// No-op while frozen or before initialization; a frozen tick keeps the
    /// last samples but does not re-deliver events.
    pub fn tick(&mut self, dt: f32) -> &Outputs {
        if !self.initialized {
            return &self.outputs;
        }
        if self.frozen {
            self.outputs.events.clear();
            return &self.outputs;
        }
        self.outputs.clear();
        for track in &mut self.tracks {
            track.advance(dt);
            self.outputs.events.extend(track.take_events());
        }
        self.advance_weight_fades(dt);
        self.rebuild_samples();
        &self.outputs
    }

    fn advance_weight_fades(&mut self, dt: f32) {
        for (i, slot) in self.weight_fades.iter_mut().enumerate() {
            let Some(wf) = slot.as_mut() else {
                continue;
            };
            let rate = wf.fade.advance(dt);
            self.weights[i] = lerp(wf.start, wf.target, rate);
            if wf.fade.done() {
                *slot = None;
            }
        }
    }

    fn rebuild_samples(&mut self) {
        for (i, track) in self.tracks.iter().enumerate() {
            let (prev_weight, cur_weight) = track.weights();
            let mut cursors = Vec::with_capacity(2);
            if let Some(prev) = track.previous() {
                cursors.push(CursorSample {
                    clip: prev.clip.clone(),
                    time: prev.elapsed,
                    weight: prev_weight,
                });
            }
            if let Some(cur) = track.current() {
                cursors.push(CursorSample {
                    clip: cur.clip.clone(),
                    time: cur.elapsed,
                    weight: cur_weight,
                });
            }
            self.outputs.samples.push(LayerSample {
                layer: i,
                weight: self.weights[i],
                cursors,
            });
        }
    }

    /// Samples and events from the most recent tick.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    // --- queries (None = empty slot / not found / not initialized) ---

    pub fn current_clip(&self, layer: usize) -> Option<Arc<Clip>> {
        self.tracks.get(layer)?.current().map(|c| c.clip.clone())
    }

    pub fn current_clip_name(&self, layer: usize) -> Option<String> {
        self.current_clip(layer).map(|c| c.name.clone())
    }

    pub fn current_time(&self, layer: usize) -> Option<f32> {
        self.tracks.get(layer)?.current().map(|c| c.elapsed)
    }

    pub fn current_normalized_time(&self, layer: usize) -> Option<f32> {
        self.tracks.get(layer)?.current().map(|c| c.normalized_time())
    }

    /// Slow-path residency lookup: elapsed time of `clip` if it currently
    /// sits on either cursor of the layer (current checked first).
    pub fn clip_time(&self, layer: usize, clip: &Arc<Clip>) -> Option<f32> {
        let track = self.tracks.get(layer)?;
        for cursor in [track.current(), track.previous()].into_iter().flatten() {
            if Clip::same(&cursor.clip, clip) {
                return Some(cursor.elapsed);
            }
        }
        None
    }

    /// True for an idle layer, a finished current clip, or an unknown layer.
    /// A paused layer never becomes finished while paused.
    pub fn is_finished(&self, layer: usize) -> bool {
        self.tracks.get(layer).map_or(true, |t| t.finished())
    }

    pub fn layer_weight(&self, layer: usize) -> Option<f32> {
        self.weights.get(layer).copied()
    }

    pub fn is_paused(&self, layer: usize) -> bool {
        self.tracks.get(layer).map_or(false, |t| t.is_paused())
    }
}
