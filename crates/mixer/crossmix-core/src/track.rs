//! Per-layer playback and crossfade state machine.
//!
//! A track owns at most two cursors (previous/current), a FIFO of deferred
//! requests, and at most one active crossfade. States: Idle → Playing →
//! Transitioning → Playing; Idle is reachable again through
//! auto-destroy-on-complete with an empty queue.
//!
//! Per tick, `advance` runs in a fixed order: crossfade weight, cursor time,
//! marker firing (outgoing cursor before current), completion handling. The
//! compositor drains the track's event buffer right after each advance, so a
//! marker scheduled at or past the clip's nominal end is delivered on the
//! same tick the clip retires.

use std::collections::VecDeque;

use crate::clip::{Clip, ClipEvent};
use crate::cursor::PlaybackCursor;
use crate::fade::{clamp01, Fade};
use crate::outputs::MixEvent;
use crate::request::PlayRequest;

#[derive(Debug)]
pub struct ClipTrack {
    layer: usize,
    previous: Option<PlaybackCursor>,
    current: Option<PlaybackCursor>,
    pending: VecDeque<PlayRequest>,
    /// The active clip crossfade; `None` outside transitions.
    fade: Option<Fade>,
    paused: bool,
    time_scale: f32,
    auto_destroy: bool,
    /// Latch so hold-pose completion is reported once, not every tick.
    completion_handled: bool,
    /// Events accumulated since the last drain (requests may land between
    /// ticks; their events are delivered on the next tick).
    events: Vec<MixEvent>,
}

impl ClipTrack {
    pub fn new(layer: usize) -> Self {
        Self {
            layer,
            previous: None,
            current: None,
            pending: VecDeque::new(),
            fade: None,
            paused: false,
            time_scale: 1.0,
            auto_destroy: false,
            completion_handled: false,
            events: Vec::new(),
        }
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn current(&self) -> Option<&PlaybackCursor> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&PlaybackCursor> {
        self.previous.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Takes effect on the next tick, never retroactively.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
    }

    /// An idle track (no current cursor) counts as finished, so a queued-style
    /// play on an empty layer starts immediately.
    pub fn finished(&self) -> bool {
        self.current.as_ref().map_or(true, |c| c.finished())
    }

    /// Crossfade weights as `(previous, current)`; they sum to 1 throughout a
    /// transition and read `(0, 1)` outside one.
    pub fn weights(&self) -> (f32, f32) {
        match &self.fade {
            Some(fade) => {
                let rate = fade.rate();
                (1.0 - rate, rate)
            }
            None => (0.0, 1.0),
        }
    }

    /// Freeze time on the track without disturbing any state, including an
    /// in-flight crossfade.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Submit a play request. Dropped while paused; deferred to the FIFO queue
    /// when the current clip is still running and the request is not an
    /// override.
    pub fn request(&mut self, req: PlayRequest) {
        if self.paused {
            return;
        }
        let Some(clip) = req.clip.as_ref() else {
            return;
        };
        if req.cancel_if_same_clip {
            if let Some(cur) = &self.current {
                if Clip::same(&cur.clip, clip) {
                    return;
                }
            }
        }
        if req.is_override || self.finished() {
            if req.is_override {
                self.pending.clear();
            }
            self.begin_transition(req);
        } else {
            self.pending.push_back(req);
        }
    }

    /// Swap cursors and start a fresh crossfade. Any in-flight fade is
    /// cancelled outright; the old previous cursor is released here, at swap
    /// time. The outgoing current cursor keeps only its unfired markers.
    fn begin_transition(&mut self, req: PlayRequest) {
        let Some(clip) = req.clip else {
            return;
        };
        self.fade = None;
        self.previous = self.current.take();
        self.current = Some(PlaybackCursor::new(clip.clone(), req.speed));
        self.auto_destroy = req.auto_destroy;
        self.completion_handled = false;
        log::debug!(
            "layer {}: start '{}' (fade {}s)",
            self.layer,
            clip.name,
            req.fade_duration
        );
        self.events.push(MixEvent::PlaybackStarted {
            layer: self.layer,
            clip: clip.name.clone(),
        });
        if req.fade_duration > 0.0 {
            self.fade = Some(Fade::new(req.fade_duration));
        } else {
            // Instantaneous switch: the outgoing cursor is released at once.
            self.previous = None;
        }
    }

    /// One frame of track time. No-op while paused.
    pub fn advance(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        let scaled = dt * self.time_scale;

        // 1) Crossfade weight. On completion the weights snap to (0, 1) and
        //    the outgoing cursor's unfired markers are discarded, not flushed.
        let fade_done = self
            .fade
            .as_mut()
            .map_or(false, |fade| fade.advance(scaled) >= 1.0);
        if fade_done {
            self.fade = None;
            self.previous = None;
        }

        // 2) Cursor time.
        if let Some(prev) = &mut self.previous {
            prev.advance(dt, self.time_scale);
        }
        if let Some(cur) = &mut self.current {
            cur.advance(dt, self.time_scale);
        }

        // 3) Markers, outgoing cursor before current.
        let layer = self.layer;
        if let Some(prev) = &mut self.previous {
            let clip_name = prev.clip.name.clone();
            let events = &mut self.events;
            prev.fire_due(|ev| events.push(marker(layer, &clip_name, ev)));
        }
        if let Some(cur) = &mut self.current {
            let clip_name = cur.clip.name.clone();
            let events = &mut self.events;
            cur.fire_due(|ev| events.push(marker(layer, &clip_name, ev)));
        }

        // 4) Completion.
        if self.current.as_ref().map_or(false, |c| c.finished()) {
            self.handle_completion();
        }
    }

    /// Completion policy: drain the queue first; otherwise loop, auto-destroy,
    /// or hold the last pose until a new request arrives.
    fn handle_completion(&mut self) {
        if let Some(req) = self.pending.pop_front() {
            // The dequeued request's own fade duration applies, regardless of
            // how the current clip ended.
            self.begin_transition(req);
            return;
        }
        let Some(cur) = &mut self.current else {
            return;
        };
        if cur.clip.looped {
            self.events.push(MixEvent::ClipLooped {
                layer: self.layer,
                clip: cur.clip.name.clone(),
            });
            cur.rewind();
            self.completion_handled = false;
            return;
        }
        if self.completion_handled {
            return;
        }
        self.completion_handled = true;
        self.events.push(MixEvent::ClipCompleted {
            layer: self.layer,
            clip: cur.clip.name.clone(),
            time: cur.elapsed,
        });
        if self.auto_destroy {
            log::debug!("layer {}: auto-destroy after '{}'", self.layer, cur.clip.name);
            self.previous = None;
            self.current = None;
            self.fade = None;
            self.events.push(MixEvent::TrackCleared { layer: self.layer });
        }
        // Otherwise the finished pose holds indefinitely; no further markers.
    }

    /// Debug scrub: reposition the current cursor by normalized time,
    /// optionally stopping it. Passed markers are skipped, never re-fired.
    pub fn set_normalized_time(&mut self, normalized: f32, stop: bool) {
        let Some(cur) = &mut self.current else {
            return;
        };
        let t = clamp01(normalized);
        if stop {
            cur.speed = 0.0;
        }
        let target = cur.clip.duration * t;
        cur.seek(target);
        self.completion_handled = false;
    }

    /// Drain events accumulated since the last tick.
    pub fn take_events(&mut self) -> Vec<MixEvent> {
        std::mem::take(&mut self.events)
    }
}

fn marker(layer: usize, clip: &str, ev: &ClipEvent) -> MixEvent {
    MixEvent::Marker {
        layer,
        clip: clip.to_string(),
        name: ev.name.clone(),
        time: ev.time,
        payload: ev.payload.clone(),
    }
}
