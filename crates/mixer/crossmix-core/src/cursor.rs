//! Live playback position bound to one clip instance.

use std::sync::Arc;

use crate::clip::{Clip, ClipEvent};

/// A playback cursor: one clip handle plus elapsed time and speed. Owned
/// exclusively by the track that created it and replaced wholesale on
/// transition; the evicted cursor is released at swap time.
#[derive(Clone, Debug)]
pub struct PlaybackCursor {
    pub clip: Arc<Clip>,
    /// Raw elapsed seconds, before normalization.
    pub elapsed: f32,
    /// Request-level speed multiplier; the track's time scale is applied on
    /// top at advance time.
    pub speed: f32,
    /// Index of the next unfired marker in `clip.events`. Consumed
    /// front-to-back and never rewound for the lifetime of the cursor.
    next_event: usize,
}

impl PlaybackCursor {
    pub fn new(clip: Arc<Clip>, speed: f32) -> Self {
        Self {
            clip,
            elapsed: 0.0,
            speed,
            next_event: 0,
        }
    }

    pub fn normalized_time(&self) -> f32 {
        if self.clip.duration <= 0.0 {
            0.0
        } else {
            self.elapsed / self.clip.duration
        }
    }

    /// Strictly past the last sample; a cursor sitting exactly at `duration`
    /// is not finished.
    pub fn finished(&self) -> bool {
        self.elapsed > self.clip.duration
    }

    pub fn advance(&mut self, dt: f32, time_scale: f32) {
        self.elapsed += dt * self.speed * time_scale;
    }

    /// Fire every marker whose timestamp has been reached, front-to-back,
    /// each at most once per cursor lifetime.
    pub fn fire_due<F: FnMut(&ClipEvent)>(&mut self, mut f: F) {
        while let Some(ev) = self.clip.events.get(self.next_event) {
            if ev.time > self.elapsed {
                break;
            }
            f(ev);
            self.next_event += 1;
        }
    }

    /// Discard markers that have not fired yet (transition teardown).
    pub fn clear_events(&mut self) {
        self.next_event = self.clip.events.len();
    }

    /// Rewind for a loop cycle: time back to zero, full marker set restored.
    pub fn rewind(&mut self) {
        self.elapsed = 0.0;
        self.next_event = 0;
    }

    /// Reposition without firing. Markers at or before the new time are
    /// skipped, and consumption stays monotonic, so a scrub never re-fires a
    /// marker this cursor already passed.
    pub fn seek(&mut self, elapsed: f32) {
        self.elapsed = elapsed;
        let due = self
            .clip
            .events
            .iter()
            .position(|e| e.time > elapsed)
            .unwrap_or(self.clip.events.len());
        self.next_event = self.next_event.max(due);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked_clip() -> Arc<Clip> {
        Clip::new(
            "c",
            2.0,
            false,
            vec![ClipEvent::new(0.5, "a"), ClipEvent::new(1.5, "b")],
        )
    }

    /// it should not be finished at exactly the clip duration
    #[test]
    fn finished_is_strict() {
        let mut cursor = PlaybackCursor::new(marked_clip(), 1.0);
        cursor.elapsed = 2.0;
        assert!(!cursor.finished());
        cursor.elapsed = 2.0 + 1e-4;
        assert!(cursor.finished());
    }

    /// it should fire each marker once, in order, as time passes
    #[test]
    fn markers_fire_once_in_order() {
        let mut cursor = PlaybackCursor::new(marked_clip(), 1.0);
        let mut fired = Vec::new();
        cursor.advance(0.6, 1.0);
        cursor.fire_due(|e| fired.push(e.name.clone()));
        cursor.fire_due(|e| fired.push(e.name.clone()));
        cursor.advance(1.0, 1.0);
        cursor.fire_due(|e| fired.push(e.name.clone()));
        assert_eq!(fired, vec!["a", "b"]);
    }

    /// it should skip passed markers on seek without ever rewinding consumption
    #[test]
    fn seek_never_refires() {
        let mut cursor = PlaybackCursor::new(marked_clip(), 1.0);
        cursor.advance(0.6, 1.0);
        let mut fired = Vec::new();
        cursor.fire_due(|e| fired.push(e.name.clone()));
        assert_eq!(fired, vec!["a"]);

        cursor.seek(0.1);
        cursor.advance(0.8, 1.0);
        cursor.fire_due(|e| fired.push(e.name.clone()));
        assert_eq!(fired, vec!["a"], "marker must not re-fire after a rewind scrub");

        cursor.seek(1.8);
        cursor.fire_due(|e| fired.push(e.name.clone()));
        assert_eq!(fired, vec!["a"], "scrubbed-over marker is skipped, not fired");
    }
}
