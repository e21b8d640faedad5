//! Immutable clip resources read by the mixer.
//!
//! A `Clip` is supplied by the host's clip provider and never mutated or
//! persisted by the core; tracks only read its duration, loop default, and
//! marker list. Clips are shared by handle (`Arc`), and identity checks for
//! cancel/residency queries compare handles, not contents.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A timed marker on a clip. Payloads are opaque to the core and handed to
/// the host's event sink verbatim.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClipEvent {
    /// Seconds from clip start.
    pub time: f32,
    pub name: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ClipEvent {
    pub fn new(time: f32, name: &str) -> Self {
        Self {
            time,
            name: name.to_string(),
            payload: serde_json::Value::Null,
        }
    }
}

/// Immutable animation resource: a duration, a loop default, and an ordered
/// marker list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Clip {
    pub name: String,
    /// Seconds. A clip is finished strictly after `duration`, never at it.
    pub duration: f32,
    #[serde(default)]
    pub looped: bool,
    #[serde(default)]
    pub events: Vec<ClipEvent>,
}

impl Clip {
    /// Build a shared clip. Markers are stable-sorted by time so ties keep
    /// their declaration order.
    pub fn new(name: &str, duration: f32, looped: bool, mut events: Vec<ClipEvent>) -> Arc<Self> {
        events.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));
        Arc::new(Self {
            name: name.to_string(),
            duration,
            looped,
            events,
        })
    }

    /// Handle identity, used for `cancel_if_same_clip` and residency lookups.
    pub fn same(a: &Arc<Clip>, b: &Arc<Clip>) -> bool {
        Arc::ptr_eq(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// it should stable-sort markers by time, keeping declaration order on ties
    #[test]
    fn events_sorted_stably() {
        let clip = Clip::new(
            "c",
            1.0,
            false,
            vec![
                ClipEvent::new(0.5, "b"),
                ClipEvent::new(0.2, "a"),
                ClipEvent::new(0.5, "c"),
            ],
        );
        let names: Vec<&str> = clip.events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    /// it should compare clips by handle, not by value
    #[test]
    fn identity_is_by_handle() {
        let a = Clip::new("same", 1.0, false, vec![]);
        let b = Clip::new("same", 1.0, false, vec![]);
        assert!(Clip::same(&a, &a.clone()));
        assert!(!Clip::same(&a, &b));
    }
}
