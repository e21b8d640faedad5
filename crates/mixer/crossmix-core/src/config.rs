//! Compositor configuration.

use serde::{Deserialize, Serialize};

/// How layer weights relate to each other.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LayerPolicy {
    /// Two-layer base/override exclusivity: setting one layer's weight sets
    /// the other to the complement.
    Exclusive,
    /// An exclusion mask distinguishes the layers downstream, so weights are
    /// set independently and both layers may be fully weighted at once.
    Independent,
}

/// Fixed at initialization; the layer count never changes over the
/// compositor's lifetime and layer indices are stable handles.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Config {
    pub layer_count: usize,
    pub layer_policy: LayerPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layer_count: 2,
            layer_policy: LayerPolicy::Exclusive,
        }
    }
}
