//! Error taxonomy for the compositor control surface.
//!
//! Only addressing mistakes surface as errors; expected steady-state cases
//! (request without a clip, query for a non-resident clip, calls before
//! initialization or while frozen) are documented no-ops or `None` results.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompositorError {
    #[error("layer {layer} out of range ({count} layers configured)")]
    LayerOutOfRange { layer: usize, count: usize },
}
