//! Crossmix core (engine-agnostic)
//!
//! Layered clip playback: each layer runs a per-track crossfade state machine
//! (previous/current cursor pair, pending-request queue, active fade), and a
//! compositor blends the layers with independently controllable weights. The
//! host drives [`LayerCompositor::tick`] exactly once per frame; everything is
//! single-threaded and synchronous. Pose evaluation is strictly downstream:
//! the compositor only publishes weighted playback cursors per layer.

pub mod clip;
pub mod compositor;
pub mod config;
pub mod cursor;
pub mod error;
pub mod fade;
pub mod outputs;
pub mod request;
pub mod track;

// Re-exports for consumers (adapters)
pub use clip::{Clip, ClipEvent};
pub use compositor::LayerCompositor;
pub use config::{Config, LayerPolicy};
pub use cursor::PlaybackCursor;
pub use error::CompositorError;
pub use fade::Fade;
pub use outputs::{CursorSample, LayerSample, MixEvent, Outputs};
pub use request::PlayRequest;
pub use track::ClipTrack;
