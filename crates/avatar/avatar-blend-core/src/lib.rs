//! Avatar Blend Core (engine-agnostic)
//!
//! Per-frame blend controller for a command-driven animated avatar:
//! base-layer crossfades, additive one-shot clips, and exponential smoothing
//! of viseme / expression / glow signals toward externally supplied targets.
//! Scene setup, asset loading, rendering, and command transport live in the
//! host; this crate turns a queue of commands plus a tick into morph
//! influences and clip weights.

pub mod binding;
pub mod clips;
pub mod commands;
pub mod config;
pub mod controller;
pub mod ids;
pub mod layers;
pub mod outputs;
pub mod signal;

// Re-exports for consumers (adapters)
pub use binding::{MorphDictionary, MorphResolver};
pub use clips::{ClipInfo, ClipLibrary, ClipLoopMode};
pub use commands::{parse_command_json, Command, CommandParseError, GlowSwitch, Inputs, Viseme};
pub use config::Config;
pub use controller::Controller;
pub use ids::ClipId;
pub use layers::{ActiveClip, BaseLayer, BlendLayer, LayerPhase, OneShotLayer};
pub use outputs::{ClipPlayback, GlowOutput, HostRequest, MorphWrite, Outputs};
pub use signal::{rgb_from_hex, GlowBus, ManualMorph, MorphBus, Signal, VisemeBus};
