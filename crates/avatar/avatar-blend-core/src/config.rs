//! Core configuration for avatar-blend-core.

use serde::{Deserialize, Serialize};

/// Default smoothing rates and fade durations for the controller.
/// Rates are per-tick fractional steps in (0, 1]; fades are seconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Per-tick step for the dedicated viseme bus.
    pub viseme_rate: f32,
    /// Per-tick step for the open-ended generic morph bus.
    pub generic_rate: f32,
    /// Per-tick step for the dedicated manual morph channel.
    pub manual_rate: f32,
    /// Per-tick step for the glow scalar.
    pub glow_rate: f32,

    /// Crossfade duration for base-layer clip changes when a command gives none.
    pub base_fade: f32,
    /// Fade duration for one-shot layer transitions when a command gives none.
    pub one_shot_fade: f32,

    /// Morph target driven by MANUAL_MORPH, resolved against the avatar's
    /// morph dictionary like any other name.
    pub manual_morph_target: String,

    /// Multiplier applied to the smoothed glow scalar before it is emitted
    /// as emissive intensity.
    pub glow_intensity_scale: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viseme_rate: 0.15,
            generic_rate: 0.1,
            manual_rate: 0.1,
            glow_rate: 0.05,
            base_fade: 0.5,
            one_shot_fade: 0.1,
            manual_morph_target: "MouthOpen".to_string(),
            glow_intensity_scale: 2.5,
        }
    }
}
