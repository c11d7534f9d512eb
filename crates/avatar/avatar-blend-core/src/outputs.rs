//! Output contracts from the controller.
//!
//! Outputs carry the per-tick render state: active clip weights per layer,
//! the morph-influence writes that resolved this tick, the glow values, and
//! requests delegated to external collaborators. The host applies clips and
//! influences onto its skeletal pose and materials after each tick.

use serde::{Deserialize, Serialize};

use crate::ids::ClipId;
use crate::layers::{BlendLayer, LayerPhase};

/// One active clip assignment for the renderer this tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClipPlayback {
    pub clip: ClipId,
    pub layer: BlendLayer,
    pub weight: f32,
    pub local_time: f32,
    pub phase: LayerPhase,
}

/// One morph-influence write that resolved against the loaded avatar.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MorphWrite {
    pub index: usize,
    pub value: f32,
}

/// Emissive glow state for the renderer. Intensity is the smoothed scalar
/// pre-scaled by the configured emissive multiplier; color is unsmoothed.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct GlowOutput {
    pub intensity: f32,
    pub color: [f32; 3],
}

/// Commands delegated to collaborators outside the blend core.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub enum HostRequest {
    /// Asset layer: swap the body texture.
    SetTexture { url: String },
    /// Camera collaborator: restore the default view.
    ResetCamera,
}

/// Outputs returned by Controller::update().
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub clips: Vec<ClipPlayback>,
    #[serde(default)]
    pub morph_writes: Vec<MorphWrite>,
    #[serde(default)]
    pub glow: GlowOutput,
    #[serde(default)]
    pub requests: Vec<HostRequest>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.clips.clear();
        self.morph_writes.clear();
        self.requests.clear();
    }

    #[inline]
    pub fn push_clip(&mut self, playback: ClipPlayback) {
        self.clips.push(playback);
    }

    #[inline]
    pub fn push_morph_write(&mut self, write: MorphWrite) {
        self.morph_writes.push(write);
    }

    #[inline]
    pub fn push_request(&mut self, request: HostRequest) {
        self.requests.push(request);
    }
}
