//! Clip metadata and the clip library.
//!
//! Clips are preloaded by the host (asset loading is out of scope); the
//! controller only needs durations and loop modes to drive weights and
//! local time. Registration happens once at init via Controller::load_clip.

use serde::{Deserialize, Serialize};

use crate::ids::ClipId;

/// How a clip behaves when local time reaches its duration.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum ClipLoopMode {
    /// Wrap around and keep playing (base-layer clips).
    Repeat,
    /// Play once and clamp at the final frame (one-shot clips).
    Once,
}

/// Metadata for one preloaded animation clip.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClipInfo {
    pub name: String,
    /// Duration in seconds. A non-positive duration pins local time at 0.
    pub duration: f32,
    pub loop_mode: ClipLoopMode,
}

/// Minimal clip library storage.
#[derive(Default, Debug)]
pub struct ClipLibrary {
    items: Vec<(ClipId, ClipInfo)>,
}

impl ClipLibrary {
    pub fn insert(&mut self, id: ClipId, info: ClipInfo) {
        self.items.push((id, info));
    }

    pub fn get(&self, id: ClipId) -> Option<&ClipInfo> {
        self.items
            .iter()
            .find_map(|(c, i)| if *c == id { Some(i) } else { None })
    }

    /// Look up a clip by its asset name. Absent names are a valid
    /// cross-avatar case, not an error.
    pub fn id_by_name(&self, name: &str) -> Option<ClipId> {
        self.items
            .iter()
            .find_map(|(c, i)| if i.name == name { Some(*c) } else { None })
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ClipId, ClipInfo)> {
        self.items.iter()
    }
}
