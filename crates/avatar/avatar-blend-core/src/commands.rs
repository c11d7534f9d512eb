//! Inbound command contracts for the controller.
//!
//! Commands arrive from any push-based transport as JSON messages tagged by a
//! `kind` discriminator; the host drains its queue into an Inputs batch and
//! passes it to Controller::update() each tick. Field names and aliases match
//! the original wire shape, so a host can forward messages verbatim.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed viseme set of the lip-sync bus.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Viseme {
    A,
    E,
    I,
    O,
    U,
    #[serde(rename = "BASE")]
    Base,
}

impl Viseme {
    pub const ALL: [Viseme; 6] = [
        Viseme::A,
        Viseme::E,
        Viseme::I,
        Viseme::O,
        Viseme::U,
        Viseme::Base,
    ];

    /// Stable index into the viseme bus arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Viseme::A => 0,
            Viseme::E => 1,
            Viseme::I => 2,
            Viseme::O => 3,
            Viseme::U => 4,
            Viseme::Base => 5,
        }
    }

    /// Morph target name this viseme resolves against.
    pub fn name(self) -> &'static str {
        match self {
            Viseme::A => "A",
            Viseme::E => "E",
            Viseme::I => "I",
            Viseme::O => "O",
            Viseme::U => "U",
            Viseme::Base => "BASE",
        }
    }
}

/// Glow on/off request, `"ON"` / `"OFF"` on the wire.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GlowSwitch {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

/// One structured command. Fire-and-forget: commands only deposit targets,
/// never touch render-visible state directly.
///
/// The original transport carries both clip-fade seconds and bus step sizes
/// in a single `rate` field; the typed enum separates them (`fade` for clip
/// layers, `rate` for buses) while the serde aliases keep the wire shape
/// parseable as-is.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum Command {
    /// Crossfade the base layer to a named clip. No-op if already current.
    #[serde(rename = "SET_ANIMATION")]
    SetAnimation {
        animation: String,
        #[serde(default, alias = "rate")]
        fade: Option<f32>,
    },
    /// Play a named clip once on the additive layer, preempting any occupant.
    #[serde(rename = "SET_MORPH")]
    SetMorph {
        name: String,
        #[serde(default, alias = "rate")]
        fade: Option<f32>,
    },
    /// Merge targets into the viseme bus; unspecified visemes keep theirs.
    #[serde(rename = "SET_VISEMES")]
    SetVisemes {
        #[serde(default)]
        visemes: HashMap<Viseme, f32>,
        #[serde(default)]
        rate: Option<f32>,
    },
    /// Set the target of one named entry on the generic morph bus.
    #[serde(rename = "SET_GENERIC_MORPH")]
    SetGenericMorph {
        #[serde(rename = "morphName")]
        name: String,
        value: f32,
        #[serde(default)]
        rate: Option<f32>,
    },
    /// Direct target override of the dedicated manual morph channel.
    #[serde(rename = "MANUAL_MORPH")]
    ManualMorph {
        value: f32,
        #[serde(default)]
        rate: Option<f32>,
    },
    /// Drive the glow scalar to 1 (on) or 0 (off); color applies unsmoothed.
    #[serde(rename = "SET_GLOW")]
    SetGlow {
        state: GlowSwitch,
        /// Packed 0xRRGGBB, as sent by the original transport.
        #[serde(default)]
        color: Option<u32>,
        #[serde(default)]
        rate: Option<f32>,
    },
    /// Delegated to the host's asset layer; no blend-state effect.
    #[serde(rename = "SET_TEXTURE")]
    SetTexture { url: String },
    /// Delegated to the host's camera collaborator; no blend-state effect.
    #[serde(rename = "RESET_CAMERA")]
    ResetCamera,
}

/// Commands drained from the inbound queue for one tick, applied in order
/// before stepping.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Inputs {
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Inputs {
    pub fn one(cmd: Command) -> Self {
        Self {
            commands: vec![cmd],
        }
    }
}

/// Errors produced while decoding an inbound wire message.
#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("command json parse error: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decode one wire message into a Command.
///
/// Unknown kinds and missing required fields surface here as errors so the
/// host can log-and-drop; nothing downstream of the queue ever fails on
/// command content.
pub fn parse_command_json(s: &str) -> Result<Command, CommandParseError> {
    Ok(serde_json::from_str(s)?)
}
