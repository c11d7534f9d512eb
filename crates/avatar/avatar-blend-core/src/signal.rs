//! Continuous-signal smoothing: per-bus exponential drift toward targets.
//!
//! Every signal advances `current += (target - current) * rate` once per
//! tick, a first-order low-pass. Buses own their rate; a command's rate
//! override is sticky until the next override. Convergence is monotonic and
//! never overshoots for rate in (0, 1].

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::commands::Viseme;

/// One smoothed scalar: the render value and the last requested target.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Signal {
    pub current: f32,
    pub target: f32,
}

impl Signal {
    #[inline]
    pub fn step(&mut self, rate: f32) {
        self.current += (self.target - self.current) * rate;
    }
}

/// Clamp a requested rate override into the stable range.
#[inline]
fn clamp_rate(rate: f32) -> f32 {
    rate.clamp(1e-4, 1.0)
}

/// Dedicated lip-sync bus: one signal per viseme, merged partial updates.
#[derive(Clone, Debug)]
pub struct VisemeBus {
    signals: [Signal; 6],
    rate: f32,
}

impl VisemeBus {
    pub fn new(rate: f32) -> Self {
        Self {
            signals: [Signal::default(); 6],
            rate,
        }
    }

    /// Merge supplied targets; visemes absent from the map keep their prior
    /// target. A rate override applies to the whole bus and sticks.
    pub fn set_targets(&mut self, targets: &HashMap<Viseme, f32>, rate: Option<f32>) {
        if let Some(r) = rate {
            self.rate = clamp_rate(r);
        }
        for (viseme, value) in targets {
            self.signals[viseme.index()].target = *value;
        }
    }

    pub fn advance(&mut self) {
        for s in &mut self.signals {
            s.step(self.rate);
        }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn signal(&self, viseme: Viseme) -> Signal {
        self.signals[viseme.index()]
    }

    /// Current render values, keyed by morph target name.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        Viseme::ALL
            .iter()
            .map(|v| (v.name(), self.signals[v.index()].current))
    }
}

/// Open-ended expression bus, keyed by arbitrary names supplied at runtime.
/// Entries are created on first reference with current = 0, no declaration
/// required.
#[derive(Clone, Debug)]
pub struct MorphBus {
    signals: HashMap<String, Signal>,
    rate: f32,
}

impl MorphBus {
    pub fn new(rate: f32) -> Self {
        Self {
            signals: HashMap::new(),
            rate,
        }
    }

    pub fn set_target(&mut self, name: &str, value: f32, rate: Option<f32>) {
        if let Some(r) = rate {
            self.rate = clamp_rate(r);
        }
        self.signals
            .entry_ref(name)
            .or_insert_with(Signal::default)
            .target = value;
    }

    pub fn advance(&mut self) {
        for s in self.signals.values_mut() {
            s.step(self.rate);
        }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn signal(&self, name: &str) -> Option<Signal> {
        self.signals.get(name).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, f32)> {
        self.signals.iter().map(|(n, s)| (n.as_str(), s.current))
    }
}

/// Dedicated manual morph channel: one signal bound to a configured target
/// name, bypassing the named buses.
#[derive(Clone, Debug)]
pub struct ManualMorph {
    pub signal: Signal,
    rate: f32,
}

impl ManualMorph {
    pub fn new(rate: f32) -> Self {
        Self {
            signal: Signal::default(),
            rate,
        }
    }

    pub fn set_target(&mut self, value: f32, rate: Option<f32>) {
        if let Some(r) = rate {
            self.rate = clamp_rate(r);
        }
        self.signal.target = value;
    }

    pub fn advance(&mut self) {
        self.signal.step(self.rate);
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }
}

/// Emissive glow: a smoothed on/off scalar plus an unsmoothed color that
/// applies on the next tick once set.
#[derive(Clone, Debug)]
pub struct GlowBus {
    pub signal: Signal,
    rate: f32,
    color: [f32; 3],
}

impl GlowBus {
    pub fn new(rate: f32) -> Self {
        Self {
            signal: Signal::default(),
            rate,
            color: [1.0, 1.0, 1.0],
        }
    }

    pub fn set_target(&mut self, on: bool, color: Option<u32>, rate: Option<f32>) {
        if let Some(r) = rate {
            self.rate = clamp_rate(r);
        }
        if let Some(hex) = color {
            self.color = rgb_from_hex(hex);
        }
        self.signal.target = if on { 1.0 } else { 0.0 };
    }

    pub fn advance(&mut self) {
        self.signal.step(self.rate);
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }
}

/// Unpack a wire-format 0xRRGGBB color into linear [0,1] components.
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    [r, g, b]
}
