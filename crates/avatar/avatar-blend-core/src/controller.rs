//! Controller: data ownership and public API with command dispatch +
//! smoothing/layer stepping.
//!
//! Methods:
//! - new, load_clip, play_base, update (apply commands → advance buses →
//!   advance layers → emit outputs)
//!
//! The controller is the only writer of render-visible state: commands only
//! deposit targets, and every tick drains them into influence and weight
//! values regardless of how commands burst or overwrite each other.

use crate::binding::{MorphDictionary, MorphResolver};
use crate::clips::{ClipInfo, ClipLibrary};
use crate::commands::{Command, GlowSwitch, Inputs};
use crate::config::Config;
use crate::ids::{ClipId, IdAllocator};
use crate::layers::{BaseLayer, BlendLayer, OneShotLayer};
use crate::outputs::{ClipPlayback, GlowOutput, HostRequest, MorphWrite, Outputs};
use crate::signal::{GlowBus, ManualMorph, MorphBus, Signal, VisemeBus};

/// Blend controller for one avatar instance.
#[derive(Debug)]
pub struct Controller {
    // Owned data
    cfg: Config,
    ids: IdAllocator,
    clips: ClipLibrary,
    dictionary: MorphDictionary,
    influences: Vec<f32>,

    // Continuous-signal buses
    visemes: VisemeBus,
    generic: MorphBus,
    manual: ManualMorph,
    glow: GlowBus,

    // Animation layers
    base: BaseLayer,
    one_shot: OneShotLayer,

    // Per-tick outputs
    outputs: Outputs,
}

impl Controller {
    /// Create a controller for an avatar whose morph dictionary is already
    /// known. Signals start at zero; no clip is active.
    pub fn new(cfg: Config, dictionary: MorphDictionary) -> Self {
        let influences = vec![0.0; dictionary.len()];
        Self {
            visemes: VisemeBus::new(cfg.viseme_rate),
            generic: MorphBus::new(cfg.generic_rate),
            manual: ManualMorph::new(cfg.manual_rate),
            glow: GlowBus::new(cfg.glow_rate),
            cfg,
            ids: IdAllocator::new(),
            clips: ClipLibrary::default(),
            dictionary,
            influences,
            base: BaseLayer::new(),
            one_shot: OneShotLayer::new(),
            outputs: Outputs::default(),
        }
    }

    /// Register a preloaded clip, returning its ClipId.
    pub fn load_clip(&mut self, info: ClipInfo) -> ClipId {
        let id = self.ids.alloc_clip();
        self.clips.insert(id, info);
        id
    }

    /// Seed the base layer with a named clip at full weight, no fade.
    /// Unknown names are dropped, like any other clip reference.
    pub fn play_base(&mut self, name: &str) {
        match self.clips.id_by_name(name) {
            Some(id) => self.base.play(id),
            None => log::debug!("play_base: unknown clip '{name}', dropped"),
        }
    }

    /// Apply one command to target state. Never touches render output and
    /// never fails: unknown references and malformed payloads are dropped.
    pub fn apply_command(&mut self, cmd: Command) {
        match cmd {
            Command::SetAnimation { animation, fade } => {
                match self.clips.id_by_name(&animation) {
                    Some(id) => {
                        let fade = fade.unwrap_or(self.cfg.base_fade);
                        self.base.crossfade_to(id, fade);
                    }
                    None => log::debug!("SET_ANIMATION: unknown clip '{animation}', dropped"),
                }
            }
            Command::SetMorph { name, fade } => match self.clips.id_by_name(&name) {
                Some(id) => {
                    let fade = fade.unwrap_or(self.cfg.one_shot_fade);
                    self.one_shot.trigger(id, fade);
                }
                None => log::debug!("SET_MORPH: unknown clip '{name}', dropped"),
            },
            Command::SetVisemes { visemes, rate } => {
                self.visemes.set_targets(&visemes, rate);
            }
            Command::SetGenericMorph { name, value, rate } => {
                self.generic.set_target(&name, value, rate);
            }
            Command::ManualMorph { value, rate } => {
                self.manual.set_target(value, rate);
            }
            Command::SetGlow { state, color, rate } => {
                self.glow.set_target(state == GlowSwitch::On, color, rate);
            }
            Command::SetTexture { url } => {
                self.outputs.push_request(HostRequest::SetTexture { url });
            }
            Command::ResetCamera => {
                self.outputs.push_request(HostRequest::ResetCamera);
            }
        }
    }

    /// Step the controller by dt seconds with the commands drained this
    /// tick, producing the frame outputs the renderer consumes.
    pub fn update(&mut self, dt: f32, inputs: Inputs) -> &Outputs {
        self.outputs.clear();

        // 1) Apply queued commands to target state.
        for cmd in inputs.commands {
            self.apply_command(cmd);
        }

        // 2) Advance every bus one smoothing step.
        self.visemes.advance();
        self.generic.advance();
        self.manual.advance();
        self.glow.advance();

        // 3) Commit bus values into the influence array. Later buses win on
        //    index collisions: visemes, then generic, then manual.
        let Self {
            ref cfg,
            ref dictionary,
            ref visemes,
            ref generic,
            ref manual,
            ref mut influences,
            ref mut outputs,
            ..
        } = *self;
        for (name, value) in visemes.entries() {
            write_resolved(dictionary, influences, outputs, name, value);
        }
        for (name, value) in generic.entries() {
            write_resolved(dictionary, influences, outputs, name, value);
        }
        write_resolved(
            dictionary,
            influences,
            outputs,
            &cfg.manual_morph_target,
            manual.signal.current,
        );

        // 4) Resolve the layer state machines and emit clip assignments.
        self.base.advance(dt, &self.clips);
        self.one_shot.advance(dt, &self.clips);
        for c in self.base.occupants() {
            self.outputs.push_clip(ClipPlayback {
                clip: c.id,
                layer: BlendLayer::Base,
                weight: c.weight,
                local_time: c.local_time,
                phase: c.phase,
            });
        }
        for c in self.one_shot.occupants() {
            self.outputs.push_clip(ClipPlayback {
                clip: c.id,
                layer: BlendLayer::OneShot,
                weight: c.weight,
                local_time: c.local_time,
                phase: c.phase,
            });
        }

        // 5) Glow state for the renderer.
        self.outputs.glow = GlowOutput {
            intensity: self.glow.signal.current * self.cfg.glow_intensity_scale,
            color: self.glow.color(),
        };

        &self.outputs
    }

    /// The morph-influence array, exclusively owned and written here;
    /// the renderer reads it after each tick.
    pub fn influences(&self) -> &[f32] {
        &self.influences
    }

    /// Clip currently owning the base layer's incoming slot.
    pub fn current_base_clip(&self) -> Option<ClipId> {
        self.base.current_clip()
    }

    /// Clip currently held by the one-shot layer.
    pub fn current_one_shot(&self) -> Option<ClipId> {
        self.one_shot.current_clip()
    }

    /// Whether the one-shot layer has finished and is holding its pose.
    pub fn one_shot_held(&self) -> bool {
        self.one_shot.is_held(&self.clips)
    }

    pub fn viseme_signal(&self, viseme: crate::commands::Viseme) -> Signal {
        self.visemes.signal(viseme)
    }

    pub fn generic_signal(&self, name: &str) -> Option<Signal> {
        self.generic.signal(name)
    }

    pub fn manual_signal(&self) -> Signal {
        self.manual.signal
    }

    pub fn glow_signal(&self) -> Signal {
        self.glow.signal
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }
}

/// Write one smoothed value through the morph binding. Names with no index
/// on this avatar are inert.
fn write_resolved(
    resolver: &impl MorphResolver,
    influences: &mut [f32],
    outputs: &mut Outputs,
    name: &str,
    value: f32,
) {
    match resolver.resolve(name) {
        Some(index) if index < influences.len() => {
            influences[index] = value;
            outputs.push_morph_write(MorphWrite { index, value });
        }
        _ => log::trace!("morph '{name}' not present on this avatar, skipped"),
    }
}
