//! Animation-layer state machine: base crossfades and additive one-shots.
//!
//! Each layer occupant is an explicit little state machine
//! (Idle → FadingIn → Steady → FadingOut → Idle) rather than boolean flags,
//! so preemption and clamp-on-finish are independently testable. Weight
//! ramps are linear over the fade duration, matching the renderer's
//! crossfade primitive.

use serde::{Deserialize, Serialize};

use crate::clips::{ClipLibrary, ClipLoopMode};
use crate::ids::ClipId;

/// Which layer a playback row belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum BlendLayer {
    Base,
    OneShot,
}

/// Occupant lifecycle within a layer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum LayerPhase {
    Idle,
    FadingIn,
    Steady,
    FadingOut,
}

/// One clip occupying a layer slot, with its blend weight and local time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActiveClip {
    pub id: ClipId,
    pub weight: f32,
    pub local_time: f32,
    pub phase: LayerPhase,
    /// Fade duration in seconds for the in-flight ramp.
    pub fade: f32,
}

impl ActiveClip {
    fn fading_in(id: ClipId, fade: f32) -> Self {
        Self {
            id,
            weight: 0.0,
            local_time: 0.0,
            phase: LayerPhase::FadingIn,
            fade,
        }
    }

    fn steady(id: ClipId) -> Self {
        Self {
            id,
            weight: 1.0,
            local_time: 0.0,
            phase: LayerPhase::Steady,
            fade: 0.0,
        }
    }

    fn begin_fade_out(&mut self, fade: f32) {
        self.phase = LayerPhase::FadingOut;
        self.fade = fade;
    }

    /// Resume fading in from the current weight. Used when a clip still in
    /// the outgoing set is re-requested; the layer owns one occupant per
    /// clip, so the fading-out instance is reclaimed rather than duplicated.
    fn resume_fade_in(&mut self, fade: f32) {
        self.fade = fade;
        if self.weight >= 1.0 {
            self.phase = LayerPhase::Steady;
        } else {
            self.phase = LayerPhase::FadingIn;
        }
    }

    /// Advance weight ramp and local time by dt. A non-positive fade snaps
    /// the ramp to its terminal value.
    fn advance(&mut self, dt: f32, clips: &ClipLibrary) {
        match self.phase {
            LayerPhase::FadingIn => {
                self.weight += ramp_step(dt, self.fade);
                if self.weight >= 1.0 {
                    self.weight = 1.0;
                    self.phase = LayerPhase::Steady;
                }
            }
            LayerPhase::FadingOut => {
                self.weight -= ramp_step(dt, self.fade);
                if self.weight <= 0.0 {
                    self.weight = 0.0;
                    self.phase = LayerPhase::Idle;
                }
            }
            LayerPhase::Steady | LayerPhase::Idle => {}
        }

        if let Some(info) = clips.get(self.id) {
            if info.duration <= 0.0 {
                self.local_time = 0.0;
                return;
            }
            let t = self.local_time + dt;
            self.local_time = match info.loop_mode {
                ClipLoopMode::Repeat => t % info.duration,
                // Play-once clips clamp at the final frame and hold.
                ClipLoopMode::Once => t.min(info.duration),
            };
        }
    }

    /// A play-once clip that has reached its final frame.
    fn finished(&self, clips: &ClipLibrary) -> bool {
        clips
            .get(self.id)
            .map(|i| i.loop_mode == ClipLoopMode::Once && self.local_time >= i.duration)
            .unwrap_or(false)
    }
}

/// Take the occupant for `id` out of the outgoing set and resume its fade-in,
/// or start a fresh occupant from weight zero if none is fading out.
fn reclaim_or_start(outgoing: &mut Vec<ActiveClip>, id: ClipId, fade: f32) -> ActiveClip {
    if let Some(pos) = outgoing.iter().position(|c| c.id == id) {
        let mut clip = outgoing.swap_remove(pos);
        clip.resume_fade_in(fade);
        clip
    } else {
        ActiveClip::fading_in(id, fade)
    }
}

#[inline]
fn ramp_step(dt: f32, fade: f32) -> f32 {
    if fade > 0.0 {
        dt / fade
    } else {
        // Snap.
        1.0
    }
}

/// Base layer: at most one incoming clip, mutually exclusive, crossfaded.
/// Preempted occupants keep fading to zero and are dropped once Idle.
#[derive(Debug, Default)]
pub struct BaseLayer {
    incoming: Option<ActiveClip>,
    outgoing: Vec<ActiveClip>,
}

impl BaseLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clip currently owning the incoming slot (steady or fading in).
    pub fn current_clip(&self) -> Option<ClipId> {
        self.incoming.as_ref().map(|c| c.id)
    }

    /// Seed the layer with a clip at full weight, no fade. Used for the
    /// initial idle pose at startup.
    pub fn play(&mut self, id: ClipId) {
        self.incoming = Some(ActiveClip::steady(id));
    }

    /// Begin a crossfade to `id`. Idempotent: requesting the clip that
    /// already owns the incoming slot changes nothing, even mid-fade.
    /// Otherwise the occupant moves to the outgoing set with this fade
    /// duration (an in-flight crossfade is preempted, its old fade-out
    /// target abandoned) and `id` starts fading in. A clip still fading out
    /// is reclaimed and resumes from its current weight; a layer never holds
    /// two occupants for one clip.
    pub fn crossfade_to(&mut self, id: ClipId, fade: f32) {
        if self.current_clip() == Some(id) {
            return;
        }
        if let Some(mut cur) = self.incoming.take() {
            cur.begin_fade_out(fade);
            self.outgoing.push(cur);
        }
        self.incoming = Some(reclaim_or_start(&mut self.outgoing, id, fade));
    }

    pub fn advance(&mut self, dt: f32, clips: &ClipLibrary) {
        if let Some(c) = self.incoming.as_mut() {
            c.advance(dt, clips);
        }
        for c in &mut self.outgoing {
            c.advance(dt, clips);
        }
        // Fully faded clips are no longer advanced.
        self.outgoing.retain(|c| c.phase != LayerPhase::Idle);
    }

    pub fn occupants(&self) -> impl Iterator<Item = &ActiveClip> {
        self.incoming.iter().chain(self.outgoing.iter())
    }
}

/// Additive layer: one-shot clips that always preempt, play to completion
/// once, then freeze at the final frame until superseded.
#[derive(Debug, Default)]
pub struct OneShotLayer {
    active: Option<ActiveClip>,
    outgoing: Vec<ActiveClip>,
}

impl OneShotLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_clip(&self) -> Option<ClipId> {
        self.active.as_ref().map(|c| c.id)
    }

    /// Start a one-shot. Any occupant, even one already held at its final
    /// frame, is forced to FadingOut; the new clip fades in. Re-triggering a
    /// clip that is still fading out reclaims that instance (resuming its
    /// weight, restarting its local time) rather than duplicating it.
    pub fn trigger(&mut self, id: ClipId, fade: f32) {
        if let Some(mut cur) = self.active.take() {
            cur.begin_fade_out(fade);
            self.outgoing.push(cur);
        }
        let mut next = reclaim_or_start(&mut self.outgoing, id, fade);
        // One-shots replay from the start.
        next.local_time = 0.0;
        self.active = Some(next);
    }

    pub fn advance(&mut self, dt: f32, clips: &ClipLibrary) {
        if let Some(c) = self.active.as_mut() {
            c.advance(dt, clips);
        }
        for c in &mut self.outgoing {
            c.advance(dt, clips);
        }
        self.outgoing.retain(|c| c.phase != LayerPhase::Idle);
    }

    /// Whether the held one-shot has reached (and clamped at) its end.
    pub fn is_held(&self, clips: &ClipLibrary) -> bool {
        self.active
            .as_ref()
            .map(|c| c.finished(clips))
            .unwrap_or(false)
    }

    pub fn occupants(&self) -> impl Iterator<Item = &ActiveClip> {
        self.active.iter().chain(self.outgoing.iter())
    }
}
