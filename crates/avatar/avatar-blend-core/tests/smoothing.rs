use avatar_blend_core::{
    Command, Config, Controller, GlowSwitch, Inputs, MorphDictionary, Viseme,
};
use hashbrown::HashMap;

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn avatar_dictionary() -> MorphDictionary {
    MorphDictionary::from_names(["A", "E", "I", "O", "U", "BASE", "MouthOpen", "Smile"])
}

fn mk_controller() -> Controller {
    Controller::new(Config::default(), avatar_dictionary())
}

fn tick(ctrl: &mut Controller) {
    ctrl.update(1.0 / 60.0, Inputs::default());
}

fn visemes(pairs: &[(Viseme, f32)]) -> HashMap<Viseme, f32> {
    pairs.iter().copied().collect()
}

/// it should converge geometrically: |current_N - target| = |current_0 - target| * (1 - rate)^N
#[test]
fn viseme_signal_converges_geometrically() {
    let mut ctrl = mk_controller();
    ctrl.update(
        1.0 / 60.0,
        Inputs::one(Command::SetVisemes {
            visemes: visemes(&[(Viseme::A, 1.0)]),
            rate: Some(0.2),
        }),
    );
    for _ in 0..19 {
        tick(&mut ctrl);
    }
    // 20 smoothing steps at rate 0.2 from 0 toward 1.
    let expected_gap = 0.8f32.powi(20);
    let s = ctrl.viseme_signal(Viseme::A);
    approx(1.0 - s.current, expected_gap, 1e-4);
    approx(s.current, 0.988, 1e-3);
}

/// it should merge partial viseme updates without disturbing other targets
#[test]
fn partial_viseme_update_keeps_prior_targets() {
    let mut ctrl = mk_controller();
    ctrl.update(
        1.0 / 60.0,
        Inputs::one(Command::SetVisemes {
            visemes: visemes(&[(Viseme::E, 0.4), (Viseme::Base, 0.6)]),
            rate: None,
        }),
    );
    ctrl.update(
        1.0 / 60.0,
        Inputs::one(Command::SetVisemes {
            visemes: visemes(&[(Viseme::A, 0.8)]),
            rate: None,
        }),
    );
    approx(ctrl.viseme_signal(Viseme::A).target, 0.8, 1e-6);
    approx(ctrl.viseme_signal(Viseme::E).target, 0.4, 1e-6);
    approx(ctrl.viseme_signal(Viseme::Base).target, 0.6, 1e-6);
    approx(ctrl.viseme_signal(Viseme::I).target, 0.0, 1e-6);
}

/// it should keep a rate override sticky across later commands that omit it
#[test]
fn generic_rate_override_is_sticky() {
    let mut ctrl = mk_controller();
    ctrl.update(
        1.0 / 60.0,
        Inputs::one(Command::SetGenericMorph {
            name: "Smile".into(),
            value: 1.0,
            rate: Some(0.5),
        }),
    );
    // Second command omits rate; 0.5 must still apply.
    ctrl.update(
        1.0 / 60.0,
        Inputs::one(Command::SetGenericMorph {
            name: "Smile".into(),
            value: 1.0,
            rate: None,
        }),
    );
    // Two steps at 0.5: 0 -> 0.5 -> 0.75. The default 0.1 would give 0.19.
    approx(ctrl.generic_signal("Smile").unwrap().current, 0.75, 1e-6);
}

/// it should keep a viseme-bus rate override sticky across later commands
#[test]
fn viseme_rate_override_is_sticky() {
    let mut ctrl = mk_controller();
    ctrl.update(
        1.0 / 60.0,
        Inputs::one(Command::SetVisemes {
            visemes: visemes(&[(Viseme::A, 1.0)]),
            rate: Some(0.5),
        }),
    );
    // Later partial update omits the rate; 0.5 must still apply.
    ctrl.update(
        1.0 / 60.0,
        Inputs::one(Command::SetVisemes {
            visemes: visemes(&[(Viseme::E, 1.0)]),
            rate: None,
        }),
    );
    // Two steps at 0.5 for A (0.75), one for E (0.5). The default 0.15
    // would give 0.2775 and 0.15.
    approx(ctrl.viseme_signal(Viseme::A).current, 0.75, 1e-6);
    approx(ctrl.viseme_signal(Viseme::E).current, 0.5, 1e-6);
}

/// it should accept an empty viseme map as a pure rate override
#[test]
fn empty_viseme_map_still_overrides_rate() {
    let mut ctrl = mk_controller();
    ctrl.update(
        1.0 / 60.0,
        Inputs::one(Command::SetVisemes {
            visemes: visemes(&[(Viseme::A, 1.0)]),
            rate: None,
        }),
    );
    approx(ctrl.viseme_signal(Viseme::A).current, 0.15, 1e-6);
    // No targets supplied, only a new rate; the next step snaps.
    ctrl.update(
        1.0 / 60.0,
        Inputs::one(Command::SetVisemes {
            visemes: visemes(&[]),
            rate: Some(1.0),
        }),
    );
    approx(ctrl.viseme_signal(Viseme::A).current, 1.0, 1e-6);
    approx(ctrl.viseme_signal(Viseme::A).target, 1.0, 1e-6);
}

/// it should smooth unknown names internally but never write any influence
#[test]
fn unknown_generic_name_is_inert() {
    let mut ctrl = Controller::new(Config::default(), MorphDictionary::from_names(["Smile"]));
    ctrl.update(
        1.0 / 60.0,
        Inputs::one(Command::SetGenericMorph {
            name: "Nonexistent".into(),
            value: 1.0,
            rate: None,
        }),
    );
    for _ in 0..10 {
        let out = ctrl.update(1.0 / 60.0, Inputs::default());
        // Nothing on this avatar resolves: no viseme, no MouthOpen, and
        // certainly not "Nonexistent".
        assert!(out.morph_writes.is_empty());
    }
    // The signal drifts internally, harmlessly.
    assert!(ctrl.generic_signal("Nonexistent").unwrap().current > 0.0);
    approx(ctrl.influences()[0], 0.0, 1e-6);
}

/// it should write resolved morphs into the influence array by index
#[test]
fn resolved_morphs_land_in_influence_array() {
    let mut ctrl = mk_controller();
    let out = ctrl.update(
        1.0 / 60.0,
        Inputs::one(Command::SetVisemes {
            visemes: visemes(&[(Viseme::A, 1.0)]),
            rate: Some(1.0),
        }),
    );
    // Rate 1.0 snaps instantly; "A" is index 0 in the dictionary.
    assert!(out
        .morph_writes
        .iter()
        .any(|w| w.index == 0 && (w.value - 1.0).abs() < 1e-6));
    approx(ctrl.influences()[0], 1.0, 1e-6);
}

/// it should drive the manual morph channel through its configured target
#[test]
fn manual_morph_bypasses_named_buses() {
    let mut ctrl = mk_controller();
    ctrl.update(
        1.0 / 60.0,
        Inputs::one(Command::ManualMorph {
            value: 1.0,
            rate: Some(1.0),
        }),
    );
    // "MouthOpen" is index 6 in the dictionary.
    approx(ctrl.influences()[6], 1.0, 1e-6);
    approx(ctrl.manual_signal().current, 1.0, 1e-6);
}

/// it should smooth glow intensity while applying color unsmoothed
#[test]
fn glow_smooths_intensity_and_snaps_color() {
    let mut ctrl = mk_controller();
    let out = ctrl.update(
        1.0 / 60.0,
        Inputs::one(Command::SetGlow {
            state: GlowSwitch::On,
            color: Some(0xff0000),
            rate: Some(0.5),
        }),
    );
    // One step at 0.5 toward 1, scaled by the emissive multiplier.
    approx(out.glow.intensity, 0.5 * 2.5, 1e-6);
    assert_eq!(out.glow.color, [1.0, 0.0, 0.0]);

    let out = ctrl.update(1.0 / 60.0, Inputs::one(Command::SetGlow {
        state: GlowSwitch::Off,
        color: None,
        rate: None,
    }));
    // Target dropped to 0; intensity decays from 0.5 by half.
    approx(out.glow.intensity, 0.25 * 2.5, 1e-6);
    assert_eq!(out.glow.color, [1.0, 0.0, 0.0]);
}

/// it should hold exactly at target once converged (idempotent retargeting)
#[test]
fn repeated_identical_targets_do_not_diverge() {
    let mut ctrl = mk_controller();
    for _ in 0..5 {
        ctrl.update(
            1.0 / 60.0,
            Inputs::one(Command::SetVisemes {
                visemes: visemes(&[(Viseme::U, 0.5)]),
                rate: Some(1.0),
            }),
        );
    }
    let s = ctrl.viseme_signal(Viseme::U);
    approx(s.current, 0.5, 1e-6);
    approx(s.target, 0.5, 1e-6);
}
