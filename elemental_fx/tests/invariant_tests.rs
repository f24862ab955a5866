use elemental_fx::charge::ChargeLevel;
use elemental_fx::config::{ChargeConfig, GestureConfig, HandConfig, LightningConfig, ParticleConfig};
use elemental_fx::gesture::{extended_fingers, is_open, PinchTracker};
use elemental_fx::hand::{HandGesture, HandSlot};
use elemental_fx::landmarks::{Landmarks, LANDMARK_COUNT};
use elemental_fx::lightning::{Bolts, BOLT_PALETTE};
use elemental_fx::particle::{Emission, ParticleKind, Particles};
use elemental_fx::render::FrameCommands;
use elemental_fx::synthetic::{synth_hand, HandPose};
use elemental_fx::{FxConfig, Handedness, Point, PowerMode, Simulation, TrackingFrame, Viewport};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn mode() -> impl Strategy<Value = PowerMode> {
    prop_oneof![
        Just(PowerMode::FireIce),
        Just(PowerMode::Lightning),
        Just(PowerMode::RedBlue),
    ]
}

fn gesture() -> impl Strategy<Value = HandGesture> {
    (any::<bool>(), any::<bool>()).prop_map(|(open, pinch)| HandGesture { open, pinch })
}

fn pose() -> impl Strategy<Value = HandPose> {
    prop_oneof![Just(HandPose::Open), Just(HandPose::Fist), Just(HandPose::Pinch)]
}

fn landmarks() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((0.0f32..1.0, 0.0f32..1.0), LANDMARK_COUNT)
        .prop_map(|v| v.into_iter().map(|(x, y)| Point::new(x, y)).collect())
}

proptest! {
    #[test]
    fn prop_hand_state_stays_in_range(
        steps in prop::collection::vec((gesture(), mode(), any::<bool>()), 1..200)
    ) {
        let cfg = HandConfig::default();
        let gcfg = GestureConfig::default();
        let mut slot = HandSlot::new();
        for (g, m, present) in steps {
            if present {
                slot.update(g, m, &cfg);
            } else {
                slot.update_absent(m, &cfg, &gcfg);
            }
            prop_assert!((0.0..=1.0).contains(&slot.intensity));
            prop_assert!((0.0..=1.0).contains(&slot.surge));
            prop_assert!(slot.surge == 0.0 || slot.surge >= cfg.surge_floor);
        }
    }

    #[test]
    fn prop_charge_stays_in_range(steps in prop::collection::vec((mode(), any::<bool>()), 1..200)) {
        let cfg = ChargeConfig::default();
        let mut charge = ChargeLevel::new();
        for (m, open) in steps {
            charge.update(m, open, &cfg);
            prop_assert!((0.0..=1.0).contains(&charge.value()));
        }
    }

    #[test]
    fn prop_open_iff_three_fingers_extended(points in landmarks()) {
        let lm = Landmarks::try_from(points.as_slice()).unwrap();
        prop_assert_eq!(is_open(&lm), extended_fingers(&lm) >= 3);
    }

    #[test]
    fn prop_pinch_never_active_without_detection(
        poses in prop::collection::vec((pose(), 0.2f32..0.8), 1..60)
    ) {
        let cfg = GestureConfig::default();
        let mut tracker = PinchTracker::new();
        let mut since_raw: Option<u32> = None;
        for (p, x) in poses {
            let lm = Landmarks::try_from(synth_hand(p, Point::new(x, 0.8), 1.0).as_slice()).unwrap();
            let moved = tracker.last_wrist.map_or(false, |w| w.distance(lm.wrist()) > cfg.max_wrist_step);
            let active = tracker.update(&lm, &cfg);
            // A rejected sample is never a detection, whatever its shape.
            let raw = !moved && p == HandPose::Pinch;
            since_raw = if raw { Some(0) } else { since_raw.map(|n| n + 1) };
            if moved {
                prop_assert!(!active);
            }
            if tracker.active {
                let n = since_raw.unwrap_or(u32::MAX);
                prop_assert!(n < cfg.pinch_hold_frames);
            }
        }
    }

    #[test]
    fn prop_particles_never_survive_dead(seed in any::<u64>(), frames in 1usize..80) {
        let cfg = ParticleConfig::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let hand = HandSlot { intensity: 1.0, surge: 0.5, ..HandSlot::new() };
        let mut particles = Particles::new();
        for f in 0..frames {
            let emission = if f % 3 == 0 { Emission::Drawing } else { Emission::Ambient };
            particles.spawn(Point::new(100.0, 100.0), ParticleKind::Fire, emission, &hand, &cfg, &mut rng);
            let before: Vec<f32> = particles.iter().map(|p| p.life).collect();
            let mut out = FrameCommands::new(Viewport::new(200, 200));
            particles.advance(&mut out);
            prop_assert!(particles.iter().all(|p| p.life > 0.0 && p.life <= 1.0));
            prop_assert!(particles.len() <= before.len());
            prop_assert_eq!(out.particle_count(), particles.len());
        }
    }

    #[test]
    fn prop_bolts_have_fixed_shape(seed in any::<u64>(), charge in 0.0f32..=1.0) {
        let cfg = LightningConfig::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut bolts = Bolts::new();
        for _ in 0..20 {
            bolts.spawn(Point::new(50.0, 50.0), charge, &cfg, &mut rng);
        }
        for bolt in bolts.iter() {
            prop_assert_eq!(bolt.points.len(), 25);
            prop_assert!(BOLT_PALETTE.contains(&bolt.color));
            prop_assert_eq!(bolt.life, 1.0);
        }
    }

    #[test]
    fn prop_simulation_survives_arbitrary_frames(
        seed in any::<u64>(),
        frames in prop::collection::vec((mode(), pose(), pose(), any::<bool>()), 1..40)
    ) {
        let mut sim = Simulation::new(FxConfig::default());
        let mut rng = StdRng::seed_from_u64(seed);
        for (i, (m, left, right, both)) in frames.into_iter().enumerate() {
            sim.set_power_mode(m);
            let mut frame = TrackingFrame::empty(i as f64 * 16.0)
                .with_hand(Handedness::Right, synth_hand(right, Point::new(0.7, 0.8), 1.0));
            if both {
                frame = frame.with_hand(Handedness::Left, synth_hand(left, Point::new(0.3, 0.8), 1.0));
            }
            let out = sim.step(&frame, Viewport::new(160, 120), &mut rng);
            prop_assert_eq!(out.stroke_count(), 3 * sim.bolts().len());
            prop_assert!((0.0..=1.0).contains(&sim.charge()));
            for h in Handedness::BOTH {
                prop_assert!((0.0..=1.0).contains(&sim.hand(h).intensity));
            }
        }
    }
}
