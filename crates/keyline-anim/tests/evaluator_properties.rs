use anyhow::Result;
use keyline_anim::{AnimatedProperty, Easing, Keyframe, NamedEasing, evaluate};

fn property(frames: &[(f64, f64)], easing: Easing) -> Result<AnimatedProperty> {
    let mut property = AnimatedProperty::new(42.0);
    for &(time, value) in frames {
        property.add_keyframe(Keyframe::new(time, value, easing)?)?;
    }
    Ok(property)
}

fn sample_times() -> Vec<f64> {
    let mut times: Vec<f64> = (-10..=40).map(|i| i as f64 * 97.5).collect();
    times.extend([f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0, -0.0, 1e12]);
    times
}

#[test]
fn empty_property_yields_default_everywhere() {
    let property = AnimatedProperty::new(42.0);
    for time in sample_times() {
        assert_eq!(evaluate(&property, time), 42.0, "time {}", time);
    }
}

#[test]
fn single_keyframe_holds_everywhere() -> Result<()> {
    let property = property(&[(750.0, -3.5)], Easing::EASE_IN_OUT)?;
    for time in sample_times() {
        assert_eq!(evaluate(&property, time), -3.5, "time {}", time);
    }
    Ok(())
}

#[test]
fn linear_triangle_wave() -> Result<()> {
    let property = property(&[(0.0, 0.0), (1000.0, 100.0), (2000.0, 0.0)], Easing::LINEAR)?;

    assert_eq!(evaluate(&property, 500.0), 50.0);
    assert_eq!(evaluate(&property, 1000.0), 100.0);
    assert_eq!(evaluate(&property, 1500.0), 50.0);
    assert_eq!(evaluate(&property, 2000.0), 0.0);
    assert_eq!(evaluate(&property, 3000.0), 0.0);
    assert_eq!(evaluate(&property, -100.0), 0.0);
    Ok(())
}

#[test]
fn storage_order_does_not_matter() -> Result<()> {
    let sorted = property(&[(0.0, 0.0), (1000.0, 100.0), (2000.0, 0.0)], Easing::EASE_OUT)?;
    let shuffled = property(&[(2000.0, 0.0), (0.0, 0.0), (1000.0, 100.0)], Easing::EASE_OUT)?;

    for time in sample_times() {
        assert_eq!(
            evaluate(&sorted, time).to_bits(),
            evaluate(&shuffled, time).to_bits(),
            "time {}",
            time
        );
    }
    Ok(())
}

#[test]
fn evaluation_is_idempotent() -> Result<()> {
    let property = property(
        &[(1200.0, 7.0), (0.0, -1.0), (300.0, 55.5), (300.0, 12.0)],
        Easing::cubic_bezier(0.2, 0.9, 0.4, 0.1)?,
    )?;
    let before = property.clone();

    for time in sample_times() {
        let first = evaluate(&property, time);
        for _ in 0..3 {
            assert_eq!(evaluate(&property, time).to_bits(), first.to_bits());
        }
    }
    assert_eq!(property, before, "evaluation must not reorder keyframes");
    Ok(())
}

#[test]
fn identity_bezier_matches_linear() -> Result<()> {
    let linear = property(&[(0.0, 10.0), (1000.0, 90.0)], Easing::LINEAR)?;
    let bezier = property(
        &[(0.0, 10.0), (1000.0, 90.0)],
        Easing::cubic_bezier(0.0, 0.0, 1.0, 1.0)?,
    )?;

    for step in 0..=1000 {
        let time = step as f64;
        assert_eq!(evaluate(&linear, time), evaluate(&bezier, time), "time {}", time);
    }
    Ok(())
}

#[test]
fn easing_uses_the_earlier_keyframe() -> Result<()> {
    let mut property = AnimatedProperty::new(0.0);
    property.add_keyframe(Keyframe::new(0.0, 0.0, Easing::EASE_IN)?)?;
    property.add_keyframe(Keyframe::new(1000.0, 1.0, Easing::EASE_OUT)?)?;

    let expected = Easing::Named(NamedEasing::EaseIn).evaluate(0.5);
    assert_eq!(evaluate(&property, 500.0), expected);
    assert!(evaluate(&property, 500.0) < 0.5);
    Ok(())
}

#[test]
fn eased_values_stay_between_endpoints() -> Result<()> {
    for easing in [Easing::LINEAR, Easing::EASE_IN, Easing::EASE_OUT, Easing::EASE_IN_OUT] {
        let property = property(&[(0.0, 200.0), (1000.0, 400.0)], easing)?;
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=100 {
            let value = evaluate(&property, step as f64 * 10.0);
            assert!((200.0..=400.0).contains(&value), "{} gave {}", easing, value);
            assert!(value >= previous, "{} is not monotonic", easing);
            previous = value;
        }
    }
    Ok(())
}
