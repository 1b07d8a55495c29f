use anyhow::Result;
use keyline_anim::{ManualTicker, PlaybackDriver, PropertyKind, Timeline, loop_time};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn loop_time_stays_in_range() {
    for duration in [1.0, 16.7, 1000.0, 3000.0, 12345.6] {
        for step in -200..=200 {
            let elapsed = step as f64 * 73.3;
            let time = loop_time(elapsed, duration);
            assert!(
                time >= 0.0 && time < duration,
                "loop_time({}, {}) = {}",
                elapsed,
                duration,
                time
            );
        }
    }
}

#[test]
fn driver_moves_the_playhead() -> Result<()> {
    let mut timeline = Timeline::new(1000.0);
    let id = timeline.add_default_layer();
    timeline
        .layer_mut(&id)
        .ok_or_else(|| anyhow::anyhow!("layer missing"))?
        .property_mut(PropertyKind::X)
        .add_keyframe(keyline_anim::Keyframe::new(
            1000.0,
            300.0,
            keyline_anim::Easing::LINEAR,
        )?)?;
    timeline.set_playing(true);

    let timeline = Rc::new(RefCell::new(timeline));
    let ticker = Rc::new(ManualTicker::new());
    let driver = PlaybackDriver::new(Rc::clone(&ticker));

    let target = Rc::clone(&timeline);
    let duration = timeline.borrow().duration();
    driver.start(true, duration, move |time| target.borrow_mut().seek(time))?;

    let mut seen = Vec::new();
    for now in [16.0, 516.0, 1016.0, 1266.0] {
        ticker.fire(now);
        let timeline = timeline.borrow();
        seen.push((timeline.current_time(), timeline.current_state()[0].1.x));
    }
    assert_eq!(
        seen,
        vec![(0.0, 100.0), (500.0, 200.0), (0.0, 100.0), (250.0, 150.0)]
    );

    driver.stop();
    timeline.borrow_mut().set_playing(false);
    assert_eq!(ticker.pending(), 0);
    Ok(())
}
