//! Integration tests for motion values driven through the scheduler
//!
//! These tests verify that:
//! - Values converge on fixed targets at display-refresh frame times
//! - Retargeting mid-flight is smooth (no jumps in the current value)
//! - Owner teardown stops every value it created

use flux_animation::{AnimationScheduler, SchedulerState, SpringConfig};

/// stiffness 300, damping 30, target 50, 60 ticks of 16ms
#[test]
fn test_standard_value_within_one_percent_after_sixty_ticks() {
    let mut scheduler = AnimationScheduler::new();
    let id = scheduler.create(0.0, SpringConfig::new(300.0, 30.0));
    scheduler.set_target(id, 50.0).unwrap();

    for _ in 0..60 {
        scheduler.tick(16.0);
    }

    let value = scheduler.read(id).unwrap();
    assert!((value - 50.0).abs() <= 0.5, "got {}", value);
}

#[test]
fn test_damped_values_converge_within_bounded_ticks() {
    let configs = [
        SpringConfig::new(300.0, 40.0),
        SpringConfig::new(100.0, 20.0),
        SpringConfig::new(400.0, 40.0),
        SpringConfig::new(50.0, 20.0),
        SpringConfig::new(100.0, 30.0),
    ];

    for config in configs {
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.create(0.0, config);
        scheduler.set_target(id, 50.0).unwrap();

        let mut previous = f64::INFINITY;
        let mut converged_at = None;
        for frame in 0..400 {
            scheduler.tick(16.0);
            let error = (scheduler.read(id).unwrap() - 50.0).abs();
            if frame >= 3 {
                assert!(
                    error <= previous + 1e-9,
                    "{:?}: error grew at frame {}",
                    config,
                    frame
                );
            }
            previous = error;
            if error < 0.01 && converged_at.is_none() {
                converged_at = Some(frame);
            }
        }

        let frame = converged_at.expect("value never converged");
        assert!(frame < 250, "{:?} took {} frames", config, frame);
    }
}

#[test]
fn test_retarget_keeps_current_continuous() {
    let mut scheduler = AnimationScheduler::new();
    let id = scheduler.create(0.0, SpringConfig::magnetic());
    scheduler.set_target(id, 100.0).unwrap();

    let mut last = 0.0;
    for frame in 0..120 {
        if frame == 10 {
            scheduler.set_target(id, -100.0).unwrap();
        }
        scheduler.tick(16.0);
        let value = scheduler.read(id).unwrap();
        // A 16ms step never moves more than a fraction of the full swing
        assert!((value - last).abs() < 40.0, "jump at frame {}", frame);
        last = value;
    }
    assert!((last + 100.0).abs() < 1.0);
}

#[test]
fn test_stalled_frame_is_clamped() {
    let mut scheduler = AnimationScheduler::new();
    let id = scheduler.create(0.0, SpringConfig::particle());
    scheduler.set_target(id, 10.0).unwrap();

    // A tab returning from the background reports a multi-second frame
    scheduler.tick(5_000.0);
    let value = scheduler.read(id).unwrap();
    assert!(value.is_finite());
    assert!(value > 0.0 && value < 10.0, "got {}", value);
}

#[test]
fn test_owner_teardown_goes_idle() {
    let mut scheduler = AnimationScheduler::new();
    let owner = scheduler.register_owner();
    for _ in 0..40 {
        let id = scheduler
            .create_owned(owner, 0.0, SpringConfig::particle())
            .unwrap();
        scheduler.set_target(id, 5.0).unwrap();
    }
    scheduler.tick(16.0);
    assert!(scheduler.has_active_animations());

    scheduler.release_owner(owner);
    assert_eq!(scheduler.state(), SchedulerState::Idle);
    assert!(!scheduler.has_active_animations());
    assert_eq!(scheduler.tick(16.0), 0);
}
