use std::f64::consts::TAU;

use isoscene_core::{Animation, AnimationCycle};

/// Vertical body bob, in pixels, at the peak of a walk cycle.
pub const BOB_AMPLITUDE: f64 = 1.5;
/// Leg stride, in pixels, at the peak of a walk cycle.
pub const STRIDE_AMPLITUDE: f64 = 2.0;

/// Advance an animation by `elapsed_ms` of wall-clock time.
///
/// `frame += speed * (elapsed / interval)`, wrapped into `0..cycle_length`.
pub fn step(animation: &mut Animation, elapsed_ms: f64, frame_interval_ms: f64, cycle_length: f64) {
    let valid = elapsed_ms.is_finite()
        && elapsed_ms > 0.0
        && frame_interval_ms > 0.0
        && cycle_length > 0.0;
    if !valid {
        return;
    }
    let next = animation.frame + animation.speed * (elapsed_ms / frame_interval_ms);
    if !next.is_finite() {
        return;
    }
    let wrapped = next.rem_euclid(cycle_length);
    // rem_euclid can round up to the modulus itself for tiny negative inputs.
    animation.frame = if wrapped >= cycle_length { 0.0 } else { wrapped };
}

/// Per-frame body and limb offsets derived from the animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionOffset {
    /// Added to the y of body parts.
    pub bob: f64,
    /// Added to the y of the left limb and subtracted from the right.
    pub stride: f64,
}

pub fn motion_offset(animation: Option<&Animation>, cycle_length: f64) -> MotionOffset {
    match animation {
        Some(anim) if anim.cycle == AnimationCycle::Walk && cycle_length > 0.0 => {
            let phase = anim.frame / cycle_length * TAU;
            MotionOffset {
                bob: -phase.sin().abs() * BOB_AMPLITUDE,
                stride: phase.sin() * STRIDE_AMPLITUDE,
            }
        }
        _ => MotionOffset::default(),
    }
}

/// Playback clock. Turns timestamps into elapsed intervals while running.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ticker {
    running: bool,
    last_ms: Option<f64>,
}

impl Ticker {
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.last_ms = None;
        }
    }

    /// Stop immediately. The next [`Ticker::elapsed`] call yields nothing.
    pub fn stop(&mut self) {
        self.running = false;
        self.last_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Milliseconds since the previous tick. The first tick after starting
    /// only records the timestamp, so time spent paused is never applied.
    pub fn elapsed(&mut self, now_ms: f64) -> Option<f64> {
        if !self.running || !now_ms.is_finite() {
            return None;
        }
        let previous = self.last_ms.replace(now_ms)?;
        Some((now_ms - previous).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_advances_by_speed() {
        let mut anim = Animation::new(AnimationCycle::Idle, 0.1);
        step(&mut anim, 16.67, 16.67, 4.0);
        assert!((anim.frame - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_step_wraps_at_cycle_length() {
        let mut anim = Animation::new(AnimationCycle::Walk, 0.1);
        for _ in 0..45 {
            step(&mut anim, 16.67, 16.67, 4.0);
            assert!(anim.frame >= 0.0 && anim.frame < 4.0);
        }
        assert!((anim.frame - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_step_is_frame_rate_independent() {
        let mut fast = Animation::new(AnimationCycle::Walk, 0.3);
        let mut slow = fast;
        for _ in 0..4 {
            step(&mut fast, 8.0, 16.0, 4.0);
        }
        step(&mut slow, 32.0, 16.0, 4.0);
        assert!((fast.frame - slow.frame).abs() < 1e-12);
    }

    #[test]
    fn test_step_ignores_bad_elapsed() {
        let mut anim = Animation::new(AnimationCycle::Walk, 0.1);
        step(&mut anim, f64::NAN, 16.67, 4.0);
        step(&mut anim, -5.0, 16.67, 4.0);
        assert_eq!(anim.frame, 0.0);
    }

    #[test]
    fn test_idle_has_no_motion() {
        let mut anim = Animation::new(AnimationCycle::Idle, 0.1);
        anim.frame = 1.0;
        assert_eq!(motion_offset(Some(&anim), 4.0), MotionOffset::default());
        assert_eq!(motion_offset(None, 4.0), MotionOffset::default());
    }

    #[test]
    fn test_walk_motion_peaks_at_quarter_cycle() {
        let mut anim = Animation::new(AnimationCycle::Walk, 0.1);
        anim.frame = 1.0;
        let motion = motion_offset(Some(&anim), 4.0);
        assert!((motion.stride - STRIDE_AMPLITUDE).abs() < 1e-12);
        assert!((motion.bob + BOB_AMPLITUDE).abs() < 1e-12);
    }

    #[test]
    fn test_ticker_first_tick_only_records() {
        let mut ticker = Ticker::default();
        assert_eq!(ticker.elapsed(100.0), None);
        ticker.start();
        assert_eq!(ticker.elapsed(100.0), None);
        assert_eq!(ticker.elapsed(116.0), Some(16.0));
        ticker.stop();
        assert_eq!(ticker.elapsed(132.0), None);
        ticker.start();
        assert_eq!(ticker.elapsed(5000.0), None);
        assert_eq!(ticker.elapsed(5010.0), Some(10.0));
    }
}
