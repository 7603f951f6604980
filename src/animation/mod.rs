//! Time-based view transitions
//!
//! Fit requests animate the view from its current center/zoom to the fitted
//! target. Animations never block: the owner samples them with
//! [`ViewAnimation::sample`] whenever it ticks, and any new view command simply
//! drops the running animation.

use crate::core::geo::Point;
use instant::Instant;
use std::time::Duration;

/// Cubic ease-out over normalized time, clamped to `[0, 1]`
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) - 1.0;
    t * t * t + 1.0
}

pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

/// Interpolated view state at one instant of an animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewAnimationState {
    pub center: Point,
    pub zoom: f64,
    /// Linear progress in `[0, 1]`
    pub progress: f64,
}

impl ViewAnimationState {
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

/// A center + zoom transition started at a known instant
#[derive(Debug, Clone)]
pub struct ViewAnimation {
    start_time: Instant,
    duration: Duration,
    from_center: Point,
    to_center: Point,
    from_zoom: f64,
    to_zoom: f64,
}

impl ViewAnimation {
    pub fn new(
        from_center: Point,
        to_center: Point,
        from_zoom: f64,
        to_zoom: f64,
        duration: Duration,
    ) -> Self {
        Self::starting_at(
            Instant::now(),
            from_center,
            to_center,
            from_zoom,
            to_zoom,
            duration,
        )
    }

    pub fn starting_at(
        start_time: Instant,
        from_center: Point,
        to_center: Point,
        from_zoom: f64,
        to_zoom: f64,
        duration: Duration,
    ) -> Self {
        Self {
            start_time,
            duration,
            from_center,
            to_center,
            from_zoom,
            to_zoom,
        }
    }

    pub fn target_center(&self) -> Point {
        self.to_center
    }

    pub fn target_zoom(&self) -> f64 {
        self.to_zoom
    }

    /// Samples the animation at `now`
    pub fn sample(&self, now: Instant) -> ViewAnimationState {
        let elapsed = if now > self.start_time {
            now.duration_since(self.start_time)
        } else {
            Duration::ZERO
        };
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };

        if progress >= 1.0 {
            return ViewAnimationState {
                center: self.to_center,
                zoom: self.to_zoom,
                progress: 1.0,
            };
        }

        let eased = ease_out_cubic(progress);
        ViewAnimationState {
            center: Point::new(
                lerp(self.from_center.x, self.to_center.x, eased),
                lerp(self.from_center.y, self.to_center.y, eased),
            ),
            zoom: lerp(self.from_zoom, self.to_zoom, eased),
            progress,
        }
    }
}
