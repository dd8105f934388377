//! # Time

use std::time::Duration;
use std::time::Instant;

use crate::scheduler::Step;
use crate::scheduler::Update;
use crate::Application;
use crate::Plugin;

/// # Time
///
/// Frame timing, updated at the start of every [Update].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Time {
    /// Duration of the last frame.
    pub unscaled_delta: Duration,
    /// Total duration since the first frame.
    pub unscaled_elapsed: Duration,
    /// Multiplier applied by [Time::delta] and [Time::elapsed]. Negative and NaN values act as
    /// zero; scaled durations too large for [Duration] saturate at [Duration::MAX].
    pub scale: f32,
}

impl Time {
    /// Returns the scaled duration of the last frame.
    pub fn delta(&self) -> Duration {
        self.scaled(self.unscaled_delta)
    }

    /// Returns the scaled total duration.
    pub fn elapsed(&self) -> Duration {
        self.scaled(self.unscaled_elapsed)
    }

    /// Returns the frame rate derived from the last frame, or infinity if it took no time.
    pub fn fps(&self) -> f32 {
        let delta = self.unscaled_delta.as_secs_f32();
        if delta == 0.0 {
            return f32::INFINITY;
        }
        1.0 / delta
    }

    fn scaled(&self, duration: Duration) -> Duration {
        let scale = f64::from(self.scale.max(0.0));
        if duration.is_zero() || scale == 0.0 {
            return Duration::ZERO;
        }

        Duration::try_from_secs_f64(duration.as_secs_f64() * scale).unwrap_or(Duration::MAX)
    }

    /// Records a frame of the given duration.
    pub fn advance(&mut self, delta: Duration) {
        self.unscaled_delta = delta;
        self.unscaled_elapsed += delta;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self {
            unscaled_delta: Duration::ZERO,
            unscaled_elapsed: Duration::ZERO,
            scale: 1.0,
        }
    }
}

/// # Time Clock
///
/// Instant of the previous [update_time] call.
#[derive(Copy, Clone, Debug, Default)]
pub struct TimeClock {
    last: Option<Instant>,
}

impl TimeClock {
    /// Returns the time since the previous call, or zero on the first call.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let delta = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last = Some(now);
        delta
    }
}

/// Advances [Time] by the wall-clock time since the previous frame.
pub fn update_time(step: &mut Step<'_, Update>) {
    let delta = step.resources.get_or_emplace::<TimeClock>().tick(Instant::now());
    step.resources.get_or_emplace::<Time>().advance(delta);
}

/// # Time Plugin
#[derive(Clone, Debug)]
pub struct TimePlugin {
    /// Initial [Time::scale].
    pub scale: f32,
}

impl Default for TimePlugin {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl Plugin for TimePlugin {
    fn init(&self, app: &mut Application) {
        app.insert_resource(Time {
            scale: self.scale,
            ..Time::default()
        })
        .emplace_resource::<TimeClock>()
        .add_system::<Update>(update_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_zero_delta_returns_infinity() {
        let time = Time::default();

        assert_eq!(time.fps(), f32::INFINITY);
    }

    #[test]
    fn fps_quarter_second_returns_four() {
        let mut time = Time::default();

        time.advance(Duration::from_millis(250));

        assert_eq!(time.fps(), 4.0);
    }

    #[test]
    fn advance_accumulates_elapsed() {
        let mut time = Time::default();

        time.advance(Duration::from_millis(10));
        time.advance(Duration::from_millis(30));

        assert_eq!(time.unscaled_delta, Duration::from_millis(30));
        assert_eq!(time.unscaled_elapsed, Duration::from_millis(40));
    }

    #[test]
    fn delta_applies_scale() {
        let mut time = Time {
            scale: 0.5,
            ..Time::default()
        };

        time.advance(Duration::from_millis(100));

        assert_eq!(time.delta(), Duration::from_millis(50));
        assert_eq!(time.elapsed(), Duration::from_millis(50));
        assert_eq!(time.unscaled_delta, Duration::from_millis(100));
    }

    #[test]
    fn delta_negative_scale_returns_zero() {
        let mut time = Time {
            scale: -2.0,
            ..Time::default()
        };

        time.advance(Duration::from_millis(100));

        assert_eq!(time.delta(), Duration::ZERO);
    }

    #[test]
    fn delta_infinite_scale_does_not_panic() {
        let mut time = Time {
            scale: f32::INFINITY,
            ..Time::default()
        };
        assert_eq!(time.delta(), Duration::ZERO);

        time.advance(Duration::from_millis(16));

        assert_eq!(time.delta(), Duration::MAX);
    }

    #[test]
    fn elapsed_huge_scale_saturates() {
        let mut time = Time {
            scale: 1e30,
            ..Time::default()
        };

        time.advance(Duration::from_secs(1));

        assert_eq!(time.elapsed(), Duration::MAX);
    }

    #[test]
    fn delta_nan_scale_returns_zero() {
        let mut time = Time {
            scale: f32::NAN,
            ..Time::default()
        };

        time.advance(Duration::from_millis(100));

        assert_eq!(time.delta(), Duration::ZERO);
    }

    #[test]
    fn clock_tick_first_call_returns_zero() {
        let mut clock = TimeClock::default();

        assert_eq!(clock.tick(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn clock_tick_returns_time_since_previous_call() {
        let mut clock = TimeClock::default();
        let start = Instant::now();

        clock.tick(start);
        let delta = clock.tick(start + Duration::from_millis(16));

        assert_eq!(delta, Duration::from_millis(16));
    }

    #[test]
    fn plugin_update_advances_time() {
        let mut app = Application::new();
        app.add_plugin(TimePlugin { scale: 2.0 });

        app.invoke(Update);
        app.invoke(Update);

        let time = app.resources.get::<Time>().copied().unwrap();
        assert_eq!(time.scale, 2.0);
        assert!(time.unscaled_elapsed >= time.unscaled_delta);
    }
}
