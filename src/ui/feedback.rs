//! Short fire-and-forget animations
//!
//! Two kinds exist: the reminder nudge that shakes the task text when `Next`
//! is refused, and the scroll that brings a new target into view. Both are
//! sampled from `tick` and dropped after their cleanup deadline. Starting a
//! new animation of the same kind replaces the running one.

use std::f32::consts::PI;
use std::time::{Duration, Instant};

/// jQuery-style "swing" easing
pub fn swing(progress: f32) -> f32 {
    0.5 - (progress.clamp(0.0, 1.0) * PI).cos() / 2.0
}

/// Horizontal shake of the task text: 0 -> -a -> +a -> 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nudge {
    started: Instant,
    leg: Duration,
    amplitude_vw: f32,
}

impl Nudge {
    pub fn new(started: Instant, leg: Duration, amplitude_vw: f32) -> Self {
        Self {
            started,
            leg,
            amplitude_vw,
        }
    }

    /// Offset of the task text in vw at `now`
    pub fn offset_at(&self, now: Instant) -> f32 {
        let leg = self.leg.as_secs_f32();
        if leg <= 0.0 {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        let a = self.amplitude_vw;
        let keyframes = [(0.0, -a), (-a, a), (a, 0.0)];

        let index = (elapsed / leg).floor() as usize;
        match keyframes.get(index) {
            Some(&(from, to)) => {
                let progress = (elapsed - index as f32 * leg) / leg;
                from + (to - from) * swing(progress)
            }
            None => 0.0,
        }
    }

    /// The cleanup timer fires one leg after the last keyframe
    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.leg * 4
    }
}

/// Animated vertical scroll towards a target position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    started: Instant,
    duration: Duration,
    from: f32,
    to: f32,
}

impl ScrollAnimation {
    pub fn new(started: Instant, duration: Duration, from: f32, to: f32) -> Self {
        Self {
            started,
            duration,
            from,
            to,
        }
    }

    pub fn position_at(&self, now: Instant) -> f32 {
        let total = self.duration.as_secs_f32();
        if total <= 0.0 {
            return self.to;
        }
        let progress = now.saturating_duration_since(self.started).as_secs_f32() / total;
        self.from + (self.to - self.from) * swing(progress)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

/// Values to push to the page after a tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeedbackFrame {
    pub task_offset_vw: Option<f32>,
    pub scroll_y: Option<f32>,
}

impl FeedbackFrame {
    pub fn is_empty(&self) -> bool {
        self.task_offset_vw.is_none() && self.scroll_y.is_none()
    }
}

/// Running animations
#[derive(Debug, Default)]
pub struct Feedback {
    nudge: Option<Nudge>,
    scroll: Option<ScrollAnimation>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a nudge, returning the one it replaced
    pub fn start_nudge(&mut self, nudge: Nudge) -> Option<Nudge> {
        self.nudge.replace(nudge)
    }

    /// Starts a scroll, returning the one it replaced
    pub fn start_scroll(&mut self, scroll: ScrollAnimation) -> Option<ScrollAnimation> {
        self.scroll.replace(scroll)
    }

    /// Drops everything without a final frame
    pub fn cancel_all(&mut self) {
        self.nudge = None;
        self.scroll = None;
    }

    pub fn is_idle(&self) -> bool {
        self.nudge.is_none() && self.scroll.is_none()
    }

    /// Samples running animations and retires the ones past their deadline
    pub fn tick(&mut self, now: Instant) -> FeedbackFrame {
        let mut frame = FeedbackFrame::default();

        if let Some(nudge) = self.nudge {
            if nudge.is_finished(now) {
                self.nudge = None;
                frame.task_offset_vw = Some(0.0);
            } else {
                frame.task_offset_vw = Some(nudge.offset_at(now));
            }
        }

        if let Some(scroll) = self.scroll {
            // Stopped where it is at the deadline, like the jQuery original
            frame.scroll_y = Some(scroll.position_at(now));
            if scroll.is_finished(now) {
                self.scroll = None;
            }
        }

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEG: Duration = Duration::from_millis(75);

    #[test]
    fn swing_endpoints() {
        assert!(swing(0.0).abs() < 1e-6);
        assert!((swing(1.0) - 1.0).abs() < 1e-6);
        assert!((swing(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn nudge_visits_both_sides() {
        let start = Instant::now();
        let nudge = Nudge::new(start, LEG, 1.0);

        assert!(nudge.offset_at(start).abs() < 1e-6);
        assert!((nudge.offset_at(start + LEG) - -1.0).abs() < 1e-3);
        assert!((nudge.offset_at(start + LEG * 2) - 1.0).abs() < 1e-3);
        assert!(nudge.offset_at(start + LEG * 3).abs() < 1e-6);
        assert!(!nudge.is_finished(start + LEG * 3));
        assert!(nudge.is_finished(start + LEG * 4));
    }

    #[test]
    fn scroll_reaches_target_at_deadline() {
        let start = Instant::now();
        let scroll = ScrollAnimation::new(start, Duration::from_millis(600), 0.0, 300.0);

        assert_eq!(scroll.position_at(start), 0.0);
        let midway = scroll.position_at(start + Duration::from_millis(300));
        assert!((midway - 150.0).abs() < 1.0);
        assert!((scroll.position_at(start + Duration::from_millis(600)) - 300.0).abs() < 1e-3);
        assert!(scroll.is_finished(start + Duration::from_millis(600)));
    }

    #[test]
    fn tick_retires_finished_animations() {
        let start = Instant::now();
        let mut feedback = Feedback::new();
        feedback.start_nudge(Nudge::new(start, LEG, 1.0));
        feedback.start_scroll(ScrollAnimation::new(start, Duration::from_millis(600), 0.0, 100.0));

        let early = feedback.tick(start + LEG);
        assert!(early.task_offset_vw.is_some());
        assert!(early.scroll_y.is_some());

        let late = feedback.tick(start + Duration::from_millis(700));
        assert_eq!(late.task_offset_vw, Some(0.0));
        assert!((late.scroll_y.unwrap() - 100.0).abs() < 1e-3);
        assert!(feedback.is_idle());
        assert!(feedback.tick(start + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn new_nudge_replaces_running_one() {
        let start = Instant::now();
        let mut feedback = Feedback::new();
        assert!(feedback.start_nudge(Nudge::new(start, LEG, 1.0)).is_none());
        assert!(feedback.start_nudge(Nudge::new(start + LEG, LEG, 1.0)).is_some());
    }
}
