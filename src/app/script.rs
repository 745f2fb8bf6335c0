//! Scripted input for the command-line runner
//!
//! A script is a list of whitespace-free operations such as `next`,
//! `click:#go` or `type:#name=run.h5`. Each one is turned into page edits
//! and [`TourEvent`]s against a [`MemoryPage`], with a simulated clock so
//! animations can be replayed deterministically.

use std::str::FromStr;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

use crate::app::controller::TourController;
use crate::input::{ClickTarget, TourEvent};
use crate::platform::{MemoryPage, Page, VisitedStore};

/// Simulated frame length used while waiting
pub const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Unknown script operation '{0}'")]
    Unknown(String),
    #[error("Malformed operation '{op}': {reason}")]
    Malformed { op: String, reason: &'static str },
}

/// One scripted user action
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptOp {
    Start,
    Next,
    Previous,
    Skip,
    Escape,
    Reset,
    Click(String),
    Type { selector: String, value: String },
    Resize { width: f32, height: f32 },
    Scroll(f32),
    Wait(Duration),
}

impl FromStr for ScriptOp {
    type Err = ScriptError;

    fn from_str(op: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| ScriptError::Malformed {
            op: op.to_string(),
            reason,
        };
        let (name, argument) = match op.split_once(':') {
            Some((name, argument)) => (name, Some(argument)),
            None => (op, None),
        };

        let parsed = match (name, argument) {
            ("start", None) => ScriptOp::Start,
            ("next", None) => ScriptOp::Next,
            ("prev", None) => ScriptOp::Previous,
            ("skip", None) => ScriptOp::Skip,
            ("esc", None) => ScriptOp::Escape,
            ("reset", None) => ScriptOp::Reset,
            ("click", Some(selector)) if !selector.is_empty() => {
                ScriptOp::Click(selector.to_string())
            }
            ("type", Some(argument)) => {
                let (selector, value) = argument
                    .split_once('=')
                    .ok_or_else(|| malformed("expected <selector>=<value>"))?;
                if selector.is_empty() {
                    return Err(malformed("empty selector"));
                }
                ScriptOp::Type {
                    selector: selector.to_string(),
                    value: value.to_string(),
                }
            }
            ("resize", Some(argument)) => {
                let (width, height) = argument
                    .split_once('x')
                    .ok_or_else(|| malformed("expected <width>x<height>"))?;
                let width: f32 = width.parse().map_err(|_| malformed("bad width"))?;
                let height: f32 = height.parse().map_err(|_| malformed("bad height"))?;
                if width < 1.0 || height < 1.0 {
                    return Err(malformed("viewport must be at least 1x1"));
                }
                ScriptOp::Resize { width, height }
            }
            ("scroll", Some(argument)) => {
                ScriptOp::Scroll(argument.parse().map_err(|_| malformed("bad offset"))?)
            }
            ("wait", Some(argument)) => ScriptOp::Wait(Duration::from_millis(
                argument.parse().map_err(|_| malformed("bad milliseconds"))?,
            )),
            ("click" | "type" | "resize" | "scroll" | "wait", _) => {
                return Err(malformed("missing argument"));
            }
            _ => return Err(ScriptError::Unknown(op.to_string())),
        };
        Ok(parsed)
    }
}

/// Parses every operation, stopping at the first bad one
pub fn parse_script<S: AsRef<str>>(ops: &[S]) -> Result<Vec<ScriptOp>, ScriptError> {
    ops.iter().map(|op| op.as_ref().parse()).collect()
}

/// Replays operations against a controller on a simulated clock
pub struct ScriptRunner {
    now: Instant,
}

impl ScriptRunner {
    pub fn new(now: Instant) -> Self {
        Self { now }
    }

    /// Current simulated time
    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn apply<V: VisitedStore>(&mut self, tour: &mut TourController<MemoryPage, V>, op: &ScriptOp) {
        debug!(?op, "script step");
        let keys = tour.config().keys.clone();

        let event = match op {
            ScriptOp::Start => TourEvent::Click(ClickTarget::StartButton),
            ScriptOp::Next => TourEvent::Key(keys.next),
            ScriptOp::Previous => TourEvent::Key(keys.previous),
            ScriptOp::Skip => TourEvent::Key(keys.skip_forward),
            ScriptOp::Escape => TourEvent::Key(keys.dismiss),
            ScriptOp::Reset => TourEvent::Key(keys.reset_visited),
            ScriptOp::Click(selector) => match tour.page().find(selector) {
                Some(element) => TourEvent::Click(ClickTarget::Element(element)),
                None => {
                    warn!(%selector, "nothing to click; treating as a stray click");
                    TourEvent::Click(ClickTarget::Elsewhere)
                }
            },
            ScriptOp::Type { selector, value } => {
                if tour.page_mut().set_value(selector, value) == 0 {
                    warn!(%selector, "typed into nothing");
                }
                return;
            }
            ScriptOp::Resize { width, height } => {
                tour.page_mut().resize(*width, *height);
                TourEvent::Resize
            }
            ScriptOp::Scroll(y) => {
                tour.page_mut().scroll_to(*y);
                TourEvent::Scroll
            }
            ScriptOp::Wait(duration) => {
                self.advance(tour, *duration);
                return;
            }
        };
        tour.handle(event, self.now);
    }

    /// Moves the clock forward frame by frame, ticking animations
    pub fn advance<P: Page, V: VisitedStore>(&mut self, tour: &mut TourController<P, V>, duration: Duration) {
        let deadline = self.now + duration;
        while self.now < deadline {
            self.now = (self.now + FRAME).min(deadline);
            tour.tick(self.now);
        }
    }

    /// Ticks until every animation has finished
    pub fn settle<P: Page, V: VisitedStore>(&mut self, tour: &mut TourController<P, V>) {
        while tour.tick(self.now) {
            self.now += FRAME;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_ops() {
        let ops = parse_script(&["start", "next", "prev", "skip", "esc", "reset"]).unwrap();
        assert_eq!(
            ops,
            vec![
                ScriptOp::Start,
                ScriptOp::Next,
                ScriptOp::Previous,
                ScriptOp::Skip,
                ScriptOp::Escape,
                ScriptOp::Reset,
            ]
        );
    }

    #[test]
    fn parses_ops_with_arguments() {
        assert_eq!("click:#go".parse::<ScriptOp>(), Ok(ScriptOp::Click("#go".into())));
        assert_eq!(
            "type:#name=a=b".parse::<ScriptOp>(),
            Ok(ScriptOp::Type {
                selector: "#name".into(),
                value: "a=b".into(),
            })
        );
        assert_eq!(
            "resize:1024x768".parse::<ScriptOp>(),
            Ok(ScriptOp::Resize {
                width: 1024.0,
                height: 768.0,
            })
        );
        assert_eq!("scroll:120.5".parse::<ScriptOp>(), Ok(ScriptOp::Scroll(120.5)));
        assert_eq!("wait:600".parse::<ScriptOp>(), Ok(ScriptOp::Wait(Duration::from_millis(600))));
    }

    #[test]
    fn empty_value_is_allowed() {
        assert_eq!(
            "type:#name=".parse::<ScriptOp>(),
            Ok(ScriptOp::Type {
                selector: "#name".into(),
                value: String::new(),
            })
        );
    }

    #[test]
    fn rejects_bad_ops() {
        assert_eq!(
            "jump".parse::<ScriptOp>(),
            Err(ScriptError::Unknown("jump".into()))
        );
        assert!(matches!("click".parse::<ScriptOp>(), Err(ScriptError::Malformed { .. })));
        assert!(matches!("resize:10".parse::<ScriptOp>(), Err(ScriptError::Malformed { .. })));
        assert!(matches!("resize:0x10".parse::<ScriptOp>(), Err(ScriptError::Malformed { .. })));
        assert!(matches!("wait:soon".parse::<ScriptOp>(), Err(ScriptError::Malformed { .. })));
        assert!(matches!("next:1".parse::<ScriptOp>(), Err(ScriptError::Unknown(_))));
    }
}
