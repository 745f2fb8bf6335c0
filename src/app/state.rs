//! Tour state management
//!
//! Defines the navigation state machine. The machine only decides whether
//! and where the step index moves; painting and page side effects are the
//! controller's job.

use tracing::debug;

use crate::platform::Target;

/// Tour visibility and position
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TourState {
    /// Tour not shown, waiting for the user to opt in
    #[default]
    Hidden,
    /// Tour visible over the page
    Showing(ShowingState),
}

impl TourState {
    pub fn is_showing(&self) -> bool {
        matches!(self, TourState::Showing(_))
    }

    pub fn current_index(&self) -> Option<usize> {
        match self {
            TourState::Hidden => None,
            TourState::Showing(showing) => Some(showing.current_index),
        }
    }
}

/// State while the tour is visible
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShowingState {
    /// Index of the step on screen
    pub current_index: usize,
    /// Whether a click on the target completes the step
    click_armed: bool,
    /// Target of the current step, re-resolved on every step change
    target: Option<Target>,
}

impl ShowingState {
    /// Fresh session on the first step
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Installs the target of a new step, returning the previous one
    pub fn replace_target(&mut self, target: Option<Target>) -> Option<Target> {
        std::mem::replace(&mut self.target, target)
    }

    pub fn is_click_armed(&self) -> bool {
        self.click_armed
    }

    /// Idempotent
    pub fn arm_click_listener(&mut self) {
        self.click_armed = true;
    }

    /// Idempotent
    pub fn disarm_click_listener(&mut self) {
        self.click_armed = false;
    }

    /// Consumes an armed listener; true when it was armed
    pub fn take_click(&mut self) -> bool {
        std::mem::take(&mut self.click_armed)
    }
}

/// Navigation requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    /// User opted into the tour
    Start,
    /// Forward, allowed only when `completed`
    Next { completed: bool },
    Previous,
    /// Forward without the completion check
    SkipForward,
    Dismiss,
}

/// What a processed event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed
    Unchanged,
    Started,
    /// The step index moved
    Moved { from: usize, to: usize },
    /// `Next` was refused because the task is not done
    Remind,
    Dismissed,
}

/// State machine for tour navigation
pub struct StateMachine;

impl StateMachine {
    /// Processes a navigation event and returns the new state
    ///
    /// # Arguments
    /// * `current_state` - Current tour state
    /// * `event` - Event to process
    /// * `total_steps` - Number of loaded steps, for bounds checking
    pub fn process_event(
        current_state: TourState,
        event: StateEvent,
        total_steps: usize,
    ) -> (TourState, Transition) {
        let last_index = total_steps.saturating_sub(1);

        match (current_state, event) {
            (_, StateEvent::Start) => {
                debug!("tour started at step 0");
                (TourState::Showing(ShowingState::new()), Transition::Started)
            }

            (TourState::Showing(showing), StateEvent::Dismiss) => {
                debug!(step = showing.current_index, "tour dismissed");
                (TourState::Hidden, Transition::Dismissed)
            }

            (TourState::Showing(showing), StateEvent::Next { completed })
                if showing.current_index < last_index =>
            {
                if completed {
                    let next = showing.current_index + 1;
                    Self::move_to(showing, next)
                } else {
                    (TourState::Showing(showing), Transition::Remind)
                }
            }

            (TourState::Showing(showing), StateEvent::Previous) if showing.current_index > 0 => {
                let previous = showing.current_index - 1;
                Self::move_to(showing, previous)
            }

            // Clamped at the last step so the index never leaves the step list
            (TourState::Showing(showing), StateEvent::SkipForward)
                if showing.current_index < last_index =>
            {
                let next = showing.current_index + 1;
                Self::move_to(showing, next)
            }

            // Bounds reached, or hidden - ignore event
            (state, _) => (state, Transition::Unchanged),
        }
    }

    fn move_to(mut showing: ShowingState, index: usize) -> (TourState, Transition) {
        let from = showing.current_index;
        debug!(from, to = index, "step changed");
        showing.current_index = index;
        showing.disarm_click_listener();
        (
            TourState::Showing(showing),
            Transition::Moved { from, to: index },
        )
    }
}
