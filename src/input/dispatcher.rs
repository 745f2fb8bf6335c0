//! Maps raw page events to controller commands
//!
//! Mapping is pure. Gating (loaded steps, visibility, the completion
//! predicate) is left to the controller, which evaluates it at the moment
//! the command runs.

use crate::app::state::StateEvent;
use crate::config::KeyBindings;
use crate::input::keyboard::KeyCommand;
use crate::platform::ElementId;
use crate::store::StepStore;

/// What the user clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    StartButton,
    NextButton,
    PreviousButton,
    DismissButton,
    /// A page element, possibly the armed target
    Element(ElementId),
    /// Anywhere else
    Elsewhere,
}

/// Everything the event loop can receive
#[derive(Debug, Clone)]
pub enum TourEvent {
    Key(u32),
    Click(ClickTarget),
    Resize,
    Scroll,
    /// Posted once by the step loader
    StepsLoaded(StepStore),
}

/// What the controller should do with an event
#[derive(Debug, Clone)]
pub enum Command {
    Start,
    /// A navigation transition; `Next` is gated by the predicate at run time
    Navigate(StateEvent),
    ResetVisited,
    /// Click on an element; consumed when it is the armed target
    ElementClicked(ElementId),
    /// Re-run the overlay paint for the current step
    Repaint,
    RepositionControls,
    DeliverSteps(StepStore),
}

/// Translates one event; `None` means the event is ignored
pub fn dispatch(event: TourEvent, keys: &KeyBindings) -> Option<Command> {
    let command = match event {
        TourEvent::Key(code) => match KeyCommand::from_code(code, keys)? {
            KeyCommand::Previous => Command::Navigate(StateEvent::Previous),
            KeyCommand::Next => Command::Navigate(StateEvent::Next { completed: false }),
            KeyCommand::SkipForward => Command::Navigate(StateEvent::SkipForward),
            KeyCommand::Dismiss => Command::Navigate(StateEvent::Dismiss),
            KeyCommand::ResetVisited => Command::ResetVisited,
        },
        TourEvent::Click(target) => match target {
            ClickTarget::StartButton => Command::Start,
            ClickTarget::NextButton => Command::Navigate(StateEvent::Next { completed: false }),
            ClickTarget::PreviousButton => Command::Navigate(StateEvent::Previous),
            ClickTarget::DismissButton => Command::Navigate(StateEvent::Dismiss),
            ClickTarget::Element(element) => Command::ElementClicked(element),
            ClickTarget::Elsewhere => Command::RepositionControls,
        },
        TourEvent::Resize | TourEvent::Scroll => Command::Repaint,
        TourEvent::StepsLoaded(store) => Command::DeliverSteps(store),
    };
    Some(command)
}
