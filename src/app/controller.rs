//! Tour controller and coordination layer
//!
//! The controller owns the session: tour state, loaded steps, running
//! animations. It routes dispatched commands through the state machine and
//! repaints the page. Everything runs on the caller's thread; the only
//! other thread is the step loader, which talks to us through
//! [`TourEvent::StepsLoaded`].

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::app::state::{StateEvent, StateMachine, TourState, Transition};
use crate::config::TourConfig;
use crate::domain::completion::is_step_complete;
use crate::domain::step::{Interaction, ResolvedStep};
use crate::input::{Command, TourEvent, dispatch};
use crate::platform::{ElementId, Page, Target, VisitedStore, resolve_target};
use crate::store::StepStore;
use crate::ui::feedback::{Feedback, Nudge, ScrollAnimation};
use crate::ui::panel::{PanelContent, PanelPlacement};
use crate::ui::renderer::{OverlayLayout, OverlayRenderer};

/// Kind of repaint waiting for the steps to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderKind {
    /// Same step, fresh geometry
    Passive,
    /// New step: target re-resolution, scroll, listener rearm
    Full,
}

/// Main tour controller
pub struct TourController<P: Page, V: VisitedStore> {
    config: TourConfig,
    state: TourState,
    /// `None` until the loader delivers
    store: Option<StepStore>,
    page: P,
    visited: V,
    renderer: OverlayRenderer,
    feedback: Feedback,
    /// Render requested before the steps arrived
    pending: Option<RenderKind>,
}

impl<P: Page, V: VisitedStore> TourController<P, V> {
    pub fn new(config: TourConfig, page: P, visited: V) -> Self {
        Self {
            config,
            state: TourState::Hidden,
            store: None,
            page,
            visited,
            renderer: OverlayRenderer::new(),
            feedback: Feedback::new(),
            pending: None,
        }
    }

    /// Whether the start prompt should be offered on page load
    pub fn should_prompt(&self) -> bool {
        !self.visited.is_visited()
    }

    pub fn state(&self) -> &TourState {
        &self.state
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn visited(&self) -> &V {
        &self.visited
    }

    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_some()
    }

    pub fn total_steps(&self) -> usize {
        self.store.as_ref().map_or(0, StepStore::len)
    }

    pub fn pending_render(&self) -> Option<RenderKind> {
        self.pending
    }

    /// True while the armed target click would complete the step
    pub fn is_click_armed(&self) -> bool {
        match &self.state {
            TourState::Showing(showing) => showing.is_click_armed(),
            TourState::Hidden => false,
        }
    }

    pub fn current_target(&self) -> Option<&Target> {
        match &self.state {
            TourState::Showing(showing) => showing.target(),
            TourState::Hidden => None,
        }
    }

    /// Resolved record of the step on screen
    pub fn current_step(&self) -> Option<ResolvedStep> {
        let index = self.state.current_index()?;
        self.store.as_ref()?.resolve(index)
    }

    /// Looks the current step's target up on the page as it is now
    pub fn live_target(&self) -> Option<Target> {
        let selector = self.current_step()?.target_selector?;
        resolve_target(&self.page, &selector)
    }

    /// Runs the completion predicate against the live page
    pub fn is_current_step_complete(&self) -> bool {
        let Some(step) = self.current_step() else {
            return false;
        };
        let value = self
            .live_target()
            .and_then(|target| self.page.value(target.primary()));
        is_step_complete(&step, value.as_deref())
    }

    /// Handles one raw event
    pub fn handle(&mut self, event: TourEvent, now: Instant) {
        match dispatch(event, &self.config.keys) {
            Some(command) => self.execute(command, now),
            None => debug!("event ignored"),
        }
    }

    /// Handles every event already queued on `events`; returns how many ran
    pub fn drain(&mut self, events: &Receiver<TourEvent>, now: Instant) -> usize {
        let mut handled = 0;
        while let Ok(event) = events.try_recv() {
            self.handle(event, now);
            handled += 1;
        }
        handled
    }

    pub fn execute(&mut self, command: Command, now: Instant) {
        match command {
            Command::Start => self.start(now),
            Command::Navigate(event) => self.navigate(event, now),
            Command::ResetVisited => self.reset_visited(),
            Command::ElementClicked(element) => self.element_clicked(element, now),
            Command::Repaint => self.request_render(RenderKind::Passive, now),
            Command::RepositionControls => self.reposition_controls(),
            Command::DeliverSteps(store) => self.deliver_steps(store, now),
        }
    }

    /// Opens the tour on the first step
    pub fn start(&mut self, now: Instant) {
        self.revoke_target();
        let previous = std::mem::take(&mut self.state);
        let (state, _) = StateMachine::process_event(previous, StateEvent::Start, self.total_steps());
        self.state = state;

        info!(loaded = self.is_loaded(), "tour started");
        self.page.set_tour_visible(true);
        self.request_render(RenderKind::Full, now);
    }

    /// Accepts the loaded steps and performs the render queued meanwhile
    pub fn deliver_steps(&mut self, store: StepStore, now: Instant) {
        if self.store.is_some() {
            warn!("step document delivered twice; keeping the first");
            return;
        }

        info!(steps = store.len(), "steps ready");
        self.store = Some(store);
        if let Some(kind) = self.pending.take() {
            debug!(?kind, "running deferred render");
            self.request_render(kind, now);
        }
    }

    fn navigate(&mut self, event: StateEvent, now: Instant) {
        if !self.state.is_showing() {
            debug!(?event, "tour hidden; navigation ignored");
            return;
        }
        // Dismiss must work even if the steps never arrive
        if self.store.is_none() && event != StateEvent::Dismiss {
            debug!(?event, "steps not loaded; navigation dropped");
            return;
        }

        let event = match event {
            StateEvent::Next { completed: false } => StateEvent::Next {
                completed: self.is_current_step_complete(),
            },
            other => other,
        };
        self.apply(event, now);
    }

    fn apply(&mut self, event: StateEvent, now: Instant) {
        let dismissed_target = match (&self.state, event) {
            (TourState::Showing(showing), StateEvent::Dismiss) => showing.target().cloned(),
            _ => None,
        };

        let previous = std::mem::take(&mut self.state);
        let (state, transition) = StateMachine::process_event(previous, event, self.total_steps());
        self.state = state;

        match transition {
            Transition::Moved { .. } => self.request_render(RenderKind::Full, now),
            Transition::Remind => self.remind(now),
            Transition::Dismissed => self.finish(dismissed_target),
            Transition::Started | Transition::Unchanged => {}
        }
    }

    /// Armed target clicks complete the step; any other click just
    /// repositions the dismiss control
    fn element_clicked(&mut self, element: ElementId, now: Instant) {
        let on_target = self
            .live_target()
            .is_some_and(|target| target.contains(element));
        let consumed = match &mut self.state {
            TourState::Showing(showing) => on_target && showing.take_click(),
            TourState::Hidden => false,
        };

        if consumed && self.store.is_some() {
            debug!(?element, "target click completes step");
            self.apply(StateEvent::Next { completed: true }, now);
        } else {
            self.reposition_controls();
        }
    }

    fn reset_visited(&mut self) {
        match self.visited.clear() {
            Ok(()) => info!("visited flag cleared"),
            Err(err) => warn!(error = %err, "could not clear visited flag"),
        }
    }

    fn remind(&mut self, now: Instant) {
        debug!("task not done; nudging");
        let nudge = Nudge::new(
            now,
            Duration::from_millis(self.config.reminder_step_ms),
            self.config.reminder_amplitude_vw,
        );
        if self.feedback.start_nudge(nudge).is_some() {
            self.page.set_task_offset(0.0);
        }
    }

    fn finish(&mut self, target: Option<Target>) {
        if let Some(target) = target {
            for &element in target.elements() {
                self.page.set_interactive(element, false);
            }
        }
        self.feedback.cancel_all();
        self.pending = None;
        self.page.set_task_offset(0.0);
        self.page.set_content_inert(false);
        self.page.set_tour_visible(false);

        match self.visited.mark_visited() {
            Ok(()) => info!("tour dismissed"),
            Err(err) => warn!(error = %err, "tour dismissed but visited flag not saved"),
        }
    }

    fn request_render(&mut self, kind: RenderKind, now: Instant) {
        if !self.state.is_showing() {
            return;
        }
        if self.store.is_none() {
            self.pending = self.pending.max(Some(kind));
            debug!(?kind, "steps not loaded; render deferred");
            return;
        }

        match kind {
            RenderKind::Full => self.render_step(now),
            RenderKind::Passive => self.repaint(),
        }
    }

    /// Full step transition: new target, panel, scroll and listener state
    fn render_step(&mut self, now: Instant) {
        self.prepare_page();
        self.revoke_target();

        let step = self.current_step();
        let target = step
            .as_ref()
            .and_then(|step| step.target_selector.as_deref())
            .and_then(|selector| resolve_target(&self.page, selector));
        let arm = target.is_some()
            && step
                .as_ref()
                .is_some_and(|step| step.interaction == Interaction::Click);

        if let TourState::Showing(showing) = &mut self.state {
            showing.replace_target(target.clone());
            if arm {
                showing.arm_click_listener();
            } else {
                showing.disarm_click_listener();
            }
        }

        if target.is_none() {
            debug!(step = ?self.state.current_index(), "no target on page; painting without hole");
        }
        if let Some(target) = &target {
            self.scroll_into_view(target, now);
        }

        self.place_panel();
        self.paint();
    }

    /// Passive repaint for the step already on screen
    ///
    /// The target is looked up again since the page may have replaced it.
    fn repaint(&mut self) {
        self.prepare_page();
        self.revoke_target();
        let target = self.live_target();
        if let TourState::Showing(showing) = &mut self.state {
            showing.replace_target(target);
        }
        self.place_panel();
        self.paint();
    }

    fn prepare_page(&mut self) {
        self.page.set_content_inert(true);
    }

    fn revoke_target(&mut self) {
        let previous = match &mut self.state {
            TourState::Showing(showing) => showing.replace_target(None),
            TourState::Hidden => None,
        };
        if let Some(previous) = previous {
            for &element in previous.elements() {
                self.page.set_interactive(element, false);
            }
        }
    }

    fn scroll_into_view(&mut self, target: &Target, now: Instant) {
        let Some(rect) = self.page.bounding_rect(target.primary()) else {
            return;
        };
        let viewport = self.page.viewport();
        let document_top = rect.y + viewport.scroll_y;
        let destination = (document_top - viewport.height * self.config.scroll_anchor).max(0.0);

        self.feedback.start_scroll(ScrollAnimation::new(
            now,
            Duration::from_millis(self.config.scroll_duration_ms),
            viewport.scroll_y,
            destination,
        ));
    }

    fn panel_placement(&self) -> Option<PanelPlacement> {
        let step = self.current_step()?;
        let content = PanelContent::for_step(&step, self.total_steps());
        Some(PanelPlacement::compute(
            content,
            step.text_position,
            self.page.viewport(),
            self.page.panel_metrics(),
            self.page.nav_bar().h,
        ))
    }

    fn place_panel(&mut self) {
        if let Some(placement) = self.panel_placement() {
            self.page.show_panel(&placement);
        }
    }

    fn reposition_controls(&mut self) {
        if !self.state.is_showing() {
            return;
        }
        if let Some(placement) = self.panel_placement() {
            self.page.move_dismiss_control(placement.dismiss);
        }
    }

    /// Paints the overlay for the current target and hands it to the page
    fn paint(&mut self) {
        let elements: Vec<ElementId> = self
            .current_target()
            .map(|target| target.elements().to_vec())
            .unwrap_or_default();
        let rects: Vec<_> = elements
            .iter()
            .filter_map(|&element| self.page.bounding_rect(element))
            .collect();

        let layout = OverlayLayout::compute(
            self.page.viewport(),
            self.page.nav_bar(),
            &rects,
            &self.config,
        );
        match self.renderer.render(&layout) {
            Ok(frame) => self.page.present(frame),
            Err(err) => warn!(error = %err, "overlay paint skipped"),
        }

        for element in elements {
            self.page.set_interactive(element, true);
        }
    }

    /// Advances animations; returns true while any is still running
    pub fn tick(&mut self, now: Instant) -> bool {
        let frame = self.feedback.tick(now);
        if frame.is_empty() {
            return false;
        }
        if let Some(offset) = frame.task_offset_vw {
            self.page.set_task_offset(offset);
        }
        if let Some(y) = frame.scroll_y {
            self.page.scroll_to(y);
            // The page scrolled, so the hole has to follow
            self.request_render(RenderKind::Passive, now);
        }
        !self.feedback.is_idle()
    }
}
