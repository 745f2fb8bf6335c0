pub mod feedback;
pub mod panel;
pub mod renderer;

pub use feedback::{Feedback, FeedbackFrame, Nudge, ScrollAnimation};
pub use panel::{PanelContent, PanelMetrics, PanelPlacement};
pub use renderer::{OverlayFrame, OverlayLayout, OverlayRenderer, RendererError};
