//! crates/profile_pdf_core/src/viewer/mod.rs
//!
//! The client rendering engine: a paginated, watermark-protected view over
//! the delivered document. One `RenderSession` per open viewer.

pub mod guard;
pub mod keymap;
pub mod session;
pub mod watermark;

pub use guard::{Interaction, InteractionGuard, SuppressionRegistry};
pub use keymap::{command_for, NavKey, ViewerCommand};
pub use session::{PageRender, RenderSession, RenderTask, ViewerError, ViewerOptions, ViewerState};
pub use watermark::{TilePlan, WatermarkOptions};
