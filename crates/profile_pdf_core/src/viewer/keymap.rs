//! crates/profile_pdf_core/src/viewer/keymap.rs
//!
//! Keyboard bindings for the viewer. The mapping is total: every navigation
//! key translates to exactly one command, and the session decides whether the
//! command applies in its current state.

/// Keys the viewer reacts to while mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Home,
    End,
    Escape,
}

/// What a key press asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    PreviousPage,
    NextPage,
    FirstPage,
    LastPage,
    Close,
}

/// Maps a navigation key to its command.
pub fn command_for(key: NavKey) -> ViewerCommand {
    match key {
        NavKey::ArrowLeft | NavKey::PageUp => ViewerCommand::PreviousPage,
        NavKey::ArrowRight | NavKey::PageDown => ViewerCommand::NextPage,
        NavKey::Home => ViewerCommand::FirstPage,
        NavKey::End => ViewerCommand::LastPage,
        NavKey::Escape => ViewerCommand::Close,
    }
}
