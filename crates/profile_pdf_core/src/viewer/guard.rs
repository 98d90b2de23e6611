//! crates/profile_pdf_core/src/viewer/guard.rs
//!
//! The viewer's interaction-suppression contract as a scoped resource.
//! While a guard is alive, the hosting surface must refuse the suppressed
//! interactions; dropping the guard releases every suppression at once, so no
//! exit path can leak a dangling block. This is a deterrent against casual
//! copying, not a security boundary: a motivated client can still capture the
//! rendered bitmap.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// The interactions suppressed while a viewer is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    ContextMenu,
    PrintShortcut,
    SaveShortcut,
    TextSelection,
    DragStart,
}

impl Interaction {
    pub const ALL: [Interaction; 5] = [
        Interaction::ContextMenu,
        Interaction::PrintShortcut,
        Interaction::SaveShortcut,
        Interaction::TextSelection,
        Interaction::DragStart,
    ];
}

/// Shared, reference-counted suppression state. Counts rather than booleans,
/// so overlapping viewer sessions compose correctly.
#[derive(Debug, Clone, Default)]
pub struct SuppressionRegistry {
    holds: Arc<Mutex<HashMap<Interaction, usize>>>,
}

impl SuppressionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the hosting surface must currently refuse this interaction.
    pub fn is_suppressed(&self, interaction: Interaction) -> bool {
        self.holds
            .lock()
            .expect("suppression registry lock poisoned")
            .get(&interaction)
            .is_some_and(|count| *count > 0)
    }

    fn acquire_all(&self) {
        let mut holds = self
            .holds
            .lock()
            .expect("suppression registry lock poisoned");
        for interaction in Interaction::ALL {
            *holds.entry(interaction).or_insert(0) += 1;
        }
    }

    fn release_all(&self) {
        let mut holds = self
            .holds
            .lock()
            .expect("suppression registry lock poisoned");
        for interaction in Interaction::ALL {
            if let Some(count) = holds.get_mut(&interaction) {
                *count = count.saturating_sub(1);
            }
        }
    }
}

/// RAII handle over the full suppression set. Created when a viewer session
/// opens; released when it is dropped, whichever exit path that happens on.
#[derive(Debug)]
pub struct InteractionGuard {
    registry: SuppressionRegistry,
}

impl InteractionGuard {
    pub fn engage(registry: &SuppressionRegistry) -> Self {
        registry.acquire_all();
        Self {
            registry: registry.clone(),
        }
    }
}

impl Drop for InteractionGuard {
    fn drop(&mut self) {
        self.registry.release_all();
    }
}
