//! This module handles the interaction context shared by all the flames.

use tracing::{debug, trace};

/// Identifies one flame within an [`InteractionContext`].
///
/// This is separate from the flame's [`RevealIndex`](fc_calendar::RevealIndex) because indices
/// aren't guaranteed to be unique.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlameId(usize);

/// What the pointer should look like.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Affordance {
    /// The normal cursor.
    #[default]
    Default,

    /// A cursor indicating that the thing under it can be clicked.
    Pointer,
}

/// The state shared between all the flames in a scene.
///
/// At most one flame owns the pointer affordance at a time. Claiming it always succeeds and
/// replaces the previous owner, but releasing it only has an effect when it comes from the
/// current owner. That way a leave from one flame can't clobber an enter on another flame,
/// whichever order the two events arrive in.
#[derive(Debug, Default)]
pub struct InteractionContext {
    /// The ID to give to the next registered flame.
    next_id: usize,

    /// The flame which currently wants the pointer affordance.
    owner: Option<FlameId>,
}

impl InteractionContext {
    /// Create a new context with no flames and the default affordance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new flame and return its ID.
    pub fn register(&mut self) -> FlameId {
        let id = FlameId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Claim (`active = true`) or release (`active = false`) the pointer affordance for the
    /// given flame.
    pub fn set_affordance(&mut self, id: FlameId, active: bool) {
        if active {
            if self.owner != Some(id) {
                debug!(?id, previous = ?self.owner, "Flame claimed the pointer affordance");
            }
            self.owner = Some(id);
        } else if self.owner == Some(id) {
            debug!(?id, "Flame released the pointer affordance");
            self.owner = None;
        } else {
            trace!(?id, owner = ?self.owner, "Ignoring release from a flame that isn't the owner");
        }
    }

    /// The current affordance.
    pub fn affordance(&self) -> Affordance {
        match self.owner {
            Some(_) => Affordance::Pointer,
            None => Affordance::Default,
        }
    }

    /// The flame that currently owns the affordance, if any.
    pub fn owner(&self) -> Option<FlameId> {
        self.owner
    }
}
