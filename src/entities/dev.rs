// 👩‍💻 Dev Entity - receives freebies and can pass them on
//
// Ownership lives on the freebie (dev_id), so every check here is a scan over
// freebie rows rather than a collection kept on the dev.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::freebie::Freebie;

// ============================================================================
// DEV ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dev {
    /// Row id, assigned by storage on insert (None until persisted)
    pub id: Option<i64>,

    pub name: String,
}

// ============================================================================
// GIVE-AWAY OUTCOME
// ============================================================================

/// Result of `Dev::give_away`. Refusal is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GiveAway {
    /// Ownership moved to the receiver
    Transferred { message: String },

    /// Freebie belongs to someone else (or no one); nothing changed
    NotOwned { message: String },

    /// Receiver has no id yet, so there is nothing to point dev_id at; nothing changed
    ReceiverNotSaved { message: String },
}

impl GiveAway {
    pub fn is_transferred(&self) -> bool {
        matches!(self, GiveAway::Transferred { .. })
    }

    /// Human-readable notification for either outcome
    pub fn message(&self) -> &str {
        match self {
            GiveAway::Transferred { message }
            | GiveAway::NotOwned { message }
            | GiveAway::ReceiverNotSaved { message } => message,
        }
    }
}

impl Dev {
    /// Create a new, not yet persisted dev
    pub fn new(name: impl Into<String>) -> Self {
        Dev {
            id: None,
            name: name.into(),
        }
    }

    /// Does this dev own `freebie` right now?
    ///
    /// An unpersisted dev owns nothing, even a freebie whose dev_id is also None.
    pub fn owns(&self, freebie: &Freebie) -> bool {
        self.id.is_some() && freebie.dev_id == self.id
    }

    /// True if any freebie owned by this dev is named exactly `item_name`.
    ///
    /// `freebies` may be the dev's own collection or the whole table; rows
    /// owned by other devs are skipped.
    pub fn received_one(&self, freebies: &[Freebie], item_name: &str) -> bool {
        freebies
            .iter()
            .any(|f| self.owns(f) && f.item_name == item_name)
    }

    /// Hand `freebie` over to `receiver` if this dev owns it and the receiver
    /// has been saved (an unsaved receiver would leave the freebie ownerless).
    ///
    /// Mutates only the in-memory freebie; call `db::save_freebie` to make the
    /// transfer durable. Exactly one notification is logged either way.
    pub fn give_away(&self, receiver: &Dev, freebie: &mut Freebie) -> GiveAway {
        if !self.owns(freebie) {
            let message = format!(
                "{} cannot give away {} because it does not belong to them.",
                self.name, freebie.item_name
            );
            warn!(giver = %self.name, item = %freebie.item_name, "{}", message);
            return GiveAway::NotOwned { message };
        }

        let Some(receiver_id) = receiver.id else {
            let message = format!(
                "{} cannot give {} to {} because {} has not been saved yet.",
                self.name, freebie.item_name, receiver.name, receiver.name
            );
            warn!(
                giver = %self.name,
                receiver = %receiver.name,
                item = %freebie.item_name,
                "{}",
                message
            );
            return GiveAway::ReceiverNotSaved { message };
        };

        freebie.dev_id = Some(receiver_id);

        let message = format!(
            "{} gave {} to {}.",
            self.name, freebie.item_name, receiver.name
        );
        info!(
            giver = %self.name,
            receiver = %receiver.name,
            item = %freebie.item_name,
            "{}",
            message
        );
        GiveAway::Transferred { message }
    }
}

// ============================================================================
// TESTS
// ============================================================================
