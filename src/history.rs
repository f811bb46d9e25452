// 📜 Activity History - what happened to the ledger, in order
//
// Append-only and in-memory. Only successful operations are recorded.

use crate::friend::FriendId;
use crate::split::BillSplit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    AddPanelToggled {
        open: bool,
    },
    FriendAdded {
        friend_id: FriendId,
        name: String,
    },
    FriendSelected {
        friend_id: FriendId,
    },
    /// Clicking the selected friend again
    FriendDeselected {
        friend_id: FriendId,
    },
    BillSplit {
        friend_id: FriendId,
        split: BillSplit,
        delta: f64,
        balance: f64,
    },
}

impl EventKind {
    pub fn friend_id(&self) -> Option<&FriendId> {
        match self {
            EventKind::AddPanelToggled { .. } => None,
            EventKind::FriendAdded { friend_id, .. }
            | EventKind::FriendSelected { friend_id }
            | EventKind::FriendDeselected { friend_id }
            | EventKind::BillSplit { friend_id, .. } => Some(friend_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl LedgerEvent {
    /// One-line description for status bars and the demo output
    pub fn describe(&self) -> String {
        match &self.kind {
            EventKind::AddPanelToggled { open: true } => "Opened add-friend form".to_string(),
            EventKind::AddPanelToggled { open: false } => "Closed add-friend form".to_string(),
            EventKind::FriendAdded { name, .. } => format!("Added {}", name),
            EventKind::FriendSelected { friend_id } => format!("Selected friend {}", friend_id),
            EventKind::FriendDeselected { friend_id } => format!("Deselected friend {}", friend_id),
            EventKind::BillSplit { split, delta, .. } => format!(
                "Split a bill of ${} (your expense ${}), balance change {:+}",
                split.bill_total, split.user_expense, delta
            ),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct History {
    events: Vec<LedgerEvent>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: EventKind) -> &LedgerEvent {
        let sequence = self.events.len() as u64 + 1;
        self.events.push(LedgerEvent {
            sequence,
            timestamp: Utc::now(),
            kind,
        });
        &self.events[self.events.len() - 1]
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&LedgerEvent> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events touching one friend, oldest first
    pub fn for_friend<'a>(&'a self, id: &'a FriendId) -> impl Iterator<Item = &'a LedgerEvent> + 'a {
        self.events
            .iter()
            .filter(move |event| event.kind.friend_id() == Some(id))
    }
}
