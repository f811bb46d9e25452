// 🗂️ Friend Ledger Store - the single owner of ledger state
//
// State machine over {friends, selected_friend_id, is_add_panel_open}:
//
//   | state               | set by            | cleared by                          |
//   |---------------------|-------------------|-------------------------------------|
//   | is_add_panel_open   | toggle_add_panel  | add_friend, select_friend           |
//   | selected_friend_id  | select_friend     | toggle_add_panel, split_bill        |
//   | friends             | add_friend (push) | never (split_bill replaces a record)|
//
// Every operation either fully applies or returns an error with no change.

use crate::error::{LedgerError, LedgerResult, ValidationError};
use crate::friend::{seed_friends, Friend, FriendId};
use crate::history::{EventKind, History, LedgerEvent};
use crate::ids::IdGenerator;
use crate::split::{BillSplit, Payer};
use serde::Serialize;

// ============================================================================
// LEDGER STATE (read-only snapshot for presentation layers)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerState {
    friends: Vec<Friend>,
    selected_friend_id: Option<FriendId>,
    is_add_panel_open: bool,
}

impl LedgerState {
    fn new(friends: Vec<Friend>) -> Self {
        LedgerState {
            friends,
            selected_friend_id: None,
            is_add_panel_open: false,
        }
    }

    /// Friends in insertion order
    pub fn friends(&self) -> &[Friend] {
        &self.friends
    }

    pub fn selected_friend_id(&self) -> Option<&FriendId> {
        self.selected_friend_id.as_ref()
    }

    pub fn is_add_panel_open(&self) -> bool {
        self.is_add_panel_open
    }

    pub fn friend(&self, id: &FriendId) -> Option<&Friend> {
        self.friends.iter().find(|f| f.id() == id)
    }

    pub fn selected_friend(&self) -> Option<&Friend> {
        self.selected_friend_id.as_ref().and_then(|id| self.friend(id))
    }

    pub fn is_selected(&self, id: &FriendId) -> bool {
        self.selected_friend_id.as_ref() == Some(id)
    }

    fn position(&self, id: &FriendId) -> Option<usize> {
        self.friends.iter().position(|f| f.id() == id)
    }
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Clone)]
pub struct FriendLedgerStore {
    state: LedgerState,
    history: History,
}

impl FriendLedgerStore {
    /// Store seeded with the three starter friends
    pub fn new() -> Self {
        Self::with_friends(seed_friends())
    }

    /// Store with no friends at all
    pub fn empty() -> Self {
        Self::with_friends(Vec::new())
    }

    fn with_friends(friends: Vec<Friend>) -> Self {
        FriendLedgerStore {
            state: LedgerState::new(friends),
            history: History::new(),
        }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> LedgerState {
        self.state.clone()
    }

    pub fn history(&self) -> &[LedgerEvent] {
        self.history.events()
    }

    pub fn last_event(&self) -> Option<&LedgerEvent> {
        self.history.last()
    }

    /// Flip the add-friend panel. Always clears the selection.
    ///
    /// Returns the new panel visibility.
    pub fn toggle_add_panel(&mut self) -> bool {
        self.state.is_add_panel_open = !self.state.is_add_panel_open;
        self.state.selected_friend_id = None;

        let open = self.state.is_add_panel_open;
        tracing::debug!(open, "add panel toggled");
        self.history.record(EventKind::AddPanelToggled { open });
        open
    }

    /// Append a new friend with a zero balance and close the add panel.
    ///
    /// Name and image URL must be non-blank. The selection is left as is.
    pub fn add_friend<G>(&mut self, name: &str, image_url: &str, ids: &mut G) -> LedgerResult<FriendId>
    where
        G: IdGenerator + ?Sized,
    {
        let name = name.trim();
        let image_url = image_url.trim();

        if name.is_empty() {
            tracing::warn!("add_friend refused: empty name");
            return Err(ValidationError::required("name").into());
        }
        if image_url.is_empty() {
            tracing::warn!("add_friend refused: empty image url");
            return Err(ValidationError::required("image_url").into());
        }

        let id = ids.next_id();
        if self.state.position(&id).is_some() {
            tracing::warn!(%id, "add_friend refused: generator returned a duplicate id");
            return Err(ValidationError::new("id", format!("Duplicate friend id {}", id)).into());
        }

        self.state.friends.push(Friend::new(id.clone(), name, image_url));
        self.state.is_add_panel_open = false;

        tracing::debug!(%id, name, "friend added");
        self.history.record(EventKind::FriendAdded {
            friend_id: id.clone(),
            name: name.to_string(),
        });
        Ok(id)
    }

    /// Toggle-select: picking the selected friend again clears the selection.
    /// Always closes the add panel.
    ///
    /// Returns the selection after the call.
    pub fn select_friend(&mut self, friend_id: &FriendId) -> LedgerResult<Option<FriendId>> {
        if self.state.position(friend_id).is_none() {
            tracing::warn!(id = %friend_id, "select_friend refused: unknown id");
            return Err(LedgerError::InvalidReference(friend_id.clone()));
        }

        let already_selected = self.state.selected_friend_id.as_ref() == Some(friend_id);
        self.state.is_add_panel_open = false;

        if already_selected {
            self.state.selected_friend_id = None;
            tracing::debug!(id = %friend_id, "friend deselected");
            self.history.record(EventKind::FriendDeselected {
                friend_id: friend_id.clone(),
            });
        } else {
            self.state.selected_friend_id = Some(friend_id.clone());
            tracing::debug!(id = %friend_id, "friend selected");
            self.history.record(EventKind::FriendSelected {
                friend_id: friend_id.clone(),
            });
        }

        Ok(self.state.selected_friend_id.clone())
    }

    /// Split a bill with the selected friend; see [`BillSplit::delta`].
    pub fn split_bill(&mut self, paid_by: Payer, bill_total: f64, user_expense: f64) -> LedgerResult<&Friend> {
        self.apply_split(BillSplit::new(paid_by, bill_total, user_expense))
    }

    /// Apply `split.delta()` to the selected friend's balance and clear the selection.
    pub fn apply_split(&mut self, split: BillSplit) -> LedgerResult<&Friend> {
        let id = match &self.state.selected_friend_id {
            Some(id) => id.clone(),
            None => {
                tracing::warn!("split_bill refused: no friend selected");
                return Err(LedgerError::NoSelection);
            }
        };

        if let Err(err) = split.validate() {
            tracing::warn!(error = %err, "split_bill refused");
            return Err(err.into());
        }

        let index = self
            .state
            .position(&id)
            .ok_or_else(|| LedgerError::InvalidReference(id.clone()))?;

        let delta = split.delta();
        let updated = self.state.friends[index].adjusted(delta);
        let balance = updated.balance();
        self.state.friends[index] = updated;
        self.state.selected_friend_id = None;

        tracing::debug!(%id, delta, balance, "bill split");
        self.history.record(EventKind::BillSplit {
            friend_id: id,
            split,
            delta,
            balance,
        });
        Ok(&self.state.friends[index])
    }
}

impl Default for FriendLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}
