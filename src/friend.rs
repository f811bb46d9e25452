// 👥 Friend Entity - stable identity + running balance
//
// Identity (id), name and image never change after creation.
// Only the balance moves, and only through a bill split.

use serde::{Deserialize, Serialize};

// ============================================================================
// FRIEND ID
// ============================================================================

/// Opaque friend identifier, assigned once at creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FriendId(String);

impl FriendId {
    pub fn new(id: impl Into<String>) -> Self {
        FriendId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FriendId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FriendId {
    fn from(id: &str) -> Self {
        FriendId(id.to_string())
    }
}

impl From<String> for FriendId {
    fn from(id: String) -> Self {
        FriendId(id)
    }
}

// ============================================================================
// BALANCE STATUS
// ============================================================================

/// Which way the money flows between the user and a friend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    /// Negative balance: the user owes the friend
    YouOwe,
    /// Positive balance: the friend owes the user
    OwesYou,
    /// Zero balance
    Even,
}

impl BalanceStatus {
    pub fn from_balance(balance: f64) -> Self {
        if balance < 0.0 {
            BalanceStatus::YouOwe
        } else if balance > 0.0 {
            BalanceStatus::OwesYou
        } else {
            BalanceStatus::Even
        }
    }
}

// ============================================================================
// FRIEND ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    id: FriendId,
    name: String,
    image_url: String,
    balance: f64,
}

impl Friend {
    /// New friends always start settled
    pub fn new(id: FriendId, name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self::with_balance(id, name, image_url, 0.0)
    }

    pub fn with_balance(
        id: FriendId,
        name: impl Into<String>,
        image_url: impl Into<String>,
        balance: f64,
    ) -> Self {
        Friend {
            id,
            name: name.into(),
            image_url: image_url.into(),
            balance,
        }
    }

    pub fn id(&self) -> &FriendId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::from_balance(self.balance)
    }

    /// Copy of this friend with `delta` applied to the balance
    pub(crate) fn adjusted(&self, delta: f64) -> Friend {
        Friend {
            balance: self.balance + delta,
            ..self.clone()
        }
    }

    /// Human-readable balance line, e.g. "You owe Clark $7"
    pub fn balance_label(&self) -> String {
        let amount = self.balance.abs();
        match self.status() {
            BalanceStatus::YouOwe => format!("You owe {} ${}", self.name, amount),
            BalanceStatus::OwesYou => format!("{} owes you ${}", self.name, amount),
            BalanceStatus::Even => format!("You and {} are even", self.name),
        }
    }
}

/// The three friends every fresh ledger starts with
pub fn seed_friends() -> Vec<Friend> {
    vec![
        Friend::with_balance(
            FriendId::from("118836"),
            "Clark",
            "https://i.pravatar.cc/48?u=118836",
            -7.0,
        ),
        Friend::with_balance(
            FriendId::from("933372"),
            "Sarah",
            "https://i.pravatar.cc/48?u=933372",
            20.0,
        ),
        Friend::with_balance(
            FriendId::from("499476"),
            "Anthony",
            "https://i.pravatar.cc/48?u=499476",
            0.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_friend_is_even() {
        let friend = Friend::new(FriendId::from("D1"), "Dana", "http://x");
        assert_eq!(friend.balance(), 0.0);
        assert_eq!(friend.status(), BalanceStatus::Even);
        assert_eq!(friend.id().as_str(), "D1");
    }

    #[test]
    fn test_balance_labels() {
        let seeds = seed_friends();
        assert_eq!(seeds[0].balance_label(), "You owe Clark $7");
        assert_eq!(seeds[1].balance_label(), "Sarah owes you $20");
        assert_eq!(seeds[2].balance_label(), "You and Anthony are even");

        let half = Friend::with_balance(FriendId::from("h"), "Half", "", -2.5);
        assert_eq!(half.balance_label(), "You owe Half $2.5");
    }

    #[test]
    fn test_adjusted_keeps_identity() {
        let clark = seed_friends().remove(0);
        let next = clark.adjusted(60.0);

        assert_eq!(next.id(), clark.id());
        assert_eq!(next.name(), clark.name());
        assert_eq!(next.image_url(), clark.image_url());
        assert_eq!(next.balance(), 53.0);
        // Original value untouched
        assert_eq!(clark.balance(), -7.0);
    }

    #[test]
    fn test_seed_ids_unique() {
        let seeds = seed_friends();
        assert_eq!(seeds.len(), 3);
        assert_ne!(seeds[0].id(), seeds[1].id());
        assert_ne!(seeds[1].id(), seeds[2].id());
        assert_ne!(seeds[0].id(), seeds[2].id());
    }

    #[test]
    fn test_friend_id_serializes_as_string() {
        let json = serde_json::to_string(&FriendId::from("118836")).unwrap();
        assert_eq!(json, "\"118836\"");
    }
}
