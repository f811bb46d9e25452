// 🧾 Bill Split - who paid, how much each side spent
//
// The friend's share is never stored; it is always bill_total - user_expense.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payer {
    User,
    Friend,
}

impl Payer {
    pub fn from_paid_by_user(paid_by_user: bool) -> Self {
        if paid_by_user {
            Payer::User
        } else {
            Payer::Friend
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Payer::User => Payer::Friend,
            Payer::Friend => Payer::User,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillSplit {
    pub paid_by: Payer,
    pub bill_total: f64,
    pub user_expense: f64,
}

impl BillSplit {
    pub fn new(paid_by: Payer, bill_total: f64, user_expense: f64) -> Self {
        BillSplit {
            paid_by,
            bill_total,
            user_expense,
        }
    }

    pub fn friend_expense(&self) -> f64 {
        self.bill_total - self.user_expense
    }

    /// Signed change to the friend's balance.
    ///
    /// User paid: the friend owes their share (+friend_expense).
    /// Friend paid: the user owes their share (-user_expense).
    pub fn delta(&self) -> f64 {
        match self.paid_by {
            Payer::User => self.friend_expense(),
            Payer::Friend => -self.user_expense,
        }
    }

    /// Requires 0 <= user_expense <= bill_total, all finite
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.bill_total.is_finite() {
            return Err(ValidationError::new("bill_total", "Must be a finite number"));
        }
        if !self.user_expense.is_finite() {
            return Err(ValidationError::new("user_expense", "Must be a finite number"));
        }
        if self.bill_total < 0.0 {
            return Err(ValidationError::new(
                "bill_total",
                format!("Must not be negative, got {}", self.bill_total),
            ));
        }
        if self.user_expense < 0.0 {
            return Err(ValidationError::new(
                "user_expense",
                format!("Must not be negative, got {}", self.user_expense),
            ));
        }
        if self.user_expense > self.bill_total {
            return Err(ValidationError::new(
                "user_expense",
                format!(
                    "Must not exceed the bill total ({} > {})",
                    self.user_expense, self.bill_total
                ),
            ));
        }
        Ok(())
    }
}
