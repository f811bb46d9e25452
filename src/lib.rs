// Friend Ledger - Core Library
// Split bills with friends and track who owes whom.
// Exposes the store for the TUI, the API server, and tests.

pub mod config;
pub mod error;
pub mod friend;
pub mod history;
pub mod ids;
pub mod logging;
pub mod split;
pub mod store;

#[cfg(feature = "server")]
pub mod api;

// Only compile the UI module when the TUI feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use error::{LedgerError, LedgerResult, ValidationError};
pub use friend::{seed_friends, BalanceStatus, Friend, FriendId};
pub use history::{EventKind, LedgerEvent};
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use split::{BillSplit, Payer};
pub use store::{FriendLedgerStore, LedgerState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
