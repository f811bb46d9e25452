// Runtime configuration, read from the environment
//
//   FRIEND_LEDGER_ADDR     server bind address      (default 127.0.0.1:3000)
//   FRIEND_LEDGER_LOG      tracing filter           (default friend_ledger=info)
//   FRIEND_LEDGER_LOG_DIR  TUI log file directory   (default <tmp>/friend-ledger/logs)
//   FRIEND_LEDGER_EMPTY    start without seed data  (default false)

use crate::store::FriendLedgerStore;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_FILTER: &str = "friend_ledger=info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub log_filter: String,
    pub log_dir: PathBuf,
    pub start_empty: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Build from an explicit variable map (what `from_env` uses under the hood)
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let addr = get("FRIEND_LEDGER_ADDR").unwrap_or(DEFAULT_ADDR);
        let server_addr = addr
            .parse::<SocketAddr>()
            .map_err(|e| anyhow!("FRIEND_LEDGER_ADDR must be host:port, got '{}': {}", addr, e))?;

        let log_filter = get("FRIEND_LEDGER_LOG")
            .unwrap_or(DEFAULT_LOG_FILTER)
            .to_string();

        let log_dir = get("FRIEND_LEDGER_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("friend-ledger").join("logs"));

        let start_empty = match get("FRIEND_LEDGER_EMPTY") {
            None => false,
            Some(raw) => parse_bool(raw)
                .ok_or_else(|| anyhow!("FRIEND_LEDGER_EMPTY must be true or false, got '{}'", raw))?,
        };

        Ok(Config {
            server_addr,
            log_filter,
            log_dir,
            start_empty,
        })
    }

    /// Fresh store honoring `start_empty`
    pub fn new_store(&self) -> FriendLedgerStore {
        if self.start_empty {
            FriendLedgerStore::empty()
        } else {
            FriendLedgerStore::new()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_dir: std::env::temp_dir().join("friend-ledger").join("logs"),
            start_empty: false,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
