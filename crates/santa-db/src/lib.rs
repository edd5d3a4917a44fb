pub mod exchange;
pub mod json;
pub mod memory;
pub mod roster;
pub mod sqlite;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::info;

use santa_draw::Assignments;
use santa_types::{Participant, Wishlist};

pub use exchange::{Exchange, ExchangeError, RecipientWishlist, Status};
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Giver -> recipient edges. Recorded edges are never rewritten.
pub trait AssignmentStore: Send + Sync {
    fn get_assignment(&self, giver: &Participant) -> Result<Option<Participant>>;
    fn set_assignment(&self, giver: &Participant, recipient: &Participant) -> Result<()>;
    fn assignments(&self) -> Result<Assignments>;
}

/// Participant -> wishlist, replaced wholesale on every write.
pub trait WishlistStore: Send + Sync {
    fn get_wishlist(&self, participant: &Participant) -> Result<Option<Wishlist>>;
    fn set_wishlist(&self, participant: &Participant, wishlist: &Wishlist) -> Result<()>;
}

/// A backend holding both assignments and wishlists.
pub trait Store: AssignmentStore + WishlistStore {}

impl<T: AssignmentStore + WishlistStore> Store for T {}

/// Which backend to open, selected by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Json { dir: PathBuf },
    Sqlite { path: PathBuf },
}

impl Backend {
    pub fn kind(&self) -> StoreKind {
        match self {
            Backend::Memory => StoreKind::Memory,
            Backend::Json { .. } => StoreKind::Json,
            Backend::Sqlite { .. } => StoreKind::Sqlite,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Json,
    Sqlite,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "json" => Ok(StoreKind::Json),
            "sqlite" => Ok(StoreKind::Sqlite),
            other => Err(format!(
                "unknown store {:?} (expected memory, json or sqlite)",
                other
            )),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Memory => f.write_str("memory"),
            StoreKind::Json => f.write_str("json"),
            StoreKind::Sqlite => f.write_str("sqlite"),
        }
    }
}

pub fn open(backend: &Backend) -> Result<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match backend {
        Backend::Memory => {
            info!("Using in-memory store; state is lost on restart");
            Arc::new(MemoryStore::default())
        }
        Backend::Json { dir } => Arc::new(JsonStore::open(dir)?),
        Backend::Sqlite { path } => Arc::new(SqliteStore::open(path)?),
    };
    Ok(store)
}

/// Reject edges that would rewrite a giver or reuse a recipient.
pub(crate) fn check_new_assignment(
    existing: &Assignments,
    giver: &Participant,
    recipient: &Participant,
) -> Result<()> {
    if giver == recipient {
        bail!("{} cannot be assigned to themselves", giver);
    }
    if let Some(current) = existing.get(giver) {
        bail!("{} already gives to {}", giver, current);
    }
    if let Some((other, _)) = existing.iter().find(|(_, r)| *r == recipient) {
        bail!("{} is already assigned to {}", recipient, other);
    }
    Ok(())
}
