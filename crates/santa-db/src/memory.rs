use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};

use santa_draw::Assignments;
use santa_types::{Participant, Wishlist};

use crate::{AssignmentStore, WishlistStore, check_new_assignment};

/// Process-local state. Everything is gone after a restart.
#[derive(Default)]
pub struct MemoryStore {
    assignments: Mutex<Assignments>,
    wishlists: Mutex<BTreeMap<Participant, Wishlist>>,
}

impl AssignmentStore for MemoryStore {
    fn get_assignment(&self, giver: &Participant) -> Result<Option<Participant>> {
        let assignments = self
            .assignments
            .lock()
            .map_err(|e| anyhow!("Assignment lock poisoned: {}", e))?;
        Ok(assignments.get(giver).cloned())
    }

    fn set_assignment(&self, giver: &Participant, recipient: &Participant) -> Result<()> {
        let mut assignments = self
            .assignments
            .lock()
            .map_err(|e| anyhow!("Assignment lock poisoned: {}", e))?;
        check_new_assignment(&assignments, giver, recipient)?;
        assignments.insert(giver.clone(), recipient.clone());
        Ok(())
    }

    fn assignments(&self) -> Result<Assignments> {
        let assignments = self
            .assignments
            .lock()
            .map_err(|e| anyhow!("Assignment lock poisoned: {}", e))?;
        Ok(assignments.clone())
    }
}

impl WishlistStore for MemoryStore {
    fn get_wishlist(&self, participant: &Participant) -> Result<Option<Wishlist>> {
        let wishlists = self
            .wishlists
            .lock()
            .map_err(|e| anyhow!("Wishlist lock poisoned: {}", e))?;
        Ok(wishlists.get(participant).cloned())
    }

    fn set_wishlist(&self, participant: &Participant, wishlist: &Wishlist) -> Result<()> {
        let mut wishlists = self
            .wishlists
            .lock()
            .map_err(|e| anyhow!("Wishlist lock poisoned: {}", e))?;
        wishlists.insert(participant.clone(), wishlist.clone());
        Ok(())
    }
}
