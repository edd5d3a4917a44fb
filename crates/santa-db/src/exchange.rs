use std::sync::{Arc, Mutex};

use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

use santa_draw::{DrawError, DrawStrategy, Pick};
use santa_types::{Participant, Roster, Wishlist};

use crate::Store;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error("store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

/// What the options page needs to know about a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub recipient: Option<Participant>,
    pub has_wishlist: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientWishlist {
    /// The participant has not drawn anyone yet.
    NoRecipient,
    /// The recipient exists but has not submitted a wishlist.
    NotSubmitted(Participant),
    Ready(Participant, Wishlist),
}

/// The draw engine bound to a roster and a store.
///
/// Draws are serialized behind `draw_lock` so the read of taken recipients
/// and the write of the new edge happen as one step.
pub struct Exchange {
    roster: Roster,
    store: Arc<dyn Store>,
    strategy: DrawStrategy,
    draw_lock: Mutex<()>,
}

impl Exchange {
    pub fn new(roster: Roster, store: Arc<dyn Store>, strategy: DrawStrategy) -> Self {
        Self {
            roster,
            store,
            strategy,
            draw_lock: Mutex::new(()),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn strategy(&self) -> DrawStrategy {
        self.strategy
    }

    /// Match a typed login name against the roster, ignoring case.
    pub fn login(&self, raw_name: &str) -> Option<Participant> {
        self.roster.find(raw_name).cloned()
    }

    pub fn assign(&self, requester: &Participant) -> Result<Participant, ExchangeError> {
        self.assign_with(requester, &mut rand::rng())
    }

    pub fn assign_with<R: Rng + ?Sized>(
        &self,
        requester: &Participant,
        rng: &mut R,
    ) -> Result<Participant, ExchangeError> {
        let _guard = self
            .draw_lock
            .lock()
            .map_err(|e| anyhow::anyhow!("Draw lock poisoned: {}", e))?;

        let existing = self.store.assignments()?;
        let pick = match santa_draw::draw(self.strategy, requester, &self.roster, &existing, rng) {
            Ok(pick) => pick,
            Err(e) => {
                warn!("Draw for {} failed: {}", requester, e);
                return Err(e.into());
            }
        };

        if let Pick::New(recipient) = &pick {
            self.store.set_assignment(requester, recipient)?;
            info!(
                "Recorded assignment for {} ({} of {} drawn)",
                requester,
                existing.len() + 1,
                self.roster.len()
            );
        }
        Ok(pick.into_recipient())
    }

    pub fn status(&self, participant: &Participant) -> Result<Status, ExchangeError> {
        Ok(Status {
            recipient: self.store.get_assignment(participant)?,
            has_wishlist: self.store.get_wishlist(participant)?.is_some(),
        })
    }

    pub fn wishlist(&self, participant: &Participant) -> Result<Option<Wishlist>, ExchangeError> {
        Ok(self.store.get_wishlist(participant)?)
    }

    pub fn save_wishlist(
        &self,
        participant: &Participant,
        wishlist: &Wishlist,
    ) -> Result<(), ExchangeError> {
        self.store.set_wishlist(participant, wishlist)?;
        info!("Saved wishlist for {}", participant);
        Ok(())
    }

    pub fn recipient_wishlist(
        &self,
        participant: &Participant,
    ) -> Result<RecipientWishlist, ExchangeError> {
        let Some(recipient) = self.store.get_assignment(participant)? else {
            return Ok(RecipientWishlist::NoRecipient);
        };
        Ok(match self.store.get_wishlist(&recipient)? {
            Some(wishlist) => RecipientWishlist::Ready(recipient, wishlist),
            None => RecipientWishlist::NotSubmitted(recipient),
        })
    }
}
