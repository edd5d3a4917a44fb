//! Recipient selection for the gift exchange.
//!
//! The engine is pure: it looks at the roster and the assignments made so
//! far and decides who the requester gives to. Recording the result is the
//! caller's job (see `santa_db::Exchange`).

pub mod strategy;

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use rand::seq::IndexedRandom;
use thiserror::Error;
use tracing::debug;

use santa_types::{Participant, Roster};

pub use strategy::DrawStrategy;

/// Giver -> recipient edges made so far.
pub type Assignments = BTreeMap<Participant, Participant>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("{0} is not on the roster")]
    UnknownParticipant(Participant),

    #[error("no participants left to assign to {0}")]
    Exhausted(Participant),
}

/// Result of a successful draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick {
    /// The requester already had a recipient; nothing to record.
    Existing(Participant),
    /// A fresh recipient that must be stored for the requester.
    New(Participant),
}

impl Pick {
    pub fn recipient(&self) -> &Participant {
        match self {
            Pick::Existing(p) | Pick::New(p) => p,
        }
    }

    pub fn into_recipient(self) -> Participant {
        match self {
            Pick::Existing(p) | Pick::New(p) => p,
        }
    }
}

/// Roster members nobody gives to yet, excluding the requester.
pub fn candidates<'a>(
    requester: &Participant,
    roster: &'a Roster,
    existing: &Assignments,
) -> Vec<&'a Participant> {
    let taken: BTreeSet<&Participant> = existing.values().collect();
    roster
        .members()
        .iter()
        .filter(|p| !taken.contains(p) && *p != requester)
        .collect()
}

/// Pick a recipient for `requester`.
///
/// Repeat calls for a requester that already has a recipient return that
/// recipient unchanged. Otherwise one of the remaining candidates is chosen
/// uniformly at random, subject to `strategy`.
pub fn draw<R: Rng + ?Sized>(
    strategy: DrawStrategy,
    requester: &Participant,
    roster: &Roster,
    existing: &Assignments,
    rng: &mut R,
) -> Result<Pick, DrawError> {
    if !roster.contains(requester) {
        return Err(DrawError::UnknownParticipant(requester.clone()));
    }

    if let Some(recipient) = existing.get(requester) {
        return Ok(Pick::Existing(recipient.clone()));
    }

    let pool = candidates(requester, roster, existing);
    let pool = strategy.narrow(requester, roster, existing, pool);
    debug!(
        "Drawing for {} among {} candidate(s) ({:?})",
        requester,
        pool.len(),
        strategy
    );

    pool.choose(rng)
        .map(|p| Pick::New((*p).clone()))
        .ok_or_else(|| DrawError::Exhausted(requester.clone()))
}
