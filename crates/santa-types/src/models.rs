use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of items every wishlist holds.
pub const WISHLIST_LEN: usize = 3;

/// A participant identifier: trimmed and lowercased, never empty.
///
/// Login is case-insensitive because every name, whether typed into the
/// login form or loaded from the roster, goes through the same
/// normalization before comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Participant(String);

impl Participant {
    pub fn parse(raw: &str) -> Option<Self> {
        let name = raw.trim().to_lowercase();
        if name.is_empty() {
            None
        } else {
            Some(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name with its first letter capitalized, for display.
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl TryFrom<String> for Participant {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid participant name: {:?}", value))
    }
}

impl From<Participant> for String {
    fn from(p: Participant) -> Self {
        p.0
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Participant {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The fixed, ordered list of people taking part in the exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    members: Vec<Participant>,
}

impl Roster {
    /// Build a roster from raw names. Blank names are skipped and
    /// duplicates (after normalization) keep their first position.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut members: Vec<Participant> = Vec::new();
        for name in names {
            if let Some(p) = Participant::parse(name.as_ref()) {
                if !members.contains(&p) {
                    members.push(p);
                }
            }
        }
        Self { members }
    }

    /// Look up a raw login name against the roster.
    pub fn find(&self, raw: &str) -> Option<&Participant> {
        let wanted = Participant::parse(raw)?;
        self.members.iter().find(|p| **p == wanted)
    }

    pub fn contains(&self, participant: &Participant) -> bool {
        self.members.contains(participant)
    }

    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Exactly three free-text wishes, replaced wholesale on every submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist([String; WISHLIST_LEN]);

impl Wishlist {
    pub fn new(items: [String; WISHLIST_LEN]) -> Self {
        Self(items.map(|item| item.trim().to_string()))
    }

    pub fn items(&self) -> &[String; WISHLIST_LEN] {
        &self.0
    }
}
