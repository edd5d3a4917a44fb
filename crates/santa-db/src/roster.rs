use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use santa_types::Roster;

use crate::json::read_or_seed;

/// On-disk roster format: `{"participants": ["ana", "luis", ...]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RosterFile {
    participants: Vec<String>,
}

/// Load the roster from `path`, creating an empty roster file on first run.
pub fn load(path: &Path) -> Result<Roster> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file: RosterFile = read_or_seed(path, RosterFile::default())?;
    let roster = Roster::new(&file.participants);
    if roster.is_empty() {
        warn!(
            "Roster at {} is empty; add names under \"participants\"",
            path.display()
        );
    } else {
        info!("Loaded {} participants from {}", roster.len(), path.display());
    }
    Ok(roster)
}

/// Parse a comma separated list such as `"Ana, Luis,carla"`.
pub fn from_list(list: &str) -> Roster {
    Roster::new(list.split(','))
}
