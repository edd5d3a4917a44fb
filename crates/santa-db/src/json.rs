use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info};

use santa_draw::Assignments;
use santa_types::{Participant, Wishlist};

use crate::{AssignmentStore, WishlistStore, check_new_assignment};

const ASSIGNMENTS_FILE: &str = "assignments.json";
const WISHLISTS_FILE: &str = "wishlists.json";

/// Flat-file backend: one pretty-printed JSON object per collection,
/// rewritten in full on every change.
pub struct JsonStore {
    assignments_path: PathBuf,
    wishlists_path: PathBuf,
    assignments: Mutex<Assignments>,
    wishlists: Mutex<BTreeMap<Participant, Wishlist>>,
}

impl JsonStore {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating data directory {}", dir.display()))?;

        let assignments_path = dir.join(ASSIGNMENTS_FILE);
        let wishlists_path = dir.join(WISHLISTS_FILE);
        let assignments: Assignments = read_or_seed(&assignments_path, Assignments::new())?;
        let wishlists: BTreeMap<Participant, Wishlist> =
            read_or_seed(&wishlists_path, BTreeMap::new())?;

        info!(
            "JSON store opened at {} ({} assignments, {} wishlists)",
            dir.display(),
            assignments.len(),
            wishlists.len()
        );
        Ok(Self {
            assignments_path,
            wishlists_path,
            assignments: Mutex::new(assignments),
            wishlists: Mutex::new(wishlists),
        })
    }
}

impl AssignmentStore for JsonStore {
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

        // Only commit in memory once the file is written.
        let mut next = assignments.clone();
        next.insert(giver.clone(), recipient.clone());
        write_pretty(&self.assignments_path, &next)?;
        *assignments = next;
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

impl WishlistStore for JsonStore {
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

        let mut next = wishlists.clone();
        next.insert(participant.clone(), wishlist.clone());
        write_pretty(&self.wishlists_path, &next)?;
        *wishlists = next;
        Ok(())
    }
}

/// Load `path`, or write `default` there first if it does not exist yet.
pub(crate) fn read_or_seed<T>(path: &Path, default: T) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    if !path.exists() {
        debug!("Seeding {}", path.display());
        write_pretty(path, &default)?;
        return Ok(default);
    }

    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Write `value` as 4-space indented JSON, replacing `path` atomically.
pub(crate) fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;

    let tmp = path.with_extension("json.tmp");
    {
        let mut file =
            fs::File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
        file.write_all(&buf)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}
