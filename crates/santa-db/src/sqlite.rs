use std::path::Path;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use santa_draw::Assignments;
use santa_types::{Participant, Wishlist};

use crate::{AssignmentStore, WishlistStore};

/// SQLite backend. Recipient uniqueness and write-once givers are enforced
/// by the schema itself.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        run_migrations(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, mostly useful for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }
}

impl AssignmentStore for SqliteStore {
    fn get_assignment(&self, giver: &Participant) -> Result<Option<Participant>> {
        self.with_conn(|conn| {
            let recipient: Option<String> = conn
                .query_row(
                    "SELECT recipient FROM assignments WHERE giver = ?1",
                    [giver.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            recipient.map(to_participant).transpose()
        })
    }

    fn set_assignment(&self, giver: &Participant, recipient: &Participant) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO assignments (giver, recipient) VALUES (?1, ?2)",
                (giver.as_str(), recipient.as_str()),
            )?;
            Ok(())
        })
    }

    fn assignments(&self) -> Result<Assignments> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT giver, recipient FROM assignments")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|(giver, recipient)| -> Result<(Participant, Participant)> {
                    Ok((to_participant(giver)?, to_participant(recipient)?))
                })
                .collect()
        })
    }
}

impl WishlistStore for SqliteStore {
    fn get_wishlist(&self, participant: &Participant) -> Result<Option<Wishlist>> {
        self.with_conn(|conn| {
            let items: Option<[String; 3]> = conn
                .query_row(
                    "SELECT item1, item2, item3 FROM wishlists WHERE participant = ?1",
                    [participant.as_str()],
                    |row| Ok([row.get(0)?, row.get(1)?, row.get(2)?]),
                )
                .optional()?;
            Ok(items.map(Wishlist::new))
        })
    }

    fn set_wishlist(&self, participant: &Participant, wishlist: &Wishlist) -> Result<()> {
        let [item1, item2, item3] = wishlist.items();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO wishlists (participant, item1, item2, item3) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(participant) DO UPDATE SET
                    item1 = excluded.item1,
                    item2 = excluded.item2,
                    item3 = excluded.item3,
                    updated_at = datetime('now')",
                (participant.as_str(), item1, item2, item3),
            )?;
            Ok(())
        })
    }
}

fn to_participant(name: String) -> Result<Participant> {
    Participant::try_from(name).map_err(|e| anyhow!(e))
}

fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE assignments (
                giver       TEXT PRIMARY KEY,
                recipient   TEXT NOT NULL UNIQUE CHECK (recipient <> giver),
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE wishlists (
                participant TEXT PRIMARY KEY,
                item1       TEXT NOT NULL,
                item2       TEXT NOT NULL,
                item3       TEXT NOT NULL,
                updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> Participant {
        Participant::parse(name).unwrap()
    }

    #[test]
    fn wishlist_upsert() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = Wishlist::new(["a".into(), "b".into(), "c".into()]);
        let second = Wishlist::new(["d".into(), "e".into(), "f".into()]);

        store.set_wishlist(&p("ana"), &first).unwrap();
        assert_eq!(store.get_wishlist(&p("ana")).unwrap(), Some(first));
        store.set_wishlist(&p("ana"), &second).unwrap();
        assert_eq!(store.get_wishlist(&p("ana")).unwrap(), Some(second));
        assert_eq!(store.get_wishlist(&p("luis")).unwrap(), None);
    }

    #[test]
    fn schema_rejects_bad_assignments() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set_assignment(&p("ana"), &p("luis")).unwrap();

        assert!(store.set_assignment(&p("ana"), &p("carla")).is_err());
        assert!(store.set_assignment(&p("carla"), &p("luis")).is_err());
        assert!(store.set_assignment(&p("carla"), &p("carla")).is_err());

        let all = store.assignments().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all.get(&p("ana")), Some(&p("luis")));
    }

    #[test]
    fn reopen_keeps_rows_and_skips_migrations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("santa.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.set_assignment(&p("ana"), &p("luis")).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get_assignment(&p("ana")).unwrap(), Some(p("luis")));
        assert_eq!(store.get_assignment(&p("luis")).unwrap(), None);
    }
}
