use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};

use santa_db::{Backend, StoreKind};
use santa_draw::DrawStrategy;

/// Placeholder session secret used when none is configured.
pub const DEV_SESSION_SECRET: &str = "dev-secret-change-me";

/// Accepted range for `SANTA_SESSION_DAYS`.
pub const SESSION_DAYS: std::ops::RangeInclusive<u32> = 1..=3650;

/// Where the participant list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    /// Comma separated names from `SANTA_PARTICIPANTS`.
    List(String),
    /// `participants.json` under the data directory.
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub backend: Backend,
    pub roster: RosterSource,
    pub strategy: DrawStrategy,
    pub session_secret: String,
    pub session_days: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("SANTA_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = get("SANTA_PORT")
            .or_else(|| get("PORT"))
            .unwrap_or_else(|| "5000".into())
            .trim()
            .parse()
            .context("SANTA_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let data_dir: PathBuf = get("SANTA_DATA_DIR").unwrap_or_else(|| "database".into()).into();
        let kind: StoreKind = get("SANTA_STORE")
            .unwrap_or_else(|| "json".into())
            .parse()
            .map_err(|e: String| anyhow!(e))
            .context("SANTA_STORE")?;
        let backend = match kind {
            StoreKind::Memory => Backend::Memory,
            StoreKind::Json => Backend::Json { dir: data_dir.clone() },
            StoreKind::Sqlite => Backend::Sqlite {
                path: get("SANTA_DB_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| data_dir.join("santa.db")),
            },
        };

        let roster = match get("SANTA_PARTICIPANTS") {
            Some(list) => RosterSource::List(list),
            None => RosterSource::File(data_dir.join("participants.json")),
        };

        let strategy: DrawStrategy = get("SANTA_DRAW_STRATEGY")
            .unwrap_or_else(|| "greedy".into())
            .parse()
            .map_err(|e: String| anyhow!(e))
            .context("SANTA_DRAW_STRATEGY")?;

        let session_secret = get("SANTA_SESSION_SECRET").unwrap_or_else(|| DEV_SESSION_SECRET.into());
        let session_days: u32 = get("SANTA_SESSION_DAYS")
            .unwrap_or_else(|| "30".into())
            .trim()
            .parse()
            .context("SANTA_SESSION_DAYS must be a whole number of days")?;
        if !SESSION_DAYS.contains(&session_days) {
            bail!(
                "SANTA_SESSION_DAYS must be between {} and {}, got {}",
                SESSION_DAYS.start(),
                SESSION_DAYS.end(),
                session_days
            );
        }

        Ok(Self {
            addr,
            backend,
            roster,
            strategy,
            session_secret,
            session_days,
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.session_secret == DEV_SESSION_SECRET
    }
}
