use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::models::User;

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub user: User,
    pub created_at: DateTime<Utc>,
}

pub struct Session {
    data_dir: Option<PathBuf>,
    data: Option<SessionData>,
    current: watch::Sender<Option<User>>,
}

impl Session {
    /// A session persisted under `data_dir`; `None` keeps it in memory only.
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            data_dir,
            data: None,
            current,
        }
    }

    /// Load session from disk
    pub fn load(&mut self) -> Result<bool> {
        let Some(path) = self.session_path() else {
            return Ok(false);
        };
        if !path.exists() {
            return Ok(false);
        }

        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let data: SessionData =
            serde_json::from_str(&contents).context("Failed to parse session file")?;

        debug!(user = data.user.display_name(), "Session restored");
        self.set(Some(data));
        Ok(true)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        let (Some(path), Some(data)) = (self.session_path(), self.data.as_ref()) else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Record a successful login and persist it
    pub fn login(&mut self, user: User) -> Result<()> {
        info!(user = user.display_name(), "User logged in");
        self.set(Some(SessionData {
            user,
            created_at: Utc::now(),
        }));
        self.save()
    }

    /// Clear session data
    pub fn logout(&mut self) -> Result<()> {
        self.set(None);
        if let Some(path) = self.session_path() {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
        }
        info!("User logged out");
        Ok(())
    }

    /// Observe login/logout; the receiver sees the current user immediately.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.data.as_ref().map(|d| &d.user)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.current_user().and_then(|u| u.id)
    }

    pub fn is_logged_in(&self) -> bool {
        self.data.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().map(User::is_admin).unwrap_or(false)
    }

    pub fn is_tour_guide(&self) -> bool {
        self.current_user().map(User::is_tour_guide).unwrap_or(false)
    }

    pub fn logged_in_at(&self) -> Option<DateTime<Utc>> {
        self.data.as_ref().map(|d| d.created_at)
    }

    fn set(&mut self, data: Option<SessionData>) {
        self.current
            .send_replace(data.as_ref().map(|d| d.user.clone()));
        self.data = data;
    }

    fn session_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(SESSION_FILE))
    }
}
