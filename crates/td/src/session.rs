//! Persisted session state.
//!
//! One of three modes, saved as JSON in the app data dir so it survives
//! between invocations:
//!
//! ```text
//! LoggedOut --login/register--> Authenticated { token, user }
//! LoggedOut --guest-----------> Guest
//! Guest / Authenticated --logout--> LoggedOut
//! ```
//!
//! There is no direct edge between `Guest` and `Authenticated`; switching
//! modes always goes through an explicit logout. A stored token is trusted
//! optimistically on load; commands that reach the server find out whether
//! it still holds, and a rejection clears the session.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The sanitized user the server returns (never includes credentials).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum SessionState {
    #[default]
    LoggedOut,
    Guest,
    Authenticated { token: String, user: UserProfile },
}

#[derive(Debug)]
pub struct Session {
    state: SessionState,
    path: PathBuf,
}

impl Session {
    /// Restore the session from its default location. Never fails: an
    /// unreadable file is logged and treated as logged out.
    pub fn load() -> Self {
        Self::load_from(utils_assets::session_path())
    }

    pub fn load_from(path: PathBuf) -> Self {
        let state = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(err) => {
                    tracing::warn!(
                        "session file {} is unreadable, starting logged out: {err}",
                        path.display()
                    );
                    SessionState::LoggedOut
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => SessionState::LoggedOut,
            Err(err) => {
                tracing::warn!("could not read session file {}: {err}", path.display());
                SessionState::LoggedOut
            }
        };
        Self { state, path }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_guest(&self) -> bool {
        matches!(self.state, SessionState::Guest)
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match &self.state {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    /// Switch state and persist it.
    pub fn set(&mut self, state: SessionState) -> io::Result<()> {
        self.state = state;
        self.save()
    }

    /// Back to logged out; removes the session file entirely.
    pub fn clear(&mut self) -> io::Result<()> {
        self.state = SessionState::LoggedOut;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_vec_pretty(&self.state).map_err(io::Error::other)?;
        // Write-then-rename so a crash never leaves a half-written session.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)
    }
}
