//! `td register`, `login`, `guest`, `logout` and `whoami`.

use anyhow::{Result, bail};

use crate::client::ApiClient;
use crate::output;
use crate::session::{Session, SessionState};

/// Mode switches always pass through an explicit logout; there is no
/// direct guest-to-account edge (or back).
fn ensure_logged_out(session: &Session, action: &str) -> Result<()> {
    match session.state() {
        SessionState::LoggedOut => Ok(()),
        SessionState::Guest => {
            bail!("You are in guest mode. Run `td logout` before you {action}.")
        }
        SessionState::Authenticated { user, .. } => {
            bail!(
                "You are already logged in as {}. Run `td logout` before you {action}.",
                user.email
            )
        }
    }
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Ok(output::prompt_password("Password")?),
    }
}

pub async fn register(
    session: &mut Session,
    name: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    ensure_logged_out(session, "register")?;
    let password = password_or_prompt(password)?;

    let api = ApiClient::from_env();
    let auth = api.register(name.trim(), email.trim(), &password).await?;

    let greeting = auth.user.name.clone();
    session.set(SessionState::Authenticated {
        token: auth.token,
        user: auth.user,
    })?;
    output::success(&format!("Welcome, {greeting}! Your account is ready."));
    Ok(())
}

pub async fn login(session: &mut Session, email: String, password: Option<String>) -> Result<()> {
    ensure_logged_out(session, "log in")?;
    let password = password_or_prompt(password)?;

    let api = ApiClient::from_env();
    let auth = api.login(email.trim(), &password).await?;

    let greeting = auth.user.name.clone();
    session.set(SessionState::Authenticated {
        token: auth.token,
        user: auth.user,
    })?;
    output::success(&format!("Logged in as {greeting}."));
    Ok(())
}

pub fn guest(session: &mut Session) -> Result<()> {
    if session.is_guest() {
        output::dim("You are already in guest mode.");
        return Ok(());
    }
    ensure_logged_out(session, "enter guest mode")?;

    session.set(SessionState::Guest)?;
    output::success("Guest mode enabled. Tasks stay on this machine and never reach a server.");
    Ok(())
}

pub fn logout(session: &mut Session) -> Result<()> {
    if matches!(session.state(), SessionState::LoggedOut) {
        output::dim("You are not logged in.");
        return Ok(());
    }
    session.clear()?;
    output::success("Logged out.");
    Ok(())
}

pub async fn whoami(session: &mut Session) -> Result<()> {
    match session.state().clone() {
        SessionState::LoggedOut => {
            output::dim("Not logged in. Run `td login`, `td register` or `td guest`.");
        }
        SessionState::Guest => {
            output::kv("mode", "guest");
            output::dim("Tasks are stored locally; register to keep them on a server account.");
        }
        SessionState::Authenticated { token, .. } => {
            // Ask the server rather than trusting the cached profile; this
            // is also how a stale token gets noticed and cleared.
            let api = ApiClient::from_env().with_token(token.clone());
            let user = api.me().await?;

            output::kv("name", &user.name);
            output::kv("email", &user.email);
            output::kv("id", &user.id);
            session.set(SessionState::Authenticated { token, user })?;
        }
    }
    Ok(())
}
