//! Command dispatch for the `td` binary.

pub mod auth;
pub mod tasks;

use anyhow::Result;

use crate::cli::{Cli, Command};
use crate::output;
use crate::session::Session;
use crate::store::StoreError;

pub async fn handle(cli: Cli) -> Result<()> {
    let mut session = Session::load();
    let result = dispatch(cli, &mut session).await;

    // A rejected token means the stored session is stale. Drop it so the
    // next invocation starts cleanly logged out.
    if let Err(err) = &result {
        if matches!(err.downcast_ref::<StoreError>(), Some(StoreError::Unauthorized(_)))
            && session.token().is_some()
        {
            session.clear().ok();
            output::warning("Session expired. Run `td login` to sign in again.");
        }
    }

    result
}

async fn dispatch(cli: Cli, session: &mut Session) -> Result<()> {
    match cli.command {
        Command::Register {
            name,
            email,
            password,
        } => auth::register(session, name, email, password).await,
        Command::Login { email, password } => auth::login(session, email, password).await,
        Command::Guest => auth::guest(session),
        Command::Logout => auth::logout(session),
        Command::Whoami => auth::whoami(session).await,
        Command::Dashboard => tasks::dashboard(session).await,
        Command::List { status, search } => tasks::list(session, status, search).await,
        Command::Show { id } => tasks::show(session, &id).await,
        Command::Add {
            title,
            description,
            status,
            priority,
        } => tasks::add(session, title, description, status, priority).await,
        Command::Edit {
            id,
            title,
            description,
            status,
            priority,
        } => tasks::edit(session, &id, title, description, status, priority).await,
        Command::Rm { id, yes } => tasks::rm(session, &id, yes).await,
    }
}
