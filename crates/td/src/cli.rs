//! Command-line surface of `td`.

use clap::{Parser, Subcommand};

use crate::store::{TaskPriority, TaskStatus};

#[derive(Parser)]
#[command(
    name = "td",
    about = "Manage your tasks from the terminal",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a server account and log in
    Register {
        /// Display name for the new account
        #[arg(long)]
        name: String,
        /// Email address to register
        #[arg(long)]
        email: String,
        /// Password (prompted without echo when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Log in to the server
    Login {
        /// Email address of the account
        #[arg(long)]
        email: String,
        /// Password (prompted without echo when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Use td without an account; tasks are stored on this machine only
    Guest,

    /// Clear the saved session
    Logout,

    /// Show the identity behind the current session
    Whoami,

    /// Show your profile and task list in one view
    Dashboard,

    /// List tasks
    List {
        /// Only show tasks with this status
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        /// Only show tasks whose title contains this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one task in full
    Show {
        /// Task id (as printed by `td list`)
        id: String,
    },

    /// Add a new task
    Add {
        /// Task title
        title: String,
        /// Longer description
        #[arg(long, short = 'd')]
        description: Option<String>,
        /// Initial status (defaults to pending)
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        /// Initial priority (defaults to medium)
        #[arg(long, value_enum)]
        priority: Option<TaskPriority>,
    },

    /// Change fields of an existing task
    Edit {
        /// Task id (as printed by `td list`)
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long, short = 'd')]
        description: Option<String>,
        /// New status
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        /// New priority
        #[arg(long, value_enum)]
        priority: Option<TaskPriority>,
    },

    /// Delete a task
    Rm {
        /// Task id (as printed by `td list`)
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
