//! Terminal client for taskdeck.
//!
//! Commands work against a [`store::TaskStore`], which is either the remote
//! server API (logged-in sessions) or a local JSON file (guest sessions).
//! The active [`session::Session`] decides which one.

pub mod cli;
pub mod client;
pub mod commands;
pub mod output;
pub mod session;
pub mod store;
