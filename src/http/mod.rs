//! HTTP server module.
//!
//! Binds the listener and logs once it is accepting connections. The
//! termination listener is created by the caller before any slow startup work
//! and handed to the server, which closes the database and stops on signal.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
pub use shutdown::{listen_for_termination, shutdown_on, terminated, Termination};
