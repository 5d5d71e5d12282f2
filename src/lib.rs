//! doki is a full-screen terminal chat client for the doki project-building
//! agent.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation, the turn state machine, the agent HTTP
//!   client, artifact downloads, configuration, and the application state
//!   that key presses and background results are applied to.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`api`] defines the `/chat` payloads exchanged with the agent.
//! - [`utils`] holds URL helpers and logging.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`ui::chat_loop`] for
//! interactive sessions.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
