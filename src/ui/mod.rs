//! Terminal presentation.
//!
//! [`chat_loop`] owns the interactive session: it sets up the terminal, feeds
//! key events and background results into [`crate::core::app::App`], and
//! redraws through [`renderer`]. [`theme`] maps the light/dark choice to
//! concrete styles.

pub mod chat_loop;
pub mod renderer;
pub mod theme;
