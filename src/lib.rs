//! Fantasmas game library crate.
//!
//! The game core (everything outside `app` and `render`) has no platform
//! dependencies and can be driven headless, which is how the tests run it.

pub mod audio;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod systems;

#[cfg(feature = "desktop")]
pub mod app;
#[cfg(feature = "desktop")]
pub mod render;
