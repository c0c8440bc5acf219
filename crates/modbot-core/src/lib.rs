//! Core logic for the chat moderation bot.
//!
//! This crate is framework-agnostic. Telegram lives behind the
//! [`platform::ChatPlatform`] port implemented in the adapter crate.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod handlers;
pub mod logging;
pub mod permissions;
pub mod platform;
pub mod removal;
pub mod target;
pub mod username_cache;

#[cfg(test)]
mod testing;

pub use errors::{Error, Result};
