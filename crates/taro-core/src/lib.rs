//! Core contracts and ambient plumbing for the Taro bot.
//!
//! This crate owns everything the session runtime in `taro-bot` consumes but
//! does not implement itself: the agent event contract, the collaborator
//! traits (agent engine, knowledge-base retrieval), configuration, and
//! logging setup. The engine and the vector index live behind the traits.

pub mod config;
pub mod core;
pub mod kb;
pub mod logging;
pub mod tools;
