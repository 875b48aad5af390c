//! Decide - offload small daily decisions
//!
//! A session holds one decision lifecycle per category (meals, outfits,
//! activities, work, and a user-editable custom list). Each request goes to
//! an external decision service whose raw output is validated before it can
//! become a decision; committed decisions land in an append-only log.
//!
//! # Modules
//!
//! - [`domain`] - Categories, custom options, mood, decisions, history ledger
//! - [`session`] - Per-category state machines, controller, and actor handle
//! - [`service`] - Decision service trait with LLM and offline adapters
//! - [`llm`] - LLM client trait and Anthropic implementation
//! - [`prompts`] - Handlebars request templates
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//! - [`repl`] - Interactive session

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod prompts;
pub mod repl;
pub mod service;
pub mod session;

pub use config::Config;
pub use domain::{Category, CategoryId, CategoryRegistry, CustomOptionSet, Decision, HistoryEntry, Mood};
pub use service::{DecisionService, create_service};
pub use session::{
    CategoryState, DecisionOutcome, ServiceError, SessionController, SessionError, SessionHandle, SessionSnapshot,
};
