//! Cruisesim - cruise ship design chat library
//!
//! This library provides the core of the cruise ship simulator: a chat with
//! the "Captain Block" persona that can render the ships it discusses in a
//! blocky toy style or as realistic photographs.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Conversation store, keyword rules and the generation cycle
//! - `providers`: Generative AI provider abstraction and the Gemini client
//! - `prompts`: Captain persona and image prompt templates
//! - `style`: Blocky and real-life rendering styles
//! - `commands`: CLI command handlers and the gallery viewer
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use cruisesim::commands::build_orchestrator;
//! use cruisesim::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let orchestrator = build_orchestrator(&config)?;
//!     orchestrator.submit("Build a futuristic neon cruise ship").await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod session;
pub mod style;

// Re-export commonly used types
pub use config::Config;
pub use error::{CruiseSimError, Result};
pub use session::{ConversationStore, CycleOutcome, Orchestrator};
pub use style::StyleHint;

#[cfg(test)]
pub mod test_utils;
