//! Common utilities and shared types for chirp.
//!
//! This crate provides foundational components used across all chirp crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Password hashing**: Argon2 hashing and verification
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use chirp_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod id;

pub use config::Config;
pub use crypto::{hash_password, verify_password};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
