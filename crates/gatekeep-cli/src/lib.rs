//! # Gatekeep CLI
//!
//! Administrative helpers used by the `gatekeep-cli` binary: creating admin
//! accounts and seeding fake users for development.
//!
//! ```ignore
//! use gatekeep_cli::seeder::seed_users;
//!
//! let report = seed_users(&store, 500).await?;
//! ```

pub mod admin;
pub mod seeder;
