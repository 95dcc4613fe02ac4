//! Record identity and validation gate
//!
//! Every write passes through [`prepare`] before reaching the store:
//!
//! 1. [`identity`] derives `_id` from the model's `rids`, when configured
//! 2. the record is validated against the model's schema
//!
//! A record that fails either step never reaches a write operation.

pub mod identity;
pub mod prepare;

pub use identity::{derive_identifier, Derivation, RID_DELIMITER};
pub use prepare::prepare;
