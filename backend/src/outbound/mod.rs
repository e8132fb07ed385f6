//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL stores using Diesel.
//! - **memory**: in-process stores for development without a database and
//!   for tests.
//!
//! Adapters translate between domain types and storage representations and
//! hold no business rules.

pub mod memory;
pub mod persistence;
