//! PostgreSQL persistence adapters using Diesel.
//!
//! Adapters only translate between Diesel rows and domain types. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) stay private to this
//! module, and every database error is mapped into the owning port's error
//! type.
//!
//! # Example
//!
//! ```ignore
//! use inkpost::outbound::persistence::{DbPool, DieselFollowStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/inkpost")).await?;
//! let follows = DieselFollowStore::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_follow_store;
mod diesel_login_service;
mod diesel_user_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_follow_store::DieselFollowStore;
pub use diesel_login_service::DieselLoginService;
pub use diesel_user_store::DieselUserStore;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE, DbPool, PoolConfig, PoolError,
};
