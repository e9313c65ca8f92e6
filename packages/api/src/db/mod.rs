//! # Database module: PostgreSQL pool and migrations
//!
//! [`connect`] opens a pool sized from [`crate::settings::Database`];
//! [`migrate`] applies the embedded migrations under `migrations/`. Both are
//! only used when the storage backend is `postgres`.

mod pool;

pub use pool::{connect, migrate};
