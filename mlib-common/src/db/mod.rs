//! Document store access
//!
//! Songs and favorites live in SQLite; every function takes the shared pool.

pub mod favorites;
pub mod init;
pub mod songs;

pub use init::init_database;
