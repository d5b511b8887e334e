//! Storage layer: trait contracts consumed by the domain plus the SQLite
//! implementations used by the server.

pub mod sqlite;
pub mod traits;
