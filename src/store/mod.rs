// Persistence layer: pooled PostgreSQL handle plus the inventory queries.

pub mod columns;
pub mod db;
pub mod inventory;

pub use columns::Column;
pub use db::Db;
