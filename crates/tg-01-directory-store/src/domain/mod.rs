//! Domain layer for the directory store.

pub mod query;
pub mod store;
pub mod value;

pub use query::{Direction, Filters, Orders};
pub use store::{DirectoryStore, RowId};
pub use value::{ColumnValue, Row};
