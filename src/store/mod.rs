//! Persistence layer — where finished employee records are written.

pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlDocumentStore;
pub use memory::MemoryDocumentStore;
pub use traits::DocumentStore;
