//! Database layer: record models, the flat-row serialization contract, and
//! the SQLite repository.

pub mod models;
pub mod repository;

pub use models::{LiteratureRecord, NewLiterature, NewPerson, PersonRecord, StringList};
pub use repository::{RecordFilter, Repository};
