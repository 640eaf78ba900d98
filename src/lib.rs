//! litdb: a tag-filtered bibliographic record store.
//!
//! Stores literature and personel records in a single SQLite file, keeps a
//! controlled vocabulary of tags, answers multi-tag AND-filtered queries
//! over the denormalized tag column, and renders literature as BibTeX.
//!
//! The HTTP layer is an external collaborator: it deserializes request
//! bodies into [`NewLiterature`] / [`NewPerson`], calls the [`Repository`],
//! and serializes the returned records. This crate owns everything from
//! that boundary down to the database file.

pub mod bibtex;
pub mod config;
pub mod db;
pub mod errors;
pub mod tags;

pub use bibtex::records_to_bibtex;
pub use config::{AppConfig, DatabaseConfig};
pub use db::{
    LiteratureRecord, NewLiterature, NewPerson, PersonRecord, RecordFilter, Repository, StringList,
};
pub use errors::{Result, StoreError};
pub use tags::{normalize_tag, normalize_tags, DEFAULT_TAGS};
