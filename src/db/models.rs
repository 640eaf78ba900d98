//! Record models and the flat-row serialization contract.
//!
//! Rows are decoded positionally against the fixed column sequences below,
//! not by column name. Multi-valued fields (`tags`, `authors`) live in a
//! single comma-delimited text column; the join/split pair here is an exact
//! inverse for any value that does not itself contain the delimiter.
//! Delimiter-containing values are out of contract.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Physical column order of the `literature` table.
pub const LITERATURE_COLUMNS: [&str; 11] = [
    "ident",
    "doi",
    "tags",
    "submitter",
    "approved",
    "title",
    "authors",
    "abstract",
    "comments",
    "journal",
    "year",
];

/// Physical column order of the `personel` table.
pub const PERSONEL_COLUMNS: [&str; 8] = [
    "ident",
    "orcid",
    "name",
    "tags",
    "submitter",
    "approved",
    "email",
    "affiliation",
];

pub(crate) const LIST_DELIMITER: &str = ",";

/// Join a multi-valued field into its stored single-column form.
pub(crate) fn join_list(values: &[String]) -> String {
    values.join(LIST_DELIMITER)
}

/// Split a stored column back into its values. The empty string maps to an
/// empty sequence so that `split_list(&join_list(&v)) == v` holds for
/// delimiter-free values, including `v == []`.
pub(crate) fn split_list(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        Vec::new()
    } else {
        joined.split(LIST_DELIMITER).map(str::to_string).collect()
    }
}

/// One bibliographic entry, in its structured form.
///
/// `tags` is split out into a sequence; `authors` stays in the joined
/// display form the original rows carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteratureRecord {
    pub ident: String,
    pub doi: String,
    pub tags: Vec<String>,
    pub submitter: String,
    pub approved: bool,
    pub title: String,
    pub authors: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub comments: String,
    pub journal: String,
    pub year: String,
}

impl LiteratureRecord {
    /// Decode a row by position, per [`LITERATURE_COLUMNS`].
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            ident: row.try_get(0)?,
            doi: row.try_get(1)?,
            tags: split_list(&row.try_get::<String, _>(2)?),
            submitter: row.try_get(3)?,
            approved: row.try_get(4)?,
            title: row.try_get(5)?,
            authors: row.try_get(6)?,
            abstract_text: row.try_get(7)?,
            comments: row.try_get(8)?,
            journal: row.try_get(9)?,
            year: row.try_get(10)?,
        })
    }
}

/// One contributor entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub ident: String,
    pub orcid: String,
    pub name: String,
    pub tags: Vec<String>,
    pub submitter: String,
    pub approved: bool,
    pub email: String,
    pub affiliation: String,
}

impl PersonRecord {
    /// Decode a row by position, per [`PERSONEL_COLUMNS`].
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            ident: row.try_get(0)?,
            orcid: row.try_get(1)?,
            name: row.try_get(2)?,
            tags: split_list(&row.try_get::<String, _>(3)?),
            submitter: row.try_get(4)?,
            approved: row.try_get(5)?,
            email: row.try_get(6)?,
            affiliation: row.try_get(7)?,
        })
    }
}

/// A field that request bodies may supply either as one joined string or as
/// a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    Joined(String),
    List(Vec<String>),
}

impl StringList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            StringList::Joined(joined) => split_list(&joined),
            StringList::List(values) => values,
        }
    }
}

impl From<Vec<String>> for StringList {
    fn from(values: Vec<String>) -> Self {
        StringList::List(values)
    }
}

impl From<&str> for StringList {
    fn from(joined: &str) -> Self {
        StringList::Joined(joined.to_string())
    }
}

/// Insert payload for a literature record.
///
/// Every field is optional; missing text fields persist as the empty
/// string. There is deliberately no `approved` field: approval is never
/// caller-controlled on the insert path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewLiterature {
    #[serde(default)]
    pub ident: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub tags: Option<StringList>,
    #[serde(default)]
    pub submitter: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<StringList>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default, deserialize_with = "year_as_string")]
    pub year: Option<String>,
}

/// Insert payload for a personel record. Same conventions as
/// [`NewLiterature`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPerson {
    #[serde(default)]
    pub ident: Option<String>,
    #[serde(default)]
    pub orcid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Option<StringList>,
    #[serde(default)]
    pub submitter: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub affiliation: Option<String>,
}

/// Accept `year` as either a JSON string or a number; persist as a string.
fn year_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(i64),
        Text(String),
    }

    Ok(Option::<Year>::deserialize(deserializer)?.map(|year| match year {
        Year::Number(n) => n.to_string(),
        Year::Text(s) => s,
    }))
}
