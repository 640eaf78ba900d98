//! SQLite repository: the controlled tag vocabulary plus tag-filtered CRUD
//! over literature and personel records.
//!
//! All access goes through one pooled connection, so statements are
//! serialized by construction. Multi-statement operations (schema creation,
//! replace) run inside a single transaction.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::db::models::{
    join_list, LiteratureRecord, NewLiterature, NewPerson, PersonRecord, StringList,
};
use crate::errors::Result;
use crate::tags::{normalize_tag, normalize_tags, DEFAULT_TAGS};

const CREATE_LITERATURE: &str = r#"
CREATE TABLE literature (
    ident TEXT PRIMARY KEY,
    doi TEXT NOT NULL,
    tags TEXT NOT NULL,
    submitter TEXT NOT NULL,
    approved INTEGER NOT NULL,
    title TEXT NOT NULL,
    authors TEXT NOT NULL,
    abstract TEXT NOT NULL,
    comments TEXT NOT NULL,
    journal TEXT NOT NULL,
    year TEXT NOT NULL
)
"#;

const CREATE_PERSONEL: &str = r#"
CREATE TABLE personel (
    ident TEXT PRIMARY KEY,
    orcid TEXT NOT NULL,
    name TEXT NOT NULL,
    tags TEXT NOT NULL,
    submitter TEXT NOT NULL,
    approved INTEGER NOT NULL,
    email TEXT NOT NULL,
    affiliation TEXT NOT NULL
)
"#;

const CREATE_TAGS: &str = "CREATE TABLE tags (tag_name TEXT NOT NULL UNIQUE)";

/// Filter for record queries. `ident` and `tags` predicates are conjoined
/// when both are present.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub ident: Option<String>,
    pub tags: Vec<String>,
}

impl RecordFilter {
    /// Match everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_ident(ident: impl Into<String>) -> Self {
        Self {
            ident: Some(ident.into()),
            ..Self::default()
        }
    }

    pub fn by_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ident: None,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        // A single connection serializes every statement against the store,
        // which is the whole concurrency contract of this crate.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .connect_with(options)
            .await?;

        tracing::info!(url = %config.url, "database connection initialized");
        Ok(Self { pool })
    }

    /// Create the schema and seed the default vocabulary, if not present.
    ///
    /// Idempotent; safe to call on every process start. Returns whether the
    /// schema was created by this call.
    pub async fn init(&self) -> Result<bool> {
        if self.is_initialized().await? {
            tracing::debug!("schema already present");
            return Ok(false);
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query(CREATE_LITERATURE).execute(&mut *tx).await?;
        sqlx::query(CREATE_PERSONEL).execute(&mut *tx).await?;
        sqlx::query(CREATE_TAGS).execute(&mut *tx).await?;
        for tag in DEFAULT_TAGS {
            sqlx::query("INSERT INTO tags (tag_name) VALUES (?)")
                .bind(*tag)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        tracing::info!(default_tags = DEFAULT_TAGS.len(), "schema created and vocabulary seeded");
        Ok(true)
    }

    async fn is_initialized(&self) -> Result<bool> {
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'literature'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(tables > 0)
    }

    /// Insert the pre-approved example record the original catalog shipped
    /// with. The only path that stores `approved = true` at creation time.
    pub async fn seed_example_data(&self) -> Result<String> {
        let demo = NewLiterature {
            doi: Some("1".to_string()),
            tags: Some(StringList::from(vec!["misc".to_string()])),
            submitter: Some("ACK".to_string()),
            title: Some("A disproof of the Riemann Hypothesis".to_string()),
            authors: Some(StringList::from("A. C. Knapp")),
            abstract_text: Some("We find a zero not on the critical line".to_string()),
            comments: Some("Better than Cats".to_string()),
            journal: Some("Annals of Mathematics".to_string()),
            year: Some("1978".to_string()),
            ..NewLiterature::default()
        };
        Self::exec_insert_literature(&self.pool, demo, true).await
    }

    // ------------------------------------------------------------------
    // tag vocabulary
    // ------------------------------------------------------------------

    /// All known vocabulary tags, sorted ascending. Storage enforces
    /// uniqueness, so no dedup step is needed.
    #[tracing::instrument(skip(self))]
    pub async fn list_tags(&self) -> Result<Vec<String>> {
        let tags = sqlx::query_scalar("SELECT tag_name FROM tags ORDER BY tag_name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }

    /// Add a tag to the vocabulary. Returns `true` when the tag is new.
    ///
    /// Input that normalizes to the empty string is a no-op; a duplicate is
    /// reported as `false` rather than surfaced as a constraint error.
    #[tracing::instrument(skip(self))]
    pub async fn add_tag(&self, raw: &str) -> Result<bool> {
        let tag = normalize_tag(raw);
        if tag.is_empty() {
            return Ok(false);
        }
        match sqlx::query("INSERT INTO tags (tag_name) VALUES (?)")
            .bind(&tag)
            .execute(&self.pool)
            .await
        {
            Ok(_) => {
                tracing::debug!(%tag, "vocabulary tag added");
                Ok(true)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    // ------------------------------------------------------------------
    // literature
    // ------------------------------------------------------------------

    /// Query literature records.
    ///
    /// Tag filtering is substring containment against the stored delimited
    /// column: every filter tag must appear in it, so a filter tag that is a
    /// substring of a stored tag also matches. That looseness is inherited
    /// behavior, kept on purpose.
    #[tracing::instrument(skip(self))]
    pub async fn literature(&self, filter: &RecordFilter) -> Result<Vec<LiteratureRecord>> {
        let rows = self.select_filtered("literature", filter).await?;
        let records = rows
            .iter()
            .map(LiteratureRecord::from_row)
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()?;
        Ok(records)
    }

    /// Insert a literature record, returning its (possibly generated) ident.
    ///
    /// Tags are normalized before storage; `approved` is always stored as
    /// `false` on this path.
    #[tracing::instrument(skip(self, new))]
    pub async fn insert_literature(&self, new: NewLiterature) -> Result<String> {
        let ident = Self::exec_insert_literature(&self.pool, new, false).await?;
        tracing::debug!(%ident, "literature record inserted");
        Ok(ident)
    }

    /// Delete by ident. Unknown idents delete zero rows, which is not an
    /// error.
    #[tracing::instrument(skip(self))]
    pub async fn remove_literature(&self, ident: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM literature WHERE ident = ?")
            .bind(ident)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Replace the record at `ident` with `new`, keeping the ident.
    ///
    /// Delete and re-insert run in one transaction, so no reader can observe
    /// the deleted-but-not-reinserted state and a failure rolls back to the
    /// old row.
    #[tracing::instrument(skip(self, new))]
    pub async fn replace_literature(&self, ident: &str, mut new: NewLiterature) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM literature WHERE ident = ?")
            .bind(ident)
            .execute(&mut *tx)
            .await?;
        new.ident = Some(ident.to_string());
        Self::exec_insert_literature(&mut *tx, new, false).await?;
        tx.commit().await?;
        tracing::debug!(%ident, "literature record replaced");
        Ok(())
    }

    async fn exec_insert_literature<'e, E>(
        executor: E,
        new: NewLiterature,
        approved: bool,
    ) -> Result<String>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let ident = new
            .ident
            .filter(|ident| !ident.is_empty())
            .unwrap_or_else(generate_ident);
        let tags = join_list(&normalize_tags(
            new.tags.map(StringList::into_vec).unwrap_or_default(),
        ));
        let authors = join_list(&new.authors.map(StringList::into_vec).unwrap_or_default());

        sqlx::query("INSERT INTO literature VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(&ident)
            .bind(new.doi.unwrap_or_default())
            .bind(tags)
            .bind(new.submitter.unwrap_or_default())
            .bind(approved)
            .bind(new.title.unwrap_or_default())
            .bind(authors)
            .bind(new.abstract_text.unwrap_or_default())
            .bind(new.comments.unwrap_or_default())
            .bind(new.journal.unwrap_or_default())
            .bind(new.year.unwrap_or_default())
            .execute(executor)
            .await?;
        Ok(ident)
    }

    // ------------------------------------------------------------------
    // personel
    // ------------------------------------------------------------------

    /// Query personel records. Same filter semantics as [`Self::literature`].
    #[tracing::instrument(skip(self))]
    pub async fn personel(&self, filter: &RecordFilter) -> Result<Vec<PersonRecord>> {
        let rows = self.select_filtered("personel", filter).await?;
        let records = rows
            .iter()
            .map(PersonRecord::from_row)
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()?;
        Ok(records)
    }

    /// Insert a personel record, returning its (possibly generated) ident.
    #[tracing::instrument(skip(self, new))]
    pub async fn insert_person(&self, new: NewPerson) -> Result<String> {
        let ident = Self::exec_insert_person(&self.pool, new, false).await?;
        tracing::debug!(%ident, "personel record inserted");
        Ok(ident)
    }

    /// Delete by ident, returning the removed row count.
    #[tracing::instrument(skip(self))]
    pub async fn remove_person(&self, ident: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM personel WHERE ident = ?")
            .bind(ident)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Replace the personel record at `ident`, transactionally.
    #[tracing::instrument(skip(self, new))]
    pub async fn replace_person(&self, ident: &str, mut new: NewPerson) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM personel WHERE ident = ?")
            .bind(ident)
            .execute(&mut *tx)
            .await?;
        new.ident = Some(ident.to_string());
        Self::exec_insert_person(&mut *tx, new, false).await?;
        tx.commit().await?;
        tracing::debug!(%ident, "personel record replaced");
        Ok(())
    }

    async fn exec_insert_person<'e, E>(executor: E, new: NewPerson, approved: bool) -> Result<String>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let ident = new
            .ident
            .filter(|ident| !ident.is_empty())
            .unwrap_or_else(generate_ident);
        let tags = join_list(&normalize_tags(
            new.tags.map(StringList::into_vec).unwrap_or_default(),
        ));

        sqlx::query("INSERT INTO personel VALUES (?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(&ident)
            .bind(new.orcid.unwrap_or_default())
            .bind(new.name.unwrap_or_default())
            .bind(tags)
            .bind(new.submitter.unwrap_or_default())
            .bind(approved)
            .bind(new.email.unwrap_or_default())
            .bind(new.affiliation.unwrap_or_default())
            .execute(executor)
            .await?;
        Ok(ident)
    }

    // ------------------------------------------------------------------
    // shared query building
    // ------------------------------------------------------------------

    /// `SELECT *` with conjoined ident/tag predicates, fully parameterized.
    /// Filter tags are normalized first; tags that normalize to empty fall
    /// out, so an all-empty filter selects everything.
    async fn select_filtered(&self, table: &str, filter: &RecordFilter) -> Result<Vec<SqliteRow>> {
        let tags = normalize_tags(&filter.tags);

        let mut sql = format!("SELECT * FROM {table}");
        let mut predicates: Vec<&str> = Vec::new();
        if filter.ident.is_some() {
            predicates.push("ident = ?");
        }
        predicates.extend(tags.iter().map(|_| "instr(tags, ?) > 0"));
        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }

        let mut query = sqlx::query(&sql);
        if let Some(ident) = &filter.ident {
            query = query.bind(ident);
        }
        for tag in &tags {
            query = query.bind(tag);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }
}

fn generate_ident() -> String {
    Uuid::new_v4().simple().to_string()
}
