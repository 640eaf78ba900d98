//! BibTeX export of literature records.
//!
//! Pure transform; nothing is validated or rejected. `submitter`,
//! `approved`, and `abstract` never appear in the export.

use crate::db::models::LiteratureRecord;

/// Render records as one `@misc` block each, keyed by ident, in input
/// order, separated by a newline.
pub fn records_to_bibtex(records: &[LiteratureRecord]) -> String {
    records
        .iter()
        .map(bibtex_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

fn bibtex_entry(record: &LiteratureRecord) -> String {
    format!(
        "@misc{{{ident},\n    title = {{{title}}},\n    author = {{{author}}},\n    year = {{{year}}},\n    journal = {{{journal}}},\n    doi = {{{doi}}},\n    keywords = {{{keywords}}},\n    annote = {{{annote}}},\n}}\n",
        ident = record.ident,
        title = record.title,
        author = record.authors,
        year = record.year,
        journal = record.journal,
        doi = record.doi,
        keywords = record.tags.join(", "),
        annote = record.comments,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ident: &str) -> LiteratureRecord {
        LiteratureRecord {
            ident: ident.to_string(),
            doi: "10.1/x".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
            submitter: "ack".to_string(),
            approved: true,
            title: "T".to_string(),
            authors: "A. Smith".to_string(),
            abstract_text: "hidden".to_string(),
            comments: "c".to_string(),
            journal: "J".to_string(),
            year: "1999".to_string(),
        }
    }

    #[test]
    fn test_single_record_block() {
        let out = records_to_bibtex(&[record("abc123")]);
        assert!(out.starts_with("@misc{abc123,"));
        assert!(out.contains("    title = {T},\n"));
        assert!(out.contains("    author = {A. Smith},\n"));
        assert!(out.contains("    year = {1999},\n"));
        assert!(out.contains("    journal = {J},\n"));
        assert!(out.contains("    doi = {10.1/x},\n"));
        assert!(out.contains("    keywords = {a, b},\n"));
        assert!(out.contains("    annote = {c},\n"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_excluded_fields_never_appear() {
        let out = records_to_bibtex(&[record("x")]);
        assert!(!out.contains("hidden"));
        assert!(!out.contains("ack"));
        assert!(!out.contains("submitter"));
        assert!(!out.contains("abstract"));
    }

    #[test]
    fn test_blocks_keep_input_order() {
        let out = records_to_bibtex(&[record("first"), record("second")]);
        let first = out.find("@misc{first,").unwrap();
        let second = out.find("@misc{second,").unwrap();
        assert!(first < second);
        assert!(out.contains("}\n\n@misc{second,"));
    }

    #[test]
    fn test_empty_fields_render_as_empty_braces() {
        let mut r = record("e");
        r.title = String::new();
        r.tags = Vec::new();
        let out = records_to_bibtex(&[r]);
        assert!(out.contains("    title = {},\n"));
        assert!(out.contains("    keywords = {},\n"));
    }

    #[test]
    fn test_no_records_is_empty_output() {
        assert_eq!(records_to_bibtex(&[]), "");
    }
}
