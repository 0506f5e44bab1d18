//! Keyword lookups over the two static JSON tables shipped with the server.
//!
//! Files are read on every call so operators can edit them without a
//! restart.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

pub const PAGE_NOT_FOUND: &str = "Sorry, I couldn't find the information you were looking for.";
pub const EXPLANATION_NOT_FOUND: &str =
    "Sorry, I couldn't find the explanation you were looking for.";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PageRecord {
    pub keyword: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct HelpRecord {
    pub keyword: String,
    pub explanation: String,
}

pub trait Keyword {
    fn keyword(&self) -> &str;
}

impl Keyword for PageRecord {
    fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl Keyword for HelpRecord {
    fn keyword(&self) -> &str {
        &self.keyword
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("could not read content file `{path}`: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("could not parse content file `{path}`: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

pub async fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ContentError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ContentError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw)
        .map_err(|source| ContentError::Parse { path: path.to_path_buf(), source })
}

/// First record whose keyword equals `query`, ignoring case.
pub fn find_by_keyword<'a, T: Keyword>(records: &'a [T], query: &str) -> Option<&'a T> {
    let query = query.to_lowercase();
    records.iter().find(|record| record.keyword().to_lowercase() == query)
}

pub fn page_reply(url: &str) -> String {
    format!("Here is the information you requested: <a target='_new' href='{url}' >{url}</a>")
}

pub fn explanation_reply(explanation: &str) -> String {
    format!("Here is the explanation: {explanation}")
}

#[derive(Clone, Debug)]
pub struct ContentLookup {
    pages_path: PathBuf,
    help_path: PathBuf,
}

impl ContentLookup {
    pub fn new(pages_path: impl Into<PathBuf>, help_path: impl Into<PathBuf>) -> Self {
        Self { pages_path: pages_path.into(), help_path: help_path.into() }
    }

    pub async fn find_page(&self, keyword: &str) -> Result<Option<PageRecord>, ContentError> {
        let records = load_records::<PageRecord>(&self.pages_path).await?;
        Ok(find_by_keyword(&records, keyword).cloned())
    }

    pub async fn find_explanation(
        &self,
        keyword: &str,
    ) -> Result<Option<HelpRecord>, ContentError> {
        let records = load_records::<HelpRecord>(&self.help_path).await?;
        Ok(find_by_keyword(&records, keyword).cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::content::{
        explanation_reply, find_by_keyword, page_reply, ContentError, ContentLookup, PageRecord,
    };

    fn lookup(dir: &TempDir) -> ContentLookup {
        let pages = dir.path().join("pages_info.json");
        let help = dir.path().join("help_descriptions.json");
        fs::write(
            &pages,
            r#"[
                {"keyword": "Calculator", "url": "https://becs.e-nomads.com/calculator"},
                {"keyword": "profile", "url": "https://becs.e-nomads.com/profile"}
            ]"#,
        )
        .expect("write pages");
        fs::write(
            &help,
            r#"[{"keyword": "dashboard", "explanation": "The dashboard summarizes your projects."}]"#,
        )
        .expect("write help");
        ContentLookup::new(pages, help)
    }

    #[tokio::test]
    async fn page_hit_is_case_insensitive() {
        let dir = TempDir::new().expect("tempdir");
        let page = lookup(&dir).find_page("CALCULATOR").await.expect("read").expect("hit");

        assert_eq!(page.url, "https://becs.e-nomads.com/calculator");
        assert_eq!(
            page_reply(&page.url),
            "Here is the information you requested: <a target='_new' href='https://becs.e-nomads.com/calculator' >https://becs.e-nomads.com/calculator</a>"
        );
    }

    #[tokio::test]
    async fn page_miss_is_none() {
        let dir = TempDir::new().expect("tempdir");
        assert_eq!(lookup(&dir).find_page("settings").await.expect("read"), None);
    }

    #[test]
    fn matching_is_exact_not_prefix() {
        let records = vec![PageRecord { keyword: "calc".to_owned(), url: "u".to_owned() }];
        assert!(find_by_keyword(&records, "calculator").is_none());
        assert!(find_by_keyword(&records, "Calc").is_some());
    }

    #[tokio::test]
    async fn explanation_lookup() {
        let dir = TempDir::new().expect("tempdir");
        let lookup = lookup(&dir);
        let help = lookup.find_explanation("Dashboard").await.expect("read").expect("hit");

        assert_eq!(
            explanation_reply(&help.explanation),
            "Here is the explanation: The dashboard summarizes your projects."
        );
        assert_eq!(lookup.find_explanation("reports").await.expect("read"), None);
    }

    #[tokio::test]
    async fn unreadable_and_malformed_files_are_errors() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("bad.json"), "{not json").expect("write");
        let lookup =
            ContentLookup::new(dir.path().join("missing.json"), dir.path().join("bad.json"));

        assert!(matches!(lookup.find_page("calculator").await, Err(ContentError::Read { .. })));
        assert!(matches!(lookup.find_explanation("x").await, Err(ContentError::Parse { .. })));
    }

    #[tokio::test]
    async fn edits_are_picked_up_without_restart() {
        let dir = TempDir::new().expect("tempdir");
        let lookup = lookup(&dir);
        assert_eq!(lookup.find_page("billing").await.expect("read"), None);

        tokio::fs::write(
            dir.path().join("pages_info.json"),
            r#"[{"keyword": "billing", "url": "https://becs.e-nomads.com/billing"}]"#,
        )
        .await
        .expect("rewrite pages");

        let page = lookup.find_page("Billing").await.expect("read").expect("hit");
        assert_eq!(page.url, "https://becs.e-nomads.com/billing");
    }
}
