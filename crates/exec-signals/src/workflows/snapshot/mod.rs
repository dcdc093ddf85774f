mod csv_file;
mod json_file;
mod parser;
mod window;

pub use csv_file::CsvSnapshotSource;
pub use json_file::JsonSnapshotSource;
pub use window::{filter_posts_for_window, reporting_window};

use crate::workflows::brief::domain::same_company;
use crate::workflows::brief::{Post, Profile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot source unavailable at {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed snapshot record ({}): {reason}", describe_index(.index))]
    MalformedRecord {
        index: Option<usize>,
        reason: String,
    },
}

fn describe_index(index: &Option<usize>) -> String {
    match index {
        Some(index) => format!("record {index}"),
        None => "document".to_string(),
    }
}

/// What to do with a record that cannot become a [`Post`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRecordPolicy {
    /// Fail the whole load.
    #[default]
    Abort,
    /// Log the record and continue.
    Skip,
}

/// Profiles and optional company filter a load is restricted to.
#[derive(Debug, Clone, Default)]
pub struct SnapshotQuery {
    profiles: Vec<Profile>,
    company: Option<String>,
}

impl SnapshotQuery {
    /// An empty profile set admits posts from every profile.
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            profiles,
            company: None,
        }
    }

    pub fn with_company(mut self, company: Option<String>) -> Self {
        self.company = company
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        self
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn profile(&self, profile_id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|profile| profile.id == profile_id)
    }

    pub fn admits(&self, post: &Post) -> bool {
        let tracked = self.profiles.is_empty() || self.profile(&post.profile_id).is_some();
        let in_company = self
            .company
            .as_deref()
            .map_or(true, |company| same_company(company, &post.company));
        tracked && in_company
    }
}

/// Provider of post batches. Every call reads the backing store afresh, so a
/// source can be loaded repeatedly.
pub trait PostSource {
    fn load_posts(&self, query: &SnapshotQuery) -> Result<Vec<Post>, SnapshotError>;
}

/// File-backed source chosen by extension: `.csv` exports go through the CSV
/// reader, anything else is read as a JSON array.
#[derive(Debug, Clone)]
pub enum SnapshotSource {
    Json(JsonSnapshotSource),
    Csv(CsvSnapshotSource),
}

impl SnapshotSource {
    pub fn from_path<P: AsRef<Path>>(path: P, policy: MalformedRecordPolicy) -> Self {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            Self::Csv(CsvSnapshotSource::new(path, policy))
        } else {
            Self::Json(JsonSnapshotSource::new(path, policy))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Json(source) => source.path(),
            Self::Csv(source) => source.path(),
        }
    }
}

impl PostSource for SnapshotSource {
    fn load_posts(&self, query: &SnapshotQuery) -> Result<Vec<Post>, SnapshotError> {
        match self {
            Self::Json(source) => source.load_posts(query),
            Self::Csv(source) => source.load_posts(query),
        }
    }
}

fn open_snapshot(path: &Path) -> Result<std::fs::File, SnapshotError> {
    std::fs::File::open(path).map_err(|source| SnapshotError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })
}
