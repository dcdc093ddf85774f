use super::parser::{assemble_posts, PostRow};
use super::{open_snapshot, MalformedRecordPolicy, PostSource, SnapshotError, SnapshotQuery};
use crate::workflows::brief::Post;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Snapshot exported as CSV with one post per row. Columns use the post field
/// names (`id`, `profile_id`, `company`, `posted_at`, `text`, ...).
#[derive(Debug, Clone)]
pub struct CsvSnapshotSource {
    path: PathBuf,
    policy: MalformedRecordPolicy,
}

impl CsvSnapshotSource {
    pub fn new<P: AsRef<Path>>(path: P, policy: MalformedRecordPolicy) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            policy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn from_reader<R: Read>(
        reader: R,
        query: &SnapshotQuery,
        policy: MalformedRecordPolicy,
    ) -> Result<Vec<Post>, SnapshotError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let rows: Vec<(usize, Result<PostRow, String>)> = csv_reader
            .deserialize::<PostRow>()
            .enumerate()
            .map(|(index, row)| (index, row.map_err(|err| err.to_string())))
            .collect();

        assemble_posts(rows, query, policy)
    }
}

impl PostSource for CsvSnapshotSource {
    fn load_posts(&self, query: &SnapshotQuery) -> Result<Vec<Post>, SnapshotError> {
        let file = open_snapshot(&self.path)?;
        let posts = Self::from_reader(file, query, self.policy)?;
        debug!(path = %self.path.display(), posts = posts.len(), "loaded CSV snapshot");
        Ok(posts)
    }
}
