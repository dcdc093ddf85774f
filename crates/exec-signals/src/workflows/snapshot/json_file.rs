use super::parser::{assemble_posts, PostRow};
use super::{open_snapshot, MalformedRecordPolicy, PostSource, SnapshotError, SnapshotQuery};
use crate::workflows::brief::Post;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Snapshot stored as one JSON array of post objects.
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    path: PathBuf,
    policy: MalformedRecordPolicy,
}

impl JsonSnapshotSource {
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
        let document: serde_json::Value =
            serde_json::from_reader(reader).map_err(|err| SnapshotError::MalformedRecord {
                index: None,
                reason: format!("invalid JSON: {err}"),
            })?;

        let serde_json::Value::Array(entries) = document else {
            return Err(SnapshotError::MalformedRecord {
                index: None,
                reason: "expected a JSON array of post objects".to_string(),
            });
        };

        let rows = entries.into_iter().enumerate().map(|(index, entry)| {
            let row = serde_json::from_value::<PostRow>(entry).map_err(|err| err.to_string());
            (index, row)
        });

        assemble_posts(rows, query, policy)
    }
}

impl PostSource for JsonSnapshotSource {
    fn load_posts(&self, query: &SnapshotQuery) -> Result<Vec<Post>, SnapshotError> {
        let file = open_snapshot(&self.path)?;
        let posts = Self::from_reader(std::io::BufReader::new(file), query, self.policy)?;
        debug!(path = %self.path.display(), posts = posts.len(), "loaded JSON snapshot");
        Ok(posts)
    }
}
