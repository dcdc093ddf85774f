use super::{MalformedRecordPolicy, SnapshotError, SnapshotQuery};
use crate::workflows::brief::Post;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use tracing::warn;

/// Post record as stored in a snapshot, before validation.
#[derive(Debug, Deserialize)]
pub(crate) struct PostRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    profile_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    author_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    company: Option<String>,
    #[serde(
        default,
        alias = "published_at",
        deserialize_with = "empty_string_as_none"
    )]
    posted_at: Option<String>,
    #[serde(default, alias = "content", deserialize_with = "present_or_null")]
    text: Option<Option<String>>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    url: Option<String>,
    #[serde(default)]
    reactions: Option<u32>,
    #[serde(default)]
    comments: Option<u32>,
}

impl PostRow {
    fn into_post(self, query: &SnapshotQuery) -> Result<Post, String> {
        let id = required(self.id, "id")?;
        let profile_id = required(self.profile_id, "profile_id")?;
        let company = required(self.company, "company")?;
        let raw_posted_at = required(self.posted_at, "posted_at")?;
        let posted_at = parse_timestamp(&raw_posted_at)
            .ok_or_else(|| format!("invalid posted_at timestamp '{raw_posted_at}'"))?;
        let text = match self.text {
            Some(text) => text.unwrap_or_default(),
            None => return Err(missing("text")),
        };
        let author_name = self
            .author_name
            .or_else(|| query.profile(&profile_id).map(|profile| profile.name.clone()))
            .unwrap_or_default();

        Ok(Post {
            id,
            profile_id,
            author_name,
            company,
            posted_at,
            text,
            url: self.url,
            reactions: self.reactions,
            comments: self.comments,
        })
    }
}

/// Validates decoded rows in snapshot order and keeps the posts the query
/// admits. Each item carries the record position and either the decoded row
/// or the decoder's complaint.
pub(crate) fn assemble_posts<I>(
    rows: I,
    query: &SnapshotQuery,
    policy: MalformedRecordPolicy,
) -> Result<Vec<Post>, SnapshotError>
where
    I: IntoIterator<Item = (usize, Result<PostRow, String>)>,
{
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut posts = Vec::new();
    let mut skipped = 0usize;

    for (index, row) in rows {
        let post = row.and_then(|row| row.into_post(query)).and_then(|post| {
            if seen_ids.insert(post.id.clone()) {
                Ok(post)
            } else {
                Err(format!("duplicate post id '{}'", post.id))
            }
        });

        match post {
            Ok(post) if query.admits(&post) => posts.push(post),
            Ok(_) => {}
            Err(reason) => match policy {
                MalformedRecordPolicy::Abort => {
                    return Err(SnapshotError::MalformedRecord {
                        index: Some(index),
                        reason,
                    })
                }
                MalformedRecordPolicy::Skip => {
                    warn!(record = index, %reason, "skipping malformed snapshot record");
                    skipped += 1;
                }
            },
        }
    }

    if skipped > 0 {
        warn!(skipped, kept = posts.len(), "snapshot loaded with skipped records");
    }

    Ok(posts)
}

fn required(value: Option<String>, field: &str) -> Result<String, String> {
    value
        .map(|value| value.trim().to_string())
        .ok_or_else(|| missing(field))
}

fn missing(field: &str) -> String {
    format!("missing required field '{field}'")
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Distinguishes an absent field (`None`) from an explicit null (`Some(None)`).
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::brief::Profile;

    fn row(value: serde_json::Value) -> Result<PostRow, String> {
        serde_json::from_value(value).map_err(|err| err.to_string())
    }

    fn query() -> SnapshotQuery {
        SnapshotQuery::new(vec![Profile {
            id: "jane-doe".to_string(),
            name: "Jane Doe".to_string(),
            title: "Chief Executive Officer".to_string(),
            company: "Acme Gold Loans".to_string(),
            linkedin_url: "https://www.linkedin.com/in/jane-doe".to_string(),
        }])
    }

    #[test]
    fn parse_timestamp_supports_rfc3339_naive_and_date_strings() {
        let rfc = parse_timestamp("2025-09-24T10:00:00+05:30").expect("rfc3339");
        assert_eq!(rfc, Utc.with_ymd_and_hms(2025, 9, 24, 4, 30, 0).unwrap());

        let naive = parse_timestamp("2025-09-24T10:00:00").expect("naive");
        assert_eq!(naive, Utc.with_ymd_and_hms(2025, 9, 24, 10, 0, 0).unwrap());

        let date = parse_timestamp("2025-09-30").expect("date");
        assert_eq!(date, Utc.with_ymd_and_hms(2025, 9, 30, 0, 0, 0).unwrap());

        assert!(parse_timestamp("  ").is_none());
        assert!(parse_timestamp("last tuesday").is_none());
    }

    #[test]
    fn author_name_falls_back_to_profile() {
        let rows = vec![(
            0,
            row(serde_json::json!({
                "id": "p-1",
                "profile_id": "jane-doe",
                "company": "Acme Gold Loans",
                "posted_at": "2025-09-22T09:00:00Z",
                "text": "We are hiring"
            })),
        )];

        let posts = assemble_posts(rows, &query(), MalformedRecordPolicy::Abort).expect("parses");
        assert_eq!(posts[0].author_name, "Jane Doe");
    }

    #[test]
    fn null_text_is_empty_but_missing_text_is_malformed() {
        let null_text = row(serde_json::json!({
            "id": "p-1",
            "profile_id": "jane-doe",
            "company": "Acme Gold Loans",
            "posted_at": "2025-09-22",
            "text": null
        }));
        let posts = assemble_posts(vec![(0, null_text)], &query(), MalformedRecordPolicy::Abort)
            .expect("null text accepted");
        assert_eq!(posts[0].text, "");

        let no_text = row(serde_json::json!({
            "id": "p-2",
            "profile_id": "jane-doe",
            "company": "Acme Gold Loans",
            "posted_at": "2025-09-22"
        }));
        let error = assemble_posts(vec![(3, no_text)], &query(), MalformedRecordPolicy::Abort)
            .expect_err("missing text rejected");
        match error {
            SnapshotError::MalformedRecord { index, reason } => {
                assert_eq!(index, Some(3));
                assert!(reason.contains("text"), "unexpected reason: {reason}");
            }
            other => panic!("expected malformed record, got {other:?}"),
        }
    }

    #[test]
    fn skip_policy_drops_bad_and_duplicate_records() {
        let good = serde_json::json!({
            "id": "p-1",
            "profile_id": "jane-doe",
            "company": "Acme Gold Loans",
            "posted_at": "2025-09-22",
            "text": "Expanding"
        });
        let rows = vec![
            (0, row(good.clone())),
            (1, row(good)),
            (
                2,
                row(serde_json::json!({
                    "id": "p-3",
                    "profile_id": "jane-doe",
                    "company": "Acme Gold Loans",
                    "posted_at": "yesterday",
                    "text": "Hiring"
                })),
            ),
        ];

        let posts = assemble_posts(rows, &query(), MalformedRecordPolicy::Skip).expect("skips");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "p-1");
    }
}
