use crate::workflows::brief::{Post, ReportingWindow};
use chrono::{DateTime, Duration, Utc};

/// Window of `lookback_days` ending at `reference`. A lookback reaching past
/// the earliest representable instant starts there instead.
pub fn reporting_window(lookback_days: u32, reference: DateTime<Utc>) -> ReportingWindow {
    let start = reference
        .checked_sub_signed(Duration::days(i64::from(lookback_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    ReportingWindow {
        start,
        end: reference,
    }
}

/// Keeps posts published inside the window, `reference` included.
pub fn filter_posts_for_window(
    posts: Vec<Post>,
    lookback_days: u32,
    reference: DateTime<Utc>,
) -> Vec<Post> {
    let window = reporting_window(lookback_days, reference);
    posts
        .into_iter()
        .filter(|post| window.contains(post.posted_at))
        .collect()
}
