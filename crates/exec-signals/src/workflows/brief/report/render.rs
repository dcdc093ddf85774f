use super::super::domain::{Brief, PostDetails, Signal};
use chrono::SecondsFormat;
use std::io::Write;

pub const NO_ACTIVITY_LINE: &str = "No notable activity this period.";
pub const NO_DATA_LINE: &str = "No data was available for this period.";

const TITLE: &str = "Weekly signal brief";

/// Lines of the plain-text report. Companies appear alphabetically, signals
/// in the order the brief ranked them.
pub fn report_lines(brief: &Brief) -> Vec<String> {
    let mut lines = vec![
        TITLE.to_string(),
        "=".repeat(TITLE.len()),
        format!(
            "Generated at: {}",
            brief
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
    ];

    if let Some(window) = brief.window {
        lines.push(format!(
            "Reporting window: {} -> {}",
            window.start.format("%Y-%m-%d"),
            window.end.format("%Y-%m-%d")
        ));
    }
    lines.push(format!("Posts analysed: {}", brief.source_posts));

    if !brief.has_data() {
        lines.push(String::new());
        lines.push(NO_DATA_LINE.to_string());
    }

    for (company, signals) in &brief.company_sections {
        lines.push(String::new());
        lines.push(company.clone());
        lines.push("-".repeat(company.chars().count()));

        if let Some(profiles) = brief.monitored_profiles.get(company) {
            if !profiles.is_empty() {
                lines.push("Key profiles monitored:".to_string());
                for profile in profiles {
                    if profile.title.is_empty() {
                        lines.push(format!("- {}", profile.name));
                    } else {
                        lines.push(format!("- {}, {}", profile.name, profile.title));
                    }
                }
            }
        }

        if signals.is_empty() {
            lines.push(NO_ACTIVITY_LINE.to_string());
            continue;
        }

        lines.push("Signals:".to_string());
        for (index, signal) in signals.iter().enumerate() {
            push_signal(&mut lines, index + 1, signal, brief.details(&signal.post_id));
        }
    }

    lines
}

fn push_signal(
    lines: &mut Vec<String>,
    rank: usize,
    signal: &Signal,
    details: Option<&PostDetails>,
) {
    lines.push(format!(
        "{}. [{}] score {:.2} (post {})",
        rank,
        signal.category.label(),
        signal.score,
        signal.post_id
    ));
    if let Some(details) = details {
        let posted_on = details.posted_at.format("%Y-%m-%d");
        if details.author_name.is_empty() {
            lines.push(format!("   Posted {posted_on}"));
        } else {
            lines.push(format!("   From {} on {posted_on}", details.author_name));
        }
    }
    lines.push(format!("   Keywords: {}", signal.keyword_matches.join(", ")));
    if !signal.excerpt.is_empty() {
        lines.push(format!("   {}", signal.excerpt));
    }

    let Some(details) = details else {
        return;
    };
    if let Some(url) = &details.url {
        lines.push(format!("   Link: {url}"));
    }
    if let Some(metrics) = metrics_line(details) {
        lines.push(format!("   Metrics: {metrics}"));
    }
}

/// `12 reactions, 3 comments`, or whichever half is known.
fn metrics_line(details: &PostDetails) -> Option<String> {
    let parts: Vec<String> = [
        details.reactions.map(|count| format!("{count} reactions")),
        details.comments.map(|count| format!("{count} comments")),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

pub fn render_brief(brief: &Brief) -> String {
    let mut rendered = report_lines(brief).join("\n");
    rendered.push('\n');
    rendered
}

pub fn write_brief<W: Write>(brief: &Brief, mut writer: W) -> std::io::Result<()> {
    writer.write_all(render_brief(brief).as_bytes())?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::brief::domain::{BriefScope, Profile, ReportingWindow, SignalCategory};
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::BTreeMap;

    fn sample_brief() -> Brief {
        let generated_at = Utc.with_ymd_and_hms(2025, 9, 24, 8, 30, 0).unwrap();
        let mut company_sections = BTreeMap::new();
        company_sections.insert(
            "Zeta Capital".to_string(),
            vec![Signal {
                post_id: "z-1".to_string(),
                company: "Zeta Capital".to_string(),
                category: SignalCategory::Hiring,
                keyword_matches: vec!["hiring".to_string(), "open role".to_string()],
                score: 2.5,
                excerpt: "We are hiring for an open role".to_string(),
            }],
        );
        company_sections.insert("Acme Gold Loans".to_string(), Vec::new());

        let mut monitored_profiles = BTreeMap::new();
        monitored_profiles.insert(
            "Zeta Capital".to_string(),
            vec![Profile {
                id: "zoe".to_string(),
                name: "Zoe Zhang".to_string(),
                title: "Chief Executive Officer".to_string(),
                company: "Zeta Capital".to_string(),
                linkedin_url: "https://www.linkedin.com/in/zoe".to_string(),
            }],
        );

        let mut source_details = BTreeMap::new();
        source_details.insert(
            "z-1".to_string(),
            PostDetails {
                author_name: "Zoe Zhang".to_string(),
                posted_at: generated_at - Duration::days(2),
                url: Some("https://www.linkedin.com/posts/zoe_z-1".to_string()),
                reactions: Some(120),
                comments: Some(8),
            },
        );

        Brief {
            generated_at,
            window: Some(ReportingWindow {
                start: generated_at - Duration::days(7),
                end: generated_at,
            }),
            source_posts: 4,
            company_sections,
            monitored_profiles,
            source_details,
        }
    }

    #[test]
    fn report_layout_is_stable() {
        let rendered = render_brief(&sample_brief());
        let expected = "\
Weekly signal brief
===================
Generated at: 2025-09-24T08:30:00Z
Reporting window: 2025-09-17 -> 2025-09-24
Posts analysed: 4

Acme Gold Loans
---------------
No notable activity this period.

Zeta Capital
------------
Key profiles monitored:
- Zoe Zhang, Chief Executive Officer
Signals:
1. [Hiring] score 2.50 (post z-1)
   From Zoe Zhang on 2025-09-22
   Keywords: hiring, open role
   We are hiring for an open role
   Link: https://www.linkedin.com/posts/zoe_z-1
   Metrics: 120 reactions, 8 comments
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn empty_brief_states_no_data() {
        let generated_at = Utc.with_ymd_and_hms(2025, 9, 24, 8, 30, 0).unwrap();
        let scope = BriefScope::new().with_company("Acme Gold Loans");
        let rendered = render_brief(&Brief::without_data(&scope, generated_at));

        assert!(rendered.contains(NO_DATA_LINE));
        assert!(rendered.contains("Posts analysed: 0"));
        assert!(rendered.contains(NO_ACTIVITY_LINE));
        assert!(!rendered.contains("Signals:"));
    }

    #[test]
    fn sparse_post_details_render_what_is_known() {
        let mut brief = sample_brief();
        let details = brief
            .source_details
            .get_mut("z-1")
            .expect("sample details");
        details.author_name.clear();
        details.url = None;
        details.reactions = None;

        let rendered = render_brief(&brief);
        assert!(rendered.contains("   Posted 2025-09-22\n"));
        assert!(!rendered.contains("Link:"));
        assert!(rendered.contains("   Metrics: 8 comments\n"));

        brief.source_details.clear();
        let rendered = render_brief(&brief);
        assert!(!rendered.contains("Posted"));
        assert!(!rendered.contains("Metrics:"));
    }

    #[test]
    fn write_brief_emits_rendered_text() {
        let brief = sample_brief();
        let mut buffer = Vec::new();
        write_brief(&brief, &mut buffer).expect("write to buffer");
        assert_eq!(String::from_utf8(buffer).expect("utf8"), render_brief(&brief));
    }
}
