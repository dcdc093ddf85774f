use super::super::domain::{Brief, SignalCategory};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SignalEntryView {
    pub rank: usize,
    pub post_id: String,
    pub category: SignalCategory,
    pub category_label: &'static str,
    pub score: f64,
    pub keyword_matches: Vec<String>,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    pub linkedin_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanySectionView {
    pub company: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<ProfileView>,
    pub signals: Vec<SignalEntryView>,
}

/// Serializable form of a brief, in the same order as the text report.
#[derive(Debug, Clone, Serialize)]
pub struct BriefSummary {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_end: Option<DateTime<Utc>>,
    pub posts_analysed: usize,
    pub companies: Vec<CompanySectionView>,
}

impl Brief {
    pub fn summary(&self) -> BriefSummary {
        let companies = self
            .company_sections
            .iter()
            .map(|(company, signals)| CompanySectionView {
                company: company.clone(),
                profiles: self
                    .monitored_profiles
                    .get(company)
                    .map(|profiles| {
                        profiles
                            .iter()
                            .map(|profile| ProfileView {
                                name: profile.name.clone(),
                                title: profile.title.clone(),
                                linkedin_url: profile.linkedin_url.clone(),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
                signals: signals
                    .iter()
                    .enumerate()
                    .map(|(index, signal)| {
                        let details = self.details(&signal.post_id);
                        SignalEntryView {
                            rank: index + 1,
                            post_id: signal.post_id.clone(),
                            category: signal.category,
                            category_label: signal.category.label(),
                            score: signal.score,
                            keyword_matches: signal.keyword_matches.clone(),
                            excerpt: signal.excerpt.clone(),
                            author_name: details
                                .map(|details| details.author_name.clone())
                                .filter(|name| !name.is_empty()),
                            posted_at: details.map(|details| details.posted_at),
                            url: details.and_then(|details| details.url.clone()),
                            reactions: details.and_then(|details| details.reactions),
                            comments: details.and_then(|details| details.comments),
                        }
                    })
                    .collect(),
            })
            .collect();

        BriefSummary {
            generated_at: self.generated_at,
            window_start: self.window.map(|window| window.start),
            window_end: self.window.map(|window| window.end),
            posts_analysed: self.source_posts,
            companies,
        }
    }
}
