use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An executive profile tracked for a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub title: String,
    pub company: String,
    pub linkedin_url: String,
}

/// A single post captured in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: String,
    pub profile_id: String,
    pub author_name: String,
    pub company: String,
    pub posted_at: DateTime<Utc>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Hiring,
    Expansion,
    LeadershipChange,
    DigitalInitiative,
    Other,
}

impl SignalCategory {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Hiring,
            Self::Expansion,
            Self::LeadershipChange,
            Self::DigitalInitiative,
            Self::Other,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hiring => "Hiring",
            Self::Expansion => "Expansion",
            Self::LeadershipChange => "Leadership Change",
            Self::DigitalInitiative => "Digital Initiative",
            Self::Other => "Other",
        }
    }

    /// Accepts `hiring`, `HIRING`, `leadership_change`, `leadership-change`
    /// and the display label.
    pub fn from_key(value: &str) -> Option<Self> {
        let key: String = value
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "hiring" => Some(Self::Hiring),
            "expansion" => Some(Self::Expansion),
            "leadershipchange" => Some(Self::LeadershipChange),
            "digitalinitiative" => Some(Self::DigitalInitiative),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Scored indicator derived from one post. Never mutated after extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub post_id: String,
    pub company: String,
    pub category: SignalCategory,
    pub keyword_matches: Vec<String>,
    pub score: f64,
    pub excerpt: String,
}

/// Time span the brief covers, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportingWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Who posted a signal's source post, when, and how it was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDetails {
    pub author_name: String,
    pub posted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<u32>,
}

impl From<&Post> for PostDetails {
    fn from(post: &Post) -> Self {
        Self {
            author_name: post.author_name.clone(),
            posted_at: post.posted_at,
            url: post.url.clone(),
            reactions: post.reactions,
            comments: post.comments,
        }
    }
}

/// Company names compare trimmed and case-folded (Unicode-aware).
pub(crate) fn company_key(name: &str) -> String {
    name.trim().to_lowercase()
}

pub(crate) fn same_company(a: &str, b: &str) -> bool {
    company_key(a) == company_key(b)
}

/// Companies and profiles a brief is expected to cover, independent of which
/// companies actually produced signals.
#[derive(Debug, Clone, Default)]
pub struct BriefScope {
    pub companies: Vec<String>,
    pub profiles: Vec<Profile>,
    pub window: Option<ReportingWindow>,
}

impl BriefScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        let company = company.into();
        if self.matching_company(&company).is_none() {
            self.companies.push(company);
        }
        self
    }

    pub fn with_profiles(mut self, profiles: impl IntoIterator<Item = Profile>) -> Self {
        self.profiles.extend(profiles);
        self
    }

    pub fn with_window(mut self, window: ReportingWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Spelling used for a company section: the scope's own spelling when the
    /// name matches ignoring case, otherwise the trimmed input.
    pub fn canonical_company(&self, company: &str) -> String {
        self.matching_company(company)
            .map(str::to_string)
            .unwrap_or_else(|| company.trim().to_string())
    }

    fn matching_company(&self, company: &str) -> Option<&str> {
        self.companies
            .iter()
            .find(|known| same_company(known, company))
            .map(String::as_str)
    }
}

/// Ranked signals grouped by company for one reporting period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Brief {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<ReportingWindow>,
    pub source_posts: usize,
    pub company_sections: BTreeMap<String, Vec<Signal>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub monitored_profiles: BTreeMap<String, Vec<Profile>>,
    /// Keyed by post id; covers every post a retained signal came from.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub source_details: BTreeMap<String, PostDetails>,
}

impl Brief {
    /// Brief for a run that had nothing to analyse: every scoped company gets
    /// an empty section.
    pub fn without_data(scope: &BriefScope, generated_at: DateTime<Utc>) -> Self {
        let company_sections = scope
            .companies
            .iter()
            .map(|company| (company.clone(), Vec::new()))
            .collect();

        Self {
            generated_at,
            window: scope.window,
            source_posts: 0,
            company_sections,
            monitored_profiles: profiles_by_company(scope),
            source_details: BTreeMap::new(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.source_posts > 0
    }

    pub fn signal_count(&self) -> usize {
        self.company_sections.values().map(Vec::len).sum()
    }

    pub fn section(&self, company: &str) -> Option<&[Signal]> {
        self.company_sections.get(company).map(Vec::as_slice)
    }

    pub fn details(&self, post_id: &str) -> Option<&PostDetails> {
        self.source_details.get(post_id)
    }
}

pub(crate) fn profiles_by_company(scope: &BriefScope) -> BTreeMap<String, Vec<Profile>> {
    let mut grouped: BTreeMap<String, Vec<Profile>> = BTreeMap::new();
    for profile in &scope.profiles {
        grouped
            .entry(scope.canonical_company(&profile.company))
            .or_default()
            .push(profile.clone());
    }
    grouped
}
