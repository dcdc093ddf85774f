use super::ConfigError;
use crate::workflows::brief::extractor::{
    KeywordRule, KeywordTable, KeywordTableScorer, DEFAULT_EXCERPT_CHARS, DEFAULT_WEIGHT,
};
use crate::workflows::brief::domain::{company_key, same_company};
use crate::workflows::brief::{BriefCompiler, BriefPipeline, Profile, SignalCategory};
use crate::workflows::snapshot::{MalformedRecordPolicy, SnapshotQuery};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;
pub const MAX_LOOKBACK_DAYS: u32 = 3650;

/// A monitored company and the executives tracked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyConfig {
    pub name: String,
    pub profiles: Vec<Profile>,
}

/// Tracked companies plus the pipeline policy knobs, loaded once per run and
/// passed explicitly to whatever needs it.
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    pub companies: Vec<CompanyConfig>,
    pub lookback_days: u32,
    pub max_signals_per_company: Option<usize>,
    pub malformed_records: MalformedRecordPolicy,
    pub excerpt_chars: usize,
    pub keywords: KeywordTable,
}

impl ProfileConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, Some(path))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Self::parse(raw, None)
    }

    fn parse(raw: &str, path: Option<&Path>) -> Result<Self, ConfigError> {
        let file: ProfileFile = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.map(Path::to_path_buf),
            source,
        })?;
        file.validate()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.companies
            .iter()
            .flat_map(|company| company.profiles.iter())
    }

    /// Case-insensitive lookup by company name.
    pub fn company(&self, name: &str) -> Option<&CompanyConfig> {
        self.companies
            .iter()
            .find(|company| same_company(&company.name, name))
    }

    pub fn snapshot_query(&self, company: Option<&str>) -> SnapshotQuery {
        SnapshotQuery::new(self.profiles().cloned().collect())
            .with_company(company.map(str::to_string))
    }

    pub fn scorer(&self) -> KeywordTableScorer {
        KeywordTableScorer::new(self.keywords.clone()).with_excerpt_chars(self.excerpt_chars)
    }

    pub fn compiler(&self) -> BriefCompiler {
        BriefCompiler::new().with_max_signals_per_company(self.max_signals_per_company)
    }

    pub fn pipeline(&self) -> BriefPipeline {
        BriefPipeline::new(self.scorer(), self.compiler())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
    #[serde(default)]
    lookback_days: Option<u32>,
    #[serde(default)]
    max_signals_per_company: Option<usize>,
    #[serde(default)]
    malformed_records: MalformedRecordPolicy,
    #[serde(default)]
    excerpt_chars: Option<usize>,
    #[serde(default)]
    company: Vec<CompanyEntry>,
    #[serde(default)]
    keyword: Vec<KeywordEntry>,
}

#[derive(Debug, Deserialize)]
struct CompanyEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    profile: Vec<ProfileEntry>,
}

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    name: String,
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KeywordEntry {
    category: String,
    keyword: String,
    #[serde(default)]
    weight: Option<f64>,
}

impl ProfileFile {
    fn validate(self) -> Result<ProfileConfig, ConfigError> {
        if self.company.is_empty() {
            return Err(ConfigError::NoCompanies);
        }

        let lookback_days = self.lookback_days.unwrap_or(DEFAULT_LOOKBACK_DAYS);
        check_lookback_days(lookback_days)?;

        if self.max_signals_per_company == Some(0) {
            return Err(ConfigError::InvalidSetting {
                key: "max_signals_per_company",
                reason: "must be at least 1 when set".to_string(),
            });
        }

        let excerpt_chars = self.excerpt_chars.unwrap_or(DEFAULT_EXCERPT_CHARS);
        if excerpt_chars == 0 {
            return Err(ConfigError::InvalidSetting {
                key: "excerpt_chars",
                reason: "must be at least 1".to_string(),
            });
        }

        let mut company_names: HashSet<String> = HashSet::new();
        let mut profile_ids: HashSet<String> = HashSet::new();
        let mut companies = Vec::with_capacity(self.company.len());

        for (position, entry) in self.company.into_iter().enumerate() {
            let name = entry
                .name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .ok_or(ConfigError::MissingCompanyName {
                    position: position + 1,
                })?;
            if !company_names.insert(company_key(&name)) {
                return Err(ConfigError::DuplicateCompany(name));
            }

            let mut profiles = Vec::with_capacity(entry.profile.len());
            for profile in entry.profile {
                let profile = build_profile(&name, profile)?;
                if !profile_ids.insert(profile.id.clone()) {
                    return Err(ConfigError::DuplicateProfileId(profile.id));
                }
                profiles.push(profile);
            }

            companies.push(CompanyConfig { name, profiles });
        }

        let keywords = if self.keyword.is_empty() {
            KeywordTable::standard()
        } else {
            KeywordTable::from_rules(
                self.keyword
                    .into_iter()
                    .map(build_rule)
                    .collect::<Result<Vec<_>, _>>()?,
            )
        };

        Ok(ProfileConfig {
            companies,
            lookback_days,
            max_signals_per_company: self.max_signals_per_company,
            malformed_records: self.malformed_records,
            excerpt_chars,
            keywords,
        })
    }
}

/// Lookbacks run from one day to [`MAX_LOOKBACK_DAYS`].
pub fn check_lookback_days(days: u32) -> Result<u32, ConfigError> {
    if (1..=MAX_LOOKBACK_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(ConfigError::InvalidSetting {
            key: "lookback_days",
            reason: format!("must be between 1 and {MAX_LOOKBACK_DAYS}, got {days}"),
        })
    }
}

fn build_profile(company: &str, entry: ProfileEntry) -> Result<Profile, ConfigError> {
    let url = entry.url.trim().to_string();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidProfileUrl {
            company: company.to_string(),
            url,
        });
    }

    let id = entry
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .or_else(|| profile_slug(&url))
        .ok_or_else(|| ConfigError::InvalidProfileUrl {
            company: company.to_string(),
            url: url.clone(),
        })?;

    Ok(Profile {
        id,
        name: entry.name.trim().to_string(),
        title: entry.title.unwrap_or_default().trim().to_string(),
        company: company.to_string(),
        linkedin_url: url,
    })
}

/// Last path segment of a profile URL, e.g. `jane-doe` for
/// `https://www.linkedin.com/in/jane-doe/`.
fn profile_slug(url: &str) -> Option<String> {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    let (_, slug) = path.rsplit_once('/')?;
    if slug.is_empty() {
        None
    } else {
        Some(slug.to_string())
    }
}

fn build_rule(entry: KeywordEntry) -> Result<KeywordRule, ConfigError> {
    let category =
        SignalCategory::from_key(&entry.category).ok_or_else(|| ConfigError::InvalidKeyword {
            keyword: entry.keyword.clone(),
            reason: format!("unknown category '{}'", entry.category),
        })?;

    if entry.keyword.trim().is_empty() {
        return Err(ConfigError::InvalidKeyword {
            keyword: entry.keyword,
            reason: "keyword must not be empty".to_string(),
        });
    }

    let weight = entry.weight.unwrap_or(DEFAULT_WEIGHT);
    if !weight.is_finite() || weight < 0.0 {
        return Err(ConfigError::InvalidKeyword {
            keyword: entry.keyword,
            reason: format!("weight {weight} must be a finite, non-negative number"),
        });
    }

    Ok(KeywordRule::new(category, &entry.keyword, weight))
}
