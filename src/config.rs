use crate::award::Eligibility;
use crate::clics_time::parse_duration;
use crate::models::team::{Team, TeamId};
use chrono::Duration;
use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("couldn't read config {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
    #[error("invalid duration {0:?}, expected HH:MM:SS")]
    InvalidDuration(String),
    #[error("unknown timezone {0:?}")]
    UnknownTimezone(String),
    #[error("at least one region is required")]
    NoRegions,
    #[error("team {team} is assigned to undeclared region {region:?}")]
    UnknownRegion { team: u64, region: String },
    #[error("contest duration must be positive, got {0}s")]
    EmptyContest(i64),
    #[error("freeze of {freeze_seconds}s must be shorter than the {duration_seconds}s contest")]
    FreezeTooLong {
        freeze_seconds: i64,
        duration_seconds: i64,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct OrganizationConfig {
    pub id: String,
    pub name: String,
    pub formal_name: String,
    pub country: Option<String>,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        OrganizationConfig {
            id: "IIITH".into(),
            name: "IIIT Hyderabad".into(),
            formal_name: "International Institute of Information Technology, Hyderabad".into(),
            country: Some("IND".into()),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedalCounts {
    pub gold: usize,
    pub silver: usize,
    pub bronze: usize,
}

impl Default for MedalCounts {
    fn default() -> Self {
        MedalCounts {
            gold: 4,
            silver: 4,
            bronze: 4,
        }
    }
}

impl MedalCounts {
    /// Cumulative last ranks for gold, silver and bronze.
    pub fn last_ranks(&self) -> (usize, usize, usize) {
        let silver = self.gold + self.silver;
        (self.gold, silver, silver + self.bronze)
    }
}

/// Decides which declared region (group) a team belongs to.
pub trait RegionPolicy {
    fn region_for(&self, team: &Team) -> String;
}

/// Sizes the prize tiers for a contest with `num_teams` teams.
pub trait MedalPolicy {
    fn medal_counts(&self, num_teams: usize) -> MedalCounts;
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    contest_id: u64,
    #[serde(default = "default_freeze_duration")]
    freeze_duration: String,
    #[serde(default = "default_penalty_time")]
    penalty_time: u32,
    #[serde(default = "default_language")]
    language: String,
    #[serde(default)]
    organization: OrganizationConfig,
    #[serde(default = "default_regions")]
    regions: Vec<String>,
    #[serde(default)]
    team_regions: HashMap<u64, String>,
    award_eligible_teams: Option<Vec<u64>>,
    #[serde(default)]
    medals: MedalCounts,
    #[serde(default = "default_timezone")]
    timezone: String,
}

fn default_freeze_duration() -> String {
    "01:00:00".into()
}

fn default_penalty_time() -> u32 {
    20
}

fn default_language() -> String {
    "C++".into()
}

fn default_regions() -> Vec<String> {
    vec!["Default".into()]
}

fn default_timezone() -> String {
    "UTC".into()
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub contest_id: u64,
    pub freeze_duration: Duration,
    /// Minutes charged per rejected run.
    pub penalty_time: u32,
    pub language: String,
    pub organization: OrganizationConfig,
    pub regions: Vec<String>,
    pub team_regions: HashMap<TeamId, String>,
    pub award_eligible: Eligibility,
    pub medals: MedalCounts,
    pub timezone: Tz,
}

impl TryFrom<RawConfig> for FeedConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let freeze_duration = parse_duration(&raw.freeze_duration)
            .ok_or_else(|| ConfigError::InvalidDuration(raw.freeze_duration.clone()))?;
        let timezone: Tz = raw
            .timezone
            .parse()
            .map_err(|_| ConfigError::UnknownTimezone(raw.timezone.clone()))?;
        if raw.regions.is_empty() {
            return Err(ConfigError::NoRegions);
        }
        for (team, region) in &raw.team_regions {
            if !raw.regions.contains(region) {
                return Err(ConfigError::UnknownRegion {
                    team: *team,
                    region: region.clone(),
                });
            }
        }

        Ok(FeedConfig {
            contest_id: raw.contest_id,
            freeze_duration,
            penalty_time: raw.penalty_time,
            language: raw.language,
            organization: raw.organization,
            regions: raw.regions,
            team_regions: raw
                .team_regions
                .into_iter()
                .map(|(team, region)| (TeamId(team), region))
                .collect(),
            award_eligible: match raw.award_eligible_teams {
                Some(teams) => Eligibility::Only(teams.into_iter().map(TeamId).collect()),
                None => Eligibility::Everyone,
            },
            medals: raw.medals,
            timezone,
        })
    }
}

impl FeedConfig {
    /// Configuration with every optional setting at its default.
    pub fn new(contest_id: u64) -> Self {
        FeedConfig {
            contest_id,
            freeze_duration: Duration::hours(1),
            penalty_time: default_penalty_time(),
            language: default_language(),
            organization: OrganizationConfig::default(),
            regions: default_regions(),
            team_regions: HashMap::new(),
            award_eligible: Eligibility::Everyone,
            medals: MedalCounts::default(),
            timezone: Tz::UTC,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(text)?;
        FeedConfig::try_from(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        FeedConfig::from_json(&text)
    }
}

impl RegionPolicy for FeedConfig {
    fn region_for(&self, team: &Team) -> String {
        self.team_regions
            .get(&team.id)
            .cloned()
            .unwrap_or_else(|| self.regions[0].clone())
    }
}

impl MedalPolicy for FeedConfig {
    fn medal_counts(&self, num_teams: usize) -> MedalCounts {
        let gold = self.medals.gold.min(num_teams);
        let silver = self.medals.silver.min(num_teams - gold);
        let bronze = self.medals.bronze.min(num_teams - gold - silver);
        MedalCounts {
            gold,
            silver,
            bronze,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: u64) -> Team {
        Team {
            id: TeamId(id),
            name: format!("team {}", id),
            members: vec![],
        }
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = FeedConfig::from_json(r#"{"contest_id": 364369}"#).unwrap();
        assert_eq!(config.contest_id, 364369);
        assert_eq!(config.freeze_duration, Duration::hours(1));
        assert_eq!(config.penalty_time, 20);
        assert_eq!(config.language, "C++");
        assert_eq!(config.regions, vec!["Default".to_string()]);
        assert_eq!(config.award_eligible, Eligibility::Everyone);
        assert_eq!(config.timezone, Tz::UTC);
    }

    #[test]
    fn full_config() {
        let config = FeedConfig::from_json(
            r#"{
                "contest_id": 1,
                "freeze_duration": "00:30:00",
                "regions": ["UG1", "Others"],
                "team_regions": {"5000": "UG1"},
                "award_eligible_teams": [5000, 1000002],
                "medals": {"gold": 1, "silver": 2, "bronze": 3},
                "timezone": "Asia/Kolkata"
            }"#,
        )
        .unwrap();
        assert_eq!(config.freeze_duration, Duration::minutes(30));
        assert_eq!(config.region_for(&team(5000)), "UG1");
        assert_eq!(config.region_for(&team(7)), "UG1");
        assert!(config.award_eligible.allows(TeamId(1_000_002)));
        assert!(!config.award_eligible.allows(TeamId(7)));
        assert_eq!(config.timezone, chrono_tz::Asia::Kolkata);
    }

    #[test]
    fn unassigned_teams_fall_into_the_first_region() {
        let mut config = FeedConfig::new(1);
        config.regions = vec!["Main".into(), "Guests".into()];
        config.team_regions.insert(TeamId(3), "Guests".into());
        assert_eq!(config.region_for(&team(3)), "Guests");
        assert_eq!(config.region_for(&team(4)), "Main");
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(matches!(
            FeedConfig::from_json(r#"{"contest_id": 1, "freeze_duration": "1h"}"#),
            Err(ConfigError::InvalidDuration(_))
        ));
        assert!(matches!(
            FeedConfig::from_json(r#"{"contest_id": 1, "timezone": "Mars/Olympus"}"#),
            Err(ConfigError::UnknownTimezone(_))
        ));
        assert!(matches!(
            FeedConfig::from_json(r#"{"contest_id": 1, "regions": []}"#),
            Err(ConfigError::NoRegions)
        ));
        assert!(matches!(
            FeedConfig::from_json(r#"{"contest_id": 1, "team_regions": {"4": "Nowhere"}}"#),
            Err(ConfigError::UnknownRegion { team: 4, .. })
        ));
        assert!(matches!(
            FeedConfig::from_json(r#"{"contest_id": 1, "medal_counts": {}}"#),
            Err(ConfigError::Decode(_))
        ));
    }

    #[test]
    fn medals_never_exceed_the_team_count() {
        let config = FeedConfig::new(1);
        assert_eq!(
            config.medal_counts(100),
            MedalCounts {
                gold: 4,
                silver: 4,
                bronze: 4
            }
        );
        assert_eq!(
            config.medal_counts(6),
            MedalCounts {
                gold: 4,
                silver: 2,
                bronze: 0
            }
        );
        assert_eq!(config.medal_counts(6).last_ranks(), (4, 6, 6));
        assert_eq!(config.medal_counts(0).last_ranks(), (0, 0, 0));
    }
}
