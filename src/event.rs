//! Entity records of the contest event feed.

use crate::clics_time::{ContestTime, Timestamp};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Contests,
    Languages,
    Groups,
    JudgementTypes,
    Problems,
    Organizations,
    Teams,
    State,
    Submissions,
    Judgements,
    Awards,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Contests => "contests",
            EntityType::Languages => "languages",
            EntityType::Groups => "groups",
            EntityType::JudgementTypes => "judgement-types",
            EntityType::Problems => "problems",
            EntityType::Organizations => "organizations",
            EntityType::Teams => "teams",
            EntityType::State => "state",
            EntityType::Submissions => "submissions",
            EntityType::Judgements => "judgements",
            EntityType::Awards => "awards",
        }
    }

    /// Element name used by the XML rendering.
    pub fn element_name(self) -> &'static str {
        match self {
            EntityType::Contests => "info",
            EntityType::Languages => "language",
            EntityType::Groups => "group",
            EntityType::JudgementTypes => "judgement-type",
            EntityType::Problems => "problem",
            EntityType::Organizations => "organization",
            EntityType::Teams => "team",
            EntityType::State => "state",
            EntityType::Submissions => "submission",
            EntityType::Judgements => "judgement",
            EntityType::Awards => "award",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContestInfo {
    pub id: String,
    pub name: String,
    pub formal_name: String,
    pub start_time: Timestamp,
    pub duration: ContestTime,
    pub scoreboard_freeze_duration: ContestTime,
    pub penalty_time: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Language {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgementType {
    pub id: String,
    pub name: String,
    pub penalty: bool,
    pub solved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemInfo {
    pub id: String,
    pub label: String,
    pub name: String,
    pub ordinal: usize,
    pub test_data_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub formal_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamInfo {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
    pub organization_id: String,
    pub group_ids: Vec<String>,
}

/// Contest state. Fields that haven't happened yet are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StateInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thawed: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalized: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_of_updates: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_gold: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_silver: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_bronze: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionInfo {
    pub id: String,
    pub language_id: String,
    pub problem_id: String,
    pub team_id: String,
    pub time: Timestamp,
    pub contest_time: ContestTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgementInfo {
    pub id: String,
    pub submission_id: String,
    pub judgement_type_id: String,
    pub start_time: Timestamp,
    pub start_contest_time: ContestTime,
    pub end_time: Timestamp,
    pub end_contest_time: ContestTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwardInfo {
    pub id: String,
    pub citation: String,
    pub team_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Contest(ContestInfo),
    Language(Language),
    Group(Group),
    JudgementType(JudgementType),
    Problem(ProblemInfo),
    Organization(Organization),
    Team(TeamInfo),
    State(StateInfo),
    Submission(SubmissionInfo),
    Judgement(JudgementInfo),
    Award(AwardInfo),
}

impl Payload {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Payload::Contest(_) => EntityType::Contests,
            Payload::Language(_) => EntityType::Languages,
            Payload::Group(_) => EntityType::Groups,
            Payload::JudgementType(_) => EntityType::JudgementTypes,
            Payload::Problem(_) => EntityType::Problems,
            Payload::Organization(_) => EntityType::Organizations,
            Payload::Team(_) => EntityType::Teams,
            Payload::State(_) => EntityType::State,
            Payload::Submission(_) => EntityType::Submissions,
            Payload::Judgement(_) => EntityType::Judgements,
            Payload::Award(_) => EntityType::Awards,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub op: Operation,
    pub data: Payload,
}

impl Event {
    pub fn entity_type(&self) -> EntityType {
        self.data.entity_type()
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut event = serializer.serialize_struct("Event", 4)?;
        event.serialize_field("type", &self.entity_type())?;
        event.serialize_field("id", &self.id)?;
        event.serialize_field("op", &self.op)?;
        event.serialize_field("data", &self.data)?;
        event.end()
    }
}
