use super::SynthesisError;
use crate::import_codeforces::Submission;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Synthesized ids start here; upstream team ids must stay below it.
pub const INDIVIDUAL_ID_BASE: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TeamId(pub u64);

impl TeamId {
    pub fn is_synthesized(self) -> bool {
        self.0 >= INDIVIDUAL_ID_BASE
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub members: Vec<String>,
}

/// Canonical teams in first-appearance order, plus the team each submission resolved to.
#[derive(Debug, Clone, Default)]
pub struct TeamTable {
    teams: Vec<Team>,
    positions: HashMap<TeamId, usize>,
    by_submission: HashMap<u64, TeamId>,
}

impl TeamTable {
    fn record(&mut self, submission_id: u64, team: Team) {
        self.by_submission.insert(submission_id, team.id);
        match self.positions.get(&team.id) {
            Some(&position) => self.teams[position] = team,
            None => {
                self.positions.insert(team.id, self.teams.len());
                self.teams.push(team);
            }
        }
    }

    pub fn team_of(&self, submission_id: u64) -> Option<TeamId> {
        self.by_submission.get(&submission_id).copied()
    }

    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.positions.get(&id).map(|&position| &self.teams[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Assigns every author a canonical team, inventing one-person teams for individuals.
#[derive(Debug, Default)]
pub struct TeamResolver {
    individuals: HashMap<String, u64>,
}

impl TeamResolver {
    pub fn new() -> Self {
        TeamResolver::default()
    }

    pub fn resolve(&mut self, submissions: &[Submission]) -> Result<TeamTable, SynthesisError> {
        let mut table = TeamTable::default();
        for submission in submissions {
            let team = self.resolve_author(submission)?;
            table.record(submission.id, team);
        }
        debug!(
            "Resolved {} teams, {} of them individuals",
            table.len(),
            self.individuals.len()
        );
        Ok(table)
    }

    pub fn resolve_author(&mut self, submission: &Submission) -> Result<Team, SynthesisError> {
        let malformed = |reason: &str| SynthesisError::MalformedRecord {
            submission_id: submission.id,
            reason: reason.into(),
        };
        let author = &submission.author;
        let members = author.handles();
        if members.is_empty() {
            return Err(malformed("author has no members"));
        }

        match (author.team_id, &author.team_name) {
            (Some(id), _) if TeamId(id).is_synthesized() => Err(malformed(&format!(
                "team id {} collides with the individual id range",
                id
            ))),
            (Some(id), Some(name)) => Ok(Team {
                id: TeamId(id),
                name: name.clone(),
                members,
            }),
            (Some(_), None) => Err(malformed("team id without a team name")),
            (None, _) if members.len() > 1 => {
                Err(malformed("several members but no team id"))
            }
            (None, _) => {
                let handle = members[0].clone();
                let next = self.individuals.len() as u64;
                let index = *self.individuals.entry(handle.clone()).or_insert(next);
                Ok(Team {
                    id: TeamId(INDIVIDUAL_ID_BASE + index),
                    name: handle,
                    members,
                })
            }
        }
    }
}
