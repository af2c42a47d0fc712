use crate::award::{first_to_solve, Solve};
use crate::clics_time::{ContestTime, Timestamp};
use crate::config::{ConfigError, FeedConfig, MedalPolicy, RegionPolicy};
use crate::emitter::EventEmitter;
use crate::event::*;
use crate::import_codeforces::{ContestInput, Submission};
use crate::language::ReportedLanguage;
use crate::models::contest::ContestTimeline;
use crate::models::problem::ProblemSet;
use crate::models::submission::{classify, Classification, Judgement};
use crate::models::team::{TeamResolver, TeamTable};
use crate::models::SynthesisError;
use chrono::prelude::*;
use log::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    /// Contestant submissions considered.
    pub total: usize,
    /// Submissions left out for a missing verdict or a compilation error.
    pub ignored: usize,
    pub judged: usize,
    pub teams: usize,
    /// Distinct upstream languages reported under the single feed language.
    pub languages: usize,
    pub awards: usize,
}

#[derive(Debug, Clone)]
pub struct Feed {
    pub events: Vec<Event>,
    pub summary: FeedSummary,
}

pub struct Synthesizer<'a> {
    config: &'a FeedConfig,
    regions: &'a dyn RegionPolicy,
    medals: &'a dyn MedalPolicy,
}

impl<'a> Synthesizer<'a> {
    pub fn new(config: &'a FeedConfig) -> Self {
        Synthesizer {
            config,
            regions: config,
            medals: config,
        }
    }

    pub fn with_region_policy(mut self, regions: &'a dyn RegionPolicy) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_medal_policy(mut self, medals: &'a dyn MedalPolicy) -> Self {
        self.medals = medals;
        self
    }

    fn timestamp(&self, instant: DateTime<Utc>) -> Timestamp {
        Timestamp::in_zone(instant, &self.config.timezone)
    }

    /// Builds the whole event feed. Nothing is returned unless every record is consistent.
    pub fn synthesize(
        &self,
        input: &ContestInput,
        now: DateTime<Utc>,
    ) -> Result<Feed, SynthesisError> {
        let contest = &input.standings.contest;
        let start_time_seconds = contest.start_time_seconds.ok_or_else(|| {
            SynthesisError::MalformedStandings("contest has not started".into())
        })?;
        let timeline = ContestTimeline::new(
            start_time_seconds,
            contest.duration_seconds,
            self.config.freeze_duration,
        )?;
        let finalization = timeline.finalize(now)?;
        let problems = ProblemSet::from_standings(&input.standings.problems);

        let contestants: Vec<Submission> = input
            .submissions
            .iter()
            .filter(|submission| submission.author.is_contestant())
            .cloned()
            .collect();
        let teams = TeamResolver::new().resolve(&contestants)?;

        let mut emitter = EventEmitter::new();
        let mut language = ReportedLanguage::new(&self.config.language);

        emitter.create(Payload::Contest(ContestInfo {
            id: self.config.contest_id.to_string(),
            name: contest.name.clone(),
            formal_name: contest.name.clone(),
            start_time: self.timestamp(timeline.started),
            duration: timeline.duration().into(),
            scoreboard_freeze_duration: timeline.freeze_duration().into(),
            penalty_time: self.config.penalty_time,
        }));
        emitter.create(Payload::Language(Language {
            id: language.id.clone(),
            name: language.name.clone(),
        }));
        for (index, region) in self.config.regions.iter().enumerate() {
            emitter.create(Payload::Group(Group {
                id: index.to_string(),
                name: region.clone(),
            }));
        }
        for judgement in Judgement::ALL.iter() {
            emitter.create(Payload::JudgementType(JudgementType {
                id: judgement.acronym().into(),
                name: judgement.acronym().into(),
                penalty: judgement.penalty(),
                solved: judgement.solved(),
            }));
        }
        for problem in problems.iter() {
            emitter.create(Payload::Problem(ProblemInfo {
                id: problem.feed_id(),
                label: problem.code.clone(),
                name: problem.name.clone(),
                ordinal: problem.ordinal,
                test_data_count: 1,
            }));
        }
        let organization = &self.config.organization;
        emitter.create(Payload::Organization(Organization {
            id: organization.id.clone(),
            name: organization.name.clone(),
            formal_name: organization.formal_name.clone(),
            country: organization.country.clone(),
        }));
        self.emit_teams(&mut emitter, &teams)?;

        emitter.state(Payload::State(StateInfo {
            started: Some(self.timestamp(timeline.started)),
            frozen: Some(self.timestamp(timeline.frozen)),
            thawed: Some(self.timestamp(timeline.thawed)),
            ..StateInfo::default()
        }));

        let mut summary = FeedSummary {
            total: contestants.len(),
            teams: teams.len(),
            ..FeedSummary::default()
        };
        let mut solves = Vec::new();
        for submission in &contestants {
            let judgement = match classify(submission.verdict.as_deref()) {
                Classification::Ignore => {
                    summary.ignored += 1;
                    continue;
                }
                Classification::Judged(judgement) => judgement,
            };
            let malformed = |reason: String| SynthesisError::MalformedRecord {
                submission_id: submission.id,
                reason,
            };
            let problem = problems.get(&submission.problem.index).ok_or_else(|| {
                malformed(format!("undeclared problem {}", submission.problem.index))
            })?;
            let team = teams
                .team_of(submission.id)
                .ok_or_else(|| malformed("author was not resolved".into()))?;

            let submitted = Utc
                .timestamp_opt(submission.creation_time_seconds, 0)
                .single()
                .map(|instant| self.timestamp(instant))
                .ok_or_else(|| {
                    malformed(format!(
                        "creation time {} is out of range",
                        submission.creation_time_seconds
                    ))
                })?;
            let contest_time =
                ContestTime::seconds(submission.relative_time_seconds).ok_or_else(|| {
                    malformed(format!(
                        "relative time {} is out of range",
                        submission.relative_time_seconds
                    ))
                })?;
            let id = submission.id.to_string();
            emitter.create(Payload::Submission(SubmissionInfo {
                id: id.clone(),
                language_id: language
                    .report(submission.programming_language.as_deref())
                    .to_string(),
                problem_id: problem.feed_id(),
                team_id: team.to_string(),
                time: submitted,
                contest_time,
            }));
            emitter.create(Payload::Judgement(JudgementInfo {
                id: id.clone(),
                submission_id: id,
                judgement_type_id: judgement.acronym().into(),
                start_time: submitted,
                start_contest_time: contest_time,
                end_time: submitted,
                end_contest_time: contest_time,
            }));
            summary.judged += 1;

            if judgement == Judgement::Ok {
                solves.push(Solve {
                    team,
                    problem_ordinal: problem.ordinal,
                    relative_time: submission.relative_time_seconds,
                });
            }
        }
        language.log_folded();
        summary.languages = language.folded().len();

        let awards = first_to_solve(&solves, &self.config.award_eligible, &problems);
        for award in &awards {
            debug!("{}: {:?}", award.citation, award.team_ids);
            emitter.create(Payload::Award(AwardInfo {
                id: award.feed_id(),
                citation: award.citation.clone(),
                team_ids: award.team_ids.iter().map(|t| t.to_string()).collect(),
            }));
        }
        summary.awards = awards.len();

        let (last_gold, last_silver, last_bronze) =
            self.medals.medal_counts(teams.len()).last_ranks();
        emitter.state(Payload::State(StateInfo {
            started: Some(self.timestamp(timeline.started)),
            frozen: Some(self.timestamp(timeline.frozen)),
            ended: Some(self.timestamp(timeline.ended)),
            thawed: Some(self.timestamp(timeline.thawed)),
            finalized: Some(self.timestamp(finalization.finalized)),
            end_of_updates: Some(self.timestamp(finalization.end_of_updates)),
            last_gold: Some(last_gold),
            last_silver: Some(last_silver),
            last_bronze: Some(last_bronze),
        }));

        info!("Total number of submissions: {}", summary.total);
        info!("> Submissions ignored: {}", summary.ignored);
        Ok(Feed {
            events: emitter.into_events(),
            summary,
        })
    }

    fn emit_teams(
        &self,
        emitter: &mut EventEmitter,
        teams: &TeamTable,
    ) -> Result<(), SynthesisError> {
        for team in teams.iter() {
            let region = self.regions.region_for(team);
            let group = self
                .config
                .regions
                .iter()
                .position(|declared| *declared == region)
                .ok_or_else(|| ConfigError::UnknownRegion {
                    team: team.id.0,
                    region: region.clone(),
                })?;
            emitter.create(Payload::Team(TeamInfo {
                id: team.id.to_string(),
                name: team.name.clone(),
                members: team.members.clone(),
                organization_id: self.config.organization.id.clone(),
                group_ids: vec![group.to_string()],
            }));
        }
        Ok(())
    }
}
