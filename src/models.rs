pub mod contest;
pub mod problem;
pub mod submission;
pub mod team;

use crate::config::ConfigError;
use contest::ContestPhase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("submission {submission_id}: {reason}")]
    MalformedRecord { submission_id: u64, reason: String },
    #[error("standings: {0}")]
    MalformedStandings(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("contest is not over yet ({phase:?}): scoreboard thaws at {thawed}, now is {now}")]
    ContestNotOver {
        phase: ContestPhase,
        thawed: String,
        now: String,
    },
}
