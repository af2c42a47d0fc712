//! Turns Codeforces contest results into a CLICS contest event feed.

pub mod award;
pub mod clics_time;
pub mod config;
pub mod emitter;
pub mod event;
pub mod feed;
pub mod fetch;
pub mod import_codeforces;
pub mod language;
pub mod models;
pub mod output;

pub use config::{ConfigError, FeedConfig};
pub use feed::{Feed, FeedSummary, Synthesizer};
pub use fetch::FetchError;
pub use import_codeforces::{ContestInput, LoadError};
pub use models::SynthesisError;
pub use output::{Format, OutputError};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error(transparent)]
    Output(#[from] OutputError),
}
