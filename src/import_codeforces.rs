use std::fs;
use std::path::Path;

mod error {
    use std::io;
    use std::path::PathBuf;
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum LoadError {
        #[error("{document} reported status {status:?}: {comment}")]
        UpstreamStatus {
            document: &'static str,
            status: String,
            comment: String,
        },
        #[error("{document} is missing {field}")]
        Incomplete {
            document: &'static str,
            field: &'static str,
        },
        #[error("couldn't decode {document}")]
        JsonDecode {
            document: &'static str,
            #[source]
            source: serde_json::Error,
        },
        #[error("couldn't read {path:?}")]
        Io {
            path: PathBuf,
            #[source]
            source: io::Error,
        },
    }
}

pub use error::LoadError;

mod json {
    use prelude::*;

    #[derive(Deserialize, Debug)]
    pub struct Envelope<T> {
        pub status: String,
        pub comment: Option<String>,
        pub result: Option<T>,
    }

    pub fn unwrap_envelope<T: for<'de> Deserialize<'de>>(
        document: &'static str,
        text: &str,
    ) -> Result<T, LoadError> {
        let envelope: Envelope<T> = serde_json::from_str(text)
            .map_err(|source| LoadError::JsonDecode { document, source })?;
        if envelope.status != "OK" {
            return Err(LoadError::UpstreamStatus {
                document,
                status: envelope.status,
                comment: envelope.comment.unwrap_or_default(),
            });
        }
        envelope.result.ok_or(LoadError::Incomplete {
            document,
            field: "result",
        })
    }

    pub mod prelude {
        pub use super::super::LoadError;
        pub use serde::Deserialize;
    }

    pub mod status {
        use super::prelude::*;

        #[derive(Deserialize, Debug, Clone, PartialEq)]
        #[serde(rename_all = "camelCase")]
        pub struct Submission {
            pub id: u64,
            pub creation_time_seconds: i64,
            pub relative_time_seconds: i64,
            pub problem: ProblemRef,
            pub author: Party,
            pub programming_language: Option<String>,
            pub verdict: Option<String>,
        }

        #[derive(Deserialize, Debug, Clone, PartialEq)]
        pub struct ProblemRef {
            pub index: String,
            pub name: Option<String>,
        }

        #[derive(Deserialize, Debug, Clone, PartialEq)]
        #[serde(rename_all = "camelCase")]
        pub struct Party {
            #[serde(default)]
            pub members: Vec<Member>,
            pub participant_type: String,
            pub team_id: Option<u64>,
            pub team_name: Option<String>,
        }

        #[derive(Deserialize, Debug, Clone, PartialEq)]
        pub struct Member {
            pub handle: String,
        }

        impl Party {
            pub fn is_contestant(&self) -> bool {
                self.participant_type == "CONTESTANT"
            }

            pub fn handles(&self) -> Vec<String> {
                self.members.iter().map(|m| m.handle.clone()).collect()
            }
        }

        pub fn parse(text: &str) -> Result<Vec<Submission>, LoadError> {
            super::unwrap_envelope("submission list", text)
        }
    }

    pub mod standings {
        use super::prelude::*;

        #[derive(Deserialize, Debug, Clone, PartialEq)]
        pub struct Standings {
            pub contest: Contest,
            pub problems: Vec<Problem>,
        }

        #[derive(Deserialize, Debug, Clone, PartialEq)]
        #[serde(rename_all = "camelCase")]
        pub struct Contest {
            pub id: u64,
            pub name: String,
            pub duration_seconds: i64,
            pub start_time_seconds: Option<i64>,
        }

        #[derive(Deserialize, Debug, Clone, PartialEq)]
        pub struct Problem {
            pub index: String,
            pub name: String,
        }

        pub fn parse(text: &str) -> Result<Standings, LoadError> {
            let standings: Standings = super::unwrap_envelope("standings", text)?;
            if standings.contest.start_time_seconds.is_none() {
                return Err(LoadError::Incomplete {
                    document: "standings",
                    field: "contest.startTimeSeconds",
                });
            }
            Ok(standings)
        }
    }
}

pub use json::standings::{Contest, Problem, Standings};
pub use json::status::{Member, Party, ProblemRef, Submission};

/// Both upstream documents, fully materialized.
#[derive(Debug, Clone, PartialEq)]
pub struct ContestInput {
    pub submissions: Vec<Submission>,
    pub standings: Standings,
}

impl ContestInput {
    pub fn parse(status_text: &str, standings_text: &str) -> Result<Self, LoadError> {
        Ok(ContestInput {
            submissions: json::status::parse(status_text)?,
            standings: json::standings::parse(standings_text)?,
        })
    }

    pub fn load(status_path: &Path, standings_path: &Path) -> Result<Self, LoadError> {
        let standings = json::standings::parse(&read_document(standings_path)?)?;
        let submissions = json::status::parse(&read_document(status_path)?)?;
        Ok(ContestInput {
            submissions,
            standings,
        })
    }
}

fn read_document(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
