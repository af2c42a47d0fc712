use super::SynthesisError;
use crate::clics_time::checked_seconds;
use crate::config::ConfigError;
use chrono::prelude::*;
use chrono::Duration;

/// Delay between the end of the contest and the scoreboard thaw.
pub const THAW_DELAY_SECONDS: i64 = 300;
/// Delay between finalization and the end of updates.
pub const END_OF_UPDATES_DELAY_SECONDS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ContestPhase {
    NotStarted,
    Running,
    Frozen,
    Thawed,
    Finalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContestTimeline {
    pub started: DateTime<Utc>,
    pub frozen: DateTime<Utc>,
    pub ended: DateTime<Utc>,
    pub thawed: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finalization {
    pub finalized: DateTime<Utc>,
    pub end_of_updates: DateTime<Utc>,
}

impl ContestTimeline {
    pub fn new(
        start_time_seconds: i64,
        duration_seconds: i64,
        freeze: Duration,
    ) -> Result<ContestTimeline, SynthesisError> {
        if duration_seconds <= 0 {
            return Err(ConfigError::EmptyContest(duration_seconds).into());
        }
        let duration = checked_seconds(duration_seconds).ok_or_else(|| {
            SynthesisError::MalformedStandings(format!(
                "contest duration {}s is out of range",
                duration_seconds
            ))
        })?;
        if freeze < Duration::zero() || freeze >= duration {
            return Err(ConfigError::FreezeTooLong {
                freeze_seconds: freeze.num_seconds(),
                duration_seconds,
            }
            .into());
        }

        let started = Utc
            .timestamp_opt(start_time_seconds, 0)
            .single()
            .ok_or_else(|| {
                SynthesisError::MalformedStandings(format!(
                    "start time {} is out of range",
                    start_time_seconds
                ))
            })?;
        let (ended, thawed) = started
            .checked_add_signed(duration)
            .and_then(|ended| {
                let thawed = ended.checked_add_signed(Duration::seconds(THAW_DELAY_SECONDS))?;
                Some((ended, thawed))
            })
            .ok_or_else(|| {
                SynthesisError::MalformedStandings(format!(
                    "contest of {}s starting at {} ends out of range",
                    duration_seconds, start_time_seconds
                ))
            })?;
        Ok(ContestTimeline {
            started,
            frozen: ended - freeze,
            ended,
            thawed,
        })
    }

    pub fn duration(&self) -> Duration {
        self.ended - self.started
    }

    pub fn freeze_duration(&self) -> Duration {
        self.ended - self.frozen
    }

    pub fn phase_at(
        &self,
        now: DateTime<Utc>,
        finalization: Option<&Finalization>,
    ) -> ContestPhase {
        if finalization.map_or(false, |f| now >= f.finalized) {
            ContestPhase::Finalized
        } else if now < self.started {
            ContestPhase::NotStarted
        } else if now < self.frozen {
            ContestPhase::Running
        } else if now < self.thawed {
            ContestPhase::Frozen
        } else {
            ContestPhase::Thawed
        }
    }

    pub fn finalize(&self, now: DateTime<Utc>) -> Result<Finalization, SynthesisError> {
        if now <= self.thawed {
            return Err(SynthesisError::ContestNotOver {
                phase: self.phase_at(now, None),
                thawed: self.thawed.to_rfc3339(),
                now: now.to_rfc3339(),
            });
        }
        Ok(Finalization {
            finalized: now,
            end_of_updates: now + Duration::seconds(END_OF_UPDATES_DELAY_SECONDS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: i64 = 1_642_169_400;

    #[test]
    fn phase_boundaries() {
        let timeline = ContestTimeline::new(START, 5 * 3600, Duration::hours(1)).unwrap();
        assert_eq!(timeline.started.timestamp(), START);
        assert_eq!(timeline.ended.timestamp(), START + 5 * 3600);
        assert_eq!(timeline.frozen.timestamp(), START + 4 * 3600);
        assert_eq!(timeline.thawed.timestamp(), START + 5 * 3600 + 300);
        assert!(timeline.started < timeline.frozen);
        assert!(timeline.frozen <= timeline.ended);
        assert!(timeline.ended < timeline.thawed);
        assert_eq!(timeline.freeze_duration(), Duration::hours(1));
    }

    #[test]
    fn zero_freeze_freezes_at_the_end() {
        let timeline = ContestTimeline::new(START, 3600, Duration::zero()).unwrap();
        assert_eq!(timeline.frozen, timeline.ended);
    }

    #[test]
    fn freeze_must_fit_in_the_contest() {
        assert!(matches!(
            ContestTimeline::new(START, 3600, Duration::hours(2)),
            Err(SynthesisError::Config(ConfigError::FreezeTooLong {
                freeze_seconds: 7200,
                duration_seconds: 3600
            }))
        ));
        assert!(ContestTimeline::new(START, 3600, Duration::hours(1)).is_err());
        assert!(matches!(
            ContestTimeline::new(START, 0, Duration::zero()),
            Err(SynthesisError::Config(ConfigError::EmptyContest(0)))
        ));
    }

    #[test]
    fn out_of_range_standings_are_malformed() {
        assert!(matches!(
            ContestTimeline::new(START, 9_000_000_000_000_000_000, Duration::hours(1)),
            Err(SynthesisError::MalformedStandings(_))
        ));
        assert!(matches!(
            ContestTimeline::new(i64::MAX, 3600, Duration::zero()),
            Err(SynthesisError::MalformedStandings(_))
        ));
        assert!(matches!(
            ContestTimeline::new(START, 9_000_000_000_000_000, Duration::zero()),
            Err(SynthesisError::MalformedStandings(_))
        ));
    }

    #[test]
    fn phases_advance_with_time() {
        let timeline = ContestTimeline::new(START, 7200, Duration::minutes(30)).unwrap();
        let at = |offset: i64| Utc.timestamp(START + offset, 0);
        assert_eq!(timeline.phase_at(at(-1), None), ContestPhase::NotStarted);
        assert_eq!(timeline.phase_at(at(0), None), ContestPhase::Running);
        assert_eq!(timeline.phase_at(at(5400), None), ContestPhase::Frozen);
        assert_eq!(timeline.phase_at(at(7200 + 300), None), ContestPhase::Thawed);

        let finalization = timeline.finalize(at(9000)).unwrap();
        assert_eq!(
            timeline.phase_at(at(8000), Some(&finalization)),
            ContestPhase::Thawed
        );
        assert_eq!(
            timeline.phase_at(at(9000), Some(&finalization)),
            ContestPhase::Finalized
        );
    }

    #[test]
    fn finalize_after_thaw_only() {
        let timeline = ContestTimeline::new(START, 7200, Duration::minutes(30)).unwrap();
        assert!(matches!(
            timeline.finalize(timeline.ended),
            Err(SynthesisError::ContestNotOver {
                phase: ContestPhase::Frozen,
                ..
            })
        ));
        assert!(matches!(
            timeline.finalize(timeline.thawed),
            Err(SynthesisError::ContestNotOver {
                phase: ContestPhase::Thawed,
                ..
            })
        ));
        let now = timeline.thawed + Duration::days(1);
        let finalization = timeline.finalize(now).unwrap();
        assert_eq!(finalization.finalized, now);
        assert_eq!(
            finalization.end_of_updates - finalization.finalized,
            Duration::seconds(60)
        );
    }
}
