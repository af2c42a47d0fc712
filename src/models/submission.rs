use serde::Serialize;

/// Binary accept/reject outcome reported in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Judgement {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "WRONG")]
    Wrong,
}

impl Judgement {
    pub const ALL: [Judgement; 2] = [Judgement::Ok, Judgement::Wrong];

    pub fn acronym(self) -> &'static str {
        match self {
            Judgement::Ok => "OK",
            Judgement::Wrong => "WRONG",
        }
    }

    pub fn solved(self) -> bool {
        self == Judgement::Ok
    }

    pub fn penalty(self) -> bool {
        self == Judgement::Wrong
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Judged(Judgement),
    Ignore,
}

pub fn classify(verdict: Option<&str>) -> Classification {
    match verdict {
        None | Some("COMPILATION_ERROR") => Classification::Ignore,
        Some("OK") => Classification::Judged(Judgement::Ok),
        Some(_) => Classification::Judged(Judgement::Wrong),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_errors_and_pending_are_ignored() {
        assert_eq!(classify(None), Classification::Ignore);
        assert_eq!(classify(Some("COMPILATION_ERROR")), Classification::Ignore);
    }

    #[test]
    fn everything_but_ok_is_wrong() {
        assert_eq!(classify(Some("OK")), Classification::Judged(Judgement::Ok));
        for verdict in &[
            "WRONG_ANSWER",
            "TIME_LIMIT_EXCEEDED",
            "MEMORY_LIMIT_EXCEEDED",
            "RUNTIME_ERROR",
            "TESTING",
            "ok",
        ] {
            assert_eq!(
                classify(Some(verdict)),
                Classification::Judged(Judgement::Wrong),
                "{}",
                verdict
            );
        }
    }

    #[test]
    fn classification_is_pure() {
        for verdict in &[None, Some("OK"), Some("WRONG_ANSWER"), Some("COMPILATION_ERROR")] {
            assert_eq!(classify(*verdict), classify(*verdict));
        }
    }

    #[test]
    fn judgement_flags() {
        assert!(Judgement::Ok.solved() && !Judgement::Ok.penalty());
        assert!(!Judgement::Wrong.solved() && Judgement::Wrong.penalty());
    }
}
