use log::debug;
use std::collections::BTreeMap;

pub const REPORTED_LANGUAGE_ID: &str = "1";

/// The single language every submission is reported under.
#[derive(Debug, Clone)]
pub struct ReportedLanguage {
    pub id: String,
    pub name: String,
    seen: BTreeMap<String, usize>,
}

impl ReportedLanguage {
    pub fn new(name: &str) -> Self {
        ReportedLanguage {
            id: REPORTED_LANGUAGE_ID.into(),
            name: name.into(),
            seen: BTreeMap::new(),
        }
    }

    /// Maps an upstream language to the reported one, keeping count of what was folded.
    pub fn report(&mut self, upstream: Option<&str>) -> &str {
        let upstream = upstream.unwrap_or("unknown");
        *self.seen.entry(upstream.to_string()).or_insert(0) += 1;
        &self.id
    }

    pub fn folded(&self) -> &BTreeMap<String, usize> {
        &self.seen
    }

    pub fn log_folded(&self) {
        for (upstream, count) in &self.seen {
            debug!("Reported {} submissions in {:?} as {}", count, upstream, self.name);
        }
    }
}
