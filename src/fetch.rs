use log::{info, warn};
use rand::Rng;
use reqwest::blocking::Client;
use serde_json::Value;
use sha2::{Digest, Sha512};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

const API_BASE_URL: &str = "https://codeforces.com/api/";
/// Upstream rejects clients that call more often than this.
const REQUEST_DELAY: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("couldn't build http client")]
    Client(#[source] reqwest::Error),
    #[error("request for {method} failed")]
    Request {
        method: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} answered HTTP {status} without an API response")]
    NotAnApiResponse { method: String, status: u16 },
    #[error("couldn't write {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Clone)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl Credentials {
    /// Reads `CF_API_KEY` and `CF_API_SECRET`; both must be set.
    pub fn from_env() -> Option<Credentials> {
        Some(Credentials {
            key: env::var("CF_API_KEY").ok()?,
            secret: env::var("CF_API_SECRET").ok()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ApiCall {
    method: String,
    params: Vec<(String, String)>,
}

impl ApiCall {
    pub fn new(method: &str) -> Self {
        ApiCall {
            method: method.into(),
            params: Vec::new(),
        }
    }

    pub fn submission_list(contest_id: u64) -> Self {
        let mut call = ApiCall::new("contest.status");
        call.add("contestId", contest_id)
            .add("from", 1)
            .add("count", 5000);
        call
    }

    pub fn standings(contest_id: u64) -> Self {
        let mut call = ApiCall::new("contest.standings");
        call.add("contestId", contest_id)
            .add("from", 1)
            .add("count", 1);
        call
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn add(&mut self, param: &str, value: impl ToString) -> &mut Self {
        self.params.push((param.into(), value.to_string()));
        self
    }

    fn query(params: &[(String, String)]) -> String {
        let mut params = params.to_vec();
        params.sort();
        params
            .iter()
            .map(|(param, value)| format!("{}={}", param, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn call(method: &str, params: &[(String, String)]) -> String {
        if params.is_empty() {
            method.to_string()
        } else {
            format!("{}?{}", method, ApiCall::query(params))
        }
    }

    pub fn unsigned_path(&self) -> String {
        ApiCall::call(&self.method, &self.params)
    }

    /// Signs with `apiSig = rand + sha512(rand/call#secret)`, `rand` being six digits.
    pub fn signed_path(&self, credentials: &Credentials, time: u64, rand: &str) -> String {
        let mut params = self.params.clone();
        params.push(("apiKey".into(), credentials.key.clone()));
        params.push(("time".into(), time.to_string()));
        let call = ApiCall::call(&self.method, &params);
        let digest = Sha512::digest(format!("{}/{}#{}", rand, call, credentials.secret).as_bytes());
        format!("{}&apiSig={}{}", call, rand, hex::encode(digest))
    }
}

fn random_signature_prefix() -> String {
    let mut rng = rand::thread_rng();
    (0..6)
        .map(|_| char::from(b'0' + rng.gen_range(1..=9u8)))
        .collect()
}

/// True for a JSON object carrying the `status` field every API answer has.
fn is_api_envelope(body: &[u8]) -> bool {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => fields.get("status").map_or(false, Value::is_string),
        _ => false,
    }
}

pub struct Fetcher {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl Fetcher {
    pub fn new(credentials: Option<Credentials>) -> Result<Self, FetchError> {
        let client = Client::builder().build().map_err(FetchError::Client)?;
        Ok(Fetcher {
            client,
            base_url: API_BASE_URL.into(),
            credentials,
        })
    }

    pub fn url(&self, call: &ApiCall) -> String {
        let path = match &self.credentials {
            Some(credentials) => {
                let time = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or_default();
                call.signed_path(credentials, time, &random_signature_prefix())
            }
            None => call.unsigned_path(),
        };
        format!("{}{}", self.base_url, path)
    }

    /// Saves the API answer to `path`. A failed status envelope is saved too and left for the
    /// loader to report; anything else, like a proxy error page, is never written.
    pub fn fetch_to_file(&self, call: &ApiCall, path: &Path) -> Result<(), FetchError> {
        info!("Fetching {}...", call.method());
        sleep(REQUEST_DELAY);
        let request_error = |source| FetchError::Request {
            method: call.method().into(),
            source,
        };
        let response = self.client.get(self.url(call)).send().map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            warn!("{} returned status {}", call.method(), status);
        }
        let body = response.bytes().map_err(request_error)?;
        if !is_api_envelope(&body) {
            return Err(FetchError::NotAnApiResponse {
                method: call.method().into(),
                status: status.as_u16(),
            });
        }
        fs::write(path, &body).map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Done! Wrote {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_parameters_are_sorted() {
        let mut call = ApiCall::new("contest.status");
        call.add("from", 1).add("contestId", 566).add("count", 10);
        assert_eq!(
            call.unsigned_path(),
            "contest.status?contestId=566&count=10&from=1"
        );
        assert_eq!(ApiCall::new("problemset.problems").unsigned_path(), "problemset.problems");
    }

    #[test]
    fn signature_matches_the_documented_scheme() {
        let credentials = Credentials {
            key: "xxx".into(),
            secret: "yyy".into(),
        };
        let mut call = ApiCall::new("contest.hacks");
        call.add("contestId", 566);
        let path = call.signed_path(&credentials, 1_000_000_000, "123456");

        let expected_call = "contest.hacks?apiKey=xxx&contestId=566&time=1000000000";
        let digest = Sha512::digest(format!("123456/{}#yyy", expected_call).as_bytes());
        assert_eq!(
            path,
            format!("{}&apiSig=123456{}", expected_call, hex::encode(digest))
        );
        let signature = path.rsplit("apiSig=").next().unwrap();
        assert_eq!(signature.len(), 6 + 128);
    }

    #[test]
    fn signature_prefix_is_six_nonzero_digits() {
        let prefix = random_signature_prefix();
        assert_eq!(prefix.len(), 6);
        assert!(prefix.chars().all(|c| ('1'..='9').contains(&c)));
    }

    #[test]
    fn only_api_envelopes_are_saved() {
        assert!(is_api_envelope(br#"{"status": "OK", "result": []}"#));
        assert!(is_api_envelope(
            br#"{"status": "FAILED", "comment": "contestId: Contest with id 1 not found"}"#
        ));
        assert!(!is_api_envelope(b"<html><body>503 Service Unavailable</body></html>"));
        assert!(!is_api_envelope(br#"{"result": []}"#));
        assert!(!is_api_envelope(br#"["status"]"#));
        assert!(!is_api_envelope(b""));
    }

    #[test]
    fn standard_calls() {
        assert_eq!(
            ApiCall::submission_list(364369).unsigned_path(),
            "contest.status?contestId=364369&count=5000&from=1"
        );
        assert_eq!(
            ApiCall::standings(364369).unsigned_path(),
            "contest.standings?contestId=364369&count=1&from=1"
        );
    }
}
