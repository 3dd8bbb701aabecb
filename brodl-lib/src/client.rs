use std::time::Duration;

use reqwest::StatusCode;

use crate::error::Error;

/// Per-request timeout; the workshop listing is slow but not this slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(9);

/// Retry schedule: how many attempts to make and how long to sleep between
/// them. The delay doubles after every failed attempt (exponential backoff).
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after the given 1-based attempt, or `None` when the
    /// attempt was the last one (no sleep after the final attempt).
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }
        Some(self.base_delay * 2u32.pow(attempt - 1))
    }
}

/// A fetched page body together with the HTTP status it came with.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Source of listing/resolver page bodies.
///
/// `Err` means the server was unreachable even after retries; a non-200
/// `FetchedPage` means it was reachable but rejecting. The enumerator and
/// resolver only care about that distinction plus the body, so tests can
/// implement this over a map of canned pages.
pub trait PageSource {
    fn page(&self, url: &str) -> Result<FetchedPage, Error>;
}

/// Blocking HTTP client with bounded retries; the sole network access point.
pub struct HttpFetcher {
    http: reqwest::blocking::Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, Error> {
        Self::with_policy(RetryPolicy::default())
    }

    pub fn with_policy(policy: RetryPolicy) -> Result<Self, Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, policy })
    }

    /// GET a URL with retries and exponential backoff.
    ///
    /// A 200 returns immediately. Otherwise the request is retried up to
    /// `max_attempts` times. Once they are exhausted, the last non-200
    /// response (if any was received) is returned as `Ok`, so callers must
    /// check the status; an unbroken run of transport errors returns the
    /// last of them as `Err`. The asymmetry lets callers tell "reachable
    /// but rejecting" apart from "unreachable".
    pub fn fetch(&self, url: &str) -> Result<reqwest::blocking::Response, Error> {
        let mut last_response: Option<reqwest::blocking::Response> = None;
        let mut last_error: Option<reqwest::Error> = None;

        for attempt in 1..=self.policy.max_attempts {
            match self.http.get(url).send() {
                Ok(resp) if resp.status() == StatusCode::OK => return Ok(resp),
                Ok(resp) => {
                    log::debug!(
                        "attempt {attempt}/{}: HTTP {} for {url}",
                        self.policy.max_attempts,
                        resp.status()
                    );
                    last_response = Some(resp);
                }
                Err(err) => {
                    log::debug!(
                        "attempt {attempt}/{}: {err} for {url}",
                        self.policy.max_attempts
                    );
                    last_error = Some(err);
                }
            }

            if let Some(delay) = self.policy.delay_after(attempt) {
                std::thread::sleep(delay);
            }
        }

        if let Some(resp) = last_response {
            Ok(resp)
        } else if let Some(err) = last_error {
            Err(err.into())
        } else {
            // Only reachable with a zero-attempt policy
            Err(Error::config("retry policy allows zero attempts"))
        }
    }
}

impl PageSource for HttpFetcher {
    fn page(&self, url: &str) -> Result<FetchedPage, Error> {
        let resp = self.fetch(url)?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(FetchedPage { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_delays_double_and_skip_the_final_attempt() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_secs(3),
        };
        let delays: Vec<Option<Duration>> = (1..=4).map(|a| policy.delay_after(a)).collect();
        assert_eq!(
            delays,
            vec![
                Some(Duration::from_secs(3)),
                Some(Duration::from_secs(6)),
                Some(Duration::from_secs(12)),
                None,
            ]
        );
    }

    #[test]
    fn single_attempt_policy_never_sleeps() {
        let policy = RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::from_secs(3),
        };
        assert_eq!(policy.delay_after(1), None);
    }
}
