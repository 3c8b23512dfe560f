//! Request logging for HTTP servers.
//!
//! Framework-agnostic: a middleware fills in a [`RequestSummary`] once the
//! response is known and hands it to [`Logger::request`].

use crate::core::{Arg, Logger};
use std::time::Duration;

/// What happened to one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSummary {
    pub status: u16,
    pub latency: Duration,
    pub client_ip: String,
    pub method: String,
    /// Path including the raw query string, if any
    pub path: String,
    /// Errors collected while handling the request
    pub error: String,
}

impl RequestSummary {
    pub fn new(method: impl Into<String>, path: impl Into<String>, status: u16) -> Self {
        Self {
            status,
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    #[must_use]
    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = ip.into();
        self
    }

    /// Append `?query` to the path when the query is non-empty.
    #[must_use]
    pub fn with_query(mut self, query: &str) -> Self {
        if !query.is_empty() {
            self.path.push('?');
            self.path.push_str(query);
        }
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }

    /// Latency as printed in the request line. Anything over a minute is
    /// truncated to whole seconds.
    pub fn latency_display(&self) -> String {
        let latency = if self.latency > Duration::from_secs(60) {
            Duration::from_secs(self.latency.as_secs())
        } else {
            self.latency
        };
        format!("{:?}", latency)
    }

    fn args(&self) -> Vec<Arg> {
        vec![
            Arg::from(self.status),
            Arg::from(self.latency_display()),
            Arg::from(self.client_ip.as_str()),
            Arg::from(self.method.as_str()),
            Arg::from(self.path.as_str()),
        ]
    }
}

const REQUEST_LINE: &str = "[HTTP] %3d | %13v | %15s | %s %#v";
const REQUEST_LINE_WITH_ERROR: &str = "[HTTP] %3d | %13v | %15s | %s %#v\n%s";

impl Logger {
    /// Log a finished request: 4xx at Warning and 5xx at Error (both with the
    /// collected error text on a second line), everything else at Info.
    #[track_caller]
    pub fn request(&self, summary: &RequestSummary) {
        let mut args = summary.args();
        match summary.status {
            400..=499 => {
                args.push(Arg::from(summary.error.as_str()));
                self.warning(REQUEST_LINE_WITH_ERROR, &args);
            }
            500.. => {
                args.push(Arg::from(summary.error.as_str()));
                self.error(REQUEST_LINE_WITH_ERROR, &args);
            }
            _ => self.info(REQUEST_LINE, &args),
        }
    }
}
