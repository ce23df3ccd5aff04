// Copyright 2015-2020 Capital One Services, LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//
// Hello World AWS Lambda Handler
//

// Metrics are reported as log lines for a log-scraping collector:
// METRIC <name>{label="value",...} <number>

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::sink::Sink;

pub const INVOCATIONS_TOTAL: &str = "lambda_invocations_total";
pub const REQUESTS_TOTAL: &str = "hello_world_requests_total";
pub const DURATION_SECONDS: &str = "lambda_duration_seconds";
pub const STATUS_TOTAL: &str = "lambda_status_total";

/// The outcome of an invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
}

impl Status {
    /// Returns the metric label value.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents the invocation counters.
/// Counts are advisory; they live as long as their owner and are never reset.
#[derive(Debug, Default)]
pub struct Metrics {
    invocations: AtomicU64,
    successes: AtomicU64,
    errors: AtomicU64,
}

impl Metrics {
    /// Creates a new, zeroed `Metrics`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts an invocation and returns the new total.
    pub fn record_invocation(&self) -> u64 {
        self.invocations.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Counts an invocation outcome and returns the new total for that outcome.
    pub fn record_status(&self, status: Status) -> u64 {
        let counter = match status {
            Status::Success => &self.successes,
            Status::Error => &self.errors,
        };
        counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum MetricValue {
    Count(u64),
    Seconds(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Seconds(s) => write!(f, "{:.6}", s),
        }
    }
}

/// Represents a single metric observation rendered as a log line.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricLine {
    name: &'static str,
    labels: Vec<(&'static str, String)>,
    value: MetricValue,
}

impl MetricLine {
    /// Returns a counter observation.
    pub fn count(name: &'static str, value: u64) -> Self {
        MetricLine {
            name,
            labels: vec![],
            value: MetricValue::Count(value),
        }
    }

    /// Returns a duration observation in seconds.
    pub fn seconds(name: &'static str, value: f64) -> Self {
        MetricLine {
            name,
            labels: vec![],
            value: MetricValue::Seconds(value),
        }
    }

    /// Adds a label.
    pub fn label<V: Into<String>>(mut self, key: &'static str, value: V) -> Self {
        self.labels.push((key, value.into()));
        self
    }

    /// Writes the observation to the specified sink.
    pub fn emit<S: Sink + ?Sized>(&self, sink: &S) {
        sink.write(&self.to_string());
    }
}

impl fmt::Display for MetricLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "METRIC {}", self.name)?;
        if !self.labels.is_empty() {
            f.write_str("{")?;
            for (i, (key, value)) in self.labels.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}=\"{}\"", key, escape_label_value(value))?;
            }
            f.write_str("}")?;
        }
        write!(f, " {}", self.value)
    }
}

/// Escapes a label value using the Prometheus exposition rules.
fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_line() {
        let line = MetricLine::count(INVOCATIONS_TOTAL, 3)
            .label("runtime", "rust")
            .label("function_name", "hello")
            .label("function_version", "$LATEST");
        assert_eq!(
            line.to_string(),
            r#"METRIC lambda_invocations_total{runtime="rust",function_name="hello",function_version="$LATEST"} 3"#
        );
    }

    #[test]
    fn duration_line_has_six_decimals() {
        let line = MetricLine::seconds(DURATION_SECONDS, 0.25)
            .label("runtime", "rust")
            .label("status", Status::Success.as_str());
        assert_eq!(
            line.to_string(),
            r#"METRIC lambda_duration_seconds{runtime="rust",status="success"} 0.250000"#
        );
    }

    #[test]
    fn line_without_labels() {
        assert_eq!(
            MetricLine::count(REQUESTS_TOTAL, 1).to_string(),
            "METRIC hello_world_requests_total 1"
        );
    }

    #[test]
    fn label_values_are_escaped() {
        let line = MetricLine::count(STATUS_TOTAL, 1).label("function_name", "a\"b\\c\nd");
        assert_eq!(
            line.to_string(),
            r#"METRIC lambda_status_total{function_name="a\"b\\c\nd"} 1"#
        );
    }

    #[test]
    fn counters() {
        let metrics = Metrics::new();
        assert_eq!(metrics.record_invocation(), 1);
        assert_eq!(metrics.record_invocation(), 2);
        assert_eq!(metrics.record_status(Status::Success), 1);
        assert_eq!(metrics.record_status(Status::Error), 1);
        assert_eq!(metrics.record_status(Status::Success), 2);

        assert_eq!(metrics.invocations(), 2);
        assert_eq!(metrics.successes(), 2);
        assert_eq!(metrics.errors(), 1);
    }
}
