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

use serde::{Serialize, Serializer};

use std::time::{SystemTime, UNIX_EPOCH};

/// Represents a source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Represents the per-invocation metadata supplied by the Lambda runtime.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationContext {
    pub request_id: String,
    pub function_name: String,
    pub function_version: String,
    #[serde(rename = "memoryLimitInMB")]
    pub memory_limit_in_mb: i32,
    /// The time after which the runtime aborts the invocation.
    #[serde(rename = "deadlineMs", serialize_with = "serialize_deadline")]
    pub deadline: Option<SystemTime>,
}

impl InvocationContext {
    /// Creates a new `InvocationContext` with no deadline.
    pub fn new(
        request_id: &str,
        function_name: &str,
        function_version: &str,
        memory_limit_in_mb: i32,
    ) -> Self {
        InvocationContext {
            request_id: request_id.into(),
            function_name: function_name.into(),
            function_version: function_version.into(),
            memory_limit_in_mb,
            deadline: None,
        }
    }

    /// Returns the context with the specified deadline.
    pub fn with_deadline(self, deadline: SystemTime) -> Self {
        InvocationContext {
            deadline: Some(deadline),
            ..self
        }
    }

    /// Returns the milliseconds left before the deadline at the specified time.
    /// Zero if the deadline has passed or there is no deadline.
    pub fn remaining_time_millis(&self, now: SystemTime) -> u64 {
        match self.deadline {
            Some(deadline) => deadline
                .duration_since(now)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
            None => 0,
        }
    }
}

/// Serializes a deadline as milliseconds since the Unix epoch.
fn serialize_deadline<S>(deadline: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let millis = deadline.and_then(|d| {
        d.duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_millis() as u64)
    });
    millis.serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_common::*;
    use serde_json::json;

    use std::time::Duration;

    #[test]
    fn remaining_time_without_deadline_is_zero() {
        let ctx = valid_context();
        assert_eq!(ctx.remaining_time_millis(invocation_time()), 0);
    }

    #[test]
    fn remaining_time_before_deadline() {
        let ctx = context_with_deadline(5000);
        assert_eq!(ctx.remaining_time_millis(invocation_time()), 5000);
        assert_eq!(
            ctx.remaining_time_millis(invocation_time() + Duration::from_millis(1250)),
            3750
        );
    }

    #[test]
    fn remaining_time_after_deadline_is_zero() {
        let ctx = context_with_deadline(10);
        assert_eq!(
            ctx.remaining_time_millis(invocation_time() + Duration::from_secs(1)),
            0
        );
    }

    #[test]
    fn serializes_deadline_as_epoch_millis() {
        let value = serde_json::to_value(context_with_deadline(5000)).unwrap();
        assert_eq!(
            value,
            json!({
                "requestId": REQUEST_ID,
                "functionName": FUNCTION_NAME,
                "functionVersion": FUNCTION_VERSION,
                "memoryLimitInMB": MEMORY_LIMIT_IN_MB,
                "deadlineMs": 1_792_238_405_000u64,
            })
        );

        let value = serde_json::to_value(valid_context()).unwrap();
        assert!(value["deadlineMs"].is_null());
    }
}
