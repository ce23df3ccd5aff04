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
// Hello World AWS Lambda Codec
//

use std::collections::HashMap;

/// The runtime name reported in response bodies and metric labels.
pub const RUNTIME: &str = "rust";

/// The greeting returned in every successful response body.
pub const GREETING: &str = "Hello World from Rust Lambda!";

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// The body returned when the response body can't be serialized.
pub const ERROR_BODY: &str = r#"{"error": "Internal server error"}"#;

/// The body returned when the response body can't be serialized and telemetry is enabled.
pub const ERROR_BODY_WITH_TELEMETRY: &str =
    r#"{"error": "Internal server error", "runtime": "rust", "otelEnabled": true}"#;

/// Returns the fixed error body for the specified telemetry setting.
pub fn error_body(telemetry_enabled: bool) -> &'static str {
    if telemetry_enabled {
        ERROR_BODY_WITH_TELEMETRY
    } else {
        ERROR_BODY
    }
}

/// Describes the JSON body of a successful response.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub message: String,
    pub runtime: String,
    /// RFC 3339 UTC timestamp of the invocation.
    pub timestamp: String,
    pub request_id: String,
    pub function_name: String,
    pub function_version: String,
    #[serde(rename = "memoryLimitInMB")]
    pub memory_limit_in_mb: i32,
    pub remaining_time_in_millis: u64,
    /// Only present when telemetry is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otel_enabled: Option<bool>,
}

/// Describes an HTTP response returned to the API gateway.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    /// The JSON text of the response body.
    pub body: String,
}

impl HttpResponse {
    /// Returns a 200 response with the specified JSON text as body.
    pub fn ok(body: String) -> HttpResponse {
        Self::with_status(200, body)
    }

    /// Returns a 500 response with the specified JSON text as body.
    pub fn internal_server_error(body: &str) -> HttpResponse {
        Self::with_status(500, body.into())
    }

    /// Returns whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    fn with_status(status_code: u16, body: String) -> HttpResponse {
        let mut headers = HashMap::new();
        headers.insert(CONTENT_TYPE.into(), APPLICATION_JSON.into());

        HttpResponse {
            status_code,
            headers,
            body,
        }
    }
}
