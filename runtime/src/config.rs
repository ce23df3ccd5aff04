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
// Hello World AWS Lambda Runtime
//

use handler::HandlerConfig;

use std::env;

const METRICS_ENABLED: &str = "METRICS_ENABLED";
const FUNCTION_NAME: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// Represents the bootstrap settings loaded from the Lambda environment.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub function_name: Option<String>,
    pub metrics_enabled: bool,
}

impl Settings {
    /// Loads the settings from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads the settings using the specified variable lookup.
    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let metrics_enabled = match lookup(METRICS_ENABLED) {
            Some(v) => parse_flag(METRICS_ENABLED, &v)?,
            None => true,
        };

        Ok(Settings {
            function_name: lookup(FUNCTION_NAME),
            metrics_enabled,
        })
    }

    /// Returns the request handler configuration.
    pub fn handler_config(&self) -> HandlerConfig {
        HandlerConfig {
            metrics_enabled: self.metrics_enabled,
        }
    }
}

/// Parses a boolean flag.
fn parse_flag(name: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "Invalid value for {}: {:?}",
            name,
            value
        )),
    }
}
