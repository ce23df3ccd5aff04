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

#[macro_use]
extern crate log;

use env_logger::{Env, Target};
use handler::{Metrics, RequestHandler};
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;

use std::sync::Arc;

mod config;
mod function;

// Entry point.
#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    // Metric lines are scraped from stdout.
    if env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .format_target(false)
        .try_init()
        .is_err()
    {
        info!("Logger already intialized");
    }

    info!("hello-lambda bootstrap starting");

    let settings = config::Settings::from_env()?;
    if let Some(name) = &settings.function_name {
        info!("Function {} metrics enabled: {}", name, settings.metrics_enabled);
    }

    let handler = Arc::new(RequestHandler::new(
        settings.handler_config(),
        Arc::new(Metrics::new()),
    ));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        async move { function::handle_event(&handler, event) }
    }))
    .await
}
