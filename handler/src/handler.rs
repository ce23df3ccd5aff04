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

use chrono::{DateTime, SecondsFormat, Utc};
use codec::lambda::{error_body, HttpResponse, ResponseBody, GREETING, RUNTIME};
use serde::Serialize;
use thiserror::Error;

use std::sync::Arc;
use std::time::SystemTime;

use crate::context::{Clock, InvocationContext, SystemClock};
use crate::event::InboundEvent;
use crate::metrics::{
    MetricLine, Metrics, Status, DURATION_SECONDS, INVOCATIONS_TOTAL, REQUESTS_TOTAL, STATUS_TOTAL,
};
use crate::sink::{LogSink, Sink};

/// Represents the handler configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct HandlerConfig {
    /// Whether to count invocations, emit metric lines and report `otelEnabled`.
    pub metrics_enabled: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        HandlerConfig {
            metrics_enabled: true,
        }
    }
}

/// Converts a response body to its wire text.
pub trait BodyEncoder: Send + Sync {
    fn encode(&self, body: &ResponseBody) -> Result<String, serde_json::Error>;
}

/// Encodes response bodies as JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonEncoder;

impl BodyEncoder for JsonEncoder {
    fn encode(&self, body: &ResponseBody) -> Result<String, serde_json::Error> {
        serde_json::to_string(body)
    }
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Error marshaling response body: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A failed invocation.
/// Carries the degraded response to return to the caller along with the cause.
#[derive(Debug, Error)]
#[error("Invocation failed with status {}", .response.status_code)]
pub struct HandlerFailure {
    pub response: HttpResponse,
    #[source]
    pub error: HandlerError,
}

/// Handles API Gateway proxy requests.
pub struct RequestHandler<C = SystemClock, B = JsonEncoder, S = LogSink> {
    config: HandlerConfig,
    metrics: Arc<Metrics>,
    clock: C,
    encoder: B,
    sink: S,
}

impl RequestHandler {
    /// Creates a new `RequestHandler` that records into the specified metrics.
    pub fn new(config: HandlerConfig, metrics: Arc<Metrics>) -> Self {
        RequestHandler {
            config,
            metrics,
            clock: SystemClock,
            encoder: JsonEncoder,
            sink: LogSink,
        }
    }
}

impl<C: Clock, B: BodyEncoder, S: Sink> RequestHandler<C, B, S> {
    /// Returns the handler using the specified clock.
    pub fn with_clock<D: Clock>(self, clock: D) -> RequestHandler<D, B, S> {
        RequestHandler {
            config: self.config,
            metrics: self.metrics,
            clock,
            encoder: self.encoder,
            sink: self.sink,
        }
    }

    /// Returns the handler using the specified body encoder.
    pub fn with_encoder<E: BodyEncoder>(self, encoder: E) -> RequestHandler<C, E, S> {
        RequestHandler {
            config: self.config,
            metrics: self.metrics,
            clock: self.clock,
            encoder,
            sink: self.sink,
        }
    }

    /// Returns the handler writing its event, response and metric lines to the specified sink.
    pub fn with_sink<T: Sink>(self, sink: T) -> RequestHandler<C, B, T> {
        RequestHandler {
            config: self.config,
            metrics: self.metrics,
            clock: self.clock,
            encoder: self.encoder,
            sink,
        }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Handles an invocation.
    /// A response is always produced; on failure it is the 500 response inside the `HandlerFailure`.
    pub fn handle(
        &self,
        event: &InboundEvent,
        ctx: &InvocationContext,
    ) -> Result<HttpResponse, HandlerFailure> {
        let start = self.clock.now();
        let telemetry = self.config.metrics_enabled;

        let invocations = if telemetry {
            self.metrics.record_invocation()
        } else {
            0
        };

        self.log_json("Event", event);
        if let Some(summary) = event.summary() {
            debug!("{} {}", ctx.request_id, summary);
        }
        self.log_json("Context", ctx);

        let remaining_time_in_millis = ctx.remaining_time_millis(start);

        if telemetry {
            MetricLine::count(INVOCATIONS_TOTAL, invocations)
                .label("runtime", RUNTIME)
                .label("function_name", ctx.function_name.as_str())
                .label("function_version", ctx.function_version.as_str())
                .emit(&self.sink);
            MetricLine::count(REQUESTS_TOTAL, invocations)
                .label("runtime", RUNTIME)
                .emit(&self.sink);
        }

        let body = ResponseBody {
            message: GREETING.into(),
            runtime: RUNTIME.into(),
            timestamp: timestamp(start),
            request_id: ctx.request_id.clone(),
            function_name: ctx.function_name.clone(),
            function_version: ctx.function_version.clone(),
            memory_limit_in_mb: ctx.memory_limit_in_mb,
            remaining_time_in_millis,
            otel_enabled: if telemetry { Some(true) } else { None },
        };

        let result = match self.encoder.encode(&body) {
            Ok(payload) => Ok(HttpResponse::ok(payload)),
            Err(e) => {
                let error = HandlerError::from(e);
                error!("{}", error);
                Err(HandlerFailure {
                    response: HttpResponse::internal_server_error(error_body(telemetry)),
                    error,
                })
            }
        };

        let response = match &result {
            Ok(r) => r,
            Err(f) => &f.response,
        };
        self.log_json("Response", response);

        if telemetry {
            let status = if response.is_success() {
                Status::Success
            } else {
                Status::Error
            };
            self.emit_status_metrics(ctx, status, start);
        }

        result
    }

    /// Counts the outcome and emits the duration and status metric lines.
    fn emit_status_metrics(&self, ctx: &InvocationContext, status: Status, start: SystemTime) {
        let total = self.metrics.record_status(status);
        let duration = self
            .clock
            .now()
            .duration_since(start)
            .unwrap_or_default()
            .as_secs_f64();

        MetricLine::seconds(DURATION_SECONDS, duration)
            .label("runtime", RUNTIME)
            .label("function_name", ctx.function_name.as_str())
            .label("status", status.as_str())
            .emit(&self.sink);
        MetricLine::count(STATUS_TOTAL, total)
            .label("runtime", RUNTIME)
            .label("function_name", ctx.function_name.as_str())
            .label("status", status.as_str())
            .emit(&self.sink);
    }

    /// Writes the JSON serialization of a value with the specified prefix.
    /// Logging must never fail an invocation, so a value that can't be serialized is skipped.
    fn log_json<T>(&self, prefix: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_string(value) {
            Ok(json) => self.sink.write(&format!("{}: {}", prefix, json)),
            Err(e) => debug!("Unable to log {}: {}", prefix, e),
        }
    }
}

/// Returns the RFC 3339 UTC representation of a time, e.g. `2026-10-17T12:00:00Z`.
fn timestamp(t: SystemTime) -> String {
    DateTime::<Utc>::from(t).to_rfc3339_opts(SecondsFormat::Secs, true)
}
