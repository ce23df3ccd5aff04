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

use codec::lambda::HttpResponse;
use handler::{BodyEncoder, Clock, InboundEvent, InvocationContext, RequestHandler, Sink};
use lambda_runtime::{Context, Error, LambdaEvent};
use serde_json::Value;

/// Handles a Lambda invocation event.
/// A failed invocation is reported to the runtime as an invocation error; the degraded response is only logged.
pub(crate) fn handle_event<C, B, S>(
    handler: &RequestHandler<C, B, S>,
    event: LambdaEvent<Value>,
) -> Result<HttpResponse, Error>
where
    C: Clock,
    B: BodyEncoder,
    S: Sink,
{
    let (payload, context) = event.into_parts();
    let ctx = invocation_context(&context);

    match handler.handle(&InboundEvent::from(payload), &ctx) {
        Ok(resp) => Ok(resp),
        Err(failure) => {
            warn!(
                "Request {} failed with status {}: {}",
                ctx.request_id, failure.response.status_code, failure.error
            );
            Err(failure.error.into())
        }
    }
}

/// Returns the invocation context for the specified Lambda runtime context.
/// A zero deadline means the runtime didn't supply one.
pub(crate) fn invocation_context(context: &Context) -> InvocationContext {
    let ctx = InvocationContext::new(
        &context.request_id,
        &context.env_config.function_name,
        &context.env_config.version,
        context.env_config.memory,
    );
    if context.deadline == 0 {
        return ctx;
    }

    ctx.with_deadline(context.deadline())
}

#[cfg(test)]
mod tests {
    use super::*;
    use handler::{HandlerConfig, Metrics};
    use lambda_runtime::Config;
    use serde_json::json;

    use std::sync::Arc;
    use std::time::{Duration, UNIX_EPOCH};

    fn lambda_context(deadline: u64) -> Context {
        let mut context = Context::default();
        context.request_id = "abc-123".into();
        context.deadline = deadline;
        context.env_config = Arc::new(Config {
            function_name: "hello".into(),
            memory: 128,
            version: "$LATEST".into(),
            ..Config::default()
        });
        context
    }

    #[test]
    fn converts_runtime_context() {
        let ctx = invocation_context(&lambda_context(1_792_238_405_000));
        assert_eq!(ctx.request_id, "abc-123");
        assert_eq!(ctx.function_name, "hello");
        assert_eq!(ctx.function_version, "$LATEST");
        assert_eq!(ctx.memory_limit_in_mb, 128);
        assert_eq!(
            ctx.deadline,
            Some(UNIX_EPOCH + Duration::from_millis(1_792_238_405_000))
        );
    }

    #[test]
    fn zero_deadline_is_no_deadline() {
        assert_eq!(invocation_context(&lambda_context(0)).deadline, None);
    }

    #[test]
    fn handles_event() {
        let handler = RequestHandler::new(HandlerConfig::default(), Arc::new(Metrics::new()));
        let event = LambdaEvent::new(json!({ "rawPath": "/hello" }), lambda_context(0));

        let resp = handle_event(&handler, event).unwrap();
        assert_eq!(resp.status_code, 200);

        let body: Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(body["requestId"], "abc-123");
        assert_eq!(body["functionName"], "hello");
        assert_eq!(body["memoryLimitInMB"], 128);
        assert_eq!(body["remainingTimeInMillis"], 0);
        assert_eq!(body["otelEnabled"], true);
        assert_eq!(handler.metrics().successes(), 1);
    }

    struct BrokenEncoder;

    impl BodyEncoder for BrokenEncoder {
        fn encode(&self, _body: &codec::lambda::ResponseBody) -> Result<String, serde_json::Error> {
            Err(serde_json::from_str::<Value>("{").unwrap_err())
        }
    }

    #[test]
    fn reports_invocation_error() {
        let handler = RequestHandler::new(HandlerConfig::default(), Arc::new(Metrics::new()))
            .with_encoder(BrokenEncoder);
        let event = LambdaEvent::new(json!({}), lambda_context(0));

        let err = handle_event(&handler, event).unwrap_err();
        assert!(err.to_string().starts_with("Error marshaling response body"));
        assert_eq!(handler.metrics().errors(), 1);
    }
}
