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

use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayV2httpRequest};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// The decoded shape of an inbound event.
#[derive(Debug)]
enum EventKind {
    /// API Gateway HTTP API, payload format 2.0.
    HttpV2(Box<ApiGatewayV2httpRequest>),
    /// API Gateway REST API proxy integration.
    HttpV1(Box<ApiGatewayProxyRequest>),
    /// Anything else.
    Raw,
}

/// Represents an event received from the Lambda runtime.
/// The event is read-only; it is logged but never required to have any particular shape.
#[derive(Debug)]
pub struct InboundEvent {
    raw: Value,
    kind: EventKind,
}

impl From<Value> for InboundEvent {
    /// Decodes a Lambda event, falling back to a raw event if it isn't an API Gateway request.
    fn from(raw: Value) -> Self {
        let kind = if raw.get("version").and_then(Value::as_str) == Some("2.0") {
            match serde_json::from_value::<ApiGatewayV2httpRequest>(raw.clone()) {
                Ok(r) => EventKind::HttpV2(Box::new(r)),
                Err(e) => {
                    debug!("Not an HTTP API request: {}", e);
                    EventKind::Raw
                }
            }
        } else if raw.get("httpMethod").is_some() {
            match serde_json::from_value::<ApiGatewayProxyRequest>(raw.clone()) {
                Ok(r) => EventKind::HttpV1(Box::new(r)),
                Err(e) => {
                    debug!("Not a REST API proxy request: {}", e);
                    EventKind::Raw
                }
            }
        } else {
            EventKind::Raw
        };

        InboundEvent { raw, kind }
    }
}

impl InboundEvent {
    /// Returns the request's method and path, e.g. `GET /hello`.
    pub fn summary(&self) -> Option<String> {
        match &self.kind {
            EventKind::HttpV2(r) => {
                let http = &r.request_context.http;
                let path = r
                    .raw_path
                    .as_deref()
                    .or_else(|| http.path.as_deref())
                    .unwrap_or("/");
                Some(format!("{} {}", http.method, path))
            }
            EventKind::HttpV1(r) => Some(format!(
                "{} {}",
                r.http_method,
                r.path.as_deref().unwrap_or("/")
            )),
            EventKind::Raw => None,
        }
    }
}

impl Serialize for InboundEvent {
    /// Serializes the event exactly as it was received.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.raw.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_common::*;
    use serde_json::json;

    #[test]
    fn decodes_http_api_request() {
        let event = InboundEvent::from(api_gatewayv2_proxy_request());
        assert!(matches!(event.kind, EventKind::HttpV2(_)));
        assert_eq!(event.summary(), Some("GET /hello".into()));
    }

    #[test]
    fn falls_back_to_raw_event() {
        let event = InboundEvent::from(json!({ "input": "hello" }));
        assert!(matches!(event.kind, EventKind::Raw));
        assert_eq!(event.summary(), None);
    }

    #[test]
    fn malformed_http_api_request_is_raw() {
        let event = InboundEvent::from(json!({ "version": "2.0", "requestContext": 42 }));
        assert!(matches!(event.kind, EventKind::Raw));
        assert_eq!(event.summary(), None);
    }

    #[test]
    fn serializes_as_received() {
        let raw = api_gatewayv2_proxy_request();
        let event = InboundEvent::from(raw.clone());
        assert_eq!(serde_json::to_value(&event).unwrap(), raw);
    }
}
