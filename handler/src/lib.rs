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

#[macro_use]
extern crate log;

pub use crate::context::{Clock, InvocationContext, SystemClock};
pub use crate::event::InboundEvent;
pub use crate::handler::{
    BodyEncoder, HandlerConfig, HandlerError, HandlerFailure, JsonEncoder, RequestHandler,
};
pub use crate::metrics::{MetricLine, Metrics, Status};
pub use crate::sink::{LogSink, Sink};

mod context;
mod event;
mod handler;
mod metrics;
mod sink;
