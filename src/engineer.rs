use std::time::Instant;

use crate::advisor::Advisor;
use crate::error::{RemoteError, RemoteErrorKind};
use crate::gate::{self, EngineerState};
use crate::types::{RaceContext, StrategyCall, TelemetryFrame};
use crate::{fallback, presenter};

/// Counters are logged every this many remote calls.
const STATS_EVERY: u64 = 5;

/// Decode -> gate -> advise -> render, one frame at a time.
pub struct RaceEngineer<A: Advisor> {
    advisor: A,
    context: RaceContext,
    state: EngineerState,
    force: bool,
}

impl<A: Advisor> RaceEngineer<A> {
    pub fn new(advisor: A, context: RaceContext, state: EngineerState) -> Self {
        Self {
            advisor,
            context,
            state,
            force: false,
        }
    }

    /// Skip the gate for every frame.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn state(&self) -> &EngineerState {
        &self.state
    }

    pub fn advisor(&self) -> &A {
        &self.advisor
    }

    pub fn context(&self) -> &RaceContext {
        &self.context
    }

    /// Handle one raw input line. Returns the rendered block when a call was
    /// made; non-JSON lines and gated frames yield `None`.
    pub async fn process_line(&mut self, line: &str) -> Option<String> {
        let Some(frame) = TelemetryFrame::from_json_line(line) else {
            tracing::debug!(line = %line.trim(), "ignoring non-telemetry line");
            return None;
        };
        let call = self.process_frame(&frame).await?;
        Some(presenter::render(&call, &frame))
    }

    pub async fn process_frame(&mut self, frame: &TelemetryFrame) -> Option<StrategyCall> {
        if !gate::should_act(frame, &mut self.state, self.force) {
            return None;
        }
        let call = self.dispatch(frame).await;
        self.state.record_call(Instant::now());
        Some(call)
    }

    /// Ask the advisor, falling back to the rule-based call on any failure.
    pub async fn dispatch(&mut self, frame: &TelemetryFrame) -> StrategyCall {
        let remote = self.advisor.is_remote();
        if remote {
            self.state.api_calls += 1;
        }

        match self.advisor.advise(frame, &self.context).await {
            Ok(call) => {
                if remote && self.state.api_calls % STATS_EVERY == 0 {
                    tracing::info!(
                        calls = self.state.api_calls,
                        errors = self.state.api_errors,
                        "{}: {} calls, {} errors",
                        self.advisor.label(),
                        self.state.api_calls,
                        self.state.api_errors
                    );
                }
                call
            }
            Err(e) => {
                self.state.api_errors += 1;
                self.report_failure(&e);
                fallback::recommend(frame)
            }
        }
    }

    fn report_failure(&self, e: &RemoteError) {
        match e.kind() {
            RemoteErrorKind::RateLimit => {
                tracing::warn!(
                    call = self.state.api_calls,
                    "rate limit hit on call #{}; wait 60s or use mock mode (calls are spaced {}s apart)",
                    self.state.api_calls,
                    self.state.min_call_interval.as_secs_f64()
                );
            }
            RemoteErrorKind::ModelNotFound => {
                tracing::warn!(model = %self.advisor.label(), "model not available, check the model name");
            }
            RemoteErrorKind::Other => {
                tracing::warn!(error = %e, "advisor request failed");
            }
        }
        tracing::info!("using rule-based fallback for this call");
    }
}
