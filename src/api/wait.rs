//! Waiting for task completion.
//!
//! Submitting with `async_result` yields only a task id; the full report
//! has to be polled for. [`wait_for_report`] runs that polling state
//! machine: `WAITING` until a long report arrives (`DONE`), the time
//! budget runs out (`EXPIRED`), or the error budget runs out (`FAILED`).
//! The two terminal non-success states are indeterminate outcomes, not
//! negative verdicts.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::api::client::SandboxClient;
use crate::core::error::Result;
use crate::core::report::TaskResponse;

/// The poll interval is the time budget divided by this.
///
/// A fixed cadence tuned to the expected total wait, not exponential
/// backoff: scans have a known bounded duration, so request volume stays
/// at 64 checks per wait regardless of the budget.
const POLL_DIVISOR: f64 = 64.0;

/// Anything that can fetch the report of a task by id.
///
/// [`SandboxClient`] is the production implementation; tests substitute
/// scripted sources.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Fetches the current report for `scan_id`.
    async fn fetch_report(&self, scan_id: Uuid) -> Result<TaskResponse>;
}

#[async_trait]
impl ReportSource for SandboxClient {
    async fn fetch_report(&self, scan_id: Uuid) -> Result<TaskResponse> {
        self.get_report(scan_id).await
    }
}

/// Tunables of the polling loop.
#[derive(Debug, Clone)]
pub struct WaitPolicy {
    /// Consecutive-error budget; reaching it ends the wait as
    /// [`WaitOutcome::Failed`].
    pub error_limit: u32,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self { error_limit: 3 }
    }
}

impl WaitPolicy {
    /// Creates a policy with the default error budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the error budget. Values below 1 are clamped to 1.
    pub fn with_error_limit(mut self, limit: u32) -> Self {
        self.error_limit = limit.max(1);
        self
    }
}

/// Terminal state of a wait.
///
/// `Expired` and `Failed` mean "no result": the verdict is unknown, which
/// callers must not confuse with a CLEAN verdict.
#[derive(Debug)]
pub enum WaitOutcome {
    /// The task completed and this is its full report.
    Done(TaskResponse),

    /// The time budget ran out before the task completed.
    Expired,

    /// The error budget ran out, or the task cannot be identified or
    /// polled at all.
    Failed,
}

impl WaitOutcome {
    /// Returns the report when the task completed, `None` otherwise.
    pub fn into_report(self) -> Option<TaskResponse> {
        match self {
            Self::Done(report) => Some(report),
            Self::Expired | Self::Failed => None,
        }
    }

    /// Returns `true` for the indeterminate outcomes.
    pub fn is_indeterminate(&self) -> bool {
        !matches!(self, Self::Done(_))
    }
}

/// Polls `source` until the task identified by `initial` has a long
/// report, for at most `budget_secs` seconds.
///
/// The interval is fixed at `budget_secs / 64`, giving exactly 64 status
/// checks for a task that never completes. Transport errors are absorbed
/// up to the policy's error budget and then surface as
/// [`WaitOutcome::Failed`] rather than an error, so long-running waits do
/// not crash on network blips. A diagnostic is traced once elapsed time
/// passes half the budget.
pub async fn wait_for_report<S: ReportSource + ?Sized>(
    source: &S,
    initial: &TaskResponse,
    budget_secs: f64,
    policy: WaitPolicy,
) -> WaitOutcome {
    // Never poll a task that cannot be identified.
    let short = match initial.short_report() {
        Ok(short) => short,
        Err(err) => {
            tracing::warn!(error = %err, "initial response unusable, not polling");
            return WaitOutcome::Failed;
        }
    };
    // A synchronous submission already carries the long report.
    if let Ok(Some(_)) = initial.long_report() {
        return WaitOutcome::Done(initial.clone());
    }

    let budget = budget_secs.max(0.0);
    let interval_secs = budget / POLL_DIVISOR;
    let interval = Duration::from_secs_f64(interval_secs);

    let mut elapsed = 0.0_f64;
    let mut error_counter = 0u32;

    while elapsed < budget {
        let check = match source.fetch_report(short.scan_id).await {
            Ok(check) => check,
            Err(err) if err.is_transport() => {
                error_counter += 1;
                tracing::warn!(
                    scan_id = %short.scan_id,
                    error = %err,
                    errors = error_counter,
                    "status check failed, endpoint possibly dead"
                );
                if error_counter >= policy.error_limit {
                    return WaitOutcome::Failed;
                }
                continue;
            }
            Err(err) => {
                // A non-transport failure (e.g. the task itself reported
                // errors) will not heal with more polling.
                tracing::warn!(scan_id = %short.scan_id, error = %err, "task failed remotely");
                return WaitOutcome::Failed;
            }
        };

        match check.long_report() {
            Ok(Some(_)) => return WaitOutcome::Done(check),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(scan_id = %short.scan_id, error = %err, "task failed remotely");
                return WaitOutcome::Failed;
            }
        }

        tokio::time::sleep(interval).await;
        elapsed += interval_secs;
        if elapsed >= budget / 2.0 {
            tracing::trace!(
                scan_id = %short.scan_id,
                elapsed_secs = elapsed,
                budget_secs = budget,
                "task still incomplete past half the budget"
            );
        }
    }

    tracing::debug!(scan_id = %short.scan_id, budget_secs = budget, "wait budget exhausted");
    WaitOutcome::Expired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::envelope::RemoteError;
    use crate::core::enums::{ScanState, Verdict};
    use crate::core::error::SandboxError;
    use crate::core::report::{LongReport, ReportData, ScanVerdict, ShortReport};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    fn scan_id() -> Uuid {
        "8e0b3eac-6f97-4ac9-9533-1a2b78e01e2a".parse().unwrap()
    }

    fn short_response() -> TaskResponse {
        TaskResponse {
            data: ReportData::Short(ShortReport { scan_id: scan_id() }),
            errors: vec![],
        }
    }

    fn long_response() -> TaskResponse {
        TaskResponse {
            data: ReportData::Long(LongReport {
                scan_id: scan_id(),
                result: ScanVerdict {
                    scan_state: ScanState::Full,
                    duration: Some(60.0),
                    duration_full: None,
                    verdict: Some(Verdict::Dangerous),
                    threat: None,
                    errors: vec![],
                },
                artifacts: vec![],
            }),
            errors: vec![],
        }
    }

    fn transport_error() -> SandboxError {
        SandboxError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            url: "https://sandbox.example/api/v1/analysis/report".into(),
        }
    }

    /// Replays a script of responses, then keeps answering "in flight".
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<TaskResponse>>>,
        calls: AtomicU32,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<TaskResponse>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            }
        }

        fn never_completing() -> Self {
            Self::new(vec![])
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReportSource for ScriptedSource {
        async fn fetch_report(&self, _scan_id: Uuid) -> Result<TaskResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(short_response()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn never_completing_server_gets_exactly_64_checks() {
        let source = ScriptedSource::never_completing();
        let started = tokio::time::Instant::now();

        let outcome = wait_for_report(&source, &short_response(), 64.0, WaitPolicy::default()).await;

        assert!(matches!(outcome, WaitOutcome::Expired));
        assert!(outcome.is_indeterminate());
        assert_eq!(source.calls(), 64);
        // Interval is budget/64 = 1s; total slept time covers the budget.
        assert!(started.elapsed() >= Duration::from_secs(64));
    }

    #[tokio::test(start_paused = true)]
    async fn long_report_on_third_iteration_stops_polling() {
        let source = ScriptedSource::new(vec![
            Ok(short_response()),
            Ok(short_response()),
            Ok(long_response()),
        ]);

        let outcome = wait_for_report(&source, &short_response(), 64.0, WaitPolicy::default()).await;

        let report = outcome.into_report().expect("completed report");
        assert!(report.is_complete());
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn error_budget_exhausts_before_time_budget() {
        let source = ScriptedSource::new(vec![
            Err(transport_error()),
            Err(transport_error()),
            Err(transport_error()),
        ]);
        let started = tokio::time::Instant::now();

        let outcome = wait_for_report(&source, &short_response(), 64.0, WaitPolicy::default()).await;

        assert!(matches!(outcome, WaitOutcome::Failed));
        assert_eq!(source.calls(), 3);
        // Failed checks do not consume the time budget.
        assert!(started.elapsed() < Duration::from_secs(64));
    }

    #[tokio::test(start_paused = true)]
    async fn transport_blips_below_the_budget_are_absorbed() {
        let source = ScriptedSource::new(vec![
            Err(transport_error()),
            Err(transport_error()),
            Ok(long_response()),
        ]);

        let outcome = wait_for_report(&source, &short_response(), 64.0, WaitPolicy::default()).await;

        assert!(outcome.into_report().is_some());
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn initial_long_report_returns_without_polling() {
        let source = ScriptedSource::never_completing();

        let outcome = wait_for_report(&source, &long_response(), 64.0, WaitPolicy::default()).await;

        assert!(outcome.into_report().is_some());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unidentifiable_initial_response_is_never_polled() {
        let source = ScriptedSource::never_completing();
        let broken = TaskResponse {
            data: ReportData::Short(ShortReport { scan_id: scan_id() }),
            errors: vec![RemoteError {
                message: "no such task".into(),
                kind: "FILE_NOT_FOUND".into(),
            }],
        };

        let outcome = wait_for_report(&source, &broken, 64.0, WaitPolicy::default()).await;

        assert!(matches!(outcome, WaitOutcome::Failed));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn remote_task_failure_ends_the_wait() {
        let failed = TaskResponse {
            data: ReportData::Short(ShortReport { scan_id: scan_id() }),
            errors: vec![RemoteError {
                message: "scan machine died".into(),
                kind: "SCAN_MACHINE_ERROR".into(),
            }],
        };
        let source = ScriptedSource::new(vec![Ok(short_response()), Ok(failed)]);

        let outcome = wait_for_report(&source, &short_response(), 64.0, WaitPolicy::default()).await;

        assert!(matches!(outcome, WaitOutcome::Failed));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_budget_expires_without_checks() {
        let source = ScriptedSource::never_completing();

        let outcome = wait_for_report(&source, &short_response(), 0.0, WaitPolicy::default()).await;

        assert!(matches!(outcome, WaitOutcome::Expired));
        assert_eq!(source.calls(), 0);
    }
}
