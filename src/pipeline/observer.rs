//! Progress events emitted by the executor.

use crate::error::RevfeedError;

use super::stage::StageKind;

/// Receives stage progress from a pipeline run. Steps are 1-based.
/// Every method defaults to doing nothing.
pub trait PipelineObserver: Send + Sync {
    fn stage_started(&self, _step: usize, _kind: StageKind) {}

    fn stage_finished(&self, _step: usize, _kind: StageKind) {}

    fn stage_failed(&self, _step: usize, _kind: StageKind, _error: &RevfeedError) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Observer that forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn stage_started(&self, step: usize, kind: StageKind) {
        log::info!("Running step {}: {}", step, kind);
    }

    fn stage_finished(&self, step: usize, kind: StageKind) {
        log::debug!("Finished step {}: {}", step, kind);
    }

    fn stage_failed(&self, step: usize, kind: StageKind, error: &RevfeedError) {
        log::error!("Step {} ({}) failed: {}", step, kind, error);
    }
}
