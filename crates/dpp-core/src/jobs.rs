//! # Import Job Tracker
//!
//! Keyed store of asynchronous batch-import jobs. `PENDING_PROCESSING` is
//! the only non-terminal state: each status poll of a pending job rolls a
//! request-scoped random draw and may move it forward to `COMPLETED` or
//! `FAILED`. Terminal jobs are returned unchanged on every subsequent
//! poll, and the tracker never deletes a job.
//!
//! Randomness enters exclusively through the [`RandomSource`] capability
//! so tests can script transitions deterministically.

use crate::ids::IdSource;
use crate::primitives::{
    IMPORT_FAILURE_REASONS, IMPORT_PROCESSED_MAX, IMPORT_PROCESSED_MIN, JOB_COMPLETION_PERCENT,
    JOB_TRANSITION_PERCENT,
};
use crate::types::{DppError, ImportJob, ImportJobStatus};
use rand::Rng;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

// =============================================================================
// RANDOM SOURCE
// =============================================================================

/// Capability for the probabilistic draws of a status poll.
pub trait RandomSource {
    /// True with `chance` percent probability (clamped to 100).
    fn percent(&mut self, chance: u32) -> bool;

    /// Uniform draw from the inclusive range `lo..=hi`.
    fn in_range(&mut self, lo: u32, hi: u32) -> u32;

    /// Uniform index draw for a non-empty slice of length `len`.
    fn pick(&mut self, len: usize) -> usize;
}

/// Production [`RandomSource`]: a fresh `thread_rng` handle per draw, so
/// concurrent polls of different jobs never share mutable state.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn percent(&mut self, chance: u32) -> bool {
        rand::thread_rng().gen_ratio(chance.min(100), 100)
    }

    fn in_range(&mut self, lo: u32, hi: u32) -> u32 {
        rand::thread_rng().gen_range(lo..=hi.max(lo))
    }

    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len.max(1))
    }
}

/// Deterministic [`RandomSource`] for tests: scripted roll outcomes and
/// value draws, consumed front to back. An exhausted script answers
/// `false` / the range minimum / index zero.
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    rolls: VecDeque<bool>,
    values: VecDeque<u32>,
}

impl ScriptedRandom {
    /// A source that answers the given rolls in order.
    #[must_use]
    pub fn with_rolls(rolls: impl IntoIterator<Item = bool>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            values: VecDeque::new(),
        }
    }

    /// Queue value draws answered by `in_range` and `pick`.
    #[must_use]
    pub fn and_values(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.values = values.into_iter().collect();
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn percent(&mut self, _chance: u32) -> bool {
        self.rolls.pop_front().unwrap_or(false)
    }

    fn in_range(&mut self, lo: u32, hi: u32) -> u32 {
        self.values.pop_front().unwrap_or(lo).clamp(lo, hi.max(lo))
    }

    fn pick(&mut self, len: usize) -> usize {
        let drawn = self.values.pop_front().unwrap_or(0) as usize;
        if len == 0 { 0 } else { drawn % len }
    }
}

// =============================================================================
// TRACKER
// =============================================================================

/// The keyed store of import jobs.
pub struct ImportJobTracker {
    jobs: BTreeMap<String, ImportJob>,
    ids: Arc<dyn IdSource>,
}

impl ImportJobTracker {
    /// An empty tracker drawing job ids from the given source.
    #[must_use]
    pub fn new(ids: Arc<dyn IdSource>) -> Self {
        Self {
            jobs: BTreeMap::new(),
            ids,
        }
    }

    /// Register a new pending job and return it.
    pub fn register(&mut self, message: impl Into<String>) -> ImportJob {
        let mut id = self.ids.next_job_id();
        while self.jobs.contains_key(&id) {
            id = self.ids.next_job_id();
        }
        let job = ImportJob {
            id: id.clone(),
            status: ImportJobStatus::PendingProcessing,
            message: message.into(),
        };
        self.jobs.insert(id, job.clone());
        job
    }

    /// Insert a fully formed job, rejecting duplicate ids. Seed path.
    pub fn insert(&mut self, job: ImportJob) -> Result<(), DppError> {
        if self.jobs.contains_key(&job.id) {
            return Err(DppError::Validation(format!(
                "duplicate import job id: {}",
                job.id
            )));
        }
        self.jobs.insert(job.id.clone(), job);
        Ok(())
    }

    /// Poll a job's status, possibly transitioning a pending job forward.
    pub fn poll(
        &mut self,
        id: &str,
        rng: &mut dyn RandomSource,
    ) -> Result<ImportJob, DppError> {
        let job = self
            .jobs
            .get_mut(id)
            .ok_or_else(|| DppError::JobNotFound(id.to_string()))?;

        if job.status.is_terminal() {
            return Ok(job.clone());
        }

        if rng.percent(JOB_TRANSITION_PERCENT) {
            if rng.percent(JOB_COMPLETION_PERCENT) {
                let processed = rng.in_range(IMPORT_PROCESSED_MIN, IMPORT_PROCESSED_MAX);
                job.status = ImportJobStatus::Completed;
                job.message = format!("Batch import completed: {processed} records processed");
            } else {
                let reason = IMPORT_FAILURE_REASONS[rng.pick(IMPORT_FAILURE_REASONS.len())];
                job.status = ImportJobStatus::Failed;
                job.message = format!("Batch import failed: {reason}");
            }
        }

        Ok(job.clone())
    }

    /// Number of tracked jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the tracker holds no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl std::fmt::Debug for ImportJobTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportJobTracker")
            .field("jobs", &self.jobs.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
