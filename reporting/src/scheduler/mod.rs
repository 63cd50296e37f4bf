// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Background refresh scheduler
//!
//! Runs the refresh plan task by task, pausing between tasks and cooling
//! down after each cycle, until cancelled:
//!
//! ```text
//! Idle ──► RunningCycle ──► Cooldown ──► RunningCycle ──► ...
//!                │               │
//!                └──── cancel ───┴──► Stopped
//! ```
//!
//! A failing or panicking task is logged and the cycle moves on to the next
//! task. Cancellation interrupts the current pause or task; no task starts
//! after it.

pub mod scheduler_config;
pub mod task;

pub use scheduler_config::SchedulerConfig;
pub use task::{default_plan, RefreshTask, Refresher};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use parking_lot::RwLock;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Source of the scheduler's pauses
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchedulerState {
    Idle,
    RunningCycle,
    Cooldown,
    Stopped,
}

/// Result of one task within a cycle
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutcome {
    pub task: RefreshTask,
    pub elapsed: Duration,
    pub error: Option<String>,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcomes of a completed cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<TaskOutcome>,
}

impl CycleReport {
    fn new(cycle: u64) -> Self {
        Self {
            cycle,
            started_at: Utc::now(),
            outcomes: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> Vec<&TaskOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success()).collect()
    }
}

pub struct RefreshScheduler {
    refresher: Arc<dyn Refresher>,
    tasks: Vec<RefreshTask>,
    config: SchedulerConfig,
    sleeper: Arc<dyn Sleeper>,
    state: RwLock<SchedulerState>,
    last_report: RwLock<Option<CycleReport>>,
    cycles: AtomicU64,
}

impl RefreshScheduler {
    pub fn new(
        refresher: Arc<dyn Refresher>,
        tasks: Vec<RefreshTask>,
        config: SchedulerConfig,
    ) -> Self {
        Self::with_sleeper(refresher, tasks, config, Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(
        refresher: Arc<dyn Refresher>,
        tasks: Vec<RefreshTask>,
        config: SchedulerConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            refresher,
            tasks,
            config,
            sleeper,
            state: RwLock::new(SchedulerState::Idle),
            last_report: RwLock::new(None),
            cycles: AtomicU64::new(0),
        }
    }

    pub fn tasks(&self) -> &[RefreshTask] {
        &self.tasks
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.read()
    }

    pub fn last_report(&self) -> Option<CycleReport> {
        self.last_report.read().clone()
    }

    pub fn cycles_started(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    fn set_state(&self, state: SchedulerState) {
        *self.state.write() = state;
    }

    /// Run cycles until `cancel` fires
    pub async fn run(&self, cancel: CancellationToken) {
        log::info!(
            "RefreshScheduler: Started with {} tasks, cooldown {}s",
            self.tasks.len(),
            self.config.cooldown_secs
        );
        self.set_state(SchedulerState::Idle);

        if self.config.initial_delay_secs > 0
            && !self.pause(self.config.initial_delay(), &cancel).await
        {
            self.stop();
            return;
        }

        while !cancel.is_cancelled() {
            match AssertUnwindSafe(self.run_cycle(&cancel))
                .catch_unwind()
                .await
            {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(payload) => {
                    log::error!(
                        "RefreshScheduler: Cycle aborted - {}",
                        panic_message(payload.as_ref())
                    );
                }
            }

            self.set_state(SchedulerState::Cooldown);
            if !self.pause(self.config.cooldown(), &cancel).await {
                break;
            }
        }

        self.stop();
    }

    fn stop(&self) {
        self.set_state(SchedulerState::Stopped);
        log::info!("RefreshScheduler: Stopped");
    }

    /// Run every task once, in order
    ///
    /// Returns `None` when cancelled before the cycle completed.
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> Option<CycleReport> {
        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_state(SchedulerState::RunningCycle);
        let mut report = CycleReport::new(cycle);

        for (index, task) in self.tasks.iter().enumerate() {
            if index > 0 && !self.pause(self.config.inter_task_delay(), cancel).await {
                return None;
            }
            let outcome = self.run_task(task, cancel).await?;
            report.outcomes.push(outcome);
        }

        log::info!(
            "RefreshScheduler: Cycle {} finished, {} succeeded, {} failed",
            report.cycle,
            report.succeeded(),
            report.outcomes.len() - report.succeeded()
        );
        *self.last_report.write() = Some(report.clone());
        Some(report)
    }

    async fn run_task(&self, task: &RefreshTask, cancel: &CancellationToken) -> Option<TaskOutcome> {
        if cancel.is_cancelled() {
            return None;
        }

        log::info!("RefreshScheduler: Started {}", task);
        let start = Instant::now();
        let work = AssertUnwindSafe(self.refresher.refresh(task)).catch_unwind();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::info!("RefreshScheduler: Cancelled {}", task);
                return None;
            }
            result = work => result,
        };

        let elapsed = start.elapsed();
        let error = match result {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(payload) => Some(format!("panicked: {}", panic_message(payload.as_ref()))),
        };

        match &error {
            None => log::info!(
                "RefreshScheduler: Finished {} in {}ms",
                task,
                elapsed.as_millis()
            ),
            Some(message) => log::error!(
                "RefreshScheduler: Error {} in {}ms - {}",
                task,
                elapsed.as_millis(),
                message
            ),
        }

        Some(TaskOutcome {
            task: task.clone(),
            elapsed,
            error,
        })
    }

    /// Sleep unless cancelled, returning false on cancellation
    async fn pause(&self, duration: Duration, cancel: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = self.sleeper.sleep(duration) => true,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
