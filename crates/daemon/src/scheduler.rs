// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron scheduler: one trigger per job name.

use crate::error::DaemonError;
use agx_core::{Clock, CronExpr};
use agx_jobs::{load_all_jobs, JobSpec};
use agx_store::Store;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Callback invoked when a trigger fires. Errors are logged; the
/// scheduler keeps going.
pub type FireCallback = Arc<dyn Fn(JobSpec) -> Result<(), String> + Send + Sync>;

/// Snapshot row for `list_scheduled`.
#[derive(Debug, Clone)]
pub struct ScheduledJob {
    pub name: String,
    pub schedule: String,
    pub next_run: Option<DateTime<Utc>>,
}

struct Trigger {
    spec: JobSpec,
    cron: CronExpr,
    handle: tokio::task::JoinHandle<()>,
}

pub struct Scheduler<C: Clock> {
    triggers: Arc<Mutex<HashMap<String, Trigger>>>,
    callback: FireCallback,
    clock: C,
}

impl<C: Clock + 'static> Scheduler<C> {
    pub fn new(callback: FireCallback, clock: C) -> Self {
        Self {
            triggers: Arc::new(Mutex::new(HashMap::new())),
            callback,
            clock,
        }
    }

    /// Import every enabled job from the store.
    pub fn load_all(&self, store: &Store) -> Result<usize, DaemonError> {
        let mut count = 0;
        for job in load_all_jobs(store)? {
            if !job.enabled {
                continue;
            }
            match self.schedule(job) {
                Ok(()) => count += 1,
                Err(e) => tracing::warn!(error = %e, "skipping unschedulable job"),
            }
        }
        Ok(count)
    }

    /// Install (or replace) the trigger for a job. The previous trigger
    /// for the same name is stopped first.
    pub fn schedule(&self, job: JobSpec) -> Result<(), DaemonError> {
        let cron = job.cron().map_err(|e| DaemonError::Schedule {
            job: job.name.clone(),
            reason: e.to_string(),
        })?;

        self.unschedule(&job.name);

        let name = job.name.clone();
        let spec = job.clone();
        let callback = self.callback.clone();
        let clock = self.clock.clone();
        let loop_cron = cron.clone();
        let handle = tokio::spawn(async move {
            loop {
                let now = clock.now_utc();
                let Some(next) = loop_cron.next_after(now) else {
                    tracing::warn!(job = %spec.name, "schedule has no future fire time");
                    return;
                };
                let wait = (next - now)
                    .to_std()
                    .unwrap_or(std::time::Duration::ZERO);
                tokio::time::sleep(wait).await;
                tracing::debug!(job = %spec.name, "cron fired");
                if let Err(e) = (callback)(spec.clone()) {
                    tracing::error!(job = %spec.name, error = %e, "job trigger failed");
                }
            }
        });

        self.triggers.lock().insert(
            name,
            Trigger {
                spec: job,
                cron,
                handle,
            },
        );
        Ok(())
    }

    /// Stop and remove a trigger. Unknown names are a no-op.
    pub fn unschedule(&self, name: &str) {
        if let Some(trigger) = self.triggers.lock().remove(name) {
            trigger.handle.abort();
        }
    }

    /// Full stop-and-reimport.
    pub fn reload_all(&self, store: &Store) -> Result<usize, DaemonError> {
        let names: Vec<String> = self.triggers.lock().keys().cloned().collect();
        for name in names {
            self.unschedule(&name);
        }
        self.load_all(store)
    }

    /// Next fire instant for a job, or `None` when not scheduled.
    pub fn next_run(&self, name: &str) -> Option<DateTime<Utc>> {
        let triggers = self.triggers.lock();
        let trigger = triggers.get(name)?;
        trigger.cron.next_after(self.clock.now_utc())
    }

    /// Snapshot of every scheduled job.
    pub fn list_scheduled(&self) -> Vec<ScheduledJob> {
        let now = self.clock.now_utc();
        let triggers = self.triggers.lock();
        let mut jobs: Vec<ScheduledJob> = triggers
            .values()
            .map(|t| ScheduledJob {
                name: t.spec.name.clone(),
                schedule: t.spec.schedule.clone(),
                next_run: t.cron.next_after(now),
            })
            .collect();
        jobs.sort_by(|a, b| a.name.cmp(&b.name));
        jobs
    }

    pub fn scheduled_count(&self) -> usize {
        self.triggers.lock().len()
    }
}

impl<C: Clock> Drop for Scheduler<C> {
    fn drop(&mut self) {
        for (_, trigger) in self.triggers.lock().drain() {
            trigger.handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
