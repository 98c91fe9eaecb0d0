// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job file I/O against the central `jobs/` directory.

use crate::error::{io_err, JobError};
use crate::spec::JobSpec;
use agx_store::Store;
use std::path::PathBuf;

/// Path of a job's YAML file.
pub fn job_path(store: &Store, name: &str) -> PathBuf {
    store.jobs_dir().join(format!("{name}.yml"))
}

/// Load one job by name.
pub fn load_job(store: &Store, name: &str) -> Result<JobSpec, JobError> {
    let path = job_path(store, name);
    if !path.exists() {
        return Err(JobError::NotFound(name.to_string()));
    }
    let content = std::fs::read_to_string(&path).map_err(|e| io_err("read", &path, e))?;
    serde_yaml::from_str(&content).map_err(|source| JobError::Parse { path, source })
}

/// Load every job in the directory, sorted by name. Files that fail to
/// parse are skipped with a warning so one bad job never hides the rest.
pub fn load_all_jobs(store: &Store) -> Result<Vec<JobSpec>, JobError> {
    let dir = store.jobs_dir();
    let entries = match std::fs::read_dir(&dir) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_err("read", &dir, e)),
    };

    let mut jobs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str());
        if ext != Some("yml") && ext != Some("yaml") {
            continue;
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable job");
                continue;
            }
        };
        match serde_yaml::from_str::<JobSpec>(&content) {
            Ok(job) => jobs.push(job),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping invalid job");
            }
        }
    }
    jobs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(jobs)
}

/// Validate and write a job. Any validation error rejects the write.
pub fn write_job(store: &Store, job: &JobSpec) -> Result<PathBuf, JobError> {
    let errors = job.validate();
    if !errors.is_empty() {
        return Err(JobError::Invalid {
            name: job.name.clone(),
            errors,
        });
    }
    let dir = store.jobs_dir();
    std::fs::create_dir_all(&dir).map_err(|e| io_err("create", &dir, e))?;
    let path = job_path(store, &job.name);
    let yaml = serde_yaml::to_string(job)?;
    std::fs::write(&path, yaml).map_err(|e| io_err("write", &path, e))?;
    Ok(path)
}

/// Delete a job file.
pub fn delete_job(store: &Store, name: &str) -> Result<(), JobError> {
    let path = job_path(store, name);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(JobError::NotFound(name.to_string()))
        }
        Err(e) => Err(io_err("remove", &path, e)),
    }
}

#[cfg(test)]
#[path = "io_tests.rs"]
mod tests;
