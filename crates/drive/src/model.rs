// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drive model: a markdown knowledge store with YAML front matter.

use agx_adapters::split_front_matter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Front matter carried by a drive's representative document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveFrontMatter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Project path this drive describes (`~`-relative allowed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// ISO timestamp of the last mutation.
    #[serde(default)]
    pub updated: String,
}

impl DriveFrontMatter {
    /// Parse front matter out of a markdown document.
    pub fn parse(content: &str) -> Option<Self> {
        let (front, _) = split_front_matter(content);
        serde_yaml::from_str(front?).ok()
    }

    /// Render as a fenced front-matter block.
    pub fn to_header(&self) -> String {
        let yaml = serde_yaml::to_string(self).unwrap_or_default();
        format!("---\n{yaml}---\n")
    }
}

/// Whether a drive is a single file or a directory of documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveBody {
    File,
    Directory,
}

/// A drive on disk.
#[derive(Debug, Clone)]
pub struct Drive {
    pub name: String,
    pub path: PathBuf,
    pub body: DriveBody,
    pub front: DriveFrontMatter,
}

impl Drive {
    /// Representative document: the file itself, the directory's
    /// `overview.md` when present, else the first markdown file in sort
    /// order.
    pub fn representative_doc(&self) -> Option<PathBuf> {
        match self.body {
            DriveBody::File => Some(self.path.clone()),
            DriveBody::Directory => {
                let overview = self.path.join("overview.md");
                if overview.is_file() {
                    return Some(overview);
                }
                self.markdown_files().into_iter().next()
            }
        }
    }

    /// Markdown files of a directory drive, sorted by name. Notes are
    /// included; subdirectories are not walked.
    pub fn markdown_files(&self) -> Vec<PathBuf> {
        match self.body {
            DriveBody::File => vec![self.path.clone()],
            DriveBody::Directory => {
                let mut files = collect_md(&self.path);
                let notes = self.path.join("notes");
                files.extend(collect_md(&notes));
                files
            }
        }
    }
}

fn collect_md(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("md"))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
