// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drive library operations over the central `drives/` directory.

use crate::error::{io_err, DriveError};
use crate::model::{Drive, DriveBody, DriveFrontMatter};
use agx_core::{expand_tilde, run_id, slugify, Clock};
use agx_store::Store;
use std::path::{Path, PathBuf};

/// A single-file drive above this size is "large".
pub const LARGE_FILE_BYTES: u64 = 50 * 1024;
/// A directory drive with more markdown files than this is "large".
pub const LARGE_DIR_FILES: usize = 20;

pub struct DriveStore {
    store: Store,
    /// Real user home, for `~` expansion in front-matter project paths.
    home: PathBuf,
}

impl DriveStore {
    pub fn new(store: Store, home: PathBuf) -> Self {
        Self { store, home }
    }

    fn dir(&self) -> PathBuf {
        self.store.drives_dir()
    }

    /// Every drive, sorted by name.
    pub fn list(&self) -> Vec<Drive> {
        let Ok(entries) = std::fs::read_dir(self.dir()) else {
            return Vec::new();
        };
        let mut drives: Vec<Drive> = entries
            .flatten()
            .filter_map(|e| self.load_entry(&e.path()))
            .collect();
        drives.sort_by(|a, b| a.name.cmp(&b.name));
        drives
    }

    fn load_entry(&self, path: &Path) -> Option<Drive> {
        if path.is_dir() {
            let name = path.file_name()?.to_str()?.to_string();
            let drive = Drive {
                name: name.clone(),
                path: path.to_path_buf(),
                body: DriveBody::Directory,
                front: DriveFrontMatter::default(),
            };
            let front = drive
                .representative_doc()
                .and_then(|doc| std::fs::read_to_string(doc).ok())
                .and_then(|content| DriveFrontMatter::parse(&content))
                .unwrap_or(DriveFrontMatter {
                    name: name.clone(),
                    ..DriveFrontMatter::default()
                });
            return Some(Drive { front, ..drive });
        }
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            return None;
        }
        let name = path.file_stem()?.to_str()?.to_string();
        let content = std::fs::read_to_string(path).ok()?;
        let front = DriveFrontMatter::parse(&content).unwrap_or(DriveFrontMatter {
            name: name.clone(),
            ..DriveFrontMatter::default()
        });
        Some(Drive {
            name,
            path: path.to_path_buf(),
            body: DriveBody::File,
            front,
        })
    }

    /// Fetch a drive by name.
    pub fn get(&self, name: &str) -> Option<Drive> {
        let dir = self.dir().join(name);
        if dir.is_dir() {
            return self.load_entry(&dir);
        }
        let file = self.dir().join(format!("{name}.md"));
        if file.is_file() {
            return self.load_entry(&file);
        }
        None
    }

    /// Find the drive whose front-matter `project` resolves to `path`.
    pub fn resolve_by_project(&self, path: &Path) -> Option<Drive> {
        let wanted = normalize(path);
        self.list().into_iter().find(|d| {
            d.front
                .project
                .as_deref()
                .map(|p| normalize(&expand_tilde(p, &self.home)) == wanted)
                .unwrap_or(false)
        })
    }

    /// Create a new single-file drive.
    pub fn create(
        &self,
        name: &str,
        description: Option<&str>,
        project: Option<&str>,
        clock: &impl Clock,
    ) -> Result<Drive, DriveError> {
        if self.get(name).is_some() {
            return Err(DriveError::AlreadyExists(name.to_string()));
        }
        let dir = self.dir();
        std::fs::create_dir_all(&dir).map_err(|e| io_err("create", &dir, e))?;
        let front = DriveFrontMatter {
            name: name.to_string(),
            description: description.map(str::to_string),
            project: project.map(str::to_string),
            repo: None,
            updated: clock.now_utc().to_rfc3339(),
        };
        let path = dir.join(format!("{name}.md"));
        let content = format!("{}\n# {name}\n", front.to_header());
        std::fs::write(&path, content).map_err(|e| io_err("write", &path, e))?;
        self.get(name).ok_or(DriveError::NotFound(name.to_string()))
    }

    /// Install a drive from a repo checkout: a single markdown file or a
    /// whole directory copied under `drives/`.
    pub fn install_from_path(&self, name: &str, source: &Path) -> Result<(), DriveError> {
        let dir = self.dir();
        std::fs::create_dir_all(&dir).map_err(|e| io_err("create", &dir, e))?;
        if source.is_dir() {
            let target = dir.join(name);
            copy_dir(source, &target)?;
        } else {
            let target = dir.join(format!("{name}.md"));
            std::fs::copy(source, &target).map_err(|e| io_err("copy", source, e))?;
        }
        Ok(())
    }

    /// Whether a drive's content is too large to return wholesale.
    pub fn is_large(&self, drive: &Drive) -> bool {
        match drive.body {
            DriveBody::File => std::fs::metadata(&drive.path)
                .map(|m| m.len() > LARGE_FILE_BYTES)
                .unwrap_or(false),
            DriveBody::Directory => drive.markdown_files().len() > LARGE_DIR_FILES,
        }
    }

    /// Whole-drive content: the single file, or every markdown file
    /// concatenated with `## {basename}` prefixes.
    pub fn read_content(&self, drive: &Drive) -> Result<String, DriveError> {
        match drive.body {
            DriveBody::File => {
                std::fs::read_to_string(&drive.path).map_err(|e| io_err("read", &drive.path, e))
            }
            DriveBody::Directory => {
                let mut out = String::new();
                for file in drive.markdown_files() {
                    let basename = file
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let content =
                        std::fs::read_to_string(&file).map_err(|e| io_err("read", &file, e))?;
                    out.push_str(&format!("## {basename}\n\n{content}\n"));
                }
                Ok(out)
            }
        }
    }

    /// Append a note to a drive, promoting a file drive to a directory
    /// drive first (the file becomes `overview.md`).
    pub fn add_note(
        &self,
        name: &str,
        title: &str,
        content: &str,
        clock: &impl Clock,
    ) -> Result<PathBuf, DriveError> {
        let drive = self.get(name).ok_or(DriveError::NotFound(name.to_string()))?;

        let drive_dir = match drive.body {
            DriveBody::Directory => drive.path,
            DriveBody::File => {
                let dir = self.dir().join(name);
                std::fs::create_dir_all(&dir).map_err(|e| io_err("create", &dir, e))?;
                let overview = dir.join("overview.md");
                std::fs::rename(&drive.path, &overview)
                    .map_err(|e| io_err("rename", &drive.path, e))?;
                dir
            }
        };

        let notes = drive_dir.join("notes");
        std::fs::create_dir_all(&notes).map_err(|e| io_err("create", &notes, e))?;
        let now = clock.now_utc();
        let file_name = format!("{}-{}.md", run_id(now), slugify(title));
        let path = notes.join(file_name);
        let note = format!(
            "---\ntitle: {title}\ncreated: {}\n---\n\n{content}\n",
            now.to_rfc3339()
        );
        std::fs::write(&path, note).map_err(|e| io_err("write", &path, e))?;
        Ok(path)
    }

    /// Path of a named file inside a drive.
    pub fn file_in_drive(&self, drive: &Drive, file: &str) -> Result<PathBuf, DriveError> {
        let path = match drive.body {
            DriveBody::File => drive.path.clone(),
            DriveBody::Directory => drive.path.join(file),
        };
        if !path.is_file() {
            return Err(DriveError::FileNotFound {
                drive: drive.name.clone(),
                file: file.to_string(),
            });
        }
        Ok(path)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn copy_dir(source: &Path, target: &Path) -> Result<(), DriveError> {
    std::fs::create_dir_all(target).map_err(|e| io_err("create", target, e))?;
    let entries = std::fs::read_dir(source).map_err(|e| io_err("read", source, e))?;
    for entry in entries.flatten() {
        let dest = target.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir(&entry.path(), &dest)?;
        } else {
            std::fs::copy(entry.path(), &dest).map_err(|e| io_err("copy", &entry.path(), e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
