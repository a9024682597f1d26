//! One pretty-printed JSON file per project under a single data directory.
//!
//! Writes go through a uniquely named temp file in the same directory that is
//! then renamed over the target, so readers see either the old or the new
//! document in full. There is no locking between requests: two clients that
//! load, edit and save the same project race, and the last rename wins.

use std::fs;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::validate::{
    clear_dangling_refs, validate_name, validate_project_tags, validate_statuses,
};
use crate::{Error, Palette, Project, Result};

const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct ProjectStore {
    dir: PathBuf,
    palette: Palette,
}

impl ProjectStore {
    pub fn new(dir: impl Into<PathBuf>, palette: Palette) -> Self {
        ProjectStore {
            dir: dir.into(),
            palette,
        }
    }

    /// Create the data directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<name>.json`, after checking the name.
    pub fn project_path(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{}.{}", name, EXTENSION)))
    }

    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.project_path(name)?.is_file())
    }

    /// All project names, sorted. Re-reads the directory on every call.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }
        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&self.dir.to_string_lossy()),
            EXTENSION
        );
        let entries = glob::glob(&pattern).map_err(|e| {
            Error::io(
                &self.dir,
                std::io::Error::new(IoErrorKind::InvalidInput, e.to_string()),
            )
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                Error::io(path, e.into_error())
            })?;
            if !path.is_file() {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if validate_name(stem).is_ok() {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read a project, filling in defaults for missing sections and clearing
    /// node references to statuses or feature projects that no longer exist.
    pub fn read(&self, name: &str) -> Result<Project> {
        let path = self.project_path(name)?;
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                return Err(Error::NotFound("Project not found".to_string()))
            }
            Err(e) => return Err(Error::io(&path, e)),
        };
        let mut project: Project = serde_json::from_str(&raw).map_err(|source| Error::Corrupt {
            path: path.clone(),
            source,
        })?;
        let cleared = clear_dangling_refs(&mut project);
        if cleared > 0 {
            tracing::warn!(project = name, cleared, "stored project had dangling node references");
        }
        tracing::debug!(project = name, nodes = project.nodes.len(), "read project");
        Ok(project)
    }

    /// Validate, normalize and atomically replace the stored document.
    /// Nothing on disk changes unless every check passes.
    pub fn write(&self, name: &str, mut project: Project) -> Result<()> {
        let path = self.project_path(name)?;
        if project.name != name {
            return Err(Error::invalid(format!(
                "Project name '{}' does not match '{}' in the request path",
                project.name, name
            )));
        }
        validate_statuses(&project.statuses, &self.palette)?;
        validate_project_tags(&project.feature_projects)?;
        let cleared = clear_dangling_refs(&mut project);
        if cleared > 0 {
            tracing::debug!(project = name, cleared, "dropped dangling node references before save");
        }

        let mut json = serde_json::to_string_pretty(&project).map_err(|e| {
            Error::io(&path, std::io::Error::new(IoErrorKind::InvalidData, e))
        })?;
        json.push('\n');

        self.ensure_dir()?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| Error::io(&self.dir, e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| Error::io(tmp.path(), e))?;
        tmp.persist(&path).map_err(|e| Error::io(&path, e.error))?;

        tracing::debug!(project = name, bytes = json.len(), "wrote project");
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.project_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(project = name, "deleted project");
                Ok(())
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                Err(Error::NotFound("Project not found".to_string()))
            }
            Err(e) => Err(Error::io(&path, e)),
        }
    }
}
