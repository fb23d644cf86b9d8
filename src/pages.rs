//! Directory-backed page store.
//!
//! A flat directory of `*.md` and `*.moniwiki` files. Page names are file
//! names; anything that could leave the directory is rejected.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::options::RenderOptions;
use crate::resolve::{PageIndex, natural_cmp};

#[derive(Debug, Clone)]
pub struct PageDir {
    root: PathBuf,
    opts: RenderOptions,
}

impl PageDir {
    pub fn new(root: impl Into<PathBuf>, opts: &RenderOptions) -> Self {
        Self {
            root: root.into(),
            opts: opts.clone(),
        }
    }

    /// Page file names in natural order. Subdirectories are not searched.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|source| Error::Walk {
                path: self.root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                tracing::warn!(path = %entry.path().display(), "skipping page with non-UTF-8 name");
                continue;
            };
            if self.opts.has_known_extension(name) {
                names.push(name.to_string());
            }
        }
        names.sort_by(|a, b| natural_cmp(a, b));
        Ok(names)
    }

    pub fn index(&self) -> Result<PageIndex> {
        Ok(PageIndex::from_names(self.list()?))
    }

    /// Path of page `name`, refusing names that would escape the directory.
    pub fn path_of(&self, name: &str) -> Result<PathBuf> {
        let escapes = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']);
        if escapes {
            return Err(Error::InvalidPageName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.path_of(name)?.is_file())
    }

    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.path_of(name)?;
        match crate::read_source(&path) {
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                Err(Error::PageNotFound(name.to_string()))
            }
            other => other,
        }
    }

    /// Write page `name`. Without `overwrite`, an existing page is an error.
    pub fn write(&self, name: &str, content: &str, overwrite: bool) -> Result<()> {
        let path = self.path_of(name)?;
        if overwrite {
            fs::write(&path, content)?;
            return Ok(());
        }
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(Error::PageExists(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    /// The same page under the other extension, if that file exists.
    pub fn counterpart(&self, name: &str) -> Result<Option<String>> {
        let other = self
            .opts
            .counterpart(name)
            .ok_or_else(|| Error::UnsupportedExtension(name.to_string()))?;
        Ok(self.exists(&other)?.then_some(other))
    }
}
