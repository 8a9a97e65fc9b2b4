use crate::common::error::{BinaryNotAFile, BinaryNotFound, Result};
use async_trait::async_trait;
use snafu::{ensure, ResultExt};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Resolves the filesystem path of an external binary.
#[async_trait]
pub trait BinaryProvisioner: Send + Sync {
    /// Returns the path to the binary called `name`.
    async fn path(&self, name: &str) -> Result<PathBuf>;
}

/// Looks binaries up in a search path, $PATH by default.
#[derive(Clone, Debug, Default)]
pub struct SearchPath {
    dirs: Option<OsString>,
}

impl SearchPath {
    /// Looks binaries up in `dirs` (a $PATH-formatted list) instead of $PATH.
    pub fn in_dirs<D>(dirs: D) -> Self
    where
        D: Into<OsString>,
    {
        Self {
            dirs: Some(dirs.into()),
        }
    }
}

#[async_trait]
impl BinaryProvisioner for SearchPath {
    async fn path(&self, name: &str) -> Result<PathBuf> {
        let path = match self.dirs.as_ref() {
            Some(dirs) => {
                let cwd = std::env::current_dir().unwrap_or_default();
                which::which_in(name, Some(dirs), cwd)
            }
            None => which::which(name),
        }
        .context(BinaryNotFound {
            name: name.to_string(),
        })?;

        debug!(%name, path = %path.display(), "Resolved binary");
        Ok(path)
    }
}

/// Always resolves to one configured path, whatever the binary name.
#[derive(Clone, Debug)]
pub struct FixedPath {
    path: PathBuf,
}

impl FixedPath {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    pub fn as_path(&self) -> &Path {
        self.path.as_path()
    }
}

#[async_trait]
impl BinaryProvisioner for FixedPath {
    async fn path(&self, _name: &str) -> Result<PathBuf> {
        ensure!(
            self.path.is_file(),
            BinaryNotAFile {
                path: self.path.clone()
            }
        );
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{BinaryProvisioner, FixedPath, SearchPath};
    use crate::common::error::{Error, ErrorKind};
    use std::fs;

    #[cfg(unix)]
    #[tokio::test]
    async fn search_path_finds_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let helm = dir.path().join("helm");
        fs::write(&helm, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&helm, fs::Permissions::from_mode(0o755)).unwrap();

        let path = SearchPath::in_dirs(dir.path())
            .path("helm")
            .await
            .unwrap();

        assert_eq!(path, helm);
    }

    #[tokio::test]
    async fn search_path_reports_missing_binary() {
        let dir = tempfile::tempdir().unwrap();

        let error = SearchPath::in_dirs(dir.path())
            .path("helm")
            .await
            .unwrap_err();

        assert!(matches!(error, Error::BinaryNotFound { ref name, .. } if name == "helm"));
        assert_eq!(error.kind(), ErrorKind::Provisioning);
    }

    #[tokio::test]
    async fn fixed_path_must_be_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let helm = dir.path().join("helm");
        fs::write(&helm, "").unwrap();

        assert_eq!(FixedPath::new(&helm).path("helm").await.unwrap(), helm);

        let error = FixedPath::new(dir.path()).path("helm").await.unwrap_err();
        assert!(matches!(error, Error::BinaryNotAFile { .. }));
    }
}
