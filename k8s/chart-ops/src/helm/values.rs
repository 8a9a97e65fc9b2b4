use crate::{
    common::{
        constants::{VALUES_FILE_PREFIX, VALUES_FILE_SUFFIX},
        error::{RemoveValuesFile, Result, TempFileCreation},
    },
    helm::request::ValuesTemplate,
    render::TemplateRenderer,
};
use snafu::ResultExt;
use std::path::Path;
use tempfile::{Builder, TempPath};
use tracing::debug;

/// A rendered values file which lives for one helm command. The file is removed by
/// ValuesFile::release(), or when the ValuesFile is dropped on any other exit path.
#[derive(Debug)]
pub struct ValuesFile {
    path: TempPath,
}

impl ValuesFile {
    /// Creates a uniquely named file in `dir` (or the system temporary directory) and renders
    /// the template into it. If rendering fails, the file is removed before returning.
    pub fn render(
        renderer: &dyn TemplateRenderer,
        template: &ValuesTemplate,
        dir: Option<&Path>,
    ) -> Result<Self> {
        let mut builder = Builder::new();
        builder.prefix(VALUES_FILE_PREFIX).suffix(VALUES_FILE_SUFFIX);

        let file = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .context(TempFileCreation)?;

        let values_file = Self {
            path: file.into_temp_path(),
        };
        debug!(path = %values_file.path().display(), "Created values file");

        renderer.render(template.path(), values_file.path(), template.data())?;

        Ok(values_file)
    }

    /// This is the path which is passed to helm with `--values`.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the file, reporting failure to remove it.
    pub fn release(self) -> Result<()> {
        let filepath = self.path.to_path_buf();
        self.path.close().context(RemoveValuesFile {
            filepath: filepath.clone(),
        })?;
        debug!(path = %filepath.display(), "Removed values file");
        Ok(())
    }
}
