use crate::{
    common::error::{HelmCommandFailed, RenderTemplate, Result},
    exec::CommandExecutor,
    render::{TemplateRenderer, ValuesData},
};
use async_trait::async_trait;
use snafu::IntoError;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

/// What a RecordingExecutor saw of a `--values` file while the command was running.
#[derive(Clone, Debug)]
pub(crate) struct SeenValuesFile {
    pub(crate) path: PathBuf,
    pub(crate) content: Option<String>,
}

/// A CommandExecutor which records commands instead of running them.
#[derive(Default)]
pub(crate) struct RecordingExecutor {
    output: String,
    fail: bool,
    remove_values_file: bool,
    calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
    values_files: Mutex<Vec<SeenValuesFile>>,
}

impl RecordingExecutor {
    pub(crate) fn with_output(output: &str) -> Self {
        Self {
            output: output.to_string(),
            ..Default::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Deletes the `--values` file from under the caller, then fails.
    pub(crate) fn failing_and_removing_values_file() -> Self {
        Self {
            fail: true,
            remove_values_file: true,
            ..Default::default()
        }
    }

    pub(crate) fn args(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, args)| args.clone())
            .collect()
    }

    pub(crate) fn binaries(&self) -> Vec<PathBuf> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(binary, _)| binary.clone())
            .collect()
    }

    pub(crate) fn values_files(&self) -> Vec<SeenValuesFile> {
        self.values_files.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn exec(&self, binary: &Path, args: &[String]) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((binary.to_path_buf(), args.to_vec()));

        if let Some(index) = args.iter().position(|arg| arg == "--values") {
            let path = PathBuf::from(&args[index + 1]);
            let content = fs::read_to_string(&path).ok();
            if self.remove_values_file {
                fs::remove_file(&path).unwrap();
            }
            self.values_files
                .lock()
                .unwrap()
                .push(SeenValuesFile { path, content });
        }

        if self.fail {
            return HelmCommandFailed {
                command: binary.to_string_lossy(),
                args: args.to_vec(),
                code: Some(1),
                std_err: "Error: INSTALLATION FAILED",
            }
            .fail();
        }

        Ok(self.output.clone())
    }
}

/// A TemplateRenderer which records the output path it was given, and then fails.
#[derive(Default)]
pub(crate) struct FailingRenderer {
    outputs: Mutex<Vec<PathBuf>>,
}

impl FailingRenderer {
    pub(crate) fn outputs(&self) -> Vec<PathBuf> {
        self.outputs.lock().unwrap().clone()
    }
}

impl TemplateRenderer for FailingRenderer {
    fn render(&self, template: &Path, output: &Path, _data: &ValuesData) -> Result<()> {
        self.outputs.lock().unwrap().push(output.to_path_buf());
        Err(RenderTemplate {
            filepath: template.to_path_buf(),
        }
        .into_error(tera::Error::msg("unexpected end of template")))
    }
}
