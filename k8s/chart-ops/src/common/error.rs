use snafu::Snafu;
use std::path::PathBuf;

/// For use with multiple fallible operations which may fail for different reasons, but are
/// defined withing the same scope and must return to the outer scope (calling scope) using
/// the try operator -- '?'.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[snafu(context(suffix(false)))]
pub enum Error {
    /// Error for when a string does not name a supported chart action.
    #[snafu(display(
        "Unsupported chart action '{}', expected one of 'install' or 'template'",
        action
    ))]
    UnknownAction { action: String },

    /// Error for when a chart request is missing a mandatory field.
    #[snafu(display("Invalid chart request, {} must not be empty", field))]
    InvalidRequest { field: String },

    /// Error for when a repository entry has an empty name.
    #[snafu(display("Invalid helm repository entry with URL {}, name must not be empty", url))]
    EmptyRepositoryName { url: String },

    /// Error for when a repository URL cannot be parsed.
    #[snafu(display("Failed to parse URL {} of helm repository {}: {}", url, name, source))]
    RepositoryUrlParse {
        source: url::ParseError,
        name: String,
        url: String,
    },

    /// Error for when a helm command is requested before a kubeconfig has been bound.
    #[snafu(display("No kubeconfig is bound to the helm client"))]
    KubeconfigNotSet,

    /// Error for when the helm client is built without a binary path.
    #[snafu(display("No helm binary path was provided to the helm client builder"))]
    NoBinaryPath,

    /// Error for when a binary cannot be found in the search path.
    #[snafu(display("Failed to find binary '{}' in the search path: {}", name, source))]
    BinaryNotFound { source: which::Error, name: String },

    /// Error for when a configured binary path does not point to a file.
    #[snafu(display("Binary path {} is not a file", path.display()))]
    BinaryNotAFile { path: PathBuf },

    /// Error for when the temporary values file cannot be created.
    #[snafu(display("Failed to create temporary values file: {}", source))]
    TempFileCreation { source: std::io::Error },

    /// Error for when a values template cannot be read.
    #[snafu(display("Failed to read values template {}: {}", filepath.display(), source))]
    ReadingTemplate {
        source: std::io::Error,
        filepath: PathBuf,
    },

    /// Error for when the values data cannot be turned into a template context.
    #[snafu(display("Failed to build template context from values data: {}", source))]
    TemplateContext { source: tera::Error },

    /// Error for when a values template fails to render.
    #[snafu(display("Failed to render values template {}: {:?}", filepath.display(), source))]
    RenderTemplate {
        source: tera::Error,
        filepath: PathBuf,
    },

    /// Error for when rendered values cannot be written out.
    #[snafu(display("Failed to write rendered values to {}: {}", filepath.display(), source))]
    WriteValuesFile {
        source: std::io::Error,
        filepath: PathBuf,
    },

    /// Error for when a helm command cannot be started.
    #[snafu(display(
        "Failed to run Helm command,\ncommand: {},\nargs: {:?},\ncommand_error: {}",
        command,
        args,
        source
    ))]
    HelmCommand {
        source: std::io::Error,
        command: String,
        args: Vec<String>,
    },

    /// Error for when a helm command exits with a non-zero status.
    #[snafu(display(
        "Helm command failed with exit code {:?},\ncommand: {},\nargs: {:?},\nstd_err: {}",
        code,
        command,
        args,
        std_err
    ))]
    HelmCommandFailed {
        command: String,
        args: Vec<String>,
        code: Option<i32>,
        std_err: String,
    },

    /// Error for when a command's standard output is not valid UTF-8.
    #[snafu(display("Failed to convert Vec<u8> to UTF-8 formatted string: {}", source))]
    U8VectorToString { source: std::str::Utf8Error },

    /// Error for when regular expression parsing or compilation fails.
    #[snafu(display("Failed to compile regex {}: {}", expression, source))]
    RegexCompile {
        source: regex::Error,
        expression: String,
    },

    /// Error for when the output of `helm version` carries no version.
    #[snafu(display("No semantic version found in helm version output '{}'", output))]
    HelmVersionParse { output: String },

    /// Error for when a version string cannot be parsed as a semantic version.
    #[snafu(display("Failed to parse {} as a valid semver: {}", version_string, source))]
    SemverParse {
        source: semver::Error,
        version_string: String,
    },

    /// Error for when the helm binary is not helm v3.x.y.
    #[snafu(display("Helm version {} is not 'v3.x.y'", version))]
    HelmVersion { version: String },

    /// Error for when command output cannot be written to standard output.
    #[snafu(display("Failed to write command output: {}", source))]
    WriteOutput { source: std::io::Error },

    /// Error for when a rendered values file cannot be removed.
    #[snafu(display("Failed to remove values file {}: {}", filepath.display(), source))]
    RemoveValuesFile {
        source: std::io::Error,
        filepath: PathBuf,
    },

    /// Error for when an input file cannot be read.
    #[snafu(display("Failed to read file {}: {}", filepath.display(), source))]
    ReadingFile {
        source: std::io::Error,
        filepath: PathBuf,
    },

    /// Error for when yaml could not be parsed from a file.
    #[snafu(display("Failed to parse YAML at {}: {}", filepath.display(), source))]
    YamlParseFromFile {
        source: serde_yaml::Error,
        filepath: PathBuf,
    },
}

/// The broad class of an Error, which tells a caller at which stage an operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request or the client configuration is invalid. Nothing was created or run.
    Configuration,
    /// The helm binary could not be resolved.
    Provisioning,
    /// The values template could not be rendered. No command was run.
    Render,
    /// The helm command could not be started, exited non-zero, or produced unusable output.
    Execution,
    /// A rendered values file could not be removed.
    Cleanup,
}

impl Error {
    /// Maps the Error to its ErrorKind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownAction { .. }
            | Error::InvalidRequest { .. }
            | Error::EmptyRepositoryName { .. }
            | Error::RepositoryUrlParse { .. }
            | Error::KubeconfigNotSet
            | Error::NoBinaryPath
            | Error::ReadingFile { .. }
            | Error::YamlParseFromFile { .. } => ErrorKind::Configuration,
            Error::BinaryNotFound { .. } | Error::BinaryNotAFile { .. } => {
                ErrorKind::Provisioning
            }
            Error::TempFileCreation { .. }
            | Error::ReadingTemplate { .. }
            | Error::TemplateContext { .. }
            | Error::RenderTemplate { .. }
            | Error::WriteValuesFile { .. } => ErrorKind::Render,
            Error::HelmCommand { .. }
            | Error::HelmCommandFailed { .. }
            | Error::U8VectorToString { .. }
            | Error::RegexCompile { .. }
            | Error::HelmVersionParse { .. }
            | Error::SemverParse { .. }
            | Error::HelmVersion { .. }
            | Error::WriteOutput { .. } => ErrorKind::Execution,
            Error::RemoveValuesFile { .. } => ErrorKind::Cleanup,
        }
    }
}

/// A wrapper type to remove repeated Result<T, Error> returns.
pub type Result<T, E = Error> = std::result::Result<T, E>;
