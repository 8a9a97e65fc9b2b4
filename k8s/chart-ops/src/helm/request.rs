use crate::{
    common::error::{InvalidRequest, Result},
    render::ValuesData,
};
use serde::Deserialize;
use snafu::ensure;
use std::path::{Path, PathBuf};

/// A values template and the data it is rendered with. The rendered output is passed to helm as
/// a `--values` file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ValuesTemplate {
    path: PathBuf,
    #[serde(default)]
    data: ValuesData,
}

impl ValuesTemplate {
    pub fn new<P>(path: P, data: ValuesData) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            path: path.into(),
            data,
        }
    }

    /// This is the path to the template source file.
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// This is the data the template is rendered with.
    pub fn data(&self) -> &ValuesData {
        &self.data
    }
}

/// This identifies a helm release and the chart it is created from, along with the options for
/// `helm upgrade --install` and `helm template`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    name: String,
    chart: String,
    #[serde(default, alias = "ns")]
    namespace: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    wait: bool,
    #[serde(default)]
    values_template: Option<ValuesTemplate>,
}

impl ChartRequest {
    /// Creates a request for release `name` from `chart`, which is either a local chart path or
    /// a `<repo>/<chart>` reference.
    pub fn new<N, C>(name: N, chart: C) -> Self
    where
        N: ToString,
        C: ToString,
    {
        Self {
            name: name.to_string(),
            chart: chart.to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_namespace<J>(mut self, namespace: J) -> Self
    where
        J: ToString,
    {
        self.namespace = Some(namespace.to_string());
        self
    }

    /// The version is passed to helm verbatim, so it may be a constraint like `^1.2`.
    #[must_use]
    pub fn with_version<V>(mut self, version: V) -> Self
    where
        V: ToString,
    {
        self.version = Some(version.to_string());
        self
    }

    #[must_use]
    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    #[must_use]
    pub fn with_values_template(mut self, values_template: ValuesTemplate) -> Self {
        self.values_template = Some(values_template);
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn chart(&self) -> &str {
        self.chart.as_str()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn wait(&self) -> bool {
        self.wait
    }

    pub fn values_template(&self) -> Option<&ValuesTemplate> {
        self.values_template.as_ref()
    }

    /// Checks that the fields helm needs positionally are present.
    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(
            !self.name.trim().is_empty(),
            InvalidRequest {
                field: "release name"
            }
        );
        ensure!(
            !self.chart.trim().is_empty(),
            InvalidRequest {
                field: "chart reference"
            }
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ChartRequest;
    use crate::common::error::{Error, ErrorKind};
    use serde_json::json;
    use std::path::Path;

    #[test]
    fn deserializes_from_yaml() {
        let request: ChartRequest = serde_yaml::from_str(
            r#"
name: app
chart: bitnami/redis
ns: cache
version: 10.6.5
wait: true
valuesTemplate:
  path: values.tpl
  data:
    replicas: 5
"#,
        )
        .unwrap();

        assert_eq!(request.name(), "app");
        assert_eq!(request.chart(), "bitnami/redis");
        assert_eq!(request.namespace(), Some("cache"));
        assert_eq!(request.version(), Some("10.6.5"));
        assert!(request.wait());
        let template = request.values_template().unwrap();
        assert_eq!(template.path(), Path::new("values.tpl"));
        assert_eq!(template.data()["replicas"], json!(5));
    }

    #[test]
    fn optional_fields_default_to_absent() {
        let request: ChartRequest = serde_yaml::from_str("name: app\nchart: ./chart\n").unwrap();

        assert_eq!(request, ChartRequest::new("app", "./chart"));
        assert!(!request.wait());
        assert!(request.values_template().is_none());
    }

    #[test]
    fn validate_rejects_blank_positional_fields() {
        let error = ChartRequest::new(" ", "./chart").validate().unwrap_err();
        assert!(matches!(error, Error::InvalidRequest { ref field } if field == "release name"));
        assert_eq!(error.kind(), ErrorKind::Configuration);

        let error = ChartRequest::new("app", "").validate().unwrap_err();
        assert!(matches!(error, Error::InvalidRequest { ref field } if field == "chart reference"));

        assert!(ChartRequest::new("app", "./chart").validate().is_ok());
    }
}
