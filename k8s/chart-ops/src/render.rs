use crate::common::error::{
    ReadingTemplate, RenderTemplate, Result, TemplateContext, WriteValuesFile,
};
use snafu::ResultExt;
use std::{collections::BTreeMap, fs, path::Path};
use tera::{Context, Tera};
use tracing::debug;

/// Structured data which parameterizes a values template.
pub type ValuesData = BTreeMap<String, serde_json::Value>;

/// Renders a template file and data into an output file.
pub trait TemplateRenderer: Send + Sync {
    /// Renders the template at `template` with `data` and writes the result to `output`.
    fn render(&self, template: &Path, output: &Path, data: &ValuesData) -> Result<()>;
}

/// A TemplateRenderer for Tera (Jinja2-like) templates, e.g. `replicas: {{ replicas }}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TeraRenderer;

impl TemplateRenderer for TeraRenderer {
    fn render(&self, template: &Path, output: &Path, data: &ValuesData) -> Result<()> {
        let source = fs::read_to_string(template).context(ReadingTemplate {
            filepath: template.to_path_buf(),
        })?;

        let context = Context::from_serialize(data).context(TemplateContext)?;

        // Values files are YAML, autoescaping is for HTML.
        let rendered = Tera::one_off(source.as_str(), &context, false).context(RenderTemplate {
            filepath: template.to_path_buf(),
        })?;

        fs::write(output, rendered).context(WriteValuesFile {
            filepath: output.to_path_buf(),
        })?;

        debug!(
            template = %template.display(),
            output = %output.display(),
            "Rendered values template"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{TemplateRenderer, TeraRenderer, ValuesData};
    use crate::common::error::{Error, ErrorKind};
    use maplit::btreemap;
    use serde_json::json;
    use std::fs;

    #[test]
    fn renders_data_into_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("values.tpl");
        let output = dir.path().join("values.yaml");
        fs::write(
            &template,
            "replicas: {{ replicas }}\nimage:\n  tag: \"{{ image.tag }}\"\n",
        )
        .unwrap();

        let data: ValuesData = btreemap! {
            "replicas".to_string() => json!(5),
            "image".to_string() => json!({ "tag": "1.2.3" }),
        };
        TeraRenderer.render(&template, &output, &data).unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "replicas: 5\nimage:\n  tag: \"1.2.3\"\n"
        );
    }

    #[test]
    fn missing_template_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("values.yaml");

        let error = TeraRenderer
            .render(&dir.path().join("absent.tpl"), &output, &ValuesData::new())
            .unwrap_err();

        assert!(matches!(error, Error::ReadingTemplate { .. }));
        assert_eq!(error.kind(), ErrorKind::Render);
        assert!(!output.exists());
    }

    #[test]
    fn undefined_variable_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("values.tpl");
        let output = dir.path().join("values.yaml");
        fs::write(&template, "replicas: {{ replicas }}\n").unwrap();

        let error = TeraRenderer
            .render(&template, &output, &ValuesData::new())
            .unwrap_err();

        assert!(matches!(error, Error::RenderTemplate { .. }));
        assert!(!output.exists());
    }
}
