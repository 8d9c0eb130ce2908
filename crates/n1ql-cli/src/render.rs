use crate::cli::{OutputFormat, RenderArgs};
use crate::config::ProjectConfig;
use crate::request_file::RequestFile;
use n1ql_request::QueryRequest;

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load(&args.config, args.config_explicit)?;
    match &project.config_path {
        Some(path) => tracing::debug!(config = %path.display(), "loaded request defaults"),
        None => tracing::debug!("no config file; using built-in defaults"),
    }

    let request = RequestFile::load(&args.request)?.build(&project.file.defaults)?;
    println!("{}", render(&request, args.output, args.compact)?);
    Ok(())
}

#[allow(deprecated)]
fn render(request: &QueryRequest, output: OutputFormat, compact: bool) -> anyhow::Result<String> {
    if output == OutputFormat::Form {
        return Ok(request.query_parameters_as_form_urlencoded()?);
    }
    let values = request.form_values()?;
    if compact {
        Ok(values.to_json()?)
    } else {
        Ok(serde_json::to_string_pretty(&values)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> QueryRequest {
        let mut request = QueryRequest::with_statement("SELECT 1").unwrap();
        request.pretty(true);
        request
    }

    #[test]
    fn renders_compact_json() {
        let out = render(&request(), OutputFormat::Json, true).unwrap();
        assert_eq!(out, r#"{"statement":"SELECT 1","pretty":true}"#);
    }

    #[test]
    fn renders_pretty_json() {
        let out = render(&request(), OutputFormat::Json, false).unwrap();
        assert_eq!(out, "{\n  \"statement\": \"SELECT 1\",\n  \"pretty\": true\n}");
    }

    #[test]
    fn renders_form() {
        let out = render(&request(), OutputFormat::Form, false).unwrap();
        assert_eq!(out, "statement=SELECT%201&pretty=true");
    }

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("n1ql-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn run_renders_request_file_with_config() {
        let config = temp_file(
            "render-n1ql.toml",
            "[defaults]\ntimeout_ms = 500\nscan_consistency = \"request_plus\"\n",
        );
        let request = temp_file("render-request.toml", "statement = \"SELECT 1\"\n");

        for output in [OutputFormat::Json, OutputFormat::Form] {
            let args = RenderArgs {
                config: config.clone(),
                config_explicit: true,
                request: request.clone(),
                output,
                compact: false,
            };
            run(args).unwrap();
        }

        std::fs::remove_file(config).unwrap();
        std::fs::remove_file(request).unwrap();
    }

    #[test]
    fn run_fails_on_missing_explicit_config() {
        let request = temp_file("render-no-config.toml", "statement = \"SELECT 1\"\n");
        let args = RenderArgs {
            config: std::env::temp_dir().join("n1ql-missing-config.toml"),
            config_explicit: true,
            request: request.clone(),
            output: OutputFormat::Json,
            compact: true,
        };
        let err = run(args).unwrap_err();
        std::fs::remove_file(request).unwrap();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
