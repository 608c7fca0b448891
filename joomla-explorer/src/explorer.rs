//! End-to-end run: fetch, parse, report, probe.

use crate::config::Config;
use crate::fetch::fetch_manifest;
use crate::manifest::parse_manifest;
use crate::probe::{self, ProbeSummary, Prober};
use crate::report::{render_report, Criticality, FileSink, RenderContext};
use crate::utils::{ExplorerError, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: PathBuf,
    pub wordlist: PathBuf,
    pub wordlist_lines: usize,
    pub criticality: Criticality,
    /// `None` when probing is disabled
    pub probe: Option<ProbeSummary>,
}

/// Analyse the manifest at `url`.
///
/// Fetch and parse failures return before any output file is created.
pub async fn run(url: &str, config: &Config) -> Result<RunSummary> {
    info!("Starting joomla-explorer v{} against {}", env!("CARGO_PKG_VERSION"), url);

    let client = reqwest::Client::new();
    let bytes = fetch_manifest(&client, url).await?;
    let record = parse_manifest(&bytes)?;
    info!(
        "Parsed manifest '{}': {} folders, {} files, {} schemas, {} update servers",
        record.name,
        record.folders.len(),
        record.files.len(),
        record.schemas.len(),
        record.update_servers.len()
    );

    let base = probe::base_origin(url);
    let context = RenderContext {
        base_origin: base.to_string(),
        wordlist: config.output.wordlist.display().to_string(),
    };

    let mut sink = FileSink::create(&config.output.report, &config.output.wordlist)?;
    let assessment = render_report(&record, &context, &mut sink)?;
    info!("Criticality: {}", assessment.level);

    let probe = if config.probe.enabled {
        sink.write("\n### 🌐 Testing derived URLs...\n")?;
        let prober = Prober::new(&config.probe)?;
        let candidates = probe::candidate_urls(base, &record);
        let summary = prober
            .probe_all(candidates, |result| match result.report_line() {
                Some(line) => sink.write(&line),
                None => Ok(()),
            })
            .await?;
        Some(summary)
    } else {
        info!("Probing disabled, skipping {} candidates", record.discovered_paths().len());
        None
    };

    sink.finish()?;

    Ok(RunSummary {
        report: config.output.report.clone(),
        wordlist: config.output.wordlist.clone(),
        wordlist_lines: sink.wordlist_lines(),
        criticality: assessment.level,
        probe,
    })
}

/// Process status for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failure,
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Success => ExitCode::SUCCESS,
            RunStatus::Failure => ExitCode::FAILURE,
        }
    }
}

/// Print the closing lines for `result` to `out` and map it to a status.
/// Any error is a failure.
pub fn conclude<O: Write>(result: &Result<RunSummary>, out: &mut O) -> RunStatus {
    match result {
        Ok(summary) => {
            let _ = writeln!(out, "\n✅ Report saved as: {}", summary.report.display());
            let _ = writeln!(out, "✅ Wordlist saved as: {}", summary.wordlist.display());
            RunStatus::Success
        }
        Err(e) => {
            match e {
                ExplorerError::Fetch { reason, .. } => error!("Fetch failed: {}", reason),
                other => error!("Run failed: {}", other),
            }
            if e.is_pre_output() {
                info!("No report or wordlist written");
            }
            let _ = writeln!(out, "{}", e);
            RunStatus::Failure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use tempfile::TempDir;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<extension type="file" method="upgrade">
    <name>files_joomla</name>
    <version>3.10.12</version>
    <scriptfile>administrator/components/com_admin/script.php</scriptfile>
    <update><schemas>
        <schemapath type="mysql">administrator/components/com_admin/sql/updates/mysql</schemapath>
    </schemas></update>
    <fileset><files>
        <folder>tmp</folder>
        <folder>media</folder>
        <file>index.php</file>
        <file>htaccess.txt</file>
    </files></fileset>
</extension>"#;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn joomla_site(manifest: &'static str) -> Router {
        Router::new()
            .route(probe::MANIFEST_SUFFIX, get(move || async move { manifest }))
            .route("/tmp/", get(|| async { StatusCode::FORBIDDEN }))
            .route("/index.php", get(|| async { "home" }))
    }

    fn config_in(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.relocate_outputs(dir.path());
        config
    }

    #[tokio::test]
    async fn test_full_run() {
        let base = serve(joomla_site(MANIFEST)).await;
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let url = format!("{}{}", base, probe::MANIFEST_SUFFIX);
        let summary = run(&url, &config).await.unwrap();

        assert_eq!(summary.criticality, Criticality::High);
        assert_eq!(summary.wordlist_lines, 6);
        assert_eq!(
            summary.probe,
            Some(ProbeSummary { candidates: 6, hits: 2, skipped: 0 })
        );

        let wordlist = std::fs::read_to_string(&summary.wordlist).unwrap();
        assert_eq!(
            wordlist,
            "/tmp/\n/media/\n/index.php\n/htaccess.txt\n\
             /administrator/components/com_admin/script.php\n\
             /administrator/components/com_admin/sql/updates/mysql\n"
        );

        let report = std::fs::read_to_string(&summary.report).unwrap();
        assert!(report.contains("**Name**: files_joomla"));
        assert!(report.contains(&format!("ffuf -u {}/FUZZ", base)));
        assert!(report.contains("### 🌐 Testing derived URLs...\n"));
        assert!(report.contains(&format!("- [403] {}/tmp/\n", base)));
        assert!(report.contains(&format!("- [200] {}/index.php\n", base)));
        assert!(!report.contains(&format!("{}/media/\n", base)));
    }

    #[tokio::test]
    async fn test_successful_run_exits_success() {
        let base = serve(joomla_site(MANIFEST)).await;
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.probe.enabled = false;

        let url = format!("{}{}", base, probe::MANIFEST_SUFFIX);
        let result = run(&url, &config).await;

        let mut out = Vec::new();
        assert_eq!(conclude(&result, &mut out), RunStatus::Success);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(&format!("✅ Report saved as: {}", config.output.report.display())));
        assert!(out.contains(&format!("✅ Wordlist saved as: {}", config.output.wordlist.display())));
    }

    #[tokio::test]
    async fn test_missing_manifest_exits_failure() {
        let base = serve(Router::new()).await;
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let url = format!("{}{}", base, probe::MANIFEST_SUFFIX);
        let result = run(&url, &config).await;

        let mut out = Vec::new();
        assert_eq!(conclude(&result, &mut out), RunStatus::Failure);
        assert_eq!(String::from_utf8(out).unwrap(), format!("❌ Error accessing {}\n", url));
    }

    #[test]
    fn test_parse_failure_exits_failure() {
        let result: Result<RunSummary> = Err(ExplorerError::Parse("bad root".to_string()));

        let mut out = Vec::new();
        assert_eq!(conclude(&result, &mut out), RunStatus::Failure);
        assert_eq!(String::from_utf8(out).unwrap(), "Error parsing XML: bad root\n");
    }

    #[tokio::test]
    async fn test_missing_manifest_writes_nothing() {
        let base = serve(Router::new()).await;
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let url = format!("{}{}", base, probe::MANIFEST_SUFFIX);
        let err = run(&url, &config).await.unwrap_err();

        assert!(matches!(err, ExplorerError::Fetch { .. }));
        assert!(err.to_string().starts_with("❌ Error accessing"));
        assert!(!config.output.report.exists());
        assert!(!config.output.wordlist.exists());
    }

    #[tokio::test]
    async fn test_malformed_manifest_writes_nothing() {
        let base = serve(joomla_site("<extension><name>broken</extension>")).await;
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let url = format!("{}{}", base, probe::MANIFEST_SUFFIX);
        let err = run(&url, &config).await.unwrap_err();

        assert!(matches!(err, ExplorerError::Parse(_)));
        assert!(!config.output.report.exists());
        assert!(!config.output.wordlist.exists());
    }

    #[tokio::test]
    async fn test_empty_manifest_without_probing() {
        let base = serve(joomla_site("<extension></extension>")).await;
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.probe.enabled = false;

        let url = format!("{}{}", base, probe::MANIFEST_SUFFIX);
        let summary = run(&url, &config).await.unwrap();

        assert_eq!(summary.criticality, Criticality::Moderate);
        assert_eq!(summary.wordlist_lines, 0);
        assert!(summary.probe.is_none());
        assert_eq!(std::fs::read_to_string(&summary.wordlist).unwrap(), "");

        let report = std::fs::read_to_string(&summary.report).unwrap();
        assert!(report.contains(Criticality::Moderate.verdict()));
        assert!(!report.contains("Testing derived URLs"));
    }
}
