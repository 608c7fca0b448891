//! Live probing of manifest-declared paths against the target.
//!
//! Candidates are requested through an ordered buffered stream: at most
//! `concurrency` requests are in flight and results come back in candidate
//! order. A concurrency of one is strictly sequential.

use crate::config::ProbeConfig;
use crate::manifest::ManifestRecord;
use crate::utils::{ExplorerError, Result};
use futures_util::{stream, StreamExt};
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use std::io;
use tracing::{debug, info};

/// Location of the core files manifest below the site root.
pub const MANIFEST_SUFFIX: &str = "/administrator/manifests/files/joomla.xml";

/// Site origin for a manifest URL: the URL with [`MANIFEST_SUFFIX`] trimmed.
/// URLs without the suffix are returned unchanged.
pub fn base_origin(manifest_url: &str) -> &str {
    manifest_url
        .strip_suffix(MANIFEST_SUFFIX)
        .unwrap_or(manifest_url)
}

/// Absolute probe URLs for every discovered path, in manifest order.
pub fn candidate_urls(base: &str, record: &ManifestRecord) -> Vec<String> {
    record
        .discovered_paths()
        .into_iter()
        .map(|path| format!("{}{}", base, path))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Status(u16),
    /// Transport failure; the candidate is skipped
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub url: String,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    /// Responded with anything other than 404.
    pub fn is_hit(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Status(code) if code != StatusCode::NOT_FOUND.as_u16())
    }

    /// Report line for a hit, e.g. `- [403] https://example.com/tmp/`.
    pub fn report_line(&self) -> Option<String> {
        match self.outcome {
            ProbeOutcome::Status(code) if self.is_hit() => {
                Some(format!("- [{}] {}\n", code, self.url))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeSummary {
    pub candidates: usize,
    pub hits: usize,
    pub skipped: usize,
}

pub struct Prober {
    client: reqwest::Client,
    user_agent: String,
    concurrency: usize,
}

impl Prober {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ExplorerError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            concurrency: config.effective_concurrency(),
        })
    }

    /// Issue one GET. Transport errors map to [`ProbeOutcome::Unreachable`].
    pub async fn probe(&self, url: String) -> ProbeResult {
        let outcome = match self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
        {
            Ok(response) => ProbeOutcome::Status(response.status().as_u16()),
            Err(e) => {
                debug!("Probe failed for {}: {}", url, e);
                ProbeOutcome::Unreachable
            }
        };
        debug!("Probed {} -> {:?}", url, outcome);

        ProbeResult { url, outcome }
    }

    /// Probe every URL, handing each result to `on_result` in input order.
    pub async fn probe_all<F>(&self, urls: Vec<String>, mut on_result: F) -> io::Result<ProbeSummary>
    where
        F: FnMut(&ProbeResult) -> io::Result<()>,
    {
        let mut summary = ProbeSummary {
            candidates: urls.len(),
            ..ProbeSummary::default()
        };

        let mut results = stream::iter(urls)
            .map(|url| self.probe(url))
            .buffered(self.concurrency);

        while let Some(result) = results.next().await {
            match result.outcome {
                ProbeOutcome::Unreachable => summary.skipped += 1,
                _ if result.is_hit() => summary.hits += 1,
                _ => {}
            }
            on_result(&result)?;
        }

        info!(
            "Probed {} candidates: {} reported, {} unreachable",
            summary.candidates, summary.hits, summary.skipped
        );
        Ok(summary)
    }
}
