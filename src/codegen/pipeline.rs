use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::codegen::calls::CallExtractor;
use crate::codegen::diff::{EndpointDiff, diff_endpoints};
use crate::codegen::parser::parse_endpoint;
use crate::codegen::rules::DispatchRules;
use crate::codegen::stubs::{StubFlavor, new_reference_entries, render_missing_methods};
use crate::config::CodegenConfig;
use crate::docs::endpoint_lists::{read_file, write_file};
use crate::docs::{EndpointLists, EndpointScanner, read_endpoint_lists, regenerate_endpoint_lists};
use crate::error::{CodegenError, Result};
use crate::models::{
    EndpointSet, EndpointsByLine, EquivalencePolicy, MethodPathFamily, MethodPathFamilyVersion,
};

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Rebuild the endpoint lists from the documentation files.
    pub regenerate: bool,
    /// Persist regenerated lists next to the docs.
    pub write_lists: bool,
    pub match_version: bool,
    pub skip_malformed: bool,
    pub endpoints_md: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl GenerateOptions {
    pub fn policy(&self) -> &'static dyn EquivalencePolicy {
        if self.match_version {
            &MethodPathFamilyVersion
        } else {
            &MethodPathFamily
        }
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub diff: EndpointDiff,
    pub stubs_written: usize,
    pub output_file: PathBuf,
    pub reference_entries_added: Option<usize>,
}

#[derive(Serialize)]
struct RunReport<'a> {
    generated_at: DateTime<Utc>,
    client_file: &'a str,
    flavor: StubFlavor,
    stubs_written: usize,
    diff: &'a EndpointDiff,
}

pub struct CodegenPipeline {
    config: CodegenConfig,
    rules: DispatchRules,
    scanner: EndpointScanner,
    extractor: CallExtractor,
}

impl CodegenPipeline {
    pub fn new(config: CodegenConfig) -> Result<Self> {
        Ok(Self {
            config,
            rules: DispatchRules::binance(),
            scanner: EndpointScanner::new()?,
            extractor: CallExtractor::new()?,
        })
    }

    pub fn rules(&self) -> &DispatchRules {
        &self.rules
    }

    /// Parses raw documented lines. Malformed lines abort unless `skip_malformed` is set.
    /// Well-formed lines whose family has no route for the product line are dropped.
    pub fn parse_documented(&self, lists: &EndpointLists, skip_malformed: bool) -> Result<EndpointsByLine> {
        let mut documented = EndpointsByLine::new();
        for (line, raws) in lists {
            let mut records = EndpointSet::new();
            for raw in raws {
                match parse_endpoint(raw, *line, &self.rules) {
                    Ok(record) if self.rules.route(*line, record.api_family).is_none() => {
                        warn!(
                            %line,
                            endpoint = %raw,
                            family = %record.api_family,
                            "dropping unrouted endpoint"
                        );
                    }
                    Ok(record) => {
                        records.entry(raw.clone()).or_insert(record);
                    }
                    Err(err) if skip_malformed => warn!(%line, error = %err, "skipping endpoint"),
                    Err(err) => return Err(err),
                }
            }
            documented.insert(*line, records);
        }
        Ok(documented)
    }

    async fn load_documented(&self, options: &GenerateOptions) -> Result<EndpointsByLine> {
        let lists = if options.regenerate {
            regenerate_endpoint_lists(
                &self.scanner,
                &self.config.doc_files,
                &self.config.endpoint_lists,
                options.write_lists,
            )
            .await?
        } else {
            read_endpoint_lists(&self.config.endpoint_lists).await?
        };
        self.parse_documented(&lists, options.skip_malformed)
    }

    pub async fn run(&self, options: &GenerateOptions) -> Result<RunSummary> {
        let documented = self.load_documented(options).await?;

        let source = read_file(&self.config.client_file).await?;
        let implemented = self.extractor.implemented_endpoints(&source, &self.rules);

        let policy = options.policy();
        let diff = diff_endpoints(&documented, &implemented, policy);
        info!(policy = policy.name(), "compared documented and implemented endpoints");

        let output = render_missing_methods(&diff, self.config.flavor);
        write_file(&self.config.output_file, &output).await?;
        let stubs_written = diff.total_missing_in_implementation();
        info!(path = %self.config.output_file.display(), stubs = stubs_written, "missing methods written");

        let reference_entries_added = match &options.endpoints_md {
            Some(path) => Some(self.append_reference(path, &diff).await?),
            None => None,
        };

        if let Some(path) = &options.report {
            let client_file = self.config.client_file.to_string_lossy();
            let report = RunReport {
                generated_at: Utc::now(),
                client_file: &client_file,
                flavor: self.config.flavor,
                stubs_written,
                diff: &diff,
            };
            write_file(path, &serde_json::to_string_pretty(&report)?).await?;
            info!(path = %path.display(), "report written");
        }

        Ok(RunSummary {
            diff,
            stubs_written,
            output_file: self.config.output_file.clone(),
            reference_entries_added,
        })
    }

    async fn append_reference(&self, path: &Path, diff: &EndpointDiff) -> Result<usize> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|source| CodegenError::io(path, source))?;
        let existing = if exists {
            read_file(path).await?
        } else {
            String::new()
        };
        let missing = diff
            .lines
            .values()
            .flat_map(|line| line.missing_in_implementation.iter());
        let (appended, added) = new_reference_entries(&existing, missing);
        if added > 0 {
            write_file(path, &format!("{existing}{appended}")).await?;
        }
        Ok(added)
    }
}

/// Operator-facing counts, one block per product line.
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    for (line, line_diff) in &summary.diff.lines {
        out.push_str(&format!(
            "{}\nmissing in docs: {}\nmissing in implementation: {}\ntotal in docs: {}\ntotal in implementation: {}\n",
            line,
            line_diff.missing_in_docs.len(),
            line_diff.missing_in_implementation.len(),
            line_diff.total_in_docs,
            line_diff.total_in_implementation,
        ));
    }
    out.push_str(&format!("Total missing in implementation: {}\n", summary.stubs_written));
    if let Some(added) = summary.reference_entries_added {
        out.push_str(&format!("Added {} endpoints to the endpoint reference\n", added));
    }
    out.push_str(&format!("{} file is generated\n", summary.output_file.display()));
    out
}

pub fn print_summary(summary: &RunSummary) {
    print!("{}", format_summary(summary));
}
