use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::error::{CodegenError, Result};
use crate::models::ProductLine;

/// Endpoints still present in the documentation text but retired from the client.
pub const DEPRECATED_ENDPOINTS: &[&str] = &[
    "GET /fapi/v1/ticker/price",
    "GET /fapi/v1/pmExchangeInfo",
    "POST /api/v3/order/oco",
    "POST /sapi/v1/eth-staking/eth/stake",
    "GET /sapi/v1/eth-staking/account",
    "GET /sapi/v1/portfolio/interest-rate",
    "GET /api/v1/order",
    "GET /api/v1/openOrders",
    "POST /api/v1/order",
    "DELETE /api/v1/order",
    "GET /api/v1/allOrders",
    "GET /api/v1/account",
    "GET /api/v1/myTrades",
    "POST /sapi/v1/loan/flexible/borrow",
    "GET /sapi/v1/loan/flexible/ongoing/orders",
    "GET /sapi/v1/loan/flexible/borrow/history",
    "POST /sapi/v1/loan/flexible/repay",
    "GET /sapi/v1/loan/flexible/repay/history",
    "POST /sapi/v1/loan/flexible/adjust/ltv",
    "GET /sapi/v1/loan/flexible/ltv/adjustment/history",
    "GET /sapi/v1/loan/flexible/loanable/data",
    "GET /sapi/v1/loan/flexible/collateral/data",
];

pub type EndpointLists = BTreeMap<ProductLine, Vec<String>>;

/// Pulls `METHOD /path` strings out of raw documentation text.
pub struct EndpointScanner {
    pattern: Regex,
    code_selector: Selector,
}

impl EndpointScanner {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(r"(GET|POST|PUT|DELETE) (/[\w/-]+)")?;
        let code_selector = Selector::parse("code")
            .map_err(|err| CodegenError::Config(format!("invalid code selector: {err:?}")))?;
        Ok(Self {
            pattern,
            code_selector,
        })
    }

    /// Unique endpoints in order of first appearance, deny-listed ones removed.
    pub fn scan_text(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .filter(|endpoint| !DEPRECATED_ENDPOINTS.contains(&endpoint.as_str()))
            .filter(|endpoint| seen.insert(endpoint.clone()))
            .collect()
    }

    /// Text of every `<code>` element, one per line.
    pub fn code_block_text(&self, html: &str) -> String {
        let document = Html::parse_document(html);
        document
            .select(&self.code_selector)
            .map(|code| code.text().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn scan_document(&self, path: &Path, contents: &str) -> Vec<String> {
        if is_html(path) {
            self.scan_text(&self.code_block_text(contents))
        } else {
            self.scan_text(contents)
        }
    }
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

/// Lines of an endpoint-list file, trimmed, blank lines and repeats dropped.
pub fn parse_endpoint_list(contents: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}

pub async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CodegenError::io(path, source))
}

pub async fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| CodegenError::io(parent, source))?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| CodegenError::io(path, source))
}

pub async fn read_endpoint_lists(files: &BTreeMap<ProductLine, PathBuf>) -> Result<EndpointLists> {
    let mut lists = EndpointLists::new();
    for (line, path) in files {
        let endpoints = parse_endpoint_list(&read_file(path).await?);
        debug!(%line, path = %path.display(), count = endpoints.len(), "loaded endpoint list");
        lists.insert(*line, endpoints);
    }
    Ok(lists)
}

/// Rebuilds endpoint lists from documentation files, optionally persisting them.
pub async fn regenerate_endpoint_lists(
    scanner: &EndpointScanner,
    doc_files: &BTreeMap<ProductLine, PathBuf>,
    list_files: &BTreeMap<ProductLine, PathBuf>,
    write_lists: bool,
) -> Result<EndpointLists> {
    let mut lists = EndpointLists::new();
    for (line, doc_path) in doc_files {
        let contents = read_file(doc_path).await?;
        let endpoints = scanner.scan_document(doc_path, &contents);
        debug!(%line, path = %doc_path.display(), count = endpoints.len(), "scanned documentation");

        if write_lists {
            if let Some(target) = list_files.get(line) {
                write_file(target, &endpoints.join("\n")).await?;
                info!(path = %target.display(), "endpoint list generated");
            }
        }
        lists.insert(*line, endpoints);
    }
    Ok(lists)
}
