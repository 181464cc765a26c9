use regex::Regex;
use tracing::{debug, trace};

use crate::codegen::parser::{call_expression, method_name};
use crate::codegen::rules::{DispatchFunction, DispatchKind, DispatchRules};
use crate::error::Result;
use crate::models::{ApiFamily, ApiVersion, EndpointRecord, EndpointsByLine, HttpMethod};

/// One `self._something("...", ...)` call found in the client source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCall {
    pub function: String,
    pub positional: Vec<String>,
    pub keywords: Vec<(String, String)>,
}

impl ClientCall {
    pub fn keyword(&self, name: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn from_parts(function: &str, args: &str) -> Self {
        let mut positional = Vec::new();
        let mut keywords = Vec::new();
        for arg in args.split(',').filter(|a| !a.is_empty()) {
            let arg = arg.replace(['"', '\''], "");
            match arg.split_once('=') {
                Some((key, value)) if is_identifier(key) => {
                    keywords.push((key.to_string(), value.to_string()))
                }
                _ => positional.push(arg),
            }
        }
        Self {
            function: function.to_string(),
            positional,
            keywords,
        }
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Default)]
pub struct CallScan {
    pub calls: Vec<ClientCall>,
    /// Calls whose function is not a known dispatch function.
    pub ignored: usize,
}

/// Finds dispatch calls in client source text.
pub struct CallExtractor {
    pattern: Regex,
}

impl CallExtractor {
    pub fn new() -> Result<Self> {
        // Whitespace is removed before matching, so the pattern has none either.
        let pattern = Regex::new(r#"self\.(_\w+)\((["'][^)]*)\)"#)?;
        Ok(Self { pattern })
    }

    pub fn scan(&self, source: &str, rules: &DispatchRules) -> CallScan {
        let compact: String = source.chars().filter(|c| !c.is_whitespace()).collect();
        let mut scan = CallScan::default();

        for captures in self.pattern.captures_iter(&compact) {
            let function = &captures[1];
            if rules.function(function).is_none() {
                trace!(function, "ignoring call to unknown dispatch function");
                scan.ignored += 1;
                continue;
            }
            scan.calls.push(ClientCall::from_parts(function, &captures[2]));
        }

        scan
    }

    /// Implemented endpoints grouped by product line. Repeated calls collapse.
    pub fn implemented_endpoints(&self, source: &str, rules: &DispatchRules) -> EndpointsByLine {
        let scan = self.scan(source, rules);
        debug!(
            calls = scan.calls.len(),
            ignored = scan.ignored,
            "scanned client source"
        );

        let mut by_line = EndpointsByLine::new();
        for call in &scan.calls {
            match reverse_parse(call, rules) {
                Some(record) => {
                    by_line
                        .entry(record.product_line)
                        .or_default()
                        .entry(record.endpoint.clone())
                        .or_insert(record);
                }
                None => debug!(
                    function = %call.function,
                    args = ?call.positional,
                    "could not recover endpoint from call"
                ),
            }
        }
        by_line
    }
}

/// Recovers the endpoint a dispatch call sends to from its literal arguments.
pub fn reverse_parse(call: &ClientCall, rules: &DispatchRules) -> Option<EndpointRecord> {
    let function = rules.function(&call.function)?;

    let (method, path) = match function.kind {
        DispatchKind::Verb(method) => (method, call.positional.first()?),
        DispatchKind::Family => {
            let method: HttpMethod = call.positional.first()?.parse().ok()?;
            (method, call.positional.get(1)?)
        }
    };
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return None;
    }

    let version = resolve_version(call, function, rules);
    let route = rules.route(function.product_line, function.family)?;

    Some(EndpointRecord {
        endpoint: EndpointRecord::canonical_endpoint(method, function.family, version, path),
        product_line: function.product_line,
        http_method: method,
        api_family: function.family,
        version,
        path: path.to_string(),
        method_name: method_name(route, method, path),
        call: call_expression(route, method, version, path, rules),
    })
}

fn resolve_version(
    call: &ClientCall,
    function: &DispatchFunction,
    rules: &DispatchRules,
) -> Option<ApiVersion> {
    if !function.family.is_versioned() {
        return None;
    }

    let symbol = call.keyword("version").or_else(|| {
        if call.positional.len() > 3 && function.family != ApiFamily::Api {
            call.positional.get(3).map(String::as_str)
        } else {
            None
        }
    });

    Some(
        symbol
            .and_then(|s| rules.resolve_version_symbol(s))
            .unwrap_or(ApiVersion::V1),
    )
}
