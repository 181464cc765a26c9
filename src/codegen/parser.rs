use crate::codegen::rules::{DispatchRules, FamilyRoute};
use crate::error::{CodegenError, Result};
use crate::models::{ApiFamily, ApiVersion, EndpointRecord, HttpMethod, ProductLine};

const DATA_FAMILY_MARKER: &str = "futures/data";

/// Parses a documented `METHOD /family/version/path` line into a record.
pub fn parse_endpoint(
    raw: &str,
    product_line: ProductLine,
    rules: &DispatchRules,
) -> Result<EndpointRecord> {
    let mut tokens = raw.split_whitespace();
    let (method_token, endpoint) = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(method), Some(endpoint), None) => (method, endpoint),
        _ => return Err(CodegenError::malformed(raw, "expected 'METHOD /path'")),
    };

    let method: HttpMethod = method_token
        .parse()
        .map_err(|err: String| CodegenError::malformed(raw, err))?;

    if !endpoint.starts_with('/') {
        return Err(CodegenError::malformed(raw, "path must start with '/'"));
    }

    let (family, version, delimiter) = if endpoint.contains(DATA_FAMILY_MARKER) {
        (ApiFamily::FuturesData, None, "data/".to_string())
    } else {
        let mut segments = endpoint.split('/').skip(1);
        let family_segment = segments.next().unwrap_or_default();
        let version_segment = segments.next().unwrap_or_default();

        let family = ApiFamily::from_segment(family_segment).ok_or_else(|| {
            CodegenError::malformed(raw, format!("unknown api family '{family_segment}'"))
        })?;
        let version = ApiVersion::parse_segment(version_segment).ok_or_else(|| {
            CodegenError::malformed(raw, format!("invalid version segment '{version_segment}'"))
        })?;
        (family, Some(version), format!("{version_segment}/"))
    };

    let path = match endpoint.split_once(delimiter.as_str()) {
        Some((_, rest)) if !rest.is_empty() => rest,
        _ => return Err(CodegenError::malformed(raw, "missing path after family/version")),
    };

    // Pairs outside the routing table still parse; callers decide what to do with them.
    let route = rules
        .route(product_line, family)
        .cloned()
        .unwrap_or_else(|| rules.unrouted(product_line, family));

    Ok(EndpointRecord {
        endpoint: format!("{} {}", method, endpoint),
        product_line,
        http_method: method,
        api_family: family,
        version,
        path: path.to_string(),
        method_name: method_name(&route, method, path),
        call: call_expression(&route, method, version, path, rules),
    })
}

/// `-` and `/` become `_`, camelCase becomes snake_case.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 8);
    for c in path.chars() {
        match c {
            '-' | '/' => normalized.push('_'),
            c if c.is_ascii_uppercase() => {
                normalized.push('_');
                normalized.push(c.to_ascii_lowercase());
            }
            c => normalized.push(c),
        }
    }
    normalized
}

fn verb_prefix(method: HttpMethod, family: ApiFamily) -> &'static str {
    match (method, family) {
        (HttpMethod::Get, ApiFamily::Api) => "",
        (HttpMethod::Get, _) => "get_",
        (HttpMethod::Post, _) => "create_",
        (HttpMethod::Put, _) => "modify_",
        (HttpMethod::Delete, _) => "cancel_",
    }
}

pub fn method_name(route: &FamilyRoute, method: HttpMethod, path: &str) -> String {
    let mut name = String::new();
    if !route.name_prefix.is_empty() {
        name.push_str(route.name_prefix);
        name.push('_');
    }
    name.push_str(verb_prefix(method, route.family));
    name.push_str(&normalize_path(path));
    name
}

pub fn call_expression(
    route: &FamilyRoute,
    method: HttpMethod,
    version: Option<ApiVersion>,
    path: &str,
    rules: &DispatchRules,
) -> String {
    let version_arg = version
        .map(|v| format!(", version={}", rules.version_argument(route.product_line, v)))
        .unwrap_or_default();

    match route.dispatch {
        Some(function) => format!(
            "self.{}(\"{}\", \"{}\"{}, data=params)",
            function,
            method.as_lower(),
            path,
            version_arg
        ),
        None => format!(
            "self.{}(\"{}\"{}, data=params)",
            rules.verb_function(method),
            path,
            version_arg
        ),
    }
}
