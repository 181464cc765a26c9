use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Top-level grouping the endpoint lists and dispatch rules are organised by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductLine {
    Spot,
    Futures,
    Coin,
    Options,
    Portfolio,
}

impl ProductLine {
    pub const ALL: [ProductLine; 5] = [
        ProductLine::Spot,
        ProductLine::Futures,
        ProductLine::Coin,
        ProductLine::Options,
        ProductLine::Portfolio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductLine::Spot => "spot",
            ProductLine::Futures => "futures",
            ProductLine::Coin => "coin",
            ProductLine::Options => "options",
            ProductLine::Portfolio => "portfolio",
        }
    }
}

impl fmt::Display for ProductLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductLine::ALL
            .into_iter()
            .find(|line| line.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown product line: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_upper(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upper())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            _ => Err(format!("unsupported http method: {s}")),
        }
    }
}

/// API namespace segment of an endpoint path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ApiFamily {
    #[serde(rename = "api")]
    Api,
    #[serde(rename = "sapi")]
    Sapi,
    #[serde(rename = "fapi")]
    Fapi,
    #[serde(rename = "futures/data")]
    FuturesData,
    #[serde(rename = "dapi")]
    Dapi,
    #[serde(rename = "eapi")]
    Eapi,
    #[serde(rename = "papi")]
    Papi,
}

impl ApiFamily {
    pub fn segment(&self) -> &'static str {
        match self {
            ApiFamily::Api => "api",
            ApiFamily::Sapi => "sapi",
            ApiFamily::Fapi => "fapi",
            ApiFamily::FuturesData => "futures/data",
            ApiFamily::Dapi => "dapi",
            ApiFamily::Eapi => "eapi",
            ApiFamily::Papi => "papi",
        }
    }

    /// The data family is the only one without a version segment.
    pub fn is_versioned(&self) -> bool {
        !matches!(self, ApiFamily::FuturesData)
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "api" => Some(ApiFamily::Api),
            "sapi" => Some(ApiFamily::Sapi),
            "fapi" => Some(ApiFamily::Fapi),
            "futures/data" => Some(ApiFamily::FuturesData),
            "dapi" => Some(ApiFamily::Dapi),
            "eapi" => Some(ApiFamily::Eapi),
            "papi" => Some(ApiFamily::Papi),
            _ => None,
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// Version path segment, `v1`, `v2` and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiVersion(pub u8);

impl ApiVersion {
    pub const V1: ApiVersion = ApiVersion(1);
    pub const V3: ApiVersion = ApiVersion(3);

    pub fn parse_segment(segment: &str) -> Option<Self> {
        let digits = segment.strip_prefix('v')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(ApiVersion)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Normalized view of one HTTP endpoint, shared by documented and implemented sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointRecord {
    pub endpoint: String,
    pub product_line: ProductLine,
    pub http_method: HttpMethod,
    pub api_family: ApiFamily,
    pub version: Option<ApiVersion>,
    pub path: String,
    pub method_name: String,
    pub call: String,
}

impl EndpointRecord {
    /// Rebuilds `METHOD /family/version/path` (or `METHOD /futures/data/path`).
    pub fn canonical_endpoint(
        method: HttpMethod,
        family: ApiFamily,
        version: Option<ApiVersion>,
        path: &str,
    ) -> String {
        match version {
            Some(version) => format!("{} /{}/{}/{}", method, family, version, path),
            None => format!("{} /{}/{}", method, family, path),
        }
    }
}
