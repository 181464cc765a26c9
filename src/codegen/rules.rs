use crate::models::{ApiFamily, ApiVersion, HttpMethod, ProductLine};

/// How a dispatch function receives the HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    /// `_get`, `_post`, ... : the method is part of the function name.
    Verb(HttpMethod),
    /// `_request_*_api`: the method is the first positional argument.
    Family,
}

#[derive(Debug, Clone)]
pub struct DispatchFunction {
    pub name: &'static str,
    pub product_line: ProductLine,
    pub family: ApiFamily,
    pub kind: DispatchKind,
}

/// Where a documented (product line, family) pair is routed in the client.
#[derive(Debug, Clone)]
pub struct FamilyRoute {
    pub product_line: ProductLine,
    pub family: ApiFamily,
    pub name_prefix: &'static str,
    /// `None` means the generic verb functions are used.
    pub dispatch: Option<&'static str>,
}

/// Lookup tables shared by the parser, the call extractor and the stub writer.
/// Built once and passed around by reference.
#[derive(Debug, Clone)]
pub struct DispatchRules {
    routes: Vec<FamilyRoute>,
    functions: Vec<DispatchFunction>,
    version_symbols: Vec<(&'static str, ApiVersion)>,
    spot_version_constants: Vec<(ApiVersion, &'static str)>,
}

impl DispatchRules {
    pub fn binance() -> Self {
        let route = |product_line, family, name_prefix, dispatch| FamilyRoute {
            product_line,
            family,
            name_prefix,
            dispatch,
        };
        let routes = vec![
            route(ProductLine::Spot, ApiFamily::Api, "", None),
            route(ProductLine::Spot, ApiFamily::Sapi, "margin", Some("_request_margin_api")),
            route(ProductLine::Futures, ApiFamily::Fapi, "futures", Some("_request_futures_api")),
            route(
                ProductLine::Futures,
                ApiFamily::FuturesData,
                "futures_data",
                Some("_request_futures_data_api"),
            ),
            route(ProductLine::Coin, ApiFamily::Dapi, "futures_coin", Some("_request_futures_coin_api")),
            route(
                ProductLine::Coin,
                ApiFamily::FuturesData,
                "futures_coin_data",
                Some("_request_futures_coin_data_api"),
            ),
            route(ProductLine::Options, ApiFamily::Eapi, "options", Some("_request_options_api")),
            route(ProductLine::Portfolio, ApiFamily::Papi, "portfolio", Some("_request_papi_api")),
            route(ProductLine::Portfolio, ApiFamily::Fapi, "futures", Some("_request_futures_api")),
        ];

        let function = |name, product_line, family, kind| DispatchFunction {
            name,
            product_line,
            family,
            kind,
        };
        let functions = vec![
            function("_get", ProductLine::Spot, ApiFamily::Api, DispatchKind::Verb(HttpMethod::Get)),
            function("_post", ProductLine::Spot, ApiFamily::Api, DispatchKind::Verb(HttpMethod::Post)),
            function("_put", ProductLine::Spot, ApiFamily::Api, DispatchKind::Verb(HttpMethod::Put)),
            function("_delete", ProductLine::Spot, ApiFamily::Api, DispatchKind::Verb(HttpMethod::Delete)),
            function("_request_margin_api", ProductLine::Spot, ApiFamily::Sapi, DispatchKind::Family),
            function("_request_futures_api", ProductLine::Futures, ApiFamily::Fapi, DispatchKind::Family),
            function(
                "_request_futures_data_api",
                ProductLine::Futures,
                ApiFamily::FuturesData,
                DispatchKind::Family,
            ),
            function("_request_futures_coin_api", ProductLine::Coin, ApiFamily::Dapi, DispatchKind::Family),
            function(
                "_request_futures_coin_data_api",
                ProductLine::Coin,
                ApiFamily::FuturesData,
                DispatchKind::Family,
            ),
            function("_request_options_api", ProductLine::Options, ApiFamily::Eapi, DispatchKind::Family),
            function("_request_papi_api", ProductLine::Portfolio, ApiFamily::Papi, DispatchKind::Family),
        ];

        Self {
            routes,
            functions,
            version_symbols: vec![
                ("1", ApiVersion(1)),
                ("2", ApiVersion(2)),
                ("3", ApiVersion(3)),
                ("4", ApiVersion(4)),
                ("PUBLIC_API_VERSION", ApiVersion::V1),
                ("PRIVATE_API_VERSION", ApiVersion::V3),
            ],
            spot_version_constants: vec![
                (ApiVersion::V1, "self.PUBLIC_API_VERSION"),
                (ApiVersion::V3, "self.PRIVATE_API_VERSION"),
            ],
        }
    }

    pub fn route(&self, product_line: ProductLine, family: ApiFamily) -> Option<&FamilyRoute> {
        self.routes
            .iter()
            .find(|r| r.product_line == product_line && r.family == family)
    }

    /// Route for a pair with no entry in the table: no name prefix, and the first
    /// dispatch function serving the family (generic verbs for `api`).
    pub fn unrouted(&self, product_line: ProductLine, family: ApiFamily) -> FamilyRoute {
        let dispatch = self
            .functions
            .iter()
            .find(|f| f.family == family && f.kind == DispatchKind::Family)
            .map(|f| f.name);
        FamilyRoute {
            product_line,
            family,
            name_prefix: "",
            dispatch,
        }
    }

    pub fn function(&self, name: &str) -> Option<&DispatchFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &DispatchFunction> {
        self.functions.iter()
    }

    /// The generic function a verb is sent through on the plain public family.
    pub fn verb_function(&self, method: HttpMethod) -> &'static str {
        match method {
            HttpMethod::Get => "_get",
            HttpMethod::Post => "_post",
            HttpMethod::Put => "_put",
            HttpMethod::Delete => "_delete",
        }
    }

    /// Resolves a `version=` argument (`2`, `PRIVATE_API_VERSION`, `self.PUBLIC_API_VERSION`).
    pub fn resolve_version_symbol(&self, symbol: &str) -> Option<ApiVersion> {
        let symbol = symbol.trim().trim_start_matches("self.");
        self.version_symbols
            .iter()
            .find(|(name, _)| *name == symbol)
            .map(|(_, version)| *version)
    }

    /// Source form of the version argument in a generated call.
    pub fn version_argument(&self, product_line: ProductLine, version: ApiVersion) -> String {
        if product_line == ProductLine::Spot {
            if let Some((_, constant)) = self
                .spot_version_constants
                .iter()
                .find(|(v, _)| *v == version)
            {
                return constant.to_string();
            }
        }
        version.0.to_string()
    }
}
