use std::fs;
use std::path::Path;

use tempfile::tempdir;

use endpoint_codegen::codegen::{CodegenPipeline, GenerateOptions, StubFlavor, format_summary};
use endpoint_codegen::config::CodegenConfig;
use endpoint_codegen::error::CodegenError;
use endpoint_codegen::models::ProductLine;

const CLIENT: &str = r#"
class Client(BaseClient):
    def get_account(self, **params):
        return self._get("account", True, version=self.PRIVATE_API_VERSION, data=params)

    def ping(self):
        return self._get("ping", version=self.PRIVATE_API_VERSION)

    def get_margin_asset(self, **params):
        return self._request_margin_api(
            "get", "margin/asset", data=params
        )

    def futures_create_order(self, **params):
        return self._request_futures_api("post", "order", True, data=params)

    def futures_open_interest_hist(self, **params):
        return self._request_futures_data_api("get", "openInterestHist", data=params)

    def website_status(self):
        return self._request_website("get", "status")
"#;

fn config_for(dir: &Path) -> CodegenConfig {
    let mut config = CodegenConfig::from_lookup(|_| None).unwrap();
    config.set_utils_dir(dir.join("utils"));
    config.client_file = dir.join("binance/client.py");
    config.output_file = dir.join("utils/missing_endponts.txt");
    config
}

fn write_fixture(dir: &Path, lists: &[(ProductLine, &str)]) {
    fs::create_dir_all(dir.join("utils")).unwrap();
    fs::create_dir_all(dir.join("binance")).unwrap();
    fs::write(dir.join("binance/client.py"), CLIENT).unwrap();
    for line in ProductLine::ALL {
        let contents = lists
            .iter()
            .find(|(l, _)| *l == line)
            .map(|(_, c)| *c)
            .unwrap_or("");
        fs::write(dir.join(format!("utils/{line}_endpoints_list.txt")), contents).unwrap();
    }
}

#[tokio::test]
async fn writes_stubs_for_documented_endpoints_missing_in_client() {
    let tmp = tempdir().unwrap();
    write_fixture(
        tmp.path(),
        &[
            (
                ProductLine::Spot,
                "GET /api/v3/account\nGET /api/v3/ping\nGET /api/v3/time\nGET /sapi/v1/margin/asset\n",
            ),
            (
                ProductLine::Futures,
                "POST /fapi/v1/order\nGET /fapi/v2/balance\nGET /futures/data/openInterestHist\n",
            ),
        ],
    );

    let report_path = tmp.path().join("report.json");
    let pipeline = CodegenPipeline::new(config_for(tmp.path())).unwrap();
    let summary = pipeline
        .run(&GenerateOptions {
            report: Some(report_path.clone()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(summary.stubs_written, 2);
    let spot = &summary.diff.lines[&ProductLine::Spot];
    assert_eq!(spot.missing_in_implementation[0].endpoint, "GET /api/v3/time");
    assert!(spot.missing_in_docs.is_empty());

    let output = fs::read_to_string(tmp.path().join("utils/missing_endponts.txt")).unwrap();
    assert!(output.contains("# spot ====================\n\n    def time(self, **params):"));
    assert!(output.contains("return self._get(\"time\", version=self.PRIVATE_API_VERSION, data=params)"));
    assert!(output.contains("    def futures_get_balance(self, **params):\n        \"\"\"\n        GET /fapi/v2/balance\n"));
    assert!(output.contains("# portfolio ====================\n\n"));
    assert!(!output.contains("def account("));

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
    assert_eq!(report["stubs_written"], 2);
    assert_eq!(report["diff"]["policy"], "method+path+family");
    assert_eq!(
        report["diff"]["lines"]["futures"]["missing_in_implementation"][0]["method_name"],
        "futures_get_balance"
    );
    assert!(report["generated_at"].is_string());
}

#[tokio::test]
async fn regenerates_lists_without_deprecated_endpoints() {
    let tmp = tempdir().unwrap();
    write_fixture(tmp.path(), &[]);
    for line in ProductLine::ALL {
        fs::write(tmp.path().join(format!("utils/{line}_docs.txt")), "").unwrap();
    }
    fs::write(
        tmp.path().join("utils/spot_docs.txt"),
        "Account information (USER_DATA)\nGET /api/v3/account\n\
         New OCO - Deprecated\nPOST /api/v3/order/oco\n\
         Query account again\nGET /api/v3/account\nGET /api/v3/rateLimit/order\n",
    )
    .unwrap();

    let pipeline = CodegenPipeline::new(config_for(tmp.path())).unwrap();
    let summary = pipeline
        .run(&GenerateOptions {
            regenerate: true,
            write_lists: true,
            ..Default::default()
        })
        .await
        .unwrap();

    let list = fs::read_to_string(tmp.path().join("utils/spot_endpoints_list.txt")).unwrap();
    assert_eq!(list, "GET /api/v3/account\nGET /api/v3/rateLimit/order");
    assert!(!list.contains("order/oco"));

    let spot = &summary.diff.lines[&ProductLine::Spot];
    assert_eq!(spot.missing_in_implementation.len(), 1);
    assert_eq!(spot.missing_in_implementation[0].method_name, "rate_limit_order");
}

#[tokio::test]
async fn malformed_lines_abort_unless_skipped() {
    let tmp = tempdir().unwrap();
    write_fixture(tmp.path(), &[(ProductLine::Options, "GET /eapi/v1/mark\nGET /eapi/latest\n")]);

    let pipeline = CodegenPipeline::new(config_for(tmp.path())).unwrap();
    let err = pipeline.run(&GenerateOptions::default()).await.unwrap_err();
    assert!(matches!(err, CodegenError::MalformedEndpoint { ref endpoint, .. } if endpoint == "GET /eapi/latest"));

    let summary = pipeline
        .run(&GenerateOptions {
            skip_malformed: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(summary.diff.lines[&ProductLine::Options].missing_in_implementation.len(), 1);
}

#[tokio::test]
async fn missing_client_file_is_fatal() {
    let tmp = tempdir().unwrap();
    write_fixture(tmp.path(), &[]);
    fs::remove_file(tmp.path().join("binance/client.py")).unwrap();

    let pipeline = CodegenPipeline::new(config_for(tmp.path())).unwrap();
    let err = pipeline.run(&GenerateOptions::default()).await.unwrap_err();
    assert!(matches!(err, CodegenError::Io { .. }));
}

#[tokio::test]
async fn async_flavor_and_endpoint_reference() {
    let tmp = tempdir().unwrap();
    write_fixture(tmp.path(), &[(ProductLine::Coin, "GET /dapi/v1/ticker/price\nDELETE /dapi/v1/order\n")]);
    let reference = tmp.path().join("Endpoints.md");
    fs::write(&reference, "\t- **DELETE /dapi/v1/order**\n").unwrap();

    let mut config = config_for(tmp.path());
    config.flavor = StubFlavor::Async;
    let pipeline = CodegenPipeline::new(config).unwrap();
    let summary = pipeline
        .run(&GenerateOptions {
            endpoints_md: Some(reference.clone()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(summary.reference_entries_added, Some(1));
    let md = fs::read_to_string(&reference).unwrap();
    assert!(md.contains("client.futures_coin_get_ticker_price(**params)"));
    assert!(!md.contains("client.futures_coin_cancel_order"));

    let output = fs::read_to_string(tmp.path().join("utils/missing_endponts.txt")).unwrap();
    assert!(output.contains(
        "    async def futures_coin_cancel_order(self, **params):\n        return await self._request_futures_coin_api(\"delete\", \"order\", version=1, data=params)\n"
    ));
}

#[tokio::test]
async fn unrouted_family_is_dropped_without_aborting() {
    let tmp = tempdir().unwrap();
    write_fixture(
        tmp.path(),
        &[(
            ProductLine::Portfolio,
            "GET /papi/v1/balance\nGET /sapi/v1/portfolio/account\nGET /fapi/v1/time\n",
        )],
    );

    let pipeline = CodegenPipeline::new(config_for(tmp.path())).unwrap();
    let summary = pipeline.run(&GenerateOptions::default()).await.unwrap();

    let portfolio = &summary.diff.lines[&ProductLine::Portfolio];
    assert_eq!(portfolio.total_in_docs, 2);
    let missing: Vec<_> = portfolio
        .missing_in_implementation
        .iter()
        .map(|r| r.endpoint.as_str())
        .collect();
    assert_eq!(missing, vec!["GET /papi/v1/balance", "GET /fapi/v1/time"]);

    let output = fs::read_to_string(tmp.path().join("utils/missing_endponts.txt")).unwrap();
    assert!(!output.contains("portfolio/account"));
}

#[tokio::test]
async fn summary_lists_counts_per_line_and_total() {
    let tmp = tempdir().unwrap();
    write_fixture(
        tmp.path(),
        &[
            (ProductLine::Spot, "GET /api/v3/account\nGET /api/v3/time\n"),
            (ProductLine::Options, "GET /eapi/v1/mark\n"),
        ],
    );

    let pipeline = CodegenPipeline::new(config_for(tmp.path())).unwrap();
    let summary = pipeline.run(&GenerateOptions::default()).await.unwrap();
    let text = format_summary(&summary);

    assert!(text.starts_with(
        "spot\nmissing in docs: 2\nmissing in implementation: 1\ntotal in docs: 2\ntotal in implementation: 3\n"
    ));
    assert!(text.contains(
        "futures\nmissing in docs: 2\nmissing in implementation: 0\ntotal in docs: 0\ntotal in implementation: 2\n"
    ));
    assert!(text.contains(
        "options\nmissing in docs: 0\nmissing in implementation: 1\ntotal in docs: 1\ntotal in implementation: 0\n"
    ));
    assert!(text.contains("Total missing in implementation: 2\n"));
    assert!(!text.contains("endpoint reference"));
    assert!(text.ends_with("missing_endponts.txt file is generated\n"));
}
