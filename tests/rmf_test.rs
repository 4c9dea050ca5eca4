use chrono::NaiveDate;
use httpmock::prelude::*;
use secfund::commands::{RmfOptions, run_nav, run_rmf};
use secfund::{Client, ClientConfig};
use serde_json::{Value, json};
use std::time::Duration;
use tempfile::TempDir;

fn client_for(server: &MockServer) -> Client {
    Client::with_config(ClientConfig {
        url: server.base_url(),
        factsheet_key: "factsheet-key".to_string(),
        daily_info_key: Some("daily-key".to_string()),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn now() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt(15, 9, 26)
        .unwrap()
}

fn amc_fixture() -> Value {
    json!([
        {"unique_id": "C0000000021", "name_th": "กสิกรไทย", "name_en": "KASIKORN ASSET MANAGEMENT"},
        {"unique_id": "C0000000239", "name_th": "ไทยพาณิชย์", "name_en": "SCB ASSET MANAGEMENT CO., LTD."}
    ])
}

fn fund_fixture() -> Value {
    json!([
        {"proj_id": "M0001", "proj_abbr_name": "SCBSET", "proj_name_en": "SCB SET INDEX", "fund_status": "RG", "cancel_date": "-", "regis_date": "2000-01-01"},
        {"proj_id": "M0002", "proj_abbr_name": "SCBRMS50", "proj_name_en": "SCB RETIREMENT SET50", "proj_name_th": null, "fund_status": "RG", "cancel_date": "-", "regis_date": 20050101, "unique_id": "C0000000239"},
        {"proj_id": "M0003", "proj_abbr_name": "SCBRM1", "proj_name_en": "SCB Money Market RMF", "fund_status": "CA", "cancel_date": "2019-12-31", "regis_date": "2003-01-01"},
        {"proj_id": "M0004", "proj_abbr_name": "SCBRMGOLD", "proj_name_en": "SCB GOLD", "fund_status": "RG", "cancel_date": "-", "regis_date": "2010-01-01"}
    ])
}

fn mock_amcs(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/FundFactsheet/fund/amc");
        then.status(200).json_body(amc_fixture());
    });
}

fn mock_funds(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/FundFactsheet/fund/amc/C0000000239");
        then.status(200).json_body(fund_fixture());
    });
}

fn options(dir: &TempDir) -> RmfOptions {
    RmfOptions {
        amc: "scb".to_string(),
        lookup: Some("SCBM3".to_string()),
        output: dir.path().join("scb_rmf_funds.json"),
        export_dir: Some(dir.path().to_path_buf()),
        strict: false,
    }
}

fn abbrs(funds: &[secfund::funds::Fund]) -> Vec<String> {
    funds.iter().map(|f| f.proj_abbr_name().into_owned()).collect()
}

#[test]
fn finds_active_rmf_funds_and_writes_outputs() {
    let server = MockServer::start();
    mock_amcs(&server);
    mock_funds(&server);
    let assets = server.mock(|when, then| {
        when.method(GET).path("/FundFactsheet/fund/M0002/asset");
        then.status(200).json_body(json!([
            {"asset_seq": 1, "asset_name": "Equity", "asset_ratio": 97.2},
            {"asset_seq": 2, "asset_name": "Cash", "asset_ratio": 2.8}
        ]));
    });

    let dir = TempDir::new().unwrap();
    let opts = options(&dir);
    let outcome = run_rmf(&client_for(&server), &opts, now()).unwrap();

    assets.assert();
    assert!(outcome.completed());
    assert_eq!(outcome.total_funds, 4);
    let results = outcome.results.as_ref().unwrap();
    assert_eq!(results.amc.unique_id(), "C0000000239");
    assert_eq!(abbrs(&results.all_rmf_funds), vec!["SCBRMS50", "SCBRM1"]);
    assert_eq!(abbrs(&results.active_rmf_funds), vec!["SCBRMS50"]);
    assert!(outcome.lookup.is_none());
    assert!(outcome.warnings.is_empty());

    let written: Value = serde_json::from_slice(&std::fs::read(&opts.output).unwrap()).unwrap();
    let keys: Vec<&str> = written.as_object().unwrap().keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["amc", "active_rmf_funds", "all_rmf_funds"]);
    assert_eq!(written["all_rmf_funds"][1]["cancel_date"], "2019-12-31");

    let export = outcome.export.unwrap();
    assert_eq!(export, dir.path().join("scb_rmf_funds_20250314_150926.csv"));
    let csv = std::fs::read_to_string(export).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert_eq!(
        csv.lines().nth(1).unwrap(),
        "M0002,SCBRMS50,SCB RETIREMENT SET50,,RG,20050101,-"
    );
}

#[test]
fn written_records_match_the_api_response_exactly() {
    let server = MockServer::start();
    mock_amcs(&server);
    mock_funds(&server);

    let dir = TempDir::new().unwrap();
    let mut opts = options(&dir);
    opts.export_dir = None;
    run_rmf(&client_for(&server), &opts, now()).unwrap();

    let text = std::fs::read_to_string(&opts.output).unwrap();
    let written: Value = serde_json::from_str(&text).unwrap();
    let funds = fund_fixture();

    assert_eq!(written["amc"], amc_fixture()[1]);
    assert_eq!(written["active_rmf_funds"], json!([funds[1]]));
    assert_eq!(written["all_rmf_funds"], json!([funds[1], funds[2]]));

    // Field order, nulls and numbers survive as sent.
    let record = serde_json::to_string_pretty(&funds[1]).unwrap();
    let indented: String = record.lines().map(|l| format!("    {}\n", l)).collect();
    assert!(text.contains(indented.trim()));
}

#[test]
fn asset_failure_only_warns_unless_strict() {
    let server = MockServer::start();
    mock_amcs(&server);
    mock_funds(&server);

    let dir = TempDir::new().unwrap();
    let mut opts = options(&dir);
    opts.export_dir = None;
    opts.lookup = Some("SCBSET".to_string());

    let outcome = run_rmf(&client_for(&server), &opts, now()).unwrap();
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.export.is_none());
    assert_eq!(outcome.lookup.unwrap().proj_id(), "M0001");

    opts.strict = true;
    let err = run_rmf(&client_for(&server), &opts, now()).unwrap_err();
    assert!(err.to_string().contains("asset allocation of M0002"));
}

#[test]
fn unknown_amc_stops_before_listing_funds() {
    let server = MockServer::start();
    mock_amcs(&server);
    let funds = server.mock(|when, then| {
        when.method(GET).path_contains("/FundFactsheet/fund/amc/");
        then.status(200).json_body(json!([]));
    });

    let dir = TempDir::new().unwrap();
    let mut opts = options(&dir);
    opts.amc = "UOB".to_string();

    let outcome = run_rmf(&client_for(&server), &opts, now()).unwrap();
    assert!(!outcome.completed());
    assert!(outcome.results.is_none());
    assert!(outcome.stopped.unwrap().contains("UOB"));
    assert_eq!(funds.hits(), 0);
    assert!(!opts.output.exists());

    opts.strict = true;
    let err = run_rmf(&client_for(&server), &opts, now()).unwrap_err();
    assert!(err.to_string().contains("UOB"));
}

#[test]
fn rejected_key_stops_the_flow_and_errors_only_when_strict() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/FundFactsheet/fund/amc");
        then.status(401)
            .json_body(json!({"statusCode": 401, "message": "Access denied due to invalid subscription key."}));
    });

    let dir = TempDir::new().unwrap();
    let mut opts = options(&dir);

    let outcome = run_rmf(&client_for(&server), &opts, now()).unwrap();
    let reason = outcome.stopped.unwrap();
    assert!(reason.contains("failed to fetch AMC list"));
    assert!(reason.contains("HTTP 401"));
    assert!(!opts.output.exists());

    opts.strict = true;
    let err = run_rmf(&client_for(&server), &opts, now()).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("failed to fetch AMC list"));
    assert!(msg.contains("HTTP 401"));
}

#[test]
fn missing_fund_list_stops_the_flow_without_strict() {
    let server = MockServer::start();
    mock_amcs(&server);
    server.mock(|when, then| {
        when.method(GET).path("/FundFactsheet/fund/amc/C0000000239");
        then.status(404).body(r#"{"error":"not found"}"#);
    });

    let dir = TempDir::new().unwrap();
    let outcome = run_rmf(&client_for(&server), &options(&dir), now()).unwrap();
    assert!(outcome.stopped.unwrap().contains("failed to fetch funds of C0000000239"));
    assert_eq!(outcome.total_funds, 0);
}

#[test]
fn nav_failures_are_reported_and_errors_only_when_strict() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/FundDailyInfo/M0001/dailynav/2025-03-13");
        then.status(404).body(r#"{"error":"not found"}"#);
    });
    server.mock(|when, then| {
        when.method(GET).path("/FundDailyInfo/M0001/dailynav/2025-03-12");
        then.status(401).json_body(json!({"statusCode": 401, "message": "Access denied"}));
    });

    let client = client_for(&server);
    assert!(run_nav(&client, "M0001", "2025-03-13", false).unwrap().is_none());
    assert!(run_nav(&client, "M0001", "2025-03-12", false).unwrap().is_none());

    let err = run_nav(&client, "M0001", "2025-03-13", true).unwrap_err();
    assert!(format!("{:#}", err).contains("HTTP 404"));
}
