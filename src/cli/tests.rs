//! Tests for the CLI

use super::*;
use crate::error::Error;
use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cli(server: &MockServer, args: &[&str]) -> Cli {
    let uri = server.uri();
    let mut argv = vec![
        "resource-pager",
        "--base-url",
        uri.as_str(),
        "--namespace",
        "Microsoft.DataLakeAnalytics",
        "--type",
        "accounts",
        "--api-version",
        "2016-11-01",
        "-s",
        "sub",
    ];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

async fn run(cli: Cli) -> (crate::error::Result<()>, Vec<Value>) {
    let mut out = Vec::new();
    let result = Runner::new(cli).run_to(&mut out).await;
    let lines = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (result, lines)
}

// ============================================================================
// Argument Parsing Tests
// ============================================================================

#[test]
fn test_parse_list_with_query() {
    let cli = Cli::try_parse_from([
        "resource-pager",
        "list",
        "--filter",
        "name eq 'x'",
        "--top",
        "5",
        "--count",
        "--stream",
    ])
    .unwrap();

    match cli.command {
        Commands::List { query } => {
            assert!(query.stream);
            let options = query.to_query();
            assert_eq!(options.filter.as_deref(), Some("name eq 'x'"));
            assert_eq!(options.top, Some(5));
            assert_eq!(options.count, Some(true));
            assert_eq!(options.skip, None);
        }
        other => panic!("Expected List, got {other:?}"),
    }
}

#[test]
fn test_count_flag_absent_omits_count() {
    assert_eq!(QueryArgs::default().to_query().count, None);
}

#[test]
fn test_parse_create_tags() {
    let cli = Cli::try_parse_from([
        "resource-pager",
        "create",
        "acct",
        "--location",
        "eastus2",
        "--tag",
        "env=prod",
        "--tag",
        "team=data",
    ])
    .unwrap();
    match cli.command {
        Commands::Create { tags, no_wait, .. } => {
            assert_eq!(
                tags,
                vec![
                    ("env".to_string(), "prod".to_string()),
                    ("team".to_string(), "data".to_string())
                ]
            );
            assert!(!no_wait);
        }
        other => panic!("Expected Create, got {other:?}"),
    }
}

#[test_case(&["create", "acct", "--location", "x", "--tag", "novalue"] ; "tag without equals")]
#[test_case(&["get", "acct", "--child", "rule"] ; "child without type")]
#[test_case(&["list", "--top", "-1"] ; "negative top")]
fn test_parse_rejects(args: &[&str]) {
    let argv = std::iter::once("resource-pager").chain(args.iter().copied());
    assert!(Cli::try_parse_from(argv).is_err());
}

// ============================================================================
// Exit Code Tests
// ============================================================================

#[test]
fn test_exit_codes() {
    assert_eq!(exit_code(&Error::required("subscription_id")), 2);
    assert_eq!(exit_code(&Error::config("bad")), 2);
    assert_eq!(exit_code(&Error::fault(404, b"{}")), 3);
    assert_eq!(exit_code(&Error::malformed(200, "eof")), 4);
    assert_eq!(exit_code(&Error::PollingExhausted { attempts: 3 }), 1);
    assert_eq!(exit_code(&Error::Other("x".to_string())), 1);
}

// ============================================================================
// Runner Tests
// ============================================================================

#[tokio::test]
async fn test_list_prints_items_across_pages() {
    let server = MockServer::start().await;
    let next = format!("{}/page2", server.uri());

    Mock::given(method("GET"))
        .and(path(
            "/subscriptions/sub/providers/Microsoft.DataLakeAnalytics/accounts",
        ))
        .and(query_param("api-version", "2016-11-01"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"value": [{"name": "a"}], "nextLink": next})),
        )
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"value": [{"name": "b"}]})),
        )
        .expect(2)
        .mount(&server)
        .await;

    for extra in [&["list"][..], &["list", "--stream"][..]] {
        let (result, lines) = run(cli(&server, extra)).await;
        result.unwrap();
        assert_eq!(lines, vec![json!({"name": "a"}), json!({"name": "b"})]);
    }
}

#[tokio::test]
async fn test_get_not_found_maps_to_fault() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.DataLakeAnalytics/accounts/missing",
        ))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
        .mount(&server)
        .await;

    let (result, lines) = run(cli(&server, &["-g", "rg", "get", "missing"])).await;
    let err = result.unwrap_err();
    assert_eq!(exit_code(&err), 3);
    assert!(lines.is_empty());
}

#[tokio::test]
async fn test_missing_resource_group_is_usage_error() {
    let server = MockServer::start().await;
    let (result, _) = run(cli(&server, &["get", "acct"])).await;
    let err = result.unwrap_err();
    assert_eq!(exit_code(&err), 2);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_no_wait_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(
            ResponseTemplate::new(202).insert_header("Location", "/operations/1"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (result, lines) = run(cli(&server, &["-g", "rg", "delete", "acct", "--no-wait"])).await;
    result.unwrap();
    assert_eq!(lines, vec![json!({"status": 202, "complete": false})]);
}

#[tokio::test]
async fn test_check_name_sends_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/subscriptions/sub/providers/Microsoft.DataLakeAnalytics/locations/eastus2/checkNameAvailability",
        ))
        .and(wiremock::matchers::body_json(json!({
            "name": "fresh",
            "type": "Microsoft.DataLakeAnalytics/accounts"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nameAvailable": true})))
        .mount(&server)
        .await;

    let (result, lines) = run(cli(&server, &["check-name", "fresh", "--location", "eastus2"])).await;
    result.unwrap();
    assert_eq!(lines, vec![json!({"nameAvailable": true})]);
}
