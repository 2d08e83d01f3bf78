//! Tests for request scoping

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;
use url::Url;

fn base() -> Url {
    Url::parse("https://management.example.com/").unwrap()
}

fn accounts() -> ResourceType {
    ResourceType::new("Microsoft.DataLakeAnalytics", "accounts")
}

fn full_identity() -> ResourceIdentity {
    ResourceIdentity::subscription("sub-1")
        .resource_group("rg-1")
        .account("acct1")
        .child("rule1")
}

// ============================================================================
// ResourceIdentity Tests
// ============================================================================

#[test]
fn test_identity_builder() {
    let id = full_identity();
    assert_eq!(id.subscription_id, "sub-1");
    assert_eq!(id.resource_group.as_deref(), Some("rg-1"));
    assert_eq!(id.account_name.as_deref(), Some("acct1"));
    assert_eq!(id.child_name.as_deref(), Some("rule1"));
}

#[test]
fn test_identity_require_full() {
    let id = full_identity();
    for scope in [
        Scope::Subscription,
        Scope::ResourceGroup,
        Scope::Account,
        Scope::Child,
    ] {
        assert!(id.require(scope).is_ok());
    }
}

#[test_case(ResourceIdentity::default(), Scope::Subscription, "subscription_id")]
#[test_case(ResourceIdentity::subscription("  "), Scope::Subscription, "subscription_id")]
#[test_case(ResourceIdentity::subscription("s"), Scope::ResourceGroup, "resource_group")]
#[test_case(ResourceIdentity::subscription("s").resource_group(""), Scope::ResourceGroup, "resource_group")]
#[test_case(ResourceIdentity::subscription("s").resource_group("g"), Scope::Account, "account_name")]
#[test_case(ResourceIdentity::subscription("s").resource_group("g").account("a"), Scope::Child, "child_name")]
fn test_identity_require_missing(id: ResourceIdentity, scope: Scope, expected: &str) {
    match id.require(scope) {
        Err(Error::InvalidArgument { parameter, .. }) => assert_eq!(parameter, expected),
        other => panic!("Expected InvalidArgument, got {other:?}"),
    }
}

#[test]
fn test_identity_shallow_scope_ignores_deeper_fields() {
    let id = ResourceIdentity::subscription("s");
    assert!(id.require(Scope::Subscription).is_ok());
}

// ============================================================================
// PathBuilder Tests
// ============================================================================

#[test]
fn test_subscription_collection_path() {
    let base = base();
    let kind = accounts();
    let url = PathBuilder::new(&base, &kind)
        .subscription_collection(&full_identity())
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://management.example.com/subscriptions/sub-1/providers/Microsoft.DataLakeAnalytics/accounts"
    );
}

#[test]
fn test_resource_paths() {
    let base = base();
    let kind = accounts();
    let paths = PathBuilder::new(&base, &kind);
    let id = full_identity();

    assert_eq!(
        paths.resource_group_collection(&id).unwrap().path(),
        "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.DataLakeAnalytics/accounts"
    );
    assert_eq!(
        paths.resource(&id).unwrap().path(),
        "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.DataLakeAnalytics/accounts/acct1"
    );
    assert_eq!(
        paths.child_collection(&id, "firewallRules").unwrap().path(),
        "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.DataLakeAnalytics/accounts/acct1/firewallRules"
    );
    assert_eq!(
        paths.child(&id, "firewallRules").unwrap().path(),
        "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.DataLakeAnalytics/accounts/acct1/firewallRules/rule1"
    );
    assert_eq!(
        paths
            .location_action(&id, "eastus2", "checkNameAvailability")
            .unwrap()
            .path(),
        "/subscriptions/sub-1/providers/Microsoft.DataLakeAnalytics/locations/eastus2/checkNameAvailability"
    );
}

#[test]
fn test_path_segments_are_encoded() {
    let base = base();
    let kind = accounts();
    let id = ResourceIdentity::subscription("sub-1")
        .resource_group("my group")
        .account("a/b");
    let url = PathBuilder::new(&base, &kind).resource(&id).unwrap();
    assert!(url.path().contains("/resourceGroups/my%20group/"));
    assert!(url.path().ends_with("/accounts/a%2Fb"));
}

#[test]
fn test_base_url_with_path_prefix() {
    let base = Url::parse("http://localhost:8080/arm/").unwrap();
    let kind = accounts();
    let url = PathBuilder::new(&base, &kind)
        .subscription_collection(&ResourceIdentity::subscription("s"))
        .unwrap();
    assert_eq!(
        url.path(),
        "/arm/subscriptions/s/providers/Microsoft.DataLakeAnalytics/accounts"
    );
}

#[test]
fn test_path_builder_rejects_missing_fields() {
    let base = base();
    let kind = accounts();
    let paths = PathBuilder::new(&base, &kind);
    let id = ResourceIdentity::subscription("s").resource_group("g");

    assert!(matches!(
        paths.resource(&id),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        paths.child_collection(&id.clone().account("a"), ""),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        paths.location_action(&id, " ", "checkNameAvailability"),
        Err(Error::InvalidArgument { .. })
    ));
}

// ============================================================================
// QueryOptions Tests
// ============================================================================

#[test]
fn test_query_options_default_is_empty() {
    let options = QueryOptions::new();
    assert!(options.is_empty());
    assert!(options.pairs().is_empty());

    let mut url = base();
    options.apply(&mut url);
    assert_eq!(url.query(), None);
}

#[test]
fn test_query_options_top_and_filter() {
    let options = QueryOptions::new().top(1).filter("name eq 'x'");
    assert_eq!(
        options.pairs(),
        vec![
            ("$filter", "name eq 'x'".to_string()),
            ("$top", "1".to_string()),
        ]
    );

    let mut url = base();
    options.apply(&mut url);
    let query = url.query().unwrap();
    assert!(query.contains("%24top=1"));
    assert!(query.contains("%24filter=name+eq+%27x%27"));
    assert!(!query.contains("skip"));
    assert!(!query.contains("select"));
    assert!(!query.contains("orderby"));
    assert!(!query.contains("count"));

    let decoded: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(decoded.contains(&("$filter".to_string(), "name eq 'x'".to_string())));
}

#[test]
fn test_query_options_all_fields() {
    let options = QueryOptions::new()
        .filter("a")
        .top(10)
        .skip(20)
        .select("name,id")
        .orderby("name desc")
        .count(true);
    let keys: Vec<&str> = options.pairs().iter().map(|(k, _)| *k).collect();
    assert_eq!(
        keys,
        vec!["$filter", "$top", "$skip", "$select", "$orderby", "$count"]
    );
    assert!(!options.is_empty());
}

#[test]
fn test_query_options_count_false_is_sent() {
    let options = QueryOptions::new().count(false);
    assert_eq!(options.pairs(), vec![("$count", "false".to_string())]);
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_validate_json_value() {
    assert!(json!({"location": "x"}).validate().is_ok());
    assert!(json!([1, 2]).validate().is_err());
    assert!(json!("str").validate().is_err());
}

#[test]
fn test_validate_tracked_resource() {
    let params = TrackedResourceParameters::new("eastus2")
        .tag("env", "dev")
        .properties(json!({"defaultDataLakeStoreAccount": "store1"}));
    assert!(params.validate().is_ok());

    let missing_location = TrackedResourceParameters::new("");
    match missing_location.validate() {
        Err(Error::InvalidArgument { parameter, .. }) => {
            assert_eq!(parameter, "parameters.location");
        }
        other => panic!("Expected InvalidArgument, got {other:?}"),
    }

    let bad_properties = TrackedResourceParameters::new("eastus2").properties(json!(42));
    assert!(bad_properties.validate().is_err());
}

#[test]
fn test_validate_tag_limits() {
    let mut params = TrackedResourceParameters::new("eastus2");
    for i in 0..51 {
        params = params.tag(format!("k{i}"), "v");
    }
    assert!(params.validate().is_err());

    let long_value = TrackedResourceParameters::new("eastus2").tag("k", "v".repeat(257));
    assert!(long_value.validate().is_err());
}

#[test]
fn test_tracked_resource_serialization_omits_unset() {
    let params = TrackedResourceParameters::new("eastus2");
    assert_eq!(
        serde_json::to_value(&params).unwrap(),
        json!({"location": "eastus2"})
    );
}

#[test]
fn test_validate_update_parameters() {
    assert!(UpdateParameters::default().validate().is_ok());
    let bad = UpdateParameters {
        tags: None,
        properties: Some(json!("nope")),
    };
    assert!(bad.validate().is_err());
}

#[test_case("acct1", true)]
#[test_case("my-account_2.prod", true)]
#[test_case("", false)]
#[test_case("has/slash", false)]
#[test_case("percent%", false)]
#[test_case(" leading", false)]
fn test_name_availability_validation(name: &str, ok: bool) {
    let params = NameAvailabilityParameters::new(name, "Microsoft.DataLakeAnalytics/accounts");
    assert_eq!(params.validate().is_ok(), ok);
}

#[test]
fn test_require_range() {
    assert!(require_range("top", 5, 1, 10).is_ok());
    assert!(require_range("top", 0, 1, 10).is_err());
    assert!(require_range("top", 11, 1, 10).is_err());
}

#[test]
fn test_optional_body_validation() {
    let none: Option<TrackedResourceParameters> = None;
    assert!(none.validate().is_ok());
    let some = Some(TrackedResourceParameters::new(""));
    assert!(some.validate().is_err());
}
