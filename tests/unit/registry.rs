use assert_matches::assert_matches;
use fnac_mp::core::error::Error;
use fnac_mp::core::registry::{ApiService, KeyRegistry};
use fnac_mp::core::response::Response;
use fnac_mp::core::validation::KeyMismatch;

use crate::common::load_asset;

#[test]
fn test_api_service_names() {
    for service in ApiService::ALL {
        assert_eq!(service.as_str().parse::<ApiService>().unwrap(), service);
        assert_eq!(service.to_string(), service.as_str());
    }
    assert_eq!(ApiService::OffersUpdate.as_str(), "offers_update");
    assert_matches!("pricing_query".parse::<ApiService>(), Err(Error::UnknownService(name)) if name == "pricing_query");
}

#[test]
fn test_api_service_from_response_tag() {
    assert_eq!(
        ApiService::from_response_tag("batch_status_response").unwrap(),
        ApiService::BatchStatus
    );
    assert_eq!(ApiService::MessagesQuery.response_tag(), "messages_query_response");
    assert_matches!(ApiService::from_response_tag("error"), Err(Error::UnknownService(_)));
}

#[test]
fn test_every_service_has_keys() {
    let registry = KeyRegistry::new();
    for service in ApiService::ALL {
        assert!(registry.keys(service).contains(&"error"), "{service} should allow <error>");
    }
    assert!(registry.keys(ApiService::OrdersQuery).contains(&"order"));
    assert!(registry.keys(ApiService::Auth).contains(&"token"));
}

#[test]
fn test_registry_accepts_known_responses() {
    let registry = KeyRegistry::default();
    for asset in [
        "auth_response.xml",
        "auth_error_response.xml",
        "query_messages_response.xml",
        "update_messages_response.xml",
        "update_offers_response.xml",
        "query_orders_response.xml",
        "query_batch_status_response.xml",
    ] {
        let response = Response::new(load_asset(asset)).unwrap();
        assert!(registry.validate(&response).is_ok(), "{asset} should validate");
    }
}

#[test]
fn test_registry_reports_unexpected_keys() {
    let registry = KeyRegistry::new();
    let response = Response::new(load_asset("query_offers_response.xml")).unwrap();

    let err = registry.validate(&response).unwrap_err();
    assert_matches!(&err, Error::SchemaMismatch(KeyMismatch::InvalidKeys(keys)) if keys.len() == 1 && keys.contains("unexpected_field"));
    assert_eq!(err.to_string(), "schema mismatch: invalid keys: unexpected_field");
}

#[test]
fn test_registry_rejects_unknown_tag() {
    let registry = KeyRegistry::new();
    let response = Response::new("<pricing_response><price>1</price></pricing_response>").unwrap();
    assert_matches!(registry.validate(&response), Err(Error::UnknownService(_)));
}
