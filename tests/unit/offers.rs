use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use fnac_mp::core::error::Error;
use fnac_mp::core::credentials::Credentials;
use fnac_mp::core::validation::validate_request_xml;
use fnac_mp::core::xml::{XmlValue, to_xml_document};
use fnac_mp::services::offers::{Offer, OffersQuery, offers_query_request, offers_update_request};
use fnac_mp::services::query::{DateFilter, DateType};

use crate::common::load_asset;

fn sample_offers() -> Vec<Offer> {
    vec![
        Offer::new("0711719247159", "B76A-CD5-153", 15.0, 11, 10)
            .with_description("New product - 2-3 days shipping, from France"),
        Offer::new("5051889022091", "561C-385-9BE", 10.55, 11, 16)
            .with_description("New product - Blu-ray disc - 2-3 days shipping, from France"),
    ]
}

#[test]
fn test_offer_element_shape() {
    let element = Offer::new("0711719247159", "B76A-CD5-153", 15.0, 11, 10).to_element();

    let product_reference = element["product_reference"].as_map().unwrap();
    assert_eq!(product_reference["@type"], XmlValue::text("Ean"));
    assert_eq!(product_reference["#text"], XmlValue::text("0711719247159"));
    assert_eq!(element["offer_reference"].as_map().unwrap()["@type"], XmlValue::text("SellerSku"));
    assert_eq!(element["price"], XmlValue::text("15"));
    assert_eq!(element["product_state"], XmlValue::text("11"));
    assert_eq!(element["quantity"], XmlValue::text("10"));
    assert!(!element.contains_key("description"));
}

#[test]
fn test_offers_update_request_matches_fixture() {
    let credentials = Credentials::new("P", "S", "T");
    let request = to_xml_document(&offers_update_request(&credentials, &sample_offers()).unwrap()).unwrap();

    validate_request_xml(&request, &load_asset("update_offers_request.xml")).unwrap();
}

#[test]
fn test_offers_update_request_detects_changed_price() {
    let credentials = Credentials::new("P", "S", "T");
    let mut offers = sample_offers();
    offers[1].price = 12.0;
    let request = to_xml_document(&offers_update_request(&credentials, &offers).unwrap()).unwrap();

    assert!(validate_request_xml(&request, &load_asset("update_offers_request.xml")).is_err());
}

#[test]
fn test_offers_update_request_rejects_empty_input() {
    let credentials = Credentials::new("P", "S", "T");
    assert_matches!(
        offers_update_request(&credentials, &[]),
        Err(Error::EmptyRequest { request: "offers_update", element: "offer" })
    );
}

#[test]
fn test_offers_query_request_with_date_filter() {
    let credentials = Credentials::new("P", "S", "T");
    let query = OffersQuery {
        paging: 2,
        results_count: 50,
        date: Some(DateFilter {
            kind: DateType::UpdatedAt,
            min: Some(Utc.with_ymd_and_hms(2016, 8, 24, 0, 0, 0).unwrap()),
            max: None,
        }),
    };
    let request = offers_query_request(&credentials, &query);
    let root = request["offers_query"].as_map().unwrap();

    assert_eq!(root["@results_count"], XmlValue::text("50"));
    assert_eq!(root["paging"], XmlValue::text("2"));
    let date = root["date"].as_map().unwrap();
    assert_eq!(date["@type"], XmlValue::text("UpdatedAt"));
    assert_eq!(date["min"], XmlValue::text("2016-08-24T00:00:00+00:00"));
    assert!(!date.contains_key("max"));
}
