use assert_matches::assert_matches;
use fnac_mp::core::credentials::Credentials;
use fnac_mp::core::error::Error;
use fnac_mp::core::response::Response;
use fnac_mp::core::xml::{XmlValue, dict_to_xml, xml_to_dict};
use fnac_mp::services::orders::{
    DetailAction, OrderAction, OrderDetailUpdate, OrderState, OrderUpdate, OrdersQuery, order_ids,
    orders_query_request, orders_update_request,
};

use crate::common::load_asset;

#[test]
fn test_order_ids_from_several_orders() {
    let response = Response::new(load_asset("query_orders_response.xml")).unwrap();
    assert_eq!(order_ids(&response), ["1AEFEF2EA2C7", "2BF0F03FB3D8"]);
}

#[test]
fn test_order_ids_from_single_order() {
    let response = Response::new(
        r#"<orders_query_response status="OK"><order><order_id>1AEFEF2EA2C7</order_id></order></orders_query_response>"#,
    )
    .unwrap();
    assert_eq!(order_ids(&response), ["1AEFEF2EA2C7"]);
}

#[test]
fn test_order_ids_without_orders() {
    let response =
        Response::new(r#"<orders_query_response status="OK"><page>1</page></orders_query_response>"#)
            .unwrap();
    assert!(order_ids(&response).is_empty());
}

#[test]
fn test_order_state_parsing() {
    assert_eq!("ToShip".parse::<OrderState>().unwrap(), OrderState::ToShip);
    assert_matches!("Lost".parse::<OrderState>(), Err(e) if e.field == "order state");
}

#[test]
fn test_orders_query_request_with_states() {
    let credentials = Credentials::new("P", "S", "T");
    let query = OrdersQuery {
        states: vec![OrderState::Created, OrderState::Accepted],
        ..Default::default()
    };
    let parsed = xml_to_dict(&dict_to_xml(&orders_query_request(&credentials, &query)).unwrap()).unwrap();
    let root = parsed["orders_query"].as_map().unwrap();

    assert_eq!(root["paging"], XmlValue::text("1"));
    let states = root["states"].as_map().unwrap()["state"].as_list().unwrap();
    assert_eq!(states, [XmlValue::text("Created"), XmlValue::text("Accepted")]);
}

#[test]
fn test_orders_update_request() {
    let credentials = Credentials::new("P", "S", "T");
    let update = OrderUpdate::new("1AEFEF2EA2C7", OrderAction::ConfirmToSend).with_detail(
        OrderDetailUpdate::new(1, DetailAction::Shipped).with_tracking("6A12345678901", "Colissimo"),
    );
    let request = orders_update_request(&credentials, &[update]).unwrap();
    let order = request["orders_update"].as_map().unwrap()["order"].as_map().unwrap();

    assert_eq!(order["@order_id"], XmlValue::text("1AEFEF2EA2C7"));
    assert_eq!(order["@action"], XmlValue::text("confirm_to_send"));
    let detail = order["order_detail"].as_map().unwrap();
    assert_eq!(detail["order_detail_id"], XmlValue::text("1"));
    assert_eq!(detail["action"], XmlValue::text("Shipped"));
    assert_eq!(detail["tracking_company"], XmlValue::text("Colissimo"));
}

#[test]
fn test_orders_update_all_omits_detail_id() {
    let credentials = Credentials::new("P", "S", "T");
    let update = OrderUpdate::new("1AEFEF2EA2C7", OrderAction::AcceptAllOrders)
        .with_detail(OrderDetailUpdate::all(DetailAction::Accepted));
    let request = orders_update_request(&credentials, &[update]).unwrap();
    let order = request["orders_update"].as_map().unwrap()["order"].as_map().unwrap();

    assert!(!order["order_detail"].as_map().unwrap().contains_key("order_detail_id"));
}

#[test]
fn test_orders_update_request_rejects_empty_input() {
    let credentials = Credentials::new("P", "S", "T");

    assert_matches!(
        orders_update_request(&credentials, &[]),
        Err(Error::EmptyRequest { request: "orders_update", element: "order" })
    );
    let without_detail = OrderUpdate::new("1AEFEF2EA2C7", OrderAction::AcceptOrder);
    assert_matches!(
        orders_update_request(&credentials, &[without_detail]),
        Err(Error::EmptyRequest { element: "order_detail", .. })
    );
}
