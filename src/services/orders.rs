use crate::{
    core::{
        choice::choice_enum,
        credentials::Credentials,
        error::{Error, Result},
        response::Response,
        xml::{XmlMap, XmlValue},
    },
    services::query::{DateFilter, document},
};

choice_enum! {
    OrderState("order state") {
        Created => "Created",
        Accepted => "Accepted",
        Refused => "Refused",
        Update => "Update",
        ToShip => "ToShip",
        Shipped => "Shipped",
        NotReceived => "NotReceived",
        Received => "Received",
        Cancelled => "Cancelled",
        Refunded => "Refunded",
        Error => "Error",
    }
}

choice_enum! {
    /// Action applied to a whole order.
    OrderAction("order action") {
        AcceptOrder => "accept_order",
        ConfirmToSend => "confirm_to_send",
        Update => "update",
        AcceptAllOrders => "accept_all_orders",
        ConfirmAllToSend => "confirm_all_to_send",
        UpdateAll => "update_all",
    }
}

choice_enum! {
    /// Action applied to a single order line.
    DetailAction("order detail action") {
        Accepted => "Accepted",
        Refused => "Refused",
        Shipped => "Shipped",
        Updated => "Updated",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdersQuery {
    pub paging: u32,
    pub results_count: u32,
    pub states: Vec<OrderState>,
    pub date: Option<DateFilter>,
}

impl Default for OrdersQuery {
    fn default() -> Self {
        Self { paging: 1, results_count: 100, states: Vec::new(), date: None }
    }
}

pub fn orders_query_request(credentials: &Credentials, query: &OrdersQuery) -> XmlMap {
    let mut root = credentials.request_root();
    root.insert("@results_count".to_string(), XmlValue::text(query.results_count.to_string()));
    root.insert("paging".to_string(), XmlValue::text(query.paging.to_string()));
    if !query.states.is_empty() {
        let states = query.states.iter().map(|state| XmlValue::text(state.as_str())).collect();
        let mut wrapper = XmlMap::new();
        wrapper.insert("state".to_string(), XmlValue::from_items(states));
        root.insert("states".to_string(), XmlValue::Map(wrapper));
    }
    if let Some(date) = &query.date {
        root.insert("date".to_string(), XmlValue::Map(date.to_element()));
    }
    document("orders_query", root)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetailUpdate {
    /// Line number inside the order; omitted for `*_all` actions.
    pub order_detail_id: Option<u32>,
    pub action: DetailAction,
    pub tracking_number: Option<String>,
    pub tracking_company: Option<String>,
}

impl OrderDetailUpdate {
    pub fn new(order_detail_id: u32, action: DetailAction) -> Self {
        Self { order_detail_id: Some(order_detail_id), action, tracking_number: None, tracking_company: None }
    }

    pub fn all(action: DetailAction) -> Self {
        Self { order_detail_id: None, action, tracking_number: None, tracking_company: None }
    }

    pub fn with_tracking(mut self, number: impl Into<String>, company: impl Into<String>) -> Self {
        self.tracking_number = Some(number.into());
        self.tracking_company = Some(company.into());
        self
    }

    fn to_element(&self) -> XmlMap {
        let mut detail = XmlMap::new();
        if let Some(id) = self.order_detail_id {
            detail.insert("order_detail_id".to_string(), XmlValue::text(id.to_string()));
        }
        detail.insert("action".to_string(), XmlValue::text(self.action.as_str()));
        if let Some(number) = &self.tracking_number {
            detail.insert("tracking_number".to_string(), XmlValue::text(number.as_str()));
        }
        if let Some(company) = &self.tracking_company {
            detail.insert("tracking_company".to_string(), XmlValue::text(company.as_str()));
        }
        detail
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderUpdate {
    pub order_id: String,
    pub action: OrderAction,
    pub details: Vec<OrderDetailUpdate>,
}

impl OrderUpdate {
    pub fn new(order_id: impl Into<String>, action: OrderAction) -> Self {
        Self { order_id: order_id.into(), action, details: Vec::new() }
    }

    pub fn with_detail(mut self, detail: OrderDetailUpdate) -> Self {
        self.details.push(detail);
        self
    }

    pub fn to_element(&self) -> XmlMap {
        let mut order = XmlMap::new();
        order.insert("@order_id".to_string(), XmlValue::text(self.order_id.as_str()));
        order.insert("@action".to_string(), XmlValue::text(self.action.as_str()));
        let details =
            self.details.iter().map(|detail| XmlValue::Map(detail.to_element())).collect();
        order.insert("order_detail".to_string(), XmlValue::from_items(details));
        order
    }
}

/// Fails with [`Error::EmptyRequest`] when `orders` is empty or an order has no detail.
pub fn orders_update_request(credentials: &Credentials, orders: &[OrderUpdate]) -> Result<XmlMap> {
    if orders.is_empty() {
        return Err(Error::EmptyRequest { request: "orders_update", element: "order" });
    }
    if orders.iter().any(|order| order.details.is_empty()) {
        return Err(Error::EmptyRequest { request: "order", element: "order_detail" });
    }
    let mut root = credentials.request_root();
    let items = orders.iter().map(|order| XmlValue::Map(order.to_element())).collect();
    root.insert("order".to_string(), XmlValue::from_items(items));
    Ok(document("orders_update", root))
}

/// The `order_id` of every order in an `orders_query_response`, in document order.
pub fn order_ids(response: &Response) -> Vec<String> {
    let Some(orders) = response.root().and_then(|root| root.get("order")) else {
        return Vec::new();
    };
    orders
        .iter_items()
        .filter_map(XmlValue::as_map)
        .map(|order| {
            order.get("order_id").and_then(XmlValue::text_content).unwrap_or_default().to_string()
        })
        .collect()
}
