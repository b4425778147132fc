use crate::{
    core::{
        credentials::Credentials,
        error::{Error, Result},
        xml::{XmlMap, XmlValue},
    },
    services::query::{DateFilter, document},
};

/// A seller offer for `offers_update`.
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    /// Product reference, such as an EAN.
    pub product_reference: String,
    /// Seller reference, such as a SKU.
    pub offer_reference: String,
    pub price: f64,
    pub product_state: u8,
    pub quantity: u32,
    pub description: Option<String>,
}

impl Offer {
    pub fn new(
        product_reference: impl Into<String>,
        offer_reference: impl Into<String>,
        price: f64,
        product_state: u8,
        quantity: u32,
    ) -> Self {
        Self {
            product_reference: product_reference.into(),
            offer_reference: offer_reference.into(),
            price,
            product_state,
            quantity,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn to_element(&self) -> XmlMap {
        let mut offer = XmlMap::new();
        offer.insert(
            "product_reference".to_string(),
            typed_reference("Ean", &self.product_reference),
        );
        offer.insert(
            "offer_reference".to_string(),
            typed_reference("SellerSku", &self.offer_reference),
        );
        offer.insert("price".to_string(), XmlValue::text(self.price.to_string()));
        offer.insert("product_state".to_string(), XmlValue::text(self.product_state.to_string()));
        offer.insert("quantity".to_string(), XmlValue::text(self.quantity.to_string()));
        if let Some(description) = &self.description {
            offer.insert("description".to_string(), XmlValue::text(description.as_str()));
        }
        offer
    }
}

fn typed_reference(kind: &str, reference: &str) -> XmlValue {
    let mut element = XmlMap::new();
    element.insert("@type".to_string(), XmlValue::text(kind));
    element.insert("#text".to_string(), XmlValue::text(reference));
    XmlValue::Map(element)
}

/// Fails with [`Error::EmptyRequest`] when `offers` is empty.
pub fn offers_update_request(credentials: &Credentials, offers: &[Offer]) -> Result<XmlMap> {
    if offers.is_empty() {
        return Err(Error::EmptyRequest { request: "offers_update", element: "offer" });
    }
    let mut root = credentials.request_root();
    let items = offers.iter().map(|offer| XmlValue::Map(offer.to_element())).collect();
    root.insert("offer".to_string(), XmlValue::from_items(items));
    Ok(document("offers_update", root))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffersQuery {
    pub paging: u32,
    pub results_count: u32,
    pub date: Option<DateFilter>,
}

impl Default for OffersQuery {
    fn default() -> Self {
        Self { paging: 1, results_count: 100, date: None }
    }
}

pub fn offers_query_request(credentials: &Credentials, query: &OffersQuery) -> XmlMap {
    let mut root = credentials.request_root();
    root.insert("@results_count".to_string(), XmlValue::text(query.results_count.to_string()));
    root.insert("paging".to_string(), XmlValue::text(query.paging.to_string()));
    if let Some(date) = &query.date {
        root.insert("date".to_string(), XmlValue::Map(date.to_element()));
    }
    document("offers_query", root)
}
