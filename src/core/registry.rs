use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::core::{
    error::{Error, Result},
    response::Response,
    validation::validate_keys,
};

/// Marketplace API endpoints, named after the path segment they are posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiService {
    Auth,
    OffersUpdate,
    OffersQuery,
    OrdersQuery,
    OrdersUpdate,
    MessagesQuery,
    MessagesUpdate,
    BatchStatus,
}

impl ApiService {
    pub const ALL: [ApiService; 8] = [
        ApiService::Auth,
        ApiService::OffersUpdate,
        ApiService::OffersQuery,
        ApiService::OrdersQuery,
        ApiService::OrdersUpdate,
        ApiService::MessagesQuery,
        ApiService::MessagesUpdate,
        ApiService::BatchStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiService::Auth => "auth",
            ApiService::OffersUpdate => "offers_update",
            ApiService::OffersQuery => "offers_query",
            ApiService::OrdersQuery => "orders_query",
            ApiService::OrdersUpdate => "orders_update",
            ApiService::MessagesQuery => "messages_query",
            ApiService::MessagesUpdate => "messages_update",
            ApiService::BatchStatus => "batch_status",
        }
    }

    /// Root tag of the service's response document.
    pub fn response_tag(&self) -> String {
        format!("{}_response", self.as_str())
    }

    pub fn from_response_tag(tag: &str) -> Result<Self> {
        tag.strip_suffix("_response")
            .ok_or_else(|| Error::UnknownService(tag.to_string()))?
            .parse()
    }
}

impl fmt::Display for ApiService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiService {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ApiService::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| Error::UnknownService(s.to_string()))
    }
}

const PAGED_RESULT_KEYS: [&str; 4] = ["page", "total_paging", "nb_total_per_page", "nb_total_result"];

/// Element names allowed under each service's response root.
#[derive(Debug, Clone)]
pub struct KeyRegistry {
    keys: HashMap<ApiService, Vec<&'static str>>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        let paged = |item: &'static str| {
            let mut keys = PAGED_RESULT_KEYS.to_vec();
            keys.extend([item, "error"]);
            keys
        };

        let keys = HashMap::from([
            (ApiService::Auth, vec!["token", "validity", "version", "error"]),
            (ApiService::OffersUpdate, vec!["batch_id", "error"]),
            (ApiService::OffersQuery, paged("offer")),
            (ApiService::OrdersQuery, paged("order")),
            (ApiService::OrdersUpdate, vec!["order", "error"]),
            (ApiService::MessagesQuery, paged("message")),
            (ApiService::MessagesUpdate, vec!["message", "error"]),
            (ApiService::BatchStatus, vec!["batch_id", "nb_lines", "offer", "error"]),
        ]);
        Self { keys }
    }

    pub fn keys(&self, service: ApiService) -> &[&'static str] {
        self.keys.get(&service).map(Vec::as_slice).unwrap_or_default()
    }

    /// Checks the children of the response root against its service's allow-list.
    pub fn validate(&self, response: &Response) -> Result<()> {
        let service = ApiService::from_response_tag(response.tag())?;
        let Some(root) = response.root() else {
            // A bare `<x_response>text</x_response>` has no children to check.
            return Ok(());
        };
        validate_keys(root, self.keys(service).iter().copied())?;
        Ok(())
    }
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
