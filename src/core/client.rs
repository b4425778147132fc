use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use secrecy::SecretString;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    core::{
        config::{self, Config},
        credentials::{Credentials, auth_request, inject_credentials, token_from_response},
        error::{Error, Result},
        registry::{ApiService, KeyRegistry},
        response::Response,
        xml::{XmlMap, to_xml_document},
    },
    services::{
        batch::batch_status_request,
        messages::{Message, MessagesQuery, messages_query_request, messages_update_request},
        offers::{Offer, OffersQuery, offers_query_request, offers_update_request},
        orders::{OrderUpdate, OrdersQuery, orders_query_request, orders_update_request},
    },
};

/// Delivers a request document to an endpoint and returns the reply body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &Url, body: String) -> Result<String>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &Url, body: String) -> Result<String> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, config::CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        // Error replies usually carry an XML <error> body; let the caller decode it.
        if !status.is_success() && !text.contains("<error") {
            return Err(Error::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

/// Marketplace session: authenticates once, then signs and posts service calls.
pub struct Client<T: Transport = HttpTransport> {
    config: Config,
    transport: T,
    registry: KeyRegistry,
    token: Option<SecretString>,
}

impl Client<HttpTransport> {
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, HttpTransport::new())
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self { config, transport, registry: KeyRegistry::new(), token: None }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Runs the `auth` handshake and keeps the session token.
    pub async fn authenticate(&mut self) -> Result<()> {
        info!(partner_id=%self.config.partner_id, shop_id=%self.config.shop_id, "authenticating");
        let response = self.post(ApiService::Auth, auth_request(&self.config)?).await?;
        let token = token_from_response(&response)?;
        self.token = Some(SecretString::from(token));
        info!("authenticated");
        Ok(())
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let token = self.token.clone().ok_or(Error::NotAuthenticated)?;
        Ok(Credentials {
            partner_id: self.config.partner_id.clone(),
            shop_id: self.config.shop_id.clone(),
            token,
        })
    }

    /// Posts a hand-written document after rewriting its credential attributes.
    pub async fn post_raw(&self, service: ApiService, xml: &str) -> Result<Response> {
        let xml = inject_credentials(xml, &self.credentials()?);
        self.post(service, xml).await
    }

    /// Serializes `request` and posts it to `service`.
    pub async fn call(&self, service: ApiService, request: &XmlMap) -> Result<Response> {
        self.post(service, to_xml_document(request)?).await
    }

    async fn post(&self, service: ApiService, body: String) -> Result<Response> {
        let url = self.config.service_url(service.as_str())?;
        debug!(service=%service, url=%url, bytes=body.len(), "posting request");
        let text = self.transport.post(&url, body).await?;
        let response = Response::new(text)?;

        if response.tag() == "error" {
            let error = response.api_error().unwrap_or_default();
            return Err(Error::Api { code: error.code, message: error.message });
        }
        if response.status().is_some_and(|status| status != "OK") {
            warn!(service=%service, status=?response.status(), error=?response.api_error(),
                "API reported a non-OK status");
        }
        if let Err(e) = self.registry.validate(&response) {
            warn!(service=%service, tag=%response.tag(), error=%e, "unexpected response shape");
        }
        Ok(response)
    }

    pub async fn update_offers(&self, offers: &[Offer]) -> Result<Response> {
        let request = offers_update_request(&self.credentials()?, offers)?;
        self.call(ApiService::OffersUpdate, &request).await
    }

    pub async fn query_offers(&self, query: &OffersQuery) -> Result<Response> {
        let request = offers_query_request(&self.credentials()?, query);
        self.call(ApiService::OffersQuery, &request).await
    }

    pub async fn query_orders(&self, query: &OrdersQuery) -> Result<Response> {
        let request = orders_query_request(&self.credentials()?, query);
        self.call(ApiService::OrdersQuery, &request).await
    }

    pub async fn update_orders(&self, orders: &[OrderUpdate]) -> Result<Response> {
        let request = orders_update_request(&self.credentials()?, orders)?;
        self.call(ApiService::OrdersUpdate, &request).await
    }

    pub async fn query_messages(&self, query: &MessagesQuery) -> Result<Response> {
        let request = messages_query_request(&self.credentials()?, query);
        self.call(ApiService::MessagesQuery, &request).await
    }

    pub async fn update_messages(&self, messages: &[Message]) -> Result<Response> {
        let request = messages_update_request(&self.credentials()?, messages)?;
        self.call(ApiService::MessagesUpdate, &request).await
    }

    pub async fn query_batch_status(&self, batch_id: &str) -> Result<Response> {
        let request = batch_status_request(&self.credentials()?, batch_id);
        self.call(ApiService::BatchStatus, &request).await
    }
}
