//! Session credentials and the `auth` handshake documents.

use quick_xml::escape::escape;
use regex::{NoExpand, Regex};
use secrecy::{ExposeSecret, SecretString};

use crate::core::{
    config::{Config, XML_NAMESPACE},
    error::{Error, Result},
    response::Response,
    xml::{XmlMap, XmlValue, to_xml_document},
};

/// Identity attached to every signed request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub partner_id: String,
    pub shop_id: String,
    pub token: SecretString,
}

impl Credentials {
    pub fn new(
        partner_id: impl Into<String>,
        shop_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            partner_id: partner_id.into(),
            shop_id: shop_id.into(),
            token: SecretString::from(token.into()),
        }
    }

    /// Root element of a signed request, with namespace and credential attributes set.
    pub fn request_root(&self) -> XmlMap {
        let mut root = XmlMap::new();
        root.insert("@xmlns".to_string(), XmlValue::text(XML_NAMESPACE));
        root.insert("@shop_id".to_string(), XmlValue::text(self.shop_id.as_str()));
        root.insert("@partner_id".to_string(), XmlValue::text(self.partner_id.as_str()));
        root.insert("@token".to_string(), XmlValue::text(self.token.expose_secret()));
        root
    }
}

/// Document posted to the `auth` service.
pub fn auth_request(config: &Config) -> Result<String> {
    let mut auth = XmlMap::new();
    auth.insert("@xmlns".to_string(), XmlValue::text(XML_NAMESPACE));
    auth.insert("partner_id".to_string(), XmlValue::text(config.partner_id.as_str()));
    auth.insert("shop_id".to_string(), XmlValue::text(config.shop_id.as_str()));
    auth.insert("key".to_string(), XmlValue::text(config.key.expose_secret()));

    let mut document = XmlMap::new();
    document.insert("auth".to_string(), XmlValue::Map(auth));
    to_xml_document(&document)
}

/// Pulls the session token out of an `auth_response`.
pub fn token_from_response(response: &Response) -> Result<String> {
    match response.find_text("token") {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(Error::Auth(match response.api_error() {
            Some(error) => format!("{} ({})", error.message, error.code),
            None => format!("no token in <{}>", response.tag()),
        })),
    }
}

/// Rewrites the `shop_id`, `partner_id` and `token` attribute values of a raw document.
///
/// Only attributes that already carry a non-empty value are replaced.
pub fn inject_credentials(xml: &str, credentials: &Credentials) -> String {
    let values = [
        ("shop_id", credentials.shop_id.as_str()),
        ("partner_id", credentials.partner_id.as_str()),
        ("token", credentials.token.expose_secret()),
    ];

    let mut xml = xml.to_string();
    for (name, value) in values {
        let pattern =
            Regex::new(&format!(r#"\b{name}="[^"]+""#)).expect("credential pattern is valid");
        let replacement = format!(r#"{name}="{}""#, escape(value));
        xml = pattern.replace_all(&xml, NoExpand(&replacement)).into_owned();
    }
    xml
}
