use crate::{
    core::{
        credentials::Credentials,
        response::Response,
        xml::{XmlMap, XmlValue},
    },
    services::query::document,
};

/// Asks for the processing state of an `offers_update` batch.
pub fn batch_status_request(credentials: &Credentials, batch_id: &str) -> XmlMap {
    let mut root = credentials.request_root();
    root.insert("batch_id".to_string(), XmlValue::text(batch_id));
    document("batch_status", root)
}

/// The batch id returned by `offers_update`.
pub fn batch_id(response: &Response) -> Option<String> {
    response.find_text("batch_id").filter(|id| !id.is_empty())
}
