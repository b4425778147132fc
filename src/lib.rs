pub mod core {
    pub(crate) mod choice;
    pub mod client;
    pub mod config;
    pub mod credentials;
    pub mod error;
    pub mod fixtures;
    pub mod registry;
    pub mod response;
    pub mod validation;
    pub mod xml;
}

pub mod services {
    pub mod batch;
    pub mod messages;
    pub mod offers;
    pub mod orders;
    pub mod query;
}

pub use crate::core::{
    client::Client,
    error::{Error, Result},
    response::Response,
    xml::{XmlMap, XmlValue},
};
