use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use url::Url;

use crate::core::error::Result;

pub const ENV_PREFIX: &str = "FNAC";
pub const ENV_PREFIX_SEPARATOR: &str = "_";

pub const DEFAULT_URL: &str = "https://partners-test.mp.fnacdarty.com/api.php/";
pub const XML_NAMESPACE: &str = "http://www.fnac.com/schemas/mp-dialog.xsd";
pub const CONTENT_TYPE: &str = "text/xml";

#[serde_as]
#[derive(Debug, Deserialize)]
pub struct Config {
    pub partner_id: String,
    pub shop_id: String,
    pub key: SecretString,
    #[serde(default = "default_url")]
    pub url: Url,
    #[serde(default = "default_assets_directory")]
    pub assets_directory: PathBuf,
    #[serde(default = "default_results_count")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub results_count: u32,
}

fn default_url() -> Url {
    Url::parse(DEFAULT_URL).expect("default URL is valid")
}

fn default_assets_directory() -> PathBuf {
    PathBuf::from("tests/assets")
}

fn default_results_count() -> u32 {
    100
}

impl Config {
    /// Endpoint of `service`, appended to the configured base URL.
    ///
    /// A base URL without a trailing `/` is treated as a directory, so
    /// `.../api.php` and `.../api.php/` name the same endpoints.
    pub fn service_url(&self, service: &str) -> Result<Url> {
        let mut base = self.url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(service)?)
    }
}

pub fn load_from_env() -> Result<Config> {
    dotenvy::dotenv().ok(); // Load from .env file first
    let cfg = config::Config::builder()
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX).prefix_separator(ENV_PREFIX_SEPARATOR),
        )
        .build()?;
    Ok(cfg.try_deserialize()?)
}
