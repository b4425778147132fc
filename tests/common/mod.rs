use async_trait::async_trait;
use fnac_mp::core::{
    client::Transport,
    config::{Config, DEFAULT_URL},
    error::{Error, Result},
    fixtures::Fixtures,
    registry::ApiService,
};
use secrecy::SecretString;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use url::Url;

#[allow(dead_code)] // Suppress spurious warning - some compilation units don't include this code.
pub fn assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("assets")
}

#[allow(dead_code)] // Suppress spurious warning - some compilation units don't include this code.
pub fn load_asset(name: &str) -> String {
    std::fs::read_to_string(assets_dir().join(name)).unwrap()
}

/// Creates a configuration pointing at the default sandbox URL and the test assets
#[allow(dead_code)] // Suppress spurious warning - some compilation units don't include this code.
pub fn create_test_config() -> Config {
    Config {
        partner_id: "C8A3D2E1-PARTNER".to_string(),
        shop_id: "B1F6E0D4-SHOP".to_string(),
        key: SecretString::from("0123456789ABCDEF".to_string()),
        url: Url::parse(DEFAULT_URL).unwrap(),
        assets_directory: assets_dir(),
        results_count: 100,
    }
}

/// A transport replaying `{action}_response.xml` fixtures and recording what was posted
#[allow(dead_code)] // Used by integration tests, not unit tests
pub struct FixtureTransport {
    fixtures: Fixtures,
    actions: HashMap<String, String>,
    posted: Mutex<Vec<(String, String)>>,
}

#[allow(dead_code)] // Used by integration tests, not unit tests
impl FixtureTransport {
    pub fn new() -> Self {
        Self { fixtures: Fixtures::new(assets_dir()), actions: HashMap::new(), posted: Mutex::new(Vec::new()) }
    }

    /// Answer calls to `service` with the `{action}_response.xml` fixture
    pub fn respond(mut self, service: ApiService, action: &str) -> Self {
        self.actions.insert(service.as_str().to_string(), action.to_string());
        self
    }

    pub fn posted(&self) -> Vec<(String, String)> {
        self.posted.lock().unwrap().clone()
    }

    pub fn last_body(&self, service: ApiService) -> Option<String> {
        self.posted()
            .into_iter()
            .rev()
            .find(|(posted_to, _)| posted_to == service.as_str())
            .map(|(_, body)| body)
    }
}

#[async_trait]
impl Transport for FixtureTransport {
    async fn post(&self, url: &Url, body: String) -> Result<String> {
        let service = url
            .path_segments()
            .and_then(|segments| segments.last())
            .unwrap_or_default()
            .to_string();
        self.posted.lock().unwrap().push((service.clone(), body));

        let action = self.actions.get(&service).ok_or_else(|| Error::UnknownService(service.clone()))?;
        self.fixtures.load_response(action)
    }
}
