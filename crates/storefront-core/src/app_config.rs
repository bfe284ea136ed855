use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Shop domain without scheme, e.g. `example.myshopify.com`.
    pub store_domain: String,
    pub api_token: String,
    pub api_version: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub page_size: u32,
    pub cart_endpoint: String,
    pub state_dir: PathBuf,
    /// Collection featured on the homepage.
    pub home_collection: String,
    /// Metaobject type holding homepage marketing modules.
    pub home_module_type: String,
}

impl AppConfig {
    /// Storefront GraphQL endpoint for the configured shop and API version.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        format!(
            "https://{}/api/{}/graphql.json",
            self.store_domain, self.api_version
        )
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("store_domain", &self.store_domain)
            .field("api_token", &"[redacted]")
            .field("api_version", &self.api_version)
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("page_size", &self.page_size)
            .field("cart_endpoint", &self.cart_endpoint)
            .field("state_dir", &self.state_dir)
            .field("home_collection", &self.home_collection)
            .field("home_module_type", &self.home_module_type)
            .finish()
    }
}
