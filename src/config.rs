#[derive(Clone, Debug)]
pub struct PagesmithConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: String,
    /// Published sites are served at `{subdomain}.{root_domain}`
    pub root_domain: String,
    /// Origin of the editor; preview messages from anywhere else are ignored
    pub public_origin: String,
    pub analytics_api_url: String,
    pub analytics_token: Option<String>,
    pub analytics_datasource: String,
}

impl PagesmithConfig {
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://pagesmith.db".to_string());

        let max_connections = std::env::var("MAX_CONNECTIONS")
            .ok()
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(15);

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let root_domain = std::env::var("ROOT_DOMAIN")
            .or_else(|_| std::env::var("NEXT_PUBLIC_ROOT_DOMAIN"))
            .unwrap_or_else(|_| "localhost:3000".to_string());

        let public_origin = std::env::var("PUBLIC_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let analytics_api_url = std::env::var("ANALYTICS_API_URL")
            .unwrap_or_else(|_| "https://api.tinybird.co".to_string());

        let analytics_token = std::env::var("ANALYTICS_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let analytics_datasource =
            std::env::var("ANALYTICS_DATASOURCE").unwrap_or_else(|_| "page_events".to_string());

        Self {
            database_url,
            max_connections,
            bind_addr,
            root_domain,
            public_origin,
            analytics_api_url,
            analytics_token,
            analytics_datasource,
        }
    }
}

impl Default for PagesmithConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            bind_addr: "127.0.0.1:3000".to_string(),
            root_domain: "localhost:3000".to_string(),
            public_origin: "http://localhost:3000".to_string(),
            analytics_api_url: "https://api.tinybird.co".to_string(),
            analytics_token: None,
            analytics_datasource: "page_events".to_string(),
        }
    }
}
