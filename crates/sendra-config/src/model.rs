use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub version: u32,
    pub api: ApiConfig,
    pub search: SearchConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every request is joined onto. Must include the `/api`
    /// prefix when the backend sits behind the usual reverse proxy.
    pub base_url: Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum result count requested from the natural-query endpoint.
    pub default_limit: u32,
    /// Whether the server should hit the mailbox for fresh messages or
    /// answer from what it already indexed.
    pub include_gmail_fetch: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub compact_density: bool,
    pub show_example_prompts: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            compact_density: false,
            show_example_prompts: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            api: ApiConfig {
                base_url: Url::parse("http://127.0.0.1:8000/api")
                    .expect("default base url is valid"),
            },
            search: SearchConfig {
                default_limit: 50,
                include_gmail_fetch: true,
            },
            ui: UiConfig::default(),
        }
    }
}
