//! Client configuration: where the backend lives and how much to ask for.

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_CATALOG_LIMIT: u32 = 20;
const DEFAULT_RECOMMENDATION_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub catalog_limit: u32,
    pub recommendation_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            catalog_limit: DEFAULT_CATALOG_LIMIT,
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}

impl AppConfig {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Browsers have no environment, so the API URL is baked in at build time.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::from_lookup(|key| match key {
            "ORCHESTRA_API_URL" => option_env!("ORCHESTRA_API_URL").map(str::to_string),
            _ => None,
        })
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let api_base_url = lookup("ORCHESTRA_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);

        Self {
            api_base_url,
            catalog_limit: parse_limit(
                "ORCHESTRA_CATALOG_LIMIT",
                lookup("ORCHESTRA_CATALOG_LIMIT"),
                defaults.catalog_limit,
            ),
            recommendation_limit: parse_limit(
                "ORCHESTRA_RECOMMENDATION_LIMIT",
                lookup("ORCHESTRA_RECOMMENDATION_LIMIT"),
                defaults.recommendation_limit,
            ),
        }
    }
}

fn parse_limit(key: &str, raw: Option<String>, default: u32) -> u32 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => value,
        _ => {
            tracing::warn!(key, value = %raw, "ignoring invalid limit");
            default
        }
    }
}
