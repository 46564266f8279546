//! Gateway configuration, loaded from environment variables.

const DEFAULT_ASSET_PREFIX: &str = "templates";
const DEFAULT_UPLOAD_CONCURRENCY: usize = 4;
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080/assets";

/// Tuning knobs for `TemplateGateway`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Leading path segment of every uploaded object.
    pub asset_prefix: String,
    /// Maximum uploads in flight during one save.
    pub upload_concurrency: usize,
    /// Base URL that storage backends prepend to object paths.
    pub public_base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            asset_prefix: DEFAULT_ASSET_PREFIX.into(),
            upload_concurrency: DEFAULT_UPLOAD_CONCURRENCY,
            public_base_url: DEFAULT_PUBLIC_BASE_URL.into(),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            asset_prefix: env_string("CERTIGEN_ASSET_PREFIX", DEFAULT_ASSET_PREFIX),
            upload_concurrency: env_parse("CERTIGEN_UPLOAD_CONCURRENCY", DEFAULT_UPLOAD_CONCURRENCY)
                .max(1),
            public_base_url: env_string("CERTIGEN_PUBLIC_BASE_URL", DEFAULT_PUBLIC_BASE_URL),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
