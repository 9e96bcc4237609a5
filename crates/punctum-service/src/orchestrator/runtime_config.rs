use std::sync::OnceLock;
use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use super::candidates::CandidateSets;
use super::upstream::retry::RetryTuning;
use super::upstream::vendor_fallback::VendorFallbackConfig;

const DEFAULT_PROVIDER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_SITE_URL: &str = "https://abodid.com";
const DEFAULT_SITE_NAME: &str = "Abodid Personal Site";
const DEFAULT_CALL_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const ENV_PROVIDER_BASE_URL: &str = "PUNCTUM_PROVIDER_BASE_URL";
const ENV_PROVIDER_API_KEY: &str = "PUNCTUM_PROVIDER_API_KEY";
const ENV_SITE_URL: &str = "PUNCTUM_SITE_URL";
const ENV_SITE_NAME: &str = "PUNCTUM_SITE_NAME";
const ENV_CALL_TIMEOUT_SECS: &str = "PUNCTUM_CALL_TIMEOUT_SECS";
const ENV_RETRY_CAP: &str = "PUNCTUM_RETRY_CAP";
const ENV_BACKOFF_BASE_MS: &str = "PUNCTUM_BACKOFF_BASE_MS";
const ENV_BACKOFF_MAX_MS: &str = "PUNCTUM_BACKOFF_MAX_MS";

static ORCHESTRATOR_CONFIG: OnceLock<OrchestratorConfig> = OnceLock::new();
static UPSTREAM_CLIENT: OnceLock<Client> = OnceLock::new();

/// Everything one orchestration run needs, built once at startup. Candidate
/// lists, credentials and timeouts travel inside this object instead of
/// being read from the environment in deep call frames, so tests can hand
/// the orchestrator fake lists.
pub(crate) struct OrchestratorConfig {
    pub(crate) provider_base_url: String,
    pub(crate) provider_api_key: Option<String>,
    pub(crate) site_url: String,
    pub(crate) site_name: String,
    pub(crate) call_timeout: Duration,
    pub(crate) retry: RetryTuning,
    pub(crate) candidates: CandidateSets,
    pub(crate) vendor: VendorFallbackConfig,
}

impl OrchestratorConfig {
    pub(crate) fn from_env() -> Self {
        let provider_base_url = normalize_base_url(&env_string_or(
            ENV_PROVIDER_BASE_URL,
            DEFAULT_PROVIDER_BASE_URL,
        ));
        if Url::parse(&provider_base_url).is_err() {
            log::warn!("provider base url does not parse: {provider_base_url}");
        }
        Self {
            provider_base_url,
            provider_api_key: env_opt_string(ENV_PROVIDER_API_KEY),
            site_url: env_string_or(ENV_SITE_URL, DEFAULT_SITE_URL),
            site_name: env_string_or(ENV_SITE_NAME, DEFAULT_SITE_NAME),
            call_timeout: Duration::from_secs(env_u64_or(
                ENV_CALL_TIMEOUT_SECS,
                DEFAULT_CALL_TIMEOUT_SECS,
            )),
            retry: RetryTuning {
                retry_cap: env_u64_or(ENV_RETRY_CAP, 2) as u32,
                backoff_base: Duration::from_millis(env_u64_or(ENV_BACKOFF_BASE_MS, 1_000)),
                backoff_max: Duration::from_millis(env_u64_or(ENV_BACKOFF_MAX_MS, 2_000)),
            },
            candidates: CandidateSets::from_env(),
            vendor: VendorFallbackConfig::from_env(),
        }
    }
}

pub(crate) fn orchestrator_config() -> &'static OrchestratorConfig {
    ORCHESTRATOR_CONFIG.get_or_init(OrchestratorConfig::from_env)
}

pub(crate) fn upstream_client() -> &'static Client {
    UPSTREAM_CLIENT.get_or_init(|| {
        let config = orchestrator_config();
        Client::builder()
            // 每次调用都是一次性的补全请求；总超时就是单次调用的硬上限。
            .timeout(config.call_timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

pub(super) fn normalize_base_url(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}

pub(super) fn env_string_or(name: &str, default: &str) -> String {
    env_opt_string(name).unwrap_or_else(|| default.to_string())
}

pub(super) fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(super) fn env_u64_or(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}
