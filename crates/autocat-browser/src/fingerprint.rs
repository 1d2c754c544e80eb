use autocat_core::BrowserConfig;
use rand::Rng;

/// Identity the browser presents to the catalog site
#[derive(Debug, Clone)]
pub struct FingerprintConfig {
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub locale: String,
}

impl FingerprintConfig {
    /// Build from configuration, picking a random user agent when none is set
    pub fn from_config(config: &BrowserConfig) -> Self {
        let user_agent = if config.user_agent.trim().is_empty() {
            Self::random_user_agent()
        } else {
            config.user_agent.clone()
        };

        Self {
            user_agent,
            viewport_width: config.window_width,
            viewport_height: config.window_height,
            locale: config.locale.clone(),
        }
    }

    fn random_user_agent() -> String {
        // Common desktop user agents
        let user_agents = [
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ];

        let idx = rand::thread_rng().gen_range(0..user_agents.len());
        user_agents[idx].to_string()
    }

    /// Chromium command-line switches carrying this fingerprint
    pub fn chromium_args(&self) -> Vec<String> {
        vec![
            format!("--user-agent={}", self.user_agent),
            format!("--lang={}", self.locale),
        ]
    }
}
