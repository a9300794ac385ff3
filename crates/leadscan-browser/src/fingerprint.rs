use leadscan_core::BrowserConfig;
use rand::Rng;

/// Identity presented by every view the engine opens.
#[derive(Debug, Clone)]
pub struct FingerprintConfig {
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl FingerprintConfig {
    /// Generate a randomized fingerprint configuration
    pub fn randomized() -> Self {
        let mut rng = rand::thread_rng();

        // Common desktop user agents
        let user_agents = [
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
        ];

        // Common viewport sizes
        let viewports = [(1920, 1080), (1366, 768), (1536, 864), (1280, 720)];

        let ua_idx = rng.gen_range(0..user_agents.len());
        let vp_idx = rng.gen_range(0..viewports.len());
        let (width, height) = viewports[vp_idx];

        Self {
            user_agent: user_agents[ua_idx].to_string(),
            viewport_width: width,
            viewport_height: height,
        }
    }

    /// Use the configured identity; an empty user agent falls back to a
    /// randomized one while keeping the configured window size.
    pub fn from_config(config: &BrowserConfig) -> Self {
        let user_agent = if config.user_agent.trim().is_empty() {
            Self::randomized().user_agent
        } else {
            config.user_agent.clone()
        };

        Self {
            user_agent,
            viewport_width: config.window_width,
            viewport_height: config.window_height,
        }
    }
}
