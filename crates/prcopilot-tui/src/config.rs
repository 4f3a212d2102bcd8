use std::time::Duration;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "prcopilot", about = "Review dashboard for backend-generated PR summaries")]
pub struct DashboardConfig {
    /// Base URL of the summarization backend
    #[arg(
        long,
        env = "PRCOPILOT_API_BASE_URL",
        default_value = "http://localhost:8000"
    )]
    pub api_base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "PRCOPILOT_REQUEST_TIMEOUT", default_value = "10")]
    pub request_timeout: u64,
}

impl DashboardConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DashboardConfig::try_parse_from(["prcopilot"]).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn base_url_flag_overrides_default() {
        let config =
            DashboardConfig::try_parse_from(["prcopilot", "--api-base-url", "http://10.0.0.2:9000"])
                .unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.2:9000");
    }
}
