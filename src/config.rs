use std::env;
use std::time::Duration;

/// Bot loop timing.
#[derive(Debug, Clone)]
pub struct BotLoopConfig {
    /// Pause between successful iterations.
    pub interval: Duration,
    /// Pause after a failed iteration.
    pub retry_delay: Duration,
    /// Consecutive failed iterations before the bot stops itself (0 = never).
    pub max_consecutive_errors: u32,
}

impl Default for BotLoopConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            retry_delay: Duration::from_secs(10),
            max_consecutive_errors: 30,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// SQLite database file backing the key/value store.
    pub database_path: String,
    /// Market price refresh interval.
    pub market_update_interval: Duration,
    /// Chart refresh interval.
    pub chart_update_interval: Duration,
    /// Number of points kept in the chart window.
    pub chart_window: usize,
    /// Bot loop timing.
    pub bot: BotLoopConfig,
    /// Simulated exchange round-trip for connection tests.
    pub connection_delay: Duration,
    /// Recent notifications kept in memory.
    pub notification_capacity: usize,
    /// Run the terminal dashboard alongside the API.
    pub tui_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_path: "tradesense.db".to_string(),
            market_update_interval: Duration::from_millis(5000),
            chart_update_interval: Duration::from_millis(10_000),
            chart_window: 24,
            bot: BotLoopConfig::default(),
            connection_delay: Duration::from_millis(1000),
            notification_capacity: 50,
            tui_enabled: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT").unwrap_or(defaults.port),
            database_path: env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
            market_update_interval: parse_var("MARKET_UPDATE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.market_update_interval),
            chart_update_interval: parse_var("CHART_UPDATE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.chart_update_interval),
            chart_window: parse_var::<usize>("CHART_WINDOW")
                .map(|w| w.max(1))
                .unwrap_or(defaults.chart_window),
            bot: BotLoopConfig {
                interval: parse_var("BOT_INTERVAL_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.bot.interval),
                retry_delay: parse_var("BOT_RETRY_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.bot.retry_delay),
                max_consecutive_errors: parse_var("BOT_MAX_CONSECUTIVE_ERRORS")
                    .unwrap_or(defaults.bot.max_consecutive_errors),
            },
            connection_delay: parse_var("CONNECTION_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.connection_delay),
            notification_capacity: parse_var("NOTIFICATION_CAPACITY")
                .unwrap_or(defaults.notification_capacity),
            tui_enabled: env::var("TUI_ENABLED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.tui_enabled),
        }
    }

    /// Address the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard_timers() {
        let config = Config::default();
        assert_eq!(config.market_update_interval, Duration::from_secs(5));
        assert_eq!(config.chart_update_interval, Duration::from_secs(10));
        assert_eq!(config.chart_window, 24);
        assert_eq!(config.bot.interval, Duration::from_secs(60));
        assert_eq!(config.bot.retry_delay, Duration::from_secs(10));
        assert_eq!(config.connection_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_bind_address() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
