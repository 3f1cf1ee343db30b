use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the terminal front end
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Where setup preferences are kept
    pub data_dir: PathBuf,
    /// Countdown tick period
    pub tick: Duration,
    /// Whether to ring the haptic channel at all
    pub haptics: bool,
    /// Fixed RNG seed for reproducible matches
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".spyword"),
            tick: Duration::from_secs(1),
            haptics: true,
            seed: None,
        }
    }
}

impl AppConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let data_dir = std::env::var("SPYWORD_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let tick = std::env::var("SPYWORD_TICK_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.tick);

        let haptics = std::env::var("SPYWORD_HAPTICS")
            .map(|v| v != "0" && v.to_lowercase() != "false")
            .unwrap_or(defaults.haptics);

        let seed = std::env::var("SPYWORD_SEED").ok().and_then(|v| {
            v.parse::<u64>()
                .map_err(|e| tracing::warn!("Ignoring invalid SPYWORD_SEED {:?}: {}", v, e))
                .ok()
        });

        Self {
            data_dir,
            tick,
            haptics,
            seed,
        }
    }
}
