use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub tools: ToolsConfig,
    pub notifier: NotifierConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: String,
    pub output_dir: String,
}

/// External tool locations. All media and model work is delegated to
/// subprocesses (ffmpeg/ffprobe and the python helper scripts).
#[derive(Debug, Deserialize)]
pub struct ToolsConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
    pub python: String,
    pub scripts_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct NotifierConfig {
    /// Seconds between status checks for a watched job.
    pub poll_interval_secs: u64,
}

impl NotifierConfig {
    /// The poll period as a `Duration`. A zero period would panic the
    /// recurring timer, so the interval is clamped to at least one second.
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::NotifierConfig;

    #[test]
    fn zero_poll_interval_is_clamped_to_one_second() {
        let cfg = NotifierConfig { poll_interval_secs: 0 };
        assert_eq!(cfg.poll_interval(), std::time::Duration::from_secs(1));

        let cfg = NotifierConfig { poll_interval_secs: 10 };
        assert_eq!(cfg.poll_interval(), std::time::Duration::from_secs(10));
    }
}
