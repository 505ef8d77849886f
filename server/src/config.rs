use std::{
    path::PathBuf,
    sync::LazyLock,
    time::Duration,
};

use config::{Environment, File, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;
use types::{CaretakerPolicy, Result, err};
use url::Url;

const SECONDS_PER_HOUR: u64 = 3600;

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|error| panic!("invalid configuration: {error:?}"))
});

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Base URL of the property-management REST backend.
    pub backend_url: Url,
    /// URL this app is served from. Decides whether cookies are `Secure`.
    pub public_url: Url,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    pub db_secret: SecretString,
    pub signing_secret: SecretString,
    #[serde(default)]
    pub caretaker_policy: CaretakerPolicy,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u64,
}

impl Config {
    /// Read `rentit.toml` if present, then `RENTIT_*` environment variables.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(File::with_name("rentit").required(false))
            .add_source(Environment::with_prefix("RENTIT"))
            .build()?;

        config.try_deserialize::<Self>()?.validated()
    }

    pub fn from_toml(toml: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        config.try_deserialize::<Self>()?.validated()
    }

    fn validated(self) -> Result<Self> {
        if self.session_ttl_hours.checked_mul(SECONDS_PER_HOUR).is_none() {
            return Err(err!(
                "session_ttl_hours = {} is too large",
                self.session_ttl_hours
            ));
        }
        Ok(self)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_hours.saturating_mul(SECONDS_PER_HOUR))
    }

    pub fn secure_cookies(&self) -> bool {
        self.public_url.scheme() == "https"
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_session_ttl_hours() -> u64 {
    24
}


#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    const MINIMAL: &str = r#"
        backend_url = "https://api.example.com/v1/"
        public_url = "http://localhost:8080"
        db_secret = "db"
        signing_secret = "sign"
    "#;

    #[test]
    fn defaults_apply() {
        let config = Config::from_toml(MINIMAL).unwrap();

        assert_eq!(config.caretaker_policy, CaretakerPolicy::Inherit);
        assert_eq!(config.session_ttl(), Duration::from_secs(24 * 3600));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.signing_secret.expose_secret(), "sign");
        assert!(!config.secure_cookies());
    }

    #[test]
    fn caretaker_policy_can_be_enforced() {
        let toml = format!("{MINIMAL}\ncaretaker_policy = \"enforce\"\nsession_ttl_hours = 2");
        let config = Config::from_toml(&toml).unwrap();

        assert_eq!(config.caretaker_policy, CaretakerPolicy::Enforce);
        assert_eq!(config.session_ttl(), Duration::from_secs(7200));
    }

    #[test]
    fn missing_secret_is_an_error() {
        let toml = r#"
            backend_url = "https://api.example.com/"
            public_url = "https://rentit.example.com"
            db_secret = "db"
        "#;
        assert!(Config::from_toml(toml).is_err());
    }

    #[test]
    fn oversized_session_ttl_is_an_error() {
        let toml = format!("{MINIMAL}\nsession_ttl_hours = {}", u64::MAX / 1000);
        assert!(Config::from_toml(&toml).is_err());

        let toml = format!("{MINIMAL}\nsession_ttl_hours = 87600");
        let config = Config::from_toml(&toml).unwrap();
        assert_eq!(config.session_ttl(), Duration::from_secs(87600 * 3600));
    }

    #[test]
    fn unknown_policy_is_an_error() {
        let toml = format!("{MINIMAL}\ncaretaker_policy = \"sometimes\"");
        assert!(Config::from_toml(&toml).is_err());
    }
}
