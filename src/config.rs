use crate::error::{Error, Result};
use crate::fetch::SettlementPolicy;
use dotenvy::dotenv;
use std::env;
use std::num::NonZeroUsize;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_url: String,
    pub api_key: String,
    pub jwt_secret: String,
    pub token_audience: String,
    pub token_ttl: Duration,
    pub request_timeout: Duration,
    pub page_size: NonZeroUsize,
    pub settlement: SettlementPolicy,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let page_size: usize = get_env_parse_or("JOBBOARD_PAGE_SIZE", 9)?;
        let page_size = NonZeroUsize::new(page_size).ok_or_else(|| {
            Error::Config("Invalid value for JOBBOARD_PAGE_SIZE: must be at least 1".to_string())
        })?;

        Ok(Self {
            data_url: get_env("JOBBOARD_DATA_URL")?,
            api_key: get_env("JOBBOARD_API_KEY")?,
            jwt_secret: get_env("JOBBOARD_JWT_SECRET")?,
            token_audience: env::var("JOBBOARD_TOKEN_AUDIENCE")
                .unwrap_or_else(|_| "authenticated".to_string()),
            token_ttl: Duration::from_secs(get_env_parse_or("JOBBOARD_TOKEN_TTL_SECS", 60)?),
            request_timeout: Duration::from_secs(get_env_parse_or(
                "JOBBOARD_REQUEST_TIMEOUT_SECS",
                30,
            )?),
            page_size,
            settlement: get_env_parse_or("JOBBOARD_SETTLEMENT", SettlementPolicy::default())?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_when_unset_or_blank() {
        env::remove_var("JOBBOARD_TEST_UNSET");
        assert_eq!(get_env_parse_or("JOBBOARD_TEST_UNSET", 9usize).unwrap(), 9);

        env::set_var("JOBBOARD_TEST_BLANK", "  ");
        assert_eq!(get_env_parse_or("JOBBOARD_TEST_BLANK", 30u64).unwrap(), 30);
    }

    #[test]
    fn parse_or_rejects_garbage() {
        env::set_var("JOBBOARD_TEST_GARBAGE", "nine");
        let err = get_env_parse_or("JOBBOARD_TEST_GARBAGE", 9usize).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("JOBBOARD_TEST_GARBAGE")));
    }

    #[test]
    fn settlement_policy_parses_from_env() {
        env::set_var("JOBBOARD_TEST_SETTLEMENT", "last-settled");
        assert_eq!(
            get_env_parse_or("JOBBOARD_TEST_SETTLEMENT", SettlementPolicy::default()).unwrap(),
            SettlementPolicy::LastSettled
        );
    }

    #[test]
    fn missing_required_variable_is_config_error() {
        env::remove_var("JOBBOARD_TEST_REQUIRED");
        assert!(matches!(get_env("JOBBOARD_TEST_REQUIRED"), Err(Error::Config(_))));
    }
}
