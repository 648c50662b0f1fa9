/// Upper bound for the session cookie lifetime.
pub const MAX_SESSION_AGE_DAYS: i64 = 3650;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub max_age_days: i64,
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "sessionId".into(),
            max_age_days: 7,
            secure: false,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (1..=MAX_SESSION_AGE_DAYS).contains(&self.max_age_days),
            "SESSION_MAX_AGE_DAYS must be between 1 and {MAX_SESSION_AGE_DAYS}, got {}",
            self.max_age_days
        );
        anyhow::ensure!(
            !self.cookie_name.is_empty(),
            "SESSION_COOKIE_NAME must not be empty"
        );
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let defaults = SessionConfig::default();
        let session = SessionConfig {
            cookie_name: std::env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie_name),
            max_age_days: parse_var("SESSION_MAX_AGE_DAYS")?.unwrap_or(defaults.max_age_days),
            secure: parse_var("SESSION_COOKIE_SECURE")?.unwrap_or(defaults.secure),
        };
        session.validate()?;
        Ok(Self {
            database_url,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?.unwrap_or(10),
            session,
        })
    }
}

fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid {key} value {v:?}: {e}")),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_reads_and_rejects() {
        std::env::set_var("DAILY_DIET_TEST_NUMBER", " 42 ");
        assert_eq!(parse_var::<i64>("DAILY_DIET_TEST_NUMBER").unwrap(), Some(42));

        std::env::set_var("DAILY_DIET_TEST_BOOL", "maybe");
        let err = parse_var::<bool>("DAILY_DIET_TEST_BOOL").unwrap_err();
        assert!(err.to_string().contains("DAILY_DIET_TEST_BOOL"));

        assert_eq!(parse_var::<u32>("DAILY_DIET_TEST_UNSET").unwrap(), None);
    }

    #[test]
    fn session_age_must_stay_in_range() {
        assert!(SessionConfig::default().validate().is_ok());

        for days in [0, -1, MAX_SESSION_AGE_DAYS + 1, 200_000_000_000_000] {
            let cfg = SessionConfig {
                max_age_days: days,
                ..SessionConfig::default()
            };
            let err = cfg.validate().unwrap_err();
            assert!(err.to_string().contains("SESSION_MAX_AGE_DAYS"), "{days}");
        }

        let cfg = SessionConfig {
            max_age_days: MAX_SESSION_AGE_DAYS,
            ..SessionConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_cookie_name_is_rejected() {
        let cfg = SessionConfig {
            cookie_name: String::new(),
            ..SessionConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
