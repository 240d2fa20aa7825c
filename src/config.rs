use chrono::Duration;
use std::env;

const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/alumni-platform";
const DEFAULT_DATABASE: &str = "alumni-platform";
const DEFAULT_JWT_SECRET: &str = "your-super-secret-key";
const DEFAULT_SMTP_PORT: u16 = 587;
pub const MAX_TOKEN_TTL_DAYS: i64 = 365;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must look like '10h', '30m', '3d' or '45s' and be at most 365d, got '{value}'")]
    InvalidDuration { name: &'static str, value: String },
}

/// Typed settings read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub jwt: JwtSettings,
    pub mail: MailSettings,
    pub gemini: GeminiSettings,
    pub frontend_url: String,
    pub matching: MatchingSettings,
}

#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub model: String,
}

/// Limits for the mentor-matching fan-out.
#[derive(Debug, Clone)]
pub struct MatchingSettings {
    pub max_concurrency: usize,
    pub call_timeout: std::time::Duration,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            call_timeout: std::time::Duration::from_secs(20),
        }
    }
}

impl Settings {
    /// Reads every setting from the process environment.
    ///
    /// | Variable                 | Default                                     |
    /// |--------------------------|---------------------------------------------|
    /// | `HOST`                   | `0.0.0.0`                                   |
    /// | `PORT`                   | `3000`                                      |
    /// | `MONGODB_URI`            | `mongodb://localhost:27017/alumni-platform` |
    /// | `MONGODB_DATABASE`       | path of `MONGODB_URI`                       |
    /// | `JWT_SECRET`             | `your-super-secret-key`                     |
    /// | `JWT_EXPIRES_IN`         | `10h`                                       |
    /// | `JWT_REFRESH_EXPIRES_IN` | `3d`                                        |
    /// | `MAIL_HOST`              | `smtp.gmail.com`                            |
    /// | `MAIL_PORT`              | `587`                                       |
    /// | `MAIL_USER`              | -                                           |
    /// | `MAIL_PASSWORD`          | -                                           |
    /// | `MAIL_FROM`              | `noreply@alumni-platform.com`               |
    /// | `GEMINI_API_KEY`         | -                                           |
    /// | `GEMINI_MODEL`           | `gemini-1.5-flash`                          |
    /// | `FRONTEND_URL`           | `http://localhost:4200`                     |
    /// | `AI_MAX_CONCURRENCY`     | `4`                                         |
    /// | `AI_TIMEOUT_SECS`        | `20`                                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Settings::from_env`] but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mongodb_uri = get("MONGODB_URI").unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string());
        let mongodb_database = get("MONGODB_DATABASE")
            .or_else(|| database_from_uri(&mongodb_uri))
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None => {
                log::warn!("⚠️  JWT_SECRET not set, falling back to the insecure default");
                DEFAULT_JWT_SECRET.to_string()
            }
        };

        let defaults = MatchingSettings::default();

        Ok(Settings {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_number("PORT", get("PORT"), 3000)?,
            mongodb_uri,
            mongodb_database,
            jwt: JwtSettings {
                secret,
                access_ttl: parse_duration_var("JWT_EXPIRES_IN", get("JWT_EXPIRES_IN"), "10h")?,
                refresh_ttl: parse_duration_var(
                    "JWT_REFRESH_EXPIRES_IN",
                    get("JWT_REFRESH_EXPIRES_IN"),
                    "3d",
                )?,
            },
            mail: MailSettings {
                host: get("MAIL_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                port: parse_number("MAIL_PORT", get("MAIL_PORT"), DEFAULT_SMTP_PORT)?,
                user: get("MAIL_USER"),
                password: get("MAIL_PASSWORD"),
                from: get("MAIL_FROM")
                    .unwrap_or_else(|| "noreply@alumni-platform.com".to_string()),
            },
            gemini: GeminiSettings {
                api_key: get("GEMINI_API_KEY"),
                model: get("GEMINI_MODEL").unwrap_or_else(|| "gemini-1.5-flash".to_string()),
            },
            frontend_url: get("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:4200".to_string())
                .trim_end_matches('/')
                .to_string(),
            matching: MatchingSettings {
                max_concurrency: parse_number(
                    "AI_MAX_CONCURRENCY",
                    get("AI_MAX_CONCURRENCY"),
                    defaults.max_concurrency,
                )?
                .max(1),
                call_timeout: std::time::Duration::from_secs(parse_number(
                    "AI_TIMEOUT_SECS",
                    get("AI_TIMEOUT_SECS"),
                    defaults.call_timeout.as_secs(),
                )?),
            },
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
    }
}

fn parse_duration_var(
    name: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<Duration, ConfigError> {
    let raw = value.unwrap_or_else(|| default.to_string());
    parse_duration(&raw).ok_or(ConfigError::InvalidDuration { name, value: raw })
}

/// Parses `"<n>s"`, `"<n>m"`, `"<n>h"` or `"<n>d"`. A bare number is seconds.
/// Anything longer than [`MAX_TOKEN_TTL_DAYS`] is rejected.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let amount: i64 = digits.parse().ok()?;

    let duration = match unit {
        "" | "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        _ => None,
    }?;
    (duration <= Duration::days(MAX_TOKEN_TTL_DAYS)).then_some(duration)
}

/// Extracts the database name from the path segment of a MongoDB URI.
fn database_from_uri(uri: &str) -> Option<String> {
    let without_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
    let (_, path) = without_scheme.split_once('/')?;
    let name = path.split('?').next().unwrap_or_default();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
