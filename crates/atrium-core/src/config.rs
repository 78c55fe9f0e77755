use crate::error::AppError;

/// Server-level configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Prefix all API routes are nested under (e.g. `/api`).
    pub api_prefix: String,
    pub port: u16,
    /// Production mode disables the interactive API documentation.
    pub production: bool,
    /// Shared secret for signing and verifying access tokens.
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub jwt_ttl_secs: i64,
}

impl AppConfig {
    /// Read configuration from environment variables.
    ///
    /// - `ATRIUM_API_PREFIX` (optional, defaults to `/api`)
    /// - `ATRIUM_PORT` (optional, defaults to 3000)
    /// - `ATRIUM_ENV` (optional; `production` enables production mode)
    /// - `ATRIUM_JWT_SECRET` (required)
    /// - `ATRIUM_JWT_TTL_SECS` (optional, defaults to 3600)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_prefix = get("ATRIUM_API_PREFIX").unwrap_or_else(|| "/api".to_string());
        if !api_prefix.starts_with('/') || api_prefix.len() < 2 {
            return Err(AppError::Config(format!(
                "Invalid ATRIUM_API_PREFIX '{api_prefix}': must start with '/' and name a path segment"
            )));
        }

        let port = match get("ATRIUM_PORT") {
            None => 3000,
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::Config(format!("Invalid ATRIUM_PORT '{raw}': must be a port number"))
            })?,
        };

        let production = get("ATRIUM_ENV").as_deref() == Some("production");

        let jwt_secret = get("ATRIUM_JWT_SECRET").ok_or_else(|| {
            AppError::Config("ATRIUM_JWT_SECRET not set. Required for token verification.".into())
        })?;

        let jwt_ttl_secs = match get("ATRIUM_JWT_TTL_SECS") {
            None => 3600,
            Some(raw) => {
                let parsed: i64 = raw.parse().map_err(|_| {
                    AppError::Config(format!(
                        "Invalid ATRIUM_JWT_TTL_SECS '{raw}': must be a positive integer"
                    ))
                })?;
                if parsed <= 0 {
                    return Err(AppError::Config(
                        "ATRIUM_JWT_TTL_SECS must be at least 1".into(),
                    ));
                }
                parsed
            }
        };

        Ok(Self {
            api_prefix,
            port,
            production,
            jwt_secret,
            jwt_ttl_secs,
        })
    }
}
