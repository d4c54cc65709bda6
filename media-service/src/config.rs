use std::env;
use std::fmt;

use crate::error::AppError;

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";
pub const DEFAULT_ROUTE: &str = "/api/cloudinary";
const DEFAULT_PORT: u16 = 3000;

/// Proxy configuration, read once from the environment at startup.
///
/// Credentials are deliberately not validated here; a missing value only
/// fails the requests that need it.
#[derive(Clone, Default)]
pub struct MediaConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub api_base: String,
    pub route: String,
    pub remove_base_path: bool,
    pub port: u16,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn normalize_route(route: &str) -> String {
    let trimmed = route.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

impl MediaConfig {
    pub fn from_env() -> Self {
        Self {
            cloud_name: non_empty_var("CLOUDINARY_CLOUD_NAME"),
            api_key: non_empty_var("CLOUDINARY_API_KEY"),
            api_secret: non_empty_var("CLOUDINARY_API_SECRET"),
            api_base: non_empty_var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            route: non_empty_var("MEDIA_ROUTE")
                .map(|r| normalize_route(&r))
                .unwrap_or_else(|| DEFAULT_ROUTE.to_string()),
            remove_base_path: env::var("REMOVE_BASE_PATH")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false),
            port: non_empty_var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }

    /// API Gateway stage prefix the routes are nested under.
    pub fn prefix(&self) -> &'static str {
        if self.remove_base_path {
            ""
        } else {
            "/Prod"
        }
    }

    pub fn credentials(&self) -> Result<Credentials, AppError> {
        let require = |value: &Option<String>, name: &str| {
            value.clone().ok_or_else(|| {
                AppError::configuration(format!("{} environment variable not set", name))
            })
        };
        Ok(Credentials {
            cloud_name: require(&self.cloud_name, "CLOUDINARY_CLOUD_NAME")?,
            api_key: require(&self.api_key, "CLOUDINARY_API_KEY")?,
            api_secret: require(&self.api_secret, "CLOUDINARY_API_SECRET")?,
        })
    }
}

impl fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("route", &self.route)
            .field("remove_base_path", &self.remove_base_path)
            .field("port", &self.port)
            .finish()
    }
}

/// Media host account credentials.
#[derive(Clone)]
pub struct Credentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
