use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,
    pub data_dir: PathBuf,

    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,

    // Register / login throttling
    pub auth_rate_limit_max: u32,
    pub auth_rate_limit_window_secs: u64,
}

/// Comma-separated origins, blanks dropped.
fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|raw| parse_origin_list(&raw))
                .unwrap_or_default(),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),

            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_ttl_secs: env::var("JWT_TTL_SECS")
                .unwrap_or_else(|_| "86400".into()) // 24 hours
                .parse()
                .expect("JWT_TTL_SECS must be a number"),

            auth_rate_limit_max: env::var("AUTH_RATE_LIMIT_MAX")
                .unwrap_or_else(|_| "5".into())
                .parse()
                .unwrap_or(5),
            auth_rate_limit_window_secs: env::var("AUTH_RATE_LIMIT_WINDOW_SECS")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .unwrap_or(60),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn journal_dir(&self) -> PathBuf {
        self.data_dir.join("journal")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }

    /// Settings for tests: data under `data_dir`, fixed secret.
    #[cfg(test)]
    pub fn for_tests(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            data_dir: data_dir.into(),
            jwt_secret: "test-secret".into(),
            jwt_ttl_secs: 3600,
            auth_rate_limit_max: 5,
            auth_rate_limit_window_secs: 60,
        }
    }
}
