use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::AppState;

/// Fixed-window request counter per key, held in memory.
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

struct Window {
    count: u32,
    started: Instant,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Counts a request against `key`. Returns the remaining allowance, or
    /// how long until the window resets.
    pub async fn check(&self, key: &str) -> Result<u32, Duration> {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();

        let w = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            started: now,
        });

        if now.duration_since(w.started) > self.window {
            w.count = 0;
            w.started = now;
        }

        if w.count >= self.max_requests {
            return Err(self.window.saturating_sub(now.duration_since(w.started)));
        }

        w.count += 1;
        Ok(self.max_requests - w.count)
    }

    /// Drops windows that have fully expired.
    pub async fn sweep(&self) -> usize {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();
        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.started) <= self.window);
        before - windows.len()
    }

    pub fn spawn_sweeper(&self) {
        let limiter = self.clone();
        tokio::spawn(async move {
            let period = limiter.window.max(Duration::from_secs(1));
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let removed = limiter.sweep().await;
                if removed > 0 {
                    tracing::debug!(removed, "Swept expired rate limit windows");
                }
            }
        });
    }
}

/// Throttles register/login per client IP and path.
pub async fn rate_limit_auth(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".into());
    let path = req.uri().path().to_string();
    let key = format!("{}:{}", ip, path);

    match state.rate_limiter.check(&key).await {
        Ok(remaining) => {
            tracing::debug!(ip = %ip, path = %path, remaining, "Rate limit check passed");
            Ok(next.run(req).await)
        }
        Err(retry_after) => {
            tracing::warn!(
                ip = %ip,
                path = %path,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            Err(AppError::RateLimited)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_up_to_max_then_blocks() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        assert_eq!(limiter.check("k").await, Ok(2));
        assert_eq!(limiter.check("k").await, Ok(1));
        assert_eq!(limiter.check("k").await, Ok(0));
        assert!(limiter.check("k").await.is_err());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("a").await.is_ok());
        assert!(limiter.check("a").await.is_err());
        assert!(limiter.check("b").await.is_ok());
    }

    #[tokio::test]
    async fn test_window_resets_and_sweeps() {
        let limiter = RateLimiter::new(1, Duration::from_millis(20));
        assert!(limiter.check("a").await.is_ok());
        assert!(limiter.check("a").await.is_err());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(limiter.sweep().await, 1);
        assert!(limiter.check("a").await.is_ok());
    }
}
