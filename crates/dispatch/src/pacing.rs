use std::time::Duration;

/// Delay inserted between consecutive user lookups for one event, to stay
/// under the platform's per-window request limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub lookup_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            lookup_delay: Duration::from_millis(200),
        }
    }
}

impl Pacing {
    pub fn new(lookup_delay: Duration) -> Self {
        Self { lookup_delay }
    }

    /// No delay at all.
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub(crate) async fn pause(&self) {
        if !self.lookup_delay.is_zero() {
            tokio::time::sleep(self.lookup_delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn pause_waits_lookup_delay() {
        let start = tokio::time::Instant::now();
        Pacing::default().pause().await;
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn none_returns_immediately() {
        let start = std::time::Instant::now();
        Pacing::none().pause().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
