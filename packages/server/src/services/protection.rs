use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::config::ProtectionConfig;

/// What a request costs and who is asking.
pub struct ProtectionRequest {
    /// Stable per-user key. Buckets are kept per subject.
    pub subject: String,
    /// Tokens consumed if the request is allowed.
    pub cost: u32,
    pub user_agent: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(DenialReason),
}

#[derive(Debug, PartialEq, Eq)]
pub enum DenialReason {
    /// Bucket exhausted. `reset_seconds` is how long until the requested
    /// number of tokens will be available again.
    RateLimit { remaining: u32, reset_seconds: u64 },
    /// The client looks automated.
    Automated { detail: String },
}

/// Abuse screen consulted by write endpoints before any database access.
#[async_trait]
pub trait ProtectionService: Send + Sync {
    async fn evaluate(&self, req: &ProtectionRequest) -> Decision;
}

/// User-agent prefixes that mark a client as automated.
const AUTOMATED_UA_PREFIXES: &[&str] = &["curl/", "wget/", "python-requests/", "go-http-client/"];

struct Bucket {
    tokens: u32,
    last_refill: Instant,
}

/// Per-subject token bucket with an automated-client screen.
///
/// Each subject starts with `capacity` tokens and gets `refill_rate` back
/// every `interval`. State is in-process, so limits apply per server
/// instance, not across a fleet.
pub struct TokenBucketProtection {
    enabled: bool,
    capacity: u32,
    refill_rate: u32,
    interval: Duration,
    block_automated: bool,
    buckets: DashMap<String, Bucket>,
}

impl TokenBucketProtection {
    pub fn new(config: &ProtectionConfig) -> Self {
        Self {
            enabled: config.enabled,
            capacity: config.capacity,
            refill_rate: config.refill_rate.max(1),
            interval: Duration::from_secs(config.interval_secs.max(1)),
            block_automated: config.block_automated,
            buckets: DashMap::new(),
        }
    }

    /// Build with an explicit refill interval. Used by tests that cannot
    /// wait out a whole-second interval.
    pub fn with_interval(config: &ProtectionConfig, interval: Duration) -> Self {
        let mut protection = Self::new(config);
        protection.interval = interval.max(Duration::from_millis(1));
        protection
    }

    fn screen_user_agent(&self, user_agent: &str) -> Option<String> {
        let ua = user_agent.to_ascii_lowercase();
        if AUTOMATED_UA_PREFIXES.iter().any(|p| ua.starts_with(p)) || ua.contains("bot") {
            Some(format!("automated user agent '{user_agent}'"))
        } else {
            None
        }
    }

    fn take(&self, subject: &str, cost: u32) -> Result<(), DenialReason> {
        let now = Instant::now();
        let mut bucket = self
            .buckets
            .entry(subject.to_owned())
            .or_insert_with(|| Bucket {
                tokens: self.capacity,
                last_refill: now,
            });

        let interval_ms = self.interval.as_millis().max(1);
        let elapsed_ms = now.duration_since(bucket.last_refill).as_millis();
        let intervals = (elapsed_ms / interval_ms).min(u128::from(u32::MAX)) as u32;
        if intervals > 0 {
            bucket.tokens = bucket
                .tokens
                .saturating_add(intervals.saturating_mul(self.refill_rate))
                .min(self.capacity);
            bucket.last_refill += self.interval * intervals;
        }

        if bucket.tokens >= cost {
            bucket.tokens -= cost;
            Ok(())
        } else {
            let deficit = cost - bucket.tokens;
            let intervals_needed = u128::from(deficit.div_ceil(self.refill_rate));
            let since_refill = now.duration_since(bucket.last_refill).as_millis();
            let reset_ms = (intervals_needed * interval_ms).saturating_sub(since_refill);
            let reset_seconds = (reset_ms.div_ceil(1000) as u64).max(1);
            Err(DenialReason::RateLimit {
                remaining: bucket.tokens,
                reset_seconds,
            })
        }
    }
}

#[async_trait]
impl ProtectionService for TokenBucketProtection {
    async fn evaluate(&self, req: &ProtectionRequest) -> Decision {
        if !self.enabled {
            return Decision::Allowed;
        }

        if self.block_automated {
            let screened = req
                .user_agent
                .as_deref()
                .and_then(|ua| self.screen_user_agent(ua));
            if let Some(detail) = screened {
                return Decision::Denied(DenialReason::Automated { detail });
            }
        }

        match self.take(&req.subject, req.cost) {
            Ok(()) => Decision::Allowed,
            Err(reason) => Decision::Denied(reason),
        }
    }
}
