//! Provider selection with health-aware failover.
//!
//! The factory owns a primary provider and an optional fallback. Before each
//! generation it consults a TTL health cache for the primary: an unhealthy
//! primary is skipped in favor of the fallback. A failed attempt on the
//! primary is followed by exactly one attempt on the fallback.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::client::ChatProvider;
use crate::config::ProviderConfig;
use crate::error::{ProviderError, ProviderErrorKind};
use crate::kind::ProviderKind;
use crate::prompt::ContentRequest;
use crate::provider::Provider;
use crate::types::{CompletionRequest, CompletionResponse, HealthCheck};

/// Default health cache lifetime.
pub const DEFAULT_HEALTH_TTL: Duration = Duration::from_secs(300);

/// Provider selection settings.
#[derive(Clone, Debug, PartialEq)]
pub struct FactorySettings {
    pub primary: ProviderKind,
    pub fallback: ProviderKind,
    pub enable_fallback: bool,
    pub health_ttl: Duration,
}

impl Default for FactorySettings {
    fn default() -> Self {
        Self {
            primary: ProviderKind::OpenAi,
            fallback: ProviderKind::DeepSeek,
            enable_fallback: true,
            health_ttl: DEFAULT_HEALTH_TTL,
        }
    }
}

/// Cached health probe result.
#[derive(Clone, Debug)]
pub struct HealthSnapshot {
    pub check: HealthCheck,
    /// Wall-clock time of the probe, for reporting.
    pub timestamp: DateTime<Utc>,
    /// Monotonic time of the probe, for expiry.
    checked_at: Instant,
}

/// Health snapshots keyed by provider name.
///
/// Entries are replaced wholesale; the lock is never held across an await.
pub struct HealthCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, HealthSnapshot>>,
}

impl HealthCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot for `name` if younger than the TTL.
    pub fn get_fresh(&self, name: &str) -> Option<HealthSnapshot> {
        let entries = self.entries.read().unwrap();
        entries
            .get(name)
            .filter(|snapshot| snapshot.checked_at.elapsed() < self.ttl)
            .cloned()
    }

    pub fn store(&self, name: &str, check: HealthCheck) -> HealthSnapshot {
        let snapshot = HealthSnapshot {
            check,
            timestamp: Utc::now(),
            checked_at: Instant::now(),
        };
        self.entries
            .write()
            .unwrap()
            .insert(name.to_owned(), snapshot.clone());
        snapshot
    }

    /// Cached health of `provider`, probing it when absent or stale.
    pub async fn status_of(&self, provider: &dyn Provider) -> HealthSnapshot {
        if let Some(snapshot) = self.get_fresh(provider.name()) {
            return snapshot;
        }
        let check = provider.check_health().await;
        info!(
            provider = provider.name(),
            status = ?check.status,
            latency_ms = check.latency_ms,
            "Refreshed provider health"
        );
        self.store(provider.name(), check)
    }
}

/// Health of one provider in a report.
#[derive(Clone, Debug, Serialize)]
pub struct ProviderHealth {
    pub provider_name: String,
    #[serde(flatten)]
    pub check: HealthCheck,
    pub checked_at: DateTime<Utc>,
}

/// Aggregate health view.
#[derive(Clone, Debug, Serialize)]
pub struct FactoryHealth {
    pub primary: String,
    pub fallback: Option<String>,
    pub enable_fallback: bool,
    pub providers: BTreeMap<String, ProviderHealth>,
    pub timestamp: DateTime<Utc>,
}

/// Primary/fallback provider pair.
pub struct ProviderFactory {
    primary: Arc<dyn Provider>,
    fallback: Option<Arc<dyn Provider>>,
    enable_fallback: bool,
    health: HealthCache,
}

impl ProviderFactory {
    /// Build from explicit providers. Fallback is enabled iff one is given.
    pub fn new(
        primary: Arc<dyn Provider>,
        fallback: Option<Arc<dyn Provider>>,
        health_ttl: Duration,
    ) -> Self {
        let enable_fallback = fallback.is_some();
        Self {
            primary,
            fallback,
            enable_fallback,
            health: HealthCache::new(health_ttl),
        }
    }

    /// Build chat providers from per-backend configs.
    ///
    /// A backend without an API key cannot be constructed. A fallback that
    /// cannot be constructed (or equals the primary) disables failover.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::Authentication`] if the primary has no key.
    pub fn from_configs(
        settings: &FactorySettings,
        configs: &HashMap<ProviderKind, ProviderConfig>,
    ) -> Result<Self, ProviderError> {
        let config_for = |kind: ProviderKind| {
            configs
                .get(&kind)
                .cloned()
                .unwrap_or_else(|| ProviderConfig::for_kind(kind))
        };

        let primary: Arc<dyn Provider> =
            Arc::new(ChatProvider::new(settings.primary, config_for(settings.primary))?);

        let fallback: Option<Arc<dyn Provider>> = if !settings.enable_fallback {
            None
        } else if settings.fallback == settings.primary {
            warn!(
                provider = settings.primary.name(),
                "Fallback provider equals primary, failover disabled"
            );
            None
        } else {
            match ChatProvider::new(settings.fallback, config_for(settings.fallback)) {
                Ok(provider) => Some(Arc::new(provider) as Arc<dyn Provider>),
                Err(err) => {
                    warn!(error = %err, "Fallback provider unavailable, failover disabled");
                    None
                }
            }
        };

        info!(
            primary = settings.primary.name(),
            fallback = fallback.as_ref().map(|p| p.name()),
            "Providers configured"
        );

        Ok(Self::new(primary, fallback, settings.health_ttl))
    }

    /// Disable failover while keeping the fallback for health reporting.
    #[must_use]
    pub fn with_fallback_enabled(mut self, enabled: bool) -> Self {
        self.enable_fallback = enabled && self.fallback.is_some();
        self
    }

    #[must_use]
    pub fn primary(&self) -> &dyn Provider {
        self.primary.as_ref()
    }

    #[must_use]
    pub fn fallback(&self) -> Option<&dyn Provider> {
        self.fallback.as_deref()
    }

    #[must_use]
    pub fn fallback_enabled(&self) -> bool {
        self.enable_fallback
    }

    #[must_use]
    pub fn health_cache(&self) -> &HealthCache {
        &self.health
    }

    /// Generate content for a request, with failover.
    pub async fn generate_content(
        &self,
        request: &ContentRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        self.complete(request.to_completion_request()).await
    }

    /// Run a completion with failover.
    ///
    /// # Errors
    ///
    /// When every attempted provider fails, returns
    /// [`ProviderErrorKind::Generation`] tagged with the primary's name and
    /// carrying the last failure's message.
    pub async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let fallback = self.fallback.as_ref().filter(|_| self.enable_fallback);

        let (first, second) = match fallback {
            Some(fallback) if self.primary_unhealthy().await => {
                warn!(
                    primary = self.primary.name(),
                    fallback = fallback.name(),
                    "Primary provider unhealthy, using fallback"
                );
                (fallback, None)
            }
            other => (&self.primary, other),
        };

        let err = match first.generate_completion(request.clone()).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        let last = match second {
            Some(second) => {
                warn!(
                    provider = first.name(),
                    fallback = second.name(),
                    error = %err,
                    "Provider failed, trying fallback"
                );
                match second.generate_completion(request).await {
                    Ok(response) => return Ok(response),
                    Err(err) => err,
                }
            }
            None => err,
        };

        Err(ProviderError::new(
            self.primary.name(),
            ProviderErrorKind::Generation(last.message().to_owned()),
        ))
    }

    async fn primary_unhealthy(&self) -> bool {
        self.health
            .status_of(self.primary.as_ref())
            .await
            .check
            .is_unhealthy()
    }

    /// Health of every configured provider (cached within the TTL).
    pub async fn health_report(&self) -> FactoryHealth {
        let mut providers = BTreeMap::new();
        let all = std::iter::once(&self.primary).chain(self.fallback.as_ref());
        for provider in all {
            let snapshot = self.health.status_of(provider.as_ref()).await;
            providers.insert(
                provider.name().to_owned(),
                ProviderHealth {
                    provider_name: provider.name().to_owned(),
                    check: snapshot.check,
                    checked_at: snapshot.timestamp,
                },
            );
        }

        FactoryHealth {
            primary: self.primary.name().to_owned(),
            fallback: self.fallback.as_ref().map(|p| p.name().to_owned()),
            enable_fallback: self.enable_fallback,
            providers,
            timestamp: Utc::now(),
        }
    }
}
