//! Site visit/click counter with optimistic updates.
//!
//! The session click count moves first; the backend's totals follow. If the
//! backend cannot be reached the optimistic increment is rolled back. A
//! backend that answers with a refusal does not roll anything back: the
//! affected counter just advances locally by one.

use rand::RngCore;
use serde::Serialize;

use crate::engine::error::StatsError;

/// Totals returned when a page view is counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteTotals {
    pub total_views: u64,
    pub total_clicks: u64,
}

/// Remote counters. All increments are atomic on the backend side and
/// return the new value.
pub trait StatsBackend {
    fn increment_site_views(&self) -> Result<SiteTotals, StatsError>;
    fn visitor_clicks(&self, visitor_id: &str) -> Result<Option<u64>, StatsError>;
    fn create_visitor(&self, visitor_id: &str) -> Result<u64, StatsError>;
    fn increment_total_clicks(&self) -> Result<u64, StatsError>;
    fn increment_visitor_clicks(&self, visitor_id: &str) -> Result<u64, StatsError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SiteStats {
    pub total_views: u64,
    pub total_clicks: u64,
    pub visitor_clicks: u64,
    pub session_clicks: u64,
}

/// Proof that an optimistic click was applied and still needs settling.
#[derive(Debug)]
#[must_use = "an optimistic click must be settled"]
pub struct PendingClick {
    _private: (),
}

/// 32 lowercase hex characters.
pub fn new_visitor_id(rng: &mut dyn RngCore) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub struct SiteStatsTracker {
    visitor_id: String,
    stats: SiteStats,
    loading: bool,
}

impl SiteStatsTracker {
    pub fn new(visitor_id: impl Into<String>) -> Self {
        Self {
            visitor_id: visitor_id.into(),
            stats: SiteStats::default(),
            loading: true,
        }
    }

    pub fn visitor_id(&self) -> &str {
        &self.visitor_id
    }

    pub fn stats(&self) -> SiteStats {
        self.stats
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Count this page view and load the visitor's click record, creating
    /// it when missing. Failures are logged; affected fields stay zero.
    pub fn initialize(&mut self, backend: &dyn StatsBackend) -> SiteStats {
        let totals = match backend.increment_site_views() {
            Ok(t) => t,
            Err(e) => {
                tracing::error!(error = %e, "failed to increment site views");
                SiteTotals::default()
            }
        };

        let visitor_clicks = match backend.visitor_clicks(&self.visitor_id) {
            Ok(Some(clicks)) => clicks,
            Ok(None) => backend.create_visitor(&self.visitor_id).unwrap_or_else(|e| {
                tracing::error!(error = %e, visitor = %self.visitor_id, "failed to create visitor record");
                0
            }),
            Err(e) => {
                tracing::error!(error = %e, visitor = %self.visitor_id, "failed to load visitor clicks");
                0
            }
        };

        self.stats = SiteStats {
            total_views: totals.total_views,
            total_clicks: totals.total_clicks,
            visitor_clicks,
            session_clicks: 0,
        };
        self.loading = false;
        tracing::debug!(stats = ?self.stats, "site stats initialized");
        self.stats
    }

    /// Optimistically count a click in this session.
    pub fn begin_click(&mut self) -> PendingClick {
        self.stats.session_clicks += 1;
        PendingClick { _private: () }
    }

    /// Reconcile an optimistic click with the backend's answers.
    pub fn settle_click(
        &mut self,
        _pending: PendingClick,
        total: Result<u64, StatsError>,
        visitor: Result<u64, StatsError>,
    ) -> SiteStats {
        let transport_failed = [&total, &visitor]
            .iter()
            .any(|r| matches!(r, Err(StatsError::Transport { .. })));
        if transport_failed {
            tracing::error!("click not recorded, rolling back");
            self.stats.session_clicks = self.stats.session_clicks.saturating_sub(1);
            return self.stats;
        }

        self.stats.total_clicks = match total {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "failed to increment total clicks");
                self.stats.total_clicks + 1
            }
        };
        self.stats.visitor_clicks = match visitor {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "failed to increment visitor clicks");
                self.stats.visitor_clicks + 1
            }
        };
        self.stats
    }

    /// `begin_click` followed by both backend increments and `settle_click`.
    pub fn click(&mut self, backend: &dyn StatsBackend) -> SiteStats {
        let pending = self.begin_click();
        let total = backend.increment_total_clicks();
        let visitor = backend.increment_visitor_clicks(&self.visitor_id);
        self.settle_click(pending, total, visitor)
    }
}
