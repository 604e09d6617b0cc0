use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use gamehub_core::{ModId, ReportId, ServiceError, ServiceResult, UserId};

use super::Guarded;
use crate::analytics::{
    BusinessIntelligenceService, CreateReportRequest, CreatorDashboard, MetricPoint, ModMetrics,
    ModMetricsFilter, PlatformKpis, PublicStats, Report, ReportStatus,
};
use crate::filter::DateRangeFilter;

/// Upper bound on the number of buckets a metrics query may produce.
const MAX_BUCKETS: i64 = 1000;

#[derive(Debug, Default)]
struct State {
    reports: HashMap<ReportId, Report>,
    /// Last time each user touched a caller-scoped analytics endpoint.
    last_seen: HashMap<UserId, DateTime<Utc>>,
}

impl State {
    fn touch(&mut self, user: UserId) {
        self.last_seen.insert(user, Utc::now());
    }

    fn active_within(&self, until: DateTime<Utc>, window: Duration) -> u64 {
        self.last_seen
            .values()
            .filter(|seen| **seen <= until && until - **seen < window)
            .count() as u64
    }
}

#[derive(Debug, Default)]
pub struct InMemoryBusinessIntelligenceService {
    state: Guarded<State>,
}

impl InMemoryBusinessIntelligenceService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BusinessIntelligenceService for InMemoryBusinessIntelligenceService {
    async fn creator_dashboard(&self, caller: UserId, filter: DateRangeFilter) -> ServiceResult<CreatorDashboard> {
        self.state.lock()?.touch(caller);
        Ok(CreatorDashboard {
            creator_id: caller,
            from: filter.from,
            to: filter.to,
            total_downloads: 0,
            total_views: 0,
            follower_count: 0,
            revenue_cents: 0,
            top_mods: Vec::new(),
        })
    }

    async fn mod_metrics(&self, caller: UserId, mod_id: ModId, filter: ModMetricsFilter) -> ServiceResult<ModMetrics> {
        let granularity = filter.granularity.unwrap_or_default();
        let to = filter.to.unwrap_or_else(Utc::now);
        let from = filter.from.unwrap_or(to - Duration::days(7));
        let bucket = granularity.bucket();

        let buckets = (to - from).num_seconds() / bucket.num_seconds();
        if buckets > MAX_BUCKETS {
            return Err(ServiceError::invalid_argument(format!(
                "range too large for {granularity:?} granularity (max {MAX_BUCKETS} buckets)"
            )));
        }

        self.state.lock()?.touch(caller);
        let points = (0..buckets)
            .map(|i| MetricPoint {
                bucket_start: from + bucket * i as i32,
                downloads: 0,
                views: 0,
                ratings: 0,
            })
            .collect();

        Ok(ModMetrics {
            mod_id,
            granularity,
            points,
        })
    }

    async fn create_report(&self, caller: UserId, request: CreateReportRequest) -> ServiceResult<Report> {
        let report = Report {
            id: ReportId::new(),
            owner_id: caller,
            name: request.name,
            metrics: request.metrics,
            from: request.from,
            to: request.to,
            status: ReportStatus::Ready,
            created_at: Utc::now(),
        };

        let mut state = self.state.lock()?;
        state.touch(caller);
        state.reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn get_report(&self, caller: UserId, report_id: ReportId) -> ServiceResult<Report> {
        let state = self.state.lock()?;
        let report = state.reports.get(&report_id).ok_or(ServiceError::NotFound)?;
        if report.owner_id != caller {
            return Err(ServiceError::Forbidden);
        }
        Ok(report.clone())
    }

    async fn public_stats(&self) -> ServiceResult<PublicStats> {
        let state = self.state.lock()?;
        Ok(PublicStats {
            total_downloads: 0,
            active_creators: state.last_seen.len() as u64,
            reports_generated: state.reports.len() as u64,
            generated_at: Utc::now(),
        })
    }

    async fn platform_kpis(&self, filter: DateRangeFilter) -> ServiceResult<PlatformKpis> {
        let state = self.state.lock()?;
        let until = filter.to.unwrap_or_else(Utc::now);
        let daily = state.active_within(until, Duration::days(1));
        let monthly = state.active_within(until, Duration::days(30));
        let retention = if monthly == 0 {
            0.0
        } else {
            daily as f64 / monthly as f64
        };

        Ok(PlatformKpis {
            from: filter.from,
            to: filter.to,
            daily_active_users: daily,
            monthly_active_users: monthly,
            retention_rate: retention,
            churn_rate: if monthly == 0 { 0.0 } else { 1.0 - retention },
        })
    }
}
