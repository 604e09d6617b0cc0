//! Business intelligence: creator dashboards, mod metrics, custom reports and
//! platform KPIs.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use gamehub_core::{ModId, ReportId, ServiceResult, UserId};

use crate::filter::{validate_date_range, DateRangeFilter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorDashboard {
    pub creator_id: UserId,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub total_downloads: u64,
    pub total_views: u64,
    pub follower_count: u64,
    pub revenue_cents: u64,
    pub top_mods: Vec<ModId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Approximate bucket width (months are treated as 30 days).
    pub fn bucket(&self) -> Duration {
        match self {
            Granularity::Hour => Duration::hours(1),
            Granularity::Day => Duration::days(1),
            Granularity::Week => Duration::weeks(1),
            Granularity::Month => Duration::days(30),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_mod_metrics_filter"))]
pub struct ModMetricsFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub granularity: Option<Granularity>,
}

fn validate_mod_metrics_filter(filter: &ModMetricsFilter) -> Result<(), ValidationError> {
    validate_date_range(filter.from, filter.to)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub bucket_start: DateTime<Utc>,
    pub downloads: u64,
    pub views: u64,
    pub ratings: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModMetrics {
    pub mod_id: ModId,
    pub granularity: Granularity,
    pub points: Vec<MetricPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_create_report"))]
pub struct CreateReportRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 20, message = "between 1 and 20 metrics are required"))]
    pub metrics: Vec<String>,

    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

fn validate_create_report(request: &CreateReportRequest) -> Result<(), ValidationError> {
    validate_date_range(request.from, request.to)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Queued,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub owner_id: UserId,
    pub name: String,
    pub metrics: Vec<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counters safe to expose anonymously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicStats {
    pub total_downloads: u64,
    pub active_creators: u64,
    pub reports_generated: u64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformKpis {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub daily_active_users: u64,
    pub monthly_active_users: u64,
    pub retention_rate: f64,
    pub churn_rate: f64,
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait BusinessIntelligenceService {
    async fn creator_dashboard(
        &self,
        caller: UserId,
        filter: DateRangeFilter,
    ) -> ServiceResult<CreatorDashboard>;

    async fn mod_metrics(
        &self,
        caller: UserId,
        mod_id: ModId,
        filter: ModMetricsFilter,
    ) -> ServiceResult<ModMetrics>;

    async fn create_report(&self, caller: UserId, request: CreateReportRequest) -> ServiceResult<Report>;

    async fn get_report(&self, caller: UserId, report_id: ReportId) -> ServiceResult<Report>;

    async fn public_stats(&self) -> ServiceResult<PublicStats>;

    async fn platform_kpis(&self, filter: DateRangeFilter) -> ServiceResult<PlatformKpis>;
}
