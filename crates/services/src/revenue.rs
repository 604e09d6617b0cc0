//! Subscriptions, creator earnings and payouts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use gamehub_core::{PayoutId, ServiceResult, SubscriptionId, UserId};

use crate::filter::DateRangeFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Basic,
    Premium,
    Creator,
}

impl SubscriptionTier {
    /// Monthly list price in minor currency units.
    pub fn price_cents(&self) -> u64 {
        match self {
            SubscriptionTier::Basic => 499,
            SubscriptionTier::Premium => 999,
            SubscriptionTier::Creator => 1499,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub subscriber_id: UserId,
    /// Creator being supported; `None` for a plain platform subscription.
    pub creator_id: Option<UserId>,
    pub tier: SubscriptionTier,
    pub status: SubscriptionStatus,
    pub price_cents: u64,
    pub currency: String,
    pub started_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateSubscriptionRequest {
    pub tier: SubscriptionTier,
    pub creator_id: Option<UserId>,

    #[validate(length(equal = 3, message = "currency must be a 3-letter ISO code"))]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsSummary {
    pub creator_id: UserId,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub gross_cents: u64,
    pub platform_fee_cents: u64,
    pub net_cents: u64,
    pub paid_out_cents: u64,
    pub active_subscribers: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PayoutRequest {
    #[validate(range(min = 100, message = "amount_cents must be at least 100"))]
    pub amount_cents: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Pending,
    Paid,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub id: PayoutId,
    pub creator_id: UserId,
    pub amount_cents: u64,
    pub status: PayoutStatus,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRevenueReport {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub gross_cents: u64,
    pub platform_fee_cents: u64,
    pub active_subscriptions: u64,
    pub cancelled_subscriptions: u64,
    pub pending_payout_cents: u64,
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait RevenueService {
    async fn list_subscriptions(&self, caller: UserId) -> ServiceResult<Vec<Subscription>>;

    async fn create_subscription(
        &self,
        caller: UserId,
        request: CreateSubscriptionRequest,
    ) -> ServiceResult<Subscription>;

    async fn get_subscription(
        &self,
        caller: UserId,
        subscription_id: SubscriptionId,
    ) -> ServiceResult<Subscription>;

    /// Cancelling an already cancelled subscription is an invalid state.
    async fn cancel_subscription(
        &self,
        caller: UserId,
        subscription_id: SubscriptionId,
    ) -> ServiceResult<Subscription>;

    async fn earnings(&self, caller: UserId, filter: DateRangeFilter) -> ServiceResult<EarningsSummary>;

    async fn request_payout(&self, caller: UserId, request: PayoutRequest) -> ServiceResult<Payout>;

    async fn platform_report(&self, filter: DateRangeFilter) -> ServiceResult<PlatformRevenueReport>;
}
