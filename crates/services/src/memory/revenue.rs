use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;

use gamehub_core::{PayoutId, ServiceError, ServiceResult, SubscriptionId, UserId};

use super::Guarded;
use crate::filter::DateRangeFilter;
use crate::revenue::{
    CreateSubscriptionRequest, EarningsSummary, Payout, PayoutRequest, PayoutStatus,
    PlatformRevenueReport, RevenueService, Subscription, SubscriptionStatus,
};

/// Platform share of creator revenue, in percent.
const PLATFORM_FEE_PERCENT: u64 = 20;

fn platform_fee(gross_cents: u64) -> u64 {
    gross_cents * PLATFORM_FEE_PERCENT / 100
}

#[derive(Debug, Default)]
struct State {
    subscriptions: HashMap<SubscriptionId, Subscription>,
    payouts: Vec<Payout>,
}

impl State {
    fn gross_for(&self, creator: Option<UserId>, window: &DateRangeFilter) -> u64 {
        self.subscriptions
            .values()
            .filter(|s| creator.is_none_or(|c| s.creator_id == Some(c)))
            .filter(|s| window.contains(s.started_at))
            .map(|s| s.price_cents)
            .sum()
    }

    fn paid_out(&self, creator: UserId) -> u64 {
        self.payouts
            .iter()
            .filter(|p| p.creator_id == creator && p.status != PayoutStatus::Rejected)
            .map(|p| p.amount_cents)
            .sum()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRevenueService {
    state: Guarded<State>,
}

impl InMemoryRevenueService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevenueService for InMemoryRevenueService {
    async fn list_subscriptions(&self, caller: UserId) -> ServiceResult<Vec<Subscription>> {
        let state = self.state.lock()?;
        let mut mine: Vec<Subscription> = state
            .subscriptions
            .values()
            .filter(|s| s.subscriber_id == caller)
            .cloned()
            .collect();
        mine.sort_by_key(|s| s.started_at);
        Ok(mine)
    }

    async fn create_subscription(
        &self,
        caller: UserId,
        request: CreateSubscriptionRequest,
    ) -> ServiceResult<Subscription> {
        if request.creator_id == Some(caller) {
            return Err(ServiceError::invalid_argument("cannot subscribe to yourself"));
        }

        let mut state = self.state.lock()?;
        if state.subscriptions.values().any(|s| {
            s.subscriber_id == caller
                && s.creator_id == request.creator_id
                && s.status == SubscriptionStatus::Active
        }) {
            return Err(ServiceError::invalid_state("an active subscription already exists"));
        }

        let subscription = Subscription {
            id: SubscriptionId::new(),
            subscriber_id: caller,
            creator_id: request.creator_id,
            tier: request.tier,
            status: SubscriptionStatus::Active,
            price_cents: request.tier.price_cents(),
            currency: request
                .currency
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or_else(|| "USD".to_string()),
            started_at: Utc::now(),
            cancelled_at: None,
        };
        state.subscriptions.insert(subscription.id, subscription.clone());
        Ok(subscription)
    }

    async fn get_subscription(
        &self,
        caller: UserId,
        subscription_id: SubscriptionId,
    ) -> ServiceResult<Subscription> {
        self.state
            .lock()?
            .subscriptions
            .get(&subscription_id)
            .filter(|s| s.subscriber_id == caller)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    async fn cancel_subscription(
        &self,
        caller: UserId,
        subscription_id: SubscriptionId,
    ) -> ServiceResult<Subscription> {
        let mut state = self.state.lock()?;
        let subscription = state
            .subscriptions
            .get_mut(&subscription_id)
            .filter(|s| s.subscriber_id == caller)
            .ok_or(ServiceError::NotFound)?;

        if subscription.status == SubscriptionStatus::Cancelled {
            return Err(ServiceError::invalid_state("subscription is already cancelled"));
        }
        subscription.status = SubscriptionStatus::Cancelled;
        subscription.cancelled_at = Some(Utc::now());
        tracing::debug!(%subscription_id, "subscription cancelled");
        Ok(subscription.clone())
    }

    async fn earnings(&self, caller: UserId, filter: DateRangeFilter) -> ServiceResult<EarningsSummary> {
        let state = self.state.lock()?;
        let gross = state.gross_for(Some(caller), &filter);
        let fee = platform_fee(gross);

        Ok(EarningsSummary {
            creator_id: caller,
            from: filter.from,
            to: filter.to,
            gross_cents: gross,
            platform_fee_cents: fee,
            net_cents: gross - fee,
            paid_out_cents: state.paid_out(caller),
            active_subscribers: state
                .subscriptions
                .values()
                .filter(|s| s.creator_id == Some(caller) && s.status == SubscriptionStatus::Active)
                .count() as u64,
        })
    }

    async fn request_payout(&self, caller: UserId, request: PayoutRequest) -> ServiceResult<Payout> {
        let mut state = self.state.lock()?;
        let gross = state.gross_for(Some(caller), &DateRangeFilter::default());
        let available = (gross - platform_fee(gross)).saturating_sub(state.paid_out(caller));

        if request.amount_cents > available {
            return Err(ServiceError::invalid_argument(format!(
                "insufficient balance: {available} cents available"
            )));
        }

        let payout = Payout {
            id: PayoutId::new(),
            creator_id: caller,
            amount_cents: request.amount_cents,
            status: PayoutStatus::Pending,
            requested_at: Utc::now(),
        };
        state.payouts.push(payout.clone());
        Ok(payout)
    }

    async fn platform_report(&self, filter: DateRangeFilter) -> ServiceResult<PlatformRevenueReport> {
        let state = self.state.lock()?;
        let in_window = || {
            state
                .subscriptions
                .values()
                .filter(|s| filter.contains(s.started_at))
        };
        let gross = state.gross_for(None, &filter);

        Ok(PlatformRevenueReport {
            from: filter.from,
            to: filter.to,
            gross_cents: gross,
            platform_fee_cents: platform_fee(gross),
            active_subscriptions: in_window()
                .filter(|s| s.status == SubscriptionStatus::Active)
                .count() as u64,
            cancelled_subscriptions: in_window()
                .filter(|s| s.status == SubscriptionStatus::Cancelled)
                .count() as u64,
            pending_payout_cents: state
                .payouts
                .iter()
                .filter(|p| p.status == PayoutStatus::Pending)
                .map(|p| p.amount_cents)
                .sum(),
        })
    }
}
