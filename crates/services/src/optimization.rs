//! AI-assisted graphics settings recommendations.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use gamehub_core::{GameId, RecommendationId, ServiceResult, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityPreset {
    Low,
    Medium,
    High,
    Ultra,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 4] = [
        QualityPreset::Low,
        QualityPreset::Medium,
        QualityPreset::High,
        QualityPreset::Ultra,
    ];

    pub fn min_ram_gb(&self) -> u32 {
        match self {
            QualityPreset::Low => 4,
            QualityPreset::Medium => 8,
            QualityPreset::High => 16,
            QualityPreset::Ultra => 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct HardwareProfile {
    pub game_id: GameId,

    #[validate(length(min = 1, max = 128, message = "cpu must be 1-128 characters"))]
    pub cpu: String,

    #[validate(length(min = 1, max = 128, message = "gpu must be 1-128 characters"))]
    pub gpu: String,

    #[validate(range(min = 1, max = 1024, message = "ram_gb must be between 1 and 1024"))]
    pub ram_gb: u32,

    #[validate(length(min = 1, max = 64, message = "os must be 1-64 characters"))]
    pub os: String,

    #[validate(range(min = 30, max = 360, message = "target_fps must be between 30 and 360"))]
    pub target_fps: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: RecommendationId,
    pub user_id: UserId,
    pub game_id: GameId,
    pub preset: QualityPreset,
    pub settings: BTreeMap<String, String>,
    pub expected_fps: u32,
    pub applied: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RecommendationFilter {
    pub game_id: Option<GameId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct OptimizationFeedback {
    pub recommendation_id: RecommendationId,

    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: u8,

    pub measured_fps: Option<u32>,

    #[validate(length(max = 1000, message = "comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamePreset {
    pub game_id: GameId,
    pub preset: QualityPreset,
    pub min_ram_gb: u32,
    pub settings: BTreeMap<String, String>,
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait GameOptimizationService {
    async fn analyze_profile(&self, caller: UserId, profile: HardwareProfile) -> ServiceResult<Recommendation>;

    async fn list_recommendations(
        &self,
        caller: UserId,
        filter: RecommendationFilter,
    ) -> ServiceResult<Vec<Recommendation>>;

    async fn apply_recommendation(
        &self,
        caller: UserId,
        recommendation_id: RecommendationId,
    ) -> ServiceResult<Recommendation>;

    async fn submit_feedback(&self, caller: UserId, feedback: OptimizationFeedback) -> ServiceResult<()>;

    async fn game_presets(&self, game_id: GameId) -> ServiceResult<Vec<GamePreset>>;
}
