use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;

use gamehub_core::{GameId, RecommendationId, ServiceError, ServiceResult, UserId};

use super::Guarded;
use crate::optimization::{
    GameOptimizationService, GamePreset, HardwareProfile, OptimizationFeedback, QualityPreset,
    Recommendation, RecommendationFilter,
};

const DEFAULT_TARGET_FPS: u32 = 60;

/// Highest preset whose memory floor the machine clears.
fn preset_for(ram_gb: u32) -> QualityPreset {
    QualityPreset::ALL
        .iter()
        .rev()
        .copied()
        .find(|p| ram_gb >= p.min_ram_gb())
        .unwrap_or(QualityPreset::Low)
}

fn settings_for(preset: QualityPreset) -> BTreeMap<String, String> {
    let (textures, shadows, scale) = match preset {
        QualityPreset::Low => ("low", "off", "75"),
        QualityPreset::Medium => ("medium", "low", "90"),
        QualityPreset::High => ("high", "medium", "100"),
        QualityPreset::Ultra => ("ultra", "high", "100"),
    };

    BTreeMap::from([
        ("textures".to_string(), textures.to_string()),
        ("shadows".to_string(), shadows.to_string()),
        ("resolution_scale".to_string(), scale.to_string()),
    ])
}

#[derive(Debug, Default)]
struct State {
    recommendations: HashMap<RecommendationId, Recommendation>,
    feedback: Vec<OptimizationFeedback>,
}

#[derive(Debug, Default)]
pub struct InMemoryGameOptimizationService {
    state: Guarded<State>,
}

impl InMemoryGameOptimizationService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameOptimizationService for InMemoryGameOptimizationService {
    async fn analyze_profile(&self, caller: UserId, profile: HardwareProfile) -> ServiceResult<Recommendation> {
        let preset = preset_for(profile.ram_gb);
        let recommendation = Recommendation {
            id: RecommendationId::new(),
            user_id: caller,
            game_id: profile.game_id,
            preset,
            settings: settings_for(preset),
            expected_fps: profile.target_fps.unwrap_or(DEFAULT_TARGET_FPS),
            applied: false,
            created_at: Utc::now(),
        };

        self.state
            .lock()?
            .recommendations
            .insert(recommendation.id, recommendation.clone());
        tracing::debug!(recommendation_id = %recommendation.id, ?preset, "profile analyzed");
        Ok(recommendation)
    }

    async fn list_recommendations(
        &self,
        caller: UserId,
        filter: RecommendationFilter,
    ) -> ServiceResult<Vec<Recommendation>> {
        let state = self.state.lock()?;
        let mut mine: Vec<Recommendation> = state
            .recommendations
            .values()
            .filter(|r| r.user_id == caller)
            .filter(|r| filter.game_id.is_none_or(|g| r.game_id == g))
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn apply_recommendation(
        &self,
        caller: UserId,
        recommendation_id: RecommendationId,
    ) -> ServiceResult<Recommendation> {
        let mut state = self.state.lock()?;
        let recommendation = state
            .recommendations
            .get_mut(&recommendation_id)
            .filter(|r| r.user_id == caller)
            .ok_or(ServiceError::NotFound)?;

        if recommendation.applied {
            return Err(ServiceError::invalid_state("recommendation has already been applied"));
        }
        recommendation.applied = true;
        Ok(recommendation.clone())
    }

    async fn submit_feedback(&self, caller: UserId, feedback: OptimizationFeedback) -> ServiceResult<()> {
        let mut state = self.state.lock()?;
        if !state
            .recommendations
            .get(&feedback.recommendation_id)
            .is_some_and(|r| r.user_id == caller)
        {
            return Err(ServiceError::NotFound);
        }
        state.feedback.push(feedback);
        Ok(())
    }

    async fn game_presets(&self, game_id: GameId) -> ServiceResult<Vec<GamePreset>> {
        Ok(QualityPreset::ALL
            .iter()
            .map(|p| GamePreset {
                game_id,
                preset: *p,
                min_ram_gb: p.min_ram_gb(),
                settings: settings_for(*p),
            })
            .collect())
    }
}
