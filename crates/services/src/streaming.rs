//! Live streaming service boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use gamehub_core::{GameId, ServiceResult, StreamId, UserId};

use crate::filter::{Page, PageRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    Live,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub id: StreamId,
    pub streamer_id: UserId,
    pub game_id: GameId,
    pub title: String,
    pub status: StreamStatus,
    pub viewer_count: u64,
    pub peak_viewers: u64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StartStreamRequest {
    pub game_id: GameId,

    #[validate(length(min = 1, max = 140, message = "title must be 1-140 characters"))]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStats {
    pub stream_id: StreamId,
    pub current_viewers: u64,
    pub peak_viewers: u64,
    pub duration_seconds: i64,
    pub chat_messages: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LiveStreamFilter {
    pub game_id: Option<GameId>,

    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: Option<u32>,
}

impl LiveStreamFilter {
    pub fn paging(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PopularStreamFilter {
    #[validate(range(min = 1, max = 50, message = "limit must be between 1 and 50"))]
    pub limit: Option<u32>,
}

impl PopularStreamFilter {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT) as usize
    }
}

/// Per-streamer broadcast settings. Used as both the PUT body and the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StreamSettings {
    #[validate(range(max = 300, message = "delay_seconds must be at most 300"))]
    pub delay_seconds: u32,
    pub chat_enabled: bool,
    pub mature_content: bool,

    #[validate(length(max = 140, message = "default_title must be at most 140 characters"))]
    pub default_title: Option<String>,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            delay_seconds: 0,
            chat_enabled: true,
            mature_content: false,
            default_title: None,
        }
    }
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait StreamingService {
    /// A streamer can have at most one live stream.
    async fn start_stream(&self, caller: UserId, request: StartStreamRequest) -> ServiceResult<Stream>;

    async fn get_stream(&self, stream_id: StreamId) -> ServiceResult<Stream>;

    async fn end_stream(&self, caller: UserId, stream_id: StreamId) -> ServiceResult<Stream>;

    async fn stream_stats(&self, stream_id: StreamId) -> ServiceResult<StreamStats>;

    async fn live_streams(&self, filter: LiveStreamFilter) -> ServiceResult<Page<Stream>>;

    async fn popular_streams(&self, filter: PopularStreamFilter) -> ServiceResult<Vec<Stream>>;

    async fn get_settings(&self, caller: UserId) -> ServiceResult<StreamSettings>;

    async fn update_settings(&self, caller: UserId, settings: StreamSettings) -> ServiceResult<StreamSettings>;
}
