use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;

use gamehub_core::{ServiceError, ServiceResult, StreamId, UserId};

use super::Guarded;
use crate::filter::Page;
use crate::streaming::{
    LiveStreamFilter, PopularStreamFilter, StartStreamRequest, Stream, StreamSettings, StreamStats,
    StreamStatus, StreamingService,
};

#[derive(Debug, Default)]
struct State {
    streams: HashMap<StreamId, Stream>,
    settings: HashMap<UserId, StreamSettings>,
}

#[derive(Debug, Default)]
pub struct InMemoryStreamingService {
    state: Guarded<State>,
}

impl InMemoryStreamingService {
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_viewers_desc(streams: &mut [Stream]) {
    streams.sort_by(|a, b| {
        b.viewer_count
            .cmp(&a.viewer_count)
            .then(a.started_at.cmp(&b.started_at))
    });
}

#[async_trait]
impl StreamingService for InMemoryStreamingService {
    async fn start_stream(&self, caller: UserId, request: StartStreamRequest) -> ServiceResult<Stream> {
        let mut state = self.state.lock()?;
        if state
            .streams
            .values()
            .any(|s| s.streamer_id == caller && s.status == StreamStatus::Live)
        {
            return Err(ServiceError::invalid_state("a stream is already live for this user"));
        }

        let stream = Stream {
            id: StreamId::new(),
            streamer_id: caller,
            game_id: request.game_id,
            title: request.title,
            status: StreamStatus::Live,
            viewer_count: 0,
            peak_viewers: 0,
            started_at: Utc::now(),
            ended_at: None,
        };
        state.streams.insert(stream.id, stream.clone());
        tracing::debug!(stream_id = %stream.id, streamer_id = %caller, "stream started");
        Ok(stream)
    }

    async fn get_stream(&self, stream_id: StreamId) -> ServiceResult<Stream> {
        self.state
            .lock()?
            .streams
            .get(&stream_id)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    async fn end_stream(&self, caller: UserId, stream_id: StreamId) -> ServiceResult<Stream> {
        let mut state = self.state.lock()?;
        let stream = state.streams.get_mut(&stream_id).ok_or(ServiceError::NotFound)?;
        if stream.streamer_id != caller {
            return Err(ServiceError::Forbidden);
        }
        if stream.status == StreamStatus::Ended {
            return Err(ServiceError::invalid_state("stream has already ended"));
        }

        stream.status = StreamStatus::Ended;
        stream.viewer_count = 0;
        stream.ended_at = Some(Utc::now());
        Ok(stream.clone())
    }

    async fn stream_stats(&self, stream_id: StreamId) -> ServiceResult<StreamStats> {
        let state = self.state.lock()?;
        let stream = state.streams.get(&stream_id).ok_or(ServiceError::NotFound)?;
        let until = stream.ended_at.unwrap_or_else(Utc::now);

        Ok(StreamStats {
            stream_id,
            current_viewers: stream.viewer_count,
            peak_viewers: stream.peak_viewers,
            duration_seconds: (until - stream.started_at).num_seconds().max(0),
            chat_messages: 0,
        })
    }

    async fn live_streams(&self, filter: LiveStreamFilter) -> ServiceResult<Page<Stream>> {
        let state = self.state.lock()?;
        let mut live: Vec<Stream> = state
            .streams
            .values()
            .filter(|s| s.status == StreamStatus::Live)
            .filter(|s| filter.game_id.is_none_or(|g| s.game_id == g))
            .cloned()
            .collect();
        by_viewers_desc(&mut live);
        Ok(filter.paging().paginate(live))
    }

    async fn popular_streams(&self, filter: PopularStreamFilter) -> ServiceResult<Vec<Stream>> {
        let state = self.state.lock()?;
        let mut all: Vec<Stream> = state.streams.values().cloned().collect();
        all.sort_by(|a, b| {
            b.peak_viewers
                .cmp(&a.peak_viewers)
                .then(b.started_at.cmp(&a.started_at))
        });
        all.truncate(filter.limit());
        Ok(all)
    }

    async fn get_settings(&self, caller: UserId) -> ServiceResult<StreamSettings> {
        Ok(self
            .state
            .lock()?
            .settings
            .get(&caller)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_settings(&self, caller: UserId, settings: StreamSettings) -> ServiceResult<StreamSettings> {
        self.state.lock()?.settings.insert(caller, settings.clone());
        Ok(settings)
    }
}
