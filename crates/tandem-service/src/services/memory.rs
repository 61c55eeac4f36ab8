//! Memory service
//!
//! Writing and listing the moments a room has saved. Every successful write
//! publishes a memories change event so open sessions re-query.

use tracing::{info, instrument, warn};

use tandem_core::entities::{Emotion, Memory, MEMORY_CONTENT_MAX};
use tandem_core::error::DomainError;
use tandem_core::events::{ChangeEvent, ChangeKind};
use tandem_core::value_objects::{RoomId, UserId};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::room::RoomService;

/// Memory service
pub struct MemoryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MemoryService<'a> {
    /// Create a new MemoryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Save a new memory in a room
    #[instrument(skip(self, content))]
    pub async fn add_memory(
        &self,
        room_id: RoomId,
        author: UserId,
        content: &str,
        emotion: Emotion,
    ) -> ServiceResult<Memory> {
        RoomService::new(self.ctx)
            .require_member(room_id, author)
            .await?;

        let content = content.trim();
        if content.is_empty() {
            return Err(ServiceError::validation("memory content must not be empty"));
        }
        if content.chars().count() > MEMORY_CONTENT_MAX {
            return Err(DomainError::ContentTooLong {
                max: MEMORY_CONTENT_MAX,
            }
            .into());
        }

        let memory = Memory::new(room_id, author, content, emotion);
        self.ctx.memory_repo().insert(&memory).await?;

        info!(memory_id = %memory.id, room_id = %room_id, "Memory saved");

        // The write already landed; a failed notification only delays the
        // partner's refresh until the next event.
        if let Err(e) = self
            .ctx
            .publisher()
            .publish(&ChangeEvent::MemoriesChanged {
                room_id,
                kind: ChangeKind::Insert,
            })
            .await
        {
            warn!(error = %e, room_id = %room_id, "Failed to publish memories change");
        }

        Ok(memory)
    }

    /// List a room's memories, newest first
    #[instrument(skip(self))]
    pub async fn list_memories(&self, room_id: RoomId, viewer: UserId) -> ServiceResult<Vec<Memory>> {
        RoomService::new(self.ctx)
            .require_member(room_id, viewer)
            .await?;

        Ok(self.ctx.memory_repo().find_by_room(room_id).await?)
    }
}
