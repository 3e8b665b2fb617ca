use serde::{Deserialize, Serialize};
use tracing::trace;

use super::ViewSession;

/// What changed since the last render request was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderTopic {
    Domain,
    Data,
    Tracking,
    PaneLayout,
}

impl RenderTopic {
    const fn bit(self) -> u8 {
        match self {
            Self::Domain => 1 << 0,
            Self::Data => 1 << 1,
            Self::Tracking => 1 << 2,
            Self::PaneLayout => 1 << 3,
        }
    }
}

/// Bitmask of render topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RenderTopics {
    bits: u8,
}

impl RenderTopics {
    const ALL_BITS: u8 = RenderTopic::Domain.bit()
        | RenderTopic::Data.bit()
        | RenderTopic::Tracking.bit()
        | RenderTopic::PaneLayout.bit();

    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            bits: Self::ALL_BITS,
        }
    }

    #[must_use]
    pub const fn from_topic(topic: RenderTopic) -> Self {
        Self { bits: topic.bit() }
    }

    #[must_use]
    pub const fn with_topic(self, topic: RenderTopic) -> Self {
        Self {
            bits: self.bits | topic.bit(),
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn contains_topic(self, topic: RenderTopic) -> bool {
        (self.bits & topic.bit()) != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }
}

/// One coalesced request covering every mutation since the previous take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub topics: RenderTopics,
    /// State generation the request was raised for.
    pub generation: u64,
    /// Number of mutations folded into this request.
    pub mutations: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub(super) struct PendingRender {
    topics: RenderTopics,
    mutations: u32,
}

impl ViewSession {
    pub(super) fn request_render(&mut self, topic: RenderTopic) {
        self.pending_render.topics = self.pending_render.topics.with_topic(topic);
        self.pending_render.mutations = self.pending_render.mutations.saturating_add(1);
        trace!(
            ?topic,
            mutations = self.pending_render.mutations,
            "render request coalesced"
        );
    }

    #[must_use]
    pub fn has_pending_render(&self) -> bool {
        !self.pending_render.topics.is_none()
    }

    #[must_use]
    pub fn pending_render_topics(&self) -> RenderTopics {
        self.pending_render.topics
    }

    /// Takes the pending request, leaving nothing pending.
    #[must_use]
    pub fn take_render_request(&mut self) -> Option<RenderRequest> {
        if self.pending_render.topics.is_none() {
            return None;
        }
        let pending = std::mem::take(&mut self.pending_render);
        Some(RenderRequest {
            topics: pending.topics,
            generation: self.state.generation(),
            mutations: pending.mutations,
        })
    }
}
