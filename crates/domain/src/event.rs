//! Domain event contract.

use std::any::TypeId;
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use common::EventId;
use serde::{Deserialize, Serialize};

use crate::entity::AsAny;

/// Identity and timestamp carried by every domain event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    event_id: EventId,
    occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Creates metadata for an event occurring now.
    pub fn new() -> Self {
        Self::with(EventId::new(), Utc::now())
    }

    pub fn with(event_id: EventId, occurred_at: DateTime<Utc>) -> Self {
        Self {
            event_id,
            occurred_at,
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// An immutable fact about something that happened to an aggregate.
///
/// Events should be named in past tense. Concrete events embed an
/// [`EventMetadata`] next to their own payload fields.
pub trait DomainEvent: AsAny + Debug + Send + Sync {
    fn metadata(&self) -> &EventMetadata;

    fn event_id(&self) -> EventId {
        self.metadata().event_id()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.metadata().occurred_at()
    }

    /// Returns the event type name used in logs and metrics.
    fn event_type(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl dyn DomainEvent {
    /// Returns the `TypeId` of the concrete event type.
    pub fn concrete_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    pub fn downcast_ref<E: DomainEvent>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }
}
