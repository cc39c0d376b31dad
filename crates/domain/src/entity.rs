//! Identity-bearing domain objects.

use std::any::Any;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use common::EntityId;
use serde::Serialize;
use thiserror::Error;

/// Exposes a value as `&dyn Any` so trait objects can report and
/// downcast to their concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Returned by [`EntityCore::restore`] when the stored timestamps are out of
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("entity {id} was updated at {updated_at} before it was created at {created_at}")]
pub struct UpdatedBeforeCreated {
    pub id: EntityId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity and audit timestamps embedded in every entity.
///
/// Equality and hashing consider the id only. Entity types delegate their
/// own `PartialEq`/`Hash` to this value.
///
/// `updated_at` has two writers: [`EntityCore::mark_as_updated`], which only
/// stamps the current time, and [`EntityCore::restore`] for rehydrating a
/// stored entity. The core implements `Serialize` but not `Deserialize`;
/// stored cores are loaded with `restore`.
#[derive(Debug, Clone, Serialize)]
pub struct EntityCore {
    id: EntityId,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl EntityCore {
    /// Creates the core for a new entity, stamped with the current time.
    pub fn new(id: EntityId) -> Self {
        Self::with_created_at(id, Utc::now())
    }

    /// Creates the core with an explicit creation time.
    pub fn with_created_at(id: EntityId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            updated_at: None,
        }
    }

    /// Rebuilds the core of a persisted entity.
    ///
    /// Fails if `updated_at` is earlier than `created_at`.
    pub fn restore(
        id: EntityId,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Result<Self, UpdatedBeforeCreated> {
        if let Some(updated_at) = updated_at.filter(|updated_at| *updated_at < created_at) {
            return Err(UpdatedBeforeCreated {
                id,
                created_at,
                updated_at,
            });
        }
        Ok(Self {
            id,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the entity last changed; `None` until the first change.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Records that the owning entity has just changed state.
    ///
    /// Only the entity's own behavior methods should call this, after the
    /// change has been applied. Entities keep their core private so no
    /// other code can reach it mutably.
    pub fn mark_as_updated(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

impl PartialEq for EntityCore {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityCore {}

impl Hash for EntityCore {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A domain object defined by its identity rather than its attributes.
///
/// Two `dyn Entity` values are equal when they are the same object, or
/// when they have the same concrete type and the same id.
pub trait Entity: AsAny + Send + Sync {
    /// Returns the embedded identity and timestamps.
    fn core(&self) -> &EntityCore;

    fn id(&self) -> EntityId {
        self.core().id()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.core().created_at()
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.core().updated_at()
    }
}

impl dyn Entity {
    /// Compares by concrete type and id.
    pub fn same_identity(&self, other: &dyn Entity) -> bool {
        if std::ptr::addr_eq(self, other) {
            return true;
        }
        self.as_any().type_id() == other.as_any().type_id() && self.id() == other.id()
    }
}

impl PartialEq for dyn Entity {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other)
    }
}

impl Eq for dyn Entity {}

impl Hash for dyn Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}
