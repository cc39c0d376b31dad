//! Aggregate roots and their pending domain events.

use std::sync::Arc;

use crate::entity::Entity;
use crate::event::DomainEvent;

/// Append-only buffer of events raised by an aggregate and not yet
/// dispatched.
///
/// The owning aggregate keeps the buffer private, records events from its
/// own behavior methods and exposes only a read-only view plus a clear
/// operation. Not synchronized: one unit of work mutates an aggregate at a
/// time.
#[derive(Debug, Default)]
pub struct DomainEventBuffer {
    events: Vec<Arc<dyn DomainEvent>>,
}

impl DomainEventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event after all previously recorded ones.
    pub fn record<E: DomainEvent>(&mut self, event: E) {
        self.events.push(Arc::new(event));
    }

    pub fn as_slice(&self) -> &[Arc<dyn DomainEvent>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// An entity that is the consistency boundary for a cluster of objects and
/// the only place domain events for that cluster are raised.
///
/// Implementors hold a private [`DomainEventBuffer`] and forward these two
/// methods to it. Recording stays an inherent, private concern of the
/// aggregate.
pub trait AggregateRoot: Entity {
    /// Returns the pending events in the order they were raised.
    fn domain_events(&self) -> &[Arc<dyn DomainEvent>];

    /// Drops all pending events. Called by the unit of work once the events
    /// have been dispatched.
    fn clear_domain_events(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityCore;
    use crate::event::EventMetadata;
    use crate::results::{Error, Result};
    use common::EntityId;

    #[derive(Debug)]
    struct Deposited {
        metadata: EventMetadata,
        amount: u64,
    }

    impl DomainEvent for Deposited {
        fn metadata(&self) -> &EventMetadata {
            &self.metadata
        }
    }

    #[derive(Debug)]
    struct Account {
        core: EntityCore,
        balance: u64,
        events: DomainEventBuffer,
    }

    impl Account {
        fn open(id: EntityId) -> Self {
            Self {
                core: EntityCore::new(id),
                balance: 0,
                events: DomainEventBuffer::new(),
            }
        }

        fn deposit(&mut self, amount: u64) -> Result {
            if amount == 0 {
                return Err(Error::validation("deposit must be positive").into());
            }
            self.balance += amount;
            self.core.mark_as_updated();
            self.events.record(Deposited {
                metadata: EventMetadata::new(),
                amount,
            });
            Ok(())
        }
    }

    impl Entity for Account {
        fn core(&self) -> &EntityCore {
            &self.core
        }
    }

    impl AggregateRoot for Account {
        fn domain_events(&self) -> &[Arc<dyn DomainEvent>] {
            self.events.as_slice()
        }

        fn clear_domain_events(&mut self) {
            self.events.clear();
        }
    }

    fn amounts(account: &Account) -> Vec<u64> {
        account
            .domain_events()
            .iter()
            .map(|event| event.downcast_ref::<Deposited>().unwrap().amount)
            .collect()
    }

    #[test]
    fn fresh_aggregate_has_no_events() {
        let account = Account::open(EntityId::new());
        assert!(account.domain_events().is_empty());
        assert!(account.updated_at().is_none());
    }

    #[test]
    fn behavior_records_events_in_call_order() {
        let mut account = Account::open(EntityId::new());
        account.deposit(10).unwrap();
        account.deposit(25).unwrap();

        assert_eq!(amounts(&account), [10, 25]);
        assert_eq!(account.balance, 35);
        assert!(account.updated_at().is_some());
    }

    #[test]
    fn clear_empties_the_view() {
        let mut account = Account::open(EntityId::new());
        account.deposit(10).unwrap();
        account.deposit(25).unwrap();

        account.clear_domain_events();

        assert!(account.domain_events().is_empty());
        account.deposit(5).unwrap();
        assert_eq!(amounts(&account), [5]);
    }

    #[test]
    fn rejected_behavior_records_nothing() {
        let mut account = Account::open(EntityId::new());
        let errors = account.deposit(0).unwrap_err();

        assert_eq!(errors.first().message(), "deposit must be positive");
        assert!(account.domain_events().is_empty());
        assert!(account.updated_at().is_none());
    }

    #[test]
    fn buffer_tracks_length() {
        let mut buffer = DomainEventBuffer::new();
        assert!(buffer.is_empty());
        buffer.record(Deposited {
            metadata: EventMetadata::new(),
            amount: 1,
        });
        assert_eq!(buffer.len(), 1);
    }
}
