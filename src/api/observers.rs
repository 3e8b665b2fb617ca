use serde::{Deserialize, Serialize};

use crate::core::TimeDomain;
use crate::error::{ChartError, ChartResult};

use super::{ViewSession, ViewState};

/// Event stream exposed to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewEvent {
    DomainChanged(TimeDomain),
    DataReplaced { candles_len: usize },
    DataUpdated { candles_len: usize },
    TrackingLatestToggled(bool),
    FeedError(String),
    FeedClosed,
}

/// Hook interface for code that mirrors the shared view.
///
/// Observers read the committed state and never mutate it; a domain change
/// they want to make goes back through the session's update methods.
pub trait ViewObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &ViewEvent, state: &ViewState);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

pub(super) type DomainCallback = Box<dyn FnMut(TimeDomain)>;

impl ViewSession {
    /// Registers an observer with unique identifier.
    pub fn register_observer(&mut self, observer: Box<dyn ViewObserver>) -> ChartResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(ChartError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(&observer_id) {
            return Err(ChartError::InvalidData(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }
        self.observers.push(observer);
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        if let Some(position) = self
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            self.observers.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }

    /// Calls `callback` with every committed domain.
    pub fn on_domain_changed<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(TimeDomain) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push((id, Box::new(callback)));
        id
    }

    /// Drops a closure subscription. Returns `true` when removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|(entry, _)| *entry != id);
        self.subscriptions.len() != before
    }

    pub(super) fn emit(&mut self, event: ViewEvent) {
        if let ViewEvent::DomainChanged(domain) = event {
            for (_, callback) in &mut self.subscriptions {
                callback(domain);
            }
        }
        for observer in &mut self.observers {
            observer.on_event(&event, &self.state);
        }
    }
}
