//! # Event Manager
//!
//! Ordered event sink of one execution context.

use crate::domain::entities::Event;

/// Collects the events emitted in one context, in emission order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventManager {
    events: Vec<Event>,
}

impl EventManager {
    /// Creates an empty event manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one event.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Appends events, keeping their order.
    pub fn emit_events<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = Event>,
    {
        self.events.extend(events);
    }

    /// Events emitted so far.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events emitted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consumes the manager, returning its events.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emission_order_is_kept() {
        let mut manager = EventManager::new();
        assert!(manager.is_empty());

        manager.emit(Event::new("a"));
        manager.emit_events(vec![Event::new("b"), Event::new("c")]);

        let kinds: Vec<_> = manager.events().iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, ["a", "b", "c"]);
        assert_eq!(manager.len(), 3);
        assert_eq!(manager.into_events().len(), 3);
    }
}
