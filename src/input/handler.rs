use crate::prelude::HashMap;

/// Events that can be routed through an [`EventManager`]
pub trait EventKind {
    /// Name listeners subscribe to
    fn event_type(&self) -> &'static str;
}

/// Handle returned by [`EventManager::on`], needed to unregister the listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerKey {
    event_type: &'static str,
    id: u64,
}

impl ListenerKey {
    pub fn event_type(&self) -> &'static str {
        self.event_type
    }
}

type EventCallback<E, C> = Box<dyn FnMut(&E, &mut C)>;

/// Keyed listener registry
///
/// Listeners receive the event plus a mutable context supplied at dispatch
/// time. Every registration yields a [`ListenerKey`]; a listener stays
/// installed until its key is passed back to [`EventManager::un_by_key`].
pub struct EventManager<E, C> {
    /// Event listeners by event type, in registration order
    listeners: HashMap<&'static str, Vec<(u64, EventCallback<E, C>)>>,
    next_id: u64,
}

impl<E: EventKind, C> EventManager<E, C> {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::default(),
            next_id: 0,
        }
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &'static str, callback: F) -> ListenerKey
    where
        F: FnMut(&E, &mut C) + 'static,
    {
        self.next_id += 1;
        let id = self.next_id;
        self.listeners
            .entry(event_type)
            .or_default()
            .push((id, Box::new(callback)));
        ListenerKey { event_type, id }
    }

    /// Unregister the listener behind `key`; returns whether it was installed
    pub fn un_by_key(&mut self, key: &ListenerKey) -> bool {
        let Some(callbacks) = self.listeners.get_mut(key.event_type) else {
            return false;
        };
        let before = callbacks.len();
        callbacks.retain(|(id, _)| *id != key.id);
        let removed = callbacks.len() != before;
        if callbacks.is_empty() {
            self.listeners.remove(key.event_type);
        }
        removed
    }

    /// Unregister every listener in `keys`
    pub fn un_by_keys(&mut self, keys: &[ListenerKey]) -> usize {
        keys.iter().filter(|key| self.un_by_key(key)).count()
    }

    /// Calls the listeners of `event` right away, returns how many ran
    pub fn dispatch(&mut self, event: &E, context: &mut C) -> usize {
        match self.listeners.get_mut(event.event_type()) {
            Some(callbacks) => {
                for (_, callback) in callbacks.iter_mut() {
                    callback(event, context);
                }
                callbacks.len()
            }
            None => 0,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    pub fn listener_count_for(&self, event_type: &str) -> usize {
        self.listeners.get(event_type).map_or(0, Vec::len)
    }

    /// Drops every listener
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl<E: EventKind, C> Default for EventManager<E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EventKind, C> std::fmt::Debug for EventManager<E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("event_types", &self.listeners.keys().collect::<Vec<_>>())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
