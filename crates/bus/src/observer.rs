//! Observer registry.
//!
//! Observers are stored by value per subject, so `O` is usually a handle
//! (an entity id, an `Rc`, a channel sender). Membership per subject is
//! at-most-once, judged by `PartialEq`.

use std::collections::HashMap;

/// Receives notifications for subjects it is registered on.
pub trait Observer<M: ?Sized> {
    fn notify(&mut self, subject: &str, message: &M);
}

#[derive(Debug)]
pub struct ObserverManager<O> {
    subjects: HashMap<String, Vec<O>>,
}

impl<O> Default for ObserverManager<O> {
    fn default() -> Self {
        Self {
            subjects: HashMap::new(),
        }
    }
}

impl<O: PartialEq> ObserverManager<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer` on `subject`. Returns `false` if it already was.
    pub fn register_observer(&mut self, subject: &str, observer: O) -> bool {
        let list = self.subjects.entry(subject.to_string()).or_default();
        if list.contains(&observer) {
            return false;
        }
        list.push(observer);
        true
    }

    /// Returns `false` if `observer` was not registered on `subject`.
    pub fn unregister_observer(&mut self, subject: &str, observer: &O) -> bool {
        let Some(list) = self.subjects.get_mut(subject) else {
            return false;
        };
        let Some(pos) = list.iter().position(|o| o == observer) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.subjects.remove(subject);
        }
        true
    }

    /// Drop `observer` from every subject.
    pub fn unregister_everywhere(&mut self, observer: &O) -> usize {
        let mut removed = 0;
        self.subjects.retain(|_, list| {
            let before = list.len();
            list.retain(|o| o != observer);
            removed += before - list.len();
            !list.is_empty()
        });
        removed
    }

    /// Observers of `subject`, in registration order.
    pub fn observers(&self, subject: &str) -> &[O] {
        self.subjects.get(subject).map_or(&[], Vec::as_slice)
    }

    pub fn is_registered(&self, subject: &str, observer: &O) -> bool {
        self.observers(subject).contains(observer)
    }

    pub fn clear(&mut self) {
        self.subjects.clear();
    }

    /// Notify every observer of `subject` in registration order, on the
    /// calling thread. Returns how many were notified.
    pub fn notify_observers<M: ?Sized>(&mut self, subject: &str, message: &M) -> usize
    where
        O: Observer<M>,
    {
        let Some(list) = self.subjects.get_mut(subject) else {
            return 0;
        };
        for observer in list.iter_mut() {
            observer.notify(subject, message);
        }
        list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        id: u32,
        log: Log,
    }

    impl PartialEq for Recorder {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    impl Observer<str> for Recorder {
        fn notify(&mut self, subject: &str, message: &str) {
            self.log
                .borrow_mut()
                .push(format!("{}:{subject}:{message}", self.id));
        }
    }

    fn recorder(id: u32, log: &Log) -> Recorder {
        Recorder {
            id,
            log: Rc::clone(log),
        }
    }

    #[test]
    fn notifies_in_registration_order() {
        let log = Log::default();
        let mut mgr = ObserverManager::new();
        assert!(mgr.register_observer("door", recorder(2, &log)));
        assert!(mgr.register_observer("door", recorder(1, &log)));

        assert_eq!(mgr.notify_observers("door", "open"), 2);
        assert_eq!(*log.borrow(), ["2:door:open", "1:door:open"]);
    }

    #[test]
    fn duplicate_registration_is_noop() {
        let log = Log::default();
        let mut mgr = ObserverManager::new();
        assert!(mgr.register_observer("s", recorder(1, &log)));
        assert!(!mgr.register_observer("s", recorder(1, &log)));
        assert_eq!(mgr.notify_observers("s", "m"), 1);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn unregister_and_unknown_subjects() {
        let log = Log::default();
        let mut mgr = ObserverManager::new();
        mgr.register_observer("s", recorder(1, &log));
        mgr.register_observer("t", recorder(1, &log));

        assert!(mgr.unregister_observer("s", &recorder(1, &log)));
        assert!(!mgr.unregister_observer("s", &recorder(1, &log)));
        assert_eq!(mgr.notify_observers("s", "m"), 0);
        assert_eq!(mgr.notify_observers("nobody", "m"), 0);

        assert_eq!(mgr.unregister_everywhere(&recorder(1, &log)), 1);
        assert!(mgr.observers("t").is_empty());
    }

    #[test]
    fn id_handles_work_without_observer_impl() {
        let mut mgr: ObserverManager<u64> = ObserverManager::new();
        mgr.register_observer("s", 7);
        mgr.register_observer("s", 3);
        assert_eq!(mgr.observers("s"), [7, 3]);
        assert!(mgr.is_registered("s", &3));
    }
}
