//! Field change notification for mutable value objects.
//!
//! Every value type routes its field writes through [`set_field`], which
//! stores the new value and tells each subscribed listener which field
//! changed. The wrappers in [`crate::wrapper`] subscribe a listener that marks
//! their cached URI text stale.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(0);

/// A change listener. Receives the identifier of the field that changed.
pub type Listener<F> = Box<dyn Fn(F) + Send + Sync>;

/// Handle returned by [`Notifier::subscribe`].
///
/// Identifiers are unique for the lifetime of the process, so a handle never
/// matches a listener on some other notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Fan-out of field change events to any number of listeners.
///
/// Cloning a notifier yields one with no listeners: listeners belong to
/// whoever owns the original value, not to its copies. Notifiers never affect
/// the equality of the value that embeds them.
pub struct Notifier<F> {
    listeners: Vec<(SubscriptionId, Listener<F>)>,
}

impl<F: Copy> Notifier<F> {
    /// Creates a notifier with no listeners.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers a listener and returns its handle.
    pub fn subscribe(&mut self, listener: impl Fn(F) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed));
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was not registered here.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Returns true if `id` is registered on this notifier.
    #[must_use]
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.listeners.iter().any(|(sid, _)| *sid == id)
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invokes every listener with `field`, in subscription order.
    pub fn notify(&self, field: F) {
        for (_, listener) in &self.listeners {
            listener(field);
        }
    }
}

impl<F: Copy> Default for Notifier<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Copy> Clone for Notifier<F> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<F> PartialEq for Notifier<F> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<F> Eq for Notifier<F> {}

impl<F> fmt::Debug for Notifier<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Writes `value` into `slot` and notifies listeners with `field`.
///
/// Returns `false`, without notifying, when `value` equals the current
/// content of `slot`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use typed_uri::notify::{set_field, Notifier};
///
/// let hits = Arc::new(AtomicUsize::new(0));
/// let mut notifier = Notifier::new();
/// let counter = Arc::clone(&hits);
/// notifier.subscribe(move |_: u8| {
///     counter.fetch_add(1, Ordering::Relaxed);
/// });
///
/// let mut slot = 1;
/// assert!(set_field(&mut slot, 2, 0, &notifier));
/// assert!(!set_field(&mut slot, 2, 0, &notifier));
/// assert_eq!(hits.load(Ordering::Relaxed), 1);
/// ```
pub fn set_field<T: PartialEq, F: Copy>(
    slot: &mut T,
    value: T,
    field: F,
    notifier: &Notifier<F>,
) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    notifier.notify(field);
    true
}
