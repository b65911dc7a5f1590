//! # Ambient navigation seam
//!
//! The shell never talks to a browser directly. It reads the current
//! location and pushes history entries through [`LocationSource`], and hosts
//! that can surface back/forward or hash-change events expose them through
//! [`NavigationEvents`], which supports explicit listener removal so a shell
//! can be torn down cleanly.
//!
//! [`MemoryLocation`] plus [`SharedLocation`] / [`MemoryNavigator`] form a
//! complete in-memory implementation of both seams for headless hosts and
//! tests, including synthetic back-navigation and hash-change delivery.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Read access to the ambient location plus the single history mutation
/// primitive the shell needs.
pub trait LocationSource {
    /// Current path component, e.g. `/inbox/42`.
    fn path(&self) -> String;

    /// Current hash component including the leading `#`; empty when absent.
    fn hash(&self) -> String;

    /// Current search component including the leading `?`; empty when absent.
    fn search(&self) -> String;

    /// Push a new history entry without reloading.
    fn push(&mut self, url: &str);
}

/// The two navigation event classes the shell binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationEventKind {
    /// Back/forward traversal of the history stack.
    PopState,
    /// A change to the hash component only.
    HashChange,
}

/// Opaque handle to a registered navigation listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A registered navigation callback.
pub type NavigationListener = Box<dyn FnMut() + Send>;

/// Registrable navigation callbacks with explicit removal.
pub trait NavigationEvents {
    /// Register a listener for one event kind.
    fn add_listener(&mut self, kind: NavigationEventKind, listener: NavigationListener)
        -> ListenerId;

    /// Remove a previously registered listener. Returns false when the id is
    /// unknown (already removed).
    fn remove_listener(&mut self, id: ListenerId) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    path: String,
    search: String,
    hash: String,
}

impl Entry {
    fn parse(url: &str) -> Self {
        // The hash owns everything after `#`, including any embedded `?`.
        let (rest, hash) = match url.find('#') {
            Some(i) => (&url[..i], &url[i..]),
            None => (url, ""),
        };
        let (path, search) = match rest.find('?') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };
        Self {
            path: path.to_string(),
            search: search.to_string(),
            hash: hash.to_string(),
        }
    }
}

/// In-memory location for headless hosts and tests.
///
/// Implements [`LocationSource`] with a real back stack: [`push`] records the
/// current entry before replacing it, and [`MemoryLocation::pop_back`]
/// restores it.
///
/// [`push`]: LocationSource::push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryLocation {
    current: Entry,
    back_stack: Vec<Entry>,
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::at("/")
    }
}

impl MemoryLocation {
    /// A location at the root path with no search or hash.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A location parsed from a full `path?search#hash` url.
    #[must_use]
    pub fn at(url: &str) -> Self {
        Self {
            current: Entry::parse(url),
            back_stack: Vec::new(),
        }
    }

    /// Replace the current entry without touching the history stack.
    pub fn assign(&mut self, url: &str) {
        self.current = Entry::parse(url);
    }

    /// Replace only the hash component. Pass the leading `#` (or an empty
    /// string to clear it).
    pub fn set_hash(&mut self, hash: &str) {
        self.current.hash = hash.to_string();
    }

    /// Restore the previous history entry, if any.
    pub fn pop_back(&mut self) -> bool {
        match self.back_stack.pop() {
            Some(entry) => {
                self.current = entry;
                true
            }
            None => false,
        }
    }

    /// Depth of the back stack.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.back_stack.len()
    }
}

impl LocationSource for MemoryLocation {
    fn path(&self) -> String {
        self.current.path.clone()
    }

    fn hash(&self) -> String {
        self.current.hash.clone()
    }

    fn search(&self) -> String {
        self.current.search.clone()
    }

    fn push(&mut self, url: &str) {
        self.back_stack.push(self.current.clone());
        self.current = Entry::parse(url);
    }
}

/// Clonable handle to a [`MemoryLocation`] shared between a shell and the
/// host that fires navigation events at it.
#[derive(Clone, Default)]
pub struct SharedLocation(Arc<Mutex<MemoryLocation>>);

impl SharedLocation {
    /// Wrap a location for shared use.
    #[must_use]
    pub fn new(location: MemoryLocation) -> Self {
        Self(Arc::new(Mutex::new(location)))
    }

    /// Run a closure against the underlying location. The lock is held only
    /// for the duration of the closure; never fire listeners from inside it.
    pub fn with<R>(&self, f: impl FnOnce(&mut MemoryLocation) -> R) -> R {
        f(&mut self.0.lock())
    }
}

impl fmt::Debug for SharedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedLocation").field(&*self.0.lock()).finish()
    }
}

impl LocationSource for SharedLocation {
    fn path(&self) -> String {
        self.0.lock().path()
    }

    fn hash(&self) -> String {
        self.0.lock().hash()
    }

    fn search(&self) -> String {
        self.0.lock().search()
    }

    fn push(&mut self, url: &str) {
        self.0.lock().push(url);
    }
}

struct ListenerEntry {
    id: ListenerId,
    kind: NavigationEventKind,
    listener: NavigationListener,
}

/// In-memory [`NavigationEvents`] source driving a [`SharedLocation`].
///
/// `pop_back` and `set_hash` mutate the location under a short-lived lock and
/// then run the matching listeners with the lock released, so a listener may
/// itself read the location (as the shell's navigation handler does).
pub struct MemoryNavigator {
    location: SharedLocation,
    listeners: Vec<ListenerEntry>,
    next_id: u64,
}

impl MemoryNavigator {
    /// A navigator over the given shared location.
    #[must_use]
    pub fn new(location: SharedLocation) -> Self {
        Self {
            location,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Another handle to the shared location, e.g. to hand to a shell.
    #[must_use]
    pub fn location(&self) -> SharedLocation {
        self.location.clone()
    }

    /// Simulate back navigation: restore the previous history entry and fire
    /// the pop-state listeners. Does nothing on an empty history stack.
    pub fn pop_back(&mut self) -> bool {
        let popped = self.location.with(MemoryLocation::pop_back);
        if popped {
            self.fire(NavigationEventKind::PopState);
        }
        popped
    }

    /// Simulate a hash change and fire the hash-change listeners.
    pub fn set_hash(&mut self, hash: &str) {
        self.location.with(|location| location.set_hash(hash));
        self.fire(NavigationEventKind::HashChange);
    }

    fn fire(&mut self, kind: NavigationEventKind) {
        for entry in &mut self.listeners {
            if entry.kind == kind {
                (entry.listener)();
            }
        }
    }
}

impl fmt::Debug for MemoryNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryNavigator")
            .field("location", &self.location)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl NavigationEvents for MemoryNavigator {
    fn add_listener(
        &mut self,
        kind: NavigationEventKind,
        listener: NavigationListener,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(ListenerEntry { id, kind, listener });
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|entry| entry.id != id);
        self.listeners.len() < before
    }
}
