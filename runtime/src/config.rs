//! Configuration for Store instances.

/// Default bound on synchronous re-entrant dispatch
pub const DEFAULT_MAX_DISPATCH_DEPTH: usize = 64;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use composable_flux_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_name("todos")
///     .with_max_dispatch_depth(16);
///
/// assert_eq!(config.name, "todos");
/// assert_eq!(config.max_dispatch_depth, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Name recorded on every dispatch span
    pub name: String,
    /// Maximum nesting of synchronous dispatch calls
    ///
    /// A thunk dispatching from inside a dispatch, or a subscriber that
    /// dispatches, nests one level deeper. Delayed continuations start again
    /// at depth zero.
    pub max_dispatch_depth: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub fn new(name: impl Into<String>, max_dispatch_depth: usize) -> Self {
        Self {
            name: name.into(),
            max_dispatch_depth,
        }
    }

    /// Set the store name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the dispatch depth limit
    #[must_use]
    pub fn with_max_dispatch_depth(mut self, depth: usize) -> Self {
        self.max_dispatch_depth = depth;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store".to_string(),
            max_dispatch_depth: DEFAULT_MAX_DISPATCH_DEPTH,
        }
    }
}
