//! Filesystem primitives with explicit state (check + apply pattern).
pub mod fs;
pub mod symlink;

/// State of a filesystem resource.
///
/// # Examples
///
/// ```
/// use dotctl::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "points to /other".into() };
///
/// assert_ne!(missing, correct);
/// assert_ne!(wrong, correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists at the destination.
    Missing,
    /// The destination already matches the desired state.
    Correct,
    /// Something else exists at the destination.
    Incorrect {
        /// What currently occupies the destination.
        current: String,
    },
    /// The destination cannot be replaced automatically.
    Invalid {
        /// Why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying or removing a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// The filesystem was changed.
    Applied,
    /// Nothing needed to change.
    Skipped {
        /// Why nothing changed.
        reason: String,
    },
}
