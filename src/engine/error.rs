//! Error taxonomy for the engine.
//!
//! Only caller bugs are errors here.  Geometry requests are clamped and input
//! edge cases are absorbed by state-machine guards, so neither shows up.

use thiserror::Error;

use super::component::{ComponentId, ManagerId};

/// Failures that surface synchronously to the embedding frame loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    /// The component is still owned by another manager.
    #[error("component {component} is owned by manager {owner}, cannot register with manager {requested}")]
    OwnershipConflict {
        component: ComponentId,
        owner: ManagerId,
        requested: ManagerId,
    },

    /// A manager-dependent resource was requested before registration.
    #[error("component {component} is not attached to a manager ({operation})")]
    NotAttached {
        component: ComponentId,
        operation: &'static str,
    },

    /// The component already reached its terminal lifecycle state.
    #[error("component {component} has been closed and cannot be opened again")]
    AlreadyClosed { component: ComponentId },

    /// Padding/spacing shorthand with an unsupported element count.
    #[error("shorthand takes 1 to {max} values, got {len}")]
    Shorthand { len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, UiError>;

/// A registration that failed.  Hands the component back so the caller can
/// inspect or retry it.
pub struct Rejected<T: ?Sized> {
    pub error: UiError,
    pub component: Box<T>,
}

impl<T: ?Sized> std::fmt::Debug for Rejected<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T: ?Sized> std::fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.error, f)
    }
}

impl<T: ?Sized> std::error::Error for Rejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T: ?Sized> From<Rejected<T>> for UiError {
    fn from(rejected: Rejected<T>) -> Self {
        rejected.error
    }
}
