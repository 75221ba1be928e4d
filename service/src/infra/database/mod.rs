//! [`Database`] collaborator persisting the domain aggregates.

#[cfg(feature = "memory")]
pub mod memory;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "memory")]
pub use self::memory::Memory;

/// Storage operation from [`common::operations`] over the domain aggregates.
pub use common::Handler as Database;

/// Error of a [`Database`] operation, whatever its storage backend.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "memory")]
    /// [`Memory`] storage error.
    Memory(memory::Error),
}
