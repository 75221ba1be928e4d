//! [`Query`] collection related to [`Hotel`]s.

use common::operations::By;

use crate::domain::{hotel, Hotel};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Hotel`] by its [`hotel::Id`].
pub type ById = DatabaseQuery<By<Option<Hotel>, hotel::Id>>;

/// Queries all the [`Hotel`]s.
pub type All = DatabaseQuery<By<Vec<Hotel>, ()>>;
