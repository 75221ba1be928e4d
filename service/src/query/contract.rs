//! [`Query`] collection related to a single [`Contract`].

use common::operations::By;

use crate::domain::{contract, Contract};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Contract`] by its [`contract::Number`].
pub type ByNumber<'n> =
    DatabaseQuery<By<Option<Contract>, &'n contract::Number>>;
