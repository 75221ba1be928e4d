//! [`Query`] collection related to a single [`Client`].

use common::operations::By;

use crate::domain::{client, Client};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Client`] by its [`client::Id`].
pub type ById = DatabaseQuery<By<Option<Client>, client::Id>>;

/// Queries a [`Client`] by its [`client::NationalId`].
pub type ByNationalId<'n> =
    DatabaseQuery<By<Option<Client>, &'n client::NationalId>>;
