//! [`Query`] collection related to a single [`Pilot`].

use common::operations::By;

use crate::domain::{pilot, Pilot};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Pilot`] by its [`pilot::Id`].
pub type ById = DatabaseQuery<By<Option<Pilot>, pilot::Id>>;

/// Queries a [`Pilot`] by its [`pilot::LicenseNumber`].
pub type ByLicense<'n> =
    DatabaseQuery<By<Option<Pilot>, &'n pilot::LicenseNumber>>;
