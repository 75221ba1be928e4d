//! [`Query`] collection related to [`Trip`]s.

use common::operations::By;

use crate::domain::{hotel, pilot, trip, Trip};
#[cfg(doc)]
use crate::{
    domain::{Hotel, Pilot},
    Query,
};

use super::DatabaseQuery;

/// Queries a [`Trip`] by its [`trip::Id`].
pub type ById = DatabaseQuery<By<Option<Trip>, trip::Id>>;

/// Queries [`Trip`]s guided by the [`Pilot`] with the provided [`pilot::Id`].
pub type OfPilot = DatabaseQuery<By<Vec<Trip>, pilot::Id>>;

/// Queries [`Trip`]s lodged in the [`Hotel`] with the provided [`hotel::Id`].
pub type OfHotel = DatabaseQuery<By<Vec<Trip>, hotel::Id>>;
