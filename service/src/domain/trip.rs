//! [`Trip`] definitions.

use common::{define_kind, Period};
use derive_more::{Display, Error as StdError, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{contact::Text, hotel, offer, pilot, ErrorKind};
#[cfg(doc)]
use crate::domain::{Hotel, Offer, Pilot};

/// Actual journey realizing an [`Offer`], guided by a [`Pilot`] and lodged
/// in a [`Hotel`].
#[derive(Clone, Debug)]
pub struct Trip {
    /// ID of this [`Trip`].
    pub id: Id,

    /// ID of the [`Offer`] this [`Trip`] realizes.
    pub offer_id: offer::Id,

    /// ID of the [`Pilot`] guiding this [`Trip`], if assigned.
    pub pilot_id: Option<pilot::Id>,

    /// ID of the [`Hotel`] lodging this [`Trip`], if assigned.
    pub hotel_id: Option<hotel::Id>,

    /// [`Period`] of this [`Trip`].
    pub period: Period,

    /// Number of participants.
    pub participants: u32,

    /// [`Status`] of this [`Trip`].
    pub status: Status,

    /// Notes of this [`Trip`], if any.
    pub notes: Option<Text>,
}

impl Trip {
    /// Plans a new [`Trip`] of the provided [`Offer`] within the provided
    /// [`Period`].
    #[must_use]
    pub fn new(offer_id: offer::Id, period: Period) -> Self {
        Self {
            id: Id::new(),
            offer_id,
            pilot_id: None,
            hotel_id: None,
            period,
            participants: 0,
            status: Status::Planned,
            notes: None,
        }
    }

    /// Indicates whether this [`Trip`] still occupies its [`Pilot`] and
    /// [`Hotel`].
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        matches!(self.status, Status::Planned | Status::InProgress)
    }

    /// Indicates whether this [`Trip`] is [`Status::Completed`].
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Starts this [`Status::Planned`] [`Trip`].
    ///
    /// # Errors
    ///
    /// If this [`Trip`] is not [`Status::Planned`].
    pub fn start(&mut self) -> Result<(), Error> {
        self.advance(Status::Planned, Status::InProgress)
    }

    /// Completes this [`Status::InProgress`] [`Trip`].
    ///
    /// # Errors
    ///
    /// If this [`Trip`] is not [`Status::InProgress`].
    pub fn complete(&mut self) -> Result<(), Error> {
        self.advance(Status::InProgress, Status::Completed)
    }

    /// Lodges this [`Trip`] in the provided [`Hotel`].
    ///
    /// # Errors
    ///
    /// If this [`Trip`] is completed already.
    pub fn lodge(&mut self, hotel_id: hotel::Id) -> Result<(), Error> {
        self.ensure_scheduled()?;
        self.hotel_id = Some(hotel_id);
        Ok(())
    }

    /// Removes the [`Pilot`] from this [`Trip`], returning their ID.
    ///
    /// # Errors
    ///
    /// If this [`Trip`] is completed already.
    pub fn unassign_pilot(&mut self) -> Result<Option<pilot::Id>, Error> {
        self.ensure_scheduled()?;
        Ok(self.pilot_id.take())
    }

    /// Ensures this [`Trip`] has not been completed.
    pub(crate) fn ensure_scheduled(&self) -> Result<(), Error> {
        if self.is_scheduled() {
            Ok(())
        } else {
            Err(Error::Completed(self.id))
        }
    }

    /// Moves this [`Trip`] from the `from` [`Status`] to the `to` one.
    fn advance(&mut self, from: Status, to: Status) -> Result<(), Error> {
        if self.status != from {
            return Err(Error::Transition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// ID of a [`Trip`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Status of a [`Trip`]."]
    enum Status {
        #[doc = "[`Trip`] is yet to start."]
        Planned = 1,

        #[doc = "[`Trip`] is going on."]
        InProgress = 2,

        #[doc = "[`Trip`] is over."]
        Completed = 3,
    }
}

/// Error of a [`Trip`] operation.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Trip`] is completed already.
    #[display("`Trip(id: {_0})` is completed already")]
    Completed(#[error(not(source))] Id),

    /// [`Trip`] cannot move to the requested [`Status`].
    #[display("`Trip` cannot move from {from} to {to}")]
    Transition {
        /// Current [`Status`].
        from: Status,

        /// Requested [`Status`].
        to: Status,
    },
}

impl Error {
    /// Returns [`ErrorKind`] of this [`Error`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Completed(_) | Self::Transition { .. } => ErrorKind::State,
        }
    }
}

#[cfg(test)]
pub(crate) mod spec {
    use common::Period;

    use crate::domain::{hotel, offer, offer::spec::today, ErrorKind};

    use super::{Error, Status, Trip};

    /// [`Period`] starting `from` days after [`today()`] and lasting `days`
    /// days.
    pub(crate) fn period(from: i64, days: i64) -> Period {
        let start = today().checked_add_days(from).unwrap();
        Period::new(start, start.checked_add_days(days - 1).unwrap()).unwrap()
    }

    /// [`Trip`] within the [`period()`] of the provided bounds.
    pub(crate) fn trip(from: i64, days: i64) -> Trip {
        Trip::new(offer::Id::new(), period(from, days))
    }

    #[test]
    fn plans_new_trip() {
        let t = trip(10, 7);

        assert_eq!(t.status, Status::Planned);
        assert_eq!(t.participants, 0);
        assert!(t.pilot_id.is_none());
        assert!(t.is_scheduled());
    }

    #[test]
    fn moves_forward_only() {
        let mut t = trip(10, 7);

        assert!(matches!(
            t.complete(),
            Err(Error::Transition {
                from: Status::Planned,
                to: Status::Completed,
            }),
        ));

        t.start().unwrap();
        assert_eq!(t.status, Status::InProgress);
        assert!(t.is_scheduled());
        assert_eq!(t.start().unwrap_err().kind(), ErrorKind::State);

        t.complete().unwrap();
        assert!(t.is_completed());
        assert!(!t.is_scheduled());
        assert!(t.start().is_err());
        assert!(t.complete().is_err());
    }

    #[test]
    fn completed_trip_keeps_its_staff() {
        let mut t = trip(10, 7);
        t.start().unwrap();
        t.complete().unwrap();

        assert!(matches!(t.unassign_pilot(), Err(Error::Completed(_))));
        assert!(t.lodge(hotel::Id::new()).is_err());
        assert!(t.hotel_id.is_none());
    }

    #[test]
    fn lodges_scheduled_trip() {
        let mut t = trip(10, 7);
        let hotel = hotel::Id::new();

        t.lodge(hotel).unwrap();
        assert_eq!(t.hotel_id, Some(hotel));
        assert_eq!(t.unassign_pilot().unwrap(), None);
    }

    #[test]
    fn status_names() {
        assert_eq!(Status::InProgress.to_string(), "IN_PROGRESS");
    }
}
