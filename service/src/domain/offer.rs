//! [`Offer`] definitions.

use common::{define_kind, unit, Date, DateOf, Money, Percent, Period};
use derive_more::{AsRef, Display, Error as StdError, From, FromStr, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing as log;
use uuid::Uuid;

use crate::domain::{contact::Text, Contract, Country, ErrorKind};

/// Discount granted to groups of at least [`GROUP_SIZE`] participants.
pub const GROUP_DISCOUNT: Percent = Percent::saturating(5);

/// Minimal number of participants to get the [`GROUP_DISCOUNT`].
pub const GROUP_SIZE: u32 = 10;

/// Discount granted when booking at least [`EARLY_BOOKING_DAYS`] before the
/// departure.
pub const EARLY_BOOKING_DISCOUNT: Percent = Percent::saturating(3);

/// Minimal number of days before the departure to get the
/// [`EARLY_BOOKING_DISCOUNT`].
pub const EARLY_BOOKING_DAYS: i64 = 60;

/// Tourism package sold by the agency.
#[derive(Clone, Debug)]
pub struct Offer {
    /// ID of this [`Offer`].
    pub id: Id,

    /// [`Name`] of this [`Offer`].
    pub name: Name,

    /// Description of this [`Offer`], if any.
    pub description: Option<Text>,

    /// [`Country`] this [`Offer`] goes to.
    pub country: Country,

    /// [`Kind`] of the trip, if specified.
    pub kind: Option<Kind>,

    /// [`Date`] of the departure.
    pub departure: DepartureDate,

    /// [`Date`] of the return.
    pub return_date: ReturnDate,

    /// Price per participant.
    pub price: Money,

    /// Maximal number of participants.
    pub max_participants: u32,

    /// Number of seats still available for booking.
    ///
    /// Never exceeds [`Offer::max_participants`].
    pub remaining_seats: u32,

    /// [`Status`] of this [`Offer`].
    pub status: Status,

    /// [`Date`] when this [`Offer`] was created.
    pub created_on: CreationDate,
}

/// Parameters of a new [`Offer`].
#[derive(Clone, Debug)]
pub struct Draft {
    /// [`Name`] of the [`Offer`].
    pub name: Name,

    /// Description of the [`Offer`], if any.
    pub description: Option<Text>,

    /// [`Country`] the [`Offer`] goes to.
    pub country: Country,

    /// [`Kind`] of the trip, if specified.
    pub kind: Option<Kind>,

    /// [`Date`] of the departure.
    pub departure: DepartureDate,

    /// [`Date`] of the return.
    pub return_date: ReturnDate,

    /// Price per participant.
    pub price: Money,

    /// Maximal number of participants.
    pub max_participants: u32,
}

impl Offer {
    /// Creates a new [`Status::Active`] [`Offer`] out of the provided
    /// [`Draft`] with all seats available.
    ///
    /// # Errors
    ///
    /// If the [`Draft`] describes a trip in the past, with reversed dates,
    /// without seats or with a non-positive price.
    pub fn new(draft: Draft, today: Date) -> Result<Self, Error> {
        let Draft {
            name,
            description,
            country,
            kind,
            departure,
            return_date,
            price,
            max_participants,
        } = draft;

        if departure.coerce::<()>() > return_date.coerce() {
            return Err(Error::ReturnBeforeDeparture);
        }
        if departure.coerce() < today {
            return Err(Error::DepartureInPast(departure));
        }
        if !price.is_positive() {
            return Err(Error::InvalidPrice(price));
        }
        if max_participants == 0 {
            return Err(Error::NoSeats);
        }

        Ok(Self {
            id: Id::new(),
            name,
            description,
            country,
            kind,
            departure,
            return_date,
            price,
            max_participants,
            remaining_seats: max_participants,
            status: Status::Active,
            created_on: today.coerce(),
        })
    }

    /// Indicates whether this [`Offer`] departs before the provided `today`.
    #[must_use]
    pub fn has_departed(&self, today: Date) -> bool {
        self.departure.coerce() < today
    }

    /// Returns the [`Period`] between the departure and the return of this
    /// [`Offer`], if they are not reversed.
    #[must_use]
    pub fn period(&self) -> Option<Period> {
        Period::new(self.departure, self.return_date)
    }

    /// Returns the number of seats which can be booked `today`, without
    /// changing this [`Offer`].
    #[must_use]
    pub fn available_seats(&self, today: Date) -> u32 {
        if self.status == Status::Inactive || self.has_departed(today) {
            0
        } else {
            self.remaining_seats
        }
    }

    /// Returns the number of seats which can be booked `today`, deactivating
    /// this [`Offer`] if it has already departed.
    pub fn current_availability(&mut self, today: Date) -> u32 {
        _ = self.expire(today);
        self.available_seats(today)
    }

    /// Recomputes [`Offer::remaining_seats`] out of the provided
    /// [`Contract`]s, deactivating this [`Offer`] if it has already departed.
    ///
    /// Only [`Contract`]s of this [`Offer`] that hold their seats count.
    /// Returns the number of seats which can be booked `today`.
    pub fn check_availability<'c>(
        &mut self,
        contracts: impl IntoIterator<Item = &'c Contract>,
        today: Date,
    ) -> u32 {
        if self.status == Status::Inactive || self.expire(today) {
            return 0;
        }

        let reserved = contracts
            .into_iter()
            .filter(|c| c.offer_id == self.id && c.is_reserving())
            .map(|c| c.participants)
            .fold(0_u32, u32::saturating_add);
        self.remaining_seats = self.max_participants.saturating_sub(reserved);
        self.remaining_seats
    }

    /// Reserves the provided number of `seats`.
    ///
    /// # Errors
    ///
    /// If no seats are requested or not enough of them are available `today`.
    /// This [`Offer`] stays unchanged then.
    pub fn reserve_seats(
        &mut self,
        seats: u32,
        today: Date,
    ) -> Result<(), Error> {
        if seats == 0 {
            return Err(Error::NoParticipants);
        }
        let available = self.available_seats(today);
        if seats > available {
            return Err(Error::NotEnoughSeats {
                requested: seats,
                available,
            });
        }

        self.remaining_seats -= seats;
        Ok(())
    }

    /// Returns the provided number of `seats` back for booking.
    ///
    /// [`Offer::remaining_seats`] never grows beyond
    /// [`Offer::max_participants`].
    pub fn release_seats(&mut self, seats: u32) {
        self.remaining_seats = self
            .remaining_seats
            .saturating_add(seats)
            .min(self.max_participants);
    }

    /// Computes the total price for the provided number of `participants`
    /// booking `today`.
    ///
    /// The [`GROUP_DISCOUNT`] is applied first, then the
    /// [`EARLY_BOOKING_DISCOUNT`] is taken from the already discounted
    /// amount. The result is rounded to cents.
    ///
    /// # Errors
    ///
    /// If there are no `participants` or this [`Offer`] has no price.
    pub fn total_price(
        &self,
        participants: u32,
        today: Date,
    ) -> Result<Money, Error> {
        if participants == 0 {
            return Err(Error::NoParticipants);
        }
        if !self.price.is_positive() {
            return Err(Error::InvalidPrice(self.price));
        }

        let mut total = self.price.amount * Decimal::from(participants);
        if participants >= GROUP_SIZE {
            total -= GROUP_DISCOUNT.of(total);
        }
        let days_left = today.days_until(self.departure);
        if days_left >= EARLY_BOOKING_DAYS {
            total -= EARLY_BOOKING_DISCOUNT.of(total);
        }

        let total = self.price.with_amount(total).round();
        log::debug!(
            "`Offer(id: {})` priced at {total} for {participants} \
             participant(s), {days_left} day(s) before departure",
            self.id,
        );
        Ok(total)
    }

    /// Checks whether this [`Offer`] can be booked `today` and satisfies the
    /// provided [`Criteria`].
    #[must_use]
    pub fn matches(&self, criteria: &Criteria, today: Date) -> bool {
        self.available_seats(today) > 0 && self.fits(criteria)
    }

    /// Checks whether this [`Offer`] satisfies the provided [`Criteria`],
    /// regardless of its seats.
    #[must_use]
    pub fn fits(&self, criteria: &Criteria) -> bool {
        let Criteria {
            country,
            departs_from,
            returns_until,
            kind,
        } = criteria;

        country.as_ref().map_or(true, |c| self.country.is(c))
            && departs_from.map_or(true, |d| self.departure >= d)
            && returns_until.map_or(true, |d| self.return_date <= d)
            && kind.as_ref().map_or(true, |k| self.kind.as_ref() == Some(k))
    }

    /// Deactivates this [`Offer`] if it has already departed.
    ///
    /// Returns whether this [`Offer`] has departed.
    fn expire(&mut self, today: Date) -> bool {
        let departed = self.has_departed(today);
        if departed && self.status == Status::Active {
            self.status = Status::Inactive;
            log::info!(
                "`Offer(id: {})` deactivated, departed on {}",
                self.id,
                self.departure,
            );
        }
        departed
    }
}

/// Criteria to search for bookable [`Offer`]s with.
#[derive(Clone, Debug, Default)]
pub struct Criteria {
    /// [`Country`] the [`Offer`] must go to.
    pub country: Option<Country>,

    /// Earliest departure [`Date`].
    pub departs_from: Option<DepartureDate>,

    /// Latest return [`Date`].
    pub returns_until: Option<ReturnDate>,

    /// [`Kind`] of the trip.
    pub kind: Option<Kind>,
}

/// ID of an [`Offer`].
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

/// Name of an [`Offer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 200
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Kind of a trip offered, like `sightseeing` or `pilgrimage`.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Kind(String);

impl Kind {
    /// Creates a new [`Kind`] if the given `kind` is not blank.
    ///
    /// The [`Kind`] is stored lowercase.
    #[must_use]
    pub fn new(kind: impl AsRef<str>) -> Option<Self> {
        let kind = kind.as_ref().trim();
        (!kind.is_empty()).then(|| Self(kind.to_lowercase()))
    }
}

impl FromStr for Kind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("blank `Kind`")
    }
}

define_kind! {
    #[doc = "Status of an [`Offer`]."]
    enum Status {
        #[doc = "[`Offer`] can be booked."]
        Active = 1,

        #[doc = "[`Offer`] is withdrawn or has already departed."]
        Inactive = 2,
    }
}

/// Marker type indicating a departure.
#[derive(Clone, Copy, Debug)]
pub struct Departure;

/// Marker type indicating a return.
#[derive(Clone, Copy, Debug)]
pub struct Return;

/// [`Date`] when an [`Offer`] departs.
pub type DepartureDate = DateOf<(Offer, Departure)>;

/// [`Date`] when an [`Offer`] returns.
pub type ReturnDate = DateOf<(Offer, Return)>;

/// [`Date`] when an [`Offer`] was created.
pub type CreationDate = DateOf<(Offer, unit::Creation)>;

/// Error of an [`Offer`] operation.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Departure [`Date`] is in the past.
    #[display("departure on {_0} is in the past")]
    DepartureInPast(#[error(not(source))] DepartureDate),

    /// Price is not positive.
    #[display("price must be positive, got {_0}")]
    InvalidPrice(#[error(not(source))] Money),

    /// No participants are requested.
    #[display("at least one participant is required")]
    NoParticipants,

    /// [`Offer`] has no seats at all.
    #[display("maximal number of participants must be positive")]
    NoSeats,

    /// Not enough seats to reserve.
    #[display("requested {requested} seat(s), but {available} available")]
    NotEnoughSeats {
        /// Number of seats requested.
        requested: u32,

        /// Number of seats available.
        available: u32,
    },

    /// Return [`Date`] precedes departure [`Date`].
    #[display("return precedes departure")]
    ReturnBeforeDeparture,
}

impl Error {
    /// Returns [`ErrorKind`] of this [`Error`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DepartureInPast(_)
            | Self::InvalidPrice(_)
            | Self::NoParticipants
            | Self::NoSeats
            | Self::ReturnBeforeDeparture => ErrorKind::Validation,
            Self::NotEnoughSeats { .. } => ErrorKind::State,
        }
    }
}
