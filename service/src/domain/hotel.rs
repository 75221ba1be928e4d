//! [`Hotel`] definitions.

use common::{define_kind, unit, Date, DateOf, Period};
use derive_more::{Display, Error as StdError, From, FromStr, Into};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing as log;
use uuid::Uuid;

use crate::domain::{
    contact::{Email, Name, Phone, Text},
    trip, Country, ErrorKind, Trip,
};

/// Rating of a [`Hotel`] without any [`Review`]s.
pub const DEFAULT_RATING: Decimal = Decimal::from_parts(500, 0, 0, false, 2);

/// Rating making a [`Hotel`] highly rated.
pub const HIGH_RATING: Decimal = Decimal::from_parts(800, 0, 0, false, 2);

/// Number of completed [`Trip`]s making a [`Hotel`] a regular partner.
pub const REGULAR_PARTNER_TRIPS: usize = 10;

/// Partner hotel lodging [`Trip`]s.
#[derive(Clone, Debug)]
pub struct Hotel {
    /// ID of this [`Hotel`].
    pub id: Id,

    /// [`Name`] of this [`Hotel`].
    pub name: Name,

    /// Street address of this [`Hotel`], if provided.
    pub address: Option<Text>,

    /// City of this [`Hotel`].
    pub city: Text,

    /// [`Country`] of this [`Hotel`].
    pub country: Country,

    /// [`Category`] of this [`Hotel`].
    pub category: Category,

    /// [`Phone`] of this [`Hotel`].
    pub phone: Phone,

    /// [`Email`] of this [`Hotel`], if provided.
    pub email: Option<Email>,

    /// Person to contact in this [`Hotel`], if known.
    pub contact_person: Option<Name>,

    /// Terms of the partnership, if agreed.
    pub terms: Option<Text>,

    /// Mean score of the [`Review`]s, rounded to 2 decimal places.
    rating: Decimal,

    /// [`Status`] of the partnership with this [`Hotel`].
    pub status: Status,

    /// [`Date`] when the partnership started.
    pub partnership_started_on: PartnershipStartDate,

    /// [`Date`] when the partnership ended, if it did.
    pub partnership_ended_on: Option<PartnershipEndDate>,

    /// [`Review`]s of this [`Hotel`].
    reviews: Vec<Review>,
}

/// Data of a new partner [`Hotel`].
#[derive(Clone, Debug)]
pub struct Draft {
    /// [`Name`] of the [`Hotel`].
    pub name: Name,

    /// Street address of the [`Hotel`], if provided.
    pub address: Option<Text>,

    /// City of the [`Hotel`].
    pub city: Text,

    /// [`Country`] of the [`Hotel`].
    pub country: Country,

    /// Number of stars of the [`Hotel`].
    pub category: u8,

    /// [`Phone`] of the [`Hotel`].
    pub phone: Phone,

    /// [`Email`] of the [`Hotel`], if provided.
    pub email: Option<Email>,

    /// Person to contact in the [`Hotel`], if known.
    pub contact_person: Option<Name>,

    /// Terms of the partnership, if agreed.
    pub terms: Option<Text>,
}

/// Opinion about a [`Hotel`].
#[derive(Clone, Debug)]
pub struct Review {
    /// Score from `1` to `10`.
    pub score: u8,

    /// Comment of this [`Review`], if any.
    pub comment: Option<Text>,

    /// Author of this [`Review`], if known.
    pub author: Option<Name>,

    /// [`Date`] of this [`Review`].
    pub reviewed_on: ReviewDate,
}

impl Hotel {
    /// Starts a new [`Status::Active`] partnership with a [`Hotel`] `today`.
    ///
    /// # Errors
    ///
    /// If the [`Draft::category`] is not a valid [`Category`].
    pub fn new(draft: Draft, today: Date) -> Result<Self, Error> {
        let Draft {
            name,
            address,
            city,
            country,
            category,
            phone,
            email,
            contact_person,
            terms,
        } = draft;

        let category =
            Category::new(category).ok_or(Error::InvalidCategory(category))?;

        Ok(Self {
            id: Id::new(),
            name,
            address,
            city,
            country,
            category,
            phone,
            email,
            contact_person,
            terms,
            rating: DEFAULT_RATING,
            status: Status::Active,
            partnership_started_on: today.coerce(),
            partnership_ended_on: None,
            reviews: vec![],
        })
    }

    /// Returns the quality rating of this [`Hotel`]: the mean score of its
    /// [`Review`]s, or [`DEFAULT_RATING`] if there are none.
    #[must_use]
    pub fn rating(&self) -> Decimal {
        self.rating
    }

    /// Returns the [`Review`]s of this [`Hotel`].
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Adds a new [`Review`] made `today` and recomputes the
    /// [`Hotel::rating()`].
    ///
    /// # Errors
    ///
    /// If the `score` is not within `1..=10`.
    pub fn add_review(
        &mut self,
        score: u8,
        comment: Option<Text>,
        author: Option<Name>,
        today: Date,
    ) -> Result<(), Error> {
        if !(1..=10).contains(&score) {
            return Err(Error::InvalidScore(score));
        }

        self.reviews.push(Review {
            score,
            comment,
            author,
            reviewed_on: today.coerce(),
        });
        self.rating = mean_score(&self.reviews);
        log::debug!(
            "`Hotel(id: {})` rated {} after {} review(s)",
            self.id,
            self.rating,
            self.reviews.len(),
        );
        Ok(())
    }

    /// Checks whether this [`Hotel`] may lodge a [`Trip`] within the
    /// provided [`Period`], given the `trips` already scheduled.
    ///
    /// # Errors
    ///
    /// If the [`Period`] starts before `today`, the partnership is not
    /// active, or another scheduled [`Trip`] overlaps the [`Period`].
    pub fn check_availability<'t>(
        &self,
        period: &Period,
        trips: impl IntoIterator<Item = &'t Trip>,
        today: Date,
    ) -> Result<(), Error> {
        if period.start() < today {
            return Err(Error::PeriodInPast(*period));
        }
        if self.status != Status::Active {
            return Err(Error::PartnershipInactive(self.id));
        }
        if let Some(busy) = trips.into_iter().find(|t| {
            t.hotel_id == Some(self.id)
                && t.is_scheduled()
                && t.period.overlaps(period)
        }) {
            return Err(Error::Busy(busy.id));
        }
        Ok(())
    }

    /// Indicates whether this [`Hotel`] may lodge a [`Trip`] within the
    /// provided [`Period`].
    ///
    /// See [`Hotel::check_availability()`] for details.
    pub fn is_available<'t>(
        &self,
        period: &Period,
        trips: impl IntoIterator<Item = &'t Trip>,
        today: Date,
    ) -> bool {
        self.check_availability(period, trips, today).is_ok()
    }

    /// Lodges the provided [`Trip`] in this [`Hotel`], given the other
    /// `trips` already scheduled.
    ///
    /// # Errors
    ///
    /// If this [`Hotel`] is unavailable or the [`Trip`] is completed already.
    /// The [`Trip`] stays unchanged then.
    pub fn lodge<'t>(
        &self,
        trip: &mut Trip,
        trips: impl IntoIterator<Item = &'t Trip>,
        today: Date,
    ) -> Result<(), Error> {
        let trip_id = trip.id;
        self.check_availability(
            &trip.period,
            trips.into_iter().filter(|t| t.id != trip_id),
            today,
        )?;
        trip.lodge(self.id)?;
        Ok(())
    }

    /// Updates the provided contact details of this [`Hotel`], keeping the
    /// others.
    pub fn update_contacts(
        &mut self,
        phone: Option<Phone>,
        email: Option<Email>,
        contact_person: Option<Name>,
    ) {
        if let Some(p) = phone {
            self.phone = p;
        }
        if email.is_some() {
            self.email = email;
        }
        if contact_person.is_some() {
            self.contact_person = contact_person;
        }
    }

    /// Indicates whether this [`Hotel`] is rated at least [`HIGH_RATING`].
    #[must_use]
    pub fn is_highly_rated(&self) -> bool {
        self.rating >= HIGH_RATING
    }

    /// Counts the completed `trips` lodged in this [`Hotel`].
    pub fn completed_trips<'t>(
        &self,
        trips: impl IntoIterator<Item = &'t Trip>,
    ) -> usize {
        trips
            .into_iter()
            .filter(|t| t.hotel_id == Some(self.id) && t.is_completed())
            .count()
    }

    /// Indicates whether this [`Hotel`] has lodged at least
    /// [`REGULAR_PARTNER_TRIPS`] completed `trips`.
    pub fn is_regular_partner<'t>(
        &self,
        trips: impl IntoIterator<Item = &'t Trip>,
    ) -> bool {
        self.completed_trips(trips) >= REGULAR_PARTNER_TRIPS
    }

    /// Returns the name of this [`Hotel`] along with its stars and city.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!(
            "{} ({}) - {}",
            self.name,
            "★".repeat(self.category.stars().into()),
            self.city,
        )
    }

    /// Ends the partnership with this [`Hotel`] `today`.
    ///
    /// # Errors
    ///
    /// If the partnership is not active.
    pub fn end_partnership(&mut self, today: Date) -> Result<(), Error> {
        if self.status != Status::Active {
            return Err(Error::PartnershipInactive(self.id));
        }
        self.status = Status::Inactive;
        self.partnership_ended_on = Some(today.coerce());
        Ok(())
    }
}

/// Computes the mean score of the provided [`Review`]s, rounded half-up to
/// 2 decimal places.
fn mean_score(reviews: &[Review]) -> Decimal {
    if reviews.is_empty() {
        return DEFAULT_RATING;
    }
    let sum = reviews.iter().map(|r| Decimal::from(r.score)).sum::<Decimal>();
    let mut mean = (sum / Decimal::from(reviews.len()))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    mean.rescale(2);
    mean
}

/// ID of a [`Hotel`].
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

/// Number of stars of a [`Hotel`], from `1` to `5`.
#[derive(Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd)]
pub struct Category(u8);

impl Category {
    /// Creates a new [`Category`] if the provided number of `stars` is
    /// within `1..=5`.
    #[must_use]
    pub const fn new(stars: u8) -> Option<Self> {
        if matches!(stars, 1..=5) {
            Some(Self(stars))
        } else {
            None
        }
    }

    /// Returns the number of stars of this [`Category`].
    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

define_kind! {
    #[doc = "Status of a partnership with a [`Hotel`]."]
    enum Status {
        #[doc = "[`Hotel`] lodges new [`Trip`]s."]
        Active = 1,

        #[doc = "Partnership has ended."]
        Inactive = 2,
    }
}

/// Marker type indicating a partnership.
#[derive(Clone, Copy, Debug)]
pub struct Partnership;

/// [`Date`] when a partnership with a [`Hotel`] started.
pub type PartnershipStartDate = DateOf<(Hotel, Partnership, unit::Creation)>;

/// [`Date`] when a partnership with a [`Hotel`] ended.
pub type PartnershipEndDate = DateOf<(Hotel, Partnership, unit::Deactivation)>;

/// [`Date`] of a [`Review`].
pub type ReviewDate = DateOf<Review>;

/// Error of a [`Hotel`] operation.
#[derive(Clone, Copy, Debug, Display, StdError, From)]
pub enum Error {
    /// [`Hotel`] lodges another [`Trip`] at that time.
    #[display("`Hotel` is busy with `Trip(id: {_0})`")]
    Busy(#[error(not(source))] trip::Id),

    /// [`Category`] is out of range.
    #[display("category must be within 1..=5, got {_0}")]
    InvalidCategory(#[error(not(source))] u8),

    /// [`Review`] score is out of range.
    #[display("score must be within 1..=10, got {_0}")]
    InvalidScore(#[error(not(source))] u8),

    /// Partnership with the [`Hotel`] is not active.
    #[display("partnership with `Hotel(id: {_0})` is not active")]
    PartnershipInactive(#[error(not(source))] Id),

    /// Requested [`Period`] starts in the past.
    #[display("{_0} starts in the past")]
    PeriodInPast(#[error(not(source))] Period),

    /// [`Trip`] operation failed.
    #[display("`Trip` refused: {_0}")]
    #[from]
    Trip(trip::Error),
}

impl Error {
    /// Returns [`ErrorKind`] of this [`Error`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Trip(e) => e.kind(),
            Self::InvalidCategory(_)
            | Self::InvalidScore(_)
            | Self::PeriodInPast(_) => ErrorKind::Validation,
            Self::Busy(_) | Self::PartnershipInactive(_) => ErrorKind::State,
        }
    }
}

#[cfg(test)]
pub(crate) mod spec {
    use rust_decimal::Decimal;

    use crate::domain::{
        contact::{Email, Name, Phone, Text},
        offer::spec::today,
        trip::{self, spec::period},
        Country, ErrorKind,
    };

    use super::{Draft, Error, Hotel, Status};

    pub(crate) fn draft() -> Draft {
        Draft {
            name: Name::new("Hotel Adriatic").unwrap(),
            address: None,
            city: Text::new("Split").unwrap(),
            country: Country::new("Croatia").unwrap(),
            category: 4,
            phone: Phone::new("+385 21 555 111").unwrap(),
            email: None,
            contact_person: None,
            terms: None,
        }
    }

    pub(crate) fn hotel() -> Hotel {
        Hotel::new(draft(), today()).unwrap()
    }

    fn rated(scores: &[u8]) -> Decimal {
        let mut h = hotel();
        for s in scores {
            h.add_review(*s, None, None, today()).unwrap();
        }
        h.rating()
    }

    #[test]
    fn validates_category() {
        assert!(Hotel::new(Draft { category: 1, ..draft() }, today()).is_ok());
        assert!(Hotel::new(Draft { category: 5, ..draft() }, today()).is_ok());
        assert!(matches!(
            Hotel::new(Draft { category: 0, ..draft() }, today()),
            Err(Error::InvalidCategory(0)),
        ));
        assert!(matches!(
            Hotel::new(Draft { category: 6, ..draft() }, today()),
            Err(Error::InvalidCategory(6)),
        ));
    }

    #[test]
    fn starts_active_with_default_rating() {
        let h = hotel();

        assert_eq!(h.status, Status::Active);
        assert_eq!(h.rating().to_string(), "5.00");
        assert!(h.reviews().is_empty());
        assert_eq!(h.partnership_started_on.coerce::<()>(), today());
    }

    #[test]
    fn averages_reviews() {
        assert_eq!(rated(&[8]).to_string(), "8.00");
        assert_eq!(rated(&[7, 8, 8]), "7.67".parse().unwrap());
        assert_eq!(rated(&[1, 2]), "1.5".parse().unwrap());
        assert_eq!(rated(&[10, 10, 9]), "9.67".parse().unwrap());
        // 9 / 8 = 1.125 rounds half-up.
        assert_eq!(rated(&[1, 1, 1, 1, 1, 1, 1, 2]), "1.13".parse().unwrap());
    }

    #[test]
    fn rejects_scores_out_of_range() {
        let mut h = hotel();

        for score in [0, 11] {
            let err = h.add_review(score, None, None, today()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(h.reviews().is_empty());
        assert_eq!(h.rating().to_string(), "5.00");
    }

    #[test]
    fn highly_rated_from_eight() {
        let mut h = hotel();
        assert!(!h.is_highly_rated());

        h.add_review(8, Text::new("Great view"), Name::new("Anna"), today())
            .unwrap();
        assert!(h.is_highly_rated());

        h.add_review(7, None, None, today()).unwrap();
        assert!(!h.is_highly_rated());
    }

    #[test]
    fn availability_rules() {
        let h = hotel();
        let mut lodged = trip::spec::trip(10, 7);
        lodged.hotel_id = Some(h.id);
        let trips = [lodged];

        assert!(matches!(
            h.check_availability(&period(-1, 3), &[], today()),
            Err(Error::PeriodInPast(_)),
        ));
        assert!(h.is_available(&period(0, 3), &trips, today()));
        assert!(matches!(
            h.check_availability(&period(16, 3), &trips, today()),
            Err(Error::Busy(_)),
        ));
        assert!(h.is_available(&period(17, 3), &trips, today()));

        let mut ended = hotel();
        ended.end_partnership(today()).unwrap();
        assert!(matches!(
            ended.check_availability(&period(30, 3), &[], today()),
            Err(Error::PartnershipInactive(_)),
        ));
        assert!(ended.end_partnership(today()).is_err());
    }

    #[test]
    fn lodges_trips() {
        let h = hotel();
        let mut t = trip::spec::trip(10, 7);

        h.lodge(&mut t, &[], today()).unwrap();
        assert_eq!(t.hotel_id, Some(h.id));

        let trips = [t.clone()];
        assert!(h.lodge(&mut t, &trips, today()).is_ok());

        let mut other = trip::spec::trip(12, 2);
        assert!(h.lodge(&mut other, &trips, today()).is_err());
        assert_eq!(other.hotel_id, None);
    }

    #[test]
    fn counts_completed_trips() {
        let h = hotel();
        let mut trips = (0..10)
            .map(|i| {
                let mut t = trip::spec::trip(10 * i, 3);
                t.hotel_id = Some(h.id);
                t.start().unwrap();
                t.complete().unwrap();
                t
            })
            .collect::<Vec<_>>();
        trips[9].status = trip::Status::InProgress;

        assert_eq!(h.completed_trips(&trips), 9);
        assert!(!h.is_regular_partner(&trips));

        trips[9].status = trip::Status::Completed;
        assert!(h.is_regular_partner(&trips));
    }

    #[test]
    fn updates_given_contacts_only() {
        let mut h = hotel();
        let phone = h.phone.clone();

        h.update_contacts(None, Email::new("desk@adriatic.hr"), None);
        assert_eq!(h.phone, phone);
        assert_eq!(h.email, Email::new("desk@adriatic.hr"));

        h.update_contacts(Phone::new("+385 21 555 222"), None, Name::new("Ivo"));
        assert_eq!(h.phone.to_string(), "+385 21 555 222");
        assert_eq!(h.email, Email::new("desk@adriatic.hr"));
        assert_eq!(h.contact_person, Name::new("Ivo"));
    }

    #[test]
    fn full_name_shows_stars() {
        assert_eq!(hotel().full_name(), "Hotel Adriatic (★★★★) - Split");
    }
}
