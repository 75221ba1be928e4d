//! [`Pilot`] definitions.

pub mod matching;

use common::{define_kind, unit, Date, DateOf, Period};
use derive_more::{AsRef, Display, Error as StdError, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use tracing as log;
use uuid::Uuid;

use crate::domain::{
    contact::{Email, Name, Phone, Text},
    destination::Requirements,
    offer, trip, ErrorKind, Language, Offer, Specialization, Trip,
};

/// Number of days before the license expiration a [`Pilot`] is reminded of.
pub const LICENSE_REMINDER_DAYS: i64 = 30;

/// Number of completed [`Trip`]s making a [`Pilot`] experienced.
pub const EXPERIENCED_TRIPS: usize = 20;

/// Number of [`Trip`]s completed within a year making a [`Pilot`] active in
/// that year.
pub const ACTIVE_YEAR_TRIPS: usize = 10;

/// Tour guide leading [`Trip`]s.
#[derive(Clone, Debug)]
pub struct Pilot {
    /// ID of this [`Pilot`].
    pub id: Id,

    /// First name of this [`Pilot`].
    pub first_name: Name,

    /// Last name of this [`Pilot`].
    pub last_name: Name,

    /// [`Phone`] of this [`Pilot`].
    pub phone: Phone,

    /// [`Email`] of this [`Pilot`].
    pub email: Email,

    /// Postal address of this [`Pilot`], if provided.
    pub address: Option<Text>,

    /// [`Date`] of birth of this [`Pilot`], if provided.
    pub birth_date: Option<BirthDate>,

    /// [`Date`] when this [`Pilot`] was hired.
    pub hired_on: HireDate,

    /// [`LicenseNumber`] of this [`Pilot`].
    pub license_number: LicenseNumber,

    /// [`Date`] when the license of this [`Pilot`] expires.
    pub license_expires_on: LicenseExpirationDate,

    /// [`Language`]s spoken by this [`Pilot`].
    languages: Vec<Language>,

    /// [`Specialization`]s of this [`Pilot`].
    specializations: Vec<Specialization>,

    /// [`Period`] this [`Pilot`] may be booked within, if limited.
    pub availability: Option<Period>,

    /// [`Status`] of this [`Pilot`].
    pub status: Status,
}

/// Personal data of a new [`Pilot`].
#[derive(Clone, Debug)]
pub struct Draft {
    /// First name of the [`Pilot`].
    pub first_name: Name,

    /// Last name of the [`Pilot`].
    pub last_name: Name,

    /// [`Phone`] of the [`Pilot`].
    pub phone: Phone,

    /// [`Email`] of the [`Pilot`].
    pub email: Email,

    /// Postal address of the [`Pilot`], if provided.
    pub address: Option<Text>,

    /// [`Date`] of birth of the [`Pilot`], if provided.
    pub birth_date: Option<BirthDate>,

    /// [`LicenseNumber`] of the [`Pilot`].
    pub license_number: LicenseNumber,

    /// [`Date`] when the license of the [`Pilot`] expires.
    pub license_expires_on: LicenseExpirationDate,

    /// [`Language`]s spoken by the [`Pilot`].
    ///
    /// [`Language::native()`] is assumed if empty.
    pub languages: Vec<Language>,

    /// [`Specialization`]s of the [`Pilot`].
    pub specializations: Vec<Specialization>,
}

/// Outcome of the [`Pilot::check_license_validity()`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LicenseValidity {
    /// License is valid for longer than [`LICENSE_REMINDER_DAYS`].
    Valid,

    /// License is still valid, but expires soon.
    ExpiresSoon {
        /// Number of days left until the expiration.
        days_left: i64,
    },

    /// License has expired.
    Expired,
}

/// Successful assignment of a [`Pilot`] to a [`Trip`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Assignment {
    /// [`Specialization`] expected for the [`Trip`], but missing for the
    /// assigned [`Pilot`].
    pub missing_specialization: Option<Specialization>,
}

impl Pilot {
    /// Hires a new [`Status::Active`] [`Pilot`] `today`.
    ///
    /// # Errors
    ///
    /// If the license expires before `today`.
    pub fn new(draft: Draft, today: Date) -> Result<Self, Error> {
        let Draft {
            first_name,
            last_name,
            phone,
            email,
            address,
            birth_date,
            license_number,
            license_expires_on,
            languages,
            specializations,
        } = draft;

        if license_expires_on.coerce::<()>() < today {
            return Err(Error::LicenseExpired(license_expires_on));
        }

        let mut pilot = Self {
            id: Id::new(),
            first_name,
            last_name,
            phone,
            email,
            address,
            birth_date,
            hired_on: today.coerce(),
            license_number,
            license_expires_on,
            languages: vec![],
            specializations: vec![],
            availability: None,
            status: Status::Active,
        };
        if languages.is_empty() {
            _ = pilot.add_language(Language::native());
        }
        for l in languages {
            _ = pilot.add_language(l);
        }
        for s in specializations {
            _ = pilot.add_specialization(s);
        }
        Ok(pilot)
    }

    /// Returns the full name of this [`Pilot`].
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the [`Language`]s spoken by this [`Pilot`].
    #[must_use]
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Returns the [`Specialization`]s of this [`Pilot`].
    #[must_use]
    pub fn specializations(&self) -> &[Specialization] {
        &self.specializations
    }

    /// Checks whether this [`Pilot`] speaks the provided [`Language`].
    #[must_use]
    pub fn knows_language(&self, language: &Language) -> bool {
        self.languages.iter().any(|l| l.is(language))
    }

    /// Checks whether this [`Pilot`] has the provided [`Specialization`].
    #[must_use]
    pub fn has_specialization(&self, specialization: &Specialization) -> bool {
        self.specializations.iter().any(|s| s.is(specialization))
    }

    /// Adds the provided [`Language`] to this [`Pilot`].
    ///
    /// Returns `false` if this [`Pilot`] speaks it already.
    pub fn add_language(&mut self, language: Language) -> bool {
        if self.knows_language(&language) {
            return false;
        }
        self.languages.push(language);
        true
    }

    /// Adds the provided [`Specialization`] to this [`Pilot`].
    ///
    /// Returns `false` if this [`Pilot`] has it already.
    pub fn add_specialization(&mut self, specialization: Specialization) -> bool {
        if self.has_specialization(&specialization) {
            return false;
        }
        self.specializations.push(specialization);
        true
    }

    /// Limits the [`Period`] this [`Pilot`] may be booked within, or lifts
    /// the limit if [`None`] is provided.
    pub fn set_availability(&mut self, period: Option<Period>) {
        self.availability = period;
    }

    /// Checks whether this [`Pilot`] may guide a [`Trip`] within the provided
    /// [`Period`], given the `trips` already scheduled.
    ///
    /// # Errors
    ///
    /// With the first reason this [`Pilot`] is unavailable for.
    pub fn check_availability<'t>(
        &self,
        period: &Period,
        trips: impl IntoIterator<Item = &'t Trip>,
    ) -> Result<(), Error> {
        if self.status != Status::Active {
            return Err(Error::NotActive(self.status));
        }
        if self.license_expires_on.coerce::<()>() < period.start() {
            return Err(Error::LicenseExpiresBefore(self.license_expires_on));
        }
        if let Some(window) = self.availability {
            if !period.is_within(&window) {
                return Err(Error::OutsideAvailability(window));
            }
        }
        if let Some(busy) = trips.into_iter().find(|t| {
            t.pilot_id == Some(self.id)
                && t.is_scheduled()
                && t.period.overlaps(period)
        }) {
            return Err(Error::Busy(busy.id));
        }
        Ok(())
    }

    /// Indicates whether this [`Pilot`] may guide a [`Trip`] within the
    /// provided [`Period`].
    ///
    /// See [`Pilot::check_availability()`] for details.
    pub fn is_available<'t>(
        &self,
        period: &Period,
        trips: impl IntoIterator<Item = &'t Trip>,
    ) -> bool {
        self.check_availability(period, trips).is_ok()
    }

    /// Checks the license of this [`Pilot`] `today`, suspending this
    /// [`Pilot`] if it has expired.
    pub fn check_license_validity(&mut self, today: Date) -> LicenseValidity {
        let days_left = today.days_until(self.license_expires_on);
        if days_left < 0 {
            if self.status == Status::Active {
                self.status = Status::LicenseInactive;
            }
            log::warn!(
                "license of `Pilot(id: {})` expired {} day(s) ago",
                self.id,
                -days_left,
            );
            LicenseValidity::Expired
        } else if days_left <= LICENSE_REMINDER_DAYS {
            log::info!(
                "license of `Pilot(id: {})` expires in {days_left} day(s)",
                self.id,
            );
            LicenseValidity::ExpiresSoon { days_left }
        } else {
            LicenseValidity::Valid
        }
    }

    /// Indicates whether the license of this [`Pilot`] is still valid
    /// `today`, but expires within the provided number of `days`.
    #[must_use]
    pub fn license_expires_within(&self, days: i64, today: Date) -> bool {
        (0..=days).contains(&today.days_until(self.license_expires_on))
    }

    /// Assigns this [`Pilot`] to the provided [`Trip`] of the provided
    /// [`Offer`], given the other `trips` already scheduled.
    ///
    /// Missing [`Specialization`] doesn't prevent the assignment, but is
    /// reported in the returned [`Assignment`].
    ///
    /// # Errors
    ///
    /// If this [`Pilot`] is unavailable, doesn't speak the [`Language`]
    /// required by the destination, or the [`Trip`] doesn't realize the
    /// [`Offer`] or is completed already. The [`Trip`] stays unchanged then.
    pub fn assign_to_trip<'t>(
        &self,
        trip: &mut Trip,
        offer: &Offer,
        trips: impl IntoIterator<Item = &'t Trip>,
    ) -> Result<Assignment, Error> {
        if trip.offer_id != offer.id {
            return Err(Error::OfferMismatch(offer.id));
        }
        trip.ensure_scheduled()?;
        let trip_id = trip.id;
        self.check_availability(
            &trip.period,
            trips.into_iter().filter(|t| t.id != trip_id),
        )?;

        let Requirements {
            language,
            specialization,
        } = Requirements::from(&offer.country);
        if !self.knows_language(&language) {
            return Err(Error::MissingLanguage(language));
        }

        let missing_specialization =
            (!self.has_specialization(&specialization)).then(|| {
                log::warn!(
                    "`Pilot(id: {})` has no `{specialization}` \
                     specialization expected for `Trip(id: {trip_id})`",
                    self.id,
                );
                specialization
            });
        trip.pilot_id = Some(self.id);
        Ok(Assignment {
            missing_specialization,
        })
    }

    /// Prolongs the license of this [`Pilot`], reactivating them if they
    /// were suspended because of its expiration.
    ///
    /// # Errors
    ///
    /// If the new `expires_on` [`Date`] is before `today`.
    pub fn renew_license(
        &mut self,
        expires_on: LicenseExpirationDate,
        today: Date,
    ) -> Result<(), Error> {
        if expires_on.coerce::<()>() < today {
            return Err(Error::LicenseExpired(expires_on));
        }
        self.license_expires_on = expires_on;
        if self.status == Status::LicenseInactive {
            self.status = Status::Active;
        }
        Ok(())
    }

    /// Deactivates this [`Pilot`].
    ///
    /// # Errors
    ///
    /// If this [`Pilot`] is inactive already or has any scheduled `trips`.
    pub fn deactivate<'t>(
        &mut self,
        trips: impl IntoIterator<Item = &'t Trip>,
    ) -> Result<(), Error> {
        if self.status == Status::Inactive {
            return Err(Error::NotActive(self.status));
        }
        if let Some(t) = trips
            .into_iter()
            .find(|t| t.pilot_id == Some(self.id) && t.is_scheduled())
        {
            return Err(Error::Busy(t.id));
        }
        self.status = Status::Inactive;
        Ok(())
    }

    /// Reactivates this [`Status::Inactive`] [`Pilot`].
    ///
    /// # Errors
    ///
    /// If this [`Pilot`] is not [`Status::Inactive`] or their license has
    /// expired before `today`.
    pub fn reactivate(&mut self, today: Date) -> Result<(), Error> {
        if self.status != Status::Inactive {
            return Err(Error::NotInactive(self.status));
        }
        if self.license_expires_on.coerce::<()>() < today {
            return Err(Error::LicenseExpired(self.license_expires_on));
        }
        self.status = Status::Active;
        Ok(())
    }

    /// Returns the completed `trips` of this [`Pilot`].
    pub fn completed_trips<'t>(
        &self,
        trips: impl IntoIterator<Item = &'t Trip>,
    ) -> impl Iterator<Item = &'t Trip> {
        let id = self.id;
        trips
            .into_iter()
            .filter(move |t| t.pilot_id == Some(id) && t.is_completed())
    }

    /// Counts the completed `trips` of this [`Pilot`] started in the
    /// provided `year`.
    pub fn completed_trips_this_year<'t>(
        &self,
        trips: impl IntoIterator<Item = &'t Trip>,
        year: i32,
    ) -> usize {
        self.completed_trips(trips)
            .filter(|t| t.period.start().year() == year)
            .count()
    }

    /// Indicates whether this [`Pilot`] has completed at least
    /// [`EXPERIENCED_TRIPS`].
    pub fn is_lifetime_experienced<'t>(
        &self,
        trips: impl IntoIterator<Item = &'t Trip>,
    ) -> bool {
        self.completed_trips(trips).count() >= EXPERIENCED_TRIPS
    }

    /// Indicates whether this [`Pilot`] has completed at least
    /// [`ACTIVE_YEAR_TRIPS`] in the provided `year`.
    pub fn is_active_this_year<'t>(
        &self,
        trips: impl IntoIterator<Item = &'t Trip>,
        year: i32,
    ) -> bool {
        self.completed_trips_this_year(trips, year) >= ACTIVE_YEAR_TRIPS
    }
}

/// ID of a [`Pilot`].
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
    Ord,
    PartialEq,
    PartialOrd,
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

/// Number of the professional license of a [`Pilot`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct LicenseNumber(String);

impl LicenseNumber {
    /// Creates a new [`LicenseNumber`] if the given `number` is not blank.
    #[must_use]
    pub fn new(number: impl AsRef<str>) -> Option<Self> {
        let number = number.as_ref().trim();
        (!number.is_empty()).then(|| Self(number.to_owned()))
    }
}

impl FromStr for LicenseNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("blank `LicenseNumber`")
    }
}

define_kind! {
    #[doc = "Status of a [`Pilot`]."]
    enum Status {
        #[doc = "[`Pilot`] may guide [`Trip`]s."]
        Active = 1,

        #[doc = "[`Pilot`] no longer works for the agency."]
        Inactive = 2,

        #[doc = "[`Pilot`] is suspended until their license is renewed."]
        LicenseInactive = 3,
    }
}

/// Marker type indicating a birth.
#[derive(Clone, Copy, Debug)]
pub struct Birth;

/// Marker type indicating a license.
#[derive(Clone, Copy, Debug)]
pub struct License;

/// [`Date`] when a [`Pilot`] was born.
pub type BirthDate = DateOf<(Pilot, Birth)>;

/// [`Date`] when a [`Pilot`] was hired.
pub type HireDate = DateOf<(Pilot, unit::Creation)>;

/// [`Date`] when a [`Pilot`] license expires.
pub type LicenseExpirationDate = DateOf<(Pilot, License, unit::Expiration)>;

/// Error of a [`Pilot`] operation.
#[derive(Clone, Debug, Display, StdError, From)]
pub enum Error {
    /// [`Pilot`] has a scheduled [`Trip`] at that time.
    #[display("`Pilot` is busy with `Trip(id: {_0})`")]
    Busy(#[error(not(source))] trip::Id),

    /// License expires before the requested [`Date`].
    #[display("license expires on {_0}, before the trip starts")]
    LicenseExpiresBefore(#[error(not(source))] LicenseExpirationDate),

    /// License expiration [`Date`] is in the past.
    #[display("license expired on {_0}")]
    LicenseExpired(#[error(not(source))] LicenseExpirationDate),

    /// [`Pilot`] doesn't speak the required [`Language`].
    #[display("`Pilot` doesn't speak {_0}")]
    MissingLanguage(#[error(not(source))] Language),

    /// [`Pilot`] is not [`Status::Active`].
    #[display("`Pilot` is {_0}")]
    NotActive(#[error(not(source))] Status),

    /// [`Pilot`] is not [`Status::Inactive`].
    #[display("`Pilot` is {_0}, not inactive")]
    NotInactive(#[error(not(source))] Status),

    /// [`Trip`] doesn't realize the [`Offer`].
    #[display("`Trip` doesn't realize `Offer(id: {_0})`")]
    OfferMismatch(#[error(not(source))] offer::Id),

    /// Requested [`Period`] is outside the availability of the [`Pilot`].
    #[display("`Pilot` is available within {_0} only")]
    OutsideAvailability(#[error(not(source))] Period),

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
            Self::LicenseExpired(_) | Self::OfferMismatch(_) => {
                ErrorKind::Validation
            }
            Self::Busy(_)
            | Self::LicenseExpiresBefore(_)
            | Self::MissingLanguage(_)
            | Self::NotActive(_)
            | Self::NotInactive(_)
            | Self::OutsideAvailability(_) => ErrorKind::State,
        }
    }
}

#[cfg(test)]
pub(crate) mod spec {
    use common::{Date, Period};

    use crate::domain::{
        contact::{Email, Name, Phone},
        offer::spec::{offer, today},
        trip::{self, spec::period, Trip},
        Country, ErrorKind, Language, Offer, Specialization,
    };

    use super::{Draft, Error, LicenseNumber, LicenseValidity, Pilot, Status};

    pub(crate) fn draft(last_name: &str) -> Draft {
        Draft {
            first_name: Name::new("Piotr").unwrap(),
            last_name: Name::new(last_name).unwrap(),
            phone: Phone::new("+48 500 600 700").unwrap(),
            email: Email::new("piotr@example.com").unwrap(),
            address: None,
            birth_date: None,
            license_number: LicenseNumber::new(format!("PL-{last_name}"))
                .unwrap(),
            license_expires_on: today().checked_add_days(365).unwrap().coerce(),
            languages: vec![],
            specializations: vec![],
        }
    }

    /// Active [`Pilot`] speaking Polish and the provided `languages`, whose
    /// license is valid for a year.
    pub(crate) fn pilot(last_name: &str, languages: &[&str]) -> Pilot {
        let mut p = Pilot::new(draft(last_name), today()).unwrap();
        for l in languages {
            _ = p.add_language(Language::new(*l).unwrap());
        }
        p
    }

    /// `count` completed [`Trip`]s of the provided [`Pilot`] starting
    /// `from` days after [`today()`], a week apart each.
    pub(crate) fn completed_trips(
        pilot: &Pilot,
        count: usize,
        from: i64,
    ) -> Vec<Trip> {
        (0..)
            .step_by(7)
            .take(count)
            .map(|offset| {
                let mut t = trip::spec::trip(from + offset, 3);
                t.pilot_id = Some(pilot.id);
                t.start().unwrap();
                t.complete().unwrap();
                t
            })
            .collect()
    }

    fn croatian_offer() -> Offer {
        offer(10, "1000", 30)
    }

    fn trip_of(offer: &Offer) -> Trip {
        Trip::new(
            offer.id,
            Period::new(offer.departure, offer.return_date).unwrap(),
        )
    }

    #[test]
    fn speaks_polish_by_default() {
        let mut p = Pilot::new(draft("Kowalski"), today()).unwrap();

        assert_eq!(p.languages().len(), 1);
        assert!(p.knows_language(&Language::new("POLISH").unwrap()));
        assert!(!p.add_language(Language::new("polish").unwrap()));
        assert!(p.add_language(Language::new("German").unwrap()));
        assert_eq!(p.languages().len(), 2);
    }

    #[test]
    fn keeps_given_languages() {
        let p = Pilot::new(
            Draft {
                languages: vec![
                    Language::new("English").unwrap(),
                    Language::new("english").unwrap(),
                ],
                ..draft("Nowak")
            },
            today(),
        )
        .unwrap();

        assert_eq!(p.languages().len(), 1);
        assert!(!p.knows_language(&Language::native()));
    }

    #[test]
    fn adds_specializations_once() {
        let mut p = pilot("Nowak", &[]);
        let balkans = Specialization::new("Balkans").unwrap();

        assert!(p.add_specialization(balkans.clone()));
        assert!(!p.add_specialization(Specialization::new("BALKANS").unwrap()));
        assert!(p.has_specialization(&balkans));
        assert_eq!(p.specializations().len(), 1);
    }

    #[test]
    fn refuses_expired_license_on_hire() {
        let draft = Draft {
            license_expires_on: today().checked_sub_days(1).unwrap().coerce(),
            ..draft("Nowak")
        };

        let err = Pilot::new(draft, today()).unwrap_err();
        assert!(matches!(err, Error::LicenseExpired(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn available_when_free() {
        let p = pilot("Nowak", &[]);

        assert!(p.is_available(&period(10, 7), &[]));
    }

    #[test]
    fn unavailable_when_inactive() {
        let mut p = pilot("Nowak", &[]);
        p.deactivate(&[]).unwrap();

        assert!(matches!(
            p.check_availability(&period(10, 7), &[]),
            Err(Error::NotActive(Status::Inactive)),
        ));
    }

    #[test]
    fn unavailable_when_license_expires_before_start() {
        let mut p = pilot("Nowak", &[]);
        p.license_expires_on = today().checked_add_days(9).unwrap().coerce();

        assert!(matches!(
            p.check_availability(&period(10, 7), &[]),
            Err(Error::LicenseExpiresBefore(_)),
        ));
        // Expiring during the trip is fine.
        assert!(p.is_available(&period(9, 7), &[]));
    }

    #[test]
    fn unavailable_outside_window() {
        let mut p = pilot("Nowak", &[]);
        p.set_availability(Some(period(0, 14)));

        assert!(p.is_available(&period(7, 7), &[]));
        assert!(matches!(
            p.check_availability(&period(10, 7), &[]),
            Err(Error::OutsideAvailability(_)),
        ));

        p.set_availability(None);
        assert!(p.is_available(&period(10, 7), &[]));
    }

    #[test]
    fn unavailable_when_trips_overlap() {
        let p = pilot("Nowak", &[]);
        let mut busy = trip::spec::trip(10, 7);
        busy.pilot_id = Some(p.id);
        let trips = [busy];

        // Touching the last day counts as overlap.
        assert!(!p.is_available(&period(16, 3), &trips));
        assert!(!p.is_available(&period(5, 6), &trips));
        assert!(p.is_available(&period(17, 3), &trips));
        assert!(p.is_available(&period(3, 7), &trips));

        let other = pilot("Kowalski", &[]);
        assert!(other.is_available(&period(10, 7), &trips));
    }

    #[test]
    fn completed_trips_do_not_block() {
        let p = pilot("Nowak", &[]);
        let trips = completed_trips(&p, 1, 10);

        assert!(p.is_available(&period(10, 7), &trips));
    }

    #[test]
    fn checks_license_validity() {
        let mut p = pilot("Nowak", &[]);
        let expiry = p.license_expires_on.coerce::<()>();

        assert_eq!(p.check_license_validity(today()), LicenseValidity::Valid);

        let soon = expiry.checked_sub_days(30).unwrap();
        assert_eq!(
            p.check_license_validity(soon),
            LicenseValidity::ExpiresSoon { days_left: 30 },
        );
        assert_eq!(
            p.check_license_validity(expiry),
            LicenseValidity::ExpiresSoon { days_left: 0 },
        );
        assert_eq!(p.status, Status::Active);

        let after = expiry.checked_add_days(1).unwrap();
        assert_eq!(p.check_license_validity(after), LicenseValidity::Expired);
        assert_eq!(p.status, Status::LicenseInactive);
        assert!(!p.is_available(&period(400, 3), &[]));
    }

    #[test]
    fn renewal_reactivates_suspended_pilot() {
        let mut p = pilot("Nowak", &[]);
        let after = p.license_expires_on.checked_add_days(1).unwrap();
        _ = p.check_license_validity(after.coerce());
        assert_eq!(p.status, Status::LicenseInactive);

        assert!(p
            .renew_license(after.checked_sub_days(2).unwrap(), after.coerce())
            .is_err());
        assert_eq!(p.status, Status::LicenseInactive);

        let next = after.checked_add_days(365).unwrap();
        p.renew_license(next, after.coerce()).unwrap();
        assert_eq!(p.status, Status::Active);
        assert_eq!(p.license_expires_on, next);
    }

    #[test]
    fn reports_licenses_expiring_within_window() {
        let p = pilot("Nowak", &[]);
        let expiry = p.license_expires_on.coerce::<()>();

        assert!(!p.license_expires_within(30, today()));
        let before = expiry.checked_sub_days(30).unwrap();
        assert!(p.license_expires_within(30, before));
        assert!(p.license_expires_within(30, expiry));
        let after = expiry.checked_add_days(1).unwrap();
        assert!(!p.license_expires_within(30, after));
    }

    #[test]
    fn assigns_speaking_pilot() {
        let o = croatian_offer();
        let mut t = trip_of(&o);
        let p = pilot("Nowak", &["Croatian"]);

        let assignment = p.assign_to_trip(&mut t, &o, &[]).unwrap();
        assert_eq!(t.pilot_id, Some(p.id));
        assert_eq!(
            assignment.missing_specialization,
            Specialization::new("Balkans"),
        );
    }

    #[test]
    fn specialization_is_only_a_warning() {
        let o = croatian_offer();
        let mut t = trip_of(&o);
        let mut p = pilot("Nowak", &["Croatian"]);
        _ = p.add_specialization(Specialization::new("balkans").unwrap());

        let assignment = p.assign_to_trip(&mut t, &o, &[]).unwrap();
        assert_eq!(assignment.missing_specialization, None);
    }

    #[test]
    fn language_is_mandatory() {
        let o = croatian_offer();
        let mut t = trip_of(&o);
        let mut p = pilot("Nowak", &["English"]);
        _ = p.add_specialization(Specialization::new("Balkans").unwrap());

        let err = p.assign_to_trip(&mut t, &o, &[]).unwrap_err();
        assert!(matches!(err, Error::MissingLanguage(_)));
        assert_eq!(err.kind(), ErrorKind::State);
        assert_eq!(t.pilot_id, None);
    }

    #[test]
    fn reassignment_ignores_the_trip_itself() {
        let o = croatian_offer();
        let mut t = trip_of(&o);
        let p = pilot("Nowak", &["Croatian"]);
        _ = p.assign_to_trip(&mut t, &o, &[]).unwrap();

        let trips = [t.clone()];
        assert!(p.assign_to_trip(&mut t, &o, &trips).is_ok());
    }

    #[test]
    fn assignment_requires_matching_offer() {
        let o = croatian_offer();
        let mut t = trip_of(&o);
        let p = pilot("Nowak", &["Croatian"]);

        let mut other = offer(10, "1000", 30);
        other.country = Country::new("Germany").unwrap();
        assert!(matches!(
            p.assign_to_trip(&mut t, &other, &[]),
            Err(Error::OfferMismatch(_)),
        ));
    }

    #[test]
    fn deactivation_requires_no_scheduled_trips() {
        let mut p = pilot("Nowak", &[]);
        let mut t = trip::spec::trip(10, 7);
        t.pilot_id = Some(p.id);

        assert!(matches!(
            p.deactivate(std::slice::from_ref(&t)),
            Err(Error::Busy(_)),
        ));
        assert_eq!(p.status, Status::Active);

        t.start().unwrap();
        t.complete().unwrap();
        p.deactivate(&[t]).unwrap();
        assert_eq!(p.status, Status::Inactive);
        assert!(p.deactivate(&[]).is_err());

        p.reactivate(today()).unwrap();
        assert_eq!(p.status, Status::Active);
        assert!(p.reactivate(today()).is_err());
    }

    #[test]
    fn counts_experience() {
        let p = pilot("Nowak", &[]);
        let year = today().year();
        // 2025-03-11 onwards, a week apart, all started in 2025.
        let mut trips = completed_trips(&p, 19, 10);

        assert!(!p.is_lifetime_experienced(&trips));
        assert!(p.is_active_this_year(&trips, year));
        assert!(!p.is_active_this_year(&trips, year + 1));

        trips.extend(completed_trips(&p, 1, 400));
        assert!(p.is_lifetime_experienced(&trips));
        assert_eq!(p.completed_trips_this_year(&trips, year), 19);
        assert_eq!(p.completed_trips_this_year(&trips, year + 1), 1);

        let mut planned = trip::spec::trip(500, 3);
        planned.pilot_id = Some(p.id);
        trips.push(planned);
        assert_eq!(p.completed_trips(&trips).count(), 20);
        assert_eq!(
            Date::from_calendar_date(2025, 3, 11).unwrap(),
            trips[0].period.start(),
        );
    }
}
