//! [`Client`] definitions.

use common::{define_kind, unit, Date, DateOf, Money};
use derive_more::{AsRef, Display, Error as StdError, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    contact::{Email, Name, Phone, Text},
    contract, Contract, ErrorKind,
};

/// Number of paid or completed [`Contract`]s making a [`Client`] a VIP.
pub const VIP_CONTRACTS: usize = 5;

/// Customer of the agency.
#[derive(Clone, Debug)]
pub struct Client {
    /// ID of this [`Client`].
    pub id: Id,

    /// First name of this [`Client`].
    pub first_name: Name,

    /// Last name of this [`Client`].
    pub last_name: Name,

    /// [`NationalId`] of this [`Client`], if provided.
    pub national_id: Option<NationalId>,

    /// Number of the identity document of this [`Client`], if provided.
    pub document: Option<Text>,

    /// [`Phone`] of this [`Client`].
    pub phone: Phone,

    /// [`Email`] of this [`Client`], if provided.
    pub email: Option<Email>,

    /// Postal address of this [`Client`], if provided.
    pub address: Option<Text>,

    /// [`Date`] of birth of this [`Client`], if provided.
    pub birth_date: Option<BirthDate>,

    /// [`Date`] when this [`Client`] was registered.
    pub registered_on: RegistrationDate,

    /// [`Status`] of this [`Client`].
    pub status: Status,
}

/// Personal data of a new [`Client`].
#[derive(Clone, Debug)]
pub struct Draft {
    /// First name of the [`Client`].
    pub first_name: Name,

    /// Last name of the [`Client`].
    pub last_name: Name,

    /// [`NationalId`] of the [`Client`], if provided.
    pub national_id: Option<NationalId>,

    /// Number of the identity document of the [`Client`], if provided.
    pub document: Option<Text>,

    /// [`Phone`] of the [`Client`].
    pub phone: Phone,

    /// [`Email`] of the [`Client`], if provided.
    pub email: Option<Email>,

    /// Postal address of the [`Client`], if provided.
    pub address: Option<Text>,

    /// [`Date`] of birth of the [`Client`], if provided.
    pub birth_date: Option<BirthDate>,
}

impl Client {
    /// Registers a new [`Status::Active`] [`Client`] `today`.
    ///
    /// # Errors
    ///
    /// If the [`Draft::birth_date`] is in the future.
    pub fn new(draft: Draft, today: Date) -> Result<Self, Error> {
        let Draft {
            first_name,
            last_name,
            national_id,
            document,
            phone,
            email,
            address,
            birth_date,
        } = draft;

        if let Some(born) = birth_date.filter(|d| d.coerce::<()>() > today) {
            return Err(Error::BornInFuture(born));
        }

        Ok(Self {
            id: Id::new(),
            first_name,
            last_name,
            national_id,
            document,
            phone,
            email,
            address,
            birth_date,
            registered_on: today.coerce(),
            status: Status::Active,
        })
    }

    /// Returns the full name of this [`Client`].
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Indicates whether this [`Client`] may sign new [`Contract`]s.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Deactivates this [`Client`].
    ///
    /// # Errors
    ///
    /// If this [`Client`] is inactive already.
    pub fn deactivate(&mut self) -> Result<(), Error> {
        if !self.is_active() {
            return Err(Error::Inactive(self.id));
        }
        self.status = Status::Inactive;
        Ok(())
    }

    /// Sums up the total prices of this [`Client`]'s [`Contract`]s which are
    /// not cancelled.
    ///
    /// [`None`] is returned if this [`Client`] has no such [`Contract`]s.
    pub fn total_contracts_value<'c>(
        &self,
        contracts: impl IntoIterator<Item = &'c Contract>,
    ) -> Option<Money> {
        contracts
            .into_iter()
            .filter(|c| {
                c.client_id == self.id && c.status != contract::Status::Cancelled
            })
            .map(|c| c.total_price)
            .reduce(|total, price| total.checked_add(price).unwrap_or(total))
    }

    /// Indicates whether this [`Client`] has at least [`VIP_CONTRACTS`] paid
    /// or completed [`Contract`]s.
    pub fn is_vip<'c>(
        &self,
        contracts: impl IntoIterator<Item = &'c Contract>,
    ) -> bool {
        contracts
            .into_iter()
            .filter(|c| c.client_id == self.id && c.is_settled())
            .count()
            >= VIP_CONTRACTS
    }
}

/// ID of a [`Client`].
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

/// Polish national identification number (PESEL).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct NationalId(String);

impl NationalId {
    /// Weights of the first ten digits in the checksum.
    const WEIGHTS: [u32; 10] = [1, 3, 7, 9, 1, 3, 7, 9, 1, 3];

    /// Creates a new [`NationalId`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` consists of 11 digits, the last one
    /// being the control digit of the others.
    fn check(number: impl AsRef<str>) -> bool {
        let Some(digits) = number
            .as_ref()
            .chars()
            .map(|c| c.to_digit(10))
            .collect::<Option<Vec<_>>>()
        else {
            return false;
        };
        let [body @ .., control] = digits.as_slice() else {
            return false;
        };
        if body.len() != Self::WEIGHTS.len() {
            return false;
        }

        let sum = body
            .iter()
            .zip(Self::WEIGHTS)
            .map(|(d, w)| d * w)
            .sum::<u32>();
        (10 - sum % 10) % 10 == *control
    }
}

impl FromStr for NationalId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `NationalId`")
    }
}

define_kind! {
    #[doc = "Status of a [`Client`]."]
    enum Status {
        #[doc = "[`Client`] may sign new [`Contract`]s."]
        Active = 1,

        #[doc = "[`Client`] is no longer served."]
        Inactive = 2,
    }
}

/// Marker type indicating a birth.
#[derive(Clone, Copy, Debug)]
pub struct Birth;

/// [`Date`] when a [`Client`] was born.
pub type BirthDate = DateOf<(Client, Birth)>;

/// [`Date`] when a [`Client`] was registered.
pub type RegistrationDate = DateOf<(Client, unit::Creation)>;

/// Error of a [`Client`] operation.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Date`] of birth is in the future.
    #[display("birth date {_0} is in the future")]
    BornInFuture(#[error(not(source))] BirthDate),

    /// [`Client`] is inactive.
    #[display("`Client(id: {_0})` is inactive")]
    Inactive(#[error(not(source))] Id),
}

impl Error {
    /// Returns [`ErrorKind`] of this [`Error`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BornInFuture(_) => ErrorKind::Validation,
            Self::Inactive(_) => ErrorKind::State,
        }
    }
}
