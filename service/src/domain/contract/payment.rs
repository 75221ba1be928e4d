//! [`Payment`] definitions.

use common::{define_kind, Date, DateOf, Money};
use derive_more::{AsRef, Display, Error as StdError, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::Contract;
use crate::domain::{contact::Text, ErrorKind};

/// Method a [`Payment`] is made with, like `transfer` or `card`.
pub type Method = Text;

/// Money paid towards a [`Contract`].
#[derive(Clone, Debug)]
pub struct Payment {
    /// ID of this [`Payment`].
    pub id: Id,

    /// Amount of this [`Payment`].
    pub amount: Money,

    /// [`Date`] of this [`Payment`].
    pub paid_on: PaymentDate,

    /// [`Method`] of this [`Payment`].
    pub method: Method,

    /// [`Status`] of this [`Payment`].
    pub status: Status,

    /// Description of this [`Payment`], if any.
    pub description: Option<Text>,

    /// [`TransactionId`] of this [`Payment`].
    pub transaction_id: TransactionId,
}

impl Payment {
    /// Creates a new [`Status::Pending`] [`Payment`].
    #[must_use]
    pub fn pending(
        amount: Money,
        method: Method,
        description: Option<Text>,
        today: Date,
    ) -> Self {
        let id = Id::new();
        Self {
            id,
            amount,
            paid_on: today.coerce(),
            method,
            status: Status::Pending,
            description,
            transaction_id: TransactionId::new(id, today),
        }
    }

    /// Creates a new [`Status::Completed`] [`Payment`].
    #[must_use]
    pub fn completed(
        amount: Money,
        method: Method,
        description: Option<Text>,
        today: Date,
    ) -> Self {
        Self {
            status: Status::Completed,
            ..Self::pending(amount, method, description, today)
        }
    }

    /// Indicates whether this [`Payment`] is [`Status::Completed`].
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Completes this [`Status::Pending`] [`Payment`] `today`.
    ///
    /// # Errors
    ///
    /// If this [`Payment`] is not [`Status::Pending`].
    pub fn complete(&mut self, today: Date) -> Result<(), Error> {
        if self.status != Status::Pending {
            return Err(Error::NotPending(self.status));
        }
        self.status = Status::Completed;
        self.paid_on = today.coerce();
        Ok(())
    }

    /// Cancels this [`Payment`] for the provided `reason`, which is appended
    /// to its description.
    ///
    /// # Errors
    ///
    /// If this [`Payment`] is cancelled already.
    pub fn cancel(&mut self, reason: &Text) -> Result<(), Error> {
        if self.status == Status::Cancelled {
            return Err(Error::AlreadyCancelled);
        }
        self.status = Status::Cancelled;

        let note = Text::new(format!("Cancelled: {reason}"))
            .unwrap_or_else(|| reason.clone());
        match &mut self.description {
            Some(d) => d.append(&note),
            None => self.description = Some(note),
        }
        Ok(())
    }
}

/// ID of a [`Payment`].
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

/// Human-readable transaction number of a [`Payment`] in a
/// `TR/<year>/<code>` format.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct TransactionId(String);

impl TransactionId {
    /// Derives a new [`TransactionId`] from the [`Payment`] [`Id`].
    fn new(Id(id): Id, today: Date) -> Self {
        let code = id.simple().to_string().to_uppercase();
        Self(format!("TR/{}/{}", today.year(), &code[..8]))
    }
}

define_kind! {
    #[doc = "Status of a [`Payment`]."]
    enum Status {
        #[doc = "[`Payment`] awaits confirmation."]
        Pending = 1,

        #[doc = "[`Payment`] is received."]
        Completed = 2,

        #[doc = "[`Payment`] is cancelled."]
        Cancelled = 3,
    }
}

/// [`Date`] of a [`Payment`].
pub type PaymentDate = DateOf<Payment>;

/// Error of a [`Payment`] operation.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Payment`] is cancelled already.
    #[display("`Payment` is cancelled already")]
    AlreadyCancelled,

    /// [`Payment`] is not [`Status::Pending`].
    #[display("`Payment` is {_0}, not pending")]
    NotPending(#[error(not(source))] Status),
}

impl Error {
    /// Returns [`ErrorKind`] of this [`Error`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyCancelled | Self::NotPending(_) => ErrorKind::State,
        }
    }
}
