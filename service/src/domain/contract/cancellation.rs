//! [`Cancellation`] definitions.

use common::{define_kind, Date, DateOf, Money};
use derive_more::{Display, Error as StdError};

#[cfg(doc)]
use crate::domain::Contract;
use crate::domain::{contact::Text, contract::payment::Method, ErrorKind};

/// Resignation from a [`Contract`] together with its financial settlement.
#[derive(Clone, Debug)]
pub struct Cancellation {
    /// Reason of this [`Cancellation`].
    pub reason: Text,

    /// [`Date`] of this [`Cancellation`].
    pub cancelled_on: CancellationDate,

    /// Penalty retained by the agency.
    pub penalty: Money,

    /// Amount to be returned to the client.
    pub refund: Money,

    /// [`Status`] of this [`Cancellation`].
    pub status: Status,

    /// [`Date`] when the refund was paid out, if it was.
    pub refunded_on: Option<RefundDate>,

    /// [`Method`] the refund was paid out with, if it was.
    pub refund_method: Option<Method>,

    /// Notes of this [`Cancellation`], if any.
    pub notes: Option<Text>,
}

impl Cancellation {
    /// Registers a new [`Cancellation`] `today`.
    #[must_use]
    pub fn register(
        reason: Text,
        penalty: Money,
        refund: Money,
        today: Date,
    ) -> Self {
        Self {
            reason,
            cancelled_on: today.coerce(),
            penalty,
            refund,
            status: Status::Registered,
            refunded_on: None,
            refund_method: None,
            notes: None,
        }
    }

    /// Approves this [`Status::Registered`] [`Cancellation`].
    ///
    /// # Errors
    ///
    /// If this [`Cancellation`] is not [`Status::Registered`].
    pub fn approve(&mut self) -> Result<(), Error> {
        self.expect(Status::Registered)?;
        self.status = Status::Approved;
        Ok(())
    }

    /// Marks the refund of this [`Status::Approved`] [`Cancellation`] as paid
    /// out `today` with the provided [`Method`].
    ///
    /// # Errors
    ///
    /// If this [`Cancellation`] is not [`Status::Approved`].
    pub fn refund(&mut self, method: Method, today: Date) -> Result<(), Error> {
        self.expect(Status::Approved)?;
        self.status = Status::Refunded;
        self.refunded_on = Some(today.coerce());
        self.refund_method = Some(method);
        Ok(())
    }

    /// Rejects this [`Status::Registered`] [`Cancellation`] for the provided
    /// `reason`, which is noted.
    ///
    /// # Errors
    ///
    /// If this [`Cancellation`] is not [`Status::Registered`].
    pub fn reject(&mut self, reason: Text) -> Result<(), Error> {
        self.expect(Status::Registered)?;
        self.status = Status::Rejected;
        match &mut self.notes {
            Some(n) => n.append(&reason),
            None => self.notes = Some(reason),
        }
        Ok(())
    }

    /// Ensures this [`Cancellation`] is in the `expected` [`Status`].
    fn expect(&self, expected: Status) -> Result<(), Error> {
        if self.status == expected {
            Ok(())
        } else {
            Err(Error {
                expected,
                actual: self.status,
            })
        }
    }
}

define_kind! {
    #[doc = "Status of a [`Cancellation`]."]
    enum Status {
        #[doc = "[`Cancellation`] awaits a decision."]
        Registered = 1,

        #[doc = "[`Cancellation`] is accepted, refund is due."]
        Approved = 2,

        #[doc = "Refund is paid out."]
        Refunded = 3,

        #[doc = "[`Cancellation`] is rejected."]
        Rejected = 4,
    }
}

/// Marker type indicating a refund.
#[derive(Clone, Copy, Debug)]
pub struct Refund;

/// [`Date`] of a [`Cancellation`].
pub type CancellationDate = DateOf<Cancellation>;

/// [`Date`] when a [`Cancellation`] refund was paid out.
pub type RefundDate = DateOf<(Cancellation, Refund)>;

/// [`Cancellation`] is not in the [`Status`] an operation requires.
#[derive(Clone, Copy, Debug, Display, StdError)]
#[display("`Cancellation` is {actual}, but {expected} is required")]
pub struct Error {
    /// Required [`Status`].
    pub expected: Status,

    /// Actual [`Status`].
    pub actual: Status,
}

impl Error {
    /// Returns [`ErrorKind`] of this [`Error`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::State
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Date, Money};

    use crate::domain::contact::Text;

    use super::{Cancellation, Status};

    fn today() -> Date {
        Date::from_calendar_date(2025, 3, 1).unwrap()
    }

    fn cancellation() -> Cancellation {
        let pln = |amount: i64| Money {
            amount: amount.into(),
            currency: Currency::Pln,
        };
        Cancellation::register(
            Text::new("illness").unwrap(),
            pln(100),
            pln(200),
            today(),
        )
    }

    #[test]
    fn approves_then_refunds() {
        let mut c = cancellation();
        assert_eq!(c.status, Status::Registered);

        assert!(c.refund(Text::new("transfer").unwrap(), today()).is_err());

        c.approve().unwrap();
        c.refund(Text::new("transfer").unwrap(), today()).unwrap();
        assert_eq!(c.status, Status::Refunded);
        assert_eq!(c.refunded_on.map(|d| d.coerce::<()>()), Some(today()));
        assert!(c.approve().is_err());
    }

    #[test]
    fn rejects_registered_only() {
        let mut c = cancellation();

        c.reject(Text::new("no grounds").unwrap()).unwrap();
        assert_eq!(c.status, Status::Rejected);
        assert_eq!(c.notes.as_ref().unwrap().to_string(), "no grounds");

        let err = c.reject(Text::new("again").unwrap()).unwrap_err();
        assert_eq!(err.expected, Status::Registered);
        assert_eq!(err.actual, Status::Rejected);
    }
}
