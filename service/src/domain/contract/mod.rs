//! [`Contract`] definitions.

pub mod cancellation;
pub mod payment;

use std::{fmt, str::FromStr};

use common::{
    define_kind, money::Currency, unit, Date, DateOf, Money, Percent,
};
use derive_more::{Display, Error as StdError, From, Into};
use rust_decimal::Decimal;
use tracing as log;

use crate::domain::{client, contact::Text, offer, Client, ErrorKind, Offer};

pub use self::{
    cancellation::Cancellation,
    payment::{Method, Payment},
};

/// Share of the total price paid as a deposit.
pub const DEPOSIT_RATE: Percent = Percent::saturating(30);

/// Number of days before the departure the balance is due.
pub const BALANCE_DUE_DAYS: i64 = 14;

/// Tolerated difference between the paid and the computed deposit.
pub const DEPOSIT_TOLERANCE: Decimal = Decimal::TEN;

/// Agreement of a [`Client`] to take part in an [`Offer`].
#[derive(Clone, Debug)]
pub struct Contract {
    /// [`Number`] of this [`Contract`].
    pub number: Number,

    /// [`Date`] when this [`Contract`] was concluded.
    pub concluded_on: ConclusionDate,

    /// ID of the [`Client`] of this [`Contract`].
    pub client_id: client::Id,

    /// ID of the [`Offer`] of this [`Contract`].
    pub offer_id: offer::Id,

    /// Number of participants.
    pub participants: u32,

    /// Total price for all the participants.
    pub total_price: Money,

    /// Deposit to be paid, [`DEPOSIT_RATE`] of the
    /// [`Contract::total_price`].
    pub deposit: Money,

    /// [`Date`] when the deposit was paid, if it was.
    pub deposit_paid_on: Option<DepositDate>,

    /// Amount still to be paid.
    pub remaining: Money,

    /// [`Date`] when the balance is due.
    pub balance_due_on: BalanceDueDate,

    /// [`Status`] of this [`Contract`].
    pub status: Status,

    /// Notes of this [`Contract`], if any.
    pub notes: Option<Text>,

    /// [`Payment`]s made towards this [`Contract`].
    pub payments: Vec<Payment>,

    /// [`Cancellation`] of this [`Contract`], if it was cancelled.
    pub cancellation: Option<Cancellation>,
}

impl Contract {
    /// Concludes a new [`Status::Signed`] [`Contract`] of the provided
    /// [`Client`] for the provided number of `participants` of the [`Offer`],
    /// reserving their seats.
    ///
    /// # Errors
    ///
    /// If the [`Client`] is inactive, no participants are given or the
    /// [`Offer`] has not enough seats. Neither the [`Offer`] nor anything
    /// else is changed then.
    pub fn create(
        number: Number,
        client: &Client,
        offer: &mut Offer,
        participants: u32,
        today: Date,
    ) -> Result<Self, Error> {
        if participants == 0 {
            return Err(Error::Offer(offer::Error::NoParticipants));
        }
        if !client.is_active() {
            return Err(Error::Client(client::Error::Inactive(client.id)));
        }
        let available = offer.available_seats(today);
        if participants > available {
            return Err(Error::Offer(offer::Error::NotEnoughSeats {
                requested: participants,
                available,
            }));
        }

        let total_price = offer.total_price(participants, today)?;
        let balance_due_on = offer
            .departure
            .checked_sub_days(BALANCE_DUE_DAYS)
            .ok_or(Error::DateOutOfRange)?;
        let mut contract = Self {
            number,
            concluded_on: today.coerce(),
            client_id: client.id,
            offer_id: offer.id,
            participants,
            total_price,
            deposit: total_price
                .with_amount(DEPOSIT_RATE.of(total_price.amount))
                .round(),
            deposit_paid_on: None,
            remaining: total_price,
            balance_due_on: balance_due_on.coerce(),
            status: Status::Created,
            notes: None,
            payments: vec![],
            cancellation: None,
        };

        offer.reserve_seats(participants, today)?;
        contract.status = Status::Signed;
        Ok(contract)
    }

    /// Records the deposit `amount` paid `today` with the provided [`Method`].
    ///
    /// Paying the whole [`Contract::total_price`] settles this [`Contract`]
    /// at once.
    ///
    /// # Errors
    ///
    /// If the `amount` is not positive or in another currency, the deposit
    /// is recorded already, or this [`Contract`] is not
    /// [`Status::Signed`].
    pub fn record_deposit(
        &mut self,
        amount: Money,
        method: Method,
        today: Date,
    ) -> Result<(), Error> {
        self.check_amount(amount)?;
        if self.deposit_paid_on.is_some() {
            return Err(Error::DepositAlreadyPaid);
        }
        if self.status != Status::Signed {
            return Err(Error::Status(self.status));
        }

        if (amount.amount - self.deposit.amount).abs() > DEPOSIT_TOLERANCE {
            log::warn!(
                "deposit of {amount} for `Contract(number: {})` differs \
                 from the expected {}",
                self.number,
                self.deposit,
            );
        }

        if amount.amount >= self.total_price.amount {
            self.status = Status::Paid;
            self.remaining = Money::zero(self.total_price.currency);
        } else {
            self.status = Status::DepositPaid;
            self.remaining = self
                .total_price
                .with_amount(self.total_price.amount - amount.amount);
        }
        self.deposit_paid_on = Some(today.coerce());
        self.payments.push(Payment::completed(
            amount,
            method,
            Text::new("Deposit"),
            today,
        ));
        Ok(())
    }

    /// Records a payment of the remaining balance made `today` with the
    /// provided [`Method`].
    ///
    /// # Errors
    ///
    /// If the `amount` is not positive, in another currency, or exceeds
    /// the [`Contract::remaining`] amount, or this [`Contract`] is not
    /// [`Status::DepositPaid`].
    pub fn record_balance_payment(
        &mut self,
        amount: Money,
        method: Method,
        today: Date,
    ) -> Result<(), Error> {
        self.check_amount(amount)?;
        if self.status != Status::DepositPaid {
            return Err(Error::Status(self.status));
        }
        if amount.amount > self.remaining.amount {
            return Err(Error::Overpayment {
                amount,
                remaining: self.remaining,
            });
        }

        self.remaining =
            self.remaining.with_amount(self.remaining.amount - amount.amount);
        if self.remaining.amount.is_zero() {
            self.status = Status::Paid;
        }
        self.payments.push(Payment::completed(
            amount,
            method,
            Text::new("Balance"),
            today,
        ));
        Ok(())
    }

    /// Marks this [`Status::Paid`] [`Contract`] as fulfilled.
    ///
    /// # Errors
    ///
    /// If this [`Contract`] is not [`Status::Paid`].
    pub fn complete(&mut self) -> Result<(), Error> {
        if self.status != Status::Paid {
            return Err(Error::Status(self.status));
        }
        self.status = Status::Completed;
        Ok(())
    }

    /// Cancels this [`Contract`] `today` for the provided `reason`, releasing
    /// its seats back to the [`Offer`].
    ///
    /// The penalty depends on the number of days left until the departure
    /// (see [`penalty_rate()`]), and everything paid above it is refunded.
    ///
    /// # Errors
    ///
    /// If this [`Contract`] is cancelled or completed already, or the
    /// provided [`Offer`] is not the one of this [`Contract`].
    pub fn cancel(
        &mut self,
        reason: Text,
        offer: &mut Offer,
        today: Date,
    ) -> Result<&Cancellation, Error> {
        match self.status {
            Status::Cancelled => return Err(Error::AlreadyCancelled),
            Status::Completed => return Err(Error::Status(self.status)),
            Status::Created
            | Status::Signed
            | Status::DepositPaid
            | Status::Paid => {}
        }
        if offer.id != self.offer_id {
            return Err(Error::OfferMismatch(offer.id));
        }

        let days_left = today.days_until(offer.departure);
        let penalty = self
            .total_price
            .with_amount(penalty_rate(days_left).of(self.total_price.amount))
            .round();
        let paid = self.paid_amount();
        let refund =
            paid.with_amount((paid.amount - penalty.amount).max(Decimal::ZERO));

        if self.is_reserving() {
            offer.release_seats(self.participants);
        }
        self.status = Status::Cancelled;
        log::debug!(
            "`Contract(number: {})` cancelled {days_left} day(s) before \
             departure: penalty {penalty}, refund {refund}",
            self.number,
        );
        Ok(self.cancellation.insert(Cancellation::register(
            reason, penalty, refund, today,
        )))
    }

    /// Approves the [`Cancellation`] of this [`Contract`].
    ///
    /// # Errors
    ///
    /// If this [`Contract`] is not cancelled, or its [`Cancellation`] is
    /// resolved already.
    pub fn approve_cancellation(&mut self) -> Result<&Cancellation, Error> {
        let cancellation =
            self.cancellation.as_mut().ok_or(Error::NotCancelled)?;
        cancellation.approve()?;
        Ok(&*cancellation)
    }

    /// Refunds the approved [`Cancellation`] of this [`Contract`] `today`
    /// with the provided [`Method`].
    ///
    /// # Errors
    ///
    /// If this [`Contract`] is not cancelled, or its [`Cancellation`] is not
    /// approved.
    pub fn refund_cancellation(
        &mut self,
        method: Method,
        today: Date,
    ) -> Result<&Cancellation, Error> {
        let cancellation =
            self.cancellation.as_mut().ok_or(Error::NotCancelled)?;
        cancellation.refund(method, today)?;
        Ok(&*cancellation)
    }

    /// Rejects the [`Cancellation`] of this [`Contract`] for the provided
    /// `reason`.
    ///
    /// The [`Contract`] stays [`Status::Cancelled`].
    ///
    /// # Errors
    ///
    /// If this [`Contract`] is not cancelled, or its [`Cancellation`] is
    /// resolved already.
    pub fn reject_cancellation(
        &mut self,
        reason: Text,
    ) -> Result<&Cancellation, Error> {
        let cancellation =
            self.cancellation.as_mut().ok_or(Error::NotCancelled)?;
        cancellation.reject(reason)?;
        Ok(&*cancellation)
    }

    /// Sums up all the [`payment::Status::Completed`] [`Payment`]s of this
    /// [`Contract`].
    #[must_use]
    pub fn paid_amount(&self) -> Money {
        let currency = self.total_price.currency;
        self.payments
            .iter()
            .filter(|p| p.is_completed() && p.amount.currency == currency)
            .fold(Money::zero(currency), |sum, p| {
                sum.with_amount(sum.amount + p.amount.amount)
            })
    }

    /// Indicates whether this [`Contract`] holds its seats of the [`Offer`].
    #[must_use]
    pub fn is_reserving(&self) -> bool {
        matches!(
            self.status,
            Status::Signed | Status::DepositPaid | Status::Paid,
        )
    }

    /// Indicates whether this [`Contract`] is paid in full.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self.status, Status::Paid | Status::Completed)
    }

    /// Indicates whether the balance of this [`Contract`] is due before the
    /// provided `today` and still unpaid.
    #[must_use]
    pub fn is_balance_overdue(&self, today: Date) -> bool {
        self.status == Status::DepositPaid
            && self.balance_due_on.coerce::<()>() < today
    }

    /// Ensures the provided payment `amount` is acceptable.
    fn check_amount(&self, amount: Money) -> Result<(), Error> {
        if !amount.is_positive() {
            return Err(Error::InvalidAmount(amount));
        }
        if amount.currency != self.total_price.currency {
            return Err(Error::CurrencyMismatch(amount.currency));
        }
        Ok(())
    }
}

/// Returns the share of the total price retained when a [`Contract`] is
/// cancelled the provided number of days before the departure.
#[must_use]
pub const fn penalty_rate(days_left: i64) -> Percent {
    match days_left {
        30.. => Percent::saturating(10),
        14..=29 => Percent::saturating(25),
        7..=13 => Percent::saturating(50),
        _ => Percent::saturating(100),
    }
}

/// Natural key of a [`Contract`] in a `<prefix>/<year>/<sequence>` format,
/// like `UM/2025/0001`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Number {
    /// Prefix of this [`Number`].
    prefix: String,

    /// [`Year`] of this [`Number`].
    year: Year,

    /// [`Sequence`] of this [`Number`] within its [`Year`].
    sequence: Sequence,
}

impl Number {
    /// Creates a new [`Number`] if the `prefix` is a non-empty word without
    /// slashes or whitespace.
    #[must_use]
    pub fn new(
        prefix: impl Into<String>,
        year: Year,
        sequence: Sequence,
    ) -> Option<Self> {
        let prefix = prefix.into();
        let valid = !prefix.is_empty()
            && !prefix.chars().any(|c| c == '/' || c.is_whitespace());
        valid.then_some(Self {
            prefix,
            year,
            sequence,
        })
    }

    /// Returns the prefix of this [`Number`].
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the [`Year`] of this [`Number`].
    #[must_use]
    pub fn year(&self) -> Year {
        self.year
    }

    /// Returns the [`Sequence`] of this [`Number`].
    #[must_use]
    pub fn sequence(&self) -> Sequence {
        self.sequence
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{:04}", self.prefix, self.year, self.sequence.0)
    }
}

impl FromStr for Number {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        let (Some(prefix), Some(year), Some(sequence), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err("`Number` must have three `/`-separated parts");
        };
        let year = year.parse().map(Year).map_err(|_| "invalid year")?;
        let sequence = sequence
            .parse()
            .ok()
            .and_then(Sequence::new)
            .ok_or("invalid sequence")?;
        Self::new(prefix, year, sequence).ok_or("invalid prefix")
    }
}

/// Calendar year [`Contract`]s are numbered within.
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq)]
pub struct Year(i32);

impl Year {
    /// Returns the [`Year`] of the provided [`Date`].
    #[must_use]
    pub fn of<Of: ?Sized>(date: DateOf<Of>) -> Self {
        Self(date.year())
    }
}

/// Position of a [`Contract`] within its [`Year`], starting from `1`.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct Sequence(u32);

impl Sequence {
    /// First [`Sequence`] of a [`Year`].
    pub const FIRST: Self = Self(1);

    /// Creates a new [`Sequence`] if the provided `value` is positive.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Returns the [`Sequence`] following this one.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

define_kind! {
    #[doc = "Status of a [`Contract`]."]
    enum Status {
        #[doc = "[`Contract`] is drafted, but not signed yet."]
        Created = 1,

        #[doc = "[`Contract`] is signed and awaits its deposit."]
        Signed = 2,

        #[doc = "Deposit of the [`Contract`] is paid."]
        DepositPaid = 3,

        #[doc = "[`Contract`] is paid in full."]
        Paid = 4,

        #[doc = "Trip of the [`Contract`] took place."]
        Completed = 5,

        #[doc = "[`Contract`] is cancelled."]
        Cancelled = 6,
    }
}

/// Marker type indicating a deposit.
#[derive(Clone, Copy, Debug)]
pub struct Deposit;

/// Marker type indicating a balance payment.
#[derive(Clone, Copy, Debug)]
pub struct Balance;

/// [`Date`] when a [`Contract`] was concluded.
pub type ConclusionDate = DateOf<(Contract, unit::Creation)>;

/// [`Date`] when a [`Contract`] deposit was paid.
pub type DepositDate = DateOf<(Contract, Deposit)>;

/// [`Date`] when a [`Contract`] balance is due.
pub type BalanceDueDate = DateOf<(Contract, Balance, unit::Expiration)>;

/// Error of a [`Contract`] operation.
#[derive(Clone, Copy, Debug, Display, StdError, From)]
pub enum Error {
    /// [`Contract`] is cancelled already.
    #[display("`Contract` is cancelled already")]
    AlreadyCancelled,

    /// [`Cancellation`] operation failed.
    #[display("`Cancellation` failed: {_0}")]
    #[from]
    Cancellation(cancellation::Error),

    /// [`Client`] cannot conclude a [`Contract`].
    #[display("`Client` is not eligible: {_0}")]
    #[from]
    Client(client::Error),

    /// Payment is in a [`Currency`] other than the [`Contract`] one.
    #[display("payment in {_0} does not match the `Contract` currency")]
    CurrencyMismatch(#[error(not(source))] Currency),

    /// Computed [`Date`] is out of the supported range.
    #[display("date is out of range")]
    DateOutOfRange,

    /// Deposit is recorded already.
    #[display("deposit is recorded already")]
    DepositAlreadyPaid,

    /// Payment amount is not positive.
    #[display("payment amount must be positive, got {_0}")]
    InvalidAmount(#[error(not(source))] Money),

    /// [`Contract`] has no [`Cancellation`].
    #[display("`Contract` is not cancelled")]
    NotCancelled,

    /// [`Offer`] operation failed.
    #[display("`Offer` refused: {_0}")]
    #[from]
    Offer(offer::Error),

    /// [`Offer`] is not the one of the [`Contract`].
    #[display("`Offer(id: {_0})` does not belong to the `Contract`")]
    OfferMismatch(#[error(not(source))] offer::Id),

    /// Payment exceeds the remaining amount.
    #[display("payment of {amount} exceeds the remaining {remaining}")]
    Overpayment {
        /// Amount paid.
        amount: Money,

        /// Amount remaining to be paid.
        remaining: Money,
    },

    /// Operation is not allowed in the current [`Status`].
    #[display("operation is not allowed for a {_0} `Contract`")]
    Status(#[error(not(source))] Status),
}

impl Error {
    /// Returns [`ErrorKind`] of this [`Error`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Cancellation(e) => e.kind(),
            Self::Client(e) => e.kind(),
            Self::Offer(e) => e.kind(),
            Self::CurrencyMismatch(_)
            | Self::DateOutOfRange
            | Self::InvalidAmount(_)
            | Self::OfferMismatch(_)
            | Self::Overpayment { .. } => ErrorKind::Validation,
            Self::AlreadyCancelled
            | Self::DepositAlreadyPaid
            | Self::NotCancelled
            | Self::Status(_) => ErrorKind::State,
        }
    }
}
