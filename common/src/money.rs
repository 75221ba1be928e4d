//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal, RoundingStrategy};

use crate::define_kind;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Number of decimal places [`Money`] amounts are [`round`]ed to.
    ///
    /// [`round`]: Money::round
    pub const SCALE: u32 = 2;

    /// Creates a zero [`Money`] amount in the provided [`Currency`].
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns [`Money`] with the provided `amount` in the same [`Currency`].
    #[must_use]
    pub const fn with_amount(self, amount: Decimal) -> Self {
        Self {
            amount,
            currency: self.currency,
        }
    }

    /// Rounds this [`Money`] to [`Money::SCALE`] decimal places, with
    /// midpoints rounded away from zero.
    #[must_use]
    pub fn round(self) -> Self {
        self.with_amount(self.amount.round_dp_with_strategy(
            Self::SCALE,
            RoundingStrategy::MidpointAwayFromZero,
        ))
    }

    /// Indicates whether this [`Money`] amount is greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Adds the `other` [`Money`] to this one.
    ///
    /// [`None`] is returned if the [`Currency`]s differ or on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        (self.currency == other.currency)
            .then(|| self.amount.checked_add(other.amount))
            .flatten()
            .map(|amount| self.with_amount(amount))
    }

    /// Subtracts the `other` [`Money`] from this one.
    ///
    /// [`None`] is returned if the [`Currency`]s differ or on overflow.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        (self.currency == other.currency)
            .then(|| self.amount.checked_sub(other.amount))
            .flatten()
            .map(|amount| self.with_amount(amount))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        if amount.is_integer() {
            write!(f, "{}{currency}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "{amount}{currency}")
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "US Dollar."]
        Usd = 1,

        #[doc = "Euro."]
        Eur = 2,

        #[doc = "Russian Ruble."]
        Rub = 3,

        #[doc = "Polish Zloty."]
        Pln = 4,
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("123.45USD").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Usd,
            },
        );

        assert_eq!(
            Money::from_str("123.45EUR").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Eur,
            },
        );

        assert_eq!(
            Money::from_str("123.45RUB").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Rub,
            },
        );

        assert_eq!(
            Money::from_str("9215.00PLN").unwrap(),
            Money {
                amount: decimal("9215.00"),
                currency: Currency::Pln,
            },
        );

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Us").is_err());
        assert!(Money::from_str("123.45Usdollar").is_err());

        assert!(Money::from_str("123.00USD").is_ok());
        assert!(Money::from_str("123.0USD").is_ok());
        assert!(Money::from_str("123USD").is_ok());
    }

    #[test]
    fn to_string() {
        assert_eq!(
            Money {
                amount: decimal("123.45"),
                currency: Currency::Usd,
            }
            .to_string(),
            "123.45USD",
        );

        assert_eq!(
            Money {
                amount: decimal("123.45"),
                currency: Currency::Eur,
            }
            .to_string(),
            "123.45EUR",
        );

        assert_eq!(
            Money {
                amount: decimal("123.45"),
                currency: Currency::Rub,
            }
            .to_string(),
            "123.45RUB",
        );

        assert_eq!(
            Money {
                amount: decimal("123.00"),
                currency: Currency::Usd,
            }
            .to_string(),
            "123USD",
        );
        assert_eq!(
            Money {
                amount: decimal("123.0"),
                currency: Currency::Usd,
            }
            .to_string(),
            "123USD",
        );
        assert_eq!(
            Money {
                amount: decimal("123"),
                currency: Currency::Usd,
            }
            .to_string(),
            "123USD",
        );
    }

    #[test]
    fn rounds_midpoints_away_from_zero() {
        let pln = Money::zero(Currency::Pln);
        let round = |s| pln.with_amount(decimal(s)).round().amount;

        assert_eq!(round("2764.5"), decimal("2764.50"));
        assert_eq!(round("0.125"), decimal("0.13"));
        assert_eq!(round("0.124"), decimal("0.12"));
        assert_eq!(round("-0.125"), decimal("-0.13"));
    }

    #[test]
    fn arithmetic_requires_same_currency() {
        let pln = Money::from_str("100PLN").unwrap();
        let eur = Money::from_str("100EUR").unwrap();

        assert_eq!(
            pln.checked_add(pln).unwrap(),
            Money::from_str("200PLN").unwrap(),
        );
        assert_eq!(
            pln.checked_sub(Money::from_str("30.5PLN").unwrap()).unwrap(),
            Money::from_str("69.5PLN").unwrap(),
        );
        assert!(pln.checked_add(eur).is_none());
        assert!(pln.checked_sub(eur).is_none());
        assert!(pln.is_positive());
        assert!(!Money::zero(Currency::Pln).is_positive());
    }
}
