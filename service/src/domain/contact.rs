//! Contact details shared by people and partners.

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display};
use regex::Regex;

/// Name of a person or an organization.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
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
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Phone number.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format: an optional leading
        /// `+` followed by digits, optionally grouped with spaces or dashes.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?\d(?:[-\s]?\d){5,18}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// Email address.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid regex")
        });

        REGEX.is_match(address.as_ref())
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Postal address or any other free-form text which must not be blank.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Text(String);

impl Text {
    /// Creates a new [`Text`] if the given `text` is not blank.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Appends the provided `line` to this [`Text`].
    pub fn append(&mut self, line: &Self) {
        self.0.push_str(" | ");
        self.0.push_str(&line.0);
    }
}

impl FromStr for Text {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("blank `Text`")
    }
}

#[cfg(test)]
mod spec {
    use super::{Email, Name, Phone, Text};

    #[test]
    fn name_must_be_trimmed_and_non_empty() {
        assert!(Name::new("Anna").is_some());
        assert!(Name::new("Hotel Adriatic").is_some());
        assert!(Name::new("").is_none());
        assert!(Name::new(" Anna").is_none());
        assert!(Name::new("Anna ").is_none());
    }

    #[test]
    fn phone_accepts_common_formats() {
        assert!(Phone::new("+48 600 100 200").is_some());
        assert!(Phone::new("600-100-200").is_some());
        assert!(Phone::new("221234567").is_some());
        assert!(Phone::new("").is_none());
        assert!(Phone::new("call me").is_none());
        assert!(Phone::new("12").is_none());
    }

    #[test]
    fn email_requires_at_sign() {
        assert!(Email::new("anna@example.com").is_some());
        assert!(Email::new("anna.example.com").is_none());
        assert!(Email::new("anna@").is_none());
        assert!(Email::new("an na@example.com").is_none());
    }

    #[test]
    fn text_is_trimmed_and_appendable() {
        assert!(Text::new("   ").is_none());

        let mut text = Text::new("  Transfer ").unwrap();
        assert_eq!(text.to_string(), "Transfer");

        text.append(&Text::new("Cancelled: duplicate").unwrap());
        assert_eq!(text.to_string(), "Transfer | Cancelled: duplicate");
    }
}
