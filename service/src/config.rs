//! [`Config`]-related definitions.

use common::money::Currency;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use smart_default::SmartDefault;

use crate::domain::pilot;
#[cfg(doc)]
use crate::{
    domain::{Contract, Pilot},
    Service,
};

/// [`Service`] configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Agency configuration.
    pub agency: Agency,

    /// [`Contract`]s configuration.
    pub contracts: Contracts,

    /// [`Pilot`]s configuration.
    pub pilots: Pilots,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Agency configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Agency {
    /// Name of the agency heading its reports.
    #[default("Traveler".to_owned())]
    pub name: String,

    /// [`Currency`] the agency prices its services in.
    #[default(Currency::Pln)]
    pub currency: Currency,
}

/// [`Contract`]s configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Contracts {
    /// Prefix of [`Contract`] numbers.
    #[default("UM".to_owned())]
    pub number_prefix: String,
}

/// [`Pilot`]s configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Pilots {
    /// Default number of [`Pilot`]s to recommend for a trip.
    #[default(5)]
    pub recommendations: usize,

    /// Number of days before a license expiration to remind about it.
    #[default(pilot::LICENSE_REMINDER_DAYS)]
    pub license_reminder_days: i64,
}
