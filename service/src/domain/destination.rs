//! Destination [`Country`] and the requirements it imposes on a guide.

use std::{collections::HashMap, str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display};

#[cfg(doc)]
use crate::domain::Pilot;

/// Country a trip goes to.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Country(String);

impl Country {
    /// Creates a new [`Country`] if the given `name` is not blank.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        normalize(name.into()).map(Self)
    }

    /// Checks whether this [`Country`] names the same country as the `other`
    /// one, ignoring letter case.
    #[must_use]
    pub fn is(&self, other: &Self) -> bool {
        eq_ignore_case(&self.0, &other.0)
    }

    /// Returns the [`Language`] a [`Pilot`] must speak to guide a trip to
    /// this [`Country`].
    ///
    /// English is required for countries missing in the lookup table.
    #[must_use]
    pub fn required_language(&self) -> Language {
        Language(
            LANGUAGE_BY_COUNTRY
                .get(self.key().as_str())
                .copied()
                .unwrap_or(DEFAULT_LANGUAGE)
                .to_owned(),
        )
    }

    /// Returns the [`Specialization`] a [`Pilot`] is expected to have to
    /// guide a trip to this [`Country`].
    ///
    /// The [`Country`] name itself is used for countries missing in the
    /// lookup table.
    #[must_use]
    pub fn required_specialization(&self) -> Specialization {
        Specialization(
            REGION_BY_COUNTRY
                .get(self.key().as_str())
                .map_or_else(|| self.0.clone(), |&r| r.to_owned()),
        )
    }

    /// Returns the lookup key of this [`Country`].
    fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl FromStr for Country {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("blank `Country`")
    }
}

/// Language spoken by a [`Pilot`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Language(String);

impl Language {
    /// Creates a new [`Language`] if the given `name` is not blank.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        normalize(name.into()).map(Self)
    }

    /// Returns the [`Language`] every newly hired [`Pilot`] speaks.
    #[must_use]
    pub fn native() -> Self {
        Self(NATIVE_LANGUAGE.to_owned())
    }

    /// Checks whether this [`Language`] is the `other` one, ignoring letter
    /// case.
    #[must_use]
    pub fn is(&self, other: &Self) -> bool {
        eq_ignore_case(&self.0, &other.0)
    }
}

impl FromStr for Language {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("blank `Language`")
    }
}

/// Area of expertise of a [`Pilot`], usually a region of the world.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Specialization(String);

impl Specialization {
    /// Creates a new [`Specialization`] if the given `name` is not blank.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        normalize(name.into()).map(Self)
    }

    /// Checks whether this [`Specialization`] is the `other` one, ignoring
    /// letter case.
    #[must_use]
    pub fn is(&self, other: &Self) -> bool {
        eq_ignore_case(&self.0, &other.0)
    }
}

impl FromStr for Specialization {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("blank `Specialization`")
    }
}

/// Requirements a [`Pilot`] is matched against when guiding a trip to some
/// [`Country`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Requirements {
    /// [`Language`] the [`Pilot`] must speak.
    pub language: Language,

    /// [`Specialization`] the [`Pilot`] is expected to have.
    pub specialization: Specialization,
}

impl From<&Country> for Requirements {
    fn from(country: &Country) -> Self {
        Self {
            language: country.required_language(),
            specialization: country.required_specialization(),
        }
    }
}

/// Trims the provided `name`, returning [`None`] if nothing is left.
fn normalize(name: String) -> Option<String> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Compares two strings ignoring letter case.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Language required when a country is missing in [`LANGUAGES`].
const DEFAULT_LANGUAGE: &str = "English";

/// Language spoken by the agency staff.
const NATIVE_LANGUAGE: &str = "Polish";

/// Language spoken in each country, keyed by the lowercase country name.
const LANGUAGES: &[(&str, &str)] = &[
    ("germany", "German"),
    ("france", "French"),
    ("spain", "Spanish"),
    ("italy", "Italian"),
    ("greece", "Greek"),
    ("croatia", "Croatian"),
    ("czechia", "Czech"),
    ("austria", "German"),
    ("hungary", "Hungarian"),
    ("romania", "Romanian"),
    ("bulgaria", "Bulgarian"),
    ("slovakia", "Slovak"),
    ("slovenia", "Slovenian"),
    ("lithuania", "English"),
    ("latvia", "English"),
    ("estonia", "English"),
    ("russia", "Russian"),
    ("ukraine", "Ukrainian"),
    ("turkey", "Turkish"),
    ("egypt", "Arabic"),
    ("israel", "Hebrew"),
    ("morocco", "French"),
    ("tunisia", "French"),
    ("portugal", "Portuguese"),
    ("netherlands", "Dutch"),
    ("belgium", "French"),
    ("switzerland", "German"),
    ("denmark", "English"),
    ("sweden", "English"),
    ("norway", "English"),
    ("finland", "Finnish"),
    ("iceland", "English"),
    ("ireland", "English"),
    ("united kingdom", "English"),
    ("england", "English"),
    ("malta", "English"),
    ("cyprus", "Greek"),
];

/// Regions a guide may specialize in, with their lowercase country names.
const REGIONS: &[(&str, &[&str])] = &[
    (
        "Balkans",
        &[
            "croatia",
            "slovenia",
            "bosnia and herzegovina",
            "serbia",
            "montenegro",
            "macedonia",
        ],
    ),
    ("Aegean Sea", &["greece", "cyprus", "turkey"]),
    ("Iberian Peninsula", &["spain", "portugal"]),
    ("Italy", &["italy", "san marino", "vatican"]),
    ("France", &["france", "monaco"]),
    ("German-speaking countries", &["germany", "austria", "switzerland"]),
    ("Central Europe", &["czechia", "slovakia", "hungary"]),
    (
        "Scandinavia",
        &["denmark", "sweden", "norway", "finland", "iceland"],
    ),
    ("Benelux", &["netherlands", "belgium", "luxembourg"]),
    ("Baltic states", &["lithuania", "latvia", "estonia"]),
    ("Eastern Europe", &["russia", "belarus", "ukraine"]),
    ("North Africa", &["egypt", "morocco", "tunisia", "algeria"]),
    ("Middle East", &["israel", "jordan"]),
    ("Southeast Asia", &["thailand", "vietnam", "cambodia", "laos"]),
    ("South Asia", &["india", "nepal", "sri lanka"]),
    ("Far East", &["china", "japan", "south korea"]),
    ("North America", &["usa", "canada"]),
    ("Central America", &["mexico", "guatemala", "costa rica"]),
    ("South America", &["brazil", "argentina", "peru", "chile"]),
    ("Oceania", &["australia", "new zealand"]),
];

/// [`LANGUAGES`] indexed by country.
static LANGUAGE_BY_COUNTRY: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| LANGUAGES.iter().copied().collect());

/// [`REGIONS`] indexed by country.
static REGION_BY_COUNTRY: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        REGIONS
            .iter()
            .flat_map(|&(region, countries)| {
                countries.iter().map(move |&country| (country, region))
            })
            .collect()
    });

#[cfg(test)]
mod spec {
    use super::{Country, Language, Requirements, Specialization};

    fn country(name: &str) -> Country {
        Country::new(name).unwrap()
    }

    fn language_of(name: &str) -> String {
        country(name).required_language().to_string()
    }

    #[test]
    fn language_lookup_ignores_case() {
        assert_eq!(language_of("Germany"), "German");
        assert_eq!(language_of("AUSTRIA"), "German");
        assert_eq!(language_of("egypt"), "Arabic");
        assert_eq!(language_of("Cyprus"), "Greek");
    }

    #[test]
    fn unknown_country_requires_english() {
        assert_eq!(language_of("Atlantis"), "English");
    }

    #[test]
    fn specialization_lookup_falls_back_to_country() {
        assert_eq!(
            country("Montenegro").required_specialization().to_string(),
            "Balkans",
        );
        assert_eq!(
            country("Sri Lanka").required_specialization().to_string(),
            "South Asia",
        );
        assert_eq!(
            country("Atlantis").required_specialization().to_string(),
            "Atlantis",
        );
    }

    #[test]
    fn requirements_follow_country() {
        let Requirements {
            language,
            specialization,
        } = Requirements::from(&country("Spain"));

        assert!(language.is(&Language::new("spanish").unwrap()));
        assert!(specialization
            .is(&Specialization::new("iberian peninsula").unwrap()));
    }

    #[test]
    fn names_are_trimmed() {
        assert!(Country::new("   ").is_none());
        assert_eq!(country("  Malta ").to_string(), "Malta");
        assert!(country("malta").is(&country("MALTA")));
        assert_eq!(Language::native().to_string(), "Polish");
    }
}
