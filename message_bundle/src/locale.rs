//! Locale identity and the fallback chain.
//!
//! A [`Locale`] is a `(language, country, variant)` triple in which any field
//! may be empty; the all-empty value is the *root* locale that anchors every
//! fallback chain. Locales order themselves by specificity only through
//! [`Locale::fallback`], which yields the next less specific locale to try
//! when a resource is absent.

use serde::{Deserialize, Serialize};
use std::fmt;
use unic_langid::LanguageIdentifier;

/// Language, country and variant triple identifying a dialect or region.
///
/// Equality and hashing are structural over the three fields, so a `Locale`
/// can key a cache directly. The textual form joins the non-empty fields with
/// underscores (`de`, `de_DE`, `de_DE_bavarian`) and is empty for the root
/// locale.
///
/// # Examples
///
/// ```
/// use message_bundle::Locale;
///
/// let bavarian = Locale::new("de").with_country("DE").with_variant("bavarian");
/// assert_eq!(bavarian.to_string(), "de_DE_bavarian");
/// assert_eq!(bavarian.fallback(), Some(Locale::new("de").with_country("DE")));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    language: String,
    country: String,
    variant: String,
}

impl Locale {
    /// The root locale, with every field empty.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a language-only locale.
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            country: String::new(),
            variant: String::new(),
        }
    }

    /// Returns this locale with the country replaced.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Returns this locale with the variant replaced.
    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    /// Parses a locale tag, accepting both `_` and `-` separators.
    ///
    /// Parsing never fails: an empty tag yields the root locale, and any
    /// segments beyond the third are folded into the variant. This keeps
    /// BCP-47 style tags from the operating system (`en-US`) and resource
    /// file suffixes (`en_US`) interchangeable. A four-letter second
    /// segment is a BCP-47 script subtag; resource names carry no script,
    /// so it is skipped, as the language-identifier conversion does
    /// (`zh-Hans-CN` parses as `zh_CN`).
    ///
    /// # Examples
    ///
    /// ```
    /// use message_bundle::Locale;
    ///
    /// assert_eq!(Locale::parse("en-US"), Locale::new("en").with_country("US"));
    /// assert_eq!(Locale::parse(""), Locale::root());
    /// ```
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        let mut parts = tag.split(['_', '-']);
        let language = parts.next().unwrap_or_default();
        let mut country = parts.next().unwrap_or_default();
        if is_script_subtag(country) {
            country = parts.next().unwrap_or_default();
        }
        let variant = parts.collect::<Vec<_>>().join("_");
        Self {
            language: language.to_owned(),
            country: country.to_owned(),
            variant,
        }
    }

    /// The language field, possibly empty.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The country field, possibly empty.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// The variant field, possibly empty.
    #[must_use]
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Whether this is the root locale.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.language.is_empty() && self.country.is_empty() && self.variant.is_empty()
    }

    /// The next less specific locale to try, or `None` at the root.
    ///
    /// Specificity descends strictly: variant is dropped first, then country,
    /// then language. Any locale therefore reaches the root in at most three
    /// steps, which bounds the depth of every parent chain.
    #[must_use]
    pub fn fallback(&self) -> Option<Self> {
        if !self.variant.is_empty() {
            return Some(Self {
                language: self.language.clone(),
                country: self.country.clone(),
                variant: String::new(),
            });
        }
        if !self.country.is_empty() {
            return Some(Self::new(self.language.clone()));
        }
        if !self.language.is_empty() {
            return Some(Self::root());
        }
        None
    }
}

fn is_script_subtag(part: &str) -> bool {
    part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic())
}

impl fmt::Display for Locale {
    /// Writes the underscore-joined form used in resource file names.
    ///
    /// A variant without a country keeps its positional underscore
    /// (`de__bavarian`), mirroring the historical file naming convention.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if !self.country.is_empty() || !self.variant.is_empty() {
            write!(f, "_{}", self.country)?;
        }
        if !self.variant.is_empty() {
            write!(f, "_{}", self.variant)?;
        }
        Ok(())
    }
}

impl From<&LanguageIdentifier> for Locale {
    /// Converts a BCP-47 language identifier, mapping the undetermined
    /// language (`und`) to an empty field and taking the first variant only.
    fn from(langid: &LanguageIdentifier) -> Self {
        let language = match langid.language.as_str() {
            "und" => String::new(),
            tag => tag.to_owned(),
        };
        Self {
            language,
            country: langid
                .region
                .map(|region| region.as_str().to_owned())
                .unwrap_or_default(),
            variant: langid
                .variants()
                .next()
                .map(|variant| variant.as_str().to_owned())
                .unwrap_or_default(),
        }
    }
}
