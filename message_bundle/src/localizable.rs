//! Deferred rendering of localised messages.
//!
//! A [`Localizable`] captures a template reference and its arguments without
//! touching the cache or doing any I/O; the locale is chosen only when the
//! string is actually needed. This lets a computation produce messages whose
//! language is decided at output time, for example per receiving user.

use crate::error::BundleResult;
use crate::locale::Locale;
use crate::namespace::Namespace;
use crate::resolver::BundleResolver;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A value that can be substituted into a message template.
///
/// Numbers, text and timestamps keep their native representation so typed
/// format hints (`{0,number}`, `{0,date}`) can apply; anything else is
/// reduced to its display string up front via [`Renderable::display`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Renderable {
    /// An absent value; always renders as the literal string `null`.
    Null,
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// Plain text.
    Text(String),
    /// A date and time without a timezone.
    Timestamp(NaiveDateTime),
}

impl Renderable {
    /// Captures an arbitrary value by its display string.
    ///
    /// Use this for argument types without a native [`Renderable`] form; the
    /// reduction happens immediately, so later rendering needs no access to
    /// the original value.
    #[must_use]
    pub fn display(value: impl fmt::Display) -> Self {
        Self::Text(value.to_string())
    }

    /// The text used when the slot has no type hint.
    pub(crate) fn default_text(&self) -> String {
        match self {
            Self::Null => "null".to_owned(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(text) => text.clone(),
            Self::Timestamp(stamp) => stamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

macro_rules! renderable_from_int {
    ($($ty:ty),+) => {
        $(impl From<$ty> for Renderable {
            fn from(value: $ty) -> Self {
                Self::Int(i64::from(value))
            }
        })+
    };
}

renderable_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Renderable {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Renderable {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<&str> for Renderable {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Renderable {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Cow<'_, str>> for Renderable {
    fn from(value: Cow<'_, str>) -> Self {
        Self::Text(value.into_owned())
    }
}

impl From<bool> for Renderable {
    fn from(value: bool) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for Renderable {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl From<NaiveDate> for Renderable {
    fn from(value: NaiveDate) -> Self {
        Self::Timestamp(value.and_time(NaiveTime::MIN))
    }
}

impl From<DateTime<Utc>> for Renderable {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value.naive_utc())
    }
}

impl<T: Into<Renderable>> From<Option<T>> for Renderable {
    /// `None` becomes [`Renderable::Null`] and renders as `null`.
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// An immutable `(namespace, key, arguments)` triple rendered on demand.
///
/// Equality and serialisation are by value over the triple, never over a
/// rendered string, so two `Localizable`s compare equal exactly when they
/// would render identically for every locale.
///
/// # Examples
///
/// ```
/// use message_bundle::{Localizable, Namespace, Renderable};
///
/// let ns = Namespace::new("com.acme.Messages", "i18n");
/// let a = Localizable::new(ns.clone(), "greeting", [Renderable::from("World")]);
/// let b = Localizable::new(ns, "greeting", [Renderable::from("World")]);
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Localizable {
    namespace: Namespace,
    key: String,
    args: Vec<Renderable>,
}

impl Localizable {
    /// Captures a template reference and arguments for deferred rendering.
    ///
    /// Construction performs no lookup and no I/O.
    #[must_use]
    pub fn new(
        namespace: Namespace,
        key: impl Into<String>,
        args: impl IntoIterator<Item = Renderable>,
    ) -> Self {
        Self {
            namespace,
            key: key.into(),
            args: args.into_iter().collect(),
        }
    }

    /// The namespace whose mapping supplies the template.
    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The template key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The captured arguments.
    #[must_use]
    pub fn args(&self) -> &[Renderable] {
        &self.args
    }

    /// Renders against the given locale using the process-wide resolver.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError`](crate::BundleError) when no resource exists
    /// for the namespace, the key is absent from the whole fallback chain,
    /// or the template cannot format the captured arguments.
    pub fn render(&self, locale: &Locale) -> BundleResult<String> {
        self.render_with(BundleResolver::global(), locale)
    }

    /// Renders against the given locale using an explicit resolver.
    ///
    /// # Errors
    ///
    /// Same as [`Localizable::render`].
    pub fn render_with(
        &self,
        resolver: &BundleResolver,
        locale: &Locale,
    ) -> BundleResult<String> {
        resolver.format_at(&self.namespace, locale, &self.key, &self.args)
    }

    /// Renders at the ambient locale of the process-wide resolver.
    ///
    /// # Errors
    ///
    /// Same as [`Localizable::render`].
    pub fn render_current(&self) -> BundleResult<String> {
        let resolver = BundleResolver::global();
        let locale = resolver.current_locale();
        self.render_with(resolver, &locale)
    }
}
