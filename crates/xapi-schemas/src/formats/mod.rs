//! Named string format checkers
//!
//! The engine never interprets a `format` keyword itself. It asks a
//! [`FormatRegistry`] for the checker registered under that name and treats an
//! unregistered name as a pass, so new formats can be plugged in without
//! touching the engine.
//!
//! ```rust
//! use xapi_schemas::formats::FormatRegistry;
//!
//! let mut formats = FormatRegistry::with_defaults();
//! formats.register("course-code", |value: &str| value.starts_with("CS"));
//!
//! assert_eq!(formats.check("email", "person@example.com"), Some(true));
//! assert_eq!(formats.check("course-code", "MA101"), Some(false));
//! assert_eq!(formats.check("no-such-format", "anything"), None);
//! ```
//!
//! Copyright (c) 2025 xAPI Tools Team
//! Licensed under the Apache-2.0 license

pub mod checkers;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A predicate deciding whether a string adheres to a named format
pub trait FormatChecker: Send + Sync {
    fn check(&self, value: &str) -> bool;
}

impl<F> FormatChecker for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn check(&self, value: &str) -> bool {
        self(value)
    }
}

/// Format names installed by [`FormatRegistry::with_defaults`]
pub const DEFAULT_FORMATS: &[&str] = &[
    "uri",
    "email",
    "uuid",
    "date",
    "date-time",
    "duration",
    "sha1",
    "sha2",
    "mimetype",
    "langtag",
];

/// Name → checker table
#[derive(Clone, Default)]
pub struct FormatRegistry {
    checkers: BTreeMap<String, Arc<dyn FormatChecker>>,
}

impl FormatRegistry {
    /// Create a registry with no checkers; every format passes
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in xAPI format checkers
    pub fn with_defaults() -> Self {
        Self::new()
            .with_format("uri", checkers::is_uri)
            .with_format("email", checkers::is_email)
            .with_format("uuid", checkers::is_uuid)
            .with_format("date", checkers::is_date)
            .with_format("date-time", checkers::is_date_time)
            .with_format("duration", checkers::is_duration)
            .with_format("sha1", checkers::is_sha1)
            .with_format("sha2", checkers::is_sha2)
            .with_format("mimetype", checkers::is_mimetype)
            .with_format("langtag", checkers::is_langtag)
    }

    /// Add or replace the checker for a format name
    pub fn register<S, C>(&mut self, name: S, checker: C)
    where
        S: Into<String>,
        C: FormatChecker + 'static,
    {
        self.checkers.insert(name.into(), Arc::new(checker));
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_format<S, C>(mut self, name: S, checker: C) -> Self
    where
        S: Into<String>,
        C: FormatChecker + 'static,
    {
        self.register(name, checker);
        self
    }

    /// Run the named checker; `None` when no checker is registered
    pub fn check(&self, name: &str, value: &str) -> Option<bool> {
        self.checkers.get(name).map(|checker| checker.check(value))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checkers.contains_key(name)
    }

    /// Registered format names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checkers.keys().map(String::as_str)
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.checkers.keys().collect::<Vec<_>>())
            .finish()
    }
}
