//! Populating record fields from named sources.

mod env;
mod file;
mod map;
mod record;
mod source;

use tracing::{debug, trace};

use crate::coerce::CoerceError;
use crate::Error;

pub use env::EnvSource;
pub use file::{FileSourceError, TomlSource};
pub use map::MapSource;
pub use record::{Annotations, Destination, Field, Record};
pub use source::{Resolve, ResolveError, Source, Values};

/// An ordered list of sources to populate records from.
///
/// For every field, each source whose name the field is annotated with is
/// consulted in registration order, and each value it supplies overwrites
/// the previous one, so the last source with a value wins.
///
/// ## Example
///
/// ```
/// use handover::{record, EnvSource, MapSource, Sources};
///
/// record! {
///     #[derive(Debug, Default)]
///     pub struct Search {
///         #[from(query = "q")]
///         pub term: String,
///         #[from(query = "page", env = "SEARCH_DEFAULT_PAGE")]
///         pub page: u32,
///     }
/// }
///
/// let query = MapSource::new().with("q", "rust").with("page", "3");
///
/// let mut search = Search::default();
/// Sources::new()
///     .with_resolver("env", EnvSource::new())
///     .with_resolver("query", query)
///     .populate(&mut search)?;
///
/// assert_eq!(search.term, "rust");
/// assert_eq!(search.page, 3);
/// # Ok::<(), handover::Error>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "sources do nothing until .populate() is called"]
pub struct Sources {
    sources: Vec<Source>,
}

impl Sources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sources(sources: impl IntoIterator<Item = Source>) -> Self {
        sources.into_iter().collect()
    }

    /// Appends a source backed by a resolver function.
    pub fn with<F>(self, name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&str) -> Result<Values, ResolveError> + Send + Sync + 'static,
    {
        self.with_source(Source::new(name, resolver))
    }

    /// Appends a source backed by a [`Resolve`] implementation.
    pub fn with_resolver(self, name: impl Into<String>, resolver: impl Resolve + 'static) -> Self {
        self.with_source(Source::from_resolver(name, resolver))
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Fills the annotated fields of `destination` from the sources.
    ///
    /// Fields are walked in declaration order and sources in registration
    /// order. The first failure aborts the pass; fields set before it keep
    /// their new values, and the failing field keeps its old one.
    pub fn populate<D: Destination>(&self, mut destination: D) -> Result<(), Error> {
        let Some(record) = destination.record() else {
            return Err(Error::InvalidDestination);
        };

        if self.sources.is_empty() {
            return Ok(());
        }

        for mut field in record.fields() {
            for source in &self.sources {
                populate_field(&mut field, source)?;
            }
        }

        Ok(())
    }
}

fn populate_field(field: &mut Field<'_>, source: &Source) -> Result<(), Error> {
    let Some(key) = field.key_for(source.name()) else {
        trace!(field = field.name(), source = source.name(), "no annotation for source");
        return Ok(());
    };

    if !field.is_settable() {
        trace!(field = field.name(), "field is not settable");
        return Ok(());
    }

    let values = source.resolve(key).map_err(|cause| {
        debug!(key, source = source.name(), error = %cause, "source failed to resolve");
        Error::Resolve {
            key: key.to_string(),
            source_name: source.name().to_string(),
            value: String::new(),
            cause,
        }
    })?;

    if values.is_empty() {
        trace!(key, source = source.name(), "source has no values");
        return Ok(());
    }

    field.slot().assign(values.as_slice()).map_err(|cause| {
        debug!(key, source = source.name(), error = %cause, "failed to coerce value");
        conversion_error(key, source.name(), &values, cause)
    })?;

    debug!(field = field.name(), key, source = source.name(), "populated field");
    Ok(())
}

fn conversion_error(key: &str, source: &str, values: &Values, cause: CoerceError) -> Error {
    let key = key.to_string();
    let source_name = source.to_string();
    match cause {
        CoerceError::Unsupported(type_name) => Error::Unsupported {
            key,
            source_name,
            value: values.render(),
            type_name,
        },
        cause => Error::Conversion {
            key,
            source_name,
            value: cause.input().map_or_else(|| values.render(), str::to_string),
            cause,
        },
    }
}

impl From<Vec<Source>> for Sources {
    fn from(sources: Vec<Source>) -> Self {
        Self { sources }
    }
}

impl FromIterator<Source> for Sources {
    fn from_iter<I: IntoIterator<Item = Source>>(iter: I) -> Self {
        Self {
            sources: iter.into_iter().collect(),
        }
    }
}
