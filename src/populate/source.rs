use std::fmt;

/// Error a resolver reports when it fails to look a key up.
pub type ResolveError = Box<dyn std::error::Error + Send + Sync>;

/// The ordered raw strings a resolver produced for one key.
///
/// An empty bag means the source has nothing for the key and the field is
/// skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values(Vec<String>);

impl Values {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(values.into_iter().map(Into::into).collect())
    }

    /// A bag with nothing in it.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Human-readable form used in error reports: empty for no values, the
    /// value itself for one, `[a b c]` for several.
    pub fn render(&self) -> String {
        match self.0.as_slice() {
            [] => String::new(),
            [single] => single.clone(),
            many => format!("[{}]", many.join(" ")),
        }
    }
}

impl From<&str> for Values {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for Values {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<String>> for Values {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<Option<String>> for Values {
    fn from(value: Option<String>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl<S: Into<String>> FromIterator<S> for Values {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Looks raw values up by key.
pub trait Resolve: Send + Sync {
    fn resolve(&self, key: &str) -> Result<Values, ResolveError>;
}

struct FnResolver<F>(F);

impl<F> Resolve for FnResolver<F>
where
    F: Fn(&str) -> Result<Values, ResolveError> + Send + Sync,
{
    fn resolve(&self, key: &str) -> Result<Values, ResolveError> {
        (self.0)(key)
    }
}

/// A named provider of raw values.
///
/// Fields opt into a source by carrying an annotation under the source's
/// name; the annotation's value is the key handed to the resolver.
pub struct Source {
    name: String,
    resolver: Box<dyn Resolve>,
}

impl Source {
    pub fn new<F>(name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&str) -> Result<Values, ResolveError> + Send + Sync + 'static,
    {
        Self::from_resolver(name, FnResolver(resolver))
    }

    pub fn from_resolver(name: impl Into<String>, resolver: impl Resolve + 'static) -> Self {
        Self {
            name: name.into(),
            resolver: Box::new(resolver),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolve(&self, key: &str) -> Result<Values, ResolveError> {
        self.resolver.resolve(key)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
