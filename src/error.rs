use crate::coerce::CoerceError;
use crate::populate::ResolveError;
use thiserror::Error;

/// Failure of a population pass.
///
/// Field-level variants carry the lookup key, the source that supplied the
/// failing value, and a rendering of that value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("given destination to populate is absent")]
    InvalidDestination,

    #[error("failed to set field {key:?} from source {source_name:?}: {cause}")]
    Resolve {
        key: String,
        source_name: String,
        value: String,
        #[source]
        cause: ResolveError,
    },

    #[error("failed to set field {key:?} from source {source_name:?}: {cause}")]
    Conversion {
        key: String,
        source_name: String,
        value: String,
        #[source]
        cause: CoerceError,
    },

    #[error("failed to set field {key:?} from source {source_name:?}: unsupported property kind {type_name:?}")]
    Unsupported {
        key: String,
        source_name: String,
        value: String,
        type_name: &'static str,
    },
}

impl Error {
    /// The lookup key of the field that failed.
    pub fn key(&self) -> Option<&str> {
        self.field_context().map(|(key, _, _)| key)
    }

    /// The name of the source whose value could not be applied.
    pub fn source_name(&self) -> Option<&str> {
        self.field_context().map(|(_, source, _)| source)
    }

    /// The offending raw value, empty when the source produced none.
    pub fn value(&self) -> Option<&str> {
        self.field_context().map(|(_, _, value)| value)
    }

    fn field_context(&self) -> Option<(&str, &str, &str)> {
        match self {
            Self::InvalidDestination => None,
            Self::Resolve {
                key,
                source_name,
                value,
                ..
            }
            | Self::Conversion {
                key,
                source_name,
                value,
                ..
            }
            | Self::Unsupported {
                key,
                source_name,
                value,
                ..
            } => Some((key, source_name, value)),
        }
    }
}
