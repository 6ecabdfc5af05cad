//! File-based value source.

use std::path::{Path, PathBuf};

use thiserror::Error;
use toml::{Table, Value};

use super::source::{Resolve, ResolveError, Values};

/// Failure to load the document a [`TomlSource`] resolves against.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FileSourceError {
    #[error("value file {0} does not exist")]
    NotFound(PathBuf),

    #[error("could not read value file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("value file {path} is not valid TOML: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Resolves dotted keys such as `server.port` against a TOML document.
///
/// Scalars yield one raw value and arrays of scalars one raw value per
/// element. A key with no entry yields nothing.
#[derive(Debug, Clone, Default)]
pub struct TomlSource {
    table: Table,
}

impl TomlSource {
    /// Reads the TOML document at `path`. An optional file that does not
    /// exist resolves nothing.
    pub fn load(path: impl AsRef<Path>, required: bool) -> Result<Self, FileSourceError> {
        let table = read_document(path.as_ref(), required)?.unwrap_or_default();
        Ok(Self { table })
    }

    pub fn from_table(table: Table) -> Self {
        Self { table }
    }
}

impl Resolve for TomlSource {
    fn resolve(&self, key: &str) -> Result<Values, ResolveError> {
        let Some(value) = lookup_path(&self.table, key) else {
            return Ok(Values::none());
        };

        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| scalar_to_string(item, key))
                .collect::<Result<Vec<_>, _>>()
                .map(Values::from),
            scalar => scalar_to_string(scalar, key).map(Values::from),
        }
    }
}

/// Reads the document behind a source. An absent optional file reads as
/// `None`.
fn read_document(path: &Path, required: bool) -> Result<Option<Table>, FileSourceError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => return Ok(None),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FileSourceError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(FileSourceError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str::<Table>(&text)
        .map(Some)
        .map_err(|source| FileSourceError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn lookup_path<'t>(root: &'t Table, path: &str) -> Option<&'t Value> {
    let mut parts = path.split('.');
    let mut current = root.get(parts.next()?)?;
    for part in parts {
        current = current.as_table()?.get(part)?;
    }
    Some(current)
}

fn scalar_to_string(value: &Value, key: &str) -> Result<String, ResolveError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(dt) => Ok(dt.to_string()),
        Value::Array(_) | Value::Table(_) => {
            Err(format!("cannot read non-scalar value at {key:?}").into())
        }
    }
}
