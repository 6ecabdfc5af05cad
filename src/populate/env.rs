use std::env::{self, VarError};

use super::source::{Resolve, ResolveError, Values};

/// Resolves keys as environment variable names.
///
/// With a prefix, the key `PORT` reads `<prefix>PORT`. With a list
/// separator, one variable yields one raw value per separated item, which
/// suits sequence fields.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: String,
    separator: Option<String>,
}

impl EnvSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        assert!(!separator.is_empty(), "separator must not be empty");
        self.separator = Some(separator);
        self
    }

    fn variable(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl Resolve for EnvSource {
    fn resolve(&self, key: &str) -> Result<Values, ResolveError> {
        let name = self.variable(key);
        let value = match env::var(&name) {
            Ok(value) => value,
            Err(VarError::NotPresent) => return Ok(Values::none()),
            Err(e @ VarError::NotUnicode(_)) => {
                return Err(format!("environment variable {name}: {e}").into());
            }
        };

        match &self.separator {
            Some(separator) => Ok(value.split(separator.as_str()).collect()),
            None => Ok(Values::from(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_variable() {
        temp_env::with_var("HANDOVER_TEST_HOST", Some("localhost"), || {
            let values = EnvSource::new().resolve("HANDOVER_TEST_HOST").unwrap();
            assert_eq!(values.as_slice(), ["localhost"]);
        });
    }

    #[test]
    fn test_prefix() {
        temp_env::with_var("MYAPP_PORT", Some("8080"), || {
            let source = EnvSource::new().with_prefix("MYAPP_");
            assert_eq!(source.resolve("PORT").unwrap().as_slice(), ["8080"]);
        });
    }

    #[test]
    fn test_unset_is_empty() {
        temp_env::with_var_unset("HANDOVER_TEST_UNSET", || {
            assert!(EnvSource::new().resolve("HANDOVER_TEST_UNSET").unwrap().is_empty());
        });
    }

    #[test]
    fn test_separator_splits_values() {
        temp_env::with_var("HANDOVER_TEST_HOSTS", Some("a,b,c"), || {
            let source = EnvSource::new().with_separator(",");
            assert_eq!(
                source.resolve("HANDOVER_TEST_HOSTS").unwrap().as_slice(),
                ["a", "b", "c"]
            );
        });
    }
}
