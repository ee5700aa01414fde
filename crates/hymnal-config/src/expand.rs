//! Environment variable expansion for configuration strings.
//!
//! Supports `${VAR}` (errors if unset) and `${VAR:-default}` (falls back
//! to the default when unset). shellexpand hands the full text between
//! the braces to the lookup context, so the `:-` syntax is parsed here.

use crate::ConfigError;

/// Expand environment variable references in a configuration value.
///
/// # Errors
///
/// Returns [`ConfigError::EnvVar`] when a referenced variable without a
/// default is unset, with `field` naming the config field for context.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let context = |name: &str| -> Result<Option<String>, String> {
        let (var, default) = match name.split_once(":-") {
            Some((var, default)) => (var, Some(default)),
            None => (name, None),
        };
        match std::env::var(var) {
            Ok(v) => Ok(Some(v)),
            Err(std::env::VarError::NotPresent) => match default {
                Some(d) => Ok(Some(d.to_owned())),
                None => Err(format!("${{{var}}} not set")),
            },
            Err(e) => Err(e.to_string()),
        }
    };

    shellexpand::env_with_context(value, context)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: e.cause,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("plain/path.xlsx", "f").unwrap(), "plain/path.xlsx");
    }

    #[test]
    fn test_braced_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("EXPAND_TEST_VAR", "value");
        }
        assert_eq!(expand_env("${EXPAND_TEST_VAR}/x", "f").unwrap(), "value/x");
        unsafe {
            std::env::remove_var("EXPAND_TEST_VAR");
        }
    }

    #[test]
    fn test_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("EXPAND_TEST_UNSET");
        }
        assert_eq!(
            expand_env("${EXPAND_TEST_UNSET:-fallback}", "f").unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_set_var_beats_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("EXPAND_TEST_SET", "actual");
        }
        assert_eq!(
            expand_env("${EXPAND_TEST_SET:-fallback}", "f").unwrap(),
            "actual"
        );
        unsafe {
            std::env::remove_var("EXPAND_TEST_SET");
        }
    }

    #[test]
    fn test_unset_without_default_errors() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("EXPAND_TEST_MISSING");
        }
        let err = expand_env("${EXPAND_TEST_MISSING}", "content.source").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("EXPAND_TEST_MISSING"));
    }
}
