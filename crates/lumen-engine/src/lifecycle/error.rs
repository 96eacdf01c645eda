use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Failure to bring up a scene on a mount point.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LifecycleError {
    /// No drawing surface could be created (no graphics capability, lost
    /// adapter, ...). Fatal for this scene; the host shows a fallback.
    #[error("unsupported environment: {0}")]
    UnsupportedEnvironment(String),
}

/// Outcome of a failed draw call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DrawError {
    /// Transient (surface outdated, timeout). The frame is dropped and the
    /// driver keeps running.
    #[error("frame skipped: {0}")]
    Skipped(String),

    /// Unrecoverable; the driver stops and the fallback is shown.
    #[error("drawing failed: {0}")]
    Fatal(String),
}

/// Rejected configuration change or option string.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown option `{0}`")]
    UnknownKey(String),

    #[error("invalid value `{value}` for `{key}`: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("`{key}` = {value} is outside [{min}, {max}]")]
    OutOfRange {
        key: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("color {0} is not in the palette")]
    NotInPalette(String),
}

impl ConfigError {
    pub fn invalid(key: &str, value: &str, reason: impl ToString) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Parses an option value, reporting failures as `InvalidValue`.
    pub fn parse<T>(key: &str, value: &str) -> Result<T, Self>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        value.trim().parse().map_err(|e| ConfigError::invalid(key, value, e))
    }

    /// Accepts `value` only inside the closed range `[min, max]`.
    pub fn check_range(key: &'static str, value: f32, min: f32, max: f32) -> Result<f32, Self> {
        if value.is_finite() && (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(ConfigError::OutOfRange { key, value, min, max })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_inclusive() {
        assert_eq!(ConfigError::check_range("size", 0.5, 0.5, 4.0), Ok(0.5));
        assert_eq!(ConfigError::check_range("size", 4.0, 0.5, 4.0), Ok(4.0));
        assert!(ConfigError::check_range("size", 4.01, 0.5, 4.0).is_err());
        assert!(ConfigError::check_range("size", f32::NAN, 0.5, 4.0).is_err());
    }

    #[test]
    fn parse_reports_key_and_value() {
        assert_eq!(ConfigError::parse::<f32>("size", " 2.5"), Ok(2.5));
        let err = ConfigError::parse::<bool>("wave", "maybe").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "wave"));
    }

    #[test]
    fn messages_name_the_field() {
        let e = ConfigError::check_range("speed", 9.0, 0.1, 3.0).unwrap_err();
        assert_eq!(e.to_string(), "`speed` = 9 is outside [0.1, 3]");
    }
}
