//! Machine-readable error codes shared by all Warden crates.
//!
//! Every Warden error enum implements [`ErrorCode`] so that the RPC layer
//! sitting above the engine can map failures to stable wire codes without
//! matching on concrete types.
//!
//! # Example
//!
//! ```
//! use warden_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LookupError {
//!     UnknownScope(String),
//!     Exhausted,
//! }
//!
//! impl ErrorCode for LookupError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::UnknownScope(_) => "LOOKUP_UNKNOWN_SCOPE",
//!             Self::Exhausted => "LOOKUP_EXHAUSTED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::UnknownScope(_))
//!     }
//! }
//!
//! let err = LookupError::UnknownScope("ubus".into());
//! assert_eq!(err.code(), "LOOKUP_UNKNOWN_SCOPE");
//! assert!(err.is_recoverable());
//! ```

/// Stable error code interface.
///
/// # Code Format
///
/// - `UPPER_SNAKE_CASE`
/// - Prefixed with the owning domain (`SESSION_`, `CONFIG_`, `SID_`)
/// - Never renamed once published; callers match on these strings
///
/// # Recoverability
///
/// An error is recoverable when the caller can reasonably retry or correct
/// its request: an unknown scope or attribute, a transient entropy failure.
/// Malformed arguments and resource exhaustion are not.
pub trait ErrorCode {
    /// Returns the machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying or correcting the request may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code is non-empty, carries `expected_prefix`,
/// and is `UPPER_SNAKE_CASE`.
///
/// Intended for tests that pin down every variant of an error enum.
///
/// # Panics
///
/// Panics with a descriptive message if any check fails.
///
/// # Example
///
/// ```
/// use warden_types::{assert_error_code, ErrorCode};
///
/// struct Denied;
///
/// impl ErrorCode for Denied {
///     fn code(&self) -> &'static str { "ACL_DENIED" }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_code(&Denied, "ACL_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Runs [`assert_error_code`] over a list of errors.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum ProbeError {
        Retry,
        Fatal,
    }

    impl ErrorCode for ProbeError {
        fn code(&self) -> &'static str {
            match self {
                Self::Retry => "PROBE_RETRY",
                Self::Fatal => "PROBE_FATAL",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Retry)
        }
    }

    #[test]
    fn code_and_recoverability() {
        assert_eq!(ProbeError::Retry.code(), "PROBE_RETRY");
        assert!(ProbeError::Retry.is_recoverable());
        assert!(!ProbeError::Fatal.is_recoverable());
    }

    #[test]
    fn all_variants_pass_convention() {
        assert_error_codes(&[ProbeError::Retry, ProbeError::Fatal], "PROBE_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn wrong_prefix_panics() {
        assert_error_code(&ProbeError::Fatal, "SESSION_");
    }

    #[test]
    fn snake_case_detection() {
        assert!(is_upper_snake_case("SESSION_SCOPE_NOT_FOUND"));
        assert!(is_upper_snake_case("SID_2"));
        assert!(!is_upper_snake_case(""));
        assert!(!is_upper_snake_case("session"));
        assert!(!is_upper_snake_case("_SESSION"));
        assert!(!is_upper_snake_case("SESSION_"));
        assert!(!is_upper_snake_case("SESSION__ID"));
    }
}
