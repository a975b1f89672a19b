//! Macro for implementing Display and FromStr for string-backed enums
//!
//! Config values (`GRABBI_STORAGE=file`) and wire values (`"role": "admin"`)
//! are parsed through the same conversions.
//!
//! # Example
//!
//! ```rust
//! use grabbi_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Backend {
//!     Keychain,
//!     File,
//! }
//!
//! impl_domain_enum_conversions!(Backend {
//!     Keychain => "keychain",
//!     File => "file",
//! });
//!
//! assert_eq!("FILE".parse::<Backend>().unwrap(), Backend::File);
//! ```

/// Implements Display and FromStr traits for string-backed enums
///
/// This macro generates:
/// - Display trait: converts enum variants to lowercase strings
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations
///
/// # Features
///
/// - Case-insensitive parsing (e.g., "PENDING", "pending", "Pending" all work)
/// - Consistent lowercase string output
/// - Descriptive error messages with enum name
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestBackend {
        Keychain,
        File,
        Memory,
    }

    impl_domain_enum_conversions!(TestBackend {
        Keychain => "keychain",
        File => "file",
        Memory => "memory",
    });

    #[test]
    fn test_display_conversion() {
        assert_eq!(TestBackend::Keychain.to_string(), "keychain");
        assert_eq!(TestBackend::Memory.to_string(), "memory");
    }

    #[test]
    fn test_fromstr_is_case_insensitive() {
        assert_eq!(TestBackend::from_str("file").unwrap(), TestBackend::File);
        assert_eq!(TestBackend::from_str("KEYCHAIN").unwrap(), TestBackend::Keychain);
        assert_eq!(TestBackend::from_str("MeMoRy").unwrap(), TestBackend::Memory);
    }

    #[test]
    fn test_fromstr_invalid() {
        let result = TestBackend::from_str("redis");
        assert!(result.unwrap_err().contains("Invalid TestBackend: redis"));
        assert!(TestBackend::from_str("").is_err());
    }
}
