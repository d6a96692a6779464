/// Errors returned by the fallible accessors of the dense containers.
///
/// Misuse of the sentinel configuration is not represented here: it is a
/// contract violation and panics instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// `at`/`at_mut` was called with a key that is not in the table.
    NotFound,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotFound => f.write_str("key not found"),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias for the fallible accessors.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_displays_and_is_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(Error::NotFound);
        assert_eq!(e.to_string(), "key not found");
    }
}
