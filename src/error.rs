/// Errors raised while building or querying a [`CellList`](crate::CellList).
///
/// Both kinds are caller-input errors. A failed construction yields no
/// structure at all, and a failed query leaves the structure untouched.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum Error {
    /// The cutoff, configuration or coordinate buffer cannot describe a grid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An index query named a point that doesn't exist.
    #[error("Index {index} is out of range for {len} points")]
    OutOfRange { index: String, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn messages_name_the_offending_input() {
        let err = Error::OutOfRange {
            index: "-1".to_string(),
            len: 3,
        };
        assert_eq!(err.to_string(), "Index -1 is out of range for 3 points");

        let err = Error::InvalidArgument("cutoff must be positive, got 0".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid argument: cutoff must be positive, got 0"
        );
    }
}
