//! Error handling
use crate::tables::TablesError;
use thiserror::Error;

/// Primary error type.
///
/// Some members of this enum implement ``From``
/// in order to redirect other error types.
#[derive(Error, Debug)]
pub enum WfArgError {
    /// Invalid simulation parameters.
    /// Reported before any simulation work begins.
    #[error("configuration error: {value}")]
    ConfigurationError {
        /// The error message
        value: String,
    },
    /// The recorded nodes, edges, or samples are corrupt
    /// and must not be handed to downstream tools.
    #[error("invariant violation in generation {generation}: {value}")]
    InvariantViolation {
        /// The generation where the violation was found
        generation: i64,
        /// Diagnostic naming the offending id(s)
        value: String,
    },
    /// A redirection of a [``crate::TablesError``]
    #[error("{value:?}")]
    TablesError {
        /// The redirected error
        #[from]
        value: TablesError,
    },
    /// A redirection of a [``wfarg_core::Error``]
    #[error("{value:?}")]
    CoreError {
        /// The redirected error
        #[from]
        value: wfarg_core::Error,
    },
    /// A redirection of a [``tskit::TskitError``]
    #[cfg(feature = "tskit")]
    #[error("{value:?}")]
    TskitError {
        /// The redirected error
        #[from]
        value: tskit::TskitError,
    },
}

/// Result type for this crate
pub type WfArgResult<T> = std::result::Result<T, WfArgError>;

pub(crate) fn configuration_error<T>(value: impl Into<String>) -> WfArgResult<T> {
    Err(WfArgError::ConfigurationError {
        value: value.into(),
    })
}

pub(crate) fn invariant_violation<T>(generation: i64, value: impl Into<String>) -> WfArgResult<T> {
    Err(WfArgError::InvariantViolation {
        generation,
        value: value.into(),
    })
}

#[cfg(test)]
mod test {

    use super::*;
    use wfarg_core::NodeId;

    fn return_tables_error(f: bool) -> Result<(), TablesError> {
        if f {
            Ok(())
        } else {
            Err(TablesError::UnallocatedNode {
                found: NodeId::from(3),
            })
        }
    }

    fn return_wfarg_error() -> WfArgResult<()> {
        return_tables_error(false)?;
        Ok(())
    }

    #[test]
    fn test_tables_error_propagation() {
        match return_wfarg_error() {
            Ok(_) => panic!(),
            Err(WfArgError::TablesError { value }) => {
                assert_eq!(
                    value,
                    TablesError::UnallocatedNode {
                        found: NodeId::from(3)
                    }
                );
                assert_eq!(value.to_string(), "Node 3 has not been allocated");
            }
            Err(_) => panic!(),
        }
    }

    #[test]
    fn test_invariant_violation_message() {
        let e = invariant_violation::<()>(7, "bad parent 12").unwrap_err();
        assert_eq!(
            e.to_string(),
            "invariant violation in generation 7: bad parent 12"
        );
    }
}
