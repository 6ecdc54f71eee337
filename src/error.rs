use crate::sl::SlResult;

/// Failure reported by a resolved Streamline entry point.
///
/// A missing library or missing entry point is never an error; only an explicit non-OK result
/// from the SDK ends up here.
#[derive(thiserror::Error, Clone, Copy, Debug, Eq, PartialEq)]
pub enum StreamlineError {
    #[error("{operation} failed: {result}")]
    Sdk {
        operation: &'static str,
        result: SlResult,
    },
}

impl StreamlineError {
    /// The raw result code returned by the SDK.
    pub fn result(&self) -> SlResult {
        match self {
            Self::Sdk { result, .. } => *result,
        }
    }
}

pub(crate) fn check_sl_result(
    operation: &'static str,
    result: SlResult,
) -> Result<(), StreamlineError> {
    if result.is_ok() {
        Ok(())
    } else {
        Err(StreamlineError::Sdk { operation, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_ok_results_become_errors() {
        assert_eq!(check_sl_result("slInit", SlResult::OK), Ok(()));

        let err = check_sl_result("slInit", SlResult::ERROR_NO_PLUGINS).unwrap_err();
        assert_eq!(err.result(), SlResult::ERROR_NO_PLUGINS);
        assert_eq!(err.to_string(), "slInit failed: sl::eErrorNoPlugins");
    }
}
