use thiserror::Error;

/// 1リクエストの処理で発生しうる失敗の種類
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("invalid {key} value type, expected {expected}, got {observed}")]
    TypeMismatch {
        key: &'static str,
        expected: &'static str,
        observed: &'static str,
    },

    #[error("missing or invalid argument '{key}', expected string")]
    MissingOrInvalidArgument { key: &'static str },

    #[error("unknown operation: '{selector}'")]
    UnknownOperation { selector: String },

    #[error("invalid decimal value for '{key}': '{raw}'")]
    MalformedDecimal { key: &'static str, raw: String },

    #[error("cannot divide by zero")]
    DivisionByZero,

    #[error("result is out of range")]
    OutOfRange,
}

impl CalcError {
    /// ログ出力用の短い種別名
    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::TypeMismatch { .. } => "type_mismatch",
            CalcError::MissingOrInvalidArgument { .. } => "missing_or_invalid_argument",
            CalcError::UnknownOperation { .. } => "unknown_operation",
            CalcError::MalformedDecimal { .. } => "malformed_decimal",
            CalcError::DivisionByZero => "division_by_zero",
            CalcError::OutOfRange => "out_of_range",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = CalcError::TypeMismatch {
            key: "x",
            expected: "number",
            observed: "string",
        };
        assert_eq!(err.to_string(), "invalid x value type, expected number, got string");

        assert_eq!(CalcError::DivisionByZero.to_string(), "cannot divide by zero");

        let err = CalcError::MalformedDecimal {
            key: "y",
            raw: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "invalid decimal value for 'y': 'abc'");
    }
}
