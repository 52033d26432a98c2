use schemars::JsonSchema;
use serde::Serialize;
use std::fmt;

use crate::error::CalcError;

/// サポートする四則演算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[schemars(inline)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

const OPERATIONS: [Operation; 4] = [
    Operation::Add,
    Operation::Subtract,
    Operation::Multiply,
    Operation::Divide,
];

impl Operation {
    /// 文字列から演算を解決する。完全一致のみ（大文字小文字を区別）
    pub fn resolve(selector: &str) -> Result<Self, CalcError> {
        Self::all()
            .find(|op| op.as_str() == selector)
            .ok_or_else(|| CalcError::UnknownOperation {
                selector: selector.to_string(),
            })
    }

    /// 演算と文字列表現の対応表（解決と表示の両方で使う）
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    pub fn all() -> impl Iterator<Item = Operation> {
        OPERATIONS.into_iter()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// リクエスト引数のキー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKey {
    Operation,
    X,
    Y,
}

impl ArgumentKey {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ArgumentKey::Operation => "operation",
            ArgumentKey::X => "x",
            ArgumentKey::Y => "y",
        }
    }
}

impl fmt::Display for ArgumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
