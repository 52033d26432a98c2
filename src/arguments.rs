//! 型の付いていない引数マップから値を取り出す。
//!
//! 呼び出し形式ごとに取り出し方が異なる:
//! - ツール呼び出し: `operation` は文字列、`x` と `y` はJSONの数値
//! - プロンプト呼び出し: 3つとも文字列。`x` と `y` は10進数として解析する
//!
//! どちらも `operation` → `x` → `y` の順に検査し、最初の失敗で打ち切る。
//! プロンプトの `x` は `y` を読む前に解析する。

use serde_json::{Map, Value};

use crate::decimal::Decimal;
use crate::error::CalcError;
use crate::operation::ArgumentKey;

pub type Arguments = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct ToolArguments {
    pub selector: String,
    pub x: Decimal,
    pub y: Decimal,
}

/// 元の文字列と解析後の値
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    pub raw: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptArguments {
    pub selector: String,
    pub x: Operand,
    pub y: Operand,
}

pub fn extract_tool_arguments(args: &Arguments) -> Result<ToolArguments, CalcError> {
    let selector = tool_string(args, ArgumentKey::Operation)?;
    let x = tool_number(args, ArgumentKey::X)?;
    let y = tool_number(args, ArgumentKey::Y)?;

    Ok(ToolArguments { selector, x, y })
}

pub fn extract_prompt_arguments(args: &Arguments) -> Result<PromptArguments, CalcError> {
    let selector = prompt_string(args, ArgumentKey::Operation)?;
    let x = prompt_operand(args, ArgumentKey::X)?;
    let y = prompt_operand(args, ArgumentKey::Y)?;

    Ok(PromptArguments { selector, x, y })
}

/// JSON値の型名。キーが無い場合は `null` と同じ扱い
fn json_type_name(value: Option<&Value>) -> &'static str {
    match value {
        None | Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

fn tool_string(args: &Arguments, key: ArgumentKey) -> Result<String, CalcError> {
    match args.get(key.as_str()) {
        Some(Value::String(s)) => Ok(s.clone()),
        other => Err(CalcError::TypeMismatch {
            key: key.as_str(),
            expected: "string",
            observed: json_type_name(other),
        }),
    }
}

fn tool_number(args: &Arguments, key: ArgumentKey) -> Result<Decimal, CalcError> {
    match args.get(key.as_str()) {
        Some(Value::Number(n)) => Decimal::from_number(n).ok_or_else(|| CalcError::MalformedDecimal {
            key: key.as_str(),
            raw: n.to_string(),
        }),
        other => Err(CalcError::TypeMismatch {
            key: key.as_str(),
            expected: "number",
            observed: json_type_name(other),
        }),
    }
}

fn prompt_string(args: &Arguments, key: ArgumentKey) -> Result<String, CalcError> {
    args.get(key.as_str())
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(CalcError::MissingOrInvalidArgument { key: key.as_str() })
}

/// 文字列を取り出してすぐに解析する。上限を超える値も不正な10進数として扱う
fn prompt_operand(args: &Arguments, key: ArgumentKey) -> Result<Operand, CalcError> {
    let raw = prompt_string(args, key)?;
    match Decimal::parse(&raw) {
        Ok(value) => Ok(Operand { raw, value }),
        Err(_) => Err(CalcError::MalformedDecimal {
            key: key.as_str(),
            raw,
        }),
    }
}
