use tracing::debug;

use crate::arguments::{extract_prompt_arguments, extract_tool_arguments, Arguments};
use crate::arithmetic::evaluate;
use crate::error::CalcError;
use crate::operation::Operation;
use crate::response::{PromptOutcome, ToolOutcome};

/// 引数の取り出し → 演算の解決 → 計算 → 整形 を1リクエストずつ行う。
///
/// 状態を持たないので、どのスレッドから何回呼んでもよい。
/// 失敗はすべて応答の形に変換して返し、呼び出し元へは伝播しない。
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator;

impl Calculator {
    pub fn new() -> Self {
        Self
    }

    /// ツール呼び出し
    pub fn call_tool(&self, args: &Arguments) -> ToolOutcome {
        match self.run_tool(args) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(kind = e.kind(), error = %e, "calculate tool failed");
                ToolOutcome::failure(&e)
            }
        }
    }

    /// プロンプト呼び出し
    pub fn get_prompt(&self, args: &Arguments) -> PromptOutcome {
        match self.run_prompt(args) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(kind = e.kind(), error = %e, "calculate prompt failed");
                PromptOutcome::failure(&e)
            }
        }
    }

    fn run_tool(&self, args: &Arguments) -> Result<ToolOutcome, CalcError> {
        let args = extract_tool_arguments(args)?;
        let op = Operation::resolve(&args.selector)?;
        let result = evaluate(op, &args.x, &args.y)?;

        debug!(%op, x = %args.x, y = %args.y, %result, "calculated");
        Ok(ToolOutcome::success(&result))
    }

    fn run_prompt(&self, args: &Arguments) -> Result<PromptOutcome, CalcError> {
        let args = extract_prompt_arguments(args)?;
        let op = Operation::resolve(&args.selector)?;
        let result = evaluate(op, &args.x.value, &args.y.value)?;

        debug!(%op, x = %args.x.raw, y = %args.y.raw, %result, "calculated");
        Ok(PromptOutcome::success(&args, op, &result))
    }
}
