use crate::arguments::PromptArguments;
use crate::decimal::Decimal;
use crate::error::CalcError;
use crate::operation::Operation;

pub const PROMPT_DESCRIPTION: &str = "Calculate the result of the operation";

/// ツール呼び出しの結果。エラーでもプロトコル上は正常応答として返す
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn success(result: &Decimal) -> Self {
        Self {
            text: result.to_string(),
            is_error: false,
        }
    }

    pub fn failure(error: &CalcError) -> Self {
        Self {
            text: error.to_string(),
            is_error: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// プロンプト呼び出しの結果。成功時は user / assistant の2ターン、失敗時は0ターン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOutcome {
    pub description: String,
    pub turns: Vec<Turn>,
}

impl PromptOutcome {
    pub fn success(args: &PromptArguments, op: Operation, result: &Decimal) -> Self {
        Self {
            description: PROMPT_DESCRIPTION.to_string(),
            turns: vec![
                Turn {
                    role: Role::User,
                    text: format!("user want to calculate '{} {} {}'", args.x.raw, op, args.y.raw),
                },
                Turn {
                    role: Role::Assistant,
                    text: format!("result is {}", result),
                },
            ],
        }
    }

    pub fn failure(error: &CalcError) -> Self {
        Self {
            description: error.to_string(),
            turns: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::Operand;

    fn operand(raw: &str) -> Operand {
        Operand {
            raw: raw.to_string(),
            value: Decimal::parse(raw).unwrap(),
        }
    }

    #[test]
    fn test_tool_outcome() {
        let outcome = ToolOutcome::success(&Decimal::parse("10.0").unwrap());
        assert_eq!(outcome.text, "10");
        assert!(!outcome.is_error);

        let outcome = ToolOutcome::failure(&CalcError::DivisionByZero);
        assert_eq!(outcome.text, "cannot divide by zero");
        assert!(outcome.is_error);
    }

    #[test]
    fn test_prompt_outcome_uses_literal_operands() {
        let args = PromptArguments {
            selector: "subtract".to_string(),
            x: operand("5.00"),
            y: operand("0.5"),
        };
        let outcome = PromptOutcome::success(&args, Operation::Subtract, &Decimal::parse("4.5").unwrap());

        assert_eq!(outcome.description, PROMPT_DESCRIPTION);
        assert_eq!(outcome.turns.len(), 2);
        assert_eq!(outcome.turns[0].role, Role::User);
        assert_eq!(outcome.turns[0].text, "user want to calculate '5.00 subtract 0.5'");
        assert_eq!(outcome.turns[1].role, Role::Assistant);
        assert_eq!(outcome.turns[1].text, "result is 4.5");
        assert!(!outcome.is_error());
    }

    #[test]
    fn test_prompt_outcome_failure() {
        let outcome = PromptOutcome::failure(&CalcError::UnknownOperation {
            selector: "pow".to_string(),
        });
        assert_eq!(outcome.description, "unknown operation: 'pow'");
        assert!(outcome.turns.is_empty());
        assert!(outcome.is_error());
    }
}
