use std::sync::Arc;

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, GetPromptRequestParam, GetPromptResult,
        Implementation, ListPromptsResult, ListToolsResult, LoggingLevel, PaginatedRequestParam,
        Prompt, PromptArgument, PromptMessage, PromptMessageRole, ProtocolVersion,
        ServerCapabilities, ServerInfo, SetLevelRequestParam, Tool,
    },
    service::RequestContext,
    ErrorData as McpError, RoleServer, ServerHandler,
};
use schemars::JsonSchema;
use serde_json::Value;
use tracing::{debug, info, warn};
use tracing_subscriber::{reload, EnvFilter, Registry};

use crate::calculator::Calculator;
use crate::operation::{ArgumentKey, Operation};
use crate::response::{PromptOutcome, Role, ToolOutcome};

pub const SERVER_NAME: &str = "arith-mcp";
pub const TOOL_NAME: &str = "calculate";
pub const PROMPT_NAME: &str = "calculate";

const TOOL_DESCRIPTION: &str = "Perform basic arithmetic operations";
const OPERATION_DESCRIPTION: &str = "The operation to perform (add, subtract, multiply, divide)";

/// `calculate` ツールの入力スキーマ（公開用。引数の取り出しには使わない）
#[derive(Debug, JsonSchema)]
pub struct CalculateRequest {
    #[schemars(description = "The operation to perform (add, subtract, multiply, divide)")]
    pub operation: Operation,
    #[schemars(description = "First number")]
    pub x: f64,
    #[schemars(description = "Second number")]
    pub y: f64,
}

/// `logging/setLevel` で差し替えるログフィルタ
pub type LogFilterHandle = reload::Handle<EnvFilter, Registry>;

#[derive(Clone, Default)]
pub struct CalculatorServer {
    calculator: Calculator,
    log_filter: Option<LogFilterHandle>,
}

impl CalculatorServer {
    pub fn new() -> Self {
        Self {
            calculator: Calculator::new(),
            log_filter: None,
        }
    }

    pub fn with_log_filter(mut self, handle: LogFilterHandle) -> Self {
        self.log_filter = Some(handle);
        self
    }

    /// フィルタが無い場合は何もしない
    pub fn apply_log_level(&self, level: LoggingLevel) -> Result<(), McpError> {
        let directive = filter_directive(level);
        if let Some(handle) = &self.log_filter {
            handle
                .reload(EnvFilter::new(directive))
                .map_err(|e| McpError::internal_error(format!("ログレベルの変更に失敗: {}", e), None))?;
        }
        info!(level = directive, "log level changed");
        Ok(())
    }

    pub fn tool() -> Result<Tool, McpError> {
        let schema = serde_json::to_value(schemars::schema_for!(CalculateRequest))
            .map_err(|e| McpError::internal_error(format!("スキーマの生成に失敗: {}", e), None))?;
        match schema {
            Value::Object(schema) => Ok(Tool::new(TOOL_NAME, TOOL_DESCRIPTION, Arc::new(schema))),
            _ => Err(McpError::internal_error("スキーマがオブジェクトではありません", None)),
        }
    }

    pub fn prompt() -> Prompt {
        let argument = |key: ArgumentKey, description: &str| PromptArgument {
            name: key.as_str().to_string(),
            title: None,
            description: Some(description.to_string()),
            required: Some(true),
        };

        Prompt::new(
            PROMPT_NAME,
            Some(TOOL_DESCRIPTION),
            Some(vec![
                argument(ArgumentKey::Operation, OPERATION_DESCRIPTION),
                argument(ArgumentKey::X, "First number"),
                argument(ArgumentKey::Y, "Second number"),
            ]),
        )
    }
}

/// MCPのログレベルを tracing のフィルタ指定に変換する
pub fn filter_directive(level: LoggingLevel) -> &'static str {
    match level {
        LoggingLevel::Debug => "debug",
        LoggingLevel::Info | LoggingLevel::Notice => "info",
        LoggingLevel::Warning => "warn",
        LoggingLevel::Error
        | LoggingLevel::Critical
        | LoggingLevel::Alert
        | LoggingLevel::Emergency => "error",
    }
}

/// エラーは `is_error` 付きの正常応答にする
pub fn tool_result(outcome: ToolOutcome) -> CallToolResult {
    let content = vec![Content::text(outcome.text)];
    if outcome.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

pub fn prompt_result(outcome: PromptOutcome) -> GetPromptResult {
    let messages = outcome
        .turns
        .into_iter()
        .map(|turn| {
            let role = match turn.role {
                Role::User => PromptMessageRole::User,
                Role::Assistant => PromptMessageRole::Assistant,
            };
            PromptMessage::new_text(role, turn.text)
        })
        .collect();

    GetPromptResult {
        description: Some(outcome.description),
        messages,
    }
}

impl ServerHandler for CalculatorServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_logging()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Arithmetic calculator. Use the `calculate` tool or prompt with an operation (add, subtract, multiply, divide) and two operands; results are exact decimals.".into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(vec![Self::tool()?]))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        if request.name != TOOL_NAME {
            warn!(tool = %request.name, "unknown tool");
            return Err(McpError::invalid_params(format!("unknown tool: {}", request.name), None));
        }

        debug!(arguments = ?request.arguments, "tools/call");
        let arguments = request.arguments.unwrap_or_default();
        Ok(tool_result(self.calculator.call_tool(&arguments)))
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult::with_all_items(vec![Self::prompt()]))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        if request.name != PROMPT_NAME {
            warn!(prompt = %request.name, "unknown prompt");
            return Err(McpError::invalid_params(format!("unknown prompt: {}", request.name), None));
        }

        debug!(arguments = ?request.arguments, "prompts/get");
        let arguments = request.arguments.unwrap_or_default();
        Ok(prompt_result(self.calculator.get_prompt(&arguments)))
    }

    async fn set_level(
        &self,
        request: SetLevelRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<(), McpError> {
        self.apply_log_level(request.level)
    }
}
