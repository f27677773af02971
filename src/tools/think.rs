use crate::research::schema::{parameters_for, ThinkArgs};
use crate::tools::registry::Tool;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Strategic reflection between searches. Records the text verbatim.
pub struct ThinkTool;

#[async_trait]
impl Tool for ThinkTool {
    fn name(&self) -> &str {
        "think_tool"
    }

    fn description(&self) -> &str {
        "Tool for strategic reflection on research progress and decision-making. \
         Use it after each search to analyze results, assess gaps and plan the next step."
    }

    fn parameters_schema(&self) -> Value {
        parameters_for::<ThinkArgs>()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: ThinkArgs = serde_json::from_value(args)
            .map_err(|e| AppError::InvalidInput(format!("Invalid think_tool arguments: {}", e)))?;

        Ok(Value::String(format!("Reflection recorded: {}", args.reflection)))
    }
}
