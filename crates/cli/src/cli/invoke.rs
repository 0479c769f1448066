//! `toolcall invoke`: one tool call, result on stdout.

use std::io::Write;

use anyhow::Context;
use serde_json::{Map, Value};

use tc_client::ToolClient;

/// Parse `--params`, which must be a JSON object.
pub fn parse_params(raw: &str) -> anyhow::Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(raw).context("--params is not valid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("--params must be a JSON object, got: {other}"),
    }
}

/// Invoke `tool` and write its result (or the client error object) to `out`.
///
/// Returns `false` when the client itself failed, so the caller can exit
/// non-zero. A server-reported error payload still counts as success.
pub async fn run(
    client: &ToolClient,
    tool: &str,
    params: &str,
    compact: bool,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let params = parse_params(params)?;

    let (value, ok) = match client.invoke(tool, Value::Object(params)).await {
        Ok(value) => (value, true),
        Err(e) => (e.payload().to_value(), false),
    };

    let rendered = if compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    writeln!(out, "{rendered}")?;
    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_params_parse() {
        let map = parse_params(r#"{"chain_id":1,"assets":["USDC"]}"#).unwrap();
        assert_eq!(map["chain_id"], json!(1));
    }

    #[test]
    fn empty_object_is_fine() {
        assert!(parse_params("{}").unwrap().is_empty());
    }

    #[test]
    fn array_params_rejected() {
        let err = parse_params("[1,2]").unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
    }

    #[test]
    fn garbage_params_rejected() {
        assert!(parse_params("chain_id=1").is_err());
    }
}
