//! `toolcall demo`: the two sample calls from the server's integration
//! guide, USDC reserves on Ethereum and WETH token info on Polygon.

use std::io::Write;

use serde_json::json;

use tc_client::ToolClient;

/// Run both sample calls, printing each result as it arrives.
///
/// Returns `false` if either call hit a client error.
pub async fn run(client: &ToolClient, out: &mut impl Write) -> anyhow::Result<bool> {
    let calls = [
        (
            "Fetching USDC reserve data on Ethereum (chain 1)",
            "get_reserve_data",
            json!({ "chain_id": 1, "assets": ["USDC"] }),
        ),
        (
            "Fetching WETH token info on Polygon (chain 137)",
            "get_token_info",
            json!({ "chain_id": 137, "tokens": ["WETH"] }),
        ),
    ];

    let mut all_ok = true;
    for (heading, tool, params) in calls {
        writeln!(out, "{heading}...")?;
        let value = match client.invoke(tool, params).await {
            Ok(value) => value,
            Err(e) => {
                all_ok = false;
                e.payload().to_value()
            }
        };
        writeln!(out, "Response from {tool}:")?;
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        writeln!(out)?;
    }

    Ok(all_ok)
}
