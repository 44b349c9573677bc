//! Canned trading workflows offered to the agent as prompt templates.

use rmcp::model::{
    ErrorData as McpError, GetPromptResult, JsonObject, ListPromptsResult, Prompt, PromptArgument,
    PromptMessage, PromptMessageRole,
};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
struct PromptArg {
    name: &'static str,
    description: &'static str,
    required: bool,
    default: Option<&'static str>,
}

const fn required(name: &'static str, description: &'static str) -> PromptArg {
    PromptArg {
        name,
        description,
        required: true,
        default: None,
    }
}

const fn optional(name: &'static str, description: &'static str, default: &'static str) -> PromptArg {
    PromptArg {
        name,
        description,
        required: false,
        default: Some(default),
    }
}

type Render = fn(&Resolved) -> String;

#[derive(Clone, Copy)]
struct PromptTemplate {
    name: &'static str,
    description: &'static str,
    arguments: &'static [PromptArg],
    render: Render,
}

/// Argument values after defaults were applied.
struct Resolved(HashMap<&'static str, String>);

impl Resolved {
    fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or_default()
    }
}

const PROMPTS: &[PromptTemplate] = &[
    PromptTemplate {
        name: "analyze-market",
        description: "Analyze the market conditions for a specific trading pair.",
        arguments: &[required("symbol", "The trading pair symbol (e.g., BTC-USD)")],
        render: analyze_market,
    },
    PromptTemplate {
        name: "create-ladder-strategy",
        description: "Generate a ladder trading strategy (multiple orders at different price levels).",
        arguments: &[
            required("symbol", "Trading pair symbol (e.g., BTC-USD)"),
            required("start_price", "Starting price for the ladder"),
            required("end_price", "Ending price for the ladder"),
            required("num_levels", "Number of price levels"),
            required("total_quantity", "Total quantity to distribute across levels"),
            required("side", "buy or sell"),
        ],
        render: ladder_strategy,
    },
    PromptTemplate {
        name: "portfolio-summary",
        description: "Analyze current portfolio value based on balances and market prices.",
        arguments: &[optional(
            "currency",
            "Target currency to value portfolio in (default: USD)",
            "USD",
        )],
        render: portfolio_summary,
    },
    PromptTemplate {
        name: "risk-assessment",
        description: "Analyze portfolio risk, concentration, and exposure.",
        arguments: &[optional(
            "currency",
            "Base currency for valuation (default: USD)",
            "USD",
        )],
        render: risk_assessment,
    },
    PromptTemplate {
        name: "order-management",
        description: "Review and manage active orders with recommendations.",
        arguments: &[],
        render: order_management,
    },
    PromptTemplate {
        name: "market-comparison",
        description: "Compare market conditions across multiple trading pairs.",
        arguments: &[required(
            "symbols",
            "Comma-separated list of trading pairs (e.g., BTC-USD,ETH-USD,SOL-USD)",
        )],
        render: market_comparison,
    },
    PromptTemplate {
        name: "price-alert-setup",
        description: "Set up price monitoring strategy for a trading pair.",
        arguments: &[
            required("symbol", "Trading pair symbol (e.g., BTC-USD)"),
            required("target_price", "Target price to monitor"),
            optional(
                "direction",
                "Direction to monitor: 'above' or 'below' (default: above)",
                "above",
            ),
        ],
        render: price_alert,
    },
];

pub(crate) fn list() -> ListPromptsResult {
    let prompts = PROMPTS
        .iter()
        .map(|p| {
            let arguments = p
                .arguments
                .iter()
                .map(|a| PromptArgument {
                    name: a.name.to_string(),
                    title: None,
                    description: Some(a.description.to_string()),
                    required: Some(a.required),
                })
                .collect();
            Prompt::new(p.name, Some(p.description), Some(arguments))
        })
        .collect();
    ListPromptsResult::with_all_items(prompts)
}

/// One user message with the rendered template.
pub(crate) fn get(name: &str, arguments: Option<&JsonObject>) -> Result<GetPromptResult, McpError> {
    let template = PROMPTS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| McpError::invalid_params(format!("Prompt not found: {name}"), None))?;

    let mut values = HashMap::new();
    for arg in template.arguments {
        let supplied = arguments
            .and_then(|args| args.get(arg.name))
            .and_then(scalar_text)
            .filter(|s| !s.trim().is_empty());
        match supplied.or_else(|| arg.default.map(str::to_string)) {
            Some(value) => {
                values.insert(arg.name, value);
            }
            None if arg.required => {
                return Err(McpError::invalid_params(
                    format!("Argument '{}' is required", arg.name),
                    None,
                ))
            }
            None => {}
        }
    }

    let text = (template.render)(&Resolved(values));
    Ok(GetPromptResult {
        description: Some(template.description.to_string()),
        messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn analyze_market(args: &Resolved) -> String {
    let symbol = args.get("symbol");
    format!(
        "Please analyze the market for {symbol}.
1. Use the 'get_last_trades' tool to see recent activity.
2. Use the 'get_order_book' tool for {symbol} to check liquidity and spread.
3. Summarize the current sentiment (bullish/bearish/neutral) and key price levels."
    )
}

fn ladder_strategy(args: &Resolved) -> String {
    format!(
        "I want to create a ladder strategy for {side}ing {symbol}.
Parameters:
- Start Price: {start}
- End Price: {end}
- Levels: {levels}
- Total Quantity: {quantity}

Please:
1. Calculate the price levels and quantity per level (linear distribution).
2. Show me the plan.
3. Ask for confirmation before using 'place_order' for each level.",
        side = args.get("side"),
        symbol = args.get("symbol"),
        start = args.get("start_price"),
        end = args.get("end_price"),
        levels = args.get("num_levels"),
        quantity = args.get("total_quantity"),
    )
}

fn portfolio_summary(args: &Resolved) -> String {
    let currency = args.get("currency");
    format!(
        "Please generate a portfolio summary in {currency}.
1. Call 'get_balances' to see what assets I hold.
2. For each non-zero asset (excluding {currency}), call 'get_last_trades' or 'get_order_book' for the relevant pair (e.g., BTC-{currency}) to get the current price.
3. Calculate the total value of my holdings."
    )
}

fn risk_assessment(args: &Resolved) -> String {
    let currency = args.get("currency");
    format!(
        "Please perform a comprehensive risk assessment of my portfolio in {currency}.
1. Call 'get_balances' to see my current holdings.
2. Call 'get_active_orders' to check pending orders and exposure.
3. For each significant asset, check the current price using 'get_order_book' or 'get_last_trades'.
4. Analyze:
   - Portfolio concentration (% allocation per asset)
   - Liquidity risk (can positions be easily exited?)
   - Pending order exposure (how much capital is committed?)
   - Diversification score
5. Provide risk rating (Low/Medium/High) and recommendations."
    )
}

fn order_management(_: &Resolved) -> String {
    "Please help me manage my active orders.
1. Call 'get_active_orders' to list all current orders.
2. For each order, use 'get_order_book' for the symbol to check:
   - How far the order is from current market price
   - Likelihood of execution
   - Current spread
3. Organize orders by:
   - Orders likely to execute soon
   - Orders far from market (may need adjustment)
   - Orders that might need cancellation
4. Ask if I want to cancel any specific orders (use 'cancel_order' tool if confirmed)."
        .to_string()
}

fn market_comparison(args: &Resolved) -> String {
    let symbols = args
        .get("symbols")
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Please compare market conditions for: {symbols}.

For each symbol:
1. Call 'get_order_book' to analyze:
   - Current bid-ask spread
   - Liquidity (depth of order book)
   - Best bid/ask prices
2. Call 'get_last_trades' to check:
   - Recent trading volume
   - Price momentum
   - Trade frequency

Then provide a comparison table showing:
- Current price
- Spread (absolute and %)
- Liquidity score
- Recent momentum (bullish/bearish/neutral)
- Trading activity level

Recommend which pairs offer the best trading conditions."
    )
}

fn price_alert(args: &Resolved) -> String {
    let symbol = args.get("symbol");
    format!(
        "Please help me set up price monitoring for {symbol} at {target} (alert when price goes {direction}).

1. Call 'get_order_book' for {symbol} to get the current price.
2. Calculate the distance to target:
   - Current price vs target price
   - Percentage difference
3. Analyze the path to target:
   - Check order book depth between current and target price
   - Estimate likelihood of reaching target
4. Suggest monitoring strategy:
   - How frequently to check
   - Key support/resistance levels to watch
   - Potential actions when target is reached
5. Optionally suggest setting a limit order near the target price if appropriate.",
        target = args.get("target_price"),
        direction = args.get("direction"),
    )
}
