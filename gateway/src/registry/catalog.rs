use super::{Constraint, FieldKind, FieldSpec, HttpMethod, OperationSpec, ParamPlacement};

const SYMBOL: FieldSpec = FieldSpec {
    name: "symbol",
    kind: FieldKind::String,
    description: "The trading pair symbol (e.g., BTC-USD)",
    required: true,
    allowed: &[],
};

const ORDER_BOOK_FIELDS: &[FieldSpec] = &[SYMBOL];

const ACTIVE_ORDERS_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "cursor",
        kind: FieldKind::String,
        description: "Cursor for pagination, obtained from metadata.nextCursor",
        required: false,
        allowed: &[],
    },
    FieldSpec {
        name: "limit",
        kind: FieldKind::Integer,
        description: "Maximum number of records returned (default: 100)",
        required: false,
        allowed: &[],
    },
];

const PLACE_ORDER_FIELDS: &[FieldSpec] = &[
    SYMBOL,
    FieldSpec {
        name: "side",
        kind: FieldKind::String,
        description: "Side of the order (buy or sell)",
        required: true,
        allowed: &["buy", "sell"],
    },
    FieldSpec {
        name: "type",
        kind: FieldKind::String,
        description: "Type of the order (market or limit)",
        required: true,
        allowed: &["market", "limit"],
    },
    FieldSpec {
        name: "quantity",
        kind: FieldKind::String,
        description: "Quantity to buy or sell",
        required: true,
        allowed: &[],
    },
    FieldSpec {
        name: "price",
        kind: FieldKind::String,
        description: "Price for limit orders (required if type is limit)",
        required: false,
        allowed: &[],
    },
];

const CANCEL_ORDER_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "order_id",
    kind: FieldKind::String,
    description: "The ID of the order to cancel",
    required: true,
    allowed: &[],
}];

const GET_ORDER_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "order_id",
    kind: FieldKind::String,
    description: "The ID of the order to retrieve",
    required: true,
    allowed: &[],
}];

pub(super) const OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        name: "get_balances",
        description: "Get crypto exchange account balances for the requesting user. Requires REVOLUTX_API_KEY to be set.",
        method: HttpMethod::Get,
        path_template: "/balances",
        placement: ParamPlacement::Query,
        requires_auth: true,
        fields: &[],
        action: "fetching balances",
        constraints: &[],
    },
    OperationSpec {
        name: "get_currencies",
        description: "Get configuration for all currencies used on the exchange. Requires REVOLUTX_API_KEY.",
        method: HttpMethod::Get,
        path_template: "/configuration/currencies",
        placement: ParamPlacement::Query,
        requires_auth: true,
        fields: &[],
        action: "fetching currencies",
        constraints: &[],
    },
    OperationSpec {
        name: "get_pairs",
        description: "Get configuration for all traded currency pairs. Requires REVOLUTX_API_KEY.",
        method: HttpMethod::Get,
        path_template: "/configuration/pairs",
        placement: ParamPlacement::Query,
        requires_auth: true,
        fields: &[],
        action: "fetching pairs",
        constraints: &[],
    },
    OperationSpec {
        name: "get_active_orders",
        description: "Get active crypto exchange orders for the requesting user. Requires REVOLUTX_API_KEY.",
        method: HttpMethod::Get,
        path_template: "/orders",
        placement: ParamPlacement::Query,
        requires_auth: true,
        fields: ACTIVE_ORDERS_FIELDS,
        action: "fetching active orders",
        constraints: &[],
    },
    OperationSpec {
        name: "get_last_trades",
        description: "Get the list of the latest 100 trades executed on Revolut X crypto exchange.",
        method: HttpMethod::Get,
        path_template: "/public/last-trades",
        placement: ParamPlacement::Query,
        requires_auth: false,
        fields: &[],
        action: "fetching last trades",
        constraints: &[],
    },
    OperationSpec {
        name: "get_order_book",
        description: "Fetch the current order book (bids and asks) for a given trading pair (with a maximum of 5 price levels).",
        method: HttpMethod::Get,
        path_template: "/public/order-book/{symbol}",
        placement: ParamPlacement::Path,
        requires_auth: false,
        fields: ORDER_BOOK_FIELDS,
        action: "fetching order book for {symbol}",
        constraints: &[],
    },
    OperationSpec {
        name: "place_order",
        description: "Place a new order on the exchange. WARNING: This performs a real financial transaction.",
        method: HttpMethod::Post,
        path_template: "/orders",
        placement: ParamPlacement::Body,
        requires_auth: true,
        fields: PLACE_ORDER_FIELDS,
        action: "placing order",
        constraints: &[Constraint::RequiredWhen {
            field: "price",
            when: "type",
            equals: "limit",
        }],
    },
    OperationSpec {
        name: "cancel_order",
        description: "Cancel an active order by its ID.",
        method: HttpMethod::Delete,
        path_template: "/orders/{order_id}",
        placement: ParamPlacement::Path,
        requires_auth: true,
        fields: CANCEL_ORDER_FIELDS,
        action: "canceling order {order_id}",
        constraints: &[],
    },
    OperationSpec {
        name: "get_order",
        description: "Get details of a specific order by its ID.",
        method: HttpMethod::Get,
        path_template: "/orders/{order_id}",
        placement: ParamPlacement::Path,
        requires_auth: true,
        fields: GET_ORDER_FIELDS,
        action: "fetching order {order_id}",
        constraints: &[],
    },
];
