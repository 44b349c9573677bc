use crate::args::{ArgValue, InvocationArgs};
use crate::config::{Credential, CREDENTIAL_HEADER};
use crate::registry::{FieldKind, FieldSpec, HttpMethod, OperationSpec, ParamPlacement};
use reqwest::Url;
use serde_json::{Map, Value};

/// Fully resolved outbound request for one call.
///
/// Built without I/O so the parameter and header contract can be checked on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl RequestPlan {
    pub fn build(
        base_url: &str,
        spec: &OperationSpec,
        args: &InvocationArgs,
        credential: Option<&Credential>,
    ) -> Result<Self, String> {
        let path = render_path(spec, args)?;
        let raw_url = format!("{}{path}", base_url.trim_end_matches('/'));
        let mut url = Url::parse(&raw_url).map_err(|e| format!("invalid request URL '{raw_url}': {e}"))?;

        if spec.placement == ParamPlacement::Query {
            let pairs: Vec<(&str, String)> = spec
                .fields
                .iter()
                .filter_map(|field| args.present(field.name).map(|v| (field.name, v.to_string())))
                .collect();
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }

        let body = (spec.placement == ParamPlacement::Body).then(|| {
            let object: Map<String, Value> = spec
                .fields
                .iter()
                .filter_map(|field| {
                    args.present(field.name)
                        .map(|v| (field.name.to_string(), body_value(field, v)))
                })
                .collect();
            Value::Object(object)
        });

        let mut headers = vec![("Accept", "application/json".to_string())];
        if body.is_some() {
            headers.push(("Content-Type", "application/json".to_string()));
        }
        if spec.requires_auth {
            if let Some(credential) = credential.filter(|c| !c.is_blank()) {
                headers.push((CREDENTIAL_HEADER, credential.expose().to_string()));
            }
        }

        Ok(Self {
            method: spec.method,
            url,
            headers,
            body,
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn render_path(spec: &OperationSpec, args: &InvocationArgs) -> Result<String, String> {
    let mut path = spec.path_template.to_string();
    for field in spec.path_placeholders() {
        let value = args
            .present(field)
            .ok_or_else(|| format!("missing path argument '{field}'"))?;
        path = path.replace(&format!("{{{field}}}"), &value.to_string());
    }
    Ok(path)
}

/// Text is sent verbatim unless the field is declared `Integer` and parses as
/// one. JSON numbers and booleans from a client keep their JSON type.
fn body_value(field: &FieldSpec, value: &ArgValue) -> Value {
    match (field.kind, value) {
        (FieldKind::Integer, ArgValue::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(s.clone())),
        (FieldKind::String, ArgValue::Text(s)) => Value::String(s.clone()),
        (_, other) => other.to_json(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use serde_json::json;

    const BASE: &str = "https://revx.revolut.com/api/1.0";

    fn plan(name: &str, args: InvocationArgs, credential: Option<&Credential>) -> RequestPlan {
        let registry = Registry::revolutx().unwrap();
        RequestPlan::build(BASE, registry.lookup(name).unwrap(), &args, credential).unwrap()
    }

    #[test]
    fn test_authenticated_get() {
        let key = Credential::new("test_api_key");
        let plan = plan("get_balances", InvocationArgs::new(), Some(&key));
        assert_eq!(plan.method, HttpMethod::Get);
        assert_eq!(plan.url.as_str(), "https://revx.revolut.com/api/1.0/balances");
        assert_eq!(plan.header("accept"), Some("application/json"));
        assert_eq!(plan.header(CREDENTIAL_HEADER), Some("test_api_key"));
        assert_eq!(plan.header("Content-Type"), None);
        assert!(plan.body.is_none());
    }

    #[test]
    fn test_public_operation_never_sends_credential() {
        let key = Credential::new("test_api_key");
        let plan = plan("get_last_trades", InvocationArgs::new(), Some(&key));
        assert_eq!(plan.url.path(), "/api/1.0/public/last-trades");
        assert_eq!(plan.header(CREDENTIAL_HEADER), None);
        assert_eq!(plan.header("Accept"), Some("application/json"));
    }

    #[test]
    fn test_query_parameters_only_when_present() {
        let key = Credential::new("k");
        let bare = plan("get_active_orders", InvocationArgs::new(), Some(&key));
        assert_eq!(bare.url.query(), None);

        let args = InvocationArgs::new().with("limit", 10).with("cursor", "");
        let limited = plan("get_active_orders", args, Some(&key));
        assert_eq!(limited.url.query(), Some("limit=10"));

        let args = InvocationArgs::new().with("cursor", "abc").with("limit", 5);
        let both = plan("get_active_orders", args, Some(&key));
        assert_eq!(both.url.query(), Some("cursor=abc&limit=5"));
    }

    #[test]
    fn test_path_substitution() {
        let args = InvocationArgs::new().with("symbol", "BTC-USD");
        let book = plan("get_order_book", args, None);
        assert_eq!(
            book.url.as_str(),
            "https://revx.revolut.com/api/1.0/public/order-book/BTC-USD"
        );

        let key = Credential::new("k");
        let args = InvocationArgs::new().with("order_id", "7f1c");
        let cancel = plan("cancel_order", args, Some(&key));
        assert_eq!(cancel.method, HttpMethod::Delete);
        assert_eq!(cancel.url.path(), "/api/1.0/orders/7f1c");
    }

    #[test]
    fn test_missing_path_argument_is_an_error() {
        let registry = Registry::revolutx().unwrap();
        let spec = registry.lookup("get_order").unwrap();
        let err = RequestPlan::build(BASE, spec, &InvocationArgs::new(), None).unwrap_err();
        assert!(err.contains("order_id"));
    }

    #[test]
    fn test_body_contains_declared_fields_only() {
        let key = Credential::new("k");
        let args = InvocationArgs::parse_pairs(
            "place_order",
            ["symbol=BTC-USD", "side=buy", "type=limit", "quantity=0.5", "price=65000", "extra=1"],
        )
        .unwrap();
        let plan = plan("place_order", args, Some(&key));
        assert_eq!(plan.method, HttpMethod::Post);
        assert_eq!(plan.header("content-type"), Some("application/json"));
        assert_eq!(
            plan.body,
            Some(json!({
                "symbol": "BTC-USD",
                "side": "buy",
                "type": "limit",
                "quantity": "0.5",
                "price": "65000"
            }))
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let registry = Registry::revolutx().unwrap();
        let spec = registry.lookup("get_last_trades").unwrap();
        let plan =
            RequestPlan::build("http://127.0.0.1:9000/api/", spec, &InvocationArgs::new(), None)
                .unwrap();
        assert_eq!(plan.url.as_str(), "http://127.0.0.1:9000/api/public/last-trades");
    }

    #[test]
    fn test_unparseable_base_url_is_an_error() {
        let registry = Registry::revolutx().unwrap();
        let spec = registry.lookup("get_last_trades").unwrap();
        assert!(RequestPlan::build("::nope", spec, &InvocationArgs::new(), None).is_err());
    }

    #[test]
    fn test_tiny_quantity_typed_on_command_line_stays_exact() {
        let key = Credential::new("k");
        let args = InvocationArgs::parse_pairs(
            "place_order",
            ["symbol=BTC-USD", "side=sell", "type=market", "quantity=0.00000001"],
        )
        .unwrap();
        let plan = plan("place_order", args, Some(&key));
        let body = plan.body.unwrap();
        assert_eq!(body["quantity"], json!("0.00000001"));
        assert_eq!(
            serde_json::to_string(&body["quantity"]).unwrap(),
            r#""0.00000001""#
        );
    }

    #[test]
    fn test_long_numeric_order_id_in_path() {
        let key = Credential::new("k");
        let args =
            InvocationArgs::parse_pairs("get_order", ["order_id=123456789012345678901234"]).unwrap();
        let plan = plan("get_order", args, Some(&key));
        assert_eq!(
            plan.url.as_str(),
            "https://revx.revolut.com/api/1.0/orders/123456789012345678901234"
        );
    }

    #[test]
    fn test_json_number_keeps_its_type_in_body() {
        let key = Credential::new("k");
        let args = InvocationArgs::from_json(
            "place_order",
            Some(json!({
                "symbol": "BTC-USD",
                "side": "buy",
                "type": "limit",
                "quantity": 0.25,
                "price": "65000"
            })),
        )
        .unwrap();
        let plan = plan("place_order", args, Some(&key));
        let body = plan.body.unwrap();
        assert_eq!(body["quantity"], json!(0.25));
        assert_eq!(body["price"], json!("65000"));
    }
}
