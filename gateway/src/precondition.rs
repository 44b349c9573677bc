use crate::args::InvocationArgs;
use crate::config::Credential;
use crate::envelope::ErrorCategory;
use crate::registry::{Constraint, OperationSpec};

/// A reason to refuse a call before touching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingCredential,
    MissingArgument {
        field: &'static str,
        /// Set when the field is only conditionally required
        reason: Option<String>,
    },
}

impl Violation {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Violation::MissingCredential => ErrorCategory::MissingCredential,
            Violation::MissingArgument { .. } => ErrorCategory::MissingArgument,
        }
    }
}

/// Check credential and argument presence. First violation wins.
///
/// Values are not validated here; the exchange is authoritative for that.
pub fn check(
    spec: &OperationSpec,
    args: &InvocationArgs,
    credential: Option<&Credential>,
) -> Option<Violation> {
    if spec.requires_auth && credential.map_or(true, Credential::is_blank) {
        return Some(Violation::MissingCredential);
    }

    if let Some(field) = spec.required_fields().find(|f| !args.is_present(f)) {
        return Some(Violation::MissingArgument {
            field,
            reason: None,
        });
    }

    spec.constraints.iter().find_map(|constraint| match *constraint {
        Constraint::RequiredWhen {
            field,
            when,
            equals,
        } => {
            let triggered = args
                .present(when)
                .is_some_and(|value| value.to_string() == equals);
            (triggered && !args.is_present(field)).then(|| Violation::MissingArgument {
                field,
                reason: Some(format!("required when {when} is {equals}")),
            })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn key() -> Credential {
        Credential::new("test_api_key")
    }

    #[test]
    fn test_auth_operations_need_a_credential() {
        let registry = Registry::revolutx().unwrap();
        for spec in registry.iter().filter(|s| s.requires_auth) {
            assert_eq!(
                check(spec, &InvocationArgs::new(), None),
                Some(Violation::MissingCredential),
                "{}",
                spec.name
            );
            let blank = Credential::new("  ");
            assert_eq!(
                check(spec, &InvocationArgs::new(), Some(&blank)),
                Some(Violation::MissingCredential)
            );
        }
    }

    #[test]
    fn test_public_operations_ignore_missing_credential() {
        let registry = Registry::revolutx().unwrap();
        let spec = registry.lookup("get_last_trades").unwrap();
        assert_eq!(check(spec, &InvocationArgs::new(), None), None);
    }

    #[test]
    fn test_credential_is_checked_before_arguments() {
        let registry = Registry::revolutx().unwrap();
        let spec = registry.lookup("cancel_order").unwrap();
        assert_eq!(
            check(spec, &InvocationArgs::new(), None),
            Some(Violation::MissingCredential)
        );
    }

    #[test]
    fn test_each_missing_required_field_is_reported() {
        let registry = Registry::revolutx().unwrap();
        let spec = registry.lookup("place_order").unwrap();
        let full = [
            ("symbol", "BTC-USD"),
            ("side", "buy"),
            ("type", "market"),
            ("quantity", "0.1"),
        ];
        for (omitted, _) in full {
            let mut args = InvocationArgs::new();
            for (field, value) in full.iter().filter(|(f, _)| *f != omitted) {
                args.insert(*field, *value);
            }
            let violation = check(spec, &args, Some(&key())).unwrap();
            assert_eq!(violation.category(), ErrorCategory::MissingArgument);
            assert_eq!(
                violation,
                Violation::MissingArgument {
                    field: omitted,
                    reason: None
                }
            );
        }
    }

    #[test]
    fn test_limit_order_requires_price() {
        let registry = Registry::revolutx().unwrap();
        let spec = registry.lookup("place_order").unwrap();
        let args = InvocationArgs::new()
            .with("symbol", "BTC-USD")
            .with("side", "sell")
            .with("type", "limit")
            .with("quantity", "1");

        let violation = check(spec, &args, Some(&key())).unwrap();
        assert!(matches!(
            violation,
            Violation::MissingArgument { field: "price", reason: Some(_) }
        ));

        let priced = args.clone().with("price", "65000");
        assert_eq!(check(spec, &priced, Some(&key())), None);

        let market = args.with("type", "market");
        assert_eq!(check(spec, &market, Some(&key())), None);
    }

    #[test]
    fn test_blank_required_value_is_missing() {
        let registry = Registry::revolutx().unwrap();
        let spec = registry.lookup("get_order_book").unwrap();
        let args = InvocationArgs::new().with("symbol", "");
        assert!(matches!(
            check(spec, &args, None),
            Some(Violation::MissingArgument { field: "symbol", .. })
        ));
    }
}
