use serde::{Deserialize, Serialize};

/// Who may accept a receivable that is awaiting acceptance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptPolicy {
    /// Any account with the Company role.
    #[default]
    AnyCompany,
    /// Only the Company recorded as the receivable's acceptor.
    AcceptorOnly,
}

/// Who may confirm a pending discount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountConfirmPolicy {
    /// Any account with the Financial role.
    #[default]
    AnyFinancial,
    /// Only the Financial institution named when discounting was applied for.
    ApplicantOnly,
}

/// Configuration for the authorization guard and its counterparty policies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Reject actors whose account status is not `Valid`.
    pub require_valid_status: bool,
    pub accept: AcceptPolicy,
    pub discount_confirm: DiscountConfirmPolicy,
}

impl GuardConfig {
    /// Every counterparty check enabled and inactive accounts rejected.
    pub fn strict() -> Self {
        Self {
            require_valid_status: true,
            accept: AcceptPolicy::AcceptorOnly,
            discount_confirm: DiscountConfirmPolicy::ApplicantOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_permissive() {
        let c = GuardConfig::default();
        assert!(!c.require_valid_status);
        assert_eq!(c.accept, AcceptPolicy::AnyCompany);
        assert_eq!(c.discount_confirm, DiscountConfirmPolicy::AnyFinancial);
    }

    #[test]
    fn parses_partial_toml() {
        let c: GuardConfig = toml::from_str("accept = \"acceptor_only\"").unwrap();
        assert_eq!(c.accept, AcceptPolicy::AcceptorOnly);
        assert_eq!(c.discount_confirm, DiscountConfirmPolicy::AnyFinancial);
    }

    #[test]
    fn strict_enables_everything() {
        let c = GuardConfig::strict();
        assert!(c.require_valid_status);
        assert_eq!(c.accept, AcceptPolicy::AcceptorOnly);
        assert_eq!(c.discount_confirm, DiscountConfirmPolicy::ApplicantOnly);
    }
}
