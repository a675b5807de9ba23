use std::path::Path;

use serde::{Deserialize, Serialize};

use rcl_gate::GuardConfig;

use crate::error::{ContractError, ContractResult};

/// How namespace listings enumerate keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Lexicographic scan of `["{prefix}0", "{prefix}99")`.
    ///
    /// Keys order as strings (`user10` before `user2`) and `{prefix}99` is
    /// never listed.
    #[default]
    Bounded,
    /// Every `{prefix}{n}` key, ordered by `n`, with no ceiling.
    Numeric,
}

/// How the next order sequence number is derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStrategy {
    /// A counter record incremented in the creating transaction.
    #[default]
    Counter,
    /// One more than the number of orders a listing scan returns.
    Scan,
}

/// Configuration for the receivable contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub guard: GuardConfig,
    pub scan: ScanMode,
    pub allocation: AllocationStrategy,
    /// Extra sequence numbers tried when the derived one is already taken.
    pub max_allocation_probes: u32,
    /// Receivable lifetime from signing to expiry.
    pub validity_months: u32,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            guard: GuardConfig::default(),
            scan: ScanMode::default(),
            allocation: AllocationStrategy::default(),
            max_allocation_probes: 16,
            validity_months: 12,
        }
    }
}

impl ContractConfig {
    pub fn from_toml_str(raw: &str) -> ContractResult<Self> {
        toml::from_str(raw).map_err(|e| ContractError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> ContractResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ContractError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcl_gate::{AcceptPolicy, DiscountConfirmPolicy};

    #[test]
    fn default_config() {
        let c = ContractConfig::default();
        assert_eq!(c.scan, ScanMode::Bounded);
        assert_eq!(c.allocation, AllocationStrategy::Counter);
        assert_eq!(c.max_allocation_probes, 16);
        assert_eq!(c.validity_months, 12);
        assert_eq!(c.guard, GuardConfig::default());
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ContractConfig::from_toml_str("").unwrap(), ContractConfig::default());
    }

    #[test]
    fn nested_guard_table() {
        let c = ContractConfig::from_toml_str(
            r#"
            scan = "numeric"
            allocation = "scan"
            validity_months = 6

            [guard]
            require_valid_status = true
            accept = "acceptor_only"
            discount_confirm = "applicant_only"
            "#,
        )
        .unwrap();
        assert_eq!(c.scan, ScanMode::Numeric);
        assert_eq!(c.allocation, AllocationStrategy::Scan);
        assert_eq!(c.validity_months, 6);
        assert_eq!(c.max_allocation_probes, 16);
        assert!(c.guard.require_valid_status);
        assert_eq!(c.guard.accept, AcceptPolicy::AcceptorOnly);
        assert_eq!(c.guard.discount_confirm, DiscountConfirmPolicy::ApplicantOnly);
    }

    #[test]
    fn unknown_variant_is_a_config_error() {
        assert!(matches!(
            ContractConfig::from_toml_str("scan = \"sideways\""),
            Err(ContractError::Config(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rcl.toml");
        std::fs::write(&path, "max_allocation_probes = 2\n").unwrap();
        assert_eq!(ContractConfig::load(&path).unwrap().max_allocation_probes, 2);
        assert!(ContractConfig::load(dir.path().join("missing.toml")).is_err());
    }
}
