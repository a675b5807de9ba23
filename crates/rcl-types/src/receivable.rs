use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::time::LedgerTime;

/// Lifecycle stage of a receivable.
///
/// The stages form a fixed chain; a receivable only ever moves to the
/// immediate successor of its current stage.
///
/// `ToBeAccepted -> Accepted -> ToBeDiscounted -> Discounted -> Redeemed`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReceivableStatus {
    #[serde(rename = "To Be Accepted")]
    ToBeAccepted,
    #[serde(rename = "Accepted")]
    Accepted,
    #[serde(rename = "To Be Discounted")]
    ToBeDiscounted,
    #[serde(rename = "Discounted")]
    Discounted,
    #[serde(rename = "Redeemed")]
    Redeemed,
}

impl ReceivableStatus {
    pub const CHAIN: [ReceivableStatus; 5] = [
        Self::ToBeAccepted,
        Self::Accepted,
        Self::ToBeDiscounted,
        Self::Discounted,
        Self::Redeemed,
    ];

    /// Human-readable form, identical to the wire encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToBeAccepted => "To Be Accepted",
            Self::Accepted => "Accepted",
            Self::ToBeDiscounted => "To Be Discounted",
            Self::Discounted => "Discounted",
            Self::Redeemed => "Redeemed",
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            Self::ToBeAccepted => "ToBeAccepted",
            Self::Accepted => "Accepted",
            Self::ToBeDiscounted => "ToBeDiscounted",
            Self::Discounted => "Discounted",
            Self::Redeemed => "Redeemed",
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            Self::ToBeAccepted => Some(Self::Accepted),
            Self::Accepted => Some(Self::ToBeDiscounted),
            Self::ToBeDiscounted => Some(Self::Discounted),
            Self::Discounted => Some(Self::Redeemed),
            Self::Redeemed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    pub fn can_advance_to(&self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for ReceivableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReceivableStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::CHAIN
            .into_iter()
            .find(|status| {
                status.as_str().eq_ignore_ascii_case(wanted)
                    || status.variant_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| TypeError::UnknownReceivableStatus(s.to_string()))
    }
}

/// The negotiable payment right derived from a signed order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receivable {
    pub receivable_no: String,
    pub order_no: String,
    pub signed_time: LedgerTime,
    pub expire_time: LedgerTime,
    /// Current holder and beneficiary.
    pub owner_id: String,
    /// The ultimate payer (the Company that issued the order).
    pub acceptor_id: String,
    pub discount_apply_amount: u64,
    pub status: ReceivableStatus,
    /// Financial institution named when discounting was applied for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_applicant_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_is_linear() {
        let chain = ReceivableStatus::CHAIN;
        for pair in chain.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
            assert!(pair[0].can_advance_to(pair[1]));
            assert!(!pair[1].can_advance_to(pair[0]));
        }
        assert!(ReceivableStatus::Redeemed.is_terminal());
        assert!(!ReceivableStatus::ToBeAccepted.can_advance_to(ReceivableStatus::ToBeDiscounted));
    }

    #[test]
    fn no_stage_advances_to_itself() {
        for status in ReceivableStatus::CHAIN {
            assert!(!status.can_advance_to(status));
        }
    }

    #[test]
    fn status_wire_form_is_human_text() {
        let json = serde_json::to_string(&ReceivableStatus::ToBeDiscounted).unwrap();
        assert_eq!(json, "\"To Be Discounted\"");
        assert_eq!(
            "tobeaccepted".parse::<ReceivableStatus>().unwrap(),
            ReceivableStatus::ToBeAccepted
        );
        assert_eq!(
            "to be accepted".parse::<ReceivableStatus>().unwrap(),
            ReceivableStatus::ToBeAccepted
        );
        assert!("Paid".parse::<ReceivableStatus>().is_err());
    }

    #[test]
    fn applicant_is_omitted_until_set() {
        let mut rec = Receivable {
            receivable_no: "rec1".into(),
            order_no: "order1".into(),
            signed_time: "2020-05-27 15:04:05".parse().unwrap(),
            expire_time: "2021-05-27 15:04:05".parse().unwrap(),
            owner_id: "user2".into(),
            acceptor_id: "user1".into(),
            discount_apply_amount: 900_000,
            status: ReceivableStatus::ToBeAccepted,
            discount_applicant_id: None,
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(
            json,
            r#"{"receivable_no":"rec1","order_no":"order1","signed_time":"2020-05-27 15:04:05","expire_time":"2021-05-27 15:04:05","owner_id":"user2","acceptor_id":"user1","discount_apply_amount":900000,"status":"To Be Accepted"}"#
        );
        let decoded: Receivable = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, rec);

        rec.discount_applicant_id = Some("user4".into());
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.ends_with(r#""discount_applicant_id":"user4"}"#));
    }
}
