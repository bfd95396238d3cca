use common_enums::{ErrorCode, TransactionKind, TransactionStatus};
use common_utils::types::MinorUnit;
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Extra, Metadata, GATEWAY_NAME};

/// A payment operation and its outcome. Each payment flow mutates the transaction it is given
/// and hands it back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Amount in minor currency units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<MinorUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    /// Gateway charge id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
    /// Moment an authorization hold lapses
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub authorization_exp: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<PaymentDetails>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Transaction {
    /// Stamps the operation kind and makes sure payment details exist
    pub fn begin(&mut self, kind: TransactionKind) -> &mut PaymentDetails {
        self.kind = Some(kind);
        self.payment_details
            .get_or_insert_with(PaymentDetails::for_gateway)
    }

    /// Records a successful gateway outcome
    pub fn succeed(&mut self) {
        self.status = Some(TransactionStatus::Success);
        self.error_code = None;
        self.error_message = None;
    }

    /// Records a failed gateway outcome
    pub fn fail(&mut self, error_code: ErrorCode, error_message: Option<String>) {
        self.status = Some(TransactionStatus::Failure);
        self.error_code = Some(error_code);
        self.error_message = error_message;
    }
}

/// Payment instrument used by a transaction or stored on a source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// Card token or saved source id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Secret<String>>,
    /// Gateway customer id the instrument belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    /// `<funding>_<object>`, e.g. `credit_card`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avs_result_code: Option<String>,
    /// Always emitted, the gateway never reveals the issuer identification number
    #[serde(default)]
    pub credit_card_iin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card_company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card_exp_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card_exp_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvv_result_code: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl PaymentDetails {
    pub fn for_gateway() -> Self {
        Self {
            gateway: Some(GATEWAY_NAME.to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let input = json!({
            "amount": 100,
            "order_id": "ord_1",
            "payment_details": { "token": "tok_visa", "nickname": "work card" }
        });
        let transaction: Transaction =
            serde_json::from_value(input).expect("valid transaction");
        assert_eq!(transaction.amount, Some(MinorUnit::new(100)));
        assert_eq!(transaction.extra.get("order_id"), Some(&json!("ord_1")));

        let output = serde_json::to_value(&transaction).expect("serializable");
        assert_eq!(output["order_id"], json!("ord_1"));
        assert_eq!(output["payment_details"]["nickname"], json!("work card"));
        assert_eq!(output["payment_details"]["token"], json!("tok_visa"));
    }

    #[test]
    fn begin_stamps_kind_and_gateway() {
        let mut transaction = Transaction::default();
        transaction.begin(TransactionKind::Void);

        assert_eq!(transaction.kind, Some(TransactionKind::Void));
        let details = transaction.payment_details.expect("details created");
        assert_eq!(details.gateway.as_deref(), Some(GATEWAY_NAME));
    }

    #[test]
    fn begin_keeps_existing_payment_details() {
        let mut transaction = Transaction {
            payment_details: Some(PaymentDetails {
                token: Some(Secret::new("tok_visa".to_string())),
                ..Default::default()
            }),
            ..Default::default()
        };
        let details = transaction.begin(TransactionKind::Sale);
        assert!(details.token.is_some());
        assert!(details.gateway.is_none());
    }

    #[test]
    fn failure_is_serialized_with_error_code() {
        let mut transaction = Transaction::default();
        transaction.fail(ErrorCode::CardDeclined, Some("Your card was declined.".into()));
        let output = serde_json::to_value(&transaction).expect("serializable");
        assert_eq!(output["status"], json!("failure"));
        assert_eq!(output["error_code"], json!("card_declined"));
    }
}
