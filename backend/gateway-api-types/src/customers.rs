use common_utils::pii::Email;
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};

use crate::{payments::PaymentDetails, Extra, Metadata, GATEWAY_NAME};

pub const CUSTOMER_FOREIGN_KEY: &str = "customer";
pub const SOURCE_FOREIGN_KEY: &str = "source";

/// Customer record linked to a gateway customer object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Card token attached as the initial source on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Secret<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    /// Gateway customer id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_id: Option<String>,
    /// Last gateway object seen for this customer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Customer {
    pub fn link(&mut self, foreign_id: String, data: serde_json::Value) {
        self.gateway = Some(GATEWAY_NAME.to_string());
        self.foreign_key = Some(CUSTOMER_FOREIGN_KEY.to_string());
        self.foreign_id = Some(foreign_id);
        self.data = Some(data);
    }
}

/// Saved payment source owned by a gateway customer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Secret<String>>,
    /// Gateway customer id owning the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_foreign_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    /// Gateway card id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<PaymentDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Source {
    pub fn link(
        &mut self,
        account_foreign_id: String,
        foreign_id: String,
        payment_details: PaymentDetails,
    ) {
        self.gateway = Some(GATEWAY_NAME.to_string());
        self.account_foreign_id = Some(account_foreign_id);
        self.foreign_key = Some(SOURCE_FOREIGN_KEY.to_string());
        self.foreign_id = Some(foreign_id);
        self.payment_details = Some(payment_details);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    use hyperswitch_masking::ExposeInterface;
    use serde_json::json;

    use super::*;

    #[test]
    fn customer_email_is_validated_on_input() {
        let parsed = serde_json::from_value::<Customer>(json!({ "email": "not-an-email" }));
        assert!(parsed.is_err());

        let customer: Customer =
            serde_json::from_value(json!({ "email": "jane@example.com" })).expect("valid");
        let email = customer.email.expect("email present");
        assert_eq!(email.expose().expose(), "jane@example.com");
    }

    #[test]
    fn linking_a_source_sets_foreign_identifiers() {
        let mut source = Source::default();
        source.link(
            "cus_1".to_string(),
            "card_1".to_string(),
            PaymentDetails::for_gateway(),
        );
        let output = serde_json::to_value(&source).expect("serializable");
        assert_eq!(output["foreign_key"], json!("source"));
        assert_eq!(output["account_foreign_id"], json!("cus_1"));
        assert_eq!(output["foreign_id"], json!("card_1"));
        assert_eq!(output["payment_details"]["credit_card_iin"], json!(null));
    }
}
