//! Loan and EMI retrieval payloads
//!
//! Static data standing in for the account backend. Several intents share
//! one handler, so there are fewer handlers than intents.

use serde_json::{json, Value};

use crate::registry::{HandlerRegistry, StaticHandler};

/// Names of every built-in handler
const HANDLER_NAMES: &[&str] = &[
    "make_payment",
    "payment_action",
    "reminder_request",
    "get_loan_details",
    "get_emi_breakdown",
    "get_due_date_extension_policy",
    "get_partial_payment_policy",
    "get_topup_loan_info",
    "get_prepayment_info",
    "fee_interest_info",
    "get_profile_data",
    "update_profile",
    "get_account_linking_info",
    "security_query",
    "get_human_context",
    "get_general_help",
    "faq_info_request",
    "handle_yes_or_no",
    "get_other",
];

pub fn handler_names() -> &'static [&'static str] {
    HANDLER_NAMES
}

/// Payload returned by the named built-in handler
pub fn payload(name: &str) -> Option<Value> {
    let value = match name {
        // Payments
        "make_payment" => json!({
            "status": "success",
            "method": "default",
            "amount": 5000,
            "currency": "INR",
            "message": "Payment processed successfully"
        }),
        "payment_action" => json!({
            "note": "User requested scheduling/reminders/auto-pay setup.",
            "options": {
                "schedule_payment": "Set date/time for future payment",
                "auto_debit": "Enable auto-debit from registered account",
                "reminders": "SMS/Email reminders before due date"
            },
            "default_reminder": "2 days before due date"
        }),
        "reminder_request" => json!({
            "note": "User asked for reminders/notifications.",
            "reminder_methods": ["SMS", "Email", "App Notification"],
            "default_frequency": "Before each EMI",
            "customization": "User can choose reminder time (1 day, 2 days, 1 week before)"
        }),

        // Loan / EMI
        "get_loan_details" => json!({
            "loan_id": "LN-98765",
            "product": "Home Loan",
            "principal": 500000,
            "outstanding_balance": 420000,
            "annual_rate_percent": 7.5,
            "next_emi_date": "2025-10-05",
            "next_emi_amount": 35500,
            "emi_frequency": "Monthly",
            "tenure_months": 240,
            "remaining_tenure_months": 180,
            "last_payment_date": "2025-09-05",
            "payment_history_summary": {
                "on_time_last_6": 5,
                "late_last_6": 1
            }
        }),
        "get_emi_breakdown" => json!({
            "emi_amount": 35500,
            "principal_component": 25000,
            "interest_component": 10500,
            "next_due_date": "2025-10-05"
        }),
        "get_due_date_extension_policy" => json!({
            "policy": "Extension up to 15 days allowed",
            "fee": 200,
            "message": "You can extend due date by 15 days with fee"
        }),
        "get_partial_payment_policy" => json!({
            "allowed": true,
            "minimum_amount": 2500,
            "message": "Partial payment allowed from 50% of EMI"
        }),
        "get_topup_loan_info" => json!({
            "eligible": true,
            "max_amount": 50000,
            "interest_rate": 9.0,
            "message": "You are eligible for top-up loan"
        }),
        "get_prepayment_info" => json!({
            "allowed": true,
            "penalty": 500,
            "message": "Prepayment allowed with penalty of 500 INR"
        }),
        "fee_interest_info" => json!({
            "note": "User requested info about fees/interest/penalties.",
            "interest_rate": "7.5% annual",
            "late_fee_policy": "₹500 flat after 3 days delay",
            "penalty_interest": "2% monthly on overdue amount",
            "grace_period": "3 days"
        }),

        // Profile / account
        "get_profile_data" => json!({
            "customer_id": "CUST-00123",
            "name": "Harshith Nalla",
            "email": "harshith.nalla@example.com",
            "phone": "+91-98xxxxxxx",
            "address": "123, Example St, Bangalore, India",
            "member_since": "2021-04-15"
        }),
        "update_profile" => json!({
            "note": "User requested to update profile.",
            "allowed_updates": ["phone", "email", "address"],
            "process": "Authenticate -> Provide new details -> Update in system",
            "support": "Contact support if self-update not available"
        }),
        "get_account_linking_info" => json!({
            "linked_accounts": ["XXXX-1234 (HDFC)", "XXXX-5678 (SBI)"],
            "supported_modes": ["Bank Transfer", "UPI", "Debit Card"],
            "note": "You can add or remove payment accounts from profile settings."
        }),
        "security_query" => json!({
            "note": "User requested security/authentication help.",
            "options": [
                "Change password",
                "Forgot password recovery",
                "Verify identity with OTP"
            ],
            "support_contact": "security-support@example.com",
            "guidance": "Always keep credentials safe, never share OTP."
        }),

        // Human / support
        "get_human_context" => json!({
            "status": "pending",
            "message": "Request forwarded to human agent"
        }),
        "get_general_help" => json!({
            "status": "success",
            "message": "Here is the guide for your request"
        }),
        "faq_info_request" => json!({
            "status": "success",
            "faqs": [
                "How to pay EMI?",
                "Penalty rules",
                "Loan extension options"
            ]
        }),

        // Confirmation and small talk
        "handle_yes_or_no" => json!({
            "status": "success",
            "message": "Confirmation / Denial registered"
        }),
        "get_other" => json!({
            "status": "success",
            "message": "This is a generic response"
        }),

        _ => return None,
    };

    Some(value)
}

/// Registry holding every built-in handler
pub fn create_default_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    for name in HANDLER_NAMES {
        if let Some(data) = payload(name) {
            registry.register(StaticHandler::new(*name, data));
        }
    }
    tracing::debug!(handlers = registry.len(), "Built default handler registry");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_has_a_payload() {
        for name in handler_names() {
            assert!(payload(name).is_some(), "missing payload for {}", name);
        }
        assert!(payload("get_weather").is_none());
    }

    #[test]
    fn test_default_registry_is_complete() {
        let registry = create_default_registry();
        assert_eq!(registry.len(), handler_names().len());
        assert!(registry.has("get_loan_details"));
        assert!(registry.has("handle_yes_or_no"));
    }

    #[tokio::test]
    async fn test_loan_details_payload() {
        let registry = create_default_registry();
        let data = registry.retrieve("get_loan_details", "Loan details").await.unwrap();
        assert_eq!(data["loan_id"], "LN-98765");
        assert_eq!(data["outstanding_balance"], 420000);
        assert_eq!(data["payment_history_summary"]["late_last_6"], 1);
    }
}
