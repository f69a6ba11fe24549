//! Built-in loan/EMI intent catalog
//!
//! Order matters for tie-breaking, so new intents go where they belong in
//! their group rather than at the end.

use super::registry::{ConfirmationRole, IntentDefinition};

fn intent(name: &str, handler: &str, examples: &[&str], keywords: &[&str]) -> IntentDefinition {
    IntentDefinition::new(name, handler)
        .with_examples(examples)
        .with_keywords(keywords)
}

/// The default catalog, in registration order
pub fn default_catalog() -> Vec<IntentDefinition> {
    let mut catalog = Vec::with_capacity(44);
    catalog.extend(payment_intents());
    catalog.extend(loan_intents());
    catalog.extend(profile_intents());
    catalog.extend(support_intents());
    catalog.extend(conversational_intents());
    catalog
}

fn payment_intents() -> Vec<IntentDefinition> {
    vec![
        intent(
            "make_payment_upi",
            "make_payment",
            &["Pay via UPI", "Use Google Pay", "Send payment through UPI"],
            &["upi", "google pay", "phonepe", "paytm", "payment"],
        ),
        intent(
            "make_payment_netbanking",
            "make_payment",
            &["Pay via net banking", "Use my bank portal to pay", "Transfer EMI online"],
            &["net banking", "bank transfer", "payment"],
        ),
        intent(
            "make_payment_card",
            "make_payment",
            &["Pay using debit card", "Pay via credit card", "Use card to pay EMI"],
            &["debit card", "credit card", "card payment"],
        ),
        intent(
            "make_payment_cash",
            "make_payment",
            &["Pay cash at branch", "I’ll pay in cash", "Offline payment for EMI"],
            &["cash", "branch", "offline payment"],
        ),
        intent(
            "schedule_payment",
            "payment_action",
            &["Set EMI for tomorrow", "Pay next week automatically", "Schedule EMI payment"],
            &["schedule", "remind", "auto pay"],
        ),
        intent(
            "not_willing_to_pay",
            "payment_action",
            &[
                "I can't pay today",
                "I don’t want to pay",
                "I will not pay this month",
                "I’ll skip this payment",
            ],
            &["not pay", "don’t want", "skip payment", "later"],
        )
        .with_confirmation(ConfirmationRole::Request),
        intent(
            "reminder_setup",
            "reminder_request",
            &["Remind me before EMI", "Set SMS reminder", "Notify me about payment"],
            &["remind", "notification", "alert"],
        ),
        intent(
            "make_payment_qr",
            "make_payment",
            &[
                "I want to make payment using QR code",
                "Provide QR code",
                "I will scan QR to complete payment",
                "I will se QR payment",
            ],
            &["qr", "scan", "payment"],
        ),
        intent(
            "schedule_auto_debit",
            "payment_action",
            &["Set up auto debit", "Automatically pay EMI every month", "Recurring payment setup"],
            &["auto debit", "recurring", "automatic"],
        ),
        intent(
            "payment_success",
            "payment_action",
            &["Payment completed", "EMI paid successfully", "Transaction successful"],
            &["success", "completed", "done"],
        ),
    ]
}

fn loan_intents() -> Vec<IntentDefinition> {
    vec![
        intent(
            "loan_balance",
            "get_loan_details",
            &["Tell me my loan status", "What is the outstanding balance?", "Loan details"],
            &["loan", "balance", "outstanding"],
        ),
        intent(
            "emi_breakdown",
            "get_emi_breakdown",
            &["Show EMI split", "Principal and interest", "EMI breakdown"],
            &["emi", "breakdown", "principal", "interest", "split"],
        ),
        intent(
            "request_extension",
            "get_due_date_extension_policy",
            &["Can I extend my due date?", "Delay my EMI", "Request extension"],
            &["extend", "delay", "extension"],
        ),
        intent(
            "request_partial_payment",
            "get_partial_payment_policy",
            &["Can I pay half EMI?", "Partial repayment", "Make partial payment"],
            &["partial", "half", "installment"],
        ),
        intent(
            "topup_loan_request",
            "get_topup_loan_info",
            &["Can I get a top-up loan?", "Increase my loan amount", "Eligibility for top-up"],
            &["topup", "extra loan", "increase loan"],
        ),
        intent(
            "prepayment_request",
            "get_prepayment_info",
            &["I want to prepay my loan", "Pay off early", "Prepayment rules"],
            &["prepay", "early closure", "penalty"],
        ),
        intent(
            "loan_status_alert",
            "reminder_request",
            &["Alert me if my EMI is due", "Notify about upcoming EMI"],
            &["alert", "notification", "emi due"],
        ),
        intent(
            "loan_interest_query",
            "fee_interest_info",
            &["What is my interest rate?", "Current rate for my loan", "Interest on my EMI"],
            &["interest", "rate", "loan"],
        ),
        intent(
            "loan_penalty_query",
            "fee_interest_info",
            &["How much is the late fee?", "Penalty for delayed EMI"],
            &["penalty", "late fee", "charges"],
        ),
    ]
}

fn profile_intents() -> Vec<IntentDefinition> {
    vec![
        intent(
            "view_profile",
            "get_profile_data",
            &["Show my profile", "Get my account details", "Check my registered info"],
            &["profile", "account", "details"],
        ),
        intent(
            "update_email",
            "update_profile",
            &["Change my email", "Update registered email"],
            &["email", "update", "change"],
        ),
        intent(
            "update_phone",
            "update_profile",
            &["Change my phone number", "Update registered mobile"],
            &["phone", "mobile", "update", "change"],
        ),
        intent(
            "update_address",
            "update_profile",
            &["Update my address", "Change my current address"],
            &["address", "update", "change"],
        ),
        intent(
            "link_bank_account",
            "get_account_linking_info",
            &["Add new bank account", "Link my account"],
            &["link", "bank", "account"],
        ),
        intent(
            "unlink_bank_account",
            "get_account_linking_info",
            &["Remove my bank account", "Unlink account"],
            &["unlink", "bank", "account"],
        ),
        intent(
            "security_password_reset",
            "security_query",
            &["Forgot password", "Reset password"],
            &["password", "reset", "forgot"],
        ),
        intent(
            "security_otp_issue",
            "security_query",
            &["OTP not received", "Issue with OTP"],
            &["otp", "issue", "code"],
        ),
        intent(
            "update_name",
            "update_profile",
            &["Change my registered name", "Update account name"],
            &["name", "update", "change"],
        ),
        intent(
            "update_kyc",
            "update_profile",
            &["Update my KYC details", "Change ID proof"],
            &["kyc", "id", "update"],
        ),
        intent(
            "update_password",
            "security_query",
            &["Change my password", "Update login password"],
            &["password", "change", "update"],
        ),
    ]
}

fn support_intents() -> Vec<IntentDefinition> {
    vec![
        intent(
            "talk_to_agent",
            "get_human_context",
            &["I want to talk to a human", "Connect me to support", "Speak to agent"],
            &["agent", "human", "representative", "support"],
        ),
        intent(
            "general_help_payment",
            "get_general_help",
            &["How to pay EMI?", "Guide me to pay EMI"],
            &["help", "guide", "payment"],
        ),
        intent(
            "general_help_account",
            "get_general_help",
            &["How to update my number?", "How to change address?"],
            &["help", "guide", "account"],
        ),
        intent(
            "faq_info",
            "faq_info_request",
            &["Show FAQ", "Support timings?", "Frequently asked questions"],
            &["faq", "questions", "support"],
        ),
        intent(
            "complaint_register",
            "get_human_context",
            &["I want to lodge a complaint", "File a complaint regarding EMI"],
            &["complaint", "issue", "problem"],
        ),
        intent(
            "feedback_submission",
            "get_human_context",
            &["Submit feedback", "Provide my feedback"],
            &["feedback", "review", "rate"],
        ),
        intent(
            "technical_support",
            "get_human_context",
            &["I am facing technical issues", "Support for app login", "App not working"],
            &["technical", "issue", "support", "app"],
        ),
    ]
}

fn conversational_intents() -> Vec<IntentDefinition> {
    vec![
        intent(
            "affirm",
            "handle_yes_or_no",
            &["yes", "yeah", "yep", "sure", "of course"],
            &["yes", "yeah", "yep", "sure"],
        )
        .with_confirmation(ConfirmationRole::Affirm),
        intent(
            "deny",
            "handle_yes_or_no",
            &["no", "nope", "not really", "nah"],
            &["no", "nope", "nah"],
        )
        .with_confirmation(ConfirmationRole::Deny),
        intent(
            "greeting",
            "get_other",
            &["hello", "hi", "good morning", "good evening"],
            &["hello", "hi", "hey", "greetings"],
        ),
        intent(
            "thanks",
            "get_other",
            &["thanks", "thank you", "thx", "much appreciated"],
            &["thanks", "thank", "thx"],
        ),
        intent(
            "small_talk",
            "get_other",
            &["How are you?", "What's up?", "Tell me a joke"],
            &["how", "joke", "weather", "chat"],
        ),
        intent(
            "human_context",
            "get_human_context",
            &["how are you", "what's up", "who made you", "hello", "good morning"],
            &["hi", "hello", "hey", "good morning", "good evening"],
        ),
        intent(
            "other",
            "get_other",
            &["hello", "thanks", "what's the weather", "random chit-chat"],
            &[],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_shape() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 44);
        assert_eq!(catalog[0].name, "make_payment_upi");
        assert_eq!(catalog.last().map(|d| d.name.as_str()), Some("other"));

        let names: HashSet<_> = catalog.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn test_handlers_exist_in_default_tools() {
        let known = emi_assist_tools::handler_names();
        for def in default_catalog() {
            assert!(known.contains(&def.handler.as_str()), "{} -> {}", def.name, def.handler);
        }
    }

    #[test]
    fn test_confirmation_roles() {
        let catalog = default_catalog();
        let role = |name: &str| catalog.iter().find(|d| d.name == name).map(|d| d.confirmation);
        assert_eq!(role("not_willing_to_pay"), Some(ConfirmationRole::Request));
        assert_eq!(role("affirm"), Some(ConfirmationRole::Affirm));
        assert_eq!(role("deny"), Some(ConfirmationRole::Deny));
        assert_eq!(role("loan_balance"), Some(ConfirmationRole::None));
    }
}
