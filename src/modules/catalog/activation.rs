use qwat_kernel::settings::PaymentSettings;
use serde::Serialize;

use super::models::Listing;

/// Outcome of a shopper activating a listing.
#[derive(Debug, Clone, PartialEq)]
pub enum Activation<'a> {
    /// Paid listing: show how to pay for it.
    ShowPaymentInstructions(&'a Listing),
    /// Free listing with a link: open it.
    Navigate(&'a str),
    /// Free listing without a link.
    Nothing,
}

pub fn activate(listing: &Listing) -> Activation<'_> {
    if listing.is_payment_required {
        return Activation::ShowPaymentInstructions(listing);
    }

    match listing.link.as_deref().map(str::trim) {
        Some(link) if !link.is_empty() => Activation::Navigate(link),
        _ => Activation::Nothing,
    }
}

/// Static "how to buy" content for paid listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentInstructions {
    pub contact_url: String,
    pub card_number: String,
    pub wallet_number: String,
    pub steps: Vec<String>,
}

impl PaymentInstructions {
    pub fn from_settings(settings: &PaymentSettings) -> Self {
        let handle = settings
            .contact_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();

        Self {
            contact_url: settings.contact_url.clone(),
            card_number: settings.card_number.clone(),
            wallet_number: settings.wallet_number.clone(),
            steps: vec![
                "قم بتحويل المبلغ المذكور أعلاه".to_string(),
                format!("أرسل لقطة شاشة للحساب الرسمي {handle}"),
                "سيتم إرسال الرابط لك فوراً".to_string(),
            ],
        }
    }
}
