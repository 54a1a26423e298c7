use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::non_blank;

/// Author shown when the operator leaves the field empty.
pub const DEFAULT_AUTHOR: &str = "إدارة المنصة";
/// Category assigned when the operator leaves the field empty.
pub const DEFAULT_CATEGORY: &str = "أخرى";
/// Amount used when a price was supplied but could not be read as a number.
pub const DEFAULT_AMOUNT: f64 = 5.0;
/// Cover used for every listing added through the admin form.
pub const PLACEHOLDER_COVER: &str =
    "https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c?auto=format&fit=crop&q=80&w=100&h=100";

const FREE_TAG: &str = "free";

/// Listing price. Stored as `"free"` or a positive JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Price {
    #[default]
    Free,
    Amount(f64),
}

impl Price {
    /// Build a paid price, rejecting zero, negative and non-finite amounts.
    pub fn amount(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Price::Amount(value))
    }

    pub fn is_free(&self) -> bool {
        matches!(self, Price::Free)
    }

    /// Badge text: `FREE` or `N$`.
    pub fn label(&self) -> String {
        match self {
            Price::Free => "FREE".to_string(),
            Price::Amount(value) => format!("{value}$"),
        }
    }

    /// Coerce admin form input into a price.
    ///
    /// Zero in any spelling means free, as the admin form's "0 = free" hint
    /// promises. Blank text is treated like an absent price, so it stays free
    /// instead of falling back to [`DEFAULT_AMOUNT`]. A positive number is
    /// taken as is; anything else (text, negatives) becomes the default amount.
    pub fn from_input(input: Option<&PriceInput>) -> Self {
        let value = match input {
            None => return Price::Free,
            Some(PriceInput::Number(value)) => Some(*value),
            Some(PriceInput::Text(text)) => {
                let text = text.trim();
                if text.is_empty() || text.eq_ignore_ascii_case(FREE_TAG) {
                    return Price::Free;
                }
                text.parse::<f64>().ok()
            }
        };

        match value {
            Some(value) if value == 0.0 => Price::Free,
            Some(value) => Price::amount(value).unwrap_or(Price::Amount(DEFAULT_AMOUNT)),
            None => Price::Amount(DEFAULT_AMOUNT),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Price::Free => serializer.serialize_str(FREE_TAG),
            Price::Amount(value) if value.fract() == 0.0 && *value <= u64::MAX as f64 => {
                serializer.serialize_u64(*value as u64)
            }
            Price::Amount(value) => serializer.serialize_f64(*value),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match PriceInput::deserialize(deserializer)? {
            PriceInput::Text(text) if text == FREE_TAG => Ok(Price::Free),
            PriceInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Price::amount)
                .ok_or_else(|| de::Error::custom(format!("invalid price '{text}'"))),
            PriceInput::Number(value) => Price::amount(value)
                .ok_or_else(|| de::Error::custom(format!("price must be positive, got {value}"))),
        }
    }
}

/// Raw price as it arrives from a form or a JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl From<&str> for PriceInput {
    fn from(text: &str) -> Self {
        PriceInput::Text(text.to_string())
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Unique identifier, assigned at creation
    pub id: String,
    pub title: String,
    pub author: String,
    pub price: Price,
    /// Free-form; grouped by exact equality
    pub category: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub description: String,
    /// Direct-access URL; only meaningful when payment is not required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub is_payment_required: bool,
}

/// Admin form submission for a new listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<PriceInput>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub is_payment_required: bool,
}

impl NewListing {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Turn the submission into a listing with `id`, applying defaults.
    /// Returns `None` when the title is blank.
    pub fn into_listing(&self, id: String) -> Option<Listing> {
        let title = non_blank(Some(self.title.as_str()))?;

        Some(Listing {
            id,
            title,
            author: non_blank(self.author.as_deref()).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            price: Price::from_input(self.price.as_ref()),
            category: non_blank(self.category.as_deref())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            cover_image: PLACEHOLDER_COVER.to_string(),
            description: String::new(),
            link: non_blank(self.link.as_deref()),
            is_payment_required: self.is_payment_required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_labels() {
        assert_eq!(Price::Free.label(), "FREE");
        assert_eq!(Price::Amount(5.0).label(), "5$");
        assert_eq!(Price::Amount(2.5).label(), "2.5$");
    }

    #[test]
    fn price_json_form() {
        assert_eq!(serde_json::to_value(Price::Free).unwrap(), json!("free"));
        assert_eq!(serde_json::to_value(Price::Amount(5.0)).unwrap(), json!(5));
        assert_eq!(serde_json::to_value(Price::Amount(7.5)).unwrap(), json!(7.5));

        assert_eq!(serde_json::from_value::<Price>(json!("free")).unwrap(), Price::Free);
        assert_eq!(serde_json::from_value::<Price>(json!(5)).unwrap(), Price::Amount(5.0));
        assert!(serde_json::from_value::<Price>(json!(-1)).is_err());
        assert!(serde_json::from_value::<Price>(json!("cheap")).is_err());
    }

    #[test]
    fn price_coercion_policy() {
        assert_eq!(Price::from_input(None), Price::Free);
        assert_eq!(Price::from_input(Some(&"".into())), Price::Free);
        assert_eq!(Price::from_input(Some(&"free".into())), Price::Free);
        assert_eq!(Price::from_input(Some(&"0".into())), Price::Free);
        assert_eq!(Price::from_input(Some(&PriceInput::Number(0.0))), Price::Free);
        assert_eq!(Price::from_input(Some(&"12".into())), Price::Amount(12.0));
        assert_eq!(Price::from_input(Some(&PriceInput::Number(3.0))), Price::Amount(3.0));
        assert_eq!(
            Price::from_input(Some(&"abc".into())),
            Price::Amount(DEFAULT_AMOUNT)
        );
        assert_eq!(
            Price::from_input(Some(&"-4".into())),
            Price::Amount(DEFAULT_AMOUNT)
        );
    }

    #[test]
    fn zero_and_blank_prices_stay_free() {
        for text in ["", "   ", "0", "0.0", " 0 ", "FREE", "Free"] {
            assert_eq!(Price::from_input(Some(&text.into())), Price::Free, "{text:?}");
        }
        assert_eq!(
            Price::from_input(Some(&"NaN".into())),
            Price::Amount(DEFAULT_AMOUNT)
        );
    }

    #[test]
    fn listing_uses_camel_case_and_omits_missing_link() {
        let listing = Listing {
            id: "3".to_string(),
            title: "لن تصبح افضل مني".to_string(),
            author: "تطوير ذاتي".to_string(),
            price: Price::Amount(5.0),
            category: "تطوير".to_string(),
            cover_image: PLACEHOLDER_COVER.to_string(),
            description: String::new(),
            link: None,
            is_payment_required: true,
        };

        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["isPaymentRequired"], json!(true));
        assert_eq!(value["coverImage"], json!(PLACEHOLDER_COVER));
        assert!(value.get("link").is_none());
    }

    #[test]
    fn missing_payment_flag_reads_as_false() {
        let listing: Listing = serde_json::from_value(json!({
            "id": "1",
            "title": "T",
            "author": "A",
            "price": "free",
            "category": "C",
            "coverImage": "",
            "description": "",
            "link": "https://files.fm/f/n7kxz7vf6n"
        }))
        .unwrap();
        assert!(!listing.is_payment_required);
        assert_eq!(listing.link.as_deref(), Some("https://files.fm/f/n7kxz7vf6n"));
    }

    #[test]
    fn new_listing_defaults() {
        let listing = NewListing::titled("T").into_listing("42".to_string()).unwrap();
        assert_eq!(listing.id, "42");
        assert_eq!(listing.title, "T");
        assert_eq!(listing.author, DEFAULT_AUTHOR);
        assert_eq!(listing.category, DEFAULT_CATEGORY);
        assert_eq!(listing.price, Price::Free);
        assert_eq!(listing.cover_image, PLACEHOLDER_COVER);
        assert!(listing.description.is_empty());
        assert!(listing.link.is_none());
    }

    #[test]
    fn blank_title_or_link_is_dropped() {
        assert!(NewListing::titled("").into_listing("1".to_string()).is_none());
        assert!(NewListing::titled("  ").into_listing("1".to_string()).is_none());

        let mut form = NewListing::titled("T");
        form.link = Some(String::new());
        assert!(form.into_listing("1".to_string()).unwrap().link.is_none());
    }
}
