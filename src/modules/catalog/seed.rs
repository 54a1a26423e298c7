//! Listings used when nothing has been persisted yet.

use once_cell::sync::Lazy;

use super::models::{Listing, Price};

static SEED: Lazy<Vec<Listing>> = Lazy::new(|| {
    vec![
        Listing {
            id: "1".to_string(),
            title: "دليل تخطيط المشاريع للمرافق الصحيه".to_string(),
            author: "إدارة وتخطيط".to_string(),
            price: Price::Free,
            category: "إدارة".to_string(),
            cover_image: "https://images.unsplash.com/photo-1586771107445-d3ca888129ff?auto=format&fit=crop&q=80&w=100&h=100".to_string(),
            description: "دليل شامل لتخطيط وإدارة المشاريع الصحية الحديثة.".to_string(),
            link: Some("https://files.fm/f/n7kxz7vf6n".to_string()),
            is_payment_required: false,
        },
        Listing {
            id: "2".to_string(),
            title: "كتاب التسويق للمرافق الصحيه".to_string(),
            author: "تسويق طبي".to_string(),
            price: Price::Free,
            category: "تسويق".to_string(),
            cover_image: "https://images.unsplash.com/photo-1460925895917-afdab827c52f?auto=format&fit=crop&q=80&w=100&h=100".to_string(),
            description: "استراتيجيات التسويق الحديثة المخصصة للعيادات والمراكز الطبية.".to_string(),
            link: Some("https://files.fm/f/h63rceqxfg".to_string()),
            is_payment_required: false,
        },
        Listing {
            id: "3".to_string(),
            title: "لن تصبح افضل مني".to_string(),
            author: "تطوير ذاتي".to_string(),
            price: Price::Amount(5.0),
            category: "تطوير".to_string(),
            cover_image: "https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c?auto=format&fit=crop&q=80&w=100&h=100".to_string(),
            description: "كتاب ملهم في تطوير الذات وبناء العقلية القيادية.".to_string(),
            link: None,
            is_payment_required: true,
        },
    ]
});

/// A fresh copy of the seed collection.
pub fn seed_listings() -> Vec<Listing> {
    SEED.clone()
}
