//! WhatsApp order hand-off.
//!
//! There is no checkout: a buyer's "order" is a prefilled WhatsApp chat
//! with the shop. Messages are plain text in the buyer's locale; links are
//! `https://wa.me/<number>?text=<message>` and depend only on their
//! inputs, so the storefront can render them statically.

use souq_core::{Locale, PhoneNumber};
use url::Url;

use crate::models::{Product, Shop};

/// The prefilled order text for one product.
#[must_use]
pub fn order_message(shop: &Shop, product: &Product, locale: Locale) -> String {
    let price = product.price.display();
    match locale {
        Locale::Ar => format!(
            "مرحباً {}، أود طلب المنتج التالي:\n\n📦 {}\n💰 السعر: {}\n\nشكراً لكم",
            shop.name, product.name, price
        ),
        Locale::En => format!(
            "Hello {}, I would like to order the following product:\n\n📦 {}\n💰 Price: {}\n\nThank you",
            shop.name, product.name, price
        ),
    }
}

/// The prefilled text for a general inquiry, used by the shop page's
/// contact button.
#[must_use]
pub fn inquiry_message(shop: &Shop, locale: Locale) -> String {
    match locale {
        Locale::Ar => format!("مرحباً {}، أود الاستفسار عن منتجاتكم", shop.name),
        Locale::En => format!(
            "Hello {}, I would like to ask about your products",
            shop.name
        ),
    }
}

/// Deep link opening a WhatsApp chat with the shop, prefilled with the
/// order message for `product`.
#[must_use]
pub fn order_link(shop: &Shop, product: &Product, locale: Locale) -> Url {
    chat_link(&shop.contact, &order_message(shop, product, locale))
}

/// Deep link opening a WhatsApp chat with the shop, prefilled with a
/// general inquiry.
#[must_use]
pub fn inquiry_link(shop: &Shop, locale: Locale) -> Url {
    chat_link(&shop.contact, &inquiry_message(shop, locale))
}

fn chat_link(contact: &PhoneNumber, message: &str) -> Url {
    let base = format!("https://wa.me/{}", contact.as_str());
    // The path is the canonical digit string, so this cannot fail.
    let mut url = Url::parse(&base).expect("valid wa.me URL");
    url.query_pairs_mut().append_pair("text", message);
    url
}
