//! Shared fixtures for the Souq integration tests.
//!
//! The suites under `tests/` drive the engine through its public facade
//! only, the way an HTTP layer would. These helpers keep the seed data
//! consistent across files: one contact number, one image URL, prices in
//! whole dinars.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use rust_decimal::Decimal;
use souq_core::Category;
use souq_engine::Engine;
use souq_engine::config::EngineConfig;
use souq_engine::products::ProductDraft;
use souq_engine::shops::CreateShop;
use souq_engine::store::MemoryStore;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Route the engine's logs to the current test's captured output.
///
/// Hold the returned guard for the duration of the test; the subscriber
/// is installed for this thread only, so parallel tests do not mix.
#[must_use]
pub fn init_tracing() -> DefaultGuard {
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new("debug"))
        .with(fmt::layer().with_test_writer());
    tracing::subscriber::set_default(subscriber)
}

/// An engine with default configuration over a fresh in-memory store.
#[must_use]
pub fn engine() -> Engine<MemoryStore> {
    Engine::with_defaults(Arc::new(MemoryStore::new()))
}

/// An engine with explicit configuration over a fresh in-memory store.
#[must_use]
pub fn engine_with(config: EngineConfig) -> Engine<MemoryStore> {
    Engine::new(Arc::new(MemoryStore::new()), config)
}

/// A valid shop draft with a Libyan mobile contact.
#[must_use]
pub fn shop_draft(name: &str) -> CreateShop {
    CreateShop {
        name: name.to_owned(),
        description: format!("Goods from {name}"),
        contact: "0912345678".to_owned(),
        ..CreateShop::default()
    }
}

/// A valid product draft priced in whole dinars.
#[must_use]
pub fn product_draft(name: &str, price: u32, category: Category) -> ProductDraft {
    ProductDraft {
        name: name.to_owned(),
        description: format!("{name}, ships from Tripoli"),
        price: Decimal::from(price),
        category,
        image_url: "https://cdn.example/product.jpg".to_owned(),
    }
}
