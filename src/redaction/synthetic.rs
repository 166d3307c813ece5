//! Synthetic data generation
//!
//! Produces plausible fake values shaped like the entity they replace, so a
//! redacted document still reads naturally.

use crate::redaction::models::EntityCategory;
use anyhow::{anyhow, Result};
use fake::faker::address::en::{BuildingNumber, CityName, StreetName};
use fake::faker::chrono::en::Date;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Trait for synthetic value generators
pub trait SyntheticGenerator: Send + Sync {
    /// Generate a fake value for `category`
    fn generate(&self, category: EntityCategory) -> Result<String>;

    /// Short name used in logs and error messages
    fn name(&self) -> &'static str;
}

/// Generator backed by the `fake` crate
pub struct FakeGenerator {
    rng: Mutex<StdRng>,
}

impl FakeGenerator {
    /// Create a generator seeded from system entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a deterministic generator
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn value_for(category: EntityCategory, rng: &mut StdRng) -> String {
        match category {
            EntityCategory::Person => Name().fake_with_rng(rng),
            EntityCategory::Org => CompanyName().fake_with_rng(rng),
            EntityCategory::Gpe => CityName().fake_with_rng(rng),
            EntityCategory::Loc => {
                let number: String = BuildingNumber().fake_with_rng(rng);
                let street: String = StreetName().fake_with_rng(rng);
                format!("{number} {street}")
            }
            EntityCategory::Date => {
                let date: chrono::NaiveDate = Date().fake_with_rng(rng);
                date.format("%Y-%m-%d").to_string()
            }
            EntityCategory::Money => {
                let dollars: u32 = rng.gen_range(1..10_000);
                let cents: u32 = rng.gen_range(0..100);
                format!("${dollars}.{cents:02}")
            }
            EntityCategory::Cardinal => rng.gen_range(1..1_000_000u32).to_string(),
            EntityCategory::Id => {
                let letters: String = (0..3)
                    .map(|_| rng.gen_range(b'A'..=b'Z') as char)
                    .collect();
                let digits: String = (0..6)
                    .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
                    .collect();
                format!("{letters}{digits}")
            }
            EntityCategory::Email => SafeEmail().fake_with_rng(rng),
            EntityCategory::Phone => PhoneNumber().fake_with_rng(rng),
        }
    }
}

impl Default for FakeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticGenerator for FakeGenerator {
    fn generate(&self, category: EntityCategory) -> Result<String> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow!("synthetic generator state is poisoned"))?;
        Ok(Self::value_for(category, &mut rng))
    }

    fn name(&self) -> &'static str {
        "fake_generator"
    }
}
