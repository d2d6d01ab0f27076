//! Fixture data loading
//!
//! Static test input lives in a JSON file: the product catalogue the shop is
//! expected to list, customer records for checkout forms, the sort option
//! labels, and the literal error strings the negative-path scenarios match
//! against. Parsed once and held for the provider's lifetime.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Catalogue entry as the fixture describes it. Prices stay display strings
/// ("$29.99"); numeric comparison happens at the call site.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: String,
    pub description: String,
}

/// Checkout form input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub postal_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureFile {
    products: Vec<Product>,
    customers: Vec<CustomerInfo>,
    sort_options: Vec<String>,
    error_messages: HashMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("no product named {0:?} in fixture data")]
    UnknownProduct(String),
    #[error("no error message for key {0:?} in fixture data")]
    UnknownErrorKey(String),
    #[error("fixture data contains no customer records")]
    NoCustomers,
}

/// Load-once fixture data provider.
pub struct TestData {
    fixtures: FixtureFile,
    rng: Mutex<StdRng>,
}

impl TestData {
    /// Parse the fixture file. A seed makes `random_customer` reproducible
    /// across runs; without one each run picks differently.
    pub fn load(path: &Path, seed: Option<u64>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture file: {}", path.display()))?;
        Self::from_str(&raw, seed)
            .with_context(|| format!("Malformed fixture file: {}", path.display()))
    }

    fn from_str(raw: &str, seed: Option<u64>) -> Result<Self> {
        let fixtures: FixtureFile = serde_json::from_str(raw)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            fixtures,
            rng: Mutex::new(rng),
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.fixtures.products
    }

    pub fn product(&self, name: &str) -> Result<&Product, DataError> {
        self.fixtures
            .products
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| DataError::UnknownProduct(name.to_string()))
    }

    pub fn customers(&self) -> &[CustomerInfo] {
        &self.fixtures.customers
    }

    /// Uniform random pick from the customer records.
    pub fn random_customer(&self) -> Result<CustomerInfo, DataError> {
        let customers = &self.fixtures.customers;
        if customers.is_empty() {
            return Err(DataError::NoCustomers);
        }
        let index = self
            .rng
            .lock()
            .expect("fixture rng lock poisoned")
            .gen_range(0..customers.len());
        Ok(customers[index].clone())
    }

    pub fn sort_options(&self) -> &[String] {
        &self.fixtures.sort_options
    }

    /// Literal display string the application shows for a named error case.
    pub fn error_message(&self, key: &str) -> Result<&str, DataError> {
        self.fixtures
            .error_messages
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| DataError::UnknownErrorKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "products": [
            {"name": "Backpack", "price": "$29.99", "description": "A backpack"},
            {"name": "Bike Light", "price": "$9.99", "description": "A light"}
        ],
        "customers": [
            {"firstName": "Ada", "lastName": "Lovelace", "postalCode": "10115"},
            {"firstName": "Grace", "lastName": "Hopper", "postalCode": "02139"}
        ],
        "sortOptions": ["Name (A to Z)", "Name (Z to A)"],
        "errorMessages": {
            "usernameRequired": "Epic sadface: Username is required"
        }
    }"#;

    #[test]
    fn parses_fixture_sections() {
        let data = TestData::from_str(SAMPLE, None).expect("sample fixture parses");
        assert_eq!(data.products().len(), 2);
        assert_eq!(data.customers().len(), 2);
        assert_eq!(data.sort_options().len(), 2);
        assert_eq!(data.product("Backpack").unwrap().price, "$29.99");
    }

    #[test]
    fn unknown_product_is_an_error() {
        let data = TestData::from_str(SAMPLE, None).expect("sample fixture parses");
        let err = data.product("Flux Capacitor").unwrap_err();
        assert!(err.to_string().contains("Flux Capacitor"));
    }

    #[test]
    fn error_message_lookup() {
        let data = TestData::from_str(SAMPLE, None).expect("sample fixture parses");
        assert_eq!(
            data.error_message("usernameRequired").unwrap(),
            "Epic sadface: Username is required"
        );
        assert!(data.error_message("noSuchKey").is_err());
    }

    #[test]
    fn seeded_random_customer_is_reproducible() {
        let a = TestData::from_str(SAMPLE, Some(7)).unwrap();
        let b = TestData::from_str(SAMPLE, Some(7)).unwrap();
        for _ in 0..10 {
            assert_eq!(a.random_customer().unwrap(), b.random_customer().unwrap());
        }
    }

    #[test]
    fn shipped_fixture_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/testdata.json");
        let data = TestData::load(&path, Some(1)).expect("shipped testdata.json parses");
        assert!(data.products().len() >= 3);
        assert!(!data.customers().is_empty());
        assert_eq!(data.sort_options().len(), 4);
        assert!(data.error_message("usernameRequired").is_ok());
        assert!(data.error_message("postalCodeRequired").is_ok());
    }

    #[test]
    fn random_customer_requires_records() {
        let empty = SAMPLE.replace(
            r#"{"firstName": "Ada", "lastName": "Lovelace", "postalCode": "10115"},
            {"firstName": "Grace", "lastName": "Hopper", "postalCode": "02139"}"#,
            "",
        );
        let data = TestData::from_str(&empty, None).expect("fixture without customers parses");
        assert!(matches!(data.random_customer(), Err(DataError::NoCustomers)));
    }
}
