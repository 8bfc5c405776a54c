//! Product Catalog
//!
//! Read-only price lookup used to compute an order total. The catalog is
//! a collaborator of the store pages, not of the confirmation core; the
//! demo charge itself is fixed by [`ChargeSettings`](crate::ChargeSettings).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stripe::{Client, Expandable, ListProducts, Product};

use crate::error::{PaymentError, Result};

/// A sellable product with its current unit price
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,

    /// Unit price in minor currency units
    pub unit_amount: i64,

    /// Lowercase ISO currency code
    pub currency: String,
}

/// One line of an order
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
}

/// Product catalog provider
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// List sellable products with current prices
    async fn list_products(&self) -> Result<Vec<CatalogProduct>>;

    /// Total an order against current prices.
    ///
    /// Unknown product ids are an error, not a zero-priced line.
    async fn order_total(&self, items: &[OrderItem]) -> Result<i64> {
        let products = self.list_products().await?;

        let mut total = 0i64;
        for item in items {
            let product = products
                .iter()
                .find(|p| p.id == item.product_id)
                .ok_or_else(|| PaymentError::UnknownProduct(item.product_id.clone()))?;
            total += product.unit_amount * i64::from(item.quantity);
        }

        Ok(total)
    }
}

/// Stripe-backed catalog (products with their default price expanded)
pub struct StripeCatalog {
    client: Client,
}

impl StripeCatalog {
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }
}

#[async_trait]
impl ProductCatalog for StripeCatalog {
    async fn list_products(&self) -> Result<Vec<CatalogProduct>> {
        let mut params = ListProducts::new();
        params.active = Some(true);
        params.expand = &["data.default_price"];

        let products = Product::list(&self.client, &params)
            .await
            .map_err(|e| PaymentError::Processor(e.to_string()))?;

        let catalog = products
            .data
            .into_iter()
            .filter_map(|product| {
                // Products without an expanded default price are not
                // sellable through this store.
                let price = match product.default_price {
                    Some(Expandable::Object(price)) => price,
                    _ => return None,
                };

                Some(CatalogProduct {
                    id: product.id.to_string(),
                    name: product.name.unwrap_or_default(),
                    unit_amount: price.unit_amount.unwrap_or(0),
                    currency: price
                        .currency
                        .map(|c| c.to_string())
                        .unwrap_or_default(),
                })
            })
            .collect();

        Ok(catalog)
    }
}

/// Static catalog for the keyless demo mode and tests
pub struct DemoCatalog {
    currency: String,
}

impl DemoCatalog {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }
}

#[async_trait]
impl ProductCatalog for DemoCatalog {
    async fn list_products(&self) -> Result<Vec<CatalogProduct>> {
        let table = [
            ("increment", "Increment Magazine", 399),
            ("shirt", "Checkout Shirt", 585),
            ("pins", "Collector Pins", 799),
        ];

        Ok(table
            .iter()
            .map(|(id, name, unit_amount)| CatalogProduct {
                id: (*id).to_string(),
                name: (*name).to_string(),
                unit_amount: *unit_amount,
                currency: self.currency.clone(),
            })
            .collect())
    }
}
