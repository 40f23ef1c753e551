//! # Product Commands
//!
//! Commands for the product grid and the inventory screen.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Search Flow                                  │
//! │                                                                         │
//! │  Cashier types "4567890123456" or scans it                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  {"command":"search_products","query":"4567890123456"}                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  Is query a barcode? (8-13 digits)        │                         │
//! │  │  YES: exact barcode match wins            │──► Found? Return [1]    │
//! │  │  NO:  name / description / barcode filter │                         │
//! │  └───────────────────────────────────────────┘                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Category tab filter ("All" = everything)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Return Vec<ProductDto> to front-end                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};

use till_core::{NewProduct, Product, StockStatus};

use crate::error::ApiError;
use crate::state::{RegisterConfig, StoreState};

/// Product DTO for the front-end, with the inventory badge resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub category: String,
    pub stock: i64,
    pub tax_rate_bps: u32,
    pub description: String,
    pub image_url: String,
    pub barcode: String,
    /// Grid tiles are disabled when false.
    pub in_stock: bool,
    pub stock_status: StockStatus,
}

impl ProductDto {
    pub fn new(p: Product, low_stock_threshold: i64) -> Self {
        ProductDto {
            in_stock: p.is_in_stock(),
            stock_status: p.stock_status(low_stock_threshold),
            id: p.id,
            name: p.name,
            price_cents: p.price_cents,
            category: p.category,
            stock: p.stock,
            tax_rate_bps: p.tax_rate_bps,
            description: p.description,
            image_url: p.image_url,
            barcode: p.barcode,
        }
    }
}

fn to_dtos(products: Vec<Product>, config: &RegisterConfig) -> Vec<ProductDto> {
    products
        .into_iter()
        .map(|p| ProductDto::new(p, config.low_stock_threshold()))
        .collect()
}

/// Inventory screen payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryOverview {
    pub products: Vec<ProductDto>,
    /// Every product below the threshold, regardless of the filter.
    pub low_stock: Vec<ProductDto>,
    pub low_stock_threshold: i64,
}

/// Checks if a query looks like a scanned barcode (8-13 numeric digits).
fn is_barcode_query(query: &str) -> bool {
    let len = query.len();
    (8..=13).contains(&len) && query.chars().all(|c| c.is_ascii_digit())
}

/// Filters the product grid.
///
/// ## Arguments
/// * `query` - Name or description (case-insensitive), or barcode digits
/// * `category` - Category tab; `None` or `"All"` for every category
pub async fn search_products(
    store: &StoreState,
    config: &RegisterConfig,
    query: &str,
    category: Option<&str>,
) -> Result<Vec<ProductDto>, ApiError> {
    debug!(query = %query, category = ?category, "search_products command");

    let query = query.trim();
    let products = store.inner().products().search(query, category).await?;

    if is_barcode_query(query) {
        debug!(barcode = %query, "Detected barcode pattern, trying exact match");
        if let Some(exact) = products.iter().find(|p| p.barcode == query) {
            info!(barcode = %query, product = %exact.name, "Barcode scan matched");
            return Ok(vec![ProductDto::new(exact.clone(), config.low_stock_threshold())]);
        }
    }

    Ok(to_dtos(products, config))
}

/// Category tabs: `"All"` first, then categories in catalog order.
pub async fn list_categories(store: &StoreState) -> Vec<String> {
    debug!("list_categories command");
    store.inner().products().categories().await
}

/// Adds a product from the inventory form. An empty barcode gets a
/// generated one.
pub async fn add_product(
    store: &StoreState,
    config: &RegisterConfig,
    product: NewProduct,
) -> Result<ProductDto, ApiError> {
    debug!(name = %product.name, "add_product command");

    let added = store.inner().products().add(product).await?;
    Ok(ProductDto::new(added, config.low_stock_threshold()))
}

/// Saves an edited product. Lines already in the cart keep their snapshot
/// until the cart next touches them.
pub async fn update_product(
    store: &StoreState,
    config: &RegisterConfig,
    product: Product,
) -> Result<ProductDto, ApiError> {
    debug!(id = %product.id, "update_product command");

    let updated = store.inner().products().update(product).await?;
    info!(id = %updated.id, stock = updated.stock, "Product updated");
    Ok(ProductDto::new(updated, config.low_stock_threshold()))
}

/// Inventory table rows (filtered by name, category or barcode) plus the
/// low-stock alert list.
pub async fn inventory_overview(
    store: &StoreState,
    config: &RegisterConfig,
    query: &str,
) -> Result<InventoryOverview, ApiError> {
    debug!(query = %query, "inventory_overview command");

    let repo = store.inner().products();
    let threshold = config.low_stock_threshold();

    let products = repo.inventory_search(query).await?;
    let low_stock = repo.low_stock(threshold).await;

    Ok(InventoryOverview {
        products: to_dtos(products, config),
        low_stock: to_dtos(low_stock, config),
        low_stock_threshold: threshold,
    })
}
