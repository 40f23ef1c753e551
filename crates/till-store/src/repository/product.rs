//! # Product Repository
//!
//! Catalog operations.
//!
//! ## Key Operations
//! - Grid search (name, description, barcode + category tab)
//! - Inventory search (name, category, barcode)
//! - Add / update from the inventory form
//! - Low-stock report
//!
//! ## Grid Filter
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How the Product Grid Filters                         │
//! │                                                                         │
//! │  Cashier types: "tea"          Category tab: "Beverages"               │
//! │       │                              │                                  │
//! │       ▼                              ▼                                  │
//! │  name or description contains      category == "Beverages"             │
//! │  "tea" (case-insensitive),         ("All" matches everything)          │
//! │  or barcode contains "tea"                                             │
//! │       │                              │                                  │
//! │       └──────────────┬───────────────┘                                  │
//! │                      ▼                                                  │
//! │            both must hold → Organic Green Tea                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};
use uuid::Uuid;

use till_core::receipt::generate_barcode;
use till_core::validation::{
    validate_barcode, validate_category, validate_new_product, validate_price_cents,
    validate_product_name, validate_search_query, validate_stock, validate_tax_rate_bps,
};
use till_core::{NewProduct, Product, ALL_CATEGORIES};

use super::SharedTables;
use crate::error::{StoreError, StoreResult};

/// Repository for catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = store.products();
///
/// // Grid search
/// let results = repo.search("coffee", Some("Beverages")).await?;
///
/// // Get by ID
/// let product = repo.get_by_id("1").await;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    tables: SharedTables,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub(crate) fn new(tables: SharedTables) -> Self {
        ProductRepository { tables }
    }

    /// Lists the whole catalog in insertion order.
    pub async fn list(&self) -> Vec<Product> {
        self.tables.lock().await.products.clone()
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Some(Product)` - Product found
    /// * `None` - Product not found
    pub async fn get_by_id(&self, id: &str) -> Option<Product> {
        self.tables
            .lock()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Adds a product from the inventory form.
    ///
    /// ## What This Does
    /// 1. Validates every field
    /// 2. Generates a barcode when none was entered
    /// 3. Rejects a barcode already on another product
    /// 4. Assigns a fresh UUID
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored product
    /// * `Err(StoreError::Duplicate)` - Barcode already exists
    pub async fn add(&self, new_product: NewProduct) -> StoreResult<Product> {
        validate_new_product(&new_product)?;

        let mut new_product = new_product;
        if new_product.barcode.is_empty() {
            new_product.barcode = generate_barcode();
        }

        let mut tables = self.tables.lock().await;

        if tables.products.iter().any(|p| p.barcode == new_product.barcode) {
            return Err(StoreError::duplicate("barcode", new_product.barcode));
        }

        let product = new_product.into_product(Uuid::new_v4().to_string());
        tables.products.push(product.clone());

        info!(id = %product.id, name = %product.name, "Product added");
        Ok(product)
    }

    /// Replaces a product's fields in place.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored product
    /// * `Err(StoreError::NotFound)` - No product with that id
    /// * `Err(StoreError::Duplicate)` - Barcode belongs to another product
    pub async fn update(&self, product: Product) -> StoreResult<Product> {
        debug!(id = %product.id, "Updating product");

        validate_product(&product)?;

        let mut tables = self.tables.lock().await;

        if !product.barcode.is_empty()
            && tables
                .products
                .iter()
                .any(|p| p.id != product.id && p.barcode == product.barcode)
        {
            return Err(StoreError::duplicate("barcode", product.barcode));
        }

        let slot = tables
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| StoreError::not_found("Product", &product.id))?;

        *slot = product.clone();
        Ok(product)
    }

    /// Filters the product grid.
    ///
    /// ## Arguments
    /// * `query` - Matches name or description (case-insensitive) or a
    ///   barcode substring. Empty matches everything.
    /// * `category` - Exact category, or `None` / `"All"` for every category
    pub async fn search(&self, query: &str, category: Option<&str>) -> StoreResult<Vec<Product>> {
        let query = validate_search_query(query)?;
        let needle = query.to_lowercase();

        debug!(query = %query, category = ?category, "Searching products");

        let tables = self.tables.lock().await;
        let products: Vec<Product> = tables
            .products
            .iter()
            .filter(|p| match category {
                None => true,
                Some(c) if c == ALL_CATEGORIES => true,
                Some(c) => p.category == c,
            })
            .filter(|p| {
                query.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.barcode.contains(query.as_str())
            })
            .cloned()
            .collect();

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Filters the inventory table: name or category (case-insensitive) or a
    /// barcode substring.
    pub async fn inventory_search(&self, query: &str) -> StoreResult<Vec<Product>> {
        let query = validate_search_query(query)?;
        let needle = query.to_lowercase();

        let tables = self.tables.lock().await;
        Ok(tables
            .products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
                    || p.barcode.contains(query.as_str())
            })
            .cloned()
            .collect())
    }

    /// Products whose stock is below `threshold` (out-of-stock included).
    pub async fn low_stock(&self, threshold: i64) -> Vec<Product> {
        self.tables
            .lock()
            .await
            .products
            .iter()
            .filter(|p| p.is_low_stock(threshold))
            .cloned()
            .collect()
    }

    /// Category tabs: `"All"` followed by each distinct category in the order
    /// it first appears in the catalog.
    pub async fn categories(&self) -> Vec<String> {
        let tables = self.tables.lock().await;

        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for product in &tables.products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }
}

fn validate_product(product: &Product) -> StoreResult<()> {
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    validate_price_cents(product.price_cents)?;
    validate_stock(product.stock)?;
    validate_tax_rate_bps(product.tax_rate_bps)?;
    validate_barcode(&product.barcode)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::StoreError;
    use crate::seed::{demo_customers, demo_products};
    use crate::Store;
    use till_core::{CoreError, NewProduct};

    fn store() -> Store {
        Store::with_data(demo_products(), demo_customers())
    }

    fn muffin() -> NewProduct {
        NewProduct {
            name: "Blueberry Muffin".to_string(),
            price_cents: 375,
            category: "Bakery".to_string(),
            stock: 12,
            tax_rate_bps: 800,
            description: "Fresh baked".to_string(),
            image_url: String::new(),
            barcode: String::new(),
        }
    }

    fn names(products: &[till_core::Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_search_by_name_is_case_insensitive() {
        let found = store().products().search("GREEN TEA", None).await.unwrap();
        assert_eq!(names(&found), vec!["Organic Green Tea"]);
    }

    #[tokio::test]
    async fn test_search_matches_description_and_barcode() {
        let repo = store().products();

        let by_description = repo.search("sourdough", None).await.unwrap();
        assert_eq!(names(&by_description), vec!["Gourmet Sandwich"]);

        let by_barcode = repo.search("4567890123456", None).await.unwrap();
        assert_eq!(names(&by_barcode), vec!["Fresh Croissant"]);
    }

    #[tokio::test]
    async fn test_search_with_category() {
        let repo = store().products();

        let bakery = repo.search("", Some("Bakery")).await.unwrap();
        assert_eq!(names(&bakery), vec!["Fresh Croissant", "Pastry Assortment"]);

        let all = repo.search("", Some("All")).await.unwrap();
        assert_eq!(all.len(), 8);

        let none = repo.search("coffee", Some("Food")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_inventory_search_matches_category() {
        let found = store().products().inventory_search("snack").await.unwrap();
        assert_eq!(names(&found), vec!["Artisan Chocolate Bar"]);
    }

    #[tokio::test]
    async fn test_categories_first_seen_order() {
        let categories = store().products().categories().await;
        assert_eq!(categories, vec!["All", "Beverages", "Snacks", "Bakery", "Food"]);
    }

    #[tokio::test]
    async fn test_low_stock() {
        let repo = store().products();
        assert!(repo.low_stock(10).await.is_empty());
        assert_eq!(names(&repo.low_stock(20).await), vec!["Gourmet Sandwich", "Pastry Assortment"]);
    }

    #[tokio::test]
    async fn test_add_assigns_id_and_barcode() {
        let repo = store().products();

        let added = repo.add(muffin()).await.unwrap();

        assert!(!added.id.is_empty());
        assert_eq!(added.barcode.len(), 13);
        assert_eq!(repo.get_by_id(&added.id).await, Some(added));
        assert_eq!(repo.list().await.len(), 9);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_and_duplicate() {
        let repo = store().products();

        let mut invalid = muffin();
        invalid.price_cents = -1;
        assert!(matches!(
            repo.add(invalid).await,
            Err(StoreError::Core(CoreError::Validation(_)))
        ));

        let mut overpriced = muffin();
        overpriced.price_cents = 1_000_000_000_000_000;
        assert!(matches!(
            repo.add(overpriced).await,
            Err(StoreError::Core(CoreError::Validation(_)))
        ));

        let mut duplicate = muffin();
        duplicate.barcode = "1234567890123".to_string();
        assert!(matches!(
            repo.add(duplicate).await,
            Err(StoreError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let repo = store().products();

        let mut tea = repo.get_by_id("2").await.unwrap();
        tea.price_cents = 1999;
        tea.stock = 5;
        repo.update(tea).await.unwrap();

        let stored = repo.get_by_id("2").await.unwrap();
        assert_eq!(stored.price_cents, 1999);
        assert_eq!(stored.stock, 5);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let repo = store().products();

        let mut ghost = repo.get_by_id("2").await.unwrap();
        ghost.id = "missing".to_string();
        ghost.barcode = String::new();

        assert!(matches!(
            repo.update(ghost).await,
            Err(StoreError::NotFound { .. })
        ));
    }
}
