//! # Demo Seed Data
//!
//! The stock catalog and customer list a fresh register starts with when
//! `seed_demo_data` is on.
//!
//! ## Catalog
//! ```text
//! id  name                    price   category   stock
//! 1   Premium Coffee Beans    24.99   Beverages  45
//! 2   Organic Green Tea       18.50   Beverages  32
//! 3   Artisan Chocolate Bar    8.99   Snacks     67
//! 4   Fresh Croissant          3.25   Bakery     28
//! 5   Gourmet Sandwich        12.75   Food       19
//! 6   Fresh Fruit Smoothie     7.50   Beverages  41
//! 7   Organic Salad Bowl      14.25   Food       23
//! 8   Pastry Assortment       16.99   Bakery     15
//! ```
//! Every product is taxed at 8%.

use chrono::{DateTime, Duration, Utc};
use till_core::receipt::receipt_id_from_parts;
use till_core::totals::{apply_discount, compute_totals};
use till_core::{CartLine, Customer, DiscountRate, Money, PaymentMethod, Product, Transaction};

const DEMO_TAX_BPS: u32 = 800;

/// (id, name, price_cents, category, stock, description, barcode, image)
type ProductRow = (
    &'static str,
    &'static str,
    i64,
    &'static str,
    i64,
    &'static str,
    &'static str,
    &'static str,
);

const PRODUCTS: &[ProductRow] = &[
    (
        "1",
        "Premium Coffee Beans",
        2499,
        "Beverages",
        45,
        "Artisan roasted coffee beans",
        "1234567890123",
        "https://images.pexels.com/photos/894695/pexels-photo-894695.jpeg?auto=compress&cs=tinysrgb&w=300",
    ),
    (
        "2",
        "Organic Green Tea",
        1850,
        "Beverages",
        32,
        "Premium organic green tea leaves",
        "2345678901234",
        "https://images.pexels.com/photos/1638280/pexels-photo-1638280.jpeg?auto=compress&cs=tinysrgb&w=300",
    ),
    (
        "3",
        "Artisan Chocolate Bar",
        899,
        "Snacks",
        67,
        "Dark chocolate with sea salt",
        "3456789012345",
        "https://images.pexels.com/photos/918327/pexels-photo-918327.jpeg?auto=compress&cs=tinysrgb&w=300",
    ),
    (
        "4",
        "Fresh Croissant",
        325,
        "Bakery",
        28,
        "Buttery, flaky croissant",
        "4567890123456",
        "https://images.pexels.com/photos/2067396/pexels-photo-2067396.jpeg?auto=compress&cs=tinysrgb&w=300",
    ),
    (
        "5",
        "Gourmet Sandwich",
        1275,
        "Food",
        19,
        "Turkey and avocado on sourdough",
        "5678901234567",
        "https://images.pexels.com/photos/1099680/pexels-photo-1099680.jpeg?auto=compress&cs=tinysrgb&w=300",
    ),
    (
        "6",
        "Fresh Fruit Smoothie",
        750,
        "Beverages",
        41,
        "Mixed berry smoothie with yogurt",
        "6789012345678",
        "https://images.pexels.com/photos/775032/pexels-photo-775032.jpeg?auto=compress&cs=tinysrgb&w=300",
    ),
    (
        "7",
        "Organic Salad Bowl",
        1425,
        "Food",
        23,
        "Mixed greens with vinaigrette",
        "7890123456789",
        "https://images.pexels.com/photos/1640777/pexels-photo-1640777.jpeg?auto=compress&cs=tinysrgb&w=300",
    ),
    (
        "8",
        "Pastry Assortment",
        1699,
        "Bakery",
        15,
        "Selection of Danish pastries",
        "8901234567890",
        "https://images.pexels.com/photos/205961/pexels-photo-205961.jpeg?auto=compress&cs=tinysrgb&w=300",
    ),
];

/// (id, name, email, phone, loyalty_points, total_spent_cents)
const CUSTOMERS: &[(&str, &str, &str, &str, i64, i64)] = &[
    ("1", "Sarah Johnson", "sarah@email.com", "(555) 123-4567", 245, 125_075),
    ("2", "Michael Chen", "michael@email.com", "(555) 234-5678", 180, 89_020),
    ("3", "Emily Rodriguez", "emily@email.com", "(555) 345-6789", 320, 165_040),
];

/// The demo catalog.
pub fn demo_products() -> Vec<Product> {
    PRODUCTS
        .iter()
        .map(
            |&(id, name, price_cents, category, stock, description, barcode, image_url)| Product {
                id: id.to_string(),
                name: name.to_string(),
                price_cents,
                category: category.to_string(),
                stock,
                tax_rate_bps: DEMO_TAX_BPS,
                description: description.to_string(),
                image_url: image_url.to_string(),
                barcode: barcode.to_string(),
            },
        )
        .collect()
}

/// The demo customer list.
pub fn demo_customers() -> Vec<Customer> {
    CUSTOMERS
        .iter()
        .map(|&(id, name, email, phone, loyalty_points, spent_cents)| Customer {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            loyalty_points,
            total_spent: Money::from_cents(spent_cents),
        })
        .collect()
}

/// Two earlier sales so the reports screen is not empty, newest first.
///
/// History only: stock and customer balances are seeded as they are and are
/// not adjusted for these.
pub fn demo_transactions(now: DateTime<Utc>) -> Vec<Transaction> {
    let products = demo_products();
    let line = |index: usize, quantity: i64| CartLine::new(products[index].clone(), quantity);

    let card_sale = {
        let timestamp = now - Duration::hours(1);
        let items = vec![line(0, 2), line(2, 1)];
        let totals = compute_totals(&items);
        Transaction {
            id: receipt_id_from_parts(timestamp.timestamp_millis(), 1),
            customer_id: Some("1".to_string()),
            customer_name: Some("Sarah Johnson".to_string()),
            items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            discount: Money::zero(),
            total: totals.total,
            payment_method: PaymentMethod::Card,
            cash_received: None,
            cashier: "John Smith".to_string(),
            timestamp,
        }
    };

    let cash_sale = {
        let timestamp = now - Duration::hours(2);
        let items = vec![line(1, 1), line(3, 3)];
        let ten_percent = DiscountRate::from_percent(10).unwrap_or_default();
        let resolved = apply_discount(compute_totals(&items), ten_percent);
        Transaction {
            id: receipt_id_from_parts(timestamp.timestamp_millis(), 2),
            customer_id: None,
            customer_name: None,
            items,
            subtotal: resolved.subtotal,
            tax: resolved.tax,
            discount: resolved.discount,
            total: resolved.final_total,
            payment_method: PaymentMethod::Cash,
            cash_received: Some(Money::from_cents(3000)),
            cashier: "John Smith".to_string(),
            timestamp,
        }
    };

    vec![card_sale, cash_sale]
}

#[cfg(test)]
mod tests {
    use super::*;
    use till_core::validation::{validate_new_customer, validate_new_product};
    use till_core::{NewCustomer, NewProduct};

    #[test]
    fn test_demo_products_are_valid() {
        let products = demo_products();
        assert_eq!(products.len(), 8);

        for p in products {
            let form = NewProduct {
                name: p.name,
                price_cents: p.price_cents,
                category: p.category,
                stock: p.stock,
                tax_rate_bps: p.tax_rate_bps,
                description: p.description,
                image_url: p.image_url,
                barcode: p.barcode,
            };
            assert!(validate_new_product(&form).is_ok());
        }
    }

    #[test]
    fn test_demo_transactions_are_consistent() {
        let now = Utc::now();
        let history = demo_transactions(now);

        assert_eq!(history.len(), 2);
        assert!(history[0].timestamp > history[1].timestamp);
        for txn in &history {
            assert!(till_core::receipt::is_receipt_id(&txn.id));
            assert_eq!(txn.total, txn.subtotal + txn.tax - txn.discount);
        }
        assert_eq!(history[0].total, Money::from_micros(63_687_600));
        assert_eq!(history[1].change_due(), Some(Money::from_micros(2_315_000)));
    }

    #[test]
    fn test_demo_customers_are_valid() {
        for c in demo_customers() {
            let form = NewCustomer {
                name: c.name,
                email: c.email,
                phone: c.phone,
            };
            assert!(validate_new_customer(&form).is_ok());
        }
    }
}
