//! # Customer Repository
//!
//! Loyalty-program customer records. Balances only change through
//! `Store::checkout`; this repository never edits points or spend.

use tracing::info;
use uuid::Uuid;

use till_core::validation::{validate_new_customer, validate_search_query};
use till_core::{Customer, NewCustomer};

use super::SharedTables;
use crate::error::{StoreError, StoreResult};

/// Repository for customer operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    tables: SharedTables,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub(crate) fn new(tables: SharedTables) -> Self {
        CustomerRepository { tables }
    }

    /// Lists every customer in insertion order.
    pub async fn list(&self) -> Vec<Customer> {
        self.tables.lock().await.customers.clone()
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> Option<Customer> {
        self.tables
            .lock()
            .await
            .customers
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Registers a new customer with zero points and zero spend.
    ///
    /// ## Errors
    /// * Validation failure (name, email, phone)
    /// * `Duplicate` when the email (case-insensitive) is already on file
    pub async fn add(&self, new_customer: NewCustomer) -> StoreResult<Customer> {
        validate_new_customer(&new_customer)?;

        let mut tables = self.tables.lock().await;

        let email = new_customer.email.trim().to_lowercase();
        if tables
            .customers
            .iter()
            .any(|c| c.email.to_lowercase() == email)
        {
            return Err(StoreError::duplicate("email", new_customer.email));
        }

        let customer = new_customer.into_customer(Uuid::new_v4().to_string());
        tables.customers.push(customer.clone());

        info!(id = %customer.id, name = %customer.name, "Customer added");
        Ok(customer)
    }

    /// Filters the customer list: name or email (case-insensitive) or a phone
    /// substring. Empty matches everyone.
    pub async fn search(&self, query: &str) -> StoreResult<Vec<Customer>> {
        let query = validate_search_query(query)?;
        let needle = query.to_lowercase();

        let tables = self.tables.lock().await;
        Ok(tables
            .customers
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.email.to_lowercase().contains(&needle)
                    || c.phone.contains(query.as_str())
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::StoreError;
    use crate::seed::demo_customers;
    use crate::Store;
    use till_core::NewCustomer;

    fn store() -> Store {
        Store::with_data(Vec::new(), demo_customers())
    }

    fn dana() -> NewCustomer {
        NewCustomer {
            name: "Dana Whitfield".to_string(),
            email: "dana@email.com".to_string(),
            phone: "(555) 456-7890".to_string(),
        }
    }

    #[tokio::test]
    async fn test_search_by_name_email_and_phone() {
        let repo = store().customers();

        let by_name = repo.search("chen").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Michael Chen");

        let by_email = repo.search("EMILY@").await.unwrap();
        assert_eq!(by_email[0].name, "Emily Rodriguez");

        let by_phone = repo.search("123-4567").await.unwrap();
        assert_eq!(by_phone[0].name, "Sarah Johnson");

        assert_eq!(repo.search("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_add_starts_with_zero_balance() {
        let repo = store().customers();

        let added = repo.add(dana()).await.unwrap();

        assert_eq!(added.loyalty_points, 0);
        assert!(added.total_spent.is_zero());
        assert_eq!(repo.get_by_id(&added.id).await, Some(added));
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_email() {
        let repo = store().customers();

        let mut copy = dana();
        copy.email = "Sarah@Email.com".to_string();

        assert!(matches!(
            repo.add(copy).await,
            Err(StoreError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_rejects_missing_phone() {
        let repo = store().customers();

        let mut incomplete = dana();
        incomplete.phone = String::new();

        assert!(repo.add(incomplete).await.is_err());
        assert_eq!(repo.list().await.len(), 3);
    }
}
