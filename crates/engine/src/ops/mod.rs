use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod accounts;
mod balances;
mod categories;
mod export;
mod financials;
mod listing;
mod subcategories;
mod users;

pub use balances::{CategoryExpense, Dashboard, WindowTotals};
pub use financials::NewFinancial;
pub use listing::{FinancialListFilter, Page, PageRequest, SortDirection, SortKey};

/// Default bound applied to every engine operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Default upper bound for `PageRequest::limit`.
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 500;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// The whole block is bounded by the engine timeout. On expiry the future is
/// dropped together with the transaction, which rolls back and hands the
/// connection back to the pool.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        $self
            .bounded(async {
                let $tx = $self.database.begin().await?;
                let result = $body;
                match result {
                    Ok(value) => {
                        $tx.commit().await?;
                        Ok::<_, crate::EngineError>(value)
                    }
                    Err(err) => Err(err),
                }
            })
            .await
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    timeout: Duration,
    max_page_size: u64,
    password_cost: u32,
    /// Hash verified against when the username is unknown, so a miss costs
    /// the same bcrypt round as a wrong password.
    decoy_hash: String,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    async fn bounded<T, F>(&self, operation: F) -> ResultEngine<T>
    where
        F: Future<Output = ResultEngine<T>>,
    {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::StoreUnavailable(format!(
                "operation timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

fn normalize_required_name(value: Option<&str>, label: &str) -> ResultEngine<String> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    timeout: Duration,
    max_page_size: u64,
    password_cost: u32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            timeout: DEFAULT_OPERATION_TIMEOUT,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            password_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Upper bound for a single engine operation, transaction included.
    pub fn timeout(mut self, timeout: Duration) -> EngineBuilder {
        self.timeout = timeout;
        self
    }

    pub fn max_page_size(mut self, max_page_size: u64) -> EngineBuilder {
        self.max_page_size = max_page_size;
        self
    }

    /// bcrypt cost for new password hashes.
    pub fn password_cost(mut self, cost: u32) -> EngineBuilder {
        self.password_cost = cost;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if self.timeout.is_zero() {
            return Err(EngineError::Validation(
                "operation timeout must be > 0".to_string(),
            ));
        }
        if self.max_page_size == 0 {
            return Err(EngineError::Validation(
                "max page size must be > 0".to_string(),
            ));
        }
        let decoy_hash =
            users::hash_password("ledgerly-decoy".to_string(), self.password_cost).await?;
        Ok(Engine {
            database: self.database,
            timeout: self.timeout,
            max_page_size: self.max_page_size,
            password_cost: self.password_cost,
            decoy_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_name_is_trimmed() {
        assert_eq!(
            normalize_required_name(Some("  Groceries "), "category"),
            Ok("Groceries".to_string())
        );
    }

    #[test]
    fn required_name_rejects_blank_and_missing() {
        let blank = normalize_required_name(Some("   "), "account");
        let missing = normalize_required_name(None, "account");
        let expected = Err(EngineError::Validation(
            "account name must not be empty".to_string(),
        ));
        assert_eq!(blank, expected);
        assert_eq!(missing, expected);
    }

    #[tokio::test]
    async fn builder_rejects_zero_timeout() {
        let res = Engine::builder().timeout(Duration::ZERO).build().await;
        assert!(matches!(res, Err(EngineError::Validation(_))));
    }

    #[tokio::test]
    async fn builder_prepares_a_decoy_hash_at_the_configured_cost() {
        let engine = Engine::builder().password_cost(4).build().await.unwrap();
        assert!(engine.decoy_hash.starts_with("$2b$04$"));
        let matches = users::verify_password(String::new(), engine.decoy_hash.clone())
            .await
            .unwrap();
        assert!(!matches);
    }

    #[tokio::test]
    async fn bounded_reports_expiry_as_store_unavailable() {
        let engine = Engine::builder()
            .timeout(Duration::from_millis(5))
            .build()
            .await
            .unwrap();
        let res: ResultEngine<()> = engine
            .bounded(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        assert!(matches!(res, Err(EngineError::StoreUnavailable(_))));
    }
}
