use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Envelope shared by list and create responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct Rows<T> {
    pub rows: Vec<T>,
    #[serde(rename = "rowCount")]
    pub row_count: u64,
}

impl<T> Rows<T> {
    /// Wrap freshly created rows; `rowCount` is the number of rows written.
    pub fn created(rows: Vec<T>) -> Self {
        let row_count = rows.len() as u64;
        Self { rows, row_count }
    }
}

/// Response body for deletes.
#[derive(Debug, Serialize, Deserialize)]
pub struct RowCount {
    #[serde(rename = "rowCount")]
    pub row_count: u64,
}

/// `?id=` selector used by every delete route.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

/// Paging and name search for accounts and categories.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: i64,
        pub name: String,
        pub user_id: i64,
    }

    /// An account with its derived balance, `Σ income − Σ expense`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountBalanceView {
        pub id: i64,
        pub name: String,
        pub net_total: i64,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        #[serde(alias = "name")]
        pub category: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i64,
        pub name: String,
        pub user_id: i64,
    }
}

pub mod subcategory {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubcategoryNew {
        #[serde(alias = "name")]
        pub subcategory: Option<String>,
        #[serde(rename = "categoryId", alias = "category_id")]
        pub category_id: Option<i64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SubcategoryList {
        pub id_category: Option<i64>,
        pub page: Option<u64>,
        pub limit: Option<u64>,
        pub search: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubcategoryView {
        pub id: i64,
        pub name: String,
        pub category_id: i64,
        pub user_id: i64,
    }
}

pub mod financial {
    use super::*;

    /// Request body for recording a financial.
    ///
    /// `type` is `income`, `expense` or `transfer`. Transfers also need
    /// `id_account_to`. Amounts are integer minor units.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct FinancialNew {
        pub name: Option<String>,
        pub amount: Option<i64>,
        pub id_account: Option<i64>,
        pub id_account_to: Option<i64>,
        pub id_category: Option<i64>,
        pub id_subcategory: Option<i64>,
        #[serde(rename = "transactionDate")]
        pub transaction_date: Option<NaiveDate>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct FinancialList {
        pub page: Option<u64>,
        pub limit: Option<u64>,
        pub id_account: Option<i64>,
        pub sort_key: Option<String>,
        pub sort_direction: Option<String>,
    }

    /// A stored financial row. Transfers come back as two of these.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct FinancialView {
        pub id: i64,
        pub name: String,
        pub amount: i64,
        pub id_account: i64,
        pub user_id: i64,
        pub category_id: i64,
        pub subcategory_id: Option<i64>,
        pub transaction_date: NaiveDate,
        #[serde(rename = "type")]
        pub kind: String,
        pub is_transfer: bool,
    }

    /// A financial joined with its account, category and subcategory names.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct FinancialRowView {
        pub id: i64,
        pub name: String,
        pub amount: i64,
        pub id_account: i64,
        pub user_id: i64,
        pub category_id: i64,
        pub subcategory_id: Option<i64>,
        pub transaction_date: NaiveDate,
        #[serde(rename = "type")]
        pub kind: String,
        pub is_transfer: bool,
        pub account_name: String,
        pub category_name: String,
        pub subcategory_name: Option<String>,
    }
}

pub mod dashboard {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct WindowTotals {
        pub total_income: i64,
        pub total_expense: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryExpense {
        pub category_id: i64,
        pub category_name: String,
        pub total_expense: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Dashboard {
        #[serde(rename = "expensesByCategory")]
        pub expenses_by_category: Vec<CategoryExpense>,
        #[serde(rename = "allTime")]
        pub all_time: WindowTotals,
        #[serde(rename = "prevYear")]
        pub prev_year: WindowTotals,
        #[serde(rename = "YTD")]
        pub year_to_date: WindowTotals,
    }
}

pub mod export {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExportResponse {
        pub message: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_body_accepts_name_alias() {
        let body: category::CategoryNew = serde_json::from_str(r#"{"name":"Food"}"#).unwrap();
        assert_eq!(body.category.as_deref(), Some("Food"));
    }

    #[test]
    fn subcategory_body_accepts_both_spellings() {
        let camel: subcategory::SubcategoryNew =
            serde_json::from_str(r#"{"subcategory":"Bus","categoryId":3}"#).unwrap();
        let snake: subcategory::SubcategoryNew =
            serde_json::from_str(r#"{"name":"Bus","category_id":3}"#).unwrap();
        assert_eq!(camel.category_id, Some(3));
        assert_eq!(snake.category_id, Some(3));
        assert_eq!(snake.subcategory.as_deref(), Some("Bus"));
    }

    #[test]
    fn financial_body_uses_wire_names() {
        let body: financial::FinancialNew = serde_json::from_str(
            r#"{"amount":1200,"name":"Bus","id_account":1,"id_category":2,
                "transactionDate":"2026-03-04","type":"expense"}"#,
        )
        .unwrap();
        assert_eq!(body.kind.as_deref(), Some("expense"));
        assert_eq!(body.transaction_date, NaiveDate::from_ymd_opt(2026, 3, 4));
        assert_eq!(body.id_subcategory, None);
    }

    #[test]
    fn row_count_is_camel_case() {
        let json = serde_json::to_string(&RowCount { row_count: 2 }).unwrap();
        assert_eq!(json, r#"{"rowCount":2}"#);
    }
}
