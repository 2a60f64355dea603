use sea_orm::TransactionTrait;

use crate::{EngineError, FinancialRow, ResultEngine, financials::FinancialRowModel};

use super::{Engine, FinancialListFilter, listing::ApplyListing, with_tx};

impl Engine {
    /// Render every listed financial of `user_id` as CSV, newest first.
    ///
    /// The header row is taken from the [`FinancialRow`] field names. A user
    /// with no financials gets [`EngineError::NothingToExport`] rather than an
    /// empty document.
    pub async fn export_financials_csv(&self, user_id: i64) -> ResultEngine<String> {
        let rows = with_tx!(self, |db_tx| {
            let models = Self::select_row_columns(Self::financial_rows(user_id))
                .sort_financials(&FinancialListFilter::default())
                .into_model::<FinancialRowModel>()
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(FinancialRow::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })?;

        if rows.is_empty() {
            return Err(EngineError::NothingToExport);
        }
        render_csv(&rows)
    }
}

fn render_csv(rows: &[FinancialRow]) -> ResultEngine<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    for row in rows {
        writer
            .serialize(row)
            .map_err(|err| EngineError::Export(err.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| EngineError::Export(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| EngineError::Export(err.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::FinancialKind;

    fn row(id: i64, name: &str, subcategory: Option<&str>) -> FinancialRow {
        FinancialRow {
            id,
            name: name.to_string(),
            amount: 1250,
            id_account: 1,
            user_id: 7,
            category_id: 3,
            subcategory_id: subcategory.map(|_| 9),
            transaction_date: NaiveDate::from_ymd_opt(2026, 2, 14).unwrap(),
            kind: FinancialKind::Expense,
            is_transfer: false,
            account_name: "Checking".to_string(),
            category_name: "Food".to_string(),
            subcategory_name: subcategory.map(ToString::to_string),
        }
    }

    #[test]
    fn header_comes_from_field_names() {
        let csv = render_csv(&[row(1, "Dinner", Some("Restaurants"))]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some(
                "id,name,amount,id_account,user_id,category_id,subcategory_id,\
                 transaction_date,type,is_transfer,account_name,category_name,subcategory_name"
            )
        );
        assert_eq!(
            lines.next(),
            Some("1,Dinner,1250,1,7,3,9,2026-02-14,expense,false,Checking,Food,Restaurants")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn delimiters_inside_values_are_quoted() {
        let csv = render_csv(&[row(2, "Pizza, beer", None)]).unwrap();
        let data = csv.lines().nth(1).unwrap();
        assert_eq!(
            data,
            "2,\"Pizza, beer\",1250,1,7,3,,2026-02-14,expense,false,Checking,Food,"
        );
    }
}
