//! CSV rendering for spending exports.

use super::error::ReportError;
use super::types::{ExpenseRow, PlannedActualRow};

/// Renders the planned-vs-actual comparison for one budget.
///
/// Header: `Category, Planned ($), Actual ($)`. Amounts are written
/// unquoted, in the rows' given order.
pub fn spending_comparison_csv(rows: &[PlannedActualRow]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Category", "Planned ($)", "Actual ($)"])?;

    for row in rows {
        let planned = row.planned.to_string();
        let actual = row.actual.to_string();
        writer.write_record([row.category_name.as_str(), planned.as_str(), actual.as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Render(e.to_string()))
}

/// Renders a user's expenses, one row per expense.
///
/// Header: `Name, Date, Time, Description, Category, Amount, ID`. Absent
/// name, description, and category render as `-`; dates are `MM/DD/YYYY`
/// and times `hh:mm AM/PM`.
pub fn expenses_csv(rows: &[ExpenseRow]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Name", "Date", "Time", "Description", "Category", "Amount", "ID"])?;

    for row in rows {
        let date = row.timestamp.format("%m/%d/%Y").to_string();
        let time = row.timestamp.format("%I:%M %p").to_string();
        let amount = row.amount.to_string();
        let id = row.id.to_string();
        writer.write_record([
            row.name.as_deref().unwrap_or("-"),
            date.as_str(),
            time.as_str(),
            row.description.as_deref().unwrap_or("-"),
            row.category_name.as_deref().unwrap_or("-"),
            amount.as_str(),
            id.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Render(e.to_string()))
}
