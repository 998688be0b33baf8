//! CSV export
//!
//! One file per collection. Numeric fields use dot decimals, booleans
//! serialize as `true`/`false`, dates as ISO-8601. The payment source is
//! flattened into kind/account/card/target columns.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{DigibookError, DigibookResult};
use crate::models::PaymentSource;
use crate::storage::Database;

fn writer_for(dir: &Path, name: &str) -> DigibookResult<(csv::Writer<File>, PathBuf)> {
    let path = dir.join(name);
    let file = File::create(&path)
        .map_err(|e| DigibookError::Io(format!("Failed to create {}: {}", path.display(), e)))?;
    Ok((csv::Writer::from_writer(file), path))
}

fn finish(mut writer: csv::Writer<File>) -> DigibookResult<()> {
    writer
        .flush()
        .map_err(|e| DigibookError::Io(format!("Failed to flush CSV: {}", e)))
}

fn write_row<const N: usize>(
    writer: &mut csv::Writer<File>,
    row: [String; N],
) -> DigibookResult<()> {
    writer
        .write_record(row)
        .map_err(|e| DigibookError::Io(format!("Failed to write CSV row: {}", e)))
}

fn opt_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

/// Export every collection as CSV into `dir`, returning the files written
pub fn export_csv(db: &Database, dir: &Path) -> DigibookResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .map_err(|e| DigibookError::Io(format!("Failed to create {}: {}", dir.display(), e)))?;

    let mut written = Vec::new();

    let (mut w, path) = writer_for(dir, "accounts.csv")?;
    write_row(
        &mut w,
        [
            "id".into(),
            "name".into(),
            "type".into(),
            "currentBalance".into(),
            "isDefault".into(),
            "createdAt".into(),
        ],
    )?;
    for account in &db.accounts {
        write_row(
            &mut w,
            [
                account.id.raw().to_string(),
                account.name.clone(),
                account.account_type.to_string().to_lowercase(),
                account.current_balance.to_decimal_string(),
                account.is_default.to_string(),
                account.created_at.to_rfc3339(),
            ],
        )?;
    }
    finish(w)?;
    written.push(path);

    let (mut w, path) = writer_for(dir, "credit_cards.csv")?;
    write_row(
        &mut w,
        [
            "id".into(),
            "name".into(),
            "balance".into(),
            "creditLimit".into(),
            "interestRate".into(),
            "dueDate".into(),
            "statementClosingDate".into(),
            "minimumPayment".into(),
            "createdAt".into(),
        ],
    )?;
    for card in &db.credit_cards {
        write_row(
            &mut w,
            [
                card.id.raw().to_string(),
                card.name.clone(),
                card.balance.to_decimal_string(),
                card.credit_limit.to_decimal_string(),
                format!("{}", card.interest_rate),
                opt_date(card.due_date),
                opt_date(card.statement_closing_date),
                card.minimum_payment.to_decimal_string(),
                card.created_at.to_rfc3339(),
            ],
        )?;
    }
    finish(w)?;
    written.push(path);

    let (mut w, path) = writer_for(dir, "fixed_expenses.csv")?;
    write_row(
        &mut w,
        [
            "id".into(),
            "name".into(),
            "dueDate".into(),
            "amount".into(),
            "paidAmount".into(),
            "status".into(),
            "category".into(),
            "sourceKind".into(),
            "accountId".into(),
            "creditCardId".into(),
            "targetCreditCardId".into(),
            "isAutoCreated".into(),
            "createdAt".into(),
        ],
    )?;
    for expense in &db.fixed_expenses {
        let (kind, account, card, target) = match expense.payment_source {
            PaymentSource::Account { account_id } => {
                ("account", account_id.raw().to_string(), String::new(), String::new())
            }
            PaymentSource::CreditCard { credit_card_id } => (
                "creditCard",
                String::new(),
                credit_card_id.raw().to_string(),
                String::new(),
            ),
            PaymentSource::CreditCardPayment {
                account_id,
                target_credit_card_id,
            } => (
                "creditCardPayment",
                account_id.raw().to_string(),
                String::new(),
                target_credit_card_id.raw().to_string(),
            ),
        };
        write_row(
            &mut w,
            [
                expense.id.raw().to_string(),
                expense.name.clone(),
                opt_date(expense.due_date),
                expense.amount.to_decimal_string(),
                expense.paid_amount.to_decimal_string(),
                expense.status.to_string(),
                expense.category.clone(),
                kind.into(),
                account,
                card,
                target,
                expense.is_auto_created.to_string(),
                expense.created_at.to_rfc3339(),
            ],
        )?;
    }
    finish(w)?;
    written.push(path);

    let (mut w, path) = writer_for(dir, "pending_transactions.csv")?;
    write_row(
        &mut w,
        [
            "id".into(),
            "accountId".into(),
            "amount".into(),
            "category".into(),
            "description".into(),
            "createdAt".into(),
        ],
    )?;
    for pending in &db.pending_transactions {
        write_row(
            &mut w,
            [
                pending.id.raw().to_string(),
                pending.account_id.raw().to_string(),
                pending.amount.to_decimal_string(),
                pending.category.clone(),
                pending.description.clone(),
                pending.created_at.to_rfc3339(),
            ],
        )?;
    }
    finish(w)?;
    written.push(path);

    let (mut w, path) = writer_for(dir, "categories.csv")?;
    write_row(
        &mut w,
        [
            "id".into(),
            "name".into(),
            "color".into(),
            "icon".into(),
            "isDefault".into(),
            "createdAt".into(),
        ],
    )?;
    for category in &db.categories {
        write_row(
            &mut w,
            [
                category.id.raw().to_string(),
                category.name.clone(),
                category.color.clone(),
                category.icon.clone(),
                category.is_default.to_string(),
                category.created_at.to_rfc3339(),
            ],
        )?;
    }
    finish(w)?;
    written.push(path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType, FixedExpense, Money};
    use tempfile::TempDir;

    #[test]
    fn test_exports_one_file_per_collection() {
        let db = Database::seeded();
        let temp = TempDir::new().unwrap();

        let files = export_csv(&db, temp.path()).unwrap();
        assert_eq!(files.len(), 5);
        for file in &files {
            assert!(file.exists());
        }
    }

    #[test]
    fn test_decimal_and_boolean_rendering() {
        let mut db = Database::default();
        let id = db.next_account_id();
        let mut account = Account::new(
            id,
            "Checking",
            AccountType::Checking,
            Money::from_cents(-12345),
        );
        account.is_default = true;
        db.accounts.push(account);

        let temp = TempDir::new().unwrap();
        export_csv(&db, temp.path()).unwrap();

        let text = std::fs::read_to_string(temp.path().join("accounts.csv")).unwrap();
        assert!(text.contains("-123.45"));
        assert!(text.contains("true"));
        assert!(text.contains("checking"));
    }

    #[test]
    fn test_payment_source_flattening() {
        let mut db = Database::default();
        let account_id = db.next_account_id();
        db.accounts.push(Account::new(
            account_id,
            "A",
            AccountType::Checking,
            Money::zero(),
        ));
        let expense_id = db.next_expense_id();
        db.fixed_expenses.push(FixedExpense::new(
            expense_id,
            "Pay Visa",
            Money::from_major(35),
            crate::models::CREDIT_CARD_PAYMENT,
            PaymentSource::CreditCardPayment {
                account_id,
                target_credit_card_id: crate::models::CreditCardId::new(9),
            },
        ));

        let temp = TempDir::new().unwrap();
        export_csv(&db, temp.path()).unwrap();

        let text = std::fs::read_to_string(temp.path().join("fixed_expenses.csv")).unwrap();
        let data_line = text.lines().nth(1).unwrap();
        assert!(data_line.contains("creditCardPayment"));
        assert!(data_line.contains(",9,"));
    }
}
