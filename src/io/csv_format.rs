//! CSV format handling for command records and account output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to domain commands
//! - Account report serialization
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! # Input Format
//!
//! ```text
//! type,name,source,receiver,amount
//! create,user1,,,1700.0
//! create,user2,,,2000.0
//! transfer,,0,1,200.0
//! ```

use crate::types::{Account, AccountId, CommandRecord, CommandType};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: type, name, source, receiver, amount.
/// Every column but `type` is optional because create and transfer commands
/// use different subsets.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub command: String,
    pub name: Option<String>,
    pub source: Option<AccountId>,
    pub receiver: Option<AccountId>,
    pub amount: Option<String>,
}

/// Convert a CsvRecord to a CommandRecord
///
/// This function:
/// - Parses the command type (case-insensitive)
/// - Parses the amount string into a Decimal
/// - Checks that the fields the command needs are present
///
/// # Returns
///
/// * `Ok(CommandRecord)` - Successfully converted record
/// * `Err(String)` - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<CommandRecord, String> {
    let command = match csv_record.command.to_lowercase().as_str() {
        "create" => CommandType::Create,
        "transfer" => CommandType::Transfer,
        _ => return Err(format!("Invalid command type: '{}'", csv_record.command)),
    };

    let amount = match csv_record.amount {
        Some(amount_str) if !amount_str.trim().is_empty() => Decimal::from_str(amount_str.trim())
            .map_err(|_| format!("Invalid amount '{}' for {:?} command", amount_str, command))?,
        _ => return Err(format!("{:?} command requires an amount", command)),
    };

    match command {
        CommandType::Create => {
            let name = csv_record
                .name
                .filter(|name| !name.is_empty())
                .ok_or_else(|| "Create command requires a name".to_string())?;
            Ok(CommandRecord::Create {
                name,
                balance: amount,
            })
        }
        CommandType::Transfer => {
            let source = csv_record
                .source
                .ok_or_else(|| "Transfer command requires a source account".to_string())?;
            let receiver = csv_record
                .receiver
                .ok_or_else(|| "Transfer command requires a receiver account".to_string())?;
            Ok(CommandRecord::Transfer {
                source,
                receiver,
                amount,
            })
        }
    }
}

/// Write account states to CSV format
///
/// Writes accounts in CSV format with columns: id, name, balance.
/// Accounts are sorted by id for deterministic output; balances are printed
/// with four decimal places.
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["id", "name", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.id);

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.id.to_string(),
                account.name,
                format!("{:.4}", account.balance),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
