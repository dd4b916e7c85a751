//! Persist-time checks of a row against its record schema.
//!
//! Only width and type are enforced. Content rules (ISBN checksums,
//! uniqueness, non-empty strings) are not part of a field definition.

use serde_json::{Map, Value};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};
use url::Url;

use booklist_kernel::{FieldDef, FieldKind, RecordSchema};

use crate::error::{StoreError, StoreResult};

/// Wire format of `FieldKind::Date` values
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const URL_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

/// Check that `row` carries exactly the schema's fields with valid values.
pub fn validate_row(schema: &RecordSchema, row: &Map<String, Value>) -> StoreResult<()> {
    if let Some(unknown) = row.keys().find(|key| schema.field(key).is_none()) {
        return Err(StoreError::UnknownField {
            table: schema.table.to_string(),
            field: unknown.clone(),
        });
    }

    for field in schema.fields {
        match row.get(field.name) {
            None | Some(Value::Null) => {
                return Err(StoreError::MissingField {
                    table: schema.table.to_string(),
                    field: field.name.to_string(),
                })
            }
            Some(value) => validate_value(schema.table, field, value)?,
        }
    }

    Ok(())
}

fn validate_value(table: &str, field: &FieldDef, value: &Value) -> StoreResult<()> {
    let invalid_type = |expected| StoreError::InvalidType {
        table: table.to_string(),
        field: field.name.to_string(),
        expected,
    };

    match field.kind {
        FieldKind::Text { max_length } => {
            let text = value.as_str().ok_or_else(|| invalid_type("a string"))?;
            check_length(table, field, text, max_length)
        }
        FieldKind::Integer => {
            let number = value.as_i64().ok_or_else(|| invalid_type("an integer"))?;
            i32::try_from(number)
                .map(|_| ())
                .map_err(|_| invalid_type("a 32-bit integer"))
        }
        FieldKind::Date => {
            let text = value.as_str().ok_or_else(|| invalid_type("a date string"))?;
            Date::parse(text, DATE_FORMAT)
                .map(|_| ())
                .map_err(|err| StoreError::InvalidDate {
                    table: table.to_string(),
                    field: field.name.to_string(),
                    reason: err.to_string(),
                })
        }
        FieldKind::Url { max_length } => {
            let text = value.as_str().ok_or_else(|| invalid_type("a URL string"))?;
            check_length(table, field, text, max_length)?;
            check_url(text).map_err(|reason| StoreError::InvalidUrl {
                table: table.to_string(),
                field: field.name.to_string(),
                reason,
            })
        }
    }
}

fn check_length(table: &str, field: &FieldDef, text: &str, max_length: usize) -> StoreResult<()> {
    let actual = text.chars().count();
    if actual > max_length {
        return Err(StoreError::TooLong {
            table: table.to_string(),
            field: field.name.to_string(),
            max_length,
            actual,
        });
    }
    Ok(())
}

fn check_url(text: &str) -> Result<(), String> {
    let url = Url::parse(text).map_err(|err| err.to_string())?;

    if !URL_SCHEMES.contains(&url.scheme()) {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err("missing host".to_string());
    }

    Ok(())
}
