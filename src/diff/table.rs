// ABOUTME: Table instantiation of the merge diff
// ABOUTME: Creates tables missing from target and drops tables missing from source

use super::ident::quote_ident;
use super::row::SchemaRow;
use super::statement::Statement;

pub const KEY_FIELDS: &[&str] = &["table_name"];

/// Emit an empty `CREATE TABLE`; the column diff fills in its columns
pub fn add(row: &SchemaRow, out: &mut Vec<Statement>) {
    out.push(Statement::Sql(format!(
        "CREATE {} {}();",
        table_type(row),
        quote_ident(row.attr("table_name"))
    )));
}

pub fn drop(row: &SchemaRow, out: &mut Vec<Statement>) {
    out.push(Statement::Sql(format!(
        "DROP {} {};",
        table_type(row),
        quote_ident(row.attr("table_name"))
    )));
}

// Matched tables have no attribute the generated script reconciles.

/// The catalog reports `BASE TABLE`; DDL wants `TABLE`
fn table_type(row: &SchemaRow) -> &str {
    match row.get("table_type") {
        Some("BASE TABLE") | None => "TABLE",
        Some(other) => other,
    }
}
