// ABOUTME: Column instantiation of the merge diff
// ABOUTME: Turns added, dropped, and changed columns into ALTER TABLE statements and warnings

use super::ident::quote_ident;
use super::kind::ChangeOptions;
use super::row::SchemaRow;
use super::statement::Statement;
use anyhow::{Context, Result};

pub const KEY_FIELDS: &[&str] = &["table_name", "column_name"];

const VARCHAR: &str = "character varying";

/// Emit `ADD COLUMN` for a column that only exists in source
pub fn add(row: &SchemaRow, options: &ChangeOptions, out: &mut Vec<Statement>) {
    let table = quote_ident(row.attr("table_name"));
    let column = quote_ident(row.attr("column_name"));
    let data_type = row.attr("data_type");

    let mut sql = if data_type == VARCHAR {
        let length = varchar_length(row, options, out);
        format!(
            "ALTER TABLE {} ADD COLUMN {} {}({})",
            table, column, data_type, length
        )
    } else {
        format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, data_type)
    };

    if row.attr("is_nullable") == "NO" {
        sql.push_str(" NOT NULL");
    }
    if !row.is_null("column_default") {
        sql.push_str(&format!(" DEFAULT {}", row.attr("column_default")));
    }
    sql.push(';');

    out.push(Statement::Sql(sql));
}

/// Emit `DROP COLUMN` for a column that only exists in target
///
/// No data-loss warning is produced for dropped columns. Columns of a table that was
/// already dropped earlier in the run produce nothing.
pub fn drop(row: &SchemaRow, options: &ChangeOptions, out: &mut Vec<Statement>) {
    let table = row.attr("table_name");
    if options.dropped_tables.contains(table) {
        tracing::debug!(
            "Skipping DROP COLUMN {}.{}: table is dropped",
            table,
            row.attr("column_name")
        );
        return;
    }

    out.push(Statement::Sql(format!(
        "ALTER TABLE {} DROP COLUMN {};",
        quote_ident(table),
        quote_ident(row.attr("column_name"))
    )));
}

/// Emit one statement per attribute that differs between a matched pair
///
/// Deltas are checked in a fixed order: type/length, default, nullability. Fails only
/// when a character length is not a valid integer.
pub fn change(
    source: &SchemaRow,
    target: &SchemaRow,
    options: &ChangeOptions,
    out: &mut Vec<Statement>,
) -> Result<()> {
    type_change(source, target, options, out)?;
    default_change(source, target, options, out);
    nullable_change(source, target, out);
    Ok(())
}

fn type_change(
    source: &SchemaRow,
    target: &SchemaRow,
    options: &ChangeOptions,
    out: &mut Vec<Statement>,
) -> Result<()> {
    let table = source.attr("table_name");
    let column = source.attr("column_name");
    let source_type = source.attr("data_type");
    let target_type = target.attr("data_type");

    if source_type != target_type {
        out.push(Statement::warning(format!(
            "This type change may not work well: ({} to {}).",
            target_type, source_type
        )));
        // Carry the declared length so one run reaches the source definition
        let declared = if source_type == VARCHAR && !source.is_null("character_maximum_length") {
            format!("{}({})", source_type, source.attr("character_maximum_length"))
        } else {
            source_type.to_string()
        };
        out.push(Statement::Sql(format!(
            "ALTER TABLE {} ALTER COLUMN {} TYPE {};",
            quote_ident(table),
            quote_ident(column),
            declared
        )));
        return Ok(());
    }

    if source_type != VARCHAR {
        return Ok(());
    }

    let source_length = source.attr("character_maximum_length");
    let target_length = target.attr("character_maximum_length");
    if source_length == target_length {
        return Ok(());
    }

    if !source.is_null("character_maximum_length") && !target.is_null("character_maximum_length")
    {
        let source_max = parse_length(source_length, table, column, "source")?;
        let target_max = parse_length(target_length, table, column, "target")?;
        if source_max < target_max {
            out.push(Statement::warning(
                "The next statement will shorten a character varying column.",
            ));
        }
    }

    let length = varchar_length(source, options, out);
    out.push(Statement::Sql(format!(
        "ALTER TABLE {} ALTER COLUMN {} TYPE {}({});",
        quote_ident(table),
        quote_ident(column),
        VARCHAR,
        length
    )));
    Ok(())
}

fn default_change(
    source: &SchemaRow,
    target: &SchemaRow,
    options: &ChangeOptions,
    out: &mut Vec<Statement>,
) {
    let table = quote_ident(source.attr("table_name"));
    let column = quote_ident(source.attr("column_name"));

    if source.is_null("column_default") {
        // Target keeps its default unless explicitly asked to remove it
        if options.drop_orphaned_defaults && !target.is_null("column_default") {
            out.push(Statement::Sql(format!(
                "ALTER TABLE {} ALTER COLUMN {} DROP DEFAULT;",
                table, column
            )));
        }
        return;
    }

    let source_default = source.attr("column_default");
    if source_default != target.attr("column_default") {
        out.push(Statement::Sql(format!(
            "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {};",
            table, column, source_default
        )));
    }
}

fn nullable_change(source: &SchemaRow, target: &SchemaRow, out: &mut Vec<Statement>) {
    let source_nullable = source.attr("is_nullable");
    if source_nullable == target.attr("is_nullable") {
        return;
    }

    let action = if source_nullable == "YES" {
        "DROP NOT NULL"
    } else {
        "SET NOT NULL"
    };
    out.push(Statement::Sql(format!(
        "ALTER TABLE {} ALTER COLUMN {} {};",
        quote_ident(source.attr("table_name")),
        quote_ident(source.attr("column_name")),
        action
    )));
}

/// Length to declare for a varchar column, falling back when the catalog reports none
fn varchar_length(row: &SchemaRow, options: &ChangeOptions, out: &mut Vec<Statement>) -> String {
    if row.is_null("character_maximum_length") {
        out.push(Statement::warning(format!(
            "character varying column has no maximum length. Setting to {}",
            options.varchar_fallback_length
        )));
        options.varchar_fallback_length.to_string()
    } else {
        row.attr("character_maximum_length").to_string()
    }
}

fn parse_length(value: &str, table: &str, column: &str, side: &str) -> Result<i64> {
    value.trim().parse::<i64>().with_context(|| {
        format!(
            "Invalid character_maximum_length '{}' for {}.{} in {} database",
            value, table, column, side
        )
    })
}
