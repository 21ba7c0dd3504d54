// ABOUTME: Closed set of schema-object kinds the merge diff understands
// ABOUTME: Dispatches compare/add/drop/change to the per-kind emitters

use super::compare::{compare_rows, describe_key};
use super::row::SchemaRow;
use super::statement::Statement;
use super::{column, table};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// Options that shape the statements emitted for a matched or unmatched row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOptions {
    /// Length declared for varchar columns that report no maximum length
    pub varchar_fallback_length: u32,
    /// Emit `DROP DEFAULT` when target has a default and source has none
    pub drop_orphaned_defaults: bool,
    /// Tables already dropped earlier in the run; their columns go with them
    pub dropped_tables: BTreeSet<String>,
}

impl Default for ChangeOptions {
    fn default() -> Self {
        Self {
            varchar_fallback_length: 1024,
            drop_orphaned_defaults: false,
            dropped_tables: BTreeSet::new(),
        }
    }
}

/// How the merge classified one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOutcome {
    SourceOnly,
    TargetOnly,
    MatchedSame,
    MatchedChanged,
}

/// A kind of schema object compared between the two databases
///
/// Each variant supplies its own key and Add/Drop/Change payloads; the merge loop is
/// shared. Kinds are listed in the order their scripts should run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Table,
    Column,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 2] = [SchemaKind::Table, SchemaKind::Column];

    pub fn key_fields(self) -> &'static [&'static str] {
        match self {
            SchemaKind::Table => table::KEY_FIELDS,
            SchemaKind::Column => column::KEY_FIELDS,
        }
    }

    pub fn compare(self, a: &SchemaRow, b: &SchemaRow) -> Ordering {
        compare_rows(a, b, self.key_fields())
    }

    pub fn describe(self, row: &SchemaRow) -> String {
        describe_key(row, self.key_fields())
    }

    pub fn add(self, row: &SchemaRow, options: &ChangeOptions, out: &mut Vec<Statement>) {
        match self {
            SchemaKind::Table => table::add(row, out),
            SchemaKind::Column => column::add(row, options, out),
        }
    }

    pub fn drop(self, row: &SchemaRow, options: &ChangeOptions, out: &mut Vec<Statement>) {
        match self {
            SchemaKind::Table => table::drop(row, out),
            SchemaKind::Column => column::drop(row, options, out),
        }
    }

    pub fn change(
        self,
        source: &SchemaRow,
        target: &SchemaRow,
        options: &ChangeOptions,
        out: &mut Vec<Statement>,
    ) -> Result<()> {
        match self {
            SchemaKind::Table => Ok(()),
            SchemaKind::Column => column::change(source, target, options, out),
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Table => write!(f, "table"),
            SchemaKind::Column => write!(f, "column"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_run_tables_before_columns() {
        let mut kinds = vec![SchemaKind::Column, SchemaKind::Table];
        kinds.sort();
        assert_eq!(kinds, SchemaKind::ALL.to_vec());
    }

    #[test]
    fn test_table_key_ignores_column_name() {
        let a = SchemaRow::new()
            .with("table_name", "users")
            .with("column_name", "a");
        let b = SchemaRow::new()
            .with("table_name", "users")
            .with("column_name", "b");
        assert_eq!(SchemaKind::Table.compare(&a, &b), Ordering::Equal);
        assert_eq!(SchemaKind::Column.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_table_change_is_a_no_op() {
        let row = SchemaRow::new()
            .with("table_name", "users")
            .with("table_type", "TABLE");
        let other = row.clone().with("table_type", "VIEW");
        let mut out = Vec::new();
        SchemaKind::Table
            .change(&row, &other, &ChangeOptions::default(), &mut out)
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_column_drop_skipped_for_dropped_table() {
        let row = SchemaRow::new()
            .with("table_name", "legacy")
            .with("column_name", "a");
        let mut options = ChangeOptions::default();
        options.dropped_tables.insert("legacy".to_string());

        let mut out = Vec::new();
        SchemaKind::Column.drop(&row, &options, &mut out);
        assert!(out.is_empty());

        SchemaKind::Column.drop(&row, &ChangeOptions::default(), &mut out);
        assert_eq!(out, vec![Statement::sql("ALTER TABLE legacy DROP COLUMN a;")]);
    }

    #[test]
    fn test_kind_names_deserialize_from_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            kinds: Vec<SchemaKind>,
        }
        let parsed: Wrapper = toml::from_str(r#"kinds = ["column", "table"]"#).unwrap();
        assert_eq!(parsed.kinds, vec![SchemaKind::Column, SchemaKind::Table]);
    }
}
