// ABOUTME: Ordered merge diff engine over schema metadata streams
// ABOUTME: Exports cursors, the merge driver, per-kind emitters, and output records

pub mod column;
pub mod compare;
pub mod cursor;
pub mod ident;
pub mod kind;
pub mod merge;
pub mod row;
pub mod statement;
pub mod table;

pub use compare::compare_rows;
pub use cursor::{row_channel, RowReceiver, SchemaCursor};
pub use ident::quote_ident;
pub use kind::{ChangeOptions, DiffOutcome, SchemaKind};
pub use merge::{diff_rows, merge_diff, DiffSummary};
pub use row::{SchemaRow, NULL_MARKER};
pub use statement::{write_statements, OutputFormat, Statement};
