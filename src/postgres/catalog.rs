// ABOUTME: Metadata queries for each schema-object kind
// ABOUTME: Streams information_schema rows into a channel as string-valued SchemaRows

use crate::diff::{RowReceiver, SchemaKind, SchemaRow, NULL_MARKER};
use anyhow::{Context, Result};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_postgres::Client;

// Every value is cast to text so NULLs and domain types scan uniformly. Keys are
// ordered with COLLATE "C" to match the byte-wise comparison in the merge.
const TABLES_QUERY: &str = r#"
SELECT table_name::text AS table_name
     , CASE table_type WHEN 'BASE TABLE' THEN 'TABLE' ELSE table_type::text END AS table_type
FROM information_schema.tables
WHERE table_schema::text = $1
  AND table_type = 'BASE TABLE'
ORDER BY table_name::text COLLATE "C" ASC"#;

const COLUMNS_QUERY: &str = r#"
SELECT table_name::text AS table_name
     , column_name::text AS column_name
     , data_type::text AS data_type
     , is_nullable::text AS is_nullable
     , column_default::text AS column_default
     , character_maximum_length::text AS character_maximum_length
FROM information_schema.columns
WHERE table_schema::text = $1
  AND is_updatable = 'YES'
ORDER BY table_name::text COLLATE "C" ASC, column_name::text COLLATE "C" ASC"#;

/// SQL returning the metadata rows for `kind`, parameterised by schema name
pub fn metadata_query(kind: SchemaKind) -> &'static str {
    match kind {
        SchemaKind::Table => TABLES_QUERY,
        SchemaKind::Column => COLUMNS_QUERY,
    }
}

/// Start streaming the metadata rows for `kind` in `schema`
///
/// The query is issued before returning; rows are then forwarded by a spawned task into
/// a channel holding at most `capacity` rows. A failure while reading rows is sent as
/// the final item so the consumer sees it instead of a truncated stream.
pub async fn stream_rows(
    client: &Client,
    kind: SchemaKind,
    schema: &str,
    capacity: usize,
) -> Result<RowReceiver> {
    let stream = client
        .query_raw(metadata_query(kind), [schema])
        .await
        .with_context(|| format!("Failed to query {} metadata for schema '{}'", kind, schema))?;

    let (tx, rx) = mpsc::channel(capacity.max(1));

    tokio::spawn(async move {
        let mut stream = Box::pin(stream);
        let mut forwarded = 0usize;

        while let Some(item) = stream.next().await {
            let row = item
                .context("Failed to read metadata row")
                .and_then(|row| to_schema_row(&row));
            let failed = row.is_err();

            if tx.send(row).await.is_err() {
                tracing::debug!("{} row consumer went away after {} rows", kind, forwarded);
                return;
            }
            if failed {
                return;
            }
            forwarded += 1;
        }

        tracing::debug!("Streamed {} {} rows", forwarded, kind);
    });

    Ok(rx)
}

/// Scan every column of a result row as text, mapping NULL to the null marker
fn to_schema_row(row: &tokio_postgres::Row) -> Result<SchemaRow> {
    let mut schema_row = SchemaRow::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value: Option<String> = row
            .try_get(idx)
            .with_context(|| format!("Metadata column '{}' is not text", column.name()))?;
        schema_row.insert(
            column.name(),
            value.unwrap_or_else(|| NULL_MARKER.to_string()),
        );
    }
    Ok(schema_row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::SchemaCursor;
    use crate::postgres::connect;

    #[test]
    fn test_queries_order_every_key_bytewise() {
        for kind in SchemaKind::ALL {
            let query = metadata_query(kind);
            for field in kind.key_fields() {
                assert!(
                    query.contains(&format!("{}::text COLLATE \"C\" ASC", field)),
                    "{} query must order {} with COLLATE \"C\"",
                    kind,
                    field
                );
            }
        }
    }

    #[test]
    fn test_column_query_selects_every_compared_attribute() {
        for attr in [
            "table_name",
            "column_name",
            "data_type",
            "is_nullable",
            "column_default",
            "character_maximum_length",
        ] {
            assert!(COLUMNS_QUERY.contains(&format!("AS {}", attr)));
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_stream_rows_delivers_sorted_columns() {
        let url = std::env::var("TEST_SOURCE_URL").unwrap();
        let client = connect(&url).await.unwrap();

        let rx = stream_rows(&client, SchemaKind::Column, "public", 16)
            .await
            .unwrap();
        let mut cursor = SchemaCursor::new(rx);

        let mut previous: Option<SchemaRow> = None;
        let mut count = 0;
        cursor.advance().await.unwrap();
        while let Some(row) = cursor.current() {
            if let Some(prev) = &previous {
                assert_eq!(
                    SchemaKind::Column.compare(prev, row),
                    std::cmp::Ordering::Less
                );
            }
            previous = Some(row.clone());
            count += 1;
            cursor.advance().await.unwrap();
        }

        println!("Streamed {} column rows", count);
    }
}
