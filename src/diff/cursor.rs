// ABOUTME: Cursor over one lazily-delivered stream of metadata rows
// ABOUTME: Holds the current row and a permanent done flag once the producer finishes

use super::row::SchemaRow;
use anyhow::Result;
use tokio::sync::mpsc;

/// Receiving half of a row stream
///
/// Producers send `Ok(row)` for each metadata row and `Err` when the underlying query
/// fails. Dropping the sender is the end-of-stream signal.
pub type RowReceiver = mpsc::Receiver<Result<SchemaRow>>;

/// Feed in-memory rows through a producer task, the same way catalog rows arrive
///
/// Must be called from within a tokio runtime.
pub fn row_channel(rows: Vec<SchemaRow>) -> RowReceiver {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        for row in rows {
            if tx.send(Ok(row)).await.is_err() {
                tracing::debug!("Row consumer went away before the stream ended");
                return;
            }
        }
    });
    rx
}

/// Cursor positioned on one row of a [`RowReceiver`]
///
/// A freshly built cursor has no current row. The first [`advance`](Self::advance)
/// positions it on the first row (or marks it done for an empty stream).
pub struct SchemaCursor {
    rows: RowReceiver,
    current: Option<SchemaRow>,
    done: bool,
}

impl SchemaCursor {
    pub fn new(rows: RowReceiver) -> Self {
        Self {
            rows,
            current: None,
            done: false,
        }
    }

    /// Build a cursor over rows that are already in memory
    ///
    /// Must be called from within a tokio runtime; see [`row_channel`].
    pub fn from_rows(rows: Vec<SchemaRow>) -> Self {
        Self::new(row_channel(rows))
    }

    /// Move to the next row and hand back the row that was current
    ///
    /// Waits until the producer delivers a row or closes the stream. Once the stream is
    /// closed the cursor stays done and never reads again.
    pub async fn advance(&mut self) -> Result<Option<SchemaRow>> {
        let previous = self.current.take();
        if self.done {
            return Ok(previous);
        }

        match self.rows.recv().await {
            Some(Ok(row)) => self.current = Some(row),
            Some(Err(e)) => {
                self.done = true;
                self.rows.close();
                return Err(e);
            }
            None => self.done = true,
        }

        Ok(previous)
    }

    pub fn current(&self) -> Option<&SchemaRow> {
        self.current.as_ref()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(table: &str) -> SchemaRow {
        SchemaRow::new().with("table_name", table)
    }

    #[tokio::test]
    async fn test_cursor_walks_rows_then_reports_done() {
        let mut cursor = SchemaCursor::from_rows(vec![row("a"), row("b")]);
        assert!(cursor.current().is_none());
        assert!(!cursor.is_done());

        assert_eq!(cursor.advance().await.unwrap(), None);
        assert_eq!(cursor.current(), Some(&row("a")));

        assert_eq!(cursor.advance().await.unwrap(), Some(row("a")));
        assert_eq!(cursor.current(), Some(&row("b")));
        assert!(!cursor.is_done());

        assert_eq!(cursor.advance().await.unwrap(), Some(row("b")));
        assert!(cursor.current().is_none());
        assert!(cursor.is_done());

        // Done is permanent
        assert_eq!(cursor.advance().await.unwrap(), None);
        assert!(cursor.is_done());
    }

    #[tokio::test]
    async fn test_empty_stream_is_done_after_first_advance() {
        let mut cursor = SchemaCursor::from_rows(Vec::new());
        cursor.advance().await.unwrap();
        assert!(cursor.is_done());
        assert!(cursor.current().is_none());
    }

    #[tokio::test]
    async fn test_row_without_attributes_does_not_end_stream() {
        let mut cursor = SchemaCursor::from_rows(vec![SchemaRow::new(), row("a")]);
        cursor.advance().await.unwrap();
        assert!(!cursor.is_done());
        assert_eq!(cursor.current(), Some(&SchemaRow::new()));
    }

    #[tokio::test]
    async fn test_cursor_waits_for_slow_producer() {
        let (tx, rx) = mpsc::channel(1);
        let mut cursor = SchemaCursor::new(rx);

        let producer = tokio::spawn(async move {
            for name in ["a", "b", "c"] {
                tokio::task::yield_now().await;
                tx.send(Ok(row(name))).await.unwrap();
            }
        });

        let mut seen = Vec::new();
        cursor.advance().await.unwrap();
        while let Some(current) = cursor.current() {
            seen.push(current.attr("table_name").to_string());
            cursor.advance().await.unwrap();
        }
        producer.await.unwrap();

        assert_eq!(seen, vec!["a", "b", "c"]);
        assert!(cursor.is_done());
    }

    #[tokio::test]
    async fn test_producer_error_surfaces_and_stops_cursor() {
        let (tx, rx) = mpsc::channel(2);
        tx.send(Ok(row("a"))).await.unwrap();
        tx.send(Err(anyhow::anyhow!("query failed"))).await.unwrap();
        drop(tx);

        let mut cursor = SchemaCursor::new(rx);
        cursor.advance().await.unwrap();
        let err = cursor.advance().await.unwrap_err();
        assert!(err.to_string().contains("query failed"));
        assert!(cursor.is_done());
    }
}
