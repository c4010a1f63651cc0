//! # Cursor
//!
//! A lazy, one-shot, forward-only view over query results.
//!
//! ```text
//! ┌──────────────────────┐   bounded mpsc    ┌──────────────────────┐
//! │  row task (spawned)  │ ────────────────► │  Cursor (caller)     │
//! │  fetch() row stream  │  cursor_buffer    │  next() / Stream     │
//! │  decode projection   │  rows in flight   │  collect()           │
//! └──────────────────────┘                   └──────────────────────┘
//! ```
//!
//! Rows are decoded as they are read. Dropping the cursor stops the task at
//! its next send and returns the connection to the pool. The task holds a
//! pool connection while rows remain, so on a single-connection pool drain
//! or drop a cursor before issuing the next statement.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::{Stream, StreamExt};
use inventory_core::{Column, Product, Record, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tokio::sync::mpsc;

use crate::error::{DbError, DbResult};
use crate::repository::bind_value;

/// Query results, streamed from a background task.
#[derive(Debug)]
pub struct Cursor {
    rx: mpsc::Receiver<DbResult<Record>>,
    columns: Vec<Column>,
}

impl Cursor {
    /// Starts streaming `sql` with `values` bound, decoding `columns`.
    pub(crate) fn spawn(
        pool: SqlitePool,
        sql: String,
        values: Vec<Value>,
        columns: Vec<Column>,
        buffer: usize,
    ) -> Self {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let task_columns = columns.clone();

        tokio::spawn(async move {
            let mut query = sqlx::query(&sql);
            for value in values {
                query = bind_value(query, value);
            }

            let mut rows = query.fetch(&pool);
            while let Some(row) = rows.next().await {
                let item = row
                    .map_err(DbError::from)
                    .and_then(|row| decode_record(&row, &task_columns));
                let failed = item.is_err();

                // Receiver gone: the caller dropped the cursor
                if tx.send(item).await.is_err() || failed {
                    break;
                }
            }
        });

        Cursor { rx, columns }
    }

    /// Columns present in each record.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Next record, or `None` once exhausted.
    pub async fn next(&mut self) -> Option<DbResult<Record>> {
        self.rx.recv().await
    }

    /// Reads every remaining record. Stops at the first error.
    pub async fn collect(mut self) -> DbResult<Vec<Record>> {
        let mut records = Vec::new();
        while let Some(record) = self.rx.recv().await {
            records.push(record?);
        }
        Ok(records)
    }

    /// Reads every remaining record as a full product.
    ///
    /// Records missing a projected column are skipped, so this is only
    /// meaningful for full projections.
    pub async fn products(self) -> DbResult<Vec<Product>> {
        Ok(self
            .collect()
            .await?
            .into_iter()
            .filter_map(Record::into_product)
            .collect())
    }
}

impl Stream for Cursor {
    type Item = DbResult<Record>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

/// Decodes the projected columns of one row, by position.
fn decode_record(row: &SqliteRow, columns: &[Column]) -> DbResult<Record> {
    let mut record = Record::default();
    for (index, column) in columns.iter().enumerate() {
        let value = if column.is_integer() {
            Value::Integer(row.try_get::<i64, _>(index)?)
        } else {
            Value::Text(row.try_get::<String, _>(index)?)
        };
        record.set(*column, value);
    }
    Ok(record)
}
