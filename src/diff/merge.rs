// ABOUTME: Two-way merge over the source and target row streams
// ABOUTME: Classifies each key as added, dropped, or matched in a single ascending pass

use super::cursor::SchemaCursor;
use super::kind::{ChangeOptions, DiffOutcome, SchemaKind};
use super::row::SchemaRow;
use super::statement::Statement;
use anyhow::{bail, Context, Result};
use std::cmp::Ordering;

/// Counters for one merge run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Loop iterations, including the final one that observes both streams exhausted
    pub steps: usize,
    pub source_only: usize,
    pub target_only: usize,
    pub matched_same: usize,
    pub matched_changed: usize,
    /// Keys dropped from target, in stream order
    pub dropped_keys: Vec<String>,
}

impl DiffSummary {
    fn record(&mut self, outcome: DiffOutcome) {
        match outcome {
            DiffOutcome::SourceOnly => self.source_only += 1,
            DiffOutcome::TargetOnly => self.target_only += 1,
            DiffOutcome::MatchedSame => self.matched_same += 1,
            DiffOutcome::MatchedChanged => self.matched_changed += 1,
        }
    }

    /// Number of keys classified
    pub fn classified(&self) -> usize {
        self.source_only + self.target_only + self.matched_same + self.matched_changed
    }

    pub fn has_differences(&self) -> bool {
        self.source_only + self.target_only + self.matched_changed > 0
    }

    pub fn absorb(&mut self, other: DiffSummary) {
        self.steps += other.steps;
        self.source_only += other.source_only;
        self.target_only += other.target_only;
        self.matched_same += other.matched_same;
        self.matched_changed += other.matched_changed;
        self.dropped_keys.extend(other.dropped_keys);
    }
}

enum Advance {
    Source,
    Target,
    Both,
}

/// Walk both cursors in lockstep and append the resulting statements to `out`
///
/// The cursors must be freshly built; this positions them on their first rows. Each
/// iteration classifies exactly one key and advances one or both cursors past it, so a
/// run over streams of length `a` and `b` finishes within `a + b + 1` steps.
///
/// # Errors
///
/// Fails when a stream reports a query error, when a stream is not in strictly ascending
/// key order, or when a change emitter rejects malformed metadata.
pub async fn merge_diff(
    kind: SchemaKind,
    source: &mut SchemaCursor,
    target: &mut SchemaCursor,
    options: &ChangeOptions,
    out: &mut Vec<Statement>,
) -> Result<DiffSummary> {
    source
        .advance()
        .await
        .with_context(|| format!("Failed to read first {} row from source", kind))?;
    target
        .advance()
        .await
        .with_context(|| format!("Failed to read first {} row from target", kind))?;

    let mut summary = DiffSummary::default();

    loop {
        summary.steps += 1;

        let (advance, outcome) = match (source.current(), target.current()) {
            (None, None) => break,
            (Some(a), None) => {
                tracing::debug!("{} {} only in source", kind, kind.describe(a));
                kind.add(a, options, out);
                (Advance::Source, DiffOutcome::SourceOnly)
            }
            (None, Some(b)) => {
                let key = kind.describe(b);
                tracing::debug!("{} {} only in target", kind, key);
                kind.drop(b, options, out);
                summary.dropped_keys.push(key);
                (Advance::Target, DiffOutcome::TargetOnly)
            }
            (Some(a), Some(b)) => match kind.compare(a, b) {
                Ordering::Less => {
                    tracing::debug!("{} {} only in source", kind, kind.describe(a));
                    kind.add(a, options, out);
                    (Advance::Source, DiffOutcome::SourceOnly)
                }
                Ordering::Greater => {
                    let key = kind.describe(b);
                    tracing::debug!("{} {} only in target", kind, key);
                    kind.drop(b, options, out);
                    summary.dropped_keys.push(key);
                    (Advance::Target, DiffOutcome::TargetOnly)
                }
                Ordering::Equal => {
                    let emitted = out.len();
                    kind.change(a, b, options, out)?;
                    let outcome = if out.len() > emitted {
                        DiffOutcome::MatchedChanged
                    } else {
                        DiffOutcome::MatchedSame
                    };
                    tracing::debug!("{} {} matched ({:?})", kind, kind.describe(a), outcome);
                    (Advance::Both, outcome)
                }
            },
        };

        summary.record(outcome);

        match advance {
            Advance::Source => advance_in_order(kind, source, "source").await?,
            Advance::Target => advance_in_order(kind, target, "target").await?,
            Advance::Both => {
                advance_in_order(kind, source, "source").await?;
                advance_in_order(kind, target, "target").await?;
            }
        }
    }

    Ok(summary)
}

/// Advance `cursor` and verify the stream kept its ascending key order
async fn advance_in_order(kind: SchemaKind, cursor: &mut SchemaCursor, side: &str) -> Result<()> {
    let consumed = cursor
        .advance()
        .await
        .with_context(|| format!("Failed to read next {} row from {}", kind, side))?;

    if let (Some(previous), Some(next)) = (consumed.as_ref(), cursor.current()) {
        if kind.compare(previous, next) != Ordering::Less {
            bail!(
                "{} rows from {} are not in ascending key order: '{}' is followed by '{}'",
                kind,
                side,
                kind.describe(previous),
                kind.describe(next)
            );
        }
    }

    Ok(())
}

/// Diff two in-memory row lists
pub async fn diff_rows(
    kind: SchemaKind,
    source: Vec<SchemaRow>,
    target: Vec<SchemaRow>,
    options: &ChangeOptions,
) -> Result<(Vec<Statement>, DiffSummary)> {
    let mut source = SchemaCursor::from_rows(source);
    let mut target = SchemaCursor::from_rows(target);
    let mut out = Vec::new();
    let summary = merge_diff(kind, &mut source, &mut target, options, &mut out).await?;
    Ok((out, summary))
}
