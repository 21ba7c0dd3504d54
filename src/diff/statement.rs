// ABOUTME: Output records produced by the change emitters
// ABOUTME: Renders DDL statements and warning comments as a SQL script or JSON

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// A single line of generated output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Statement {
    /// A DDL statement, already terminated by `;`
    Sql(String),
    /// An advisory comment for the operator reviewing the script
    Warning(String),
}

impl Statement {
    pub fn sql(text: impl Into<String>) -> Self {
        Statement::Sql(text.into())
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Statement::Warning(text.into())
    }

    pub fn is_sql(&self) -> bool {
        matches!(self, Statement::Sql(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Statement::Warning(_))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Sql(text) => write!(f, "{}", text),
            Statement::Warning(text) => write!(f, "-- WARNING: {}", text),
        }
    }
}

/// Output format for a generated script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain SQL with warnings as comments
    #[default]
    Sql,
    /// JSON array of statement records
    Json,
}

/// Write statements to `out` in emission order, one per line
pub fn write_sql<W: Write>(statements: &[Statement], out: &mut W) -> Result<()> {
    for statement in statements {
        writeln!(out, "{}", statement).context("Failed to write generated SQL")?;
    }
    Ok(())
}

/// Write statements as a pretty-printed JSON array
pub fn write_json<W: Write>(statements: &[Statement], out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, statements)
        .context("Failed to serialize statements as JSON")?;
    writeln!(out).context("Failed to write generated JSON")?;
    Ok(())
}

pub fn write_statements<W: Write>(
    statements: &[Statement],
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Sql => write_sql(statements, out),
        OutputFormat::Json => write_json(statements, out),
    }
}
