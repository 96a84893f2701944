use std::collections::BTreeMap;

use fresh_core::{ColumnId, FailureSet, ValidationFailure};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{ColumnArgs, TableArgs};
use crate::context::AppContext;
use crate::output::output;

/// One failing rule. An empty list means every checked attachment is valid.
#[derive(Debug, Serialize)]
struct FailureRow {
    column: ColumnId,
    failure: ValidationFailure,
    cause: String,
}

/// Handle `fresh validate`.
pub fn validate(args: &ColumnArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let failures = ctx.registry.validate(&args.table, &args.column)?;
    let results = BTreeMap::from([(args.column.clone(), failures)]);
    output(&failure_rows(&results), flags.format)
}

/// Handle `fresh validate-all`.
pub fn validate_all(args: &TableArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let results = ctx.registry.validate_all(&args.table)?;
    output(&failure_rows(&results), flags.format)
}

fn failure_rows(results: &BTreeMap<ColumnId, FailureSet>) -> Vec<FailureRow> {
    results
        .iter()
        .flat_map(|(column, failures)| {
            failures.iter().map(move |(failure, cause)| FailureRow {
                column: column.clone(),
                failure,
                cause: cause.to_string(),
            })
        })
        .collect()
}
