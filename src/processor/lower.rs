//! Raw spec → IR.
//!
//! Resolves everything the emitters should not have to think about:
//! target type names, function kinds and element-wise copy flags.

use std::collections::HashMap;

use tracing::debug;

use crate::error::LoadError;
use crate::model::{
    ARRAY_TAG, Column, ColumnType, DEFAULT_PROJECT_NAME, Function, FunctionKind, Procedure,
    Project, RawColumn, RawFunction, RawSpec, RawTable, Table,
};

use super::naming;

pub fn lower(raw: &RawSpec) -> Result<Project, LoadError> {
    let name = raw
        .project_name
        .clone()
        .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());

    let tables = lower_tables(raw)?;

    let functions = raw
        .functions
        .iter()
        .map(|(name, f)| lower_function(name, f))
        .collect();

    let procedures = raw
        .procedures
        .iter()
        .map(|(name, steps)| Procedure {
            name: name.clone(),
            steps: steps.clone(),
        })
        .collect();

    Ok(Project {
        name,
        config: raw.config.clone(),
        tables,
        functions,
        procedures,
    })
}

fn lower_tables(raw: &RawSpec) -> Result<Vec<Table>, LoadError> {
    // type name -> table that claimed it first
    let mut claimed: HashMap<String, &str> = HashMap::new();
    let mut tables = Vec::with_capacity(raw.tables.len());

    for (name, table) in &raw.tables {
        let type_name = naming::type_name(name);
        if let Some(first) = claimed.get(&type_name) {
            return Err(LoadError::NameCollision {
                first: first.to_string(),
                second: name.clone(),
                type_name,
            });
        }
        claimed.insert(type_name.clone(), name);
        tables.push(lower_table(name, type_name, table));
    }

    Ok(tables)
}

fn lower_table(name: &str, type_name: String, table: &RawTable) -> Table {
    let columns = table
        .columns
        .iter()
        .map(|(col, raw)| lower_column(col, raw))
        .collect();
    debug!("table {name} -> {type_name}");
    Table {
        name: name.to_string(),
        type_name,
        columns,
    }
}

fn lower_column(name: &str, raw: &RawColumn) -> Column {
    let (tag, explicit) = match raw {
        RawColumn::Token(tag) => (tag.as_str(), None),
        RawColumn::Detailed { ty, elementwise } => (ty.as_str(), *elementwise),
    };
    let ty = if tag == ARRAY_TAG {
        ColumnType::Array
    } else {
        ColumnType::Token(tag.to_string())
    };
    let elementwise = explicit.unwrap_or(ty == ColumnType::Array);
    Column {
        name: name.to_string(),
        ty,
        elementwise,
    }
}

fn lower_function(name: &str, raw: &RawFunction) -> Function {
    let kind = raw.kind.unwrap_or_else(|| infer_kind(name, raw));
    Function {
        name: name.to_string(),
        kind,
        inputs: raw.inputs.clone(),
        outputs: raw.outputs.clone(),
    }
}

/// Fallback for specs without an explicit `kind`. Only a leading `Init`
/// marks an initializer, so `ReInitialize` stays an update.
fn infer_kind(name: &str, raw: &RawFunction) -> FunctionKind {
    if name.starts_with("Init") {
        FunctionKind::Init
    } else if raw.outputs.is_empty() {
        FunctionKind::Generic
    } else {
        FunctionKind::Update
    }
}
