//! Networked property dump
//!
//! The host describes each server class by a send table: a named list of
//! properties, some of which are nested tables. Classes arrive as JSON from
//! the host bridge.

use serde::{Deserialize, Serialize};

use super::{CommandArgs, ConsoleOutput};
use crate::registry::parse_int;

/// Depth used when `dump_netprops` gets no argument
pub const DEFAULT_DEPTH: i32 = 1;

/// A networked entity class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerClass {
    pub name: String,
    pub class_id: i32,
    #[serde(default)]
    pub table: Option<SendTable>,
}

/// Ordered list of properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendTable {
    pub name: String,
    #[serde(default)]
    pub props: Vec<SendProp>,
}

/// One networked property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendProp {
    pub name: String,
    pub offset: i32,
    #[serde(flatten)]
    pub kind: SendPropKind,
}

/// Property type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SendPropKind {
    Int,
    Float,
    Vector,
    #[serde(rename = "vector2d")]
    VectorXY,
    String,
    Array { elements: i32 },
    DataTable { table: Option<SendTable> },
    Int64,
    #[serde(other)]
    Unknown,
}

impl SendPropKind {
    /// Type name as printed in the dump
    pub fn type_name(&self) -> String {
        match self {
            Self::Int => "int".to_string(),
            Self::Float => "float".to_string(),
            Self::Vector => "vector".to_string(),
            Self::VectorXY => "vector2d".to_string(),
            Self::String => "string".to_string(),
            Self::Array { elements } => format!("array[{}]", elements),
            Self::DataTable { .. } => "datatable".to_string(),
            Self::Int64 => "int64".to_string(),
            Self::Unknown => "unknown".to_string(),
        }
    }
}

impl ServerClass {
    /// Parse a JSON array of classes
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Prints `table` and, while `depth` allows, the tables nested in it.
/// A depth of 0 prints nothing; a negative depth never runs out.
fn dump_table(table: &SendTable, level: usize, depth: i32, out: &mut dyn ConsoleOutput) {
    if depth == 0 {
        return;
    }

    let indent = level * 2;
    out.msg(&format!(
        "{:>indent$}Table: {} [{} props]",
        "",
        table.name,
        table.props.len()
    ));

    let child_depth = if depth > 0 { depth - 1 } else { depth };
    for prop in &table.props {
        out.msg(&format!(
            "{:>width$}- {} (offset: {}, type: {})",
            "",
            prop.name,
            prop.offset,
            prop.kind.type_name(),
            width = indent + 2
        ));

        if let SendPropKind::DataTable { table: Some(child) } = &prop.kind {
            dump_table(child, level + 1, child_depth, out);
        }
    }
}

/// Print the send tables of every class
///
/// An optional argument sets how many table levels are expanded: 0 prints
/// only the `Class:` lines, a negative value expands everything.
/// Returns how many classes were printed.
pub fn dump_netprops(
    classes: &[ServerClass],
    args: &CommandArgs,
    out: &mut dyn ConsoleOutput,
) -> usize {
    let depth = if args.arg_count() >= 2 {
        parse_int(args.arg(1))
    } else {
        DEFAULT_DEPTH
    };

    for class in classes {
        out.msg(&format!("Class: {} [{}]", class.name, class.class_id));
        if let Some(table) = &class.table {
            dump_table(table, 0, depth, out);
        }
        out.msg("");
    }

    classes.len()
}
