//! Logical names → target identifiers and type tokens.

use crate::model::{ARRAY_CAPACITY, Column, ColumnType};

/// `snake_head` → `SnakeheadTable`.
///
/// Separators are dropped, the first letter is upper-cased and the rest
/// lower-cased, so `highScore` and `highscore` normalize identically.
pub fn type_name(table: &str) -> String {
    let mut chars = table
        .chars()
        .filter(|c| !is_separator(*c))
        .flat_map(char::to_lowercase);

    let mut out = String::with_capacity(table.len() + 5);
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
    }
    out.extend(chars);
    out.push_str("Table");
    out
}

fn is_separator(c: char) -> bool {
    c == '_' || c == '-' || c.is_whitespace()
}

/// `ball_radius` → `BALL_RADIUS`.
pub fn constant_name(key: &str) -> String {
    key.to_uppercase()
}

/// C declaration parts for a column: type token and optional array extent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CColumn<'a> {
    pub token: &'a str,
    pub extent: Option<usize>,
}

pub fn c_column(column: &Column) -> CColumn<'_> {
    match &column.ty {
        ColumnType::Token(token) => CColumn {
            token,
            extent: None,
        },
        ColumnType::Array => CColumn {
            token: "int",
            extent: Some(ARRAY_CAPACITY),
        },
    }
}

/// JSDoc type for a column. Unknown tokens are left untyped.
pub fn js_column(column: &Column) -> &'static str {
    match &column.ty {
        ColumnType::Array => "number[]",
        ColumnType::Token(token) => match token.as_str() {
            "bool" | "_Bool" => "boolean",
            "int" | "float" | "double" | "long" | "short" | "char" | "unsigned" | "int8_t"
            | "int16_t" | "int32_t" | "int64_t" | "uint8_t" | "uint16_t" | "uint32_t"
            | "uint64_t" | "size_t" => "number",
            _ => "*",
        },
    }
}
