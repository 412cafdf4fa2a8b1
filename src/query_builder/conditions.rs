use super::Column;
use sqlx::{QueryBuilder as SqlxQueryBuilder, Sqlite};

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

/// Destination for rendered SQL: either a live `sqlx::QueryBuilder` or a
/// plain [`RenderedSql`] used for inspection. Both go through the same
/// rendering code.
pub trait SqlSink {
    fn push_sql(&mut self, sql: &str);
    fn push_value(&mut self, value: SqlValue);
}

impl<'args> SqlSink for SqlxQueryBuilder<'args, Sqlite> {
    fn push_sql(&mut self, sql: &str) {
        self.push(sql);
    }

    fn push_value(&mut self, value: SqlValue) {
        match value {
            SqlValue::Text(text) => {
                self.push_bind(text);
            }
            SqlValue::Integer(number) => {
                self.push_bind(number);
            }
        }
    }
}

/// SQL text with `?` placeholders and the parameters in bind order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedSql {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl SqlSink for RenderedSql {
    fn push_sql(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    fn push_value(&mut self, value: SqlValue) {
        self.sql.push('?');
        self.params.push(value);
    }
}

/// Comparison kinds supported by the predicate builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `column = ?`
    Equals { column: Column, value: SqlValue },
    /// `<column>_key LIKE ? ESCAPE '\'` against the case-folded shadow column,
    /// with the folded needle wrapped in `%`
    ContainsIgnoreCase { column: Column, needle: String },
    /// `column >= ?`
    AtLeast { column: Column, value: SqlValue },
    /// `column <= ?`
    AtMost { column: Column, value: SqlValue },
    /// `column > 0`
    Positive { column: Column },
}

impl Condition {
    pub fn equals(column: Column, value: impl Into<SqlValue>) -> Self {
        Condition::Equals {
            column,
            value: value.into(),
        }
    }

    pub fn contains_ignore_case(column: Column, needle: &str) -> Self {
        Condition::ContainsIgnoreCase {
            column,
            needle: needle.to_string(),
        }
    }

    pub fn at_least(column: Column, value: impl Into<SqlValue>) -> Self {
        Condition::AtLeast {
            column,
            value: value.into(),
        }
    }

    pub fn at_most(column: Column, value: impl Into<SqlValue>) -> Self {
        Condition::AtMost {
            column,
            value: value.into(),
        }
    }

    pub fn write_to(&self, sink: &mut impl SqlSink) {
        match self {
            Condition::Equals { column, value } => {
                sink.push_sql(&format!("{column} = "));
                sink.push_value(value.clone());
            }
            Condition::ContainsIgnoreCase { column, needle } => {
                let key = column.search_key().unwrap_or(*column);
                sink.push_sql(&format!("{key} LIKE "));
                sink.push_value(SqlValue::Text(like_pattern(&fold_case(needle))));
                sink.push_sql(" ESCAPE '\\'");
            }
            Condition::AtLeast { column, value } => {
                sink.push_sql(&format!("{column} >= "));
                sink.push_value(value.clone());
            }
            Condition::AtMost { column, value } => {
                sink.push_sql(&format!("{column} <= "));
                sink.push_value(value.clone());
            }
            Condition::Positive { column } => {
                sink.push_sql(&format!("{column} > 0"));
            }
        }
    }

    pub fn to_rendered(&self) -> RenderedSql {
        let mut rendered = RenderedSql::default();
        self.write_to(&mut rendered);
        rendered
    }
}

/// Unicode case folding applied to stored search keys and to needles.
/// SQLite's own `LOWER` and `LIKE` only fold ASCII.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// `%needle%` with LIKE metacharacters escaped so the needle matches literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
