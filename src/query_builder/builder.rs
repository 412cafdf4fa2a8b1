use super::{Column, Condition, Pagination, RenderedSql, Sort, SqlSink, SqlValue};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder as SqlxQueryBuilder, Sqlite};

/// A conjunction of conditions over an always-true base.
///
/// One `Predicate` is rendered into both the listing and the count query, so
/// the two can never disagree about which rows match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conjoin a condition (AND)
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_always_true(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn write_to(&self, sink: &mut impl SqlSink) {
        sink.push_sql("1=1");
        for condition in &self.conditions {
            sink.push_sql(" AND ");
            condition.write_to(sink);
        }
    }

    pub fn to_rendered(&self) -> RenderedSql {
        let mut rendered = RenderedSql::default();
        self.write_to(&mut rendered);
        rendered
    }
}

/// Builds the SELECT and COUNT statements for one table from a shared
/// predicate, an allowlisted ordering and optional pagination.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: &'static str,
    predicate: Predicate,
    sort: Sort,
    pagination: Option<Pagination>,
}

impl QueryBuilder {
    /// Create a new query builder for the given table
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            predicate: Predicate::new(),
            sort: Sort::default(),
            pagination: None,
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn order_by(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    fn write_select(&self, sink: &mut impl SqlSink) {
        sink.push_sql(&format!(
            "SELECT {} FROM {} WHERE ",
            Column::select_list(),
            self.table
        ));
        self.predicate.write_to(sink);
        sink.push_sql(" ORDER BY ");
        sink.push_sql(&self.sort.to_sql());
        if let Some(pagination) = self.pagination {
            sink.push_sql(" LIMIT ");
            sink.push_value(SqlValue::Integer(i64::from(pagination.limit)));
            sink.push_sql(" OFFSET ");
            sink.push_value(SqlValue::Integer(i64::from(pagination.offset)));
        }
    }

    fn write_count(&self, sink: &mut impl SqlSink) {
        sink.push_sql(&format!("SELECT COUNT(*) FROM {} WHERE ", self.table));
        self.predicate.write_to(sink);
    }

    /// SELECT statement ready for execution
    pub fn build_select(&self) -> SqlxQueryBuilder<'static, Sqlite> {
        let mut builder = SqlxQueryBuilder::new("");
        self.write_select(&mut builder);
        builder
    }

    /// COUNT statement over the same predicate; ordering and pagination are ignored
    pub fn build_count(&self) -> SqlxQueryBuilder<'static, Sqlite> {
        let mut builder = SqlxQueryBuilder::new("");
        self.write_count(&mut builder);
        builder
    }

    pub fn select_sql(&self) -> RenderedSql {
        let mut rendered = RenderedSql::default();
        self.write_select(&mut rendered);
        rendered
    }

    pub fn count_sql(&self) -> RenderedSql {
        let mut rendered = RenderedSql::default();
        self.write_count(&mut rendered);
        rendered
    }

    /// Execute the query and return all rows
    pub async fn fetch_all<'e, E, T>(&self, executor: E) -> Result<Vec<T>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut builder = self.build_select();
        builder.build_query_as::<T>().fetch_all(executor).await
    }

    /// Execute count query
    pub async fn count<'e, E>(&self, executor: E) -> Result<i64, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let mut builder = self.build_count();
        builder.build_query_scalar::<i64>().fetch_one(executor).await
    }
}
