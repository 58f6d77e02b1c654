use sqlx::{QueryBuilder, Sqlite};


/// A `LIMIT`/`OFFSET` window over an ordered result set.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Pagination {
    /// Converts a 1-based `page` of `per_page` results into a window:
    /// the limit is `per_page`, and the offset is `per_page * (page - 1)`.
    ///
    /// Page `0` is treated like page `1`.
    pub fn from_page(per_page: u32, page: u32) -> Self {
        Self {
            limit: per_page,
            offset: per_page.saturating_mul(page.saturating_sub(1)),
        }
    }
}


/// Filtering and pagination applied to an index (list) query.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ListOptions {
    /// Only include records whose name contains this substring.
    /// An empty query is treated as no query.
    pub name_query: Option<String>,

    pub pagination: Option<Pagination>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name_query<S>(mut self, name_query: S) -> Self
    where
        S: Into<String>,
    {
        self.name_query = Some(name_query.into());
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}


/// Escapes `\`, `%` and `_` so the input matches literally
/// inside a `LIKE ... ESCAPE '\'` pattern.
pub fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}


/// Appends ` WHERE <name_column> LIKE ? ESCAPE '\'` (if there is a name query),
/// ` ORDER BY <order_by>` and the pagination window to `query_builder`.
pub(crate) fn push_list_options<'a>(
    query_builder: &mut QueryBuilder<'a, Sqlite>,
    list_options: &ListOptions,
    name_column: &str,
    order_by: &str,
) {
    if let Some(name_query) = list_options
        .name_query
        .as_deref()
        .filter(|query| !query.is_empty())
    {
        query_builder.push(" WHERE ");
        query_builder.push(name_column);
        query_builder.push(" LIKE ");
        query_builder.push_bind(format!(
            "%{}%",
            escape_like_wildcards(name_query)
        ));
        query_builder.push(" ESCAPE '\\'");
    }

    query_builder.push(" ORDER BY ");
    query_builder.push(order_by);

    if let Some(pagination) = list_options.pagination {
        query_builder.push(" LIMIT ");
        query_builder.push_bind(i64::from(pagination.limit));

        if pagination.offset > 0 {
            query_builder.push(" OFFSET ");
            query_builder.push_bind(i64::from(pagination.offset));
        }
    }
}
