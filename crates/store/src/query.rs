use crate::error::StoreError;
use crate::model::Comment;

/// Specifies the direction for ordering query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// A validated ordering clause. `column` is always one of the declared
/// comment columns, never raw client input.
#[derive(Debug, Clone, Copy)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: OrderDirection,
}

impl Default for OrderBy {
    fn default() -> Self {
        Self {
            column: "created_at",
            direction: OrderDirection::Asc,
        }
    }
}

impl OrderBy {
    /// Parses an `ordering` query value such as `created_at` or
    /// `-likes_comments`. A leading `-` flips the direction to descending.
    /// Anything that is not a comment column is rejected.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let (name, direction) = match raw.strip_prefix('-') {
            Some(rest) => (rest, OrderDirection::Desc),
            None => (raw, OrderDirection::Asc),
        };

        let column = Comment::COLUMNS
            .iter()
            .find(|column| **column == name)
            .copied()
            .ok_or_else(|| StoreError::InvalidOrdering(raw.to_string()))?;

        Ok(Self { column, direction })
    }
}

/// Filters for listing comments. `None` means unfiltered, creation order.
#[derive(Debug, Clone, Default)]
pub struct CommentQuery {
    pub search: Option<String>,
    pub ordering: Option<OrderBy>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ascending_column() {
        let order_by = OrderBy::parse("created_at").unwrap();
        assert_eq!(order_by.column, "created_at");
        assert_eq!(order_by.direction, OrderDirection::Asc);
    }

    #[test]
    fn parses_descending_column() {
        let order_by = OrderBy::parse("-likes_comments").unwrap();
        assert_eq!(order_by.column, "likes_comments");
        assert_eq!(order_by.direction, OrderDirection::Desc);
    }

    #[test]
    fn parses_user_column() {
        let order_by = OrderBy::parse("user").unwrap();
        assert_eq!(order_by.column, "user");
        assert_eq!(order_by.direction, OrderDirection::Asc);
    }

    #[test]
    fn rejects_unknown_column() {
        assert!(matches!(
            OrderBy::parse("likes"),
            Err(StoreError::InvalidOrdering(_))
        ));
        assert!(matches!(
            OrderBy::parse("-nope"),
            Err(StoreError::InvalidOrdering(_))
        ));
        assert!(matches!(
            OrderBy::parse(""),
            Err(StoreError::InvalidOrdering(_))
        ));
    }
}
