//! Pagination parameters for list endpoints

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: i64 = 25;
pub const MAX_LIMIT: i64 = 100;

/// Limit/offset pagination with an optional sort key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of records to return
    #[serde(default = "default_limit")]
    pub count: i64,
    /// Offset of the first record
    #[serde(default)]
    pub start: i64,
    /// Sort column key
    #[serde(rename = "sortBy", default)]
    pub sort_by: Option<String>,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            count: DEFAULT_LIMIT,
            start: 0,
            sort_by: None,
        }
    }
}

impl Pagination {
    /// Clamp the requested window to sane bounds
    pub fn clamped(&self) -> (i64, i64) {
        let limit = if self.count < 1 {
            DEFAULT_LIMIT
        } else {
            self.count.min(MAX_LIMIT)
        };
        let offset = self.start.max(0);
        (limit, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped() {
        assert_eq!(Pagination::default().clamped(), (DEFAULT_LIMIT, 0));

        let p = Pagination {
            count: 0,
            start: -5,
            sort_by: None,
        };
        assert_eq!(p.clamped(), (DEFAULT_LIMIT, 0));

        let p = Pagination {
            count: 10_000,
            start: 50,
            sort_by: Some("created".into()),
        };
        assert_eq!(p.clamped(), (MAX_LIMIT, 50));
    }
}
