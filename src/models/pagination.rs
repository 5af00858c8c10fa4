//! Page/size query parameters shared by list endpoints.

use serde::Deserialize;

/// Pagination parameters, read from `?page=..&per_page=..`.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane bounds and convert to SQL `(LIMIT, OFFSET)`.
    pub fn limit_offset(self) -> (i64, i64) {
        let page = self.page.max(1);
        let per_page = self.per_page.clamp(1, 100);
        (per_page as i64, (page as i64 - 1) * per_page as i64)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn zero_values_clamp_to_first_page() {
        let (limit, offset) = Pagination { page: 0, per_page: 0 }.limit_offset();
        assert_eq!(limit, 1);
        assert_eq!(offset, 0);
    }

    #[test]
    fn page_size_has_an_upper_bound() {
        let (limit, offset) = Pagination { page: 5, per_page: 1000 }.limit_offset();
        assert_eq!(limit, 100);
        assert_eq!(offset, 400);
    }

    #[test]
    fn default_values_are_sane() {
        let (limit, offset) = Pagination::default().limit_offset();
        assert_eq!(limit, 20);
        assert_eq!(offset, 0);
    }
}
