//! 通用类型定义

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// 时间戳信息
///
/// `updated_at` 在每次变更时刷新，`created_at` 创建后不变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuditInfo {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for AuditInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// 分页参数（页码从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// 根据请求参数构造分页，page_size 缺省时取默认值，超出上限时截断
    pub fn from_request(
        page: Option<u32>,
        page_size: Option<u32>,
        default_page_size: u32,
        max_page_size: u32,
    ) -> Self {
        let page_size = page_size
            .filter(|size| *size > 0)
            .unwrap_or(default_page_size)
            .min(max_page_size)
            .max(1);
        Self {
            page: page.unwrap_or(1),
            page_size,
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// 分页结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: u64, pagination: &Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size)) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_clamp() {
        let p = Pagination::from_request(None, None, 10, 100);
        assert_eq!(p, Pagination::new(1, 10));

        let p = Pagination::from_request(Some(3), Some(500), 10, 100);
        assert_eq!(p.page_size, 100);
        assert_eq!(p.offset(), 200);

        let p = Pagination::from_request(Some(2), Some(0), 10, 100);
        assert_eq!(p.page_size, 10);
    }

    #[test]
    fn test_paged_result_pages() {
        let pagination = Pagination::new(1, 10);
        let result = PagedResult::new(vec![1, 2, 3], 25, &pagination);
        assert_eq!(result.total_pages(), 3);
        assert!(result.has_next());
        assert!(!result.has_previous());

        let empty: PagedResult<i32> = PagedResult::new(vec![], 0, &pagination);
        assert_eq!(empty.total_pages(), 0);
        assert!(!empty.has_next());
    }

    #[test]
    fn test_user_id_roundtrip_string() {
        let id = UserId::new();
        let parsed = UserId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }
}
