//! 资源查询
//!
//! `ResourceQuery` 由两段组成：作用域（授权决定，必选）和过滤（请求决定，可选）。
//! 存储实现必须先应用作用域再应用过滤。

use std::cmp::Ordering;

use atrium_common::Pagination;

use super::resource::Resource;
use super::scope::ResourceScope;

/// 列表排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceOrdering {
    CreatedAtAsc,
    /// 最新创建在前
    #[default]
    CreatedAtDesc,
    TitleAsc,
    TitleDesc,
}

impl ResourceOrdering {
    /// 无法识别的取值回退为默认排序
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("created_at") => Self::CreatedAtAsc,
            Some("-created_at") => Self::CreatedAtDesc,
            Some("title") => Self::TitleAsc,
            Some("-title") => Self::TitleDesc,
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAtAsc => "created_at",
            Self::CreatedAtDesc => "-created_at",
            Self::TitleAsc => "title",
            Self::TitleDesc => "-title",
        }
    }

    /// 同值时按 id 排序，保证分页稳定
    pub fn compare(&self, a: &Resource, b: &Resource) -> Ordering {
        let primary = match self {
            Self::CreatedAtAsc => a.audit_info.created_at.cmp(&b.audit_info.created_at),
            Self::CreatedAtDesc => b.audit_info.created_at.cmp(&a.audit_info.created_at),
            Self::TitleAsc => a.title.cmp(&b.title),
            Self::TitleDesc => b.title.cmp(&a.title),
        };
        primary.then_with(|| match self {
            Self::CreatedAtAsc | Self::TitleAsc => a.id.0.cmp(&b.id.0),
            Self::CreatedAtDesc | Self::TitleDesc => b.id.0.cmp(&a.id.0),
        })
    }
}

/// 请求方可选的过滤条件
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    /// 标题子串，大小写不敏感
    pub search: Option<String>,
    pub ordering: ResourceOrdering,
    pub pagination: Pagination,
}

impl ResourceFilter {
    /// 空白搜索词视为未设置
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        match self.search_term() {
            Some(term) => resource
                .title
                .to_lowercase()
                .contains(&term.to_lowercase()),
            None => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResourceQuery {
    pub scope: ResourceScope,
    pub filter: ResourceFilter,
}

impl ResourceQuery {
    pub fn new(scope: ResourceScope, filter: ResourceFilter) -> Self {
        Self { scope, filter }
    }

    pub fn admits(&self, resource: &Resource) -> bool {
        self.scope.admits(resource) && self.filter.matches(resource)
    }
}
