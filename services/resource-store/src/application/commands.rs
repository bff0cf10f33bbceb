//! 命令与查询定义

use atrium_common::Pagination;
use atrium_config::PaginationConfig;
use atrium_errors::{AppError, AppResult};
use serde_json::Value;

use crate::domain::resource::{ResourceFilter, ResourceId, ResourceOrdering, ResourcePatch};

/// 创建资源命令；请求体中的所有者字段不会进入命令
#[derive(Debug, Clone, Default)]
pub struct CreateResourceCommand {
    pub title: Option<String>,
    pub data: Option<Value>,
}

impl CreateResourceCommand {
    /// 拆出必填的 `title` 与可选的 `data`
    pub fn into_parts(self) -> AppResult<(String, Option<Value>)> {
        let Self { title, data } = self;
        Ok((required_title(title)?, data))
    }
}

/// 部分更新
#[derive(Debug, Clone)]
pub struct UpdateResourceCommand {
    pub id: ResourceId,
    pub title: Option<String>,
    pub data: Option<Value>,
}

impl UpdateResourceCommand {
    pub fn to_patch(&self) -> AppResult<ResourcePatch> {
        ResourcePatch::partial(self.title.as_deref(), self.data.clone())
    }
}

/// 整体替换
#[derive(Debug, Clone)]
pub struct ReplaceResourceCommand {
    pub id: ResourceId,
    pub title: Option<String>,
    pub data: Option<Value>,
}

impl ReplaceResourceCommand {
    pub fn to_patch(&self) -> AppResult<ResourcePatch> {
        let title = required_title(self.title.clone())?;
        ResourcePatch::replacement(&title, self.data.clone())
    }
}

fn required_title(title: Option<String>) -> AppResult<String> {
    title.ok_or_else(|| AppError::validation("title: This field is required."))
}

#[derive(Debug, Clone, Default)]
pub struct ListResourcesQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl ListResourcesQuery {
    pub fn to_filter(&self, config: &PaginationConfig) -> ResourceFilter {
        ResourceFilter {
            search: self.search.clone(),
            ordering: ResourceOrdering::parse(self.ordering.as_deref()),
            pagination: Pagination::from_request(
                self.page,
                self.page_size,
                config.default_page_size,
                config.max_page_size,
            ),
        }
    }
}

/// 创建用户命令（管理员）
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub username: String,
    pub password: String,
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_title_is_validation_error() {
        let cmd = CreateResourceCommand::default();
        assert!(matches!(cmd.into_parts(), Err(AppError::Validation(_))));

        let cmd = ReplaceResourceCommand {
            id: ResourceId::new(),
            title: None,
            data: None,
        };
        assert!(matches!(cmd.to_patch(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_create_parts_keep_data() {
        let cmd = CreateResourceCommand {
            title: Some("Test".to_string()),
            data: Some(serde_json::json!({"x": 1})),
        };
        let (title, data) = cmd.into_parts().unwrap();
        assert_eq!(title, "Test");
        assert_eq!(data, Some(serde_json::json!({"x": 1})));
    }

    #[test]
    fn test_list_query_clamps_page_size() {
        let config = PaginationConfig::default();
        let query = ListResourcesQuery {
            page_size: Some(1000),
            ordering: Some("title".to_string()),
            ..Default::default()
        };
        let filter = query.to_filter(&config);

        assert_eq!(filter.pagination.page, 1);
        assert_eq!(filter.pagination.page_size, 100);
        assert_eq!(filter.ordering, ResourceOrdering::TitleAsc);

        let filter = ListResourcesQuery::default().to_filter(&config);
        assert_eq!(filter.pagination.page_size, 10);
        assert_eq!(filter.ordering, ResourceOrdering::CreatedAtDesc);
    }
}
