use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::{Leave, LeaveDetails, Page, PageRequest};
use crate::database::repositories::{LeaveStore, UserStore};
use crate::error::AppError;

const DEFAULT_PAGE_SIZE: i64 = 10;

/// Read side of the leave service: paged, sortable listings joined with
/// requester/reviewer info.
#[derive(Clone)]
pub struct LeaveQueryService {
    leaves: Arc<dyn LeaveStore>,
    users: Arc<dyn UserStore>,
}

impl LeaveQueryService {
    pub fn new(leaves: Arc<dyn LeaveStore>, users: Arc<dyn UserStore>) -> Self {
        Self { leaves, users }
    }

    pub async fn my_leaves(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<Page<LeaveDetails>, AppError> {
        let opts = page.options(DEFAULT_PAGE_SIZE);
        let items = self.leaves.list_for_user(user_id, &opts).await?;
        let total = self.leaves.count_for_user(user_id).await?;
        Ok(Page::new(items, total, page.page(), opts.limit))
    }

    pub async fn all_leaves(&self, page: &PageRequest) -> Result<Page<LeaveDetails>, AppError> {
        let opts = page.options(DEFAULT_PAGE_SIZE);
        let items = self.leaves.list_all(&opts).await?;
        let total = self.leaves.count_all().await?;
        Ok(Page::new(items, total, page.page(), opts.limit))
    }

    /// A manager's team is everyone whose `manager` column points at them;
    /// the listing is then their leaves.
    pub async fn team_leaves(
        &self,
        manager_id: Uuid,
        page: &PageRequest,
    ) -> Result<Page<LeaveDetails>, AppError> {
        let team = self
            .users
            .list_by_manager(manager_id, &PageRequest::default().options(i64::MAX))
            .await?;
        let team_ids: Vec<Uuid> = team.iter().map(|u| u.id).collect();

        let opts = page.options(DEFAULT_PAGE_SIZE);
        let items = self.leaves.list_for_users(&team_ids, &opts).await?;
        let total = self.leaves.count_for_users(&team_ids).await?;
        Ok(Page::new(items, total, page.page(), opts.limit))
    }

    pub async fn leave_by_id(&self, id: Uuid) -> Result<Leave, AppError> {
        self.leaves
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Leave".into()))
    }
}
