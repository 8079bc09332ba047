use crate::domain::entity::user::User;

/// ProjectScope はダッシュボードのプロジェクト系クエリに適用する可視範囲。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectScope {
    /// 全プロジェクト（管理者）。
    Unscoped,
    /// 指定ユーザーがクライアントであるプロジェクト。
    ClientOf(i64),
    /// 指定ユーザーが編集権限付きメンバーであるプロジェクト。
    EditableBy(i64),
}

/// WorkItemScope はステータス別件数・月別件数に適用する可視範囲。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkItemScope {
    Unscoped,
    AssignedTo(i64),
}

/// DashboardScope はユーザーのロールから一度だけ解決される可視範囲の組。
/// 個々のクエリはロールを見ずに、ここから得た述語だけを使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardScope {
    pub user_id: i64,
    pub projects: ProjectScope,
    pub work_items: WorkItemScope,
}

impl DashboardScope {
    pub fn resolve(user: &User) -> Self {
        let (projects, work_items) = if user.has_admin_access() {
            (ProjectScope::Unscoped, WorkItemScope::Unscoped)
        } else if user.is_client {
            (
                ProjectScope::ClientOf(user.id),
                WorkItemScope::AssignedTo(user.id),
            )
        } else {
            (
                ProjectScope::EditableBy(user.id),
                WorkItemScope::AssignedTo(user.id),
            )
        };
        Self {
            user_id: user.id,
            projects,
            work_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> User {
        User::new(id, "Grace", "Hopper", "grace@example.com")
    }

    #[test]
    fn admin_is_unscoped() {
        let mut u = user(3);
        u.is_admin = true;
        let scope = DashboardScope::resolve(&u);
        assert_eq!(scope.projects, ProjectScope::Unscoped);
        assert_eq!(scope.work_items, WorkItemScope::Unscoped);
    }

    #[test]
    fn client_sees_own_client_projects() {
        let mut u = user(4);
        u.is_client = true;
        let scope = DashboardScope::resolve(&u);
        assert_eq!(scope.projects, ProjectScope::ClientOf(4));
        assert_eq!(scope.work_items, WorkItemScope::AssignedTo(4));
    }

    #[test]
    fn member_sees_editable_projects() {
        let scope = DashboardScope::resolve(&user(5));
        assert_eq!(scope.projects, ProjectScope::EditableBy(5));
        assert_eq!(scope.user_id, 5);
    }
}
