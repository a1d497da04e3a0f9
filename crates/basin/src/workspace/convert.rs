//! Conversion from workspace wire types to canonical records.

use crate::source::{PageRecord, WorkspaceRecord, WorkspaceUserRecord};

use super::types::{WorkspaceMember, WorkspacePage, WorkspaceSpace};

pub fn to_workspace_record(space: &WorkspaceSpace) -> WorkspaceRecord {
    WorkspaceRecord {
        id: space.key.clone(),
        name: space.name.clone(),
        description: space.description.clone(),
    }
}

pub fn to_page_record(page: &WorkspacePage, workspace_id: &str) -> PageRecord {
    PageRecord {
        id: page.id.clone(),
        workspace_id: workspace_id.to_string(),
        title: page.title.clone(),
        version: page.version.as_ref().map_or(1, |v| v.number),
        author: page.version.as_ref().and_then(|v| v.author_id.clone()),
        created_at: page.created_at,
        updated_at: page.updated_at,
    }
}

pub fn to_workspace_user_record(member: &WorkspaceMember, workspace_id: &str) -> WorkspaceUserRecord {
    WorkspaceUserRecord {
        id: member.account_id.clone(),
        workspace_id: workspace_id.to_string(),
        display_name: member.display_name.clone(),
        email: member.email.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::types::WorkspacePageVersion;

    #[test]
    fn page_conversion_defaults_version_to_one() {
        let page = WorkspacePage {
            id: "p1".to_string(),
            title: "Home".to_string(),
            version: None,
            created_at: None,
            updated_at: None,
        };
        let record = to_page_record(&page, "DOCS");
        assert_eq!(record.version, 1);
        assert_eq!(record.workspace_id, "DOCS");
    }

    #[test]
    fn page_conversion_takes_author_from_version() {
        let page = WorkspacePage {
            id: "p1".to_string(),
            title: "Home".to_string(),
            version: Some(WorkspacePageVersion {
                number: 4,
                author_id: Some("u9".to_string()),
            }),
            created_at: None,
            updated_at: None,
        };
        let record = to_page_record(&page, "DOCS");
        assert_eq!(record.version, 4);
        assert_eq!(record.author.as_deref(), Some("u9"));
    }
}
