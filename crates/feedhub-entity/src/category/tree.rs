//! Category tree structures for hierarchical display.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Category;

/// A node in a category tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    /// Category ID.
    pub id: Uuid,
    /// Category name.
    pub name: String,
    /// Full path.
    pub path: String,
    /// Child nodes, ordered by name.
    pub children: Vec<CategoryNode>,
}

/// Assemble a flat category list into root nodes.
///
/// Categories whose parent is missing from the list are treated as roots.
pub fn build_tree(categories: &[Category]) -> Vec<CategoryNode> {
    let known: std::collections::HashSet<Uuid> = categories.iter().map(|c| c.id).collect();
    let mut children: HashMap<Option<Uuid>, Vec<&Category>> = HashMap::new();
    for category in categories {
        let parent = category.parent_id.filter(|p| known.contains(p));
        children.entry(parent).or_default().push(category);
    }
    build_level(&children, None)
}

fn build_level(
    children: &HashMap<Option<Uuid>, Vec<&Category>>,
    parent: Option<Uuid>,
) -> Vec<CategoryNode> {
    let mut level: Vec<&Category> = children.get(&parent).cloned().unwrap_or_default();
    level.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    level
        .into_iter()
        .map(|c| CategoryNode {
            id: c.id,
            name: c.name.clone(),
            path: c.path.clone(),
            children: build_level(children, Some(c.id)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(name: &str, parent: Option<&Category>) -> Category {
        Category {
            id: Uuid::new_v4(),
            workspace_id: Uuid::nil(),
            parent_id: parent.map(|p| p.id),
            name: name.to_string(),
            path: super::super::build_path(parent.map(|p| p.path.as_str()), name),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_tree() {
        let electronics = category("Electronics", None);
        let phones = category("Phones", Some(&electronics));
        let cases = category("Cases", Some(&phones));
        let garden = category("Garden", None);
        let tree = build_tree(&[cases.clone(), garden, phones, electronics]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "Electronics");
        assert_eq!(tree[0].children[0].path, "Electronics > Phones");
        assert_eq!(tree[0].children[0].children[0].id, cases.id);
        assert!(tree[1].children.is_empty());
    }
}
