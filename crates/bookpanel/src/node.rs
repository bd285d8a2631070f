use serde::{Deserialize, Serialize};

/// Unique identifier for a node, owned by the external store.
pub type NodeId = String;

/// One entry of the external bookmark tree, as delivered by the store.
///
/// `url` absent means the node is a folder. `children` may be absent for
/// leaves and present-and-empty for empty folders. Field names follow the
/// browser snapshot format (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub index: usize,
    /// Creation time in epoch milliseconds, when the store reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
}

impl Node {
    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }
}

/// Target slot for a structural move: new parent and position among its
/// children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub parent_id: NodeId,
    pub index: usize,
}

/// Partial update for a node's editable fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_snapshot_deserializes() {
        let json = r#"{
            "id": "0",
            "title": "",
            "children": [
                {
                    "id": "1",
                    "parentId": "0",
                    "index": 0,
                    "title": "Bookmarks Bar",
                    "dateAdded": 1724500000000,
                    "children": [
                        {
                            "id": "5",
                            "parentId": "1",
                            "index": 0,
                            "title": "Example",
                            "url": "https://example.com/"
                        }
                    ]
                }
            ]
        }"#;

        let root: Node = serde_json::from_str(json).expect("deserialize");
        assert!(root.is_folder());
        assert_eq!(root.parent_id, None);

        let bar = &root.children.as_ref().unwrap()[0];
        assert_eq!(bar.parent_id.as_deref(), Some("0"));
        assert_eq!(bar.date_added, Some(1_724_500_000_000));

        let leaf = &bar.children.as_ref().unwrap()[0];
        assert!(!leaf.is_folder());
        assert_eq!(leaf.url.as_deref(), Some("https://example.com/"));
        assert!(leaf.children.is_none());
    }

    #[test]
    fn folder_without_url_and_leaf_with_url() {
        let folder = Node {
            id: "f".into(),
            title: "Folder".into(),
            url: None,
            parent_id: Some("0".into()),
            index: 0,
            date_added: None,
            children: Some(vec![]),
        };
        assert!(folder.is_folder());

        let leaf = Node {
            url: Some("https://a.example/".into()),
            children: None,
            ..folder.clone()
        };
        assert!(!leaf.is_folder());
    }
}
