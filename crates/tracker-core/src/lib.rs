pub mod error;
pub mod palette;
pub mod store;
pub mod validate;

pub use error::{Error, ErrorKind, Result};
pub use palette::{default_statuses, Palette};
pub use store::ProjectStore;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// --- Types (shared with the editor frontend) ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
pub struct NodeAttribute {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, schemars::JsonSchema)]
pub struct NodePosition {
    pub x: f64,
    pub y: f64,
}

/// A labeled, colored classification assignable to nodes (e.g. "Implemented").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
pub struct Status {
    pub id: String,
    pub name: String,
    /// Must be one of the status palette colors
    pub color: String,
}

/// A feature project: a colored grouping of nodes, independent of status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
pub struct ProjectTag {
    pub id: String,
    pub name: String,
    /// Any `#RRGGBB` color
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub label: String,
    pub name: String,
    #[serde(default)]
    pub status_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    pub attributes: Vec<NodeAttribute>,
    pub position: NodePosition,
}

/// A wire between two node sockets. Endpoints are not checked against node ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source_id: String,
    pub source_output: String,
    pub target_id: String,
    pub target_input: String,
}

/// A project as held in memory. Field order is the on-disk key order.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub statuses: Vec<Status>,
    pub feature_projects: Vec<ProjectTag>,
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

/// A project as it arrives from disk or from a client. Older files were
/// written before statuses and feature projects existed, so both may be absent.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(rename = "Project")]
pub struct ProjectDocument {
    pub name: String,
    #[serde(default)]
    pub statuses: Option<Vec<Status>>,
    #[serde(default)]
    pub feature_projects: Option<Vec<ProjectTag>>,
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl ProjectDocument {
    /// Fill in missing statuses with the built-in defaults and missing feature
    /// projects with an empty list.
    pub fn into_project(self) -> Project {
        Project {
            name: self.name,
            statuses: self.statuses.unwrap_or_else(default_statuses),
            feature_projects: self.feature_projects.unwrap_or_default(),
            nodes: self.nodes,
            connections: self.connections,
        }
    }
}

impl<'de> Deserialize<'de> for Project {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        ProjectDocument::deserialize(deserializer).map(ProjectDocument::into_project)
    }
}

/// JSON Schema of the project document, as accepted by `PUT /projects/{name}`.
pub fn project_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(ProjectDocument)).unwrap_or_default()
}

/// Resolve the default data directory (~/.feature-tracker/data).
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".feature-tracker"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_statuses_and_feature_projects_get_defaults() {
        let project: Project = serde_json::from_str(
            r#"{"name": "legacy", "nodes": [], "connections": []}"#,
        )
        .unwrap();
        assert_eq!(project.statuses, default_statuses());
        assert!(project.feature_projects.is_empty());
    }

    #[test]
    fn explicit_empty_statuses_are_kept() {
        let project: Project = serde_json::from_str(
            r#"{"name": "p", "statuses": [], "featureProjects": [], "nodes": [], "connections": []}"#,
        )
        .unwrap();
        assert!(project.statuses.is_empty());
    }

    #[test]
    fn node_without_references_decodes_to_null() {
        let node: Node = serde_json::from_str(
            r#"{"id": "n1", "label": "Auth", "name": "auth", "attributes": [{"key": "k", "value": "v"}], "position": {"x": 1.5, "y": -2}}"#,
        )
        .unwrap();
        assert_eq!(node.status_id, None);
        assert_eq!(node.project_id, None);
        assert_eq!(node.position, NodePosition { x: 1.5, y: -2.0 });
    }

    #[test]
    fn serialized_keys_keep_document_order() {
        let project = Project {
            name: "p".to_string(),
            statuses: vec![],
            feature_projects: vec![],
            nodes: vec![Node {
                id: "n1".to_string(),
                label: "L".to_string(),
                name: "n".to_string(),
                status_id: None,
                project_id: None,
                attributes: vec![],
                position: NodePosition::default(),
            }],
            connections: vec![],
        };
        let json = serde_json::to_string(&project).unwrap();
        assert!(json.starts_with(r#"{"name":"p","statuses":[],"featureProjects":[],"nodes":"#));
        assert!(json.contains(r#""statusId":null,"projectId":null"#));
    }

    #[test]
    fn schema_describes_project_fields() {
        let schema = project_schema();
        let props = schema.get("properties").and_then(|p| p.as_object()).unwrap();
        for key in ["name", "statuses", "featureProjects", "nodes", "connections"] {
            assert!(props.contains_key(key), "schema missing {key}");
        }
    }
}
