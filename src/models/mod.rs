use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub(crate) type DocumentId = i64;
pub(crate) type CollectionId = i64;

/// Title used when a document is created, and when a save is sent with a blank title.
pub(crate) const DEFAULT_TITLE: &str = "Untitled Document";

/// Color a new collection starts with.
pub(crate) const DEFAULT_COLLECTION_COLOR: &str = "#007bff";

/// A page as returned by `/api/pages`.
///
/// The in-memory copy is always a snapshot of the last server response for this id.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Document {
    pub id: DocumentId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published: bool,
    #[serde(default)]
    pub collection_id: Option<CollectionId>,

    /// Embedded summary the backend includes for badge rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<CollectionSummary>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reads an explicit `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct CollectionSummary {
    pub id: CollectionId,
    pub name: String,
    pub color: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Collection {
    pub id: CollectionId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub color: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0)
            .single()
            .expect("valid timestamp")
    }

    pub(crate) fn doc(id: DocumentId, title: &str) -> Document {
        Document {
            id,
            title: title.to_string(),
            content: format!("<p>{title}</p>"),
            published: false,
            collection_id: None,
            collection: None,
            created_at: ts(0),
            updated_at: ts(0),
        }
    }

    pub(crate) fn doc_in(id: DocumentId, title: &str, collection_id: CollectionId) -> Document {
        Document {
            collection_id: Some(collection_id),
            ..doc(id, title)
        }
    }

    pub(crate) fn collection(id: CollectionId, name: &str) -> Collection {
        Collection {
            id,
            name: name.to_string(),
            description: None,
            color: DEFAULT_COLLECTION_COLOR.to_string(),
            created_at: None,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_contract_deserialize() {
        let json = r##"{
            "id": 7,
            "title": "Roadmap",
            "content": "<p>Q3</p>",
            "published": true,
            "collectionId": 3,
            "collection": {"id": 3, "name": "Plans", "color": "#ff0000"},
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-02T11:30:00.000Z"
        }"##;
        let parsed: Document = serde_json::from_str(json).expect("document should parse");
        assert_eq!(parsed.id, 7);
        assert!(parsed.published);
        assert_eq!(parsed.collection_id, Some(3));
        assert_eq!(parsed.collection.map(|c| c.name).as_deref(), Some("Plans"));
        assert_eq!(parsed.updated_at.to_rfc3339(), "2024-05-02T11:30:00+00:00");
    }

    #[test]
    fn test_document_without_collection_deserialize() {
        let json = r#"{
            "id": 1,
            "title": "Loose",
            "content": "",
            "published": false,
            "collectionId": null,
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        }"#;
        let parsed: Document = serde_json::from_str(json).expect("document should parse");
        assert!(parsed.collection_id.is_none());
        assert!(parsed.collection.is_none());
    }

    #[test]
    fn test_document_with_null_content_deserialize() {
        let json = r#"{
            "id": 5,
            "title": "Fresh",
            "content": null,
            "published": null,
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        }"#;
        let parsed: Document = serde_json::from_str(json).expect("document should parse");
        assert_eq!(parsed.content, "");
        assert!(!parsed.published);
        assert!(parsed.collection_id.is_none());
    }

    #[test]
    fn test_collection_contract_deserialize() {
        let json = r##"{
            "id": 2,
            "name": "Research",
            "description": null,
            "color": "#00ff00",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        }"##;
        let parsed: Collection = serde_json::from_str(json).expect("collection should parse");
        assert_eq!(parsed.name, "Research");
        assert!(parsed.description.is_none());
        assert!(parsed.created_at.is_some());
    }
}
