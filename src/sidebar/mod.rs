use crate::models::{Collection, CollectionId, Document};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the sidebar lays out the document list.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum SidebarViewMode {
    /// Flat list with collection badges.
    #[default]
    All,
    ByCollection,
}

impl SidebarViewMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::ByCollection => "By collection",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CollectionGroup {
    pub collection: Collection,
    pub documents: Vec<Document>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct GroupedDocuments {
    pub uncategorized: Vec<Document>,
    pub groups: Vec<CollectionGroup>,
}

/// Case-insensitive substring match on the title. A blank term matches everything.
pub(crate) fn filter_documents(docs: &[Document], term: &str) -> Vec<Document> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return docs.to_vec();
    }

    docs.iter()
        .filter(|d| d.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Partition documents into "uncategorized" and one group per collection, in
/// collection order. Documents pointing at an unknown collection land nowhere.
pub(crate) fn group_documents(docs: &[Document], collections: &[Collection]) -> GroupedDocuments {
    let uncategorized = docs
        .iter()
        .filter(|d| d.collection_id.is_none())
        .cloned()
        .collect();

    let groups = collections
        .iter()
        .map(|c| CollectionGroup {
            collection: c.clone(),
            documents: docs
                .iter()
                .filter(|d| d.collection_id == Some(c.id))
                .cloned()
                .collect(),
        })
        .collect();

    GroupedDocuments {
        uncategorized,
        groups,
    }
}

/// Name and color for a document's badge, preferring the live collection list over
/// the summary embedded in the record.
pub(crate) fn collection_badge(
    doc: &Document,
    collections: &[Collection],
) -> Option<(String, String)> {
    let id: CollectionId = doc.collection_id?;
    collections
        .iter()
        .find(|c| c.id == id)
        .map(|c| (c.name.clone(), c.color.clone()))
        .or_else(|| {
            doc.collection
                .as_ref()
                .filter(|s| s.id == id)
                .map(|s| (s.name.clone(), s.color.clone()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{collection, doc, doc_in};
    use crate::models::CollectionSummary;

    fn titles(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.title.as_str()).collect()
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let docs = vec![doc(1, "Alpha"), doc(2, "beta")];
        assert_eq!(titles(&filter_documents(&docs, "al")), vec!["Alpha"]);
        assert_eq!(titles(&filter_documents(&docs, "ET")), vec!["beta"]);
        assert_eq!(titles(&filter_documents(&docs, "  ")), vec!["Alpha", "beta"]);
        assert!(filter_documents(&docs, "zzz").is_empty());
    }

    #[test]
    fn test_group_follows_collection_order() {
        let docs = vec![
            doc_in(1, "Outline", 20),
            doc(2, "Loose"),
            doc_in(3, "Plan", 10),
            doc_in(4, "Review", 20),
        ];
        let collections = vec![collection(20, "Work"), collection(10, "Home")];

        let grouped = group_documents(&docs, &collections);
        assert_eq!(titles(&grouped.uncategorized), vec!["Loose"]);
        assert_eq!(grouped.groups.len(), 2);
        assert_eq!(grouped.groups[0].collection.name, "Work");
        assert_eq!(titles(&grouped.groups[0].documents), vec!["Outline", "Review"]);
        assert_eq!(titles(&grouped.groups[1].documents), vec!["Plan"]);
    }

    #[test]
    fn test_deleted_collection_documents_become_uncategorized_after_refetch() {
        let before = vec![doc_in(1, "A", 5), doc_in(2, "B", 5)];
        let mut collections = vec![collection(5, "Doomed")];
        let grouped = group_documents(&before, &collections);
        assert_eq!(grouped.groups[0].documents.len(), 2);

        // Removed locally; documents still carry the old id until the refetch lands.
        collections.clear();
        let grouped = group_documents(&before, &collections);
        assert!(grouped.groups.is_empty());
        assert!(grouped.uncategorized.is_empty());

        let refetched: Vec<Document> = before
            .iter()
            .map(|d| Document {
                collection_id: None,
                collection: None,
                ..d.clone()
            })
            .collect();
        let grouped = group_documents(&refetched, &collections);
        assert_eq!(titles(&grouped.uncategorized), vec!["A", "B"]);
    }

    #[test]
    fn test_collection_badge_prefers_live_collection() {
        let mut d = doc_in(1, "A", 3);
        d.collection = Some(CollectionSummary {
            id: 3,
            name: "Old name".to_string(),
            color: "#000000".to_string(),
        });

        let mut live = collection(3, "New name");
        live.color = "#ff0000".to_string();
        assert_eq!(
            collection_badge(&d, &[live]),
            Some(("New name".to_string(), "#ff0000".to_string()))
        );
        assert_eq!(
            collection_badge(&d, &[]).map(|(name, _)| name).as_deref(),
            Some("Old name")
        );
        assert_eq!(collection_badge(&doc(2, "B"), &[]), None);
    }

    #[test]
    fn test_view_mode_strings() {
        assert_eq!(SidebarViewMode::ByCollection.to_string(), "by-collection");
        assert_eq!(
            "all".parse::<SidebarViewMode>().ok(),
            Some(SidebarViewMode::All)
        );
        assert_eq!(SidebarViewMode::ByCollection.label(), "By collection");
    }
}
