//! Pure mutations of the in-memory document store. Identity is by `id`.

use crate::models::{Document, DocumentId};

/// Replace the entry with the same id. Returns false if no entry matched.
pub(crate) fn replace_by_id(docs: &mut [Document], doc: &Document) -> bool {
    match docs.iter_mut().find(|d| d.id == doc.id) {
        Some(slot) => {
            *slot = doc.clone();
            true
        }
        None => false,
    }
}

pub(crate) fn remove_by_id(docs: &mut Vec<Document>, id: DocumentId) -> bool {
    let before = docs.len();
    docs.retain(|d| d.id != id);
    docs.len() != before
}

/// Insert at the front, dropping any existing entry with the same id.
pub(crate) fn prepend(docs: &mut Vec<Document>, doc: Document) {
    docs.retain(|d| d.id != doc.id);
    docs.insert(0, doc);
}

pub(crate) fn find_by_id(docs: &[Document], id: DocumentId) -> Option<&Document> {
    docs.iter().find(|d| d.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{doc, ts};

    #[test]
    fn test_replace_by_id_keeps_position() {
        let mut docs = vec![doc(1, "a"), doc(2, "b"), doc(3, "c")];
        let mut updated = doc(2, "b2");
        updated.updated_at = ts(50);

        assert!(replace_by_id(&mut docs, &updated));
        assert_eq!(docs[1].title, "b2");
        assert_eq!(docs[1].updated_at, ts(50));
        assert!(!replace_by_id(&mut docs, &doc(9, "missing")));
        assert_eq!(docs.len(), 3);
    }

    #[test]
    fn test_remove_by_id() {
        let mut docs = vec![doc(1, "a"), doc(2, "b")];
        assert!(remove_by_id(&mut docs, 1));
        assert!(!remove_by_id(&mut docs, 1));
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, 2);
    }

    #[test]
    fn test_prepend_dedupes() {
        let mut docs = vec![doc(1, "a"), doc(2, "b")];
        prepend(&mut docs, doc(3, "new"));
        prepend(&mut docs, doc(2, "b again"));
        let ids: Vec<_> = docs.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(find_by_id(&docs, 2).map(|d| d.title.as_str()), Some("b again"));
    }
}
