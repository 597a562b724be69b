use crate::api::CollectionRequest;
use crate::models::DEFAULT_COLLECTION_COLOR;
use thiserror::Error;

/// Input rejected before any request is sent.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ValidationError {
    #[error("Collection name is required")]
    EmptyCollectionName,
    #[error("Title cannot be empty")]
    EmptyTitle,
}

/// Raw values of the collection form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct CollectionDraft {
    pub name: String,
    pub description: String,
    pub color: String,
}

impl CollectionDraft {
    pub fn validate(&self) -> Result<CollectionRequest, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCollectionName);
        }

        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let color = match self.color.trim() {
            "" => DEFAULT_COLLECTION_COLOR,
            c => c,
        };

        Ok(CollectionRequest {
            name: name.to_string(),
            description,
            color: color.to_string(),
        })
    }
}

/// Trimmed new title from the rename prompt.
pub(crate) fn validate_rename(input: &str) -> Result<String, ValidationError> {
    match input.trim() {
        "" => Err(ValidationError::EmptyTitle),
        t => Ok(t.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_name_required() {
        let draft = CollectionDraft {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.validate(), Err(ValidationError::EmptyCollectionName));
    }

    #[test]
    fn test_collection_draft_trims_and_defaults() {
        let draft = CollectionDraft {
            name: "  Research ".to_string(),
            description: "   ".to_string(),
            color: String::new(),
        };
        let req = draft.validate().expect("valid draft");
        assert_eq!(req.name, "Research");
        assert_eq!(req.description, None);
        assert_eq!(req.color, "#007bff");

        let draft = CollectionDraft {
            name: "Ideas".to_string(),
            description: " later ".to_string(),
            color: "#ff8800".to_string(),
        };
        let req = draft.validate().expect("valid draft");
        assert_eq!(req.description.as_deref(), Some("later"));
        assert_eq!(req.color, "#ff8800");
    }

    #[test]
    fn test_rename_rejects_blank() {
        assert_eq!(validate_rename(" \t"), Err(ValidationError::EmptyTitle));
        assert_eq!(validate_rename(" Plan B ").as_deref(), Ok("Plan B"));
        assert_eq!(
            ValidationError::EmptyTitle.to_string(),
            "Title cannot be empty"
        );
    }
}
