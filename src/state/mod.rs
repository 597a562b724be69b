pub(crate) mod documents;

use crate::api::ApiClient;
use crate::config::EnvConfig;
use crate::models::{Document, DocumentId};
use crate::notify::report_failure;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub config: StoredValue<EnvConfig>,

    /// All documents, in server order (new ones prepended).
    pub documents: RwSignal<Vec<Document>>,
    pub documents_loading: RwSignal<bool>,

    /// Guards list fetches: only the response for the latest id is applied.
    pub documents_request_id: RwSignal<u64>,

    pub selected_document_id: RwSignal<Option<DocumentId>>,

    /// Latest record renamed from the sidebar, for the editor to pick up.
    pub renamed_document: RwSignal<Option<Document>>,
}

impl AppState {
    pub fn new() -> Self {
        let config = EnvConfig::new();
        leptos::logging::log!(
            "api origin {}, autosave {} ms ({})",
            config.api_url,
            config.autosave_ms,
            config.autosave_policy
        );

        Self {
            api_client: RwSignal::new(ApiClient::new(config.api_url.clone())),
            config: StoredValue::new(config),
            documents: RwSignal::new(vec![]),
            documents_loading: RwSignal::new(false),
            documents_request_id: RwSignal::new(0),
            selected_document_id: RwSignal::new(None),
            renamed_document: RwSignal::new(None),
        }
    }

    /// Fetch `/api/pages` and replace the store. Older responses are dropped.
    pub fn refresh_documents(&self) {
        let state = *self;
        let req_id = state.documents_request_id.get_untracked().saturating_add(1);
        state.documents_request_id.set(req_id);
        state.documents_loading.set(true);

        let api = state.api_client.get_untracked();
        spawn_local(async move {
            let result = api.list_pages().await;

            if state.documents_request_id.get_untracked() != req_id {
                leptos::logging::log!("dropping stale document list (request {req_id})");
                return;
            }
            state.documents_loading.set(false);

            match result {
                Ok(docs) => state.documents.set(docs),
                Err(e) => report_failure("Failed to load documents", &e),
            }
        });
    }

    /// Replace the matching store entry with a server record.
    pub fn apply_document(&self, doc: &Document) {
        self.documents.update(|docs| {
            if !documents::replace_by_id(docs, doc) {
                leptos::logging::warn!("document {} not in store; ignoring update", doc.id);
            }
        });
    }

    pub fn apply_rename(&self, doc: Document) {
        self.apply_document(&doc);
        self.renamed_document.set(Some(doc));
    }

    pub fn insert_document(&self, doc: Document) {
        self.documents.update(|docs| documents::prepend(docs, doc));
    }

    pub fn remove_document(&self, id: DocumentId) {
        self.documents.update(|docs| {
            documents::remove_by_id(docs, id);
        });
        if self.selected_document_id.get_untracked() == Some(id) {
            self.selected_document_id.set(None);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
