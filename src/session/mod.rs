//! Editor session: the edit buffer of the selected document and its save/publish lifecycle.
//!
//! Everything here is plain data so it can be driven from signals in the view and
//! from unit tests alike. Network calls live in [`sync`]; the view owns the browser
//! timers and feeds their firings back through [`EditorSession::autosave_fired`].

mod autosave;
mod sync;

pub(crate) use autosave::{AutosavePolicy, AutosaveScheduler, TimerRequest};
pub(crate) use sync::{run_publish, run_save, PublishReport};

use crate::api::{ApiError, ApiResult, UpdatePageRequest};
use crate::editor::{count_words, plain_text};
use crate::models::{CollectionId, Document, DocumentId, DEFAULT_TITLE};
use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SessionPhase {
    Empty,
    Clean,
    Dirty,
    Saving,
    Publishing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InFlight {
    Save,
    Publish,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PublishAction {
    Publish,
    Unpublish,
}

/// Issued by [`EditorSession::begin_save`]; hand it back to `finish_save` with the result.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SaveTicket {
    pub document_id: DocumentId,
    pub request: UpdatePageRequest,
    generation: u64,
    edit_seq: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PublishTicket {
    pub document_id: DocumentId,
    pub action: PublishAction,
    pub request: UpdatePageRequest,
    generation: u64,
    edit_seq: u64,
}

#[derive(Clone, Debug)]
pub(crate) enum SaveOutcome {
    /// Applied to the session. `clean` is false when edits arrived while the request was in flight.
    Saved { document: Document, clean: bool },
    Failed(ApiError),
    /// The selection changed before the response arrived; the session was not touched.
    Stale(ApiResult<Document>),
}

impl SaveOutcome {
    /// Server record to write into the document store.
    pub fn server_document(&self) -> Option<&Document> {
        match self {
            Self::Saved { document, .. } => Some(document),
            Self::Stale(Ok(document)) => Some(document),
            Self::Failed(_) | Self::Stale(Err(_)) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum PublishOutcome {
    Completed { document: Document, clean: bool },
    /// Edits persisted, publish flag not flipped. Recorded on the session until the next publish.
    Gap { document: Document, error: ApiError },
    Failed(ApiError),
    Stale(PublishReport),
}

impl PublishOutcome {
    pub fn server_document(&self) -> Option<&Document> {
        match self {
            Self::Completed { document, .. } | Self::Gap { document, .. } => Some(document),
            Self::Stale(report) => report.document(),
            Self::Failed(_) => None,
        }
    }
}

/// Title actually sent on save: trimmed, with a default for blank input.
pub(crate) fn effective_title(title: &str) -> String {
    let t = title.trim();
    if t.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        t.to_string()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct EditorSession {
    document_id: Option<DocumentId>,
    /// Bumped on every selection change; tickets from older generations are stale.
    generation: u64,
    /// Bumped on every local edit; lets a response tell whether edits raced it.
    edit_seq: u64,
    /// Bumped whenever `content` is replaced from a server record, so the widget can be refreshed.
    content_revision: u64,

    baseline: Option<Document>,
    title: String,
    content: String,
    collection_id: Option<CollectionId>,
    dirty: bool,
    in_flight: Option<InFlight>,
    last_saved: Option<DateTime<Utc>>,
    word_count: usize,
    char_count: usize,
    publish_gap: Option<String>,

    autosave: AutosaveScheduler,
    /// The timer fired while a request was in flight and its save was skipped.
    autosave_deferred: bool,
}

impl EditorSession {
    pub fn new(policy: AutosavePolicy, autosave_ms: u32) -> Self {
        Self {
            document_id: None,
            generation: 0,
            edit_seq: 0,
            content_revision: 0,
            baseline: None,
            title: String::new(),
            content: String::new(),
            collection_id: None,
            dirty: false,
            in_flight: None,
            last_saved: None,
            word_count: 0,
            char_count: 0,
            publish_gap: None,
            autosave: AutosaveScheduler::new(policy, autosave_ms),
            autosave_deferred: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.document_id.is_none() {
            return SessionPhase::Empty;
        }
        match self.in_flight {
            Some(InFlight::Save) => SessionPhase::Saving,
            Some(InFlight::Publish) => SessionPhase::Publishing,
            None if self.dirty => SessionPhase::Dirty,
            None => SessionPhase::Clean,
        }
    }

    pub fn document_id(&self) -> Option<DocumentId> {
        self.document_id
    }

    pub fn content_revision(&self) -> u64 {
        self.content_revision
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn collection_id(&self) -> Option<CollectionId> {
        self.collection_id
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_published(&self) -> bool {
        self.baseline.as_ref().is_some_and(|d| d.published)
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn publish_gap(&self) -> Option<&str> {
        self.publish_gap.as_deref()
    }

    pub fn autosave(&self) -> &AutosaveScheduler {
        &self.autosave
    }

    /// Start editing `doc`. Any in-flight request for the previous selection becomes stale.
    pub fn load(&mut self, doc: &Document) {
        self.reset();
        self.document_id = Some(doc.id);
        self.title = doc.title.clone();
        self.collection_id = doc.collection_id;
        self.last_saved = Some(doc.updated_at);
        self.set_content_from_server(&doc.content);
        self.baseline = Some(doc.clone());
    }

    pub fn clear(&mut self) {
        self.reset();
        self.content_revision += 1;
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.edit_seq = 0;
        self.document_id = None;
        self.baseline = None;
        self.title.clear();
        self.content.clear();
        self.collection_id = None;
        self.dirty = false;
        self.in_flight = None;
        self.last_saved = None;
        self.word_count = 0;
        self.char_count = 0;
        self.publish_gap = None;
        self.autosave.cancel();
        self.autosave_deferred = false;
    }

    fn set_content_from_server(&mut self, html: &str) {
        self.content = html.to_string();
        let text = plain_text(html);
        self.word_count = count_words(&text);
        self.char_count = text.chars().count();
        self.content_revision += 1;
    }

    fn mark_dirty(&mut self, now_ms: i64) -> Option<TimerRequest> {
        self.dirty = true;
        self.edit_seq += 1;
        self.autosave.on_edit(now_ms)
    }

    pub fn edit_title(&mut self, title: &str, now_ms: i64) -> Option<TimerRequest> {
        if self.document_id.is_none() {
            return None;
        }
        self.title = title.to_string();
        self.mark_dirty(now_ms)
    }

    /// `text` is the widget's plain-text rendering, used for counts.
    pub fn edit_content(&mut self, html: &str, text: &str, now_ms: i64) -> Option<TimerRequest> {
        if self.document_id.is_none() {
            return None;
        }
        self.content = html.to_string();
        self.word_count = count_words(text);
        self.char_count = text.chars().count();
        self.mark_dirty(now_ms)
    }

    /// The collection change was already persisted for `document_id`; ignored if
    /// the selection has moved on since.
    pub fn edit_collection(
        &mut self,
        document_id: DocumentId,
        collection_id: Option<CollectionId>,
        now_ms: i64,
    ) -> Option<TimerRequest> {
        if self.document_id != Some(document_id) {
            return None;
        }
        self.collection_id = collection_id;
        self.mark_dirty(now_ms)
    }

    fn is_current(&self, document_id: DocumentId, generation: u64) -> bool {
        self.generation == generation && self.document_id == Some(document_id)
    }

    fn update_request(&self, published: Option<bool>) -> UpdatePageRequest {
        UpdatePageRequest {
            title: effective_title(&self.title),
            content: self.content.clone(),
            collection_id: Some(self.collection_id),
            published,
        }
    }

    /// `None` when nothing is selected or a request is already in flight.
    pub fn begin_save(&mut self) -> Option<SaveTicket> {
        let document_id = self.document_id?;
        if self.in_flight.is_some() {
            return None;
        }
        self.in_flight = Some(InFlight::Save);

        Some(SaveTicket {
            document_id,
            request: self.update_request(None),
            generation: self.generation,
            edit_seq: self.edit_seq,
        })
    }

    /// The armed autosave timer fired. Returns a save to run if the session is still dirty.
    pub fn autosave_fired(&mut self, token: u64) -> Option<SaveTicket> {
        if !self.autosave.on_fire(token) {
            return None;
        }
        match self.phase() {
            SessionPhase::Dirty => self.begin_save(),
            SessionPhase::Saving | SessionPhase::Publishing => {
                self.autosave_deferred = true;
                None
            }
            SessionPhase::Empty | SessionPhase::Clean => None,
        }
    }

    /// Re-arm an autosave that fired during a request, once that request has
    /// finished and edits are still unsaved.
    pub fn resume_autosave(&mut self, now_ms: i64) -> Option<TimerRequest> {
        if self.in_flight.is_some() || !std::mem::take(&mut self.autosave_deferred) {
            return None;
        }
        if !self.dirty || self.autosave.is_armed() {
            return None;
        }
        self.autosave.on_edit(now_ms)
    }

    /// A rename of `document` happened outside the editor. Adopts the new title;
    /// while a request is in flight the rename counts as an edit so the
    /// response does not overwrite it.
    pub fn adopt_rename(&mut self, document: &Document, now_ms: i64) -> Option<TimerRequest> {
        if self.document_id != Some(document.id) {
            return None;
        }
        self.title = document.title.clone();
        self.last_saved = Some(document.updated_at);
        if let Some(baseline) = self.baseline.as_mut() {
            baseline.title = document.title.clone();
            baseline.updated_at = document.updated_at;
        }
        if self.in_flight.is_some() {
            return self.mark_dirty(now_ms);
        }
        None
    }

    pub fn finish_save(&mut self, ticket: &SaveTicket, result: ApiResult<Document>) -> SaveOutcome {
        if !self.is_current(ticket.document_id, ticket.generation) {
            return SaveOutcome::Stale(result);
        }
        self.in_flight = None;

        match result {
            Ok(document) => {
                let clean = self.edit_seq == ticket.edit_seq;
                self.apply_server(&document, clean);
                SaveOutcome::Saved { document, clean }
            }
            Err(e) => SaveOutcome::Failed(e),
        }
    }

    pub fn begin_publish(&mut self) -> Option<PublishTicket> {
        let document_id = self.document_id?;
        if self.in_flight.is_some() {
            return None;
        }

        let action = if self.is_published() {
            PublishAction::Unpublish
        } else {
            PublishAction::Publish
        };
        let published = match action {
            PublishAction::Unpublish => Some(false),
            PublishAction::Publish => None,
        };
        self.in_flight = Some(InFlight::Publish);

        Some(PublishTicket {
            document_id,
            action,
            request: self.update_request(published),
            generation: self.generation,
            edit_seq: self.edit_seq,
        })
    }

    pub fn finish_publish(&mut self, ticket: &PublishTicket, report: PublishReport) -> PublishOutcome {
        if !self.is_current(ticket.document_id, ticket.generation) {
            return PublishOutcome::Stale(report);
        }
        self.in_flight = None;

        let clean = self.edit_seq == ticket.edit_seq;
        match report {
            PublishReport::Published(document) | PublishReport::Unpublished(document) => {
                self.apply_server(&document, clean);
                self.publish_gap = None;
                PublishOutcome::Completed { document, clean }
            }
            PublishReport::PersistedOnly { persisted, error } => {
                self.apply_server(&persisted, clean);
                self.publish_gap = Some(error.to_string());
                PublishOutcome::Gap {
                    document: persisted,
                    error,
                }
            }
            PublishReport::Failed(e) => PublishOutcome::Failed(e),
        }
    }

    /// Adopt a server record as the new baseline. Local fields follow it only when
    /// no edit happened after the request was issued.
    fn apply_server(&mut self, document: &Document, clean: bool) {
        self.baseline = Some(document.clone());
        self.last_saved = Some(document.updated_at);

        if clean {
            self.title = document.title.clone();
            self.collection_id = document.collection_id;
            if self.content != document.content {
                self.set_content_from_server(&document.content);
            }
            self.dirty = false;
            self.autosave.cancel();
        }
    }
}
