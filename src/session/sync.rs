use super::{PublishAction, PublishTicket, SaveTicket};
use crate::api::{ApiClient, ApiError, ApiResult, UpdatePageRequest};
use crate::models::{Document, DocumentId};

/// The two page calls the editor session issues.
pub(crate) trait PagesApi {
    async fn update_page(&self, id: DocumentId, body: &UpdatePageRequest) -> ApiResult<Document>;
    async fn publish_page(&self, id: DocumentId) -> ApiResult<Document>;
}

impl PagesApi for ApiClient {
    async fn update_page(&self, id: DocumentId, body: &UpdatePageRequest) -> ApiResult<Document> {
        ApiClient::update_page(self, id, body).await
    }

    async fn publish_page(&self, id: DocumentId) -> ApiResult<Document> {
        ApiClient::publish_page(self, id).await
    }
}

/// What a publish/unpublish run got done, step by step.
#[derive(Clone, Debug)]
pub(crate) enum PublishReport {
    Published(Document),
    Unpublished(Document),
    /// The edits were saved but the publish call failed; the flag on the server is unchanged.
    PersistedOnly {
        persisted: Document,
        error: ApiError,
    },
    /// Nothing was persisted.
    Failed(ApiError),
}

impl PublishReport {
    /// Latest server record produced by the run, if any step succeeded.
    pub fn document(&self) -> Option<&Document> {
        match self {
            Self::Published(d) | Self::Unpublished(d) => Some(d),
            Self::PersistedOnly { persisted, .. } => Some(persisted),
            Self::Failed(_) => None,
        }
    }
}

pub(crate) async fn run_save(api: &impl PagesApi, ticket: &SaveTicket) -> ApiResult<Document> {
    api.update_page(ticket.document_id, &ticket.request).await
}

/// Unpublish is a single update carrying `published = false`.
/// Publish persists the edits first, then flips the flag.
pub(crate) async fn run_publish(api: &impl PagesApi, ticket: &PublishTicket) -> PublishReport {
    let id = ticket.document_id;

    match ticket.action {
        PublishAction::Unpublish => match api.update_page(id, &ticket.request).await {
            Ok(doc) => PublishReport::Unpublished(doc),
            Err(e) => PublishReport::Failed(e),
        },
        PublishAction::Publish => {
            let persisted = match api.update_page(id, &ticket.request).await {
                Ok(doc) => doc,
                Err(e) => return PublishReport::Failed(e),
            };

            match api.publish_page(id).await {
                Ok(doc) => PublishReport::Published(doc),
                Err(error) => {
                    leptos::logging::warn!(
                        "page {id}: edits persisted but publish failed: {error}"
                    );
                    PublishReport::PersistedOnly { persisted, error }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorKind;
    use crate::models::fixtures::{doc, ts};
    use crate::session::{EditorSession, PublishOutcome, SaveOutcome, SessionPhase};
    use crate::session::AutosavePolicy;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Update(DocumentId, UpdatePageRequest),
        Publish(DocumentId),
    }

    /// Records calls and answers with scripted results, echoing the request by default.
    #[derive(Default)]
    struct FakeApi {
        calls: RefCell<Vec<Call>>,
        update_errors: RefCell<VecDeque<Option<ApiError>>>,
        publish_error: RefCell<Option<ApiError>>,
        last: RefCell<Option<Document>>,
    }

    impl FakeApi {
        fn failing_publish(error: ApiError) -> Self {
            let api = Self::default();
            *api.publish_error.borrow_mut() = Some(error);
            api
        }

        fn failing_update(error: ApiError) -> Self {
            let api = Self::default();
            api.update_errors.borrow_mut().push_back(Some(error));
            api
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    fn network_error() -> ApiError {
        ApiError {
            kind: ApiErrorKind::Network,
            message: "connection refused".to_string(),
        }
    }

    impl PagesApi for FakeApi {
        async fn update_page(
            &self,
            id: DocumentId,
            body: &UpdatePageRequest,
        ) -> ApiResult<Document> {
            self.calls.borrow_mut().push(Call::Update(id, body.clone()));
            if let Some(Some(e)) = self.update_errors.borrow_mut().pop_front() {
                return Err(e);
            }

            let mut d = doc(id, body.title.trim());
            d.content = body.content.clone();
            if let Some(c) = body.collection_id {
                d.collection_id = c;
            }
            if let Some(p) = body.published {
                d.published = p;
            } else if let Some(prev) = self.last.borrow().as_ref() {
                d.published = prev.published;
            }
            d.updated_at = ts(100);
            *self.last.borrow_mut() = Some(d.clone());
            Ok(d)
        }

        async fn publish_page(&self, id: DocumentId) -> ApiResult<Document> {
            self.calls.borrow_mut().push(Call::Publish(id));
            if let Some(e) = self.publish_error.borrow_mut().take() {
                return Err(e);
            }
            let mut d = self.last.borrow().clone().unwrap_or_else(|| doc(id, "x"));
            d.published = true;
            d.updated_at = ts(200);
            Ok(d)
        }
    }

    fn dirty_session(id: DocumentId) -> EditorSession {
        let mut s = EditorSession::new(AutosavePolicy::FixedOrigin, 30_000);
        s.load(&doc(id, "Draft"));
        s.edit_content("<p>new body</p>", "new body", 0);
        s
    }

    #[tokio::test]
    async fn test_publish_on_dirty_document_updates_then_publishes() {
        let api = FakeApi::default();
        let mut session = dirty_session(5);

        let ticket = session.begin_publish().expect("publish can start");
        assert_eq!(ticket.action, PublishAction::Publish);
        let report = run_publish(&api, &ticket).await;

        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        match &calls[0] {
            Call::Update(5, req) => {
                assert_eq!(req.content, "<p>new body</p>");
                assert!(req.published.is_none());
            }
            other => panic!("expected update first, got {other:?}"),
        }
        assert_eq!(calls[1], Call::Publish(5));

        let outcome = session.finish_publish(&ticket, report);
        assert!(matches!(outcome, PublishOutcome::Completed { clean: true, .. }));
        assert!(session.is_published());
        assert!(!session.is_dirty());
        assert_eq!(session.phase(), SessionPhase::Clean);
    }

    #[tokio::test]
    async fn test_publish_failure_after_update_advances_content_not_flag() {
        let api = FakeApi::failing_publish(network_error());
        let mut session = dirty_session(5);

        let ticket = session.begin_publish().expect("publish can start");
        let report = run_publish(&api, &ticket).await;
        assert!(matches!(report, PublishReport::PersistedOnly { .. }));

        let outcome = session.finish_publish(&ticket, report);
        let PublishOutcome::Gap { document, .. } = outcome else {
            panic!("expected a recorded publish gap");
        };
        assert!(!document.published);
        assert_eq!(document.content, "<p>new body</p>");

        assert!(!session.is_published());
        assert_eq!(session.content(), "<p>new body</p>");
        assert!(!session.is_dirty());
        assert!(session.publish_gap().is_some());

        // Retrying runs the whole saga again and clears the gap.
        let api = FakeApi::default();
        let retry = session.begin_publish().expect("retry can start");
        assert_eq!(retry.action, PublishAction::Publish);
        let report = run_publish(&api, &retry).await;
        session.finish_publish(&retry, report);
        assert!(session.is_published());
        assert!(session.publish_gap().is_none());
    }

    #[tokio::test]
    async fn test_publish_stops_when_update_fails() {
        let api = FakeApi::failing_update(network_error());
        let mut session = dirty_session(5);

        let ticket = session.begin_publish().expect("publish can start");
        let report = run_publish(&api, &ticket).await;
        assert!(matches!(report, PublishReport::Failed(_)));
        assert_eq!(api.calls().len(), 1);

        let outcome = session.finish_publish(&ticket, report);
        assert!(matches!(outcome, PublishOutcome::Failed(_)));
        assert!(session.is_dirty());
        assert_eq!(session.phase(), SessionPhase::Dirty);
        assert_eq!(session.content(), "<p>new body</p>");
    }

    #[tokio::test]
    async fn test_unpublish_is_a_single_update() {
        let api = FakeApi::default();
        let mut session = EditorSession::new(AutosavePolicy::FixedOrigin, 30_000);
        let mut published = doc(8, "Live");
        published.published = true;
        session.load(&published);

        let ticket = session.begin_publish().expect("unpublish can start");
        assert_eq!(ticket.action, PublishAction::Unpublish);
        let report = run_publish(&api, &ticket).await;

        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], Call::Update(8, req) if req.published == Some(false)));

        session.finish_publish(&ticket, report);
        assert!(!session.is_published());
        assert_eq!(session.phase(), SessionPhase::Clean);
    }

    #[tokio::test]
    async fn test_autosave_fires_exactly_one_save() {
        let api = FakeApi::default();
        let mut session = EditorSession::new(AutosavePolicy::FixedOrigin, 30_000);
        session.load(&doc(3, "Notes"));

        let timer = session
            .edit_title("Notes v2", 0)
            .expect("first edit arms autosave");
        assert!(session.edit_content("<p>a</p>", "a", 5_000).is_none());
        assert!(session.edit_content("<p>ab</p>", "ab", 12_000).is_none());

        let ticket = session
            .autosave_fired(timer.token)
            .expect("timer fires a save");
        assert!(session.autosave_fired(timer.token).is_none());

        let result = run_save(&api, &ticket).await;
        let outcome = session.finish_save(&ticket, result);
        assert!(matches!(outcome, SaveOutcome::Saved { clean: true, .. }));
        assert_eq!(api.calls().len(), 1);
        assert_eq!(session.title(), "Notes v2");
        assert_eq!(session.last_saved(), Some(ts(100)));
    }
}
