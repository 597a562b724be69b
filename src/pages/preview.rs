use crate::api::ApiResult;
use crate::components::ui::Spinner;
use crate::models::{Document, DocumentId};
use crate::state::AppContext;
use crate::util::{format_date_time, local_offset};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params;
use leptos_router::params::Params;

#[derive(Params, PartialEq, Clone, Debug)]
pub struct PreviewRouteParams {
    pub id: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PreviewState {
    Loading,
    Ready(Document),
    NotPublished,
    NotFound,
    Failed(String),
}

impl PreviewState {
    pub fn from_result(result: ApiResult<Document>) -> Self {
        match result {
            Ok(doc) if doc.published => Self::Ready(doc),
            Ok(_) => Self::NotPublished,
            Err(e) if e.is_not_found() => Self::NotFound,
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn message(&self) -> Option<String> {
        match self {
            Self::Loading | Self::Ready(_) => None,
            Self::NotPublished => Some("This document is not published yet.".to_string()),
            Self::NotFound => Some("Document not found.".to_string()),
            Self::Failed(e) => Some(format!("Could not load this document: {e}")),
        }
    }
}

fn parse_id(raw: &str) -> Option<DocumentId> {
    raw.trim().parse().ok().filter(|id: &DocumentId| *id > 0)
}

#[component]
pub fn PreviewPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let params = use_params::<PreviewRouteParams>();

    let state: RwSignal<PreviewState> = RwSignal::new(PreviewState::Loading);
    let request_id: RwSignal<u64> = RwSignal::new(0);

    Effect::new(move |_| {
        let raw = params.get().ok().and_then(|p| p.id).unwrap_or_default();

        let rid = request_id.get_untracked().saturating_add(1);
        request_id.set(rid);

        let Some(id) = parse_id(&raw) else {
            state.set(PreviewState::NotFound);
            return;
        };

        state.set(PreviewState::Loading);
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = api.get_page(id).await;
            if request_id.get_untracked() != rid {
                return;
            }
            if let Err(e) = &result {
                leptos::logging::warn!("preview {id}: {e}");
            }
            state.set(PreviewState::from_result(result));
        });
    });

    let back = move || {
        view! {
            <a
                href="/"
                class="inline-flex h-8 items-center rounded-md border bg-background px-3 text-sm font-medium shadow-xs hover:bg-accent"
            >
                "Back to Editor"
            </a>
        }
    };

    view! {
        <main class="mx-auto w-full max-w-3xl px-4 py-8" data-name="PreviewPage">
            {move || match state.get() {
                PreviewState::Loading => {
                    view! {
                        <div class="flex items-center gap-2 text-sm text-muted-foreground">
                            <Spinner />
                            "Loading..."
                        </div>
                    }
                    .into_any()
                }
                PreviewState::Ready(doc) => {
                    let published_on = format_date_time(doc.updated_at, local_offset());
                    view! {
                        <article class="flex flex-col gap-4">
                            <div class="flex items-start justify-between gap-4">
                                <h1 class="text-3xl font-bold">{doc.title}</h1>
                                {back()}
                            </div>
                            <hr />
                            <div class="prose max-w-none leading-relaxed" inner_html=doc.content></div>
                            <hr />
                            <small class="text-xs text-muted-foreground">
                                "Published on: " {published_on}
                            </small>
                        </article>
                    }
                    .into_any()
                }
                other => {
                    view! {
                        <div class="flex flex-col items-start gap-3">
                            <p class="text-sm text-muted-foreground">{other.message()}</p>
                            {back()}
                        </div>
                    }
                    .into_any()
                }
            }}
        </main>
    }
}
