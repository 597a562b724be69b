use super::collection_selector::CollectionSelector;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Notice, NoticeDescription, NoticeTitle, PublishedBadge,
    Spinner,
};
use crate::editor::{FormatToolbar, RichTextEditor, RichTextHandle};
use crate::models::{CollectionId, DocumentId};
use crate::notify::report_failure;
use crate::session::{
    run_publish, run_save, EditorSession, PublishOutcome, PublishTicket, SaveOutcome,
    SaveTicket, SessionPhase, TimerRequest,
};
use crate::state::documents::find_by_id;
use crate::state::AppContext;
use crate::util::{format_date_time, local_offset, now_ms};
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsCast;

/// Editing surface for the selected document.
///
/// The [`EditorSession`] holds all state; this view feeds it user input, runs the
/// tickets it issues, owns the browser timeout behind the autosave scheduler, and
/// copies server records back into the document store.
#[component]
pub fn EditorPane() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let config = app_state.0.config.get_value();

    let session: RwSignal<EditorSession> = RwSignal::new(EditorSession::new(
        config.autosave_policy,
        config.autosave_ms,
    ));
    let handle = RichTextHandle::new();
    let timer_id: StoredValue<Option<i32>> = StoredValue::new(None);
    // Timer requests raised after a response; armed by the effect below.
    let pending_timer: RwSignal<Option<TimerRequest>> = RwSignal::new(None);

    let phase = Memo::new(move |_| session.with(|s| s.phase()));
    let content_revision = Memo::new(move |_| session.with(|s| s.content_revision()));

    let clear_timer = move || {
        if let Some(tid) = timer_id.get_value() {
            window().clear_timeout_with_handle(tid);
            timer_id.set_value(None);
        }
    };

    // Drop the browser timeout once the scheduler no longer has one armed.
    let sync_timer = move || {
        if !session.with_untracked(|s| s.autosave().is_armed()) {
            clear_timer();
        }
    };

    let start_save = move |ticket: SaveTicket| {
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let id = ticket.document_id;
            let result = run_save(&api, &ticket).await;

            let Some(outcome) = session.try_update(|s| s.finish_save(&ticket, result)) else {
                return;
            };
            if let Some(doc) = outcome.server_document() {
                app_state.0.apply_document(doc);
            }

            match outcome {
                SaveOutcome::Saved { clean: false, .. } => {
                    leptos::logging::log!("page {id}: saved, newer edits still pending");
                }
                SaveOutcome::Saved { .. } => {}
                SaveOutcome::Failed(e) => report_failure("Failed to save document", &e),
                SaveOutcome::Stale(Ok(_)) => {
                    leptos::logging::log!("page {id}: save finished after selection changed");
                }
                SaveOutcome::Stale(Err(e)) => {
                    leptos::logging::warn!("page {id}: stale save failed: {e}");
                }
            }
            sync_timer();
            if let Some(req) = session.try_update(|s| s.resume_autosave(now_ms())).flatten() {
                pending_timer.set(Some(req));
            }
        });
    };

    let start_publish = move |ticket: PublishTicket| {
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let id = ticket.document_id;
            let report = run_publish(&api, &ticket).await;

            let Some(outcome) = session.try_update(|s| s.finish_publish(&ticket, report)) else {
                return;
            };
            if let Some(doc) = outcome.server_document() {
                app_state.0.apply_document(doc);
            }

            match outcome {
                PublishOutcome::Completed { .. } => {}
                PublishOutcome::Gap { error, .. } => {
                    report_failure("Document saved, but publishing failed", &error)
                }
                PublishOutcome::Failed(e) => report_failure("Failed to toggle publish", &e),
                PublishOutcome::Stale(report) => {
                    leptos::logging::log!(
                        "page {id}: publish finished after selection changed ({})",
                        if report.document().is_some() { "persisted" } else { "failed" }
                    );
                }
            }
            sync_timer();
            if let Some(req) = session.try_update(|s| s.resume_autosave(now_ms())).flatten() {
                pending_timer.set(Some(req));
            }
        });
    };

    let on_autosave = move |token: u64| {
        timer_id.set_value(None);
        if let Some(ticket) = session.try_update(|s| s.autosave_fired(token)).flatten() {
            leptos::logging::log!("autosave: page {}", ticket.document_id);
            start_save(ticket);
        }
    };

    let arm_timer = move |req: TimerRequest| {
        clear_timer();
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || on_autosave(req.token));
        let delay = i32::try_from(req.delay_ms).unwrap_or(i32::MAX);
        match window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), delay)
        {
            Ok(tid) => timer_id.set_value(Some(tid)),
            Err(_) => leptos::logging::warn!("could not start autosave timer"),
        }
    };

    let after_edit = move |req: Option<Option<TimerRequest>>| {
        if let Some(req) = req.flatten() {
            arm_timer(req);
        }
    };

    Effect::new(move |_| {
        if let Some(req) = pending_timer.get() {
            arm_timer(req);
        }
    });

    // Renames from the sidebar land in the store; carry them into the open session.
    Effect::new(move |prev: Option<()>| {
        let renamed = app_state.0.renamed_document.get();
        if prev.is_none() {
            return;
        }
        if let Some(doc) = renamed {
            after_edit(session.try_update(|s| s.adopt_rename(&doc, now_ms())));
        }
    });

    // Rebuild the session whenever the selection changes. Tracks only the id, so
    // store updates for the open document do not reset local edits.
    Effect::new(move |_| {
        let selected = app_state.0.selected_document_id.get();
        clear_timer();

        let doc = selected.and_then(|id| {
            app_state
                .0
                .documents
                .with_untracked(|docs| find_by_id(docs, id).cloned())
        });
        session.update(|s| match &doc {
            Some(d) => s.load(d),
            None => s.clear(),
        });
    });

    // Push server-provided content into the widget.
    Effect::new(move |_| {
        content_revision.track();
        let html = session.with_untracked(|s| s.content().to_string());
        handle.set_content(&html);
    });

    let pagehide = window_event_listener(ev::pagehide, move |_ev: web_sys::PageTransitionEvent| {
        if phase.get_untracked() != SessionPhase::Dirty {
            return;
        }
        if let Some(ticket) = session.try_update(|s| s.begin_save()).flatten() {
            leptos::logging::log!("pagehide: flushing page {}", ticket.document_id);
            start_save(ticket);
        }
    });

    on_cleanup(move || {
        pagehide.remove();
        clear_timer();
    });

    let on_title_input = move |ev: web_sys::Event| {
        let Some(value) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            .map(|i| i.value())
        else {
            return;
        };
        after_edit(session.try_update(|s| s.edit_title(&value, now_ms())));
    };

    let on_content_input = move |(html, text): (String, String)| {
        after_edit(session.try_update(|s| s.edit_content(&html, &text, now_ms())));
    };

    let on_collection_change = move |(id, collection_id): (DocumentId, Option<CollectionId>)| {
        after_edit(session.try_update(|s| s.edit_collection(id, collection_id, now_ms())));
    };

    let on_save = move |_: web_sys::MouseEvent| {
        if let Some(ticket) = session.try_update(|s| s.begin_save()).flatten() {
            start_save(ticket);
        }
    };

    let on_publish = move |_: web_sys::MouseEvent| {
        if let Some(ticket) = session.try_update(|s| s.begin_publish()).flatten() {
            start_publish(ticket);
        }
    };

    let document_id = Signal::derive(move || session.with(|s| s.document_id()));
    let collection_id = Signal::derive(move || session.with(|s| s.collection_id()));
    let is_published = move || session.with(|s| s.is_published());
    let busy = move || matches!(phase.get(), SessionPhase::Saving | SessionPhase::Publishing);
    let is_empty = move || phase.get() == SessionPhase::Empty;

    let publish_button = move || {
        let published = is_published();
        let variant = if published {
            ButtonVariant::Warning
        } else {
            ButtonVariant::Success
        };
        view! {
            <Button
                variant=variant
                size=ButtonSize::Sm
                attr:disabled=move || busy() || is_empty()
                on:click=on_publish
            >
                <Show when=move || phase.get() == SessionPhase::Publishing>
                    <Spinner />
                </Show>
                {move || {
                    if phase.get() == SessionPhase::Publishing {
                        "Publishing..."
                    } else if published {
                        "Unpublish"
                    } else {
                        "Publish"
                    }
                }}
            </Button>
        }
    };

    let last_saved = move || {
        session
            .with(|s| s.last_saved())
            .map(|at| format_date_time(at, local_offset()))
            .unwrap_or_else(|| "Never".to_string())
    };

    view! {
        <section class="flex h-full min-w-0 flex-1 flex-col" data-name="EditorPane">
            <Show when=is_empty>
                <div class="flex flex-1 flex-col items-center justify-center gap-1 p-8 text-center text-muted-foreground">
                    <h2 class="text-lg font-medium">"No document selected"</h2>
                    <p class="text-sm">"Select a document from the sidebar to start editing."</p>
                </div>
            </Show>

            <div class="flex min-h-0 flex-1 flex-col" class:hidden=is_empty>
                <header class="flex flex-wrap items-center gap-2 border-b p-3">
                    <input
                        class="min-w-0 flex-1 bg-transparent text-2xl font-bold outline-none placeholder:text-muted-foreground"
                        placeholder="Document Title"
                        prop:value=move || session.with(|s| s.title().to_string())
                        on:input=on_title_input
                    />
                    <CollectionSelector
                        page_id=document_id
                        current=collection_id
                        on_change=on_collection_change
                    />
                    <Show when=move || session.with(|s| s.is_dirty())>
                        <span class="text-xs text-warning">"● Unsaved"</span>
                    </Show>
                    <Show when=is_published>
                        <PublishedBadge>"Published"</PublishedBadge>
                    </Show>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        attr:disabled=move || busy() || is_empty()
                        on:click=on_save
                    >
                        <Show when=move || phase.get() == SessionPhase::Saving>
                            <Spinner />
                        </Show>
                        {move || if phase.get() == SessionPhase::Saving { "Saving..." } else { "Save" }}
                    </Button>
                    {publish_button}
                </header>

                {move || {
                    session
                        .with(|s| s.publish_gap().map(str::to_string))
                        .map(|gap| {
                            view! {
                                <Notice class="m-3 w-auto border-warning/40">
                                    <NoticeTitle class="text-warning">"Saved, but not published"</NoticeTitle>
                                    <NoticeDescription class="text-xs">
                                        {gap}
                                        " Publish again to retry."
                                    </NoticeDescription>
                                </Notice>
                            }
                        })
                }}

                <FormatToolbar handle=handle />

                <div class="min-h-0 flex-1 overflow-auto p-3">
                    <RichTextEditor handle=handle on_input=on_content_input />
                </div>

                <footer class="flex items-center justify-between gap-4 border-t bg-muted/40 px-3 py-2 text-xs text-muted-foreground">
                    <span>"Last saved: " {last_saved}</span>
                    {move || {
                        let id = session.with(|s| s.document_id())?;
                        is_published().then(|| {
                            view! {
                                <a
                                    class="text-primary underline underline-offset-4"
                                    href=format!("/preview/{id}")
                                    target="_blank"
                                >
                                    "Open preview"
                                </a>
                            }
                        })
                    }}
                    <span>
                        {move || {
                            session.with(|s| {
                                format!("Words: {} | Characters: {}", s.word_count(), s.char_count())
                            })
                        }}
                    </span>
                </footer>
            </div>
        </section>
    }
}
