use super::collection_modal::CollectionModal;
use crate::api::UpdatePageRequest;
use crate::components::ui::{
    Badge, Button, ButtonSize, ButtonVariant, ColorDot, Input, PublishedBadge, Spinner,
};
use crate::models::{Collection, CollectionId, Document, DocumentId};
use crate::notify::{alert, confirm, prompt, report_failure};
use crate::sidebar::{collection_badge, filter_documents, group_documents, SidebarViewMode};
use crate::state::AppContext;
use crate::storage::{load_view_mode, save_view_mode};
use crate::validation::validate_rename;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn Sidebar() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let documents = app_state.0.documents;
    let selected = app_state.0.selected_document_id;

    let collections: RwSignal<Vec<Collection>> = RwSignal::new(vec![]);
    let collections_request_id: RwSignal<u64> = RwSignal::new(0);

    let search: RwSignal<String> = RwSignal::new(String::new());
    let view_mode: RwSignal<SidebarViewMode> = RwSignal::new(load_view_mode());

    let modal_open: RwSignal<bool> = RwSignal::new(false);
    let editing_collection: RwSignal<Option<Collection>> = RwSignal::new(None);

    let refresh_collections = move || {
        let req_id = collections_request_id.get_untracked().saturating_add(1);
        collections_request_id.set(req_id);

        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = api.list_collections().await;
            if collections_request_id.get_untracked() != req_id {
                return;
            }
            match result {
                Ok(list) => collections.set(list),
                Err(e) => leptos::logging::error!("failed to load collections: {e}"),
            }
        });
    };

    app_state.0.refresh_documents();
    refresh_collections();

    let set_view_mode = move |mode: SidebarViewMode| {
        view_mode.set(mode);
        save_view_mode(mode);
    };

    let on_rename = move |id: DocumentId| {
        let Some(doc) = documents.with_untracked(|docs| docs.iter().find(|d| d.id == id).cloned())
        else {
            return;
        };
        let Some(answer) = prompt("Enter new title:", &doc.title) else {
            return;
        };
        let title = match validate_rename(&answer) {
            Ok(t) => t,
            Err(e) => {
                alert(&e.to_string());
                return;
            }
        };

        let body = UpdatePageRequest {
            title,
            content: doc.content,
            collection_id: None,
            published: None,
        };
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api.update_page(id, &body).await {
                Ok(updated) => app_state.0.apply_rename(updated),
                Err(e) => report_failure("Failed to rename document", &e),
            }
        });
    };

    let on_delete = move |id: DocumentId| {
        if !confirm("Are you sure you want to delete this document?") {
            return;
        }
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api.delete_page(id).await {
                Ok(()) => app_state.0.remove_document(id),
                Err(e) => report_failure("Failed to delete document", &e),
            }
        });
    };

    let on_delete_collection = move |id: CollectionId| {
        if !confirm(
            "Are you sure you want to delete this collection? Documents will not be deleted, just moved out of the collection.",
        ) {
            return;
        }
        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api.delete_collection(id).await {
                Ok(()) => {
                    collections.update(|list| list.retain(|c| c.id != id));
                    // Member documents still carry the old id until this lands.
                    app_state.0.refresh_documents();
                }
                Err(e) => report_failure("Failed to delete collection", &e),
            }
        });
    };

    let on_collection_saved = move |(saved, was_edit): (Collection, bool)| {
        collections.update(|list| {
            if was_edit {
                if let Some(slot) = list.iter_mut().find(|c| c.id == saved.id) {
                    *slot = saved;
                }
            } else {
                list.insert(0, saved);
            }
        });
        refresh_collections();
    };

    let open_create = move |_: web_sys::MouseEvent| {
        editing_collection.set(None);
        modal_open.set(true);
    };

    let filtered = Memo::new(move |_| documents.with(|docs| filter_documents(docs, &search.get())));

    let row = move |doc: Document| {
        let id = doc.id;
        let badge_doc = doc.clone();
        let badge = move || {
            if view_mode.get() != SidebarViewMode::All {
                return None;
            }
            collections
                .with(|c| collection_badge(&badge_doc, c))
                .map(|(name, color)| {
                    view! {
                        <Badge attr:style=format!("border-color: {color}; color: {color}")>{name}</Badge>
                    }
                })
        };
        let is_active = move || selected.get() == Some(id);

        view! {
            <li
                class=move || {
                    if is_active() {
                        "group flex items-center justify-between gap-2 rounded-md bg-accent px-2 py-1.5 text-sm text-accent-foreground cursor-pointer"
                    } else {
                        "group flex items-center justify-between gap-2 rounded-md px-2 py-1.5 text-sm hover:bg-accent/50 cursor-pointer"
                    }
                }
                on:click=move |_| selected.set(Some(id))
            >
                <div class="flex min-w-0 items-center gap-1.5">
                    <span class="truncate">{doc.title.clone()}</span>
                    {doc.published.then(|| view! { <PublishedBadge>"Published"</PublishedBadge> })}
                    {badge}
                </div>
                <div class="flex shrink-0 gap-1 opacity-0 group-hover:opacity-100">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:title="Rename"
                        on:click=move |ev: web_sys::MouseEvent| {
                            ev.stop_propagation();
                            on_rename(id);
                        }
                    >
                        "✏️"
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:title="Delete"
                        on:click=move |ev: web_sys::MouseEvent| {
                            ev.stop_propagation();
                            on_delete(id);
                        }
                    >
                        "🗑️"
                    </Button>
                </div>
            </li>
        }
    };

    let all_view = move || {
        view! {
            <ul class="flex flex-col gap-0.5">
                <For
                    each=move || filtered.get()
                    key=|d| (d.id, d.updated_at, d.title.clone(), d.collection_id)
                    children=row
                />
            </ul>
        }
    };

    let grouped_view = move || {
        let grouped = collections.with(|c| filtered.with(|docs| group_documents(docs, c)));
        let uncategorized = grouped.uncategorized;

        view! {
            <div class="flex flex-col gap-3">
                {(!uncategorized.is_empty()).then(|| {
                    let count = uncategorized.len();
                    view! {
                        <details open>
                            <summary class="cursor-pointer px-2 py-1 text-xs text-muted-foreground">
                                {format!("Uncategorized ({count})")}
                            </summary>
                            <ul class="flex flex-col gap-0.5">
                                {uncategorized.into_iter().map(row).collect_view()}
                            </ul>
                        </details>
                    }
                })}
                {grouped
                    .groups
                    .into_iter()
                    .map(|group| {
                        let collection = group.collection;
                        let count = group.documents.len();
                        let for_edit = collection.clone();
                        let collection_id = collection.id;
                        view! {
                            <details open>
                                <summary class="flex cursor-pointer items-center gap-2 px-2 py-1 text-sm">
                                    <ColorDot color=collection.color.clone() />
                                    <span class="truncate">{collection.name.clone()}</span>
                                    <Badge class="ml-auto">{count}</Badge>
                                </summary>
                                <div class="flex gap-1 px-2 py-1">
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        on:click=move |_| {
                                            editing_collection.set(Some(for_edit.clone()));
                                            modal_open.set(true);
                                        }
                                    >
                                        "Edit"
                                    </Button>
                                    <Button
                                        variant=ButtonVariant::DestructiveOutline
                                        size=ButtonSize::Sm
                                        on:click=move |_| on_delete_collection(collection_id)
                                    >
                                        "Delete"
                                    </Button>
                                </div>
                                {if group.documents.is_empty() {
                                    view! {
                                        <p class="px-2 py-2 text-center text-xs text-muted-foreground">
                                            "No documents in this collection"
                                        </p>
                                    }
                                    .into_any()
                                } else {
                                    view! {
                                        <ul class="flex flex-col gap-0.5">
                                            {group.documents.into_iter().map(row).collect_view()}
                                        </ul>
                                    }
                                    .into_any()
                                }}
                            </details>
                        }
                    })
                    .collect_view()}
            </div>
        }
    };

    let mode_button = move |mode: SidebarViewMode| {
        move || {
            let variant = if view_mode.get() == mode {
                ButtonVariant::Default
            } else {
                ButtonVariant::Ghost
            };
            view! {
                <Button variant=variant size=ButtonSize::Sm on:click=move |_| set_view_mode(mode)>
                    {mode.label()}
                </Button>
            }
        }
    };

    view! {
        <aside class="flex h-full w-[280px] shrink-0 flex-col gap-2 border-r bg-muted/30 p-2" data-name="Sidebar">
            <div class="flex items-center justify-between">
                <h2 class="text-xs font-medium uppercase tracking-wide text-muted-foreground">"Documents"</h2>
                <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=open_create>
                    "+ Collection"
                </Button>
            </div>

            <div class="flex gap-1">
                {mode_button(SidebarViewMode::All)}
                {mode_button(SidebarViewMode::ByCollection)}
            </div>

            <Input placeholder="Search..." bind_value=search class="h-8 text-sm" />

            <div class="min-h-0 flex-1 overflow-auto">
                <Show when=move || app_state.0.documents_loading.get() && documents.with(|d| d.is_empty())>
                    <div class="flex justify-center py-4">
                        <Spinner />
                    </div>
                </Show>
                {move || match view_mode.get() {
                    SidebarViewMode::All => all_view().into_any(),
                    SidebarViewMode::ByCollection => grouped_view().into_any(),
                }}
            </div>

            <CollectionModal open=modal_open editing=editing_collection on_saved=on_collection_saved />
        </aside>
    }
}
