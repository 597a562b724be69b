mod collection_modal;
mod collection_selector;
mod editor;
mod preview;
mod sidebar;

pub use editor::EditorPane;
pub use preview::PreviewPage;
pub use sidebar::Sidebar;

use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::models::DEFAULT_TITLE;
use crate::notify::report_failure;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn Topbar() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let creating: RwSignal<bool> = RwSignal::new(false);

    let on_create = move |_: web_sys::MouseEvent| {
        if creating.get_untracked() {
            return;
        }
        creating.set(true);

        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api.create_page(DEFAULT_TITLE, "").await {
                Ok(doc) => {
                    let id = doc.id;
                    app_state.0.insert_document(doc);
                    app_state.0.selected_document_id.set(Some(id));
                }
                Err(e) => report_failure("Failed to create new document", &e),
            }
            creating.set(false);
        });
    };

    view! {
        <nav class="flex h-12 shrink-0 items-center justify-between border-b bg-muted/30 px-4" data-name="Topbar">
            <a href="/" class="text-base font-semibold text-foreground">"TaskDoc"</a>
            <Button
                variant=ButtonVariant::Outline
                size=ButtonSize::Sm
                attr:disabled=move || creating.get()
                on:click=on_create
            >
                "+ New"
            </Button>
        </nav>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="flex h-screen flex-col bg-background text-foreground">
            <Topbar />
            <div class="flex min-h-0 flex-1 overflow-hidden">
                <Sidebar />
                <EditorPane />
            </div>
        </div>
    }
}
