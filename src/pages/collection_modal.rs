use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Input, Label, Modal, ModalFooter, ModalHeader, ModalTitle,
    Notice, NoticeDescription, Spinner, TextArea,
};
use crate::models::{Collection, DEFAULT_COLLECTION_COLOR};
use crate::notify::report_failure;
use crate::state::AppContext;
use crate::validation::CollectionDraft;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Create/edit form for a collection.
///
/// `editing` selects the mode: `None` creates, `Some` updates that collection.
/// `on_saved` receives the server record and whether it was an edit.
#[component]
pub fn CollectionModal(
    open: RwSignal<bool>,
    editing: RwSignal<Option<Collection>>,
    #[prop(into)] on_saved: Callback<(Collection, bool)>,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let name: RwSignal<String> = RwSignal::new(String::new());
    let description: RwSignal<String> = RwSignal::new(String::new());
    let color: RwSignal<String> = RwSignal::new(DEFAULT_COLLECTION_COLOR.to_string());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    // Reset the form whenever the modal opens or switches target.
    Effect::new(move |_| {
        if !open.get() {
            return;
        }
        match editing.get() {
            Some(c) => {
                name.set(c.name);
                description.set(c.description.unwrap_or_default());
                color.set(c.color);
            }
            None => {
                name.set(String::new());
                description.set(String::new());
                color.set(DEFAULT_COLLECTION_COLOR.to_string());
            }
        }
        error.set(None);
    });

    let close = move || {
        open.set(false);
        editing.set(None);
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let draft = CollectionDraft {
            name: name.get_untracked(),
            description: description.get_untracked(),
            color: color.get_untracked(),
        };
        let body = match draft.validate() {
            Ok(body) => body,
            Err(e) => {
                error.set(Some(e.to_string()));
                return;
            }
        };

        let target = editing.get_untracked().map(|c| c.id);
        let api = app_state.0.api_client.get_untracked();
        loading.set(true);
        error.set(None);

        spawn_local(async move {
            let result = match target {
                Some(id) => api.update_collection(id, &body).await,
                None => api.create_collection(&body).await,
            };
            loading.set(false);

            match result {
                Ok(saved) => {
                    on_saved.run((saved, target.is_some()));
                    close();
                }
                Err(e) => report_failure("Failed to save collection", &e),
            }
        });
    };

    let is_edit = move || editing.get().is_some();

    view! {
        <Modal open=open on_close=Callback::new(move |_: ()| close())>
            <ModalHeader>
                <ModalTitle>
                    {move || if is_edit() { "Edit Collection" } else { "Create New Collection" }}
                </ModalTitle>
            </ModalHeader>

            <form class="flex flex-col gap-4" on:submit=on_submit>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="collection-name" class="text-xs">"Collection Name"</Label>
                    <Input
                        id="collection-name"
                        placeholder="Enter collection name"
                        bind_value=name
                        autofocus=true
                        class="h-8 text-sm"
                    />
                </div>

                <div class="flex flex-col gap-1.5">
                    <Label html_for="collection-description" class="text-xs">"Description (Optional)"</Label>
                    <TextArea
                        id="collection-description"
                        placeholder="Enter collection description"
                        bind_value=description
                        class="text-sm"
                    />
                </div>

                <div class="flex flex-col gap-1.5">
                    <Label html_for="collection-color" class="text-xs">"Color"</Label>
                    <div class="flex items-center gap-2">
                        <Input r#type="color" bind_value=color class="h-9 w-12 p-1" />
                        <Input
                            id="collection-color"
                            placeholder=DEFAULT_COLLECTION_COLOR
                            bind_value=color
                            class="h-8 text-sm"
                        />
                    </div>
                </div>

                {move || {
                    error.get().map(|e| {
                        view! {
                            <Notice class="border-destructive/30">
                                <NoticeDescription class="text-destructive text-xs">{e}</NoticeDescription>
                            </Notice>
                        }
                    })
                }}

                <ModalFooter>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        attr:r#type="button"
                        on:click=move |_| close()
                    >
                        "Cancel"
                    </Button>
                    <Button size=ButtonSize::Sm attr:disabled=move || loading.get()>
                        <Show when=move || loading.get()>
                            <Spinner />
                        </Show>
                        {move || {
                            if loading.get() {
                                "Saving..."
                            } else if is_edit() {
                                "Update"
                            } else {
                                "Create"
                            }
                        }}
                    </Button>
                </ModalFooter>
            </form>
        </Modal>
    }
}
