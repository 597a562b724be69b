use crate::components::ui::ColorDot;
use crate::models::{Collection, CollectionId, DocumentId};
use crate::notify::report_failure;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

/// Value of the "No Collection" option.
const NO_COLLECTION: &str = "";

fn parse_choice(value: &str) -> Option<CollectionId> {
    value.trim().parse().ok()
}

fn option_value(collection_id: Option<CollectionId>) -> String {
    collection_id.map(|id| id.to_string()).unwrap_or_default()
}

/// Assigns the open document to a collection right away through the
/// add-page/remove-page endpoints, then reports the new assignment together with
/// the page it was made for.
#[component]
pub fn CollectionSelector(
    #[prop(into)] page_id: Signal<Option<DocumentId>>,
    #[prop(into)] current: Signal<Option<CollectionId>>,
    #[prop(into)] on_change: Callback<(DocumentId, Option<CollectionId>)>,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let collections: RwSignal<Vec<Collection>> = RwSignal::new(vec![]);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let api = app_state.0.api_client.get_untracked();
    spawn_local(async move {
        match api.list_collections().await {
            Ok(list) => collections.set(list),
            Err(e) => leptos::logging::error!("failed to load collections: {e}"),
        }
    });

    let on_select = move |ev: web_sys::Event| {
        let Some(select) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
        else {
            return;
        };
        let value = select.value();
        let Some(page_id) = page_id.get_untracked() else {
            return;
        };

        let choice = parse_choice(&value);
        if choice == current.get_untracked() {
            return;
        }

        let api = app_state.0.api_client.get_untracked();
        loading.set(true);
        spawn_local(async move {
            let result = match choice {
                Some(collection_id) => api.add_page_to_collection(page_id, collection_id).await,
                None => api.remove_page_from_collection(page_id).await,
            };
            loading.set(false);

            match result {
                Ok(()) => on_change.run((page_id, choice)),
                Err(e) => {
                    // The rejected option is still shown; put the assignment back.
                    select.set_value(&option_value(current.get_untracked()));
                    report_failure("Failed to update collection", &e);
                }
            }
        });
    };

    let current_collection = move || {
        let id = current.get()?;
        collections.with(|list| list.iter().find(|c| c.id == id).cloned())
    };

    view! {
        <div class="flex items-center gap-2" data-name="CollectionSelector">
            {move || current_collection().map(|c| view! { <ColorDot color=c.color /> })}
            <select
                class="h-8 rounded-md border border-input bg-transparent px-2 text-sm shadow-xs outline-none focus-visible:ring-2 focus-visible:ring-ring/50 disabled:opacity-50"
                prop:disabled=move || loading.get()
                prop:value=move || option_value(current.get())
                on:change=on_select
            >
                <option value=NO_COLLECTION>"No Collection"</option>
                <For
                    each=move || collections.get()
                    key=|c| (c.id, c.name.clone())
                    children=move |c: Collection| {
                        let id = c.id;
                        view! {
                            <option
                                value=id.to_string()
                                selected=move || current.get() == Some(id)
                            >
                                {c.name}
                            </option>
                        }
                    }
                />
            </select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice(NO_COLLECTION), None);
        assert_eq!(parse_choice("12"), Some(12));
        assert_eq!(parse_choice("abc"), None);
    }

    #[test]
    fn test_option_value_matches_rendered_options() {
        assert_eq!(option_value(None), NO_COLLECTION);
        assert_eq!(option_value(Some(7)), "7");
        assert_eq!(parse_choice(&option_value(Some(7))), Some(7));
    }
}
