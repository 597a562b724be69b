use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {ModalHeader, div, "flex flex-col gap-1.5 text-left"}
    clx! {ModalTitle, h2, "text-lg leading-none font-semibold"}
    clx! {ModalFooter, div, "flex flex-row justify-end gap-2"}
}

pub use components::*;

/// Centered dialog shown while `open` is true.
///
/// Clicking the backdrop or pressing Escape calls `on_close`; the caller owns `open`.
#[component]
pub fn Modal(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] on_close: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    let on_key = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" {
            on_close.run(());
        }
    };

    view! {
        <Show when=move || open.get()>
            <div
                data-name="ModalBackdrop"
                class="fixed inset-0 z-50 flex items-center justify-center bg-black/50"
                on:click=move |_| on_close.run(())
            >
                <div
                    data-name="Modal"
                    role="dialog"
                    aria-modal="true"
                    tabindex="-1"
                    class="grid w-full max-w-[calc(100%-2rem)] gap-4 rounded-lg border bg-background p-6 shadow-lg sm:max-w-[480px]"
                    on:click=|ev| ev.stop_propagation()
                    on:keydown=on_key
                >
                    {children()}
                </div>
            </div>
        </Show>
    }
}
