use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Badge, span, "inline-flex items-center gap-1 rounded-full border px-2 py-0.5 text-[11px] font-medium leading-none whitespace-nowrap"}
    clx! {PublishedBadge, span, "inline-flex items-center rounded-full bg-success px-2 py-0.5 text-[11px] font-medium leading-none text-success-foreground"}
}

pub use components::*;

/// Round swatch showing a collection's color.
#[component]
pub fn ColorDot(#[prop(into)] color: String) -> impl IntoView {
    view! {
        <span
            class="inline-block size-3 shrink-0 rounded-full border border-black/10"
            style=format!("background-color: {color}")
        ></span>
    }
}
