use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Notice, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {NoticeTitle, h4, "mb-1 font-medium tracking-tight leading-none"}
    clx! {NoticeDescription, p, "text-sm [&_p]:leading-relaxed"}
}

pub use components::*;
