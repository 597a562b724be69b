use crate::sidebar::SidebarViewMode;
use serde::{Deserialize, Serialize};

pub(crate) const SIDEBAR_VIEW_MODE_KEY: &str = "taskdoc_sidebar_view_mode";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let json = local_storage()?.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn load_view_mode() -> SidebarViewMode {
    load_json_from_storage(SIDEBAR_VIEW_MODE_KEY).unwrap_or_default()
}

pub(crate) fn save_view_mode(mode: SidebarViewMode) {
    save_json_to_storage(SIDEBAR_VIEW_MODE_KEY, &mode);
}

// WASM-only: needs a real localStorage.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_view_mode_round_trips_through_local_storage() {
        save_view_mode(SidebarViewMode::ByCollection);
        assert_eq!(load_view_mode(), SidebarViewMode::ByCollection);

        save_view_mode(SidebarViewMode::All);
        assert_eq!(load_view_mode(), SidebarViewMode::All);
    }

    #[wasm_bindgen_test]
    fn test_garbage_falls_back_to_default() {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(SIDEBAR_VIEW_MODE_KEY, "not json");
        }
        assert_eq!(load_view_mode(), SidebarViewMode::All);
    }
}
