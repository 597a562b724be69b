pub mod badge;
pub mod button;
pub mod input;
pub mod modal;
pub mod notice;
pub mod spinner;

// Re-export component symbols so callers can `use crate::components::ui::Button` etc.
pub use badge::*;
pub use button::*;
pub use input::*;
pub use modal::*;
pub use notice::*;
pub use spinner::*;
