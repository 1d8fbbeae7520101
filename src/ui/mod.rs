pub mod style;
pub mod template;
pub mod widgets;

pub use style::{StyleTokens, LAYOUT_TOKENS, PAGE_STYLESHEET};
pub use template::{build_page, ids, startup_failure_page, NO_PRINT_CLASS};
pub use widgets::{bilingual_label, icon, icon_button, section_title};
