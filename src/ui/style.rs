/// Compile-time layout and motion tokens; not user-overridable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTokens {
    pub qr_code_size: u32,
    pub mobile_breakpoint: u32,
    pub export_settle_ms: u64,
    pub theme_transition_ms: u64,
    pub resize_debounce_ms: u64,
    pub success_reset_ms: u64,
    pub error_reset_ms: u64,
    pub toast_duration_ms: u32,
    pub loading_hide_ms: u64,
}

pub const LAYOUT_TOKENS: StyleTokens = StyleTokens {
    qr_code_size: 120,
    mobile_breakpoint: 768,
    export_settle_ms: 300,
    theme_transition_ms: 300,
    resize_debounce_ms: 250,
    success_reset_ms: 2_000,
    error_reset_ms: 3_000,
    toast_duration_ms: 3_000,
    loading_hide_ms: 500,
};

pub const PAGE_STYLESHEET: &str = r#"
:root { --primary-color: #2563eb; --accent-color: #3b73ed; --text-color: #1e293b; --surface: #ffffff; }
body[data-theme="dark"] { --text-color: #e2e8f0; --surface: #1e293b; }
body { margin: 0; font-family: "Inter", "Noto Sans Arabic", sans-serif; color: var(--text-color); background: var(--surface); }
body.rtl { direction: rtl; }
.controls { display: flex; gap: 8px; padding: 12px; justify-content: flex-end; }
.btn-control { border: 1px solid var(--primary-color); border-radius: 8px; padding: 6px 12px; background: transparent; color: var(--primary-color); }
.theme-color.active { outline: 2px solid var(--accent-color); }
.cv-wrapper { display: grid; grid-template-columns: 1fr 2fr; gap: 24px; max-width: 1100px; margin: 0 auto; padding: 24px; }
.cv-wrapper.mobile-layout { grid-template-columns: 1fr; }
.section-title { color: var(--primary-color); border-bottom: 2px solid var(--accent-color); }
.skill-item, .tech-tag, .interest-item { display: inline-block; margin: 2px; padding: 2px 8px; border-radius: 12px; background: var(--accent-color); color: #ffffff; }
.profile-image { width: 140px; height: 140px; border-radius: 50%; object-fit: cover; }
.theme-transition * { transition: all 0.3s ease; }
.loading-screen { position: fixed; inset: 0; display: flex; align-items: center; justify-content: center; background: var(--surface); z-index: 1000; transition: opacity 0.3s ease; }
.loading-screen.hidden { opacity: 0; visibility: hidden; pointer-events: none; }
.modal-overlay, .error-message { position: fixed; inset: 0; display: flex; align-items: center; justify-content: center; background: rgba(0, 0, 0, 0.6); }
@media print { .no-print { display: none !important; } }
"#;
