use crate::types::ThemeMode;

pub struct ThemeDefinition {
    pub css: &'static str,
    pub toggle_label: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Dark => ThemeDefinition {
            css: DARK_THEME,
            toggle_label: "Light",
        },
        ThemeMode::Light => ThemeDefinition {
            css: LIGHT_THEME,
            toggle_label: "Dark",
        },
    }
}

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #020617;
    --color-bg-secondary: #0f172a;
    --color-bg-overlay: rgba(2, 6, 23, 0.6);
    --color-text-primary: #f8fafc;
    --color-text-muted: #94a3b8;
    --color-border: rgba(255, 255, 255, 0.1);
    --color-accent: #60a5fa;
    --color-accent-strong: #a855f7;
    --color-input-bg: rgba(15, 23, 42, 0.6);
    --color-chat-user-bg: linear-gradient(90deg, #3b82f6, #8b5cf6);
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: rgba(30, 41, 59, 0.6);
    --color-chat-assistant-text: #e2e8f0;
    --color-code-bg: #1e293b;
    --color-timestamp: #64748b;
    --color-error: #fca5a5;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.composer textarea { background: var(--color-input-bg); color: var(--color-text-primary); border-color: var(--color-border); }
.md code { background: var(--color-code-bg); }
"#;

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #ffffff;
    --color-bg-secondary: #f1f5f9;
    --color-bg-overlay: rgba(255, 255, 255, 0.9);
    --color-text-primary: #0f172a;
    --color-text-muted: #475569;
    --color-border: rgba(15, 23, 42, 0.12);
    --color-accent: #2563eb;
    --color-accent-strong: #7c3aed;
    --color-input-bg: #ffffff;
    --color-chat-user-bg: linear-gradient(90deg, #2563eb, #7c3aed);
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #f1f5f9;
    --color-chat-assistant-text: #0f172a;
    --color-code-bg: #e2e8f0;
    --color-timestamp: #64748b;
    --color-error: #b91c1c;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.composer textarea { background: var(--color-input-bg); color: var(--color-text-primary); border-color: var(--color-border); }
.md code { background: var(--color-code-bg); }
"#;
