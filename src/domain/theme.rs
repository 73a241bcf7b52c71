use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
    pub muted: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeFonts {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub colors: ThemeColors,
    pub fonts: ThemeFonts,
}

// (primary, secondary, accent, background, text, muted, heading font, body font)
type Preset = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const DEFAULT_PRESET: Preset = (
    "#2563eb", "#1e40af", "#f59e0b", "#ffffff", "#111827", "#6b7280", "Inter", "Inter",
);

fn preset_for(category: &str) -> Preset {
    match category.trim().to_ascii_lowercase().as_str() {
        "restaurant" | "cafe" | "bakery" | "bar" => (
            "#b91c1c", "#7f1d1d", "#f59e0b", "#fffbeb", "#1c1917", "#78716c",
            "Playfair Display", "Lato",
        ),
        "salon" | "spa" | "beauty" => (
            "#db2777", "#9d174d", "#a78bfa", "#fdf2f8", "#1f2937", "#9ca3af",
            "Cormorant Garamond", "Montserrat",
        ),
        "fitness" | "gym" => (
            "#16a34a", "#14532d", "#facc15", "#0f172a", "#f8fafc", "#94a3b8",
            "Oswald", "Roboto",
        ),
        "medical" | "dentist" | "clinic" => (
            "#0891b2", "#155e75", "#22c55e", "#f0f9ff", "#0f172a", "#64748b",
            "Source Sans Pro", "Source Sans Pro",
        ),
        "retail" | "store" | "shop" => (
            "#7c3aed", "#4c1d95", "#f97316", "#ffffff", "#18181b", "#71717a",
            "Poppins", "Open Sans",
        ),
        "professional" | "lawyer" | "accountant" | "consulting" => (
            "#1e3a8a", "#0f172a", "#ca8a04", "#f8fafc", "#0f172a", "#475569",
            "Merriweather", "Inter",
        ),
        _ => DEFAULT_PRESET,
    }
}

impl Theme {
    /// Theme preset for a business category. Unknown categories get the default palette.
    pub fn for_category(category: &str) -> Self {
        let (primary, secondary, accent, background, text, muted, heading, body) =
            preset_for(category);

        Self {
            colors: ThemeColors {
                primary: primary.to_string(),
                secondary: secondary.to_string(),
                accent: accent.to_string(),
                background: background.to_string(),
                text: text.to_string(),
                muted: muted.to_string(),
            },
            fonts: ThemeFonts {
                heading: heading.to_string(),
                body: body.to_string(),
            },
        }
    }

    /// CSS custom properties consumed by the rendered page.
    pub fn css_variables(&self) -> String {
        format!(
            ":root {{ --color-primary: {}; --color-secondary: {}; --color-accent: {}; \
             --color-background: {}; --color-text: {}; --color-muted: {}; \
             --font-heading: '{}', serif; --font-body: '{}', sans-serif; }}",
            css_value(&self.colors.primary),
            css_value(&self.colors.secondary),
            css_value(&self.colors.accent),
            css_value(&self.colors.background),
            css_value(&self.colors.text),
            css_value(&self.colors.muted),
            css_value(&self.fonts.heading),
            css_value(&self.fonts.body),
        )
    }
}

// theme values are user supplied and land inside a <style> block
fn css_value(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>' | '\'' | '"' | '\\'))
        .collect()
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_category("")
    }
}
