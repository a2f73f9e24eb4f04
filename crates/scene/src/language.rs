/// A language the embedding service can return words for.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Language {
    /// Short code used for the user's filter selection.
    pub code: &'static str,
    /// Name sent to and returned by the service.
    pub name: &'static str,
    pub color: [f32; 4],
}

/// Colour of the origin marker and of words without a language.
pub const NEUTRAL_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

pub const LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English", color: [0.36, 0.62, 0.98, 1.0] },
    Language { code: "es", name: "Spanish", color: [0.98, 0.45, 0.35, 1.0] },
    Language { code: "fr", name: "French", color: [0.62, 0.42, 0.95, 1.0] },
    Language { code: "de", name: "German", color: [0.98, 0.80, 0.25, 1.0] },
    Language { code: "it", name: "Italian", color: [0.30, 0.80, 0.45, 1.0] },
    Language { code: "pt", name: "Portuguese", color: [0.20, 0.75, 0.75, 1.0] },
    Language { code: "nl", name: "Dutch", color: [0.98, 0.60, 0.15, 1.0] },
    Language { code: "ru", name: "Russian", color: [0.85, 0.30, 0.55, 1.0] },
    Language { code: "ja", name: "Japanese", color: [0.95, 0.55, 0.75, 1.0] },
    Language { code: "zh", name: "Chinese", color: [0.90, 0.25, 0.25, 1.0] },
];

pub fn by_code(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

pub fn by_name(name: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.name == name)
}

/// Render colour for a word's language tag.
pub fn color_for(language: Option<&str>) -> [f32; 4] {
    language
        .and_then(by_name)
        .map(|l| l.color)
        .unwrap_or(NEUTRAL_COLOR)
}
