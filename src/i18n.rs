//! Internationalization (i18n) module
//!
//! Picks the console language from the system locale. English and
//! Ukrainian are shipped under `locales/`.
//! Note: Log messages remain in English for consistency.

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Ukrainian,
}

impl Language {
    /// Locale code as used by the files in `locales/`
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Ukrainian => "uk",
        }
    }

    /// Map a BCP 47 tag such as `uk-UA` or `en_US.UTF-8` to a language
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.to_lowercase();
        if tag.starts_with("uk") {
            Language::Ukrainian
        } else {
            Language::English
        }
    }
}

/// Detect the system language
pub fn detect_language() -> Language {
    sys_locale::get_locale()
        .map(|tag| Language::from_tag(&tag))
        .unwrap_or(Language::English)
}

/// Set the console locale from the system settings
pub fn init_locale() -> Language {
    let language = detect_language();
    rust_i18n::set_locale(language.code());
    language
}
