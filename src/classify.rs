//! Extension based file classification
//!
//! Maps a file extension to one of the fixed destination categories.
//! Anything not in the table (including files without an extension)
//! lands in [`Category::Others`].

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

/// Destination category for a sorted file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Images,
    Video,
    Documents,
    Audio,
    Archives,
    Others,
}

impl Category {
    /// All categories, in the order the folders are usually listed
    pub const ALL: [Category; 6] = [
        Category::Images,
        Category::Video,
        Category::Documents,
        Category::Audio,
        Category::Archives,
        Category::Others,
    ];

    /// Get the folder name for this category
    pub fn folder_name(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Video => "video",
            Category::Documents => "documents",
            Category::Audio => "audio",
            Category::Archives => "archives",
            Category::Others => "others",
        }
    }

    /// Extensions (uppercase, no dot) registered for this category
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Category::Images => &["JPEG", "PNG", "JPG", "SVG"],
            Category::Video => &["AVI", "MP4", "MOV", "MKV"],
            Category::Documents => &["DOC", "DOCX", "TXT", "PDF", "XLSX", "PPTX"],
            Category::Audio => &["MP3", "OGG", "WAV", "AMR"],
            Category::Archives => &["ZIP", "GZ", "TAR"],
            Category::Others => &[],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.folder_name())
    }
}

/// Uppercase extension -> category, built once on first use
static EXTENSION_TABLE: OnceLock<HashMap<&'static str, Category>> = OnceLock::new();

fn extension_table() -> &'static HashMap<&'static str, Category> {
    EXTENSION_TABLE.get_or_init(|| {
        Category::ALL
            .iter()
            .flat_map(|category| category.extensions().iter().map(move |ext| (*ext, *category)))
            .collect()
    })
}

/// Classify an extension (without the leading dot, any case)
pub fn classify(extension: &str) -> Category {
    if extension.is_empty() {
        return Category::Others;
    }
    extension_table()
        .get(extension.to_uppercase().as_str())
        .copied()
        .unwrap_or(Category::Others)
}

/// Classify a file by the extension of its name
///
/// Dotfiles such as `.bashrc` have no extension and go to `others`.
pub fn classify_path(path: &Path) -> Category {
    path.extension()
        .map(|ext| classify(&ext.to_string_lossy()))
        .unwrap_or(Category::Others)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_registered_extension() {
        for category in Category::ALL {
            for ext in category.extensions() {
                assert_eq!(classify(ext), category, "upper {}", ext);
                assert_eq!(classify(&ext.to_lowercase()), category, "lower {}", ext);

                let mut mixed: String = ext.to_lowercase();
                mixed.replace_range(0..1, &ext[0..1]);
                assert_eq!(classify(&mixed), category, "mixed {}", mixed);
            }
        }
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(classify(""), Category::Others);
        assert_eq!(classify("unknownext"), Category::Others);
        assert_eq!(classify("RAW"), Category::Others);
        assert_eq!(classify("ТХТ"), Category::Others);
    }

    #[test]
    fn test_classify_path() {
        assert_eq!(classify_path(Path::new("a.jpg")), Category::Images);
        assert_eq!(classify_path(Path::new("dir/b.MKV")), Category::Video);
        assert_eq!(classify_path(Path::new("backup.tar.gz")), Category::Archives);
        assert_eq!(classify_path(Path::new("c.unknownext")), Category::Others);
        assert_eq!(classify_path(Path::new("d")), Category::Others);
        assert_eq!(classify_path(Path::new(".bashrc")), Category::Others);
    }

    #[test]
    fn test_folder_names_are_distinct() {
        let names: std::collections::HashSet<_> =
            Category::ALL.iter().map(|c| c.folder_name()).collect();
        assert_eq!(names.len(), Category::ALL.len());
        assert_eq!(Category::Others.to_string(), "others");
    }
}
