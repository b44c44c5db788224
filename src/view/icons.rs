/// Glyph shown in front of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileIcon {
    Folder,
    FolderOpen,
    JavaScript,
    React,
    TypeScript,
    Html,
    Css,
    Sass,
    Markdown,
    Python,
    Java,
    C,
    Cpp,
    CSharp,
    Go,
    Php,
    Ruby,
    Swift,
    Docker,
    Yaml,
    Sql,
    Git,
    Npm,
    Image,
    Svg,
    Text,
    Json,
    /// Anything without a dedicated glyph
    File,
}

impl FileIcon {
    /// Terminal glyph, padded with a trailing space
    pub fn glyph(self) -> &'static str {
        match self {
            FileIcon::Folder => "📁 ",
            FileIcon::FolderOpen => "📂 ",
            FileIcon::JavaScript => "📜 ",
            FileIcon::React => "⚛️  ",
            FileIcon::TypeScript => "🔷 ",
            FileIcon::Html => "🌐 ",
            FileIcon::Css | FileIcon::Sass => "🎨 ",
            FileIcon::Markdown => "📝 ",
            FileIcon::Python => "🐍 ",
            FileIcon::Java => "☕ ",
            FileIcon::C | FileIcon::Cpp | FileIcon::CSharp => "🔧 ",
            FileIcon::Go => "🐹 ",
            FileIcon::Php => "🐘 ",
            FileIcon::Ruby => "💎 ",
            FileIcon::Swift => "🐦 ",
            FileIcon::Docker => "🐳 ",
            FileIcon::Yaml | FileIcon::Json => "⚙️  ",
            FileIcon::Sql => "🗃️  ",
            FileIcon::Git => "🌱 ",
            FileIcon::Npm => "📦 ",
            FileIcon::Image | FileIcon::Svg => "🖼️  ",
            FileIcon::Text => "📄 ",
            FileIcon::File => "📄 ",
        }
    }

    /// Short ASCII tag used when glyphs are turned off
    pub fn tag(self) -> &'static str {
        match self {
            FileIcon::Folder => "+",
            FileIcon::FolderOpen => "-",
            _ => " ",
        }
    }
}

/// Icon for a directory in the given expansion state
pub fn icon_for_directory(expanded: bool) -> FileIcon {
    if expanded {
        FileIcon::FolderOpen
    } else {
        FileIcon::Folder
    }
}

/// Icon for a file, looked up by full name first and then by extension
///
/// `Dockerfile`, `.gitignore` and `.npmrc` are recognized by name; files
/// with no known name or extension get the generic file icon.
pub fn icon_for_file(name: &str) -> FileIcon {
    let lower = name.to_lowercase();
    if let Some(icon) = lookup(&lower) {
        return icon;
    }
    lower
        .rsplit('.')
        .next()
        .and_then(lookup)
        .unwrap_or(FileIcon::File)
}

fn lookup(key: &str) -> Option<FileIcon> {
    let icon = match key {
        "js" => FileIcon::JavaScript,
        "jsx" | "tsx" => FileIcon::React,
        "ts" => FileIcon::TypeScript,
        "html" => FileIcon::Html,
        "css" => FileIcon::Css,
        "scss" => FileIcon::Sass,
        "md" => FileIcon::Markdown,
        "py" => FileIcon::Python,
        "java" => FileIcon::Java,
        "c" => FileIcon::C,
        "cpp" => FileIcon::Cpp,
        "cs" => FileIcon::CSharp,
        "go" => FileIcon::Go,
        "php" => FileIcon::Php,
        "rb" => FileIcon::Ruby,
        "swift" => FileIcon::Swift,
        "dockerfile" => FileIcon::Docker,
        "yml" | "yaml" => FileIcon::Yaml,
        "sql" => FileIcon::Sql,
        "gitignore" | ".gitignore" => FileIcon::Git,
        "npmrc" | ".npmrc" | "lock" => FileIcon::Npm,
        "png" | "jpg" | "jpeg" | "gif" | "ico" => FileIcon::Image,
        "svg" => FileIcon::Svg,
        "txt" => FileIcon::Text,
        "json" => FileIcon::Json,
        _ => return None,
    };
    Some(icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_by_extension() {
        assert_eq!(icon_for_file("main.js"), FileIcon::JavaScript);
        assert_eq!(icon_for_file("App.TSX"), FileIcon::React);
        assert_eq!(icon_for_file("archive.tar.json"), FileIcon::Json);
        assert_eq!(icon_for_file("logo.PNG"), FileIcon::Image);
    }

    #[test]
    fn test_icon_by_name() {
        assert_eq!(icon_for_file("Dockerfile"), FileIcon::Docker);
        assert_eq!(icon_for_file(".gitignore"), FileIcon::Git);
        assert_eq!(icon_for_file("package-lock"), FileIcon::File);
        assert_eq!(icon_for_file("yarn.lock"), FileIcon::Npm);
    }

    #[test]
    fn test_unknown_files_get_generic_icon() {
        assert_eq!(icon_for_file("Makefile"), FileIcon::File);
        assert_eq!(icon_for_file("data.bin"), FileIcon::File);
        assert_eq!(icon_for_file(""), FileIcon::File);
    }

    #[test]
    fn test_directory_icon_follows_expansion() {
        assert_eq!(icon_for_directory(true), FileIcon::FolderOpen);
        assert_eq!(icon_for_directory(false), FileIcon::Folder);
        assert_eq!(FileIcon::Folder.glyph(), "📁 ");
    }
}
