use once_cell::sync::Lazy;

use crate::error::{HarnessError, HarnessResult};

/// One external package under test: a unique name and the URL it is cloned
/// from into a fresh ephemeral directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub name: &'static str,
    pub url: &'static str,
}

/// Fixed registry of real-world packages the config is exercised against.
pub static TARGETS: Lazy<Vec<Target>> = Lazy::new(|| {
    [
        ("chalk", "https://github.com/chalk/chalk"),
        ("wrap-ansi", "https://github.com/chalk/wrap-ansi"),
        ("np", "https://github.com/sindresorhus/np"),
        ("ora", "https://github.com/sindresorhus/ora"),
        ("p-map", "https://github.com/sindresorhus/p-map"),
        ("os-locale", "https://github.com/sindresorhus/os-locale"),
        ("execa", "https://github.com/sindresorhus/execa"),
        ("pify", "https://github.com/sindresorhus/pify"),
        ("boxen", "https://github.com/sindresorhus/boxen"),
        ("make-dir", "https://github.com/sindresorhus/make-dir"),
        ("listr", "https://github.com/SamVerschueren/listr"),
        ("listr-update-renderer", "https://github.com/SamVerschueren/listr-update-renderer"),
        ("bragg", "https://github.com/SamVerschueren/bragg"),
        ("bragg-router", "https://github.com/SamVerschueren/bragg-router"),
        ("dev-time", "https://github.com/SamVerschueren/dev-time"),
        ("decode-uri-component", "https://github.com/SamVerschueren/decode-uri-component"),
        ("to-ico", "https://github.com/kevva/to-ico"),
        ("download", "https://github.com/kevva/download"),
        ("brightness", "https://github.com/kevva/brightness"),
        ("decompress", "https://github.com/kevva/decompress"),
        ("npm-conf", "https://github.com/kevva/npm-conf"),
        ("imagemin", "https://github.com/imagemin/imagemin"),
        ("color-convert", "https://github.com/qix-/color-convert"),
        ("eslint-plugin-unicorn", "https://github.com/sindresorhus/eslint-plugin-unicorn"),
        ("ky", "https://github.com/sindresorhus/ky"),
        ("query-string", "https://github.com/sindresorhus/query-string"),
        ("meow", "https://github.com/sindresorhus/meow"),
        ("emittery", "https://github.com/sindresorhus/emittery"),
        ("p-queue", "https://github.com/sindresorhus/p-queue"),
        ("pretty-bytes", "https://github.com/sindresorhus/pretty-bytes"),
        ("normalize-url", "https://github.com/sindresorhus/normalize-url"),
        ("pageres", "https://github.com/sindresorhus/pageres"),
        ("got", "https://github.com/sindresorhus/got"),
    ]
    .iter()
    .map(|&(name, url)| Target { name, url })
    .collect()
});

/// Resolve a subset of registry names, preserving registry order. An empty
/// selection means the full registry; unknown names are an input error.
pub fn select(names: &[String]) -> HarnessResult<Vec<Target>> {
    if names.is_empty() {
        return Ok(TARGETS.clone());
    }

    for name in names {
        if !TARGETS.iter().any(|t| t.name == name) {
            return Err(HarnessError::Unexpected(format!(
                "Unknown target: {} (not in the registry)",
                name
            )));
        }
    }

    Ok(TARGETS
        .iter()
        .filter(|t| names.iter().any(|n| n == t.name))
        .copied()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = TARGETS.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), TARGETS.len());
    }

    #[test]
    fn test_urls_look_like_github() {
        assert!(TARGETS.iter().all(|t| t.url.starts_with("https://github.com/")));
    }

    #[test]
    fn test_empty_selection_is_full_registry() {
        let selected = select(&[]).unwrap();
        assert_eq!(selected.len(), TARGETS.len());
    }

    #[test]
    fn test_selection_preserves_registry_order() {
        let selected = select(&["got".to_string(), "chalk".to_string()]).unwrap();
        let names: Vec<_> = selected.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["chalk", "got"]);
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let result = select(&["left-pad".to_string()]);
        assert!(matches!(result, Err(HarnessError::Unexpected(_))));
    }
}
