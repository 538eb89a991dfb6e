//! Category name encoding
//!
//! Hierarchical paths use a single `|` between segments. Multi-language
//! names join `text@lang` variants with `|||`.

/// Separator between localized variants of one name
pub const MULTI_VALUE_SEPARATOR: &str = "|||";

/// Separator between segments of a hierarchical path
pub const PATH_SEPARATOR: char = '|';

/// [`PATH_SEPARATOR`] as a string, for joining segments
pub const PATH_SEPARATOR_STR: &str = "|";

/// Marker that starts the language suffix of a variant
pub const LANGUAGE_MARKER: char = '@';

/// Whether a stored name carries several localized variants.
///
/// Detection is by substring, as the platform does it: a single-language
/// name that happens to contain `|||` is treated as multi-valued too.
pub fn is_multi_valued(name: &str) -> bool {
    name.contains(MULTI_VALUE_SEPARATOR)
}

/// Localized texts of a multi-valued name, language suffixes removed
pub fn localized_texts(name: &str) -> impl Iterator<Item = &str> {
    name.split(MULTI_VALUE_SEPARATOR).map(strip_language)
}

/// Text before the first `@`, or the whole variant when there is none
pub fn strip_language(variant: &str) -> &str {
    match variant.find(LANGUAGE_MARKER) {
        Some(pos) => &variant[..pos],
        None => variant,
    }
}

/// Flat-mode match of a stored name against a requested one
pub fn matches_name(stored: &str, requested: &str) -> bool {
    if is_multi_valued(stored) {
        localized_texts(stored).any(|text| text == requested)
    } else {
        stored == requested
    }
}

/// Non-empty segments of a hierarchical path
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split(PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Text to show for a stored name in the given language.
///
/// Falls back to the first variant when no variant has that language.
pub fn display_name<'a>(stored: &'a str, language: Option<&str>) -> &'a str {
    if !is_multi_valued(stored) {
        return strip_language(stored);
    }

    if let Some(lang) = language {
        for variant in stored.split(MULTI_VALUE_SEPARATOR) {
            if let Some((text, suffix)) = variant.split_once(LANGUAGE_MARKER) {
                if suffix.eq_ignore_ascii_case(lang) {
                    return text;
                }
            }
        }
    }

    stored
        .split(MULTI_VALUE_SEPARATOR)
        .next()
        .map(strip_language)
        .unwrap_or(stored)
}
