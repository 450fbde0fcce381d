//! SEO composite segments: `<title-slug>-<trailing-id>`.

use super::translit::anchor_id;

/// Longest title slug kept in a composite segment
pub const MAX_TITLE_SLUG_LEN: usize = 50;

/// Build the readable path segment for a resource.
///
/// The title slug is cut to [`MAX_TITLE_SLUG_LEN`] characters (dangling
/// hyphens removed) and joined to `id` with a hyphen. When the title yields
/// no slug the bare id is returned; an empty id yields an empty segment.
pub fn build_seo_segment(title: &str, id: &str) -> String {
    if id.is_empty() {
        return String::new();
    }

    let slug = anchor_id(title);
    // anchor ids are pure ASCII, so byte and char lengths agree
    let truncated = if slug.len() > MAX_TITLE_SLUG_LEN {
        slug[..MAX_TITLE_SLUG_LEN].trim_end_matches('-')
    } else {
        slug.as_str()
    };

    if truncated.is_empty() {
        id.to_string()
    } else {
        format!("{}-{}", truncated, id)
    }
}

/// The id part of a segment: everything after the last hyphen, or the whole
/// segment when it has none.
pub fn extract_trailing_id(segment: &str) -> &str {
    match segment.rfind('-') {
        Some(pos) => &segment[pos + 1..],
        None => segment,
    }
}

/// Readable path of a resource within its group
pub fn canonical_path(group_slug: &str, title: &str, id: &str) -> String {
    format!("/{}/{}", group_slug, build_seo_segment(title, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_seo_segment() {
        let segment = build_seo_segment("Интерактивный Тренажёр", "42");
        assert_eq!(segment, "interaktivnyy-trenazher-42");
        assert_eq!(extract_trailing_id(&segment), "42");
    }

    #[test]
    fn test_hyphenated_titles_keep_the_id() {
        let segment = build_seo_segment("A-B-C", "7");
        assert_eq!(segment, "a-b-c-7");
        assert_eq!(extract_trailing_id(&segment), "7");

        let segment = build_seo_segment("Дизайн-система — с нуля", "aZ3k9");
        assert_eq!(extract_trailing_id(&segment), "aZ3k9");
    }

    #[test]
    fn test_long_titles_are_truncated() {
        let title = "Очень длинное название ресурса которое никак не помещается в адрес";
        let segment = build_seo_segment(title, "101");
        let slug = segment.strip_suffix("-101").unwrap();

        assert!(slug.len() <= MAX_TITLE_SLUG_LEN);
        assert!(!slug.ends_with('-'));
        assert!(anchor_id(title).starts_with(slug));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(build_seo_segment("", "42"), "42");
        assert_eq!(build_seo_segment("!!!", "42"), "42");
        assert_eq!(build_seo_segment("Title", ""), "");
        assert_eq!(extract_trailing_id(""), "");
        assert_eq!(extract_trailing_id("plain"), "plain");
        assert_eq!(extract_trailing_id("ends-with-"), "");
    }

    #[test]
    fn test_round_trip_for_hyphen_free_ids() {
        for title in ["", "Figma", "Grid Garden", "Тренажёры-и-игры", "2024 — итоги"] {
            for id in ["1", "42", "9000000", "aZ3k9", "x_y"] {
                let segment = build_seo_segment(title, id);
                assert_eq!(extract_trailing_id(&segment), id, "{:?} {:?}", title, id);
            }
        }
    }

    #[test]
    fn test_canonical_path() {
        assert_eq!(
            canonical_path("trainers", "Grid Garden", "302"),
            "/trainers/grid-garden-302"
        );
    }
}
