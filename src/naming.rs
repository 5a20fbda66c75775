//! Filename parsing for the dated post convention.
//!
//! Posts are named `YYYY-MM-DD-slug.ext`. The date part must be zero-padded
//! (`2024-01-05`, never `2024-1-5`), the slug is everything between the date
//! and the final extension, and the extension must be one the site recognizes
//! as post content.
//!
//! - `2024-01-01-hello.md` → date 2024-01-01, slug `hello`, ext `md`
//! - `2024-01-01-hello.world.md` → slug `hello.world`
//! - `2023-1-5-x.md` → not a post name
//!
//! Shape and calendar validity are checked separately: a name with the right
//! shape but an impossible date (`2023-02-30-x.md`) is reported as
//! [`PostName::InvalidDate`] so collectors can explain why it was skipped.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// `YYYY-MM-DD-slug.ext`. ASCII classes only: the regex crate is built
/// without its Unicode tables.
const POST_NAME_PATTERN: &str = r"^([0-9]{4})-([0-9]{2})-([0-9]{2})-(.+)\.([^.]+)$";

static POST_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(POST_NAME_PATTERN).expect("post name pattern must compile"));

/// A filename that matched the dated post shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedName {
    pub date: NaiveDate,
    pub slug: String,
    pub ext: String,
}

/// Outcome of parsing a post filename.
#[derive(Debug, Clone, PartialEq)]
pub enum PostName {
    /// Shape and date are both valid.
    Valid(DatedName),
    /// Shape matched but the date is not a calendar date.
    InvalidDate { raw: String },
}

/// Parse a bare filename (no directories) against the post pattern.
///
/// Returns `None` when the shape does not match at all; extension filtering
/// is left to the caller since the recognized set is configurable.
pub fn parse_post_name(file_name: &str) -> Option<PostName> {
    let caps = POST_NAME.captures(file_name)?;
    let (year, month, day) = (&caps[1], &caps[2], &caps[3]);
    let slug = caps[4].to_string();
    let ext = caps[5].to_string();

    let date = match (year.parse(), month.parse(), day.parse()) {
        (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d),
        _ => None,
    };

    Some(match date {
        Some(date) => PostName::Valid(DatedName { date, slug, ext }),
        None => PostName::InvalidDate {
            raw: format!("{year}-{month}-{day}"),
        },
    })
}

/// Strip the final extension from a path-like name: `sub/post.html` → `sub/post`.
///
/// Only the last component's extension is removed; dots in directory names
/// are left alone.
pub fn strip_extension(name: &str) -> &str {
    let file_start = name.rfind('/').map_or(0, |i| i + 1);
    match name[file_start..].rfind('.') {
        Some(dot) if dot > 0 => &name[..file_start + dot],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(name: &str) -> DatedName {
        match parse_post_name(name) {
            Some(PostName::Valid(d)) => d,
            other => panic!("expected valid post name for {name}, got {other:?}"),
        }
    }

    #[test]
    fn pattern_compiles_with_enabled_regex_features() {
        let re = Regex::new(POST_NAME_PATTERN);
        assert!(re.is_ok(), "{:?}", re.err());
        assert!(POST_NAME.is_match("2024-01-01-hello.md"));
    }

    #[test]
    fn non_ascii_digits_are_not_dates() {
        assert_eq!(parse_post_name("２０２４-01-01-wide.md"), None);
    }

    #[test]
    fn simple_post_name() {
        let p = valid("2024-01-01-hello.md");
        assert_eq!(p.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(p.slug, "hello");
        assert_eq!(p.ext, "md");
    }

    #[test]
    fn slug_keeps_dashes_and_inner_dots() {
        let p = valid("2019-12-31-a-long.slug-name.markdown");
        assert_eq!(p.slug, "a-long.slug-name");
        assert_eq!(p.ext, "markdown");
    }

    #[test]
    fn unpadded_date_does_not_match() {
        assert_eq!(parse_post_name("2023-1-5-x.md"), None);
    }

    #[test]
    fn missing_slug_does_not_match() {
        assert_eq!(parse_post_name("2023-01-05.md"), None);
        assert_eq!(parse_post_name("2023-01-05-.md"), None);
    }

    #[test]
    fn missing_extension_does_not_match() {
        assert_eq!(parse_post_name("2023-01-05-hello"), None);
    }

    #[test]
    fn impossible_date_is_reported() {
        assert_eq!(
            parse_post_name("2023-02-30-x.md"),
            Some(PostName::InvalidDate {
                raw: "2023-02-30".to_string()
            })
        );
    }

    #[test]
    fn leap_day_is_valid() {
        let p = valid("2024-02-29-leap.md");
        assert_eq!(p.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn strip_extension_last_component_only() {
        assert_eq!(strip_extension("default.html"), "default");
        assert_eq!(strip_extension("sub/post.html"), "sub/post");
        assert_eq!(strip_extension("v1.2/base"), "v1.2/base");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension(".hidden"), ".hidden");
    }
}
