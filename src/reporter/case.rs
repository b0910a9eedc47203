use regex::Regex;
use std::sync::OnceLock;

fn case_tag() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"@C(\d+)").expect("valid case tag regex"))
}

/// Case id from the first `@C<digits>` tag in a title
///
/// Titles without a tag, or with a number that does not fit in `u64`,
/// have no case id.
pub fn extract_case_id(title: &str) -> Option<u64> {
    let caps = case_tag().captures(title)?;
    caps.get(1)?.as_str().parse().ok()
}
