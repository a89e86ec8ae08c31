/// Builds a URL slug from a display name, e.g. "Data Science" -> "data-science"
pub fn make_slug(text: &str) -> String {
    let cleaned: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ' || *c == '-')
        .collect();

    cleaned
        .split(|c: char| c == ' ' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Successor of the most recent course code in a program.
///
/// Codes are `C` followed by at least three digits; any non-digit characters
/// of the previous code are ignored when computing the successor.
pub fn next_course_code(last_code: Option<&str>) -> String {
    let next = last_code
        .map(|code| code.chars().filter(char::is_ascii_digit).collect::<String>())
        .and_then(|digits| digits.parse::<u32>().ok())
        .map_or(1, |n| n + 1);

    format!("C{next:03}")
}
