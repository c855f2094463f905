//! Parse collected HTTP response header lines.

/// Content type of the final response in `lines`.
///
/// Header blocks of interim responses (`100 Continue`, redirects) are discarded: each
/// status line starts a new block.
pub(crate) fn parse_content_type(lines: &[String]) -> Option<String> {
    let mut content_type = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            content_type = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-type") {
                content_type = Some(value.trim().to_string());
            }
        }
    }

    content_type
}
