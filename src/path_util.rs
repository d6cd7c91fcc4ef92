/// Drops the query string and fragment, if any, from a request path.
pub fn strip_query_and_fragment(path: &str) -> &str {
    match path.find(|c: char| c == '?' || c == '#') {
        Some(end) => &path[..end],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_query_and_fragment() {
        assert_eq!(strip_query_and_fragment("/a/b"), "/a/b");
        assert_eq!(strip_query_and_fragment("/a/b?x=1"), "/a/b");
        assert_eq!(strip_query_and_fragment("/a/b#top"), "/a/b");
        assert_eq!(strip_query_and_fragment("/a/b#top?x=1"), "/a/b");
        assert_eq!(strip_query_and_fragment("?x=1"), "");
    }
}
