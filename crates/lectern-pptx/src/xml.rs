/// Local part of a possibly prefixed XML name (`a:tbl` -> `tbl`).
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|b| *b == b':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Namespace prefix of a qualified name, if any (`a:tbl` -> `a`).
pub(crate) fn prefix_of(name: &[u8]) -> Option<&str> {
    let idx = name.iter().position(|b| *b == b':')?;
    std::str::from_utf8(&name[..idx]).ok()
}

pub(crate) fn prefixed_tag(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}

/// DrawingML boolean attribute (`xsd:boolean`).
pub(crate) fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_qualified_names() {
        assert_eq!(local_name(b"a:tbl"), b"tbl");
        assert_eq!(local_name(b"tbl"), b"tbl");
        assert_eq!(prefix_of(b"a:tbl"), Some("a"));
        assert_eq!(prefix_of(b"tbl"), None);
        assert_eq!(prefixed_tag(Some("a"), "tr"), "a:tr");
        assert_eq!(prefixed_tag(None, "tr"), "tr");
        assert!(parse_bool("true") && parse_bool("1") && !parse_bool("0"));
    }
}
