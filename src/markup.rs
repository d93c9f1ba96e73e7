//! Naive HTML string helpers, tailored to the two provider pages the
//! crawler reads (fixture anchors on the match-week page, the summary-info
//! blocks on the match page). Deliberately not a real HTML parser.

/// Returns the value of `attr="..."` inside a single opening tag. The
/// attribute name must start after whitespace so that e.g. `data-class`
/// never satisfies a lookup for `class`.
pub fn attr_value<'a>(tag: &'a str, attr: &str) -> Option<&'a str> {
    let pat = format!("{attr}=\"");
    let mut from = 0;
    while let Some(rel) = tag[from..].find(&pat) {
        let at = from + rel;
        if tag[..at].ends_with(char::is_whitespace) {
            let start = at + pat.len();
            let end = tag[start..].find('"')? + start;
            return Some(&tag[start..end]);
        }
        from = at + pat.len();
    }
    None
}

/// `href` values of every `<a>` whose class list contains `class`, in
/// document order.
pub fn anchor_hrefs_with_class(html: &str, class: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut from = 0;
    while let Some((start, end)) = next_tag_with_class(html, class, from) {
        let tag = &html[start..end];
        if tag_name(tag).eq_ignore_ascii_case("a") {
            if let Some(href) = attr_value(tag, "href") {
                out.push(href.to_string());
            }
        }
        from = end;
    }
    out
}

/// Inner text of every element whose class list contains `class`, tags
/// stripped and whitespace collapsed, in document order. Nested elements of
/// the same tag name are not handled; the provider pages do not nest these.
pub fn texts_with_class(html: &str, class: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut from = 0;
    while let Some((start, end)) = next_tag_with_class(html, class, from) {
        let close = format!("</{}", tag_name(&html[start..end]));
        match html[end..].find(&close) {
            Some(rel) => {
                out.push(strip_tags(&html[end..end + rel]));
                from = end + rel + close.len();
            }
            None => from = end,
        }
    }
    out
}

/// Removes every `<...>` run, decodes the two entities the provider pages
/// actually use, and collapses whitespace.
pub fn strip_tags(s: &str) -> String {
    let mut text = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    normalize_ws(&text.replace("&nbsp;", " ").replace("&amp;", "&"))
}

fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Next opening tag at or after `from` whose class list contains `class`.
/// Returns the byte range of the tag itself, `<` through `>` inclusive.
fn next_tag_with_class(html: &str, class: &str, from: usize) -> Option<(usize, usize)> {
    let mut at = from;
    while let Some(rel) = html.get(at..)?.find('<') {
        let start = at + rel;
        let end = start + html[start..].find('>')? + 1;
        let tag = &html[start..end];
        if !tag.starts_with("</") && tag_has_class(tag, class) {
            return Some((start, end));
        }
        at = end;
    }
    None
}

fn tag_has_class(tag: &str, class: &str) -> bool {
    attr_value(tag, "class")
        .map(|list| list.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

fn tag_name(tag: &str) -> &str {
    let inner = tag.trim_start_matches('<');
    let end = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    &inner[..end]
}

#[cfg(test)]
mod tests {
    use super::{anchor_hrefs_with_class, strip_tags, texts_with_class};

    const PAGE: &str = r#"
        <ul>
            <li><a class="match-fixture match-fixture--abridged" href="/match/75001">ARS v CHE</a></li>
            <li><a class="match-fixture" href="/match/75002">LIV v MCI</a></li>
            <li><a class="match-fixture--abridged" href="/match/75003">TOT v NEW</a></li>
        </ul>
        <div class="mc-summary__info">Att: 59,921</div>
        <div class="mc-summary__info">Referee: <strong>M.&nbsp;Oliver</strong></div>
    "#;

    #[test]
    fn hrefs_filtered_by_exact_class_token() {
        assert_eq!(
            anchor_hrefs_with_class(PAGE, "match-fixture--abridged"),
            vec!["/match/75001".to_string(), "/match/75003".to_string()]
        );
    }

    #[test]
    fn class_texts_come_back_stripped_in_order() {
        assert_eq!(
            texts_with_class(PAGE, "mc-summary__info"),
            vec!["Att: 59,921".to_string(), "Referee: M. Oliver".to_string()]
        );
    }

    #[test]
    fn attribute_lookup_requires_a_word_boundary() {
        let tag = r#"<a data-class="match-fixture--abridged" href="/clubs/1">"#;
        assert_eq!(super::attr_value(tag, "class"), None);
        assert_eq!(super::attr_value(tag, "href"), Some("/clubs/1"));
        assert!(anchor_hrefs_with_class(tag, "match-fixture--abridged").is_empty());
    }

    #[test]
    fn strip_tags_collapses_whitespace_and_entities() {
        assert_eq!(strip_tags(" <b>Kane</b> &amp;\n <i>Son</i> "), "Kane & Son");
    }
}
