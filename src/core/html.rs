// src/core/html.rs
// Low-level HTML string scanning helpers.
// No DOM is built: callers walk blocks of a known tag name and read attributes
// straight off the opening tag. Tag and attribute names match case-insensitively.

use super::sanitize::normalize_entities;

/// Fast ASCII-only lowercasing. Byte offsets into the result line up with the input.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Index just past the `>` closing the tag that starts at `lt`.
/// A quote opens a value only right after `=`, so `title=don't` stays unquoted.
fn tag_end(s: &str, lt: usize) -> Option<usize> {
    let b = s.as_bytes();
    let mut quote: Option<u8> = None;
    let mut after_eq = false;
    for (i, &c) in b.iter().enumerate().skip(lt + 1) {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            b'>' => return Some(i + 1),
            b'"' | b'\'' if after_eq => quote = Some(c),
            b'=' => {
                after_eq = true;
                continue;
            }
            c if c.is_ascii_whitespace() => continue,
            _ => {}
        }
        after_eq = false;
    }
    None
}

/// Next `<name` opener at or after `from` in the lowercased text.
/// `<tr` must not match `<track`, so the name has to be followed by a delimiter.
fn find_opener(lc: &str, name: &str, from: usize) -> Option<usize> {
    let pat = format!("<{name}");
    let mut at = from;
    loop {
        let start = lc.get(at..)?.find(&pat)? + at;
        match lc.as_bytes().get(start + pat.len()) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(start),
            Some(_) => at = start + pat.len(),
            None => return None,
        }
    }
}

fn block_at(s: &str, lc: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    let start = find_opener(lc, name, from)?;
    let open_end = tag_end(s, start)?;
    if s[start..open_end].ends_with("/>") {
        return Some((start, open_end));
    }

    // Same-name nesting (a table inside a div inside a div) is tracked by depth.
    let close = format!("</{name}");
    let mut depth = 1usize;
    let mut at = open_end;
    loop {
        let next_close = lc.get(at..)?.find(&close)? + at;
        match find_opener(lc, name, at) {
            Some(o) if o < next_close => {
                depth += 1;
                at = tag_end(s, o)?;
            }
            _ => {
                let end = tag_end(s, next_close)?;
                depth -= 1;
                if depth == 0 {
                    return Some((start, end));
                }
                at = end;
            }
        }
    }
}

/// Iterator over consecutive top-level `<name>` blocks of a fragment.
pub struct TagBlocks<'a> {
    s: &'a str,
    lc: String,
    name: String,
    at: usize,
}

impl<'a> Iterator for TagBlocks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let (start, end) = block_at(self.s, &self.lc, &self.name, self.at)?;
        self.at = end;
        Some(&self.s[start..end])
    }
}

pub fn blocks<'a>(s: &'a str, name: &str) -> TagBlocks<'a> {
    TagBlocks { s, lc: to_lower(s), name: to_lower(name), at: 0 }
}

/// First `<name>` block in `s`, if any.
pub fn first_block<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    blocks(s, name).next()
}

/// The opening tag of a block, `<td class="x">` for `<td class="x">..</td>`.
pub fn opener(block: &str) -> &str {
    match tag_end(block, 0) {
        Some(end) => &block[..end],
        None => block,
    }
}

/// Lowercased tag name of a block or opener.
pub fn tag_name(block: &str) -> String {
    let body = block.strip_prefix('<').unwrap_or(block);
    let end = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    body[..end].to_ascii_lowercase()
}

/// Given a complete tag block like `<td ...>INNER</td>`,
/// return INNER without the wrapping tags (may still contain nested tags).
pub fn inner_after_open_tag(block: &str) -> &str {
    if let Some(open_end) = tag_end(block, 0) {
        if let Some(close_start) = block.rfind('<') {
            if close_start >= open_end {
                return &block[open_end..close_start];
            }
        }
    }
    ""
}

/// All attributes of an opener as `(lowercased name, value)` pairs.
/// Valueless attributes (`<td hidden>`) come back with an empty value.
pub fn attributes(block: &str) -> Vec<(String, String)> {
    let open = opener(block);
    let b = open.as_bytes();
    let n = b.len();
    let mut out = Vec::new();

    // skip "<name"
    let mut i = 1;
    while i < n && b[i].is_ascii_alphanumeric() { i += 1; }

    loop {
        while i < n && (b[i].is_ascii_whitespace() || b[i] == b'/') { i += 1; }
        if i >= n || b[i] == b'>' { break; }

        let name_start = i;
        while i < n && !b[i].is_ascii_whitespace() && !matches!(b[i], b'=' | b'>' | b'/') { i += 1; }
        let name = open[name_start..i].to_ascii_lowercase();

        while i < n && b[i].is_ascii_whitespace() { i += 1; }
        let value = if i < n && b[i] == b'=' {
            i += 1;
            while i < n && b[i].is_ascii_whitespace() { i += 1; }
            match b.get(i) {
                Some(&q) if q == b'"' || q == b'\'' => {
                    let v_start = i + 1;
                    let v_end = open[v_start..].find(q as char).map(|e| v_start + e).unwrap_or(n);
                    i = (v_end + 1).min(n);
                    &open[v_start..v_end]
                }
                _ => {
                    let v_start = i;
                    while i < n && !b[i].is_ascii_whitespace() && b[i] != b'>' { i += 1; }
                    &open[v_start..i]
                }
            }
        } else {
            ""
        };
        if !name.is_empty() {
            out.push((name, normalize_entities(value)));
        }
    }
    out
}

pub fn attr(block: &str, name: &str) -> Option<String> {
    let name = name.to_ascii_lowercase();
    attributes(block).into_iter().find(|(k, _)| *k == name).map(|(_, v)| v)
}

pub fn has_attr(block: &str, name: &str) -> bool {
    attr(block, name).is_some()
}

/// Whitespace-separated class tokens of the opener.
pub fn classes(block: &str) -> Vec<String> {
    attr(block, "class")
        .map(|c| c.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn has_class(block: &str, class: &str) -> bool {
    classes(block).iter().any(|c| c == class)
}

/// First element (any tag name) whose opener satisfies `pred`, as a full block.
pub fn find_element<'a>(s: &'a str, pred: impl Fn(&str) -> bool) -> Option<&'a str> {
    let lc = to_lower(s);
    let b = s.as_bytes();
    let mut at = 0usize;
    while let Some(rel) = s.get(at..)?.find('<') {
        let lt = at + rel;
        if !b.get(lt + 1).is_some_and(|c| c.is_ascii_alphabetic()) {
            at = lt + 1;
            continue;
        }
        let end = tag_end(s, lt)?;
        let open = &s[lt..end];
        if pred(open) {
            let name = tag_name(open);
            if let Some((start, stop)) = block_at(s, &lc, &name, lt) {
                return Some(&s[start..stop]);
            }
            return Some(open);
        }
        at = end;
    }
    None
}

/// First element carrying `class` among its class tokens.
pub fn find_by_class<'a>(s: &'a str, class: &str) -> Option<&'a str> {
    find_element(s, |open| has_class(open, class))
}

/// First element carrying attribute `name`.
pub fn find_with_attr<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    find_element(s, |open| has_attr(open, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_skips_longer_tag_names() {
        let doc = "<track src=x></track><tr class=a><td>1</td></tr>";
        assert_eq!(first_block(doc, "tr"), Some("<tr class=a><td>1</td></tr>"));
    }

    #[test]
    fn block_tracks_same_name_nesting() {
        let doc = r#"<div class="outer"><div>x</div><table></table></div><div>tail</div>"#;
        let outer = first_block(doc, "div").unwrap();
        assert_eq!(outer, r#"<div class="outer"><div>x</div><table></table></div>"#);
    }

    #[test]
    fn blocks_are_case_insensitive() {
        let doc = "<TR><TD>a</TD><td>b</td></TR>";
        let cells: Vec<&str> = blocks(doc, "td").map(inner_after_open_tag).collect();
        assert_eq!(cells, vec!["a", "b"]);
    }

    #[test]
    fn attributes_handle_quotes_and_bare_values() {
        let open = r#"<td class="cell-scheduled  x" colspan=2 data-x='a>b' hidden>"#;
        assert_eq!(classes(open), vec!["cell-scheduled", "x"]);
        assert_eq!(attr(open, "COLSPAN").as_deref(), Some("2"));
        assert_eq!(attr(open, "data-x").as_deref(), Some("a>b"));
        assert!(has_attr(open, "hidden"));
        assert!(!has_attr(open, "rel"));
    }

    #[test]
    fn apostrophe_in_bare_value_does_not_swallow_the_tag() {
        let doc = r#"<td title=don't class="cell-scheduled">x</td><td>y</td>"#;
        let cells: Vec<&str> = blocks(doc, "td").collect();
        assert_eq!(cells.len(), 2);
        assert_eq!(attr(cells[0], "title").as_deref(), Some("don't"));
        assert_eq!(classes(cells[0]), vec!["cell-scheduled"]);
        assert_eq!(inner_after_open_tag(cells[1]), "y");
    }

    #[test]
    fn find_by_class_returns_whole_element() {
        let doc = r#"<p>x</p><div rel="1" class="a b"><span>y</span></div>"#;
        let el = find_by_class(doc, "b").unwrap();
        assert!(el.starts_with("<div"));
        assert!(el.ends_with("</div>"));
        assert_eq!(attr(el, "rel").as_deref(), Some("1"));
        assert!(find_by_class(doc, "c").is_none());
    }
}
