//! Minimal case-insensitive tag scanning for bulletin pages.
//!
//! The pages are machine generated WordPress output; a full HTML parser is
//! not needed to pull one table and a couple of headings out of them.

/// ASCII lowercase, byte offsets stay valid against the original.
pub fn to_lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

fn is_tag_name_end(b: Option<&u8>) -> bool {
    match b {
        None => true,
        Some(&c) => c == b'>' || c == b'/' || c.is_ascii_whitespace(),
    }
}

/// All `<tag>` blocks of `s`, in document order.
pub fn tag_blocks<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let scanner = TagScanner::new(s, tag);
    let mut blocks = Vec::new();
    let mut pos = 0usize;
    while let Some((start, end)) = scanner.next_block(pos) {
        blocks.push(&s[start..end]);
        pos = end;
    }
    blocks
}

/// A document lowercased once, searched repeatedly for one element name.
struct TagScanner<'a> {
    s: &'a str,
    lc: String,
    open: String,
    close: String,
}

impl<'a> TagScanner<'a> {
    fn new(s: &'a str, tag: &str) -> Self {
        let tag = to_lower(tag);
        TagScanner {
            s,
            lc: to_lower(s),
            open: format!("<{}", tag),
            close: format!("</{}", tag),
        }
    }

    /// Next `<tag ...>...</tag>` block at or after `from`, as byte offsets
    /// with the end just past the closing tag.
    fn next_block(&self, from: usize) -> Option<(usize, usize)> {
        let (s, lc) = (self.s, self.lc.as_str());
        let mut search = from;
        let start = loop {
            let at = lc.get(search..)?.find(&self.open)? + search;
            // skip longer names sharing the prefix, e.g. <track> for <tr>
            if is_tag_name_end(lc.as_bytes().get(at + self.open.len())) {
                break at;
            }
            search = at + self.open.len();
        };
        let open_end = s[start..].find('>')? + start + 1;
        let close_at = lc[open_end..].find(&self.close)? + open_end;
        let end = s[close_at..].find('>').map_or(s.len(), |e| close_at + e + 1);
        Some((start, end))
    }
}

/// The opening tag of a block, e.g. `<a href="..." class="x">`.
pub fn open_tag(block: &str) -> &str {
    block.find('>').map_or(block, |e| &block[..=e])
}

/// Content between the opening tag and the last closing tag.
pub fn inner_after_open_tag(block: &str) -> &str {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return &block[oe + 1..cs];
            }
        }
    }
    ""
}

/// Value of an attribute in an opening tag. Handles double, single and
/// unquoted values.
pub fn attr(tag: &str, name: &str) -> Option<String> {
    let lc = to_lower(tag);
    let needle = format!("{}=", to_lower(name));
    let mut search = 0usize;
    let at = loop {
        let at = lc.get(search..)?.find(&needle)? + search;
        let preceded_by_space = at > 0 && lc.as_bytes()[at - 1].is_ascii_whitespace();
        if preceded_by_space {
            break at;
        }
        search = at + needle.len();
    };
    let rest = &tag[at + needle.len()..];
    let value = match rest.chars().next()? {
        q @ ('"' | '\'') => {
            let body = &rest[1..];
            &body[..body.find(q)?]
        }
        _ => {
            let end = rest
                .find(|c: char| c.is_ascii_whitespace() || c == '>')
                .unwrap_or(rest.len());
            &rest[..end]
        }
    };
    Some(normalize_entities(value))
}

/// Whether an opening tag lists `class` among its classes.
pub fn has_class(tag: &str, class: &str) -> bool {
    attr(tag, "class").is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

/// First `<tag>` block whose opening tag carries `class`.
pub fn first_block_with_class<'a>(s: &'a str, tag: &str, class: &str) -> Option<&'a str> {
    tag_blocks(s, tag)
        .into_iter()
        .find(|block| has_class(open_tag(block), class))
}

/// Visible text of a fragment: tags removed, entities decoded, whitespace
/// collapsed and trimmed.
pub fn inner_text(fragment: &str) -> String {
    normalize_ws(&normalize_entities(&strip_tags(fragment)))
}

pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#8211;", "-")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
