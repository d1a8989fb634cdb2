//! Whitelist HTML filter for free-text bookmark fields.
//!
//! Applied when records leave the service, never when they are stored, so the
//! rows keep the user's original text. Tags outside the allowlist are
//! neutralized by escaping their delimiters instead of being dropped, which
//! keeps the surrounding text readable. `href` and `src` keep only http(s)
//! or site-relative targets.

const ALLOWED_TAGS: &[(&str, &[&str])] = &[
    ("a", &["href", "title", "target"]),
    ("abbr", &["title"]),
    ("b", &[]),
    ("blockquote", &["cite"]),
    ("br", &[]),
    ("code", &[]),
    ("em", &[]),
    ("i", &[]),
    ("img", &["src", "alt", "title", "width", "height"]),
    ("li", &[]),
    ("ol", &[]),
    ("p", &[]),
    ("pre", &[]),
    ("small", &[]),
    ("strong", &[]),
    ("sub", &[]),
    ("sup", &[]),
    ("ul", &[]),
];

fn allowed_attributes(tag: &str) -> Option<&'static [&'static str]> {
    ALLOWED_TAGS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, attrs)| *attrs)
}

/// Filters `input` against the tag allowlist. Allowed tags are re-emitted
/// with only their allowed attributes; everything else that looks like markup
/// has its `<` and `>` escaped.
pub fn clean_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find(['<', '>']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with('>') {
            out.push_str("&gt;");
            rest = &tail[1..];
            continue;
        }

        match take_tag(tail) {
            Some(raw) => {
                emit_tag(&mut out, raw);
                rest = &tail[raw.len()..];
            }
            None => {
                out.push_str("&lt;");
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// The raw source of the tag starting at `text[0] == '<'`, delimiters
/// included. Returns None unless an optional '/' and a letter follow the
/// opening bracket and a closing '>' exists outside quoted attribute values.
fn take_tag(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut i = 1;

    if i < bytes.len() && bytes[i] == b'/' {
        i += 1;
    }
    if i >= bytes.len() || !bytes[i].is_ascii_alphabetic() {
        return None;
    }

    let mut quote: Option<u8> = None;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => match quote {
                Some(q) if q == bytes[i] => quote = None,
                Some(_) => {}
                None => quote = Some(bytes[i]),
            },
            b'>' if quote.is_none() => return Some(&text[..=i]),
            _ => {}
        }
        i += 1;
    }

    None
}

fn emit_tag(out: &mut String, raw: &str) {
    let source = &raw[1..raw.len() - 1];
    let (closing, body) = match source.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, source),
    };
    let (body, self_closing) = match body.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (body, false),
    };

    let name_end = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    let name = body[..name_end].to_ascii_lowercase();

    let Some(allowed) = allowed_attributes(&name) else {
        out.push_str("&lt;");
        out.push_str(source);
        out.push_str("&gt;");
        return;
    };

    if closing {
        out.push_str("</");
        out.push_str(&name);
        out.push('>');
        return;
    }

    out.push('<');
    out.push_str(&name);
    for (attr, value) in parse_attributes(&body[name_end..]) {
        if !allowed.contains(&attr.as_str()) {
            continue;
        }
        if matches!(attr.as_str(), "href" | "src")
            && !value.as_deref().is_some_and(safe_link_target)
        {
            continue;
        }
        out.push(' ');
        out.push_str(&attr);
        if let Some(value) = value {
            out.push_str("=\"");
            out.push_str(&value.replace('"', "&quot;"));
            out.push('"');
        }
    }
    if self_closing {
        out.push_str(" /");
    }
    out.push('>');
}

/// Targets an `href` or `src` may carry: http(s) URLs and site-relative
/// paths. Anything else, `javascript:` and `data:` schemes included, drops
/// the attribute.
fn safe_link_target(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty()
        || value.starts_with('/')
        || value.starts_with('#')
        || value.starts_with('.')
    {
        return true;
    }
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn parse_attributes(mut text: &str) -> Vec<(String, Option<String>)> {
    let mut attrs = Vec::new();

    loop {
        text = text.trim_start();
        if text.is_empty() {
            return attrs;
        }

        let name_end = text
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(text.len());
        if name_end == 0 {
            // Stray '=' with no attribute name; drop it and resync.
            text = &text[1..];
            continue;
        }

        let name = text[..name_end].to_ascii_lowercase();
        text = text[name_end..].trim_start();

        if let Some(rest) = text.strip_prefix('=') {
            let (value, remaining) = take_attribute_value(rest.trim_start());
            attrs.push((name, Some(value.to_string())));
            text = remaining;
        } else {
            attrs.push((name, None));
        }
    }
}

fn take_attribute_value(text: &str) -> (&str, &str) {
    match text.as_bytes().first() {
        Some(&quote) if quote == b'"' || quote == b'\'' => match text[1..].find(quote as char) {
            Some(end) => (&text[1..1 + end], &text[2 + end..]),
            None => (&text[1..], ""),
        },
        _ => {
            let end = text
                .find(|c: char| c.is_whitespace())
                .unwrap_or(text.len());
            (&text[..end], &text[end..])
        }
    }
}
