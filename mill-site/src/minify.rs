//! Non-compliant, non-perfect minifiers (whitespace rules not respected).
//!
//! Both passes are single forward scans over bytes with a couple of state
//! flags, tuned for the output of this generator rather than arbitrary
//! documents. Known deviations from the standards: CSS whitespace is dropped
//! after any of `,;:{}()` even where it is significant, and HTML comments
//! are stripped even inside `<pre>` blocks.

/// True when `data[..=i]` ends with `pat`.
fn ends_with_at(data: &[u8], i: usize, pat: &[u8]) -> bool {
    i + 1 >= pat.len() && &data[i + 1 - pat.len()..=i] == pat
}

/// Strips CSS comments and whitespace that follows a delimiter.
pub fn minify_css(css: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(css.len());

    let mut in_comment = false;
    for i in 0..css.len() {
        let cur = css[i];
        if cur == b'\r' {
            continue;
        }

        if in_comment {
            if ends_with_at(css, i, b"*/") {
                in_comment = false;
            }
        } else if css[i..].starts_with(b"/*") {
            in_comment = true;
        } else if !cur.is_ascii_whitespace()
            || !out.last().map_or(true, |c| b" \t\n,;:{}()".contains(c))
        {
            out.push(cur);
        }
    }

    out
}

/// Strips HTML comments, whitespace inside tags and whitespace runs in text,
/// leaving `<pre>`, `<script>` and `<style>` content untouched.
pub fn minify_html(html: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(html.len());

    let mut in_other: Option<&[u8]> = None;
    let mut in_comment = false;
    let mut in_pre = false;
    let mut in_tag = false;
    let mut maybe_space = false;
    for i in 0..html.len() {
        let cur = html[i];
        if cur == b'\r' {
            continue;
        }

        if let Some(close) = in_other {
            if ends_with_at(html, i, close) {
                in_other = None;
            }
            out.push(cur);
        } else if html[i..].starts_with(b"<style") {
            in_other = Some(b"</style>");
            out.push(cur);
        } else if html[i..].starts_with(b"<script") {
            in_other = Some(b"</script>");
            out.push(cur);
        } else if in_comment {
            if ends_with_at(html, i, b"-->") {
                in_comment = false;
            }
        } else if html[i..].starts_with(b"<!--") {
            in_comment = true;
        } else if in_pre {
            if ends_with_at(html, i, b"</pre>") {
                in_pre = false;
            }
            out.push(cur);
        } else if html[i..].starts_with(b"<pre") {
            in_pre = true;
            out.push(cur);
        } else if in_tag {
            if cur == b'>' {
                in_tag = false;
                out.push(cur);
            } else if !cur.is_ascii_whitespace()
                || !out.last().map_or(true, |c| b" \t\n<".contains(c))
            {
                out.push(cur);
            }
        } else if cur == b'<' {
            in_tag = true;
            maybe_space = false;
            out.push(cur);
        } else if cur.is_ascii_whitespace() && out.last() == Some(&b'>') {
            // Whitespace between tags only survives when text follows.
            maybe_space = true;
        } else if !cur.is_ascii_whitespace() && maybe_space {
            maybe_space = false;
            out.push(b' ');
            out.push(cur);
        } else if !cur.is_ascii_whitespace() || !out.last().map_or(true, |c| b" \t\n".contains(c))
        {
            out.push(cur);
        }
    }

    out
}
