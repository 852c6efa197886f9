//! Reply formatting (embed-like replies -> Telegram HTML).

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Title-case a stored move name for display: every letter that follows a
/// non-letter is upper-cased, the rest lower-cased (`thunder-wave` ->
/// `Thunder-Wave`).
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Colour of a reply; Telegram has no embeds, so it becomes a leading marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    Error,
}

impl Tone {
    fn marker_lead(&self) -> &'static str {
        match self {
            Self::Success => "✅ ",
            Self::Info => "📘 ",
            Self::Error => "❌ ",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyField {
    pub name: String,
    pub value: String,
}

/// A structured bot reply: title, body and optional named fields.
///
/// All text is plain; escaping happens in `to_html`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub tone: Tone,
    pub title: String,
    pub description: String,
    pub fields: Vec<ReplyField>,
}

impl Reply {
    pub fn new(tone: Tone, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tone,
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Tone::Success, title, description)
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Tone::Info, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Tone::Error, title, description)
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(ReplyField {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.tone == Tone::Error
    }

    pub fn to_html(&self) -> String {
        self.html_lines()
            .iter()
            .map(HtmlLine::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render to HTML chunks of at most `limit` bytes. Chunks break on line
    /// boundaries; an over-long line is split in its plain text, so no chunk
    /// ends inside an entity or an unclosed tag.
    pub fn to_html_chunks(&self, limit: usize) -> Vec<String> {
        let limit = limit.max(1);
        let mut pieces = Vec::new();
        for line in self.html_lines() {
            let rendered = line.render();
            if rendered.len() <= limit {
                pieces.push(rendered);
            } else {
                pieces.extend(line.split(limit));
            }
        }
        pack_lines(pieces, limit)
    }

    fn html_lines(&self) -> Vec<HtmlLine> {
        let mut lines = vec![HtmlLine::bold(self.tone.marker_lead(), &self.title)];
        if !self.description.is_empty() {
            lines.push(HtmlLine::plain(""));
            lines.extend(self.description.split('\n').map(HtmlLine::plain));
        }
        for f in &self.fields {
            lines.push(HtmlLine::plain(""));
            lines.push(HtmlLine::bold("", &f.name));
            lines.extend(f.value.split('\n').map(HtmlLine::plain));
        }
        lines
    }
}

const BOLD_OPEN: &str = "<b>";
const BOLD_CLOSE: &str = "</b>";

/// One output line: a raw lead (already HTML) followed by plain text,
/// optionally in bold.
struct HtmlLine {
    lead: &'static str,
    text: String,
    bold: bool,
}

impl HtmlLine {
    fn plain(text: &str) -> Self {
        Self {
            lead: "",
            text: text.to_string(),
            bold: false,
        }
    }

    fn bold(lead: &'static str, text: &str) -> Self {
        Self {
            lead,
            text: text.to_string(),
            bold: true,
        }
    }

    fn wrap(&self, lead: &str, escaped: &str) -> String {
        if self.bold {
            format!("{lead}{BOLD_OPEN}{escaped}{BOLD_CLOSE}")
        } else {
            format!("{lead}{escaped}")
        }
    }

    fn render(&self) -> String {
        self.wrap(self.lead, &escape_html(&self.text))
    }

    /// Split the plain text so every rendered piece fits in `limit`. The lead
    /// stays on the first piece; bold pieces are closed and reopened. A
    /// single char that cannot fit still forms a piece of its own.
    fn split(&self, limit: usize) -> Vec<String> {
        let tags = if self.bold {
            BOLD_OPEN.len() + BOLD_CLOSE.len()
        } else {
            0
        };

        let mut out = Vec::new();
        let mut lead = self.lead;
        let mut piece = String::new();
        let mut piece_len = lead.len() + tags;
        let mut buf = [0u8; 4];
        for c in self.text.chars() {
            let escaped = escape_html(c.encode_utf8(&mut buf));
            if !piece.is_empty() && piece_len + escaped.len() > limit {
                out.push(self.wrap(lead, &piece));
                lead = "";
                piece.clear();
                piece_len = tags;
            }
            piece.push_str(&escaped);
            piece_len += escaped.len();
        }
        if !piece.is_empty() || out.is_empty() {
            out.push(self.wrap(lead, &piece));
        }
        out
    }
}

/// Join lines into chunks of at most `limit` bytes, breaking on line
/// boundaries. Lines are expected to fit on their own.
fn pack_lines(lines: Vec<String>, limit: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut chunk: Option<String> = None;
    for line in lines {
        chunk = match chunk.take() {
            Some(mut c) if c.len() + 1 + line.len() <= limit => {
                c.push('\n');
                c.push_str(&line);
                Some(c)
            }
            Some(c) => {
                out.push(c);
                Some(line)
            }
            None => Some(line),
        };
    }
    out.extend(chunk);
    // Blank separators at chunk edges go; an empty reply is still one chunk.
    let mut out: Vec<String> = out
        .into_iter()
        .map(|c| c.trim_matches('\n').to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html() {
        let s = r#"<a href="x&y">"#;
        assert_eq!(escape_html(s), "&lt;a href=&quot;x&amp;y&quot;&gt;");
    }

    #[test]
    fn title_cases_like_display_names() {
        assert_eq!(title_case("thunderbolt"), "Thunderbolt");
        assert_eq!(title_case("thunder-wave"), "Thunder-Wave");
        assert_eq!(title_case("swords dance"), "Swords Dance");
        assert_eq!(title_case("u-TURN"), "U-Turn");
    }

    #[test]
    fn reply_renders_escaped_html_with_fields() {
        let r = Reply::success("Move Registered Successfully!", "Move '<x>' registered.")
            .with_field("Move Type", "Heavy");
        let html = r.to_html();
        assert!(html.starts_with("✅ <b>Move Registered Successfully!</b>"));
        assert!(html.contains("&lt;x&gt;"));
        assert!(html.contains("<b>Move Type</b>\nHeavy"));
    }

    fn moves_reply(n: usize) -> Reply {
        let body = (0..n)
            .map(|i| format!("Move {i} (Light)"))
            .collect::<Vec<_>>()
            .join("\n");
        Reply::info("Moves for 'Ash'", body)
    }

    #[test]
    fn short_reply_is_one_chunk_equal_to_html() {
        let r = moves_reply(3);
        assert_eq!(r.to_html_chunks(4000), vec![r.to_html()]);
    }

    #[test]
    fn chunks_break_on_lines_under_limit() {
        let r = moves_reply(50);
        let chunks = r.to_html_chunks(60);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.len() <= 60));
        assert!(chunks[0].starts_with("📘 <b>Moves for 'Ash'</b>"));
        assert!(chunks.iter().any(|c| c.contains("Move 49 (Light)")));
    }

    /// Every `&` starts a complete entity and every tag is closed.
    fn assert_well_formed(chunk: &str) {
        let mut rest = chunk;
        while let Some(i) = rest.find('&') {
            let tail = &rest[i..];
            assert!(
                ["&amp;", "&lt;", "&gt;", "&quot;"]
                    .iter()
                    .any(|e| tail.starts_with(e)),
                "broken entity in {chunk:?}"
            );
            rest = &rest[i + 1..];
        }
        assert_eq!(
            chunk.matches("<b>").count(),
            chunk.matches("</b>").count(),
            "unbalanced tag in {chunk:?}"
        );
    }

    #[test]
    fn overlong_lines_never_split_entities_or_tags() {
        let r = Reply::error("Ampersands & <Co> ".repeat(20), "x&y ".repeat(100))
            .with_field("Moves", "<&>".repeat(100));
        for limit in [20, 33, 64, 101] {
            let chunks = r.to_html_chunks(limit);
            assert!(chunks.len() > 1);
            for c in &chunks {
                assert!(c.len() <= limit, "{limit}: {c:?}");
                assert_well_formed(c);
            }
        }
    }

    #[test]
    fn overlong_lines_cut_on_char_boundaries() {
        let r = Reply::info("T", "é".repeat(40));
        let chunks = r.to_html_chunks(14);
        assert!(chunks.iter().all(|c| c.len() <= 14));
        let body: String = chunks[1..].concat().replace('\n', "");
        assert_eq!(body, "é".repeat(40));
    }
}
