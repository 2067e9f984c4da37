use url::Url;

/// A formatted GitHub event, ready to be sent to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short label, shown in notification previews
    pub brief: String,
    /// One line markdown headline, rendered as a link to `url`. Brackets meant literally must
    /// already be escaped.
    pub title: String,
    pub url: Url,
    /// Markdown text displayed under the headline
    pub body: String,
}

impl Notification {
    /// Renders the whole markdown message: the linked title as a heading, then the body quoted
    /// underneath.
    pub fn render(&self) -> String {
        let text = format!("#### [{}]({})\n\n{}", self.title, self.url, self.body);

        quote_paragraphs(&text)
    }
}

/// Turns every paragraph break into a block quote continuation.
///
/// This is a plain substitution: applying it twice quotes paragraphs twice.
pub(crate) fn quote_paragraphs(text: &str) -> String {
    text.replace("\n\n", "\n\n> ")
        .replace("\r\n\r\n", "\n\n> ")
}
