use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Formatting commands the toolbar can apply to the current selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FormatCommand {
    Bold,
    Italic,
    Strike,
    Heading(u8),
    Paragraph,
    BulletList,
    OrderedList,
    Link(String),
    Image(String),
    Undo,
    Redo,
}

impl FormatCommand {
    /// `document.execCommand` name and value.
    pub(crate) fn exec_args(&self) -> (&'static str, String) {
        match self {
            Self::Bold => ("bold", String::new()),
            Self::Italic => ("italic", String::new()),
            Self::Strike => ("strikeThrough", String::new()),
            Self::Heading(level) => ("formatBlock", format!("<h{}>", (*level).clamp(1, 6))),
            Self::Paragraph => ("formatBlock", "<p>".to_string()),
            Self::BulletList => ("insertUnorderedList", String::new()),
            Self::OrderedList => ("insertOrderedList", String::new()),
            Self::Link(url) => ("createLink", url.clone()),
            Self::Image(url) => ("insertImage", url.clone()),
            Self::Undo => ("undo", String::new()),
            Self::Redo => ("redo", String::new()),
        }
    }
}

/// Trimmed URL from a prompt answer; blank answers mean "cancelled".
pub(crate) fn prompt_answer_url(answer: Option<String>) -> Option<String> {
    answer
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre",
    "tr", "td", "th",
];

/// Text of a stored HTML fragment, for counting before the widget has rendered it.
///
/// Block-level tags become whitespace so adjacent paragraphs do not merge into one word;
/// inline tags vanish.
pub(crate) fn plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.chars();

    while let Some(c) = chars.next() {
        if c != '<' {
            out.push(c);
            continue;
        }

        let mut tag = String::new();
        for t in chars.by_ref() {
            if t == '>' {
                break;
            }
            tag.push(t);
        }

        let name = tag
            .trim_start_matches('/')
            .split(|ch: char| ch.is_whitespace() || ch == '/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if BLOCK_TAGS.contains(&name.as_str()) {
            out.push(' ');
        }
    }

    out.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Handle to the contenteditable surface: get/set content and run formatting commands.
#[derive(Clone, Copy)]
pub(crate) struct RichTextHandle {
    node: NodeRef<html::Div>,
}

impl RichTextHandle {
    pub fn new() -> Self {
        Self {
            node: NodeRef::new(),
        }
    }

    pub fn set_content(&self, html: &str) {
        if let Some(el) = self.node.get_untracked() {
            el.set_inner_html(html);
        }
    }

    pub fn content(&self) -> Option<String> {
        self.node.get_untracked().map(|el| el.inner_html())
    }

    pub fn text(&self) -> Option<String> {
        self.node.get_untracked().map(|el| el.inner_text())
    }

    /// Returns false if the browser refused the command.
    pub fn apply(&self, cmd: &FormatCommand) -> bool {
        let Some(el) = self.node.get_untracked() else {
            return false;
        };
        let _ = el.focus();

        let Some(doc) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
        else {
            return false;
        };

        let (name, value) = cmd.exec_args();
        doc.exec_command_with_show_ui_and_value(name, false, &value)
            .unwrap_or(false)
    }
}

impl Default for RichTextHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn RichTextEditor(
    handle: RichTextHandle,
    /// Receives `(html, plain_text)` after every input.
    #[prop(into)]
    on_input: Callback<(String, String)>,
) -> impl IntoView {
    let on_input_ev = move |_ev: web_sys::Event| {
        if let (Some(html), Some(text)) = (handle.content(), handle.text()) {
            on_input.run((html, text));
        }
    };

    view! {
        <div
            data-name="RichTextEditor"
            class="prose min-h-[400px] max-w-none rounded-md bg-background p-4 text-foreground outline-none focus-visible:ring-2 focus-visible:ring-ring/50"
            contenteditable="true"
            node_ref=handle.node
            on:input=on_input_ev
        ></div>
    }
}

fn prompt_url(message: &str) -> Option<String> {
    let answer = web_sys::window()?.prompt_with_message(message).ok().flatten();
    prompt_answer_url(answer)
}

#[component]
pub fn FormatToolbar(handle: RichTextHandle) -> impl IntoView {
    let run = move |cmd: FormatCommand| {
        if !handle.apply(&cmd) {
            leptos::logging::warn!("formatting command rejected: {:?}", cmd);
        }
    };

    let tool = move |label: &'static str, title: &'static str, cmd: FormatCommand| {
        view! {
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Sm
                attr:title=title
                on:click=move |_| run(cmd.clone())
            >
                {label}
            </Button>
        }
    };

    view! {
        <div class="flex flex-wrap items-center gap-1 border-b bg-muted/40 p-2" data-name="FormatToolbar">
            {tool("B", "Bold", FormatCommand::Bold)}
            {tool("I", "Italic", FormatCommand::Italic)}
            {tool("S", "Strikethrough", FormatCommand::Strike)}
            <span class="mx-1 h-5 w-px bg-border"></span>
            {tool("H1", "Heading 1", FormatCommand::Heading(1))}
            {tool("H2", "Heading 2", FormatCommand::Heading(2))}
            {tool("H3", "Heading 3", FormatCommand::Heading(3))}
            {tool("¶", "Normal text", FormatCommand::Paragraph)}
            <span class="mx-1 h-5 w-px bg-border"></span>
            {tool("• List", "Bullet list", FormatCommand::BulletList)}
            {tool("1. List", "Numbered list", FormatCommand::OrderedList)}
            <span class="mx-1 h-5 w-px bg-border"></span>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Sm
                attr:title="Insert link"
                on:click=move |_| {
                    if let Some(url) = prompt_url("Enter link:") {
                        run(FormatCommand::Link(url));
                    }
                }
            >
                "Link"
            </Button>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Sm
                attr:title="Insert image"
                on:click=move |_| {
                    if let Some(url) = prompt_url("Enter image URL:") {
                        run(FormatCommand::Image(url));
                    }
                }
            >
                "Image"
            </Button>
            <span class="mx-1 h-5 w-px bg-border"></span>
            {tool("↶", "Undo", FormatCommand::Undo)}
            {tool("↷", "Redo", FormatCommand::Redo)}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_separates_blocks() {
        let html = "<h1>Title</h1><p>first <b>bold</b>word</p><p>second&nbsp;line</p>";
        let text = plain_text(html);
        assert_eq!(count_words(&text), 5);
        assert!(text.contains("boldword"));
    }

    #[test]
    fn test_plain_text_decodes_entities() {
        assert_eq!(plain_text("a &lt;b&gt; &amp; c").trim(), "a <b> & c");
        assert_eq!(plain_text("<br/>x<br />y").split_whitespace().count(), 2);
    }

    #[test]
    fn test_count_words_empty() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \n\t "), 0);
        assert_eq!(count_words(&plain_text("<p></p>")), 0);
    }

    #[test]
    fn test_exec_args_mapping() {
        assert_eq!(FormatCommand::Strike.exec_args().0, "strikeThrough");
        assert_eq!(
            FormatCommand::Heading(2).exec_args(),
            ("formatBlock", "<h2>".to_string())
        );
        assert_eq!(FormatCommand::Heading(9).exec_args().1, "<h6>");
        assert_eq!(
            FormatCommand::Link("https://x.dev".to_string()).exec_args(),
            ("createLink", "https://x.dev".to_string())
        );
    }

    #[test]
    fn test_prompt_answer_url() {
        assert_eq!(prompt_answer_url(None), None);
        assert_eq!(prompt_answer_url(Some("   ".to_string())), None);
        assert_eq!(
            prompt_answer_url(Some(" https://a.b/c.png ".to_string())).as_deref(),
            Some("https://a.b/c.png")
        );
    }
}
