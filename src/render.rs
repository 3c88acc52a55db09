//! Markdown to terminal text rendering for bot output.
//!
//! Replies and banners are parsed with `pulldown-cmark` and written as plain
//! lines decorated with `crossterm` styles. [`MarkdownRenderer::plain`]
//! produces the same layout without escape sequences, for non-TTY output and
//! tests.

use std::io::{self, Write};

use crossterm::style::{Attribute, Color, ContentStyle};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use unicode_width::UnicodeWidthStr;

const DEFAULT_WIDTH: usize = 80;
const CODE_INDENT: &str = "    ";

/// Renders Markdown into terminal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownRenderer {
    styled: bool,
    width: usize,
}

impl MarkdownRenderer {
    /// Renderer emitting ANSI styles.
    #[must_use]
    pub const fn styled() -> Self {
        Self {
            styled: true,
            width: DEFAULT_WIDTH,
        }
    }

    /// Renderer emitting undecorated text.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            styled: false,
            width: DEFAULT_WIDTH,
        }
    }

    /// Sets the width used for horizontal rules.
    #[must_use]
    pub const fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Renders `markdown` into a string ending in a single newline.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let mut state = RenderState::new(*self);
        let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH);
        for event in parser {
            state.handle(event);
        }
        state.finish()
    }

    /// Renders `markdown` and writes it to `writer`.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn render_to<W: Write>(&self, writer: &mut W, markdown: &str) -> io::Result<()> {
        writer.write_all(self.render(markdown).as_bytes())?;
        writer.flush()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct InlineStyle {
    bold: bool,
    italic: bool,
    strike: bool,
    underline: bool,
    code: bool,
}

impl InlineStyle {
    fn content_style(self) -> ContentStyle {
        let mut style = ContentStyle::new();
        if self.bold {
            style.attributes.set(Attribute::Bold);
        }
        if self.italic {
            style.attributes.set(Attribute::Italic);
        }
        if self.strike {
            style.attributes.set(Attribute::CrossedOut);
        }
        if self.underline {
            style.attributes.set(Attribute::Underlined);
        }
        if self.code {
            style.foreground_color = Some(Color::Cyan);
        }
        style
    }
}

#[derive(Debug)]
enum ListKind {
    Bullet,
    Ordered(u64),
}

#[derive(Debug)]
struct RenderState {
    renderer: MarkdownRenderer,
    output: String,
    style: InlineStyle,
    lists: Vec<ListKind>,
    links: Vec<String>,
    heading: Option<(HeadingLevel, usize)>,
    in_code_block: bool,
}

impl RenderState {
    const fn new(renderer: MarkdownRenderer) -> Self {
        Self {
            renderer,
            output: String::new(),
            style: InlineStyle {
                bold: false,
                italic: false,
                strike: false,
                underline: false,
                code: false,
            },
            lists: Vec::new(),
            links: Vec::new(),
            heading: None,
            in_code_block: false,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::SoftBreak | Event::HardBreak => self.output.push('\n'),
            Event::Rule => {
                self.start_block();
                let rule = "─".repeat(self.renderer.width);
                self.output.push_str(&rule);
                self.end_block();
            }
            Event::TaskListMarker(done) => self.output.push_str(if done { "[x] " } else { "[ ] " }),
            Event::Html(raw) | Event::InlineHtml(raw) => self.output.push_str(&raw),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.start_block();
                }
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                self.heading = Some((level, self.output.len()));
                self.style.bold = true;
                self.style.underline = level == HeadingLevel::H1;
            }
            Tag::CodeBlock(kind) => {
                self.start_block();
                self.in_code_block = true;
                if let CodeBlockKind::Fenced(language) = kind
                    && !language.is_empty()
                    && !self.renderer.styled
                {
                    self.output.push_str(CODE_INDENT);
                    self.output.push('[');
                    self.output.push_str(&language);
                    self.output.push_str("]\n");
                }
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.start_block();
                } else {
                    self.ensure_line_start();
                }
                self.lists.push(start.map_or(ListKind::Bullet, ListKind::Ordered));
            }
            Tag::Item => self.start_item(),
            Tag::Emphasis => self.style.italic = true,
            Tag::Strong => self.style.bold = true,
            Tag::Strikethrough => self.style.strike = true,
            Tag::BlockQuote(_) => {
                self.start_block();
                self.output.push_str("│ ");
            }
            Tag::Link { dest_url, .. } => self.links.push(dest_url.into_string()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.end_block();
                } else {
                    self.ensure_line_start();
                }
            }
            TagEnd::Heading(_) => {
                self.style.bold = false;
                self.style.underline = false;
                self.finish_heading();
                self.end_block();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.end_block();
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.end_block();
                }
            }
            TagEnd::Item => self.ensure_line_start(),
            TagEnd::Emphasis => self.style.italic = false,
            TagEnd::Strong => self.style.bold = false,
            TagEnd::Strikethrough => self.style.strike = false,
            TagEnd::BlockQuote(_) => self.end_block(),
            TagEnd::Link => {
                if let Some(url) = self.links.pop() {
                    self.output.push_str(" (");
                    self.output.push_str(&url);
                    self.output.push(')');
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            for line in text.lines() {
                self.output.push_str(CODE_INDENT);
                let styled = InlineStyle {
                    code: true,
                    ..InlineStyle::default()
                };
                self.push_styled(line, styled);
                self.output.push('\n');
            }
            return;
        }
        self.push_styled(text, self.style);
    }

    fn inline_code(&mut self, code: &str) {
        let styled = InlineStyle {
            code: true,
            ..self.style
        };
        if self.renderer.styled {
            self.push_styled(code, styled);
        } else {
            self.output.push('`');
            self.output.push_str(code);
            self.output.push('`');
        }
    }

    fn push_styled(&mut self, text: &str, style: InlineStyle) {
        if self.renderer.styled {
            let rendered = style.content_style().apply(text).to_string();
            self.output.push_str(&rendered);
        } else {
            self.output.push_str(text);
        }
    }

    fn start_item(&mut self) {
        self.ensure_line_start();
        let depth = self.lists.len().saturating_sub(1);
        self.output.push_str(&"  ".repeat(depth));
        match self.lists.last_mut() {
            Some(ListKind::Ordered(number)) => {
                let marker = format!("{number}. ");
                *number = number.saturating_add(1);
                self.output.push_str(&marker);
            }
            Some(ListKind::Bullet) | None => self.output.push_str("• "),
        }
    }

    /// Underlines headings when running without styles.
    fn finish_heading(&mut self) {
        let Some((level, start)) = self.heading.take() else {
            return;
        };
        if self.renderer.styled {
            return;
        }
        let title_width = self.output.get(start..).map_or(0, UnicodeWidthStr::width);
        let marker = if level == HeadingLevel::H1 { "=" } else { "-" };
        self.output.push('\n');
        self.output.push_str(&marker.repeat(title_width));
    }

    fn ensure_line_start(&mut self) {
        if !self.output.is_empty() && !self.output.ends_with('\n') {
            self.output.push('\n');
        }
    }

    fn start_block(&mut self) {
        self.ensure_line_start();
        if !self.output.is_empty() && !self.output.ends_with("\n\n") {
            self.output.push('\n');
        }
    }

    fn end_block(&mut self) {
        self.ensure_line_start();
    }

    fn finish(self) -> String {
        let mut output = self.output.trim_end_matches('\n').to_owned();
        output.push('\n');
        output
    }
}
