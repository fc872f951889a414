//! Standalone HTML export of a [`BlogPost`], ready to paste into a blog editor.
//!
//! The hook is rendered bold instead of as a quote and hashtags become styled
//! chips, since blog editors tend to mangle both. Section bodies are markdown;
//! single newlines become `<br>` and raw HTML from the model is escaped.

use pulldown_cmark::{Event, Options, Parser, html as cmark};

use crate::content::BlogPost;

const STYLE: &str = r#"
      body { font-family: 'Malgun Gothic', 'Apple SD Gothic Neo', sans-serif; line-height: 1.8; color: #333; max-width: 800px; margin: 0 auto; padding: 20px; }
      h1 { border: none; font-size: 2.2em; text-align: center; margin-bottom: 50px; }
      h2 { font-size: 1.5em; border-left: 5px solid #2db400; padding-left: 10px; margin-top: 40px; margin-bottom: 15px; }
      p { margin-bottom: 15px; word-break: keep-all; }
      strong { color: #000; font-weight: 900; }
      .hashtag { color: #0067a3; background: #f2f2f2; padding: 2px 5px; border-radius: 4px; margin-right: 5px; }
"#;

pub fn render_blog_html(post: &BlogPost) -> String {
    let mut body = String::new();

    if !post.hook_text.trim().is_empty() {
        body.push_str(&format!(
            "    <p><strong>{}</strong></p>\n",
            with_line_breaks(&post.hook_text)
        ));
    }

    for section in &post.sections {
        body.push_str(&format!("    <h2>{}</h2>\n", escape(&section.sub_title)));
        body.push_str(&markdown_to_html(&section.content));
    }

    let tags: Vec<String> = post
        .clean_hashtags()
        .map(|t| format!("<span class=\"hashtag\">#{}</span>", escape(t)))
        .collect();
    if !tags.is_empty() {
        body.push_str(&format!("    <p>{}</p>\n", tags.join("")));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n    <meta charset=\"UTF-8\">\n    <title>{title}</title>\n    <style>{STYLE}    </style>\n</head>\n<body>\n    <h1>{title}</h1>\n{body}    <br><br>\n</body>\n</html>\n",
        title = escape(&post.title),
    )
}

fn markdown_to_html(text: &str) -> String {
    let events = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::new();
    cmark::push_html(&mut out, events);
    out
}

fn with_line_breaks(text: &str) -> String {
    text.lines().map(escape).collect::<Vec<_>>().join("<br>\n")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
