use once_cell::sync::Lazy;
use scraper::{Html, Node, Selector};
use serde::{Deserialize, Serialize};

/// A rendered detail document captured in a single evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Serialized DOM (`outerHTML`)
    pub html: String,
    /// Visible text (`innerText`), one rendered line per `\n`
    #[serde(default)]
    pub text: String,
}

impl DocumentSnapshot {
    /// Snapshot from markup and its visible text.
    pub fn new(html: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            text: text.into(),
        }
    }

    /// Build a snapshot from markup alone, approximating the visible text with
    /// one line per non-empty text node outside scripts and styles.
    pub fn from_html(html: impl Into<String>) -> Self {
        let html = html.into();
        let text = visible_text(&Html::parse_document(&html));
        Self { html, text }
    }

    /// Non-empty trimmed lines of the visible text.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines().map(str::trim).filter(|line| !line.is_empty())
    }
}

fn visible_text(document: &Html) -> String {
    static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("valid selector"));

    let Some(root) = document.select(&BODY).next() else {
        return String::new();
    };

    let mut lines = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|el| el.name()))
            .is_some_and(|name| matches!(name, "script" | "style" | "noscript" | "template"));
        let trimmed = text.trim();
        if !hidden && !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_html_collects_visible_lines() {
        let snapshot = DocumentSnapshot::from_html(
            r#"<html><head><title>t</title></head><body>
                <h1>Pizzaria Speranza</h1>
                <script>var phone = "11 99999-0000";</script>
                <div><span>Aberto</span> <span>Fecha às 23:00</span></div>
            </body></html>"#,
        );
        let lines: Vec<&str> = snapshot.lines().collect();
        assert_eq!(lines, vec!["Pizzaria Speranza", "Aberto", "Fecha às 23:00"]);
    }

    #[test]
    fn test_deserialize_without_text() {
        let snapshot: DocumentSnapshot =
            serde_json::from_str(r#"{"html":"<p>x</p>"}"#).unwrap();
        assert_eq!(snapshot.text, "");
        assert_eq!(snapshot.lines().count(), 0);
    }
}
