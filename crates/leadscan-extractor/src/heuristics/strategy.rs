use super::locale::{digit_count, PhoneLocale};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Accepted digit counts for pattern-extracted numbers.
pub const PHONE_DIGIT_BOUNDS: (usize, usize) = (8, 15);

/// Minimum digits left in a phone control's label.
pub const MIN_LABEL_DIGITS: usize = 8;

/// Longest free-text line considered by the fallback scan.
pub const MAX_FREE_TEXT_LINE: usize = 60;

/// Markup whose presence means the phone block has rendered.
pub const PHONE_MARKUP_SELECTOR: &str = r#"a[href^="tel:"], [data-item-id*="phone:tel:"]"#;

const STRUCTURED_TOKEN: &str = "phone:tel:";

static ITEM_ID: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[data-item-id*="phone:tel:"]"#).expect("valid selector"));

static TEL_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="tel:"]"#).expect("valid selector"));

static PHONE_BUTTON: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"button[data-tooltip*="phone" i], button[data-tooltip*="telefone" i]"#)
        .expect("valid selector")
});

static TAGGED: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[data-item-id*="phone"]"#).expect("valid selector"));

/// A detail document parsed once and shared by every strategy.
pub struct ParsedDocument<'a> {
    /// Parsed DOM
    pub html: Html,
    /// Visible text, one rendered line per `\n`
    pub text: &'a str,
}

/// Phone-extraction strategies, highest confidence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneStrategy {
    /// `data-item-id="phone:tel:<n>"` or `<a href="tel:<n>">`
    StructuredAttribute,
    /// Button whose tooltip marks it as a phone action
    LabeledControl,
    /// Any element loosely tagged as phone-related
    TaggedElement,
    /// Line-by-line scan of the visible text
    FreeText,
}

impl PhoneStrategy {
    /// Order in which the chain tries the strategies.
    pub const PRIORITY: [PhoneStrategy; 4] = [
        Self::StructuredAttribute,
        Self::LabeledControl,
        Self::TaggedElement,
        Self::FreeText,
    ];

    /// Stable name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StructuredAttribute => "structured-attribute",
            Self::LabeledControl => "labeled-control",
            Self::TaggedElement => "tagged-element",
            Self::FreeText => "free-text",
        }
    }

    /// Run this strategy alone.
    pub fn find(&self, document: &ParsedDocument<'_>, locale: &PhoneLocale) -> Option<String> {
        match self {
            Self::StructuredAttribute => structured_attribute(&document.html),
            Self::LabeledControl => labeled_control(&document.html, locale),
            Self::TaggedElement => tagged_element(&document.html, locale),
            Self::FreeText => free_text(document.text, locale),
        }
    }
}

fn structured_attribute(html: &Html) -> Option<String> {
    let from_item_id = html
        .select(&ITEM_ID)
        .filter_map(|el| el.value().attr("data-item-id"))
        .filter_map(|id| {
            id.rfind(STRUCTURED_TOKEN)
                .map(|idx| id[idx + STRUCTURED_TOKEN.len()..].trim())
        })
        .find(|number| !number.is_empty());
    if let Some(number) = from_item_id {
        return Some(number.to_string());
    }

    html.select(&TEL_LINK)
        .filter_map(|el| el.value().attr("href"))
        .map(|href| href.trim_start_matches("tel:").trim())
        .find(|number| !number.is_empty())
        .map(ToString::to_string)
}

fn labeled_control(html: &Html, locale: &PhoneLocale) -> Option<String> {
    let button = html
        .select(&PHONE_BUTTON)
        .next()?;

    let label = button.value().attr("aria-label").unwrap_or_default();
    let label = label.rsplit(':').next().unwrap_or(label);
    let stripped = locale.strip_boilerplate(label);
    let cleaned = stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| matches!(c, ',' | ';' | '.' | '-' | '–' | '—' | ':'))
        .trim()
        .to_string();

    (digit_count(&cleaned) >= MIN_LABEL_DIGITS).then_some(cleaned)
}

fn tagged_element(html: &Html, locale: &PhoneLocale) -> Option<String> {
    html.select(&TAGGED)
        .find_map(|el| locale.find_phone(&element_label(&el), PHONE_DIGIT_BOUNDS))
}

fn element_label(el: &ElementRef<'_>) -> String {
    match el.value().attr("aria-label").map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => el.text().collect::<Vec<_>>().join(" ").trim().to_string(),
    }
}

fn free_text(text: &str, locale: &PhoneLocale) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| line.chars().count() <= MAX_FREE_TEXT_LINE)
        .filter(|line| !locale.is_address_line(line))
        .find_map(|line| {
            locale.find_phone(&locale.strip_postal_codes(line), PHONE_DIGIT_BOUNDS)
        })
}
