//! Phone-number extraction from rendered detail documents.
//!
//! Strategies run in [`PhoneStrategy::PRIORITY`] order and the first one that
//! yields a number wins. Finding nothing is a normal outcome.

mod locale;
mod snapshot;
mod strategy;

pub use locale::{digit_count, PhoneLocale};
pub use snapshot::DocumentSnapshot;
pub use strategy::{
    ParsedDocument, PhoneStrategy, MAX_FREE_TEXT_LINE, MIN_LABEL_DIGITS, PHONE_DIGIT_BOUNDS,
    PHONE_MARKUP_SELECTOR,
};

use scraper::Html;

/// A number and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneMatch {
    /// Extracted number as it appeared in the document
    pub phone: String,
    /// Strategy that found it
    pub strategy: PhoneStrategy,
}

/// Ordered list of strategies sharing one locale policy.
#[derive(Debug, Clone)]
pub struct HeuristicChain {
    locale: PhoneLocale,
    strategies: Vec<PhoneStrategy>,
}

impl HeuristicChain {
    /// Chain running every strategy in priority order.
    pub fn new(locale: PhoneLocale) -> Self {
        Self::with_strategies(locale, PhoneStrategy::PRIORITY.to_vec())
    }

    /// Chain restricted to (or reordered as) `strategies`.
    pub fn with_strategies(locale: PhoneLocale, strategies: Vec<PhoneStrategy>) -> Self {
        Self { locale, strategies }
    }

    /// Locale policy shared by the strategies.
    pub fn locale(&self) -> &PhoneLocale {
        &self.locale
    }

    /// First number found by any strategy.
    pub fn detect(&self, snapshot: &DocumentSnapshot) -> Option<PhoneMatch> {
        let document = ParsedDocument {
            html: Html::parse_document(&snapshot.html),
            text: &snapshot.text,
        };

        self.strategies.iter().find_map(|strategy| {
            strategy
                .find(&document, &self.locale)
                .map(|phone| PhoneMatch {
                    phone,
                    strategy: *strategy,
                })
        })
    }

    /// The phone number, or an empty string when no strategy matched.
    pub fn detect_phone(&self, snapshot: &DocumentSnapshot) -> String {
        self.detect(snapshot)
            .map(|found| found.phone)
            .unwrap_or_default()
    }
}

impl Default for HeuristicChain {
    fn default() -> Self {
        Self::new(PhoneLocale::pt_br())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVERY_STRATEGY: &str = r#"<html><body>
        <button data-item-id="phone:tel:551199998888">Ligar</button>
        <button data-tooltip="Copiar número de telefone" aria-label="Telefone: (21) 2222-3333">c</button>
        <div data-item-id="phone-extra">(31) 4444-5555</div>
        <p>(41) 6666-7777</p>
    </body></html>"#;

    #[test]
    fn test_structured_attribute_wins() {
        let chain = HeuristicChain::default();
        let found = chain
            .detect(&DocumentSnapshot::from_html(EVERY_STRATEGY))
            .unwrap();
        assert_eq!(found.phone, "551199998888");
        assert_eq!(found.strategy, PhoneStrategy::StructuredAttribute);
    }

    #[test]
    fn test_each_strategy_in_isolation() {
        let snapshot = DocumentSnapshot::from_html(EVERY_STRATEGY);
        let expected = [
            (PhoneStrategy::LabeledControl, "(21) 2222-3333"),
            (PhoneStrategy::TaggedElement, "(31) 4444-5555"),
        ];
        for (strategy, phone) in expected {
            let chain = HeuristicChain::with_strategies(PhoneLocale::pt_br(), vec![strategy]);
            assert_eq!(chain.detect_phone(&snapshot), phone, "{}", strategy.name());
        }
    }

    #[test]
    fn test_falls_through_to_free_text() {
        let snapshot = DocumentSnapshot::from_html(
            "<html><body><h1>Bar do Zé</h1><div>Rua das Flores, 10</div>\
             <div>(41) 6666-7777</div></body></html>",
        );
        let found = HeuristicChain::default().detect(&snapshot).unwrap();
        assert_eq!(found.phone, "(41) 6666-7777");
        assert_eq!(found.strategy, PhoneStrategy::FreeText);
    }

    #[test]
    fn test_no_phone_is_empty() {
        let snapshot =
            DocumentSnapshot::from_html("<html><body><h1>Sem contato</h1></body></html>");
        let chain = HeuristicChain::default();
        assert!(chain.detect(&snapshot).is_none());
        assert_eq!(chain.detect_phone(&snapshot), "");
    }
}
