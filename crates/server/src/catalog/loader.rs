//! Menu document parser.
//!
//! The menu is a loosely structured markdown file:
//!
//! ```markdown
//! ## Coffee
//!
//! ### Espresso
//! - Preço: R$ 5,00
//! - Descrição: Short and strong.
//! ```
//!
//! `##` lines set the category, `###` lines open a product, and price /
//! description bullets fill in the open product. English bullet labels
//! (`- Price:`, `- Description:`) are accepted too. Parsing is tolerant:
//! unknown lines are skipped and a price that cannot be read leaves the
//! product's price untouched.

use std::sync::LazyLock;

use regex::Regex;
use terminal_cafe_core::{Price, ProductId};

use super::CatalogEntry;

const CATEGORY_MARKER: &str = "## ";
const PRODUCT_MARKER: &str = "### ";
const PRICE_MARKERS: &[&str] = &["- Preço:", "- Price:"];
const DESCRIPTION_MARKERS: &[&str] = &["- Descrição:", "- Description:"];

/// Regex for the amount in a price line, e.g. `R$ 12,50`.
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"R\$ (\d+,?\d*)").expect("Invalid regex"));

/// Classification of a single menu line.
#[derive(Debug, PartialEq, Eq)]
enum MenuLine<'a> {
    Blank,
    Category(&'a str),
    Product(&'a str),
    Price(&'a str),
    Description(&'a str),
    Other,
}

impl<'a> MenuLine<'a> {
    fn classify(line: &'a str) -> Self {
        if line.trim().is_empty() {
            return Self::Blank;
        }
        if let Some(rest) = line.strip_prefix(CATEGORY_MARKER) {
            return Self::Category(rest.trim());
        }
        if let Some(rest) = line.strip_prefix(PRODUCT_MARKER) {
            return Self::Product(rest.trim());
        }
        if let Some(rest) = strip_any(line, PRICE_MARKERS) {
            return Self::Price(rest);
        }
        if let Some(rest) = strip_any(line, DESCRIPTION_MARKERS) {
            return Self::Description(rest.trim());
        }
        Self::Other
    }
}

fn strip_any<'a>(line: &'a str, markers: &[&str]) -> Option<&'a str> {
    markers.iter().find_map(|marker| line.strip_prefix(marker))
}

/// Single-pass parser state.
///
/// Carries the current category and the product being filled in. A product
/// is finalized when the next product heading arrives or input ends.
#[derive(Debug)]
struct MenuParser {
    category: String,
    pending: Option<CatalogEntry>,
    next_id: u32,
    entries: Vec<CatalogEntry>,
}

impl MenuParser {
    const fn new() -> Self {
        Self {
            category: String::new(),
            pending: None,
            next_id: 1,
            entries: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        match MenuLine::classify(line) {
            MenuLine::Blank | MenuLine::Other => {}
            MenuLine::Category(name) => name.clone_into(&mut self.category),
            MenuLine::Product(name) => self.open(name),
            MenuLine::Price(rest) => {
                if let Some(entry) = self.pending.as_mut()
                    && let Some(price) = extract_price(rest)
                {
                    entry.price = price;
                }
            }
            MenuLine::Description(text) => {
                if let Some(entry) = self.pending.as_mut() {
                    text.clone_into(&mut entry.description);
                }
            }
        }
    }

    fn open(&mut self, name: &str) {
        self.finalize();
        self.pending = Some(CatalogEntry {
            id: ProductId::new(self.next_id),
            name: name.to_owned(),
            category: self.category.clone(),
            price: Price::ZERO,
            description: String::new(),
        });
        self.next_id += 1;
    }

    fn finalize(&mut self) {
        if let Some(entry) = self.pending.take() {
            self.entries.push(entry);
        }
    }

    fn finish(mut self) -> Vec<CatalogEntry> {
        self.finalize();
        self.entries
    }
}

/// Pull the `R$` amount out of a price line, if there is a readable one.
fn extract_price(text: &str) -> Option<Price> {
    let amount = PRICE_RE.captures(text)?.get(1)?.as_str();
    match Price::parse_brl(amount) {
        Ok(price) => Some(price),
        Err(e) => {
            tracing::debug!(line = %text, error = %e, "Ignoring unreadable price");
            None
        }
    }
}

/// Parse a menu document into catalog entries, in document order.
#[must_use]
pub fn parse_menu(text: &str) -> Vec<CatalogEntry> {
    let mut parser = MenuParser::new();
    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_entry_without_price_defaults_to_zero() {
        let entries = parse_menu("### A\n### B\n- Preço: R$ 12,50\n");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, ProductId::new(1));
        assert_eq!(entries[1].id, ProductId::new(2));
        assert_eq!(entries[0].price, Price::ZERO);
        assert_eq!(entries[1].price.amount(), Decimal::new(1250, 2));
    }

    #[test]
    fn test_category_applies_to_following_products() {
        let entries = parse_menu("## Coffee\n### Espresso\n### Latte\n## Tea\n### Chai\n");

        assert_eq!(entries[0].category, "Coffee");
        assert_eq!(entries[1].category, "Coffee");
        assert_eq!(entries[2].category, "Tea");
    }

    #[test]
    fn test_products_before_any_category() {
        let entries = parse_menu("### Water\n## Coffee\n### Espresso\n");
        assert_eq!(entries[0].category, "");
        assert_eq!(entries[1].category, "Coffee");
    }

    #[test]
    fn test_category_heading_alone_creates_nothing() {
        assert!(parse_menu("## Coffee\n\n## Tea\n").is_empty());
    }

    #[test]
    fn test_description_last_write_wins() {
        let entries = parse_menu(
            "### Espresso\n- Descrição: first\n- Description: second\n",
        );
        assert_eq!(entries[0].description, "second");
    }

    #[test]
    fn test_unreadable_price_keeps_previous() {
        let entries = parse_menu("### Espresso\n- Price: R$ 5,00\n- Price: ask at counter\n");
        assert_eq!(entries[0].price, Price::from_centavos(500));
    }

    #[test]
    fn test_price_without_cents() {
        let entries = parse_menu("### Beans 1kg\n- Preço: R$ 89\n");
        assert_eq!(entries[0].price, Price::from_centavos(8900));
    }

    #[test]
    fn test_price_with_dangling_comma() {
        let entries = parse_menu("### Beans\n- Preço: R$ 12, por pacote\n");
        assert_eq!(entries[0].price, Price::from_centavos(1200));
    }

    #[test]
    fn test_bullets_before_first_product_ignored() {
        let entries = parse_menu("- Preço: R$ 1,00\n- Descrição: orphan\n### Espresso\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].price, Price::ZERO);
        assert_eq!(entries[0].description, "");
    }

    #[test]
    fn test_unknown_lines_ignored() {
        let entries = parse_menu("# Terminal Café\n### Espresso\nsome prose\n> quote\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Espresso");
    }

    #[test]
    fn test_crlf_line_endings() {
        let entries = parse_menu("## Coffee\r\n### Espresso\r\n- Price: R$ 5,00\r\n");
        assert_eq!(entries[0].category, "Coffee");
        assert_eq!(entries[0].name, "Espresso");
        assert_eq!(entries[0].price, Price::from_centavos(500));
    }

    #[test]
    fn test_last_product_finalized_at_end() {
        let entries = parse_menu("### Only\n- Description: last one");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "last one");
    }

    #[test]
    fn test_classify() {
        assert_eq!(MenuLine::classify("   "), MenuLine::Blank);
        assert_eq!(MenuLine::classify("## Tea"), MenuLine::Category("Tea"));
        assert_eq!(MenuLine::classify("### Chai"), MenuLine::Product("Chai"));
        assert_eq!(MenuLine::classify("#### Deep"), MenuLine::Other);
        assert_eq!(MenuLine::classify("- Price: R$ 1"), MenuLine::Price(" R$ 1"));
    }
}
