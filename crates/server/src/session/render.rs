//! Text blocks written to the customer's terminal.

use std::fmt;

use crate::catalog::Catalog;
use crate::order::Order;
use crate::services::{PaymentArtifact, ShippingQuote};

pub const WELCOME: &str =
    "\nWelcome to Terminal Café!\nTo place your order, follow the instructions:\n";

pub const ITEM_ADDED: &str = "\nProduct added! Anything else? (0 to finish)\n";

pub const THANK_YOU: &str = "\nThank you for your order! It will be shipped as soon as the payment is confirmed.\n";

/// The full catalog, grouped under category headings.
#[derive(Debug, Clone, Copy)]
pub struct MenuView<'a>(pub &'a Catalog);

impl fmt::Display for MenuView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\n=== Terminal Café ===\n\n")?;

        let mut category: Option<&str> = None;
        for entry in self.0.entries() {
            if category != Some(entry.category.as_str()) {
                category = Some(&entry.category);
                if !entry.category.is_empty() {
                    let underline = "-".repeat(entry.category.chars().count());
                    write!(f, "\n{}\n{underline}\n", entry.category)?;
                }
            }
            write!(f, "\n[{}] {}\n{}\n", entry.id, entry.name, entry.price)?;
            if !entry.description.is_empty() {
                writeln!(f, "{}", entry.description)?;
            }
        }

        f.write_str("\n==================\n")
    }
}

/// Shipping line shown right after the CEP is entered.
#[derive(Debug, Clone, Copy)]
pub struct ShippingNotice<'a>(pub &'a ShippingQuote);

impl fmt::Display for ShippingNotice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\nShipping via {}: {} (delivery in {} days)\n",
            self.0.service, self.0.price, self.0.deadline_days
        )
    }
}

/// Items, totals and delivery address, shown before payment.
#[derive(Debug, Clone, Copy)]
pub struct OrderSummary<'a>(pub &'a Order);

impl fmt::Display for OrderSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = self.0;

        f.write_str("\n=== Order Summary ===\n")?;
        for item in &order.items {
            writeln!(f, "{item}")?;
        }
        write!(f, "\nSubtotal: {}", order.total())?;
        write!(f, "\nShipping: {}", order.shipping.price)?;
        writeln!(f, "\nTotal with shipping: {}", order.total_with_shipping())?;
        writeln!(f, "\nDelivery address: {}", order.customer.delivery_line())
    }
}

/// How to pay: the PIX code and its QR image.
#[derive(Debug, Clone, Copy)]
pub struct PaymentInstructions<'a>(pub &'a PaymentArtifact);

impl fmt::Display for PaymentInstructions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\nTo pay, copy and paste the PIX code below:\n")?;
        writeln!(f, "{}", self.0.scannable_code)?;
        f.write_str("\nOr scan the QR code (base64 PNG):\n")?;
        writeln!(f, "{}", self.0.scannable_code_encoded)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use terminal_cafe_core::{Customer, DwellingType, Email, PostalCode, Price, ProductId, TaxId};

    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::order::LineItem;

    #[test]
    fn test_menu_groups_by_category() {
        let catalog = Catalog::parse(
            "## Coffee\n### Espresso\n- Preço: R$ 5,00\n- Descrição: Short and strong\n### Latte\n## Tea\n### Chai\n",
        );
        let menu = MenuView(&catalog).to_string();

        assert!(menu.starts_with("\n=== Terminal Café ===\n"));
        assert!(menu.contains("\nCoffee\n------\n"));
        assert!(menu.contains("\n[1] Espresso\nR$ 5.00\nShort and strong\n"));
        assert!(menu.contains("\n[2] Latte\nR$ 0.00\n"));
        assert!(menu.contains("\nTea\n---\n\n[3] Chai\n"));
        assert_eq!(menu.matches("Coffee").count(), 1);
        assert!(menu.ends_with("\n==================\n"));
    }

    #[test]
    fn test_menu_without_category() {
        let catalog = Catalog::parse("### Water\n- Price: R$ 2,00\n");
        let menu = MenuView(&catalog).to_string();
        assert!(menu.contains("\n[1] Water\nR$ 2.00\n"));
        assert!(!menu.contains("\n\n-"));
    }

    #[test]
    fn test_shipping_notice() {
        let quote = ShippingQuote {
            service: "PAC".to_string(),
            price: Price::from_centavos(2345),
            deadline_days: 7,
        };
        assert_eq!(
            ShippingNotice(&quote).to_string(),
            "\nShipping via PAC: R$ 23.45 (delivery in 7 days)\n"
        );
    }

    #[test]
    fn test_order_summary() {
        let order = Order {
            items: vec![LineItem {
                entry: CatalogEntry {
                    id: ProductId::new(1),
                    name: "Espresso".to_string(),
                    category: "Coffee".to_string(),
                    price: Price::from_centavos(500),
                    description: String::new(),
                },
                quantity: 2,
            }],
            customer: Customer {
                email: Email::parse("ana@example.com").unwrap(),
                tax_id: TaxId::parse("12345678901").unwrap(),
                phone: "11999990000".to_string(),
                postal_code: PostalCode::parse("01310100").unwrap(),
                street: "Av. Paulista".to_string(),
                number: "1000".to_string(),
                dwelling: DwellingType::House,
                unit: None,
                complement: None,
            },
            shipping: ShippingQuote {
                service: "PAC".to_string(),
                price: Price::from_centavos(1000),
                deadline_days: 5,
            },
        };

        assert_eq!(
            OrderSummary(&order).to_string(),
            "\n=== Order Summary ===\n\
             2x Espresso (R$ 5.00 each) = R$ 10.00\n\
             \nSubtotal: R$ 10.00\
             \nShipping: R$ 10.00\
             \nTotal with shipping: R$ 20.00\n\
             \nDelivery address: Av. Paulista, 1000 - 01310100\n"
        );
    }

    #[test]
    fn test_payment_instructions() {
        let artifact = PaymentArtifact {
            payment_id: None,
            scannable_code: "00020126pix".to_string(),
            scannable_code_encoded: "iVBORw0KGgo=".to_string(),
        };
        let text = PaymentInstructions(&artifact).to_string();
        assert!(text.contains("\n00020126pix\n"));
        assert!(text.contains("\niVBORw0KGgo=\n"));
    }
}
