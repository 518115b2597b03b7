//! End-to-end order sessions against scripted terminals and fake services.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use terminal_cafe_core::Price;
use terminal_cafe_integration_tests::{
    ESPRESSO_MENU, FakeNotifier, FakePayments, FakeShipping, Fakes, HOUSE_DETAILS,
    ScriptedTerminal,
};
use terminal_cafe_server::services::PaymentArtifact;
use terminal_cafe_server::{Catalog, OrderSession, SessionError, SessionOutcome};

fn script(selection: &[&'static str], details: &[&'static str]) -> Vec<&'static str> {
    selection.iter().chain(details).copied().collect()
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_espresso_order_end_to_end() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::happy_path();
    let services = fakes.services();
    let session = OrderSession::new(&catalog, &services);
    let mut terminal = ScriptedTerminal::new(&script(&["1", "2", "0"], HOUSE_DETAILS));

    let completed = session.take_order(&mut terminal).await.unwrap();

    assert_eq!(completed.order.total(), Price::from_centavos(1000));
    assert_eq!(completed.order.shipping.price, Price::from_centavos(1000));
    assert_eq!(completed.order.total_with_shipping(), Price::from_centavos(2000));

    let output = terminal.output();
    assert!(output.contains("=== Order Summary ===\n2x Espresso (R$ 5.00 each) = R$ 10.00\n"));
    assert!(output.contains("Subtotal: R$ 10.00"));
    assert!(output.contains("Shipping: R$ 10.00"));
    assert!(output.contains("Total with shipping: R$ 20.00"));
    assert!(output.contains("Delivery address: Av. Paulista, 1000 - 01310100"));
    assert!(output.contains("Shipping via PAC: R$ 10.00 (delivery in 5 days)"));
    assert!(output.contains("00020126580014br.gov.bcb.pix0136terminal-cafe"));
    assert!(output.contains("Thank you for your order!"));
    assert!(terminal.errors().is_empty());
    assert_eq!(terminal.unread(), 0);

    assert_eq!(fakes.shipping.requests()[0].as_str(), "01310100");
    assert_eq!(fakes.payments.orders().len(), 1);
    assert_eq!(fakes.notifier.calls(), 1);
}

#[tokio::test]
async fn test_run_reports_completed() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::happy_path();
    let services = fakes.services();
    let mut terminal = ScriptedTerminal::new(&script(&["1", "2", "0"], HOUSE_DETAILS));

    let outcome = OrderSession::new(&catalog, &services).run(&mut terminal).await;

    assert_eq!(outcome, SessionOutcome::Completed);
    assert_eq!(outcome.exit_code(), 0);
}

#[tokio::test]
async fn test_menu_shown_before_every_selection() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::happy_path();
    let services = fakes.services();
    let mut terminal = ScriptedTerminal::new(&script(&["1", "1", "1", "3", "0"], HOUSE_DETAILS));

    let completed = OrderSession::new(&catalog, &services)
        .take_order(&mut terminal)
        .await
        .unwrap();

    assert_eq!(terminal.output().matches("=== Terminal Café ===").count(), 3);
    assert_eq!(completed.order.items.len(), 2);
    assert_eq!(completed.order.total(), Price::from_centavos(2000));
}

#[tokio::test]
async fn test_apartment_delivery() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::happy_path();
    let services = fakes.services();
    let details = [
        "ana@example.com",
        "12345678901",
        "11999990000",
        "01310100",
        "Av. Paulista",
        "1000",
        "apartment",
        "142",
        "Bloco B",
    ];
    let mut terminal = ScriptedTerminal::new(&script(&["1", "1", "0"], &details));

    let completed = OrderSession::new(&catalog, &services)
        .take_order(&mut terminal)
        .await
        .unwrap();

    let customer = &completed.order.customer;
    assert_eq!(customer.unit.as_deref(), Some("142"));
    assert_eq!(customer.complement.as_deref(), Some("Bloco B"));
    assert!(terminal.output().contains("Apartment number: "));
}

// ============================================================================
// Item selection
// ============================================================================

#[tokio::test]
async fn test_finish_without_items_is_empty_order() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::happy_path();
    let services = fakes.services();
    let mut terminal = ScriptedTerminal::new(&["0"]);

    let session = OrderSession::new(&catalog, &services);
    let result = session.take_order(&mut terminal).await;

    assert!(matches!(result, Err(SessionError::EmptyOrder)));
    assert!(fakes.shipping.requests().is_empty());
    assert!(fakes.payments.orders().is_empty());
}

#[tokio::test]
async fn test_invalid_choices_reprompt() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::happy_path();
    let services = fakes.services();
    let mut terminal =
        ScriptedTerminal::new(&script(&["abc", "99", "1", "-3", "1", "2", "0"], HOUSE_DETAILS));

    let completed = OrderSession::new(&catalog, &services)
        .take_order(&mut terminal)
        .await
        .unwrap();

    let errors = terminal.errors();
    assert!(errors.contains("'abc' is not a number"));
    assert!(errors.contains("product 99 does not exist"));
    assert!(errors.contains("invalid quantity '-3'"));
    assert_eq!(completed.order.items.len(), 1);
    assert_eq!(completed.order.items[0].quantity, 2);
}

#[tokio::test]
async fn test_duplicate_selections_are_separate_lines() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::happy_path();
    let services = fakes.services();
    let mut terminal = ScriptedTerminal::new(&script(&["1", "1", "1", "2", "0"], HOUSE_DETAILS));

    let completed = OrderSession::new(&catalog, &services)
        .take_order(&mut terminal)
        .await
        .unwrap();

    let output = terminal.output();
    assert!(output.contains("1x Espresso (R$ 5.00 each) = R$ 5.00\n"));
    assert!(output.contains("2x Espresso (R$ 5.00 each) = R$ 10.00\n"));
    assert_eq!(completed.order.total(), Price::from_centavos(1500));
}

// ============================================================================
// Contact collection
// ============================================================================

#[tokio::test]
async fn test_invalid_email_aborts_without_reprompt() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::happy_path();
    let services = fakes.services();
    let mut terminal = ScriptedTerminal::new(&script(&["1", "1", "0"], &[
        "ana.example.com",
        "ana@example.com",
    ]));

    let outcome = OrderSession::new(&catalog, &services).run(&mut terminal).await;

    assert_eq!(outcome, SessionOutcome::Aborted);
    assert_eq!(outcome.exit_code(), 1);
    assert!(terminal.errors().starts_with("Error: invalid email"));
    assert_eq!(terminal.unread(), 1);
    assert_eq!(terminal.output().matches("Email: ").count(), 1);
}

#[tokio::test]
async fn test_short_tax_id_aborts() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::happy_path();
    let services = fakes.services();
    let mut terminal =
        ScriptedTerminal::new(&script(&["1", "1", "0"], &["ana@example.com", "123"]));

    let result = OrderSession::new(&catalog, &services)
        .take_order(&mut terminal)
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("invalid CPF"));
}

#[tokio::test]
async fn test_bad_postal_code_aborts_before_quote() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::happy_path();
    let services = fakes.services();
    let mut terminal = ScriptedTerminal::new(&script(&["1", "1", "0"], &[
        "ana@example.com",
        "12345678901",
        "11999990000",
        "0131-010",
    ]));

    let result = OrderSession::new(&catalog, &services)
        .take_order(&mut terminal)
        .await;

    assert!(matches!(result, Err(SessionError::InvalidField { .. })));
    assert!(fakes.shipping.requests().is_empty());
}

#[tokio::test]
async fn test_disconnect_mid_session() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::happy_path();
    let services = fakes.services();
    let mut terminal = ScriptedTerminal::new(&["1", "1", "0", "ana@example.com"]);

    let result = OrderSession::new(&catalog, &services)
        .take_order(&mut terminal)
        .await;

    assert!(matches!(result, Err(SessionError::Disconnected)));
    assert!(fakes.payments.orders().is_empty());
}

// ============================================================================
// Collaborator failures
// ============================================================================

#[tokio::test]
async fn test_shipping_unavailable_aborts() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::new(
        FakeShipping::unavailable(),
        FakePayments::paying(),
        FakeNotifier::working(),
    );
    let services = fakes.services();
    let mut terminal = ScriptedTerminal::new(&script(&["1", "1", "0"], HOUSE_DETAILS));

    let outcome = OrderSession::new(&catalog, &services).run(&mut terminal).await;

    assert_eq!(outcome, SessionOutcome::Aborted);
    assert!(
        terminal
            .errors()
            .contains("failed to calculate shipping: service unavailable for this CEP")
    );
    assert!(fakes.payments.orders().is_empty());
}

#[tokio::test]
async fn test_payment_failure_aborts_without_notification() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::new(
        FakeShipping::quoting(1000, 5),
        FakePayments::failing(),
        FakeNotifier::working(),
    );
    let services = fakes.services();
    let mut terminal = ScriptedTerminal::new(&script(&["1", "1", "0"], HOUSE_DETAILS));

    let result = OrderSession::new(&catalog, &services)
        .take_order(&mut terminal)
        .await;

    assert!(matches!(result, Err(SessionError::Payment(_))));
    assert!(terminal.output().contains("=== Order Summary ==="));
    assert_eq!(fakes.notifier.calls(), 0);
}

#[tokio::test]
async fn test_empty_payment_code_is_payment_data_unavailable() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::new(
        FakeShipping::quoting(1000, 5),
        FakePayments::returning(PaymentArtifact::default()),
        FakeNotifier::working(),
    );
    let services = fakes.services();
    let mut terminal = ScriptedTerminal::new(&script(&["1", "2", "0"], HOUSE_DETAILS));

    let result = OrderSession::new(&catalog, &services)
        .take_order(&mut terminal)
        .await;

    assert!(matches!(result, Err(SessionError::PaymentDataUnavailable)));
    assert_eq!(fakes.payments.orders().len(), 1);
    assert_eq!(fakes.notifier.calls(), 0);
    assert!(!terminal.output().contains("Thank you"));
}

#[tokio::test]
async fn test_notification_failure_still_completes() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::new(
        FakeShipping::quoting(1000, 5),
        FakePayments::paying(),
        FakeNotifier::failing(),
    );
    let services = fakes.services();
    let mut terminal = ScriptedTerminal::new(&script(&["1", "2", "0"], HOUSE_DETAILS));

    let outcome = OrderSession::new(&catalog, &services).run(&mut terminal).await;

    assert_eq!(outcome, SessionOutcome::Completed);
    assert_eq!(fakes.notifier.calls(), 1);
    assert!(terminal.errors().is_empty());
    assert!(terminal.output().contains("Thank you for your order!"));
}

// ============================================================================
// Transport
// ============================================================================

#[tokio::test]
async fn test_non_interactive_terminal_is_rejected() {
    let catalog = Catalog::parse(ESPRESSO_MENU);
    let fakes = Fakes::happy_path();
    let services = fakes.services();
    let mut terminal = ScriptedTerminal::non_interactive(&["1", "1", "0"]);

    let outcome = OrderSession::new(&catalog, &services).run(&mut terminal).await;

    assert_eq!(outcome, SessionOutcome::Aborted);
    assert!(terminal.output().is_empty());
    assert_eq!(terminal.errors(), "Error: an interactive terminal is required\n");
    assert_eq!(terminal.unread(), 3);
}
