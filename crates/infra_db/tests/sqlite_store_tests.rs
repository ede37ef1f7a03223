//! SQLite Store Tests
//!
//! Runs the shop ports and `ShopService` against in-memory SQLite.
//!
//! # Test Organization
//!
//! - `storage` - records read back exactly as written
//! - `errors` - database failures surface as the right `PortError`
//! - `workflows` - billing flows end to end over SQLite
//! - `parity` - SQLite and the in-memory store agree on totals

use rust_decimal_macros::dec;
use std::sync::Arc;

use core_kernel::{Money, PortError, TicketId, TicketPartId};
use domain_shop::{
    Boat, CustomerStore, Deposit, Estimate, EstimateItemType, EstimateStore, InMemoryShopStore,
    InventoryStore, NewEngineStatus, Part, PaymentMethod, ShopError, ShopService, Ticket,
    TicketStatus, TicketStore,
};
use infra_db::{DatabaseConfig, SqliteShopStore};
use test_utils::{
    assert_balance, assert_err_variant, assert_estimate_totals, assert_ticket_totals,
    CustomerFixtures, DateFixtures, InventoryFixtures, TestDatabase, TicketScenarioBuilder,
};

async fn database() -> TestDatabase {
    TestDatabase::new().await.unwrap()
}

// ============================================================================
// STORAGE
// ============================================================================

mod storage {
    use super::*;

    #[tokio::test]
    async fn test_customer_round_trip() {
        let db = database().await;
        let customer = CustomerFixtures::exempt()
            .with_address("12 Bayou Rd, Houma LA")
            .with_out_of_state(true);

        db.store.insert_customer(&customer).await.unwrap();
        let stored = db.store.get_customer(customer.id).await.unwrap().unwrap();

        assert_eq!(stored.name, customer.name);
        assert_eq!(stored.address, customer.address);
        assert!(stored.tax_exempt);
        assert_eq!(stored.tax_exempt_certificate.as_deref(), Some("EX-2231"));
        assert!(stored.out_of_state);
    }

    #[tokio::test]
    async fn test_missing_record_is_none() {
        let db = database().await;
        let missing = CustomerFixtures::standard();

        assert!(db.store.get_customer(missing.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_boat_colors_survive_storage() {
        let db = database().await;
        let customer = CustomerFixtures::standard();
        db.store.insert_customer(&customer).await.unwrap();

        let mut boat = Boat::new(customer.id).with_make_model("Bayliner", "Element").with_year(2019);
        boat.colors = vec!["White".to_string(), "Navy".to_string()];
        db.store.insert_boat(&boat).await.unwrap();

        assert_eq!(db.store.get_boat(boat.id).await.unwrap(), Some(boat.clone()));
        assert_eq!(db.store.list_boats(customer.id).await.unwrap(), vec![boat]);
    }

    #[tokio::test]
    async fn test_part_prices_are_exact() {
        let db = database().await;
        let part = Part::new("Impeller", Money::new(dec!(23.47)))
            .with_supplier("Gulf Marine Supply", Money::new(dec!(11.035)))
            .with_stock(3);

        db.store.insert_part(&part).await.unwrap();
        let stored = db.store.get_part(part.id).await.unwrap().unwrap();

        assert_eq!(stored, part);
        assert_eq!(stored.cost_from_supplier.unwrap().amount(), dec!(11.035));
        assert!(stored.retail_price.is_none());
    }

    #[tokio::test]
    async fn test_new_engine_status_filter() {
        let db = database().await;
        let service = db.service();
        let customer = service.create_customer(CustomerFixtures::standard()).await.unwrap();

        let kept = service.create_new_engine(InventoryFixtures::outboard()).await.unwrap();
        let sold = service.create_new_engine(InventoryFixtures::outboard()).await.unwrap();
        service
            .sell_new_engine(
                sold.id,
                domain_shop::EngineSale {
                    customer_id: customer.id,
                    boat_id: None,
                    sale_price: Money::new(dec!(5000)),
                    date_sold: DateFixtures::today(),
                    date_installed: Some(DateFixtures::today()),
                    paid_in_full: true,
                },
            )
            .await
            .unwrap();

        let in_stock = db.store.list_new_engines(Some(NewEngineStatus::InStock)).await.unwrap();
        let all = db.store.list_new_engines(None).await.unwrap();

        assert_eq!(in_stock.len(), 1);
        assert_eq!(in_stock[0].id, kept.id);
        assert_eq!(all.len(), 2);

        let stored = db.store.get_new_engine(sold.id).await.unwrap().unwrap();
        assert_eq!(stored.status, NewEngineStatus::Sold);
        assert_eq!(stored.customer_id, Some(customer.id));
        assert!(stored.paid_in_full);
    }

    #[tokio::test]
    async fn test_tickets_filter_and_order() {
        let db = database().await;
        let service = db.service();
        let older = TicketScenarioBuilder::new()
            .opened_on(DateFixtures::date(2026, 9, 1))
            .build(&service)
            .await
            .unwrap();
        let newer = TicketScenarioBuilder::new().build(&service).await.unwrap();
        service
            .change_ticket_status(older.ticket.id, TicketStatus::Working, DateFixtures::today())
            .await
            .unwrap();

        let all = db.store.list_tickets(None).await.unwrap();
        let open = db.store.list_tickets(Some(TicketStatus::Open)).await.unwrap();

        assert_eq!(
            all.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![newer.ticket.id, older.ticket.id]
        );
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, newer.ticket.id);
    }
}

// ============================================================================
// ERRORS
// ============================================================================

mod errors {
    use super::*;

    #[tokio::test]
    async fn test_update_missing_customer_is_not_found() {
        let db = database().await;
        let result = db.store.update_customer(&CustomerFixtures::standard()).await;

        assert_err_variant!(result, PortError::NotFound { .. });
    }

    #[tokio::test]
    async fn test_delete_missing_line_is_not_found() {
        let db = database().await;
        let result = db.store.delete_ticket_part(TicketId::new(), TicketPartId::new()).await;

        assert_err_variant!(result, PortError::NotFound { .. });
    }

    #[tokio::test]
    async fn test_duplicate_serial_is_conflict() {
        let db = database().await;
        let first = InventoryFixtures::outboard();
        let mut second = InventoryFixtures::outboard();
        second.serial_number = first.serial_number.clone();

        db.store.insert_new_engine(&first).await.unwrap();
        let result = db.store.insert_new_engine(&second).await;

        assert_err_variant!(result, PortError::Conflict { .. });
    }

    #[tokio::test]
    async fn test_ticket_for_unknown_customer_is_conflict() {
        let db = database().await;
        let stranger = CustomerFixtures::standard();
        let ticket = Ticket::new(stranger.id, Boat::new(stranger.id).id, DateFixtures::today());

        let result = db.store.insert_ticket(&ticket).await;

        assert_err_variant!(result, PortError::Conflict { .. });
    }

    #[tokio::test]
    async fn test_service_reports_storage_errors() {
        let db = database().await;
        let service = db.service();
        let customer = service.create_customer(CustomerFixtures::standard()).await.unwrap();
        let engine = InventoryFixtures::outboard();
        service.create_new_engine(engine.clone()).await.unwrap();

        let mut duplicate = InventoryFixtures::outboard();
        duplicate.serial_number = engine.serial_number;
        let result = service.create_new_engine(duplicate).await;

        assert_err_variant!(result, ShopError::Storage(PortError::Conflict { .. }));
        let customers = service.list_customers().await.unwrap();
        assert_eq!(customers.iter().map(|c| c.id).collect::<Vec<_>>(), vec![customer.id]);
    }
}

// ============================================================================
// WORKFLOWS
// ============================================================================

mod workflows {
    use super::*;

    #[tokio::test]
    async fn test_standard_ticket_and_deposits() {
        let db = database().await;
        let service = db.service();
        let scenario = TicketScenarioBuilder::standard_mixed().build(&service).await.unwrap();
        let ticket_id = scenario.ticket.id;

        assert_ticket_totals(&scenario.ticket, dec!(150.00), dec!(14.62), dec!(164.62));

        let summary = service
            .record_deposit(
                Deposit::new(ticket_id, Money::new(dec!(100)), DateFixtures::today())
                    .with_method(PaymentMethod::Check),
            )
            .await
            .unwrap();
        assert_balance(&summary, dec!(100), dec!(64.62));

        let details = service.ticket_details(ticket_id).await.unwrap();
        assert_eq!(details.parts.len(), 2);
        assert_eq!(details.labor.len(), 1);
        assert_eq!(details.deposits[0].payment_method, Some(PaymentMethod::Check));
        assert_eq!(details.balance.balance_due.amount(), dec!(64.62));
    }

    #[tokio::test]
    async fn test_removing_lines_updates_stored_totals() {
        let db = database().await;
        let service = db.service();
        let scenario = TicketScenarioBuilder::standard_mixed().build(&service).await.unwrap();
        let ticket_id = scenario.ticket.id;

        let labor = db.store.list_assignments(ticket_id).await.unwrap();
        let totals = service.remove_ticket_labor(ticket_id, labor[0].id).await.unwrap();

        assert_eq!(totals.subtotal.amount(), dec!(30.00));
        let stored = service.ticket(ticket_id).await.unwrap();
        assert_ticket_totals(&stored, dec!(30.00), dec!(2.92), dec!(32.92));
    }

    #[tokio::test]
    async fn test_lines_cannot_be_removed_through_another_ticket() {
        let db = database().await;
        let service = db.service();
        let other = TicketScenarioBuilder::new().build(&service).await.unwrap().ticket;
        let owner = TicketScenarioBuilder::standard_mixed().build(&service).await.unwrap().ticket;
        let parts = db.store.list_ticket_parts(owner.id).await.unwrap();
        let labor = db.store.list_assignments(owner.id).await.unwrap();

        let result = service.remove_ticket_part(other.id, parts[0].id).await;
        assert_err_variant!(result, ShopError::Storage(PortError::NotFound { .. }));
        let result = service.remove_ticket_labor(other.id, labor[0].id).await;
        assert_err_variant!(result, ShopError::Storage(PortError::NotFound { .. }));

        assert_eq!(db.store.list_ticket_parts(owner.id).await.unwrap().len(), 2);
        assert_eq!(db.store.list_assignments(owner.id).await.unwrap().len(), 1);
        let stored = service.ticket(owner.id).await.unwrap();
        assert_ticket_totals(&stored, dec!(150.00), dec!(14.62), dec!(164.62));
        let recomputed = service.recalculate_ticket_totals(owner.id).await.unwrap();
        assert_eq!(stored.total, recomputed.total);
    }

    #[tokio::test]
    async fn test_estimate_line_cannot_be_removed_through_another_estimate() {
        let db = database().await;
        let service = db.service();
        let customer = service.create_customer(CustomerFixtures::standard()).await.unwrap();
        let first = service
            .create_estimate(Estimate::new(customer.id, DateFixtures::today()))
            .await
            .unwrap();
        let second = service
            .create_estimate(Estimate::new(customer.id, DateFixtures::today()))
            .await
            .unwrap();
        let line = service
            .add_estimate_line(second.id, EstimateItemType::Part, "Bilge pump", dec!(1), Money::new(dec!(100)), true)
            .await
            .unwrap();

        let result = service.remove_estimate_line(first.id, line.id).await;
        assert_err_variant!(result, ShopError::Storage(PortError::NotFound { .. }));

        let stored = service.estimate(second.id).await.unwrap();
        assert_estimate_totals(&stored, dec!(100.00), dec!(9.75), dec!(109.75));
        assert_eq!(db.store.list_estimate_lines(second.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_close_and_reopen_ticket() {
        let db = database().await;
        let service = db.service();
        let scenario = TicketScenarioBuilder::new().build(&service).await.unwrap();
        let ticket_id = scenario.ticket.id;

        let closed = service
            .change_ticket_status(ticket_id, TicketStatus::Closed, DateFixtures::today())
            .await
            .unwrap();
        assert_eq!(closed.date_closed, Some(DateFixtures::today()));

        let reopened = service.reopen_ticket(ticket_id, TicketStatus::Working).await.unwrap();
        assert_eq!(reopened.status, TicketStatus::Working);
        assert_eq!(service.ticket(ticket_id).await.unwrap().date_closed, None);
    }

    #[tokio::test]
    async fn test_out_of_state_estimate() {
        let db = database().await;
        let service = db.service();
        let customer = service.create_customer(CustomerFixtures::out_of_state()).await.unwrap();
        let estimate = service
            .create_estimate(
                Estimate::new(customer.id, DateFixtures::today())
                    .with_insurance_claim("Bayou Mutual", "CLM-7781"),
            )
            .await
            .unwrap();

        service
            .add_estimate_line(estimate.id, EstimateItemType::Labor, "Hull repair", dec!(2), Money::new(dec!(85)), true)
            .await
            .unwrap();
        service
            .add_estimate_line(estimate.id, EstimateItemType::Part, "Decal kit", dec!(1), Money::new(dec!(40)), false)
            .await
            .unwrap();

        let stored = service.estimate(estimate.id).await.unwrap();
        assert_estimate_totals(&stored, dec!(210.00), dec!(16.58), dec!(226.58));
        assert_eq!(stored.claim_number.as_deref(), Some("CLM-7781"));

        let lines = db.store.list_estimate_lines(estimate.id).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].item_type, EstimateItemType::Labor);
        assert_eq!(lines[0].line_total.amount(), dec!(170.00));
        assert!(!lines[1].taxable);
    }
}

// ============================================================================
// PARITY
// ============================================================================

mod parity {
    use super::*;
    use domain_shop::ShopStore;
    use proptest::prelude::*;
    use test_utils::{hours_strategy, part_line_strategy};

    async fn ticket_total<S: ShopStore>(
        service: &ShopService<S>,
        lines: &[(Money, u32, bool)],
        hours: rust_decimal::Decimal,
    ) -> [Money; 3] {
        let mut builder = TicketScenarioBuilder::new().with_labor(hours);
        for (price, quantity, taxable) in lines {
            builder = builder.with_part(Part::new("Part", *price).with_taxable(*taxable), *quantity);
        }
        let ticket = builder.build(service).await.unwrap().ticket;
        [ticket.subtotal, ticket.tax_amount, ticket.total]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_sqlite_matches_in_memory(
            lines in prop::collection::vec(part_line_strategy(), 0..6),
            hours in hours_strategy(),
        ) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let (sqlite, memory) = runtime.block_on(async {
                let store = SqliteShopStore::connect(&DatabaseConfig::in_memory()).await.unwrap();
                let sqlite = ShopService::new(Arc::new(store));
                let memory = ShopService::new(Arc::new(InMemoryShopStore::new()));
                (
                    ticket_total(&sqlite, &lines, hours).await,
                    ticket_total(&memory, &lines, hours).await,
                )
            });

            prop_assert_eq!(sqlite, memory);
            prop_assert_eq!(sqlite[0] + sqlite[1], sqlite[2]);
        }
    }
}
