//! Shop Service Tests
//!
//! Runs `ShopService` over the in-memory store.
//!
//! # Test Organization
//!
//! - `ticket_totals` - totals recomputed as lines change, per tax scenario
//! - `ticket_workflow` - status changes, close and reopen
//! - `deposits` - balance tracking and overpayment
//! - `estimates` - estimate lines and totals
//! - `new_engines` - sales and registration reminders

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::sync::Arc;

use core_kernel::Money;
use domain_billing::{BillingError, TaxScenario};
use domain_shop::services::LaborEntry;
use domain_shop::{
    Boat, Customer, Deposit, EngineSale, Estimate, EstimateItemType, InMemoryShopStore, Mechanic,
    NewEngine, NewEngineStatus, Part, PaymentMethod, ShopError, ShopService, Ticket, TicketStatus,
    TicketStore,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

type Service = ShopService<InMemoryShopStore>;

fn service() -> Service {
    ShopService::new(Arc::new(InMemoryShopStore::new()))
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    day(2026, 10, 17)
}

/// Creates a customer with a boat and an open ticket
async fn open_ticket_for(service: &Service, customer: Customer) -> Ticket {
    let customer = service.create_customer(customer).await.unwrap();
    let boat = service
        .create_boat(Boat::new(customer.id).with_make_model("Skeeter", "ZX250"))
        .await
        .unwrap();
    service
        .open_ticket(Ticket::new(customer.id, boat.id, today()).with_description("Won't start"))
        .await
        .unwrap()
}

async fn mechanic(service: &Service, rate: Money) -> Mechanic {
    service.create_mechanic(Mechanic::new("Boudreaux", rate)).await.unwrap()
}

async fn part(service: &Service, name: &str, price: Money, taxable: bool) -> Part {
    service
        .create_part(Part::new(name, price).with_stock(10).with_taxable(taxable))
        .await
        .unwrap()
}

fn labor(mechanic: &Mechanic, hours: rust_decimal::Decimal) -> LaborEntry {
    LaborEntry {
        mechanic_id: mechanic.id,
        hours,
        labor_rate: None,
        work_description: Some("Diagnose and repair".to_string()),
    }
}

async fn sold_engine(service: &Service, customer: &Customer, price: Money) -> NewEngine {
    let engine = service
        .create_new_engine(NewEngine::new(115, "MFS115A", "SN-115-001"))
        .await
        .unwrap();
    service
        .sell_new_engine(
            engine.id,
            EngineSale {
                customer_id: customer.id,
                boat_id: None,
                sale_price: price,
                date_sold: today(),
                date_installed: None,
                paid_in_full: false,
            },
        )
        .await
        .unwrap()
}

// ============================================================================
// TICKET TOTALS
// ============================================================================

mod ticket_totals {
    use super::*;

    #[tokio::test]
    async fn test_standard_mixed_ticket() {
        let service = service();
        let ticket = open_ticket_for(&service, Customer::new("John Doe")).await;
        let tech = mechanic(&service, Money::new(dec!(80))).await;
        let plugs = part(&service, "Spark Plug", Money::new(dec!(14.95)), true).await;
        let washer = part(&service, "Washer", Money::new(dec!(0.10)), false).await;

        service.add_ticket_labor(ticket.id, labor(&tech, dec!(1.5))).await.unwrap();
        service.add_ticket_part(ticket.id, plugs.id, 2, None).await.unwrap();
        service.add_ticket_part(ticket.id, washer.id, 1, None).await.unwrap();

        let stored = service.ticket(ticket.id).await.unwrap();
        assert_eq!(stored.subtotal.amount(), dec!(150.00));
        assert_eq!(stored.tax_amount.amount(), dec!(14.62));
        assert_eq!(stored.total.amount(), dec!(164.62));
    }

    #[tokio::test]
    async fn test_exempt_customer_pays_no_tax() {
        let service = service();
        let ticket = open_ticket_for(&service, Customer::new("Parish Sheriff").with_exemption("EX-2231")).await;
        let tech = mechanic(&service, Money::new(dec!(75))).await;

        service.add_ticket_labor(ticket.id, labor(&tech, dec!(2))).await.unwrap();

        let stored = service.ticket(ticket.id).await.unwrap();
        assert_eq!(stored.subtotal.amount(), dec!(150.00));
        assert!(stored.tax_amount.is_zero());
        assert_eq!(stored.total.amount(), dec!(150.00));
    }

    #[tokio::test]
    async fn test_exempt_flag_without_certificate_is_taxed() {
        let service = service();
        let mut customer = Customer::new("No Paperwork LLC");
        customer.tax_exempt = true;
        let ticket = open_ticket_for(&service, customer).await;
        let tech = mechanic(&service, Money::new(dec!(75))).await;

        let assignment = service.add_ticket_labor(ticket.id, labor(&tech, dec!(2))).await.unwrap();
        assert_eq!(assignment.labor_rate.amount(), dec!(75));

        let stored = service.ticket(ticket.id).await.unwrap();
        assert_eq!(stored.tax_amount.amount(), dec!(14.63));
    }

    #[tokio::test]
    async fn test_out_of_state_engine_sale_taxes_only_parts_and_labor() {
        let service = service();
        let ticket =
            open_ticket_for(&service, Customer::new("Gulf Coast Marine").with_out_of_state(true)).await;
        let customer = service.customer(ticket.customer_id).await.unwrap();
        let tech = mechanic(&service, Money::new(dec!(80))).await;
        let filter = part(&service, "Fuel Filter", Money::new(dec!(15)), true).await;
        let engine = sold_engine(&service, &customer, Money::new(dec!(5000))).await;

        service.add_ticket_part(ticket.id, filter.id, 2, None).await.unwrap();
        service.add_ticket_labor(ticket.id, labor(&tech, dec!(0.25))).await.unwrap();
        let totals = service.attach_new_engine(ticket.id, engine.id).await.unwrap();

        assert_eq!(totals.scenario, TaxScenario::OutOfStateEngineSale);
        assert_eq!(totals.subtotal.amount(), dec!(5050.00));
        assert_eq!(totals.tax_amount.amount(), dec!(4.88));
        assert_eq!(totals.total.amount(), dec!(5054.88));

        let detached = service.detach_new_engine(ticket.id).await.unwrap();
        assert_eq!(detached.scenario, TaxScenario::Standard);
        assert_eq!(detached.subtotal.amount(), dec!(50.00));
    }

    #[tokio::test]
    async fn test_price_override_and_removal_recompute() {
        let service = service();
        let ticket = open_ticket_for(&service, Customer::new("Jane Roe")).await;
        let prop = part(&service, "Propeller", Money::new(dec!(300)), true).await;

        let line = service
            .add_ticket_part(ticket.id, prop.id, 1, Some(Money::new(dec!(250))))
            .await
            .unwrap();
        assert_eq!(service.ticket(ticket.id).await.unwrap().subtotal.amount(), dec!(250.00));

        let totals = service.remove_ticket_part(ticket.id, line.id).await.unwrap();
        assert!(totals.total.is_zero());
        assert!(service.ticket(ticket.id).await.unwrap().total.is_zero());
    }

    #[tokio::test]
    async fn test_part_removal_is_scoped_to_its_ticket() {
        let service = service();
        let ticket_a = open_ticket_for(&service, Customer::new("Jane Roe")).await;
        let ticket_b = open_ticket_for(&service, Customer::new("John Doe")).await;
        let prop = part(&service, "Propeller", Money::new(dec!(100)), true).await;
        let line_b = service.add_ticket_part(ticket_b.id, prop.id, 1, None).await.unwrap();

        let err = service.remove_ticket_part(ticket_a.id, line_b.id).await.unwrap_err();
        assert!(matches!(err, ShopError::Storage(ref e) if e.is_not_found()));

        let stored_b = service.ticket(ticket_b.id).await.unwrap();
        let recomputed = service.recalculate_ticket_totals(ticket_b.id).await.unwrap();
        assert_eq!(stored_b.total.amount(), dec!(109.75));
        assert_eq!(stored_b.subtotal, recomputed.subtotal);
        assert_eq!(stored_b.tax_amount, recomputed.tax_amount);
        assert_eq!(stored_b.total, recomputed.total);
        assert_eq!(service.ticket_details(ticket_b.id).await.unwrap().parts.len(), 1);
    }

    #[tokio::test]
    async fn test_labor_removal_is_scoped_to_its_ticket() {
        let service = service();
        let ticket_a = open_ticket_for(&service, Customer::new("Jane Roe")).await;
        let ticket_b = open_ticket_for(&service, Customer::new("John Doe")).await;
        let tech = mechanic(&service, Money::new(dec!(80))).await;
        let work_b = service.add_ticket_labor(ticket_b.id, labor(&tech, dec!(1))).await.unwrap();

        let err = service.remove_ticket_labor(ticket_a.id, work_b.id).await.unwrap_err();
        assert!(matches!(err, ShopError::Storage(ref e) if e.is_not_found()));

        let stored_b = service.ticket(ticket_b.id).await.unwrap();
        let recomputed = service.recalculate_ticket_totals(ticket_b.id).await.unwrap();
        assert_eq!(stored_b.total.amount(), dec!(87.80));
        assert_eq!(stored_b.total, recomputed.total);

        let totals = service.remove_ticket_labor(ticket_b.id, work_b.id).await.unwrap();
        assert!(totals.total.is_zero());
    }

    #[tokio::test]
    async fn test_labor_rate_falls_back_to_zero() {
        let service = service();
        let ticket = open_ticket_for(&service, Customer::new("Jane Roe")).await;
        let mut apprentice = Mechanic::new("Apprentice", Money::zero());
        apprentice.hourly_rate = None;
        let apprentice = service.create_mechanic(apprentice).await.unwrap();

        let assignment = service
            .add_ticket_labor(ticket.id, labor(&apprentice, dec!(3)))
            .await
            .unwrap();
        assert!(assignment.labor_rate.is_zero());
    }

    #[tokio::test]
    async fn test_missing_customer_is_invalid_input() {
        let service = service();
        let orphan = Ticket::new(core_kernel::CustomerId::new(), core_kernel::BoatId::new(), today());
        service.store().insert_ticket(&orphan).await.unwrap();

        let err = service.recalculate_ticket_totals(orphan.id).await.unwrap_err();
        assert!(matches!(err, ShopError::Billing(BillingError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_rejects_zero_quantity() {
        let service = service();
        let ticket = open_ticket_for(&service, Customer::new("Jane Roe")).await;
        let prop = part(&service, "Propeller", Money::new(dec!(300)), true).await;
        let err = service.add_ticket_part(ticket.id, prop.id, 0, None).await.unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }
}

// ============================================================================
// TICKET WORKFLOW
// ============================================================================

mod ticket_workflow {
    use super::*;

    #[tokio::test]
    async fn test_close_and_reopen() {
        let service = service();
        let ticket = open_ticket_for(&service, Customer::new("John Doe")).await;

        service
            .change_ticket_status(ticket.id, TicketStatus::AwaitingParts, today())
            .await
            .unwrap();
        let closed = service
            .change_ticket_status(ticket.id, TicketStatus::Closed, today())
            .await
            .unwrap();
        assert_eq!(closed.date_closed, Some(today()));

        let err = service
            .change_ticket_status(ticket.id, TicketStatus::Working, today())
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::InvalidStatusTransition { .. }));

        let reopened = service.reopen_ticket(ticket.id, TicketStatus::Working).await.unwrap();
        assert_eq!(reopened.status, TicketStatus::Working);
        assert!(reopened.date_closed.is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let service = service();
        let first = open_ticket_for(&service, Customer::new("A")).await;
        open_ticket_for(&service, Customer::new("B")).await;
        service
            .change_ticket_status(first.id, TicketStatus::Working, today())
            .await
            .unwrap();

        let working = service.list_tickets(Some(TicketStatus::Working)).await.unwrap();
        assert_eq!(working.len(), 1);
        assert_eq!(working[0].id, first.id);
        assert_eq!(service.list_tickets(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_boat_must_belong_to_customer() {
        let service = service();
        let owner = service.create_customer(Customer::new("Owner")).await.unwrap();
        let other = service.create_customer(Customer::new("Other")).await.unwrap();
        let boat = service.create_boat(Boat::new(owner.id)).await.unwrap();

        let err = service
            .open_ticket(Ticket::new(other.id, boat.id, today()))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_ticket_not_found() {
        let service = service();
        let err = service.ticket(core_kernel::TicketId::new()).await.unwrap_err();
        assert!(matches!(err, ShopError::NotFound { entity: "Ticket", .. }));
    }
}

// ============================================================================
// DEPOSITS
// ============================================================================

mod deposits {
    use super::*;

    async fn ticket_totalling_164_62(service: &Service) -> Ticket {
        let ticket = open_ticket_for(service, Customer::new("John Doe")).await;
        let tech = mechanic(service, Money::new(dec!(80))).await;
        let plugs = part(service, "Spark Plug", Money::new(dec!(14.95)), true).await;
        let washer = part(service, "Washer", Money::new(dec!(0.10)), false).await;
        service.add_ticket_labor(ticket.id, labor(&tech, dec!(1.5))).await.unwrap();
        service.add_ticket_part(ticket.id, plugs.id, 2, None).await.unwrap();
        service.add_ticket_part(ticket.id, washer.id, 1, None).await.unwrap();
        ticket
    }

    #[tokio::test]
    async fn test_no_deposits_owes_total() {
        let service = service();
        let ticket = ticket_totalling_164_62(&service).await;
        assert_eq!(service.balance_due(ticket.id).await.unwrap().amount(), dec!(164.62));
    }

    #[tokio::test]
    async fn test_partial_then_overpayment() {
        let service = service();
        let ticket = ticket_totalling_164_62(&service).await;

        let first = service
            .record_deposit(
                Deposit::new(ticket.id, Money::new(dec!(100)), today()).with_method(PaymentMethod::Cash),
            )
            .await
            .unwrap();
        assert_eq!(first.amount_paid.amount(), dec!(100.00));
        assert_eq!(first.balance_due.amount(), dec!(64.62));

        let second = service
            .record_deposit(Deposit::new(ticket.id, Money::new(dec!(70)), today()))
            .await
            .unwrap();
        assert_eq!(second.balance_due.amount(), dec!(-5.38));
        assert!(second.is_overpaid());

        let details = service.ticket_details(ticket.id).await.unwrap();
        assert_eq!(details.deposits.len(), 2);
        assert_eq!(details.parts.len(), 2);
        assert_eq!(details.labor.len(), 1);
        assert_eq!(details.balance, second);
    }

    #[tokio::test]
    async fn test_zero_deposit_rejected() {
        let service = service();
        let ticket = ticket_totalling_164_62(&service).await;
        let err = service
            .record_deposit(Deposit::new(ticket.id, Money::zero(), today()))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }
}

// ============================================================================
// ESTIMATES
// ============================================================================

mod estimates {
    use super::*;

    #[tokio::test]
    async fn test_estimate_ignores_out_of_state() {
        let service = service();
        let customer = service
            .create_customer(Customer::new("Texas Angler").with_out_of_state(true))
            .await
            .unwrap();
        let estimate = service
            .create_estimate(
                Estimate::new(customer.id, today()).with_insurance_claim("Bayou Mutual", "CLM-7781"),
            )
            .await
            .unwrap();

        service
            .add_estimate_line(estimate.id, EstimateItemType::Labor, "Hull repair", dec!(2), Money::new(dec!(85)), true)
            .await
            .unwrap();
        let decal = service
            .add_estimate_line(estimate.id, EstimateItemType::Part, "Decal kit", dec!(1), Money::new(dec!(40)), false)
            .await
            .unwrap();

        let stored = service.estimate(estimate.id).await.unwrap();
        assert_eq!(stored.subtotal.amount(), dec!(210.00));
        assert_eq!(stored.tax_amount.amount(), dec!(16.58));
        assert_eq!(stored.total.amount(), dec!(226.58));

        let totals = service.remove_estimate_line(estimate.id, decal.id).await.unwrap();
        assert_eq!(totals.total.amount(), dec!(186.58));
        assert_eq!(service.estimate_details(estimate.id).await.unwrap().lines.len(), 1);
    }

    #[tokio::test]
    async fn test_line_removal_is_scoped_to_its_estimate() {
        let service = service();
        let customer = service.create_customer(Customer::new("Jane Roe")).await.unwrap();
        let first = service.create_estimate(Estimate::new(customer.id, today())).await.unwrap();
        let second = service.create_estimate(Estimate::new(customer.id, today())).await.unwrap();
        let line = service
            .add_estimate_line(second.id, EstimateItemType::Part, "Bilge pump", dec!(1), Money::new(dec!(100)), true)
            .await
            .unwrap();

        let err = service.remove_estimate_line(first.id, line.id).await.unwrap_err();
        assert!(matches!(err, ShopError::Storage(ref e) if e.is_not_found()));

        let stored = service.estimate(second.id).await.unwrap();
        let recomputed = service.recalculate_estimate_totals(second.id).await.unwrap();
        assert_eq!(stored.total.amount(), dec!(109.75));
        assert_eq!(stored.total, recomputed.total);
        assert_eq!(service.estimate_details(second.id).await.unwrap().lines.len(), 1);
    }

    #[tokio::test]
    async fn test_exempt_estimate() {
        let service = service();
        let customer = service
            .create_customer(Customer::new("Wildlife & Fisheries").with_exemption("GOV-001"))
            .await
            .unwrap();
        let estimate = service.create_estimate(Estimate::new(customer.id, today())).await.unwrap();
        service
            .add_estimate_line(estimate.id, EstimateItemType::Part, "Trolling motor", dec!(1), Money::new(dec!(899.99)), true)
            .await
            .unwrap();

        let stored = service.estimate(estimate.id).await.unwrap();
        assert!(stored.tax_amount.is_zero());
        assert_eq!(stored.total.amount(), dec!(899.99));
    }

    #[tokio::test]
    async fn test_invalid_line_is_not_stored() {
        let service = service();
        let customer = service.create_customer(Customer::new("Jane Roe")).await.unwrap();
        let estimate = service.create_estimate(Estimate::new(customer.id, today())).await.unwrap();

        let err = service
            .add_estimate_line(estimate.id, EstimateItemType::Part, "Prop", dec!(-1), Money::new(dec!(10)), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
        assert!(service.estimate_details(estimate.id).await.unwrap().lines.is_empty());
    }
}

// ============================================================================
// NEW ENGINES
// ============================================================================

mod new_engines {
    use super::*;

    #[tokio::test]
    async fn test_sell_once_and_registration_reminder() {
        let service = service();
        let customer = service.create_customer(Customer::new("Jane Roe")).await.unwrap();
        let engine = service
            .create_new_engine(NewEngine::new(140, "MFS140A", "SN-140-7"))
            .await
            .unwrap();

        let sale = EngineSale {
            customer_id: customer.id,
            boat_id: None,
            sale_price: Money::new(dec!(11500)),
            date_sold: day(2026, 8, 1),
            date_installed: Some(day(2026, 8, 10)),
            paid_in_full: true,
        };
        service.sell_new_engine(engine.id, sale.clone()).await.unwrap();
        let err = service.sell_new_engine(engine.id, sale).await.unwrap_err();
        assert!(matches!(err, ShopError::EngineNotInStock(_)));

        let due = service.engines_needing_registration(today()).await.unwrap();
        assert_eq!(due.len(), 1);

        service.mark_engine_registered(engine.id, today()).await.unwrap();
        assert!(service.engines_needing_registration(today()).await.unwrap().is_empty());
        assert!(service
            .list_new_engines(Some(NewEngineStatus::InStock))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_unsold_engine_cannot_be_billed() {
        let service = service();
        let ticket = open_ticket_for(&service, Customer::new("Jane Roe")).await;
        let engine = service
            .create_new_engine(NewEngine::new(60, "MFS60", "SN-60-1"))
            .await
            .unwrap();
        let err = service.attach_new_engine(ticket.id, engine.id).await.unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }

    #[tokio::test]
    async fn test_bad_serial_rejected() {
        let service = service();
        let err = service
            .create_new_engine(NewEngine::new(60, "MFS60", "SN 60/1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }
}
