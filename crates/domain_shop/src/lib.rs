//! Shop Domain - Records, Workflow, and Billing Orchestration
//!
//! This crate models the records a marine repair shop keeps (customers and
//! their boats, parts inventory, mechanics, new engines for sale, repair
//! tickets, estimates, and deposits) and the service that keeps each
//! ticket's and estimate's stored totals in step with its line items.
//!
//! # Ticket Lifecycle
//!
//! ```text
//! Open <-> Working <-> Awaiting {Parts, Customer, Payment, Pickup} -> Closed
//! ```
//!
//! Any open status may move to any other, and every status may close.
//! Leaving `Closed` requires an explicit reopen.
//!
//! # Persistence
//!
//! Storage is reached only through the port traits in [`ports`]. The
//! in-memory adapter in [`adapters`] backs tests; `infra_db` provides SQLite.

pub mod customer;
pub mod boat;
pub mod inventory;
pub mod ticket;
pub mod deposit;
pub mod estimate;
pub mod validation;
pub mod ports;
pub mod adapters;
pub mod services;
pub mod error;

pub use customer::Customer;
pub use boat::{Boat, Engine, EngineType};
pub use inventory::{Part, Mechanic, NewEngine, NewEngineStatus, EngineSale};
pub use ticket::{Ticket, TicketStatus, TicketPart, TicketAssignment};
pub use deposit::{Deposit, PaymentMethod};
pub use estimate::{Estimate, EstimateLineItem, EstimateItemType};
pub use ports::{CustomerStore, InventoryStore, TicketStore, EstimateStore, ShopStore};
pub use services::{ShopService, LaborEntry, TicketDetails, EstimateDetails};
pub use adapters::InMemoryShopStore;
pub use error::ShopError;
