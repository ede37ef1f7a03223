//! Core Kernel - Foundational types shared by every shop crate
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money and rates with precise decimal arithmetic and cent rounding
//! - Strongly-typed identifiers for shop records
//! - The port error type shared by persistence adapters

pub mod money;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, MoneyError, Rate};
pub use identifiers::{
    CustomerId, BoatId, EngineId, NewEngineId, PartId, MechanicId,
    TicketId, TicketPartId, AssignmentId, DepositId, EstimateId, EstimateLineId,
};
pub use ports::{PortError, DomainPort};
pub use error::CoreError;
