//! Core Kernel - Foundational types and utilities for the risk pool
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers and deterministic id generation
//! - Injectable clocks
//! - Port error types shared by every adapter

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError, format_amount};
pub use temporal::{Clock, SystemClock, FixedClock};
pub use identifiers::{
    MemberId, ClaimId, TransactionId, GroupId,
    IdGenerator, SequentialIdGenerator, RandomIdGenerator,
};
pub use ports::{PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable};
