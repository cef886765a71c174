//! Clinic models split into domain-specific modules.

pub mod appointment;
pub mod common;
pub mod doctor;
pub mod invoice;
pub mod patient;
pub mod prescription;
pub mod user;

pub use appointment::*;
pub use common::*;
pub use doctor::*;
pub use invoice::*;
pub use patient::*;
pub use prescription::*;
pub use user::*;
