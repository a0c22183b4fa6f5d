pub mod domain;

pub use domain::{CapacityKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
