//! Application Layer - Use cases and port definitions.
//!
//! This layer contains the application services and port interfaces
//! that define how the domain interacts with external systems.

/// Request and response shapes.
pub mod dto;

/// Port interfaces for external systems (upstream price sources).
pub mod ports;

/// Application services for price resolution and quote aggregation.
pub mod services;
