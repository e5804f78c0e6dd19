// HTTP handlers, one module per resource

pub mod about;
pub mod agents;
pub mod contact;
pub mod photos;
pub mod status;
pub mod testimonials;

/// Upper bound on records returned by list endpoints
pub const LIST_LIMIT: usize = 1000;
