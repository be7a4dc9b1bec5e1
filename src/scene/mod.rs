/// Layer records and their JSON wire format.
pub mod model;
