//! Data transfer objects shared between the services and the outer surfaces

mod responses;

pub use responses::{HealthResponse, HomeResponse, ProfileView, StatusResponse};
