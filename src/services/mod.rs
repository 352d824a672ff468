pub mod activity;
pub mod catalog;
pub mod coupons;
pub mod posts;
pub mod profiles;
pub mod registration;
pub mod social_graph;

/// Successful end of a step: where the client should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Redirect {
            location: location.into(),
        }
    }
}
