pub mod auth;
pub mod bar;
pub mod notification;
pub mod post;
pub mod profile;

pub use auth::*;
pub use bar::*;
pub use notification::*;
pub use post::*;
pub use profile::*;
