//! Client routes and the page views they render.

pub mod route;
pub mod routes;
pub mod view;

pub use route::Route;
pub use routes::{fallback, page_routes};
pub use view::{OpportunityCard, PageView, render};
