/// Route table, role profiles and breadcrumb resolution
mod breadcrumbs;
mod routes;
mod session;

pub use breadcrumbs::*;
pub use routes::*;
pub use session::*;
