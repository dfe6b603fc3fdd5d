pub mod assets;
pub mod handlers;
pub mod middleware;
pub mod page;
pub mod routes;
pub mod theme;
