//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → middleware/request_log.rs (timing, request record)
//!     → api / auth handlers (request.rs decodes, one store call)
//!     → response.rs (JSON body, error mapping)
//!     → Send to client (Access-Control-Allow-Origin: *)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{ClientIp, RequestLogged};
pub use response::ApiError;
pub use server::{build_router, AppState, HttpServer};
