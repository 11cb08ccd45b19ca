//! # WebSub Hub Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── subscriber.rs  # Loopback subscriber server
//!     ├── flows.rs       # Verification, delivery, expiry against the real client
//!     └── e2e_hub.rs     # Full runtime over HTTP
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hub-tests
//! cargo test -p hub-tests integration::flows::
//! ```

pub mod integration;
