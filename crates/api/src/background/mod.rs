//! Detached tasks spawned from request handlers.
//!
//! These never report back to the request that started them; failures are
//! logged and dropped.

pub mod browse;
