//! End-to-end handshake tests.
//!
//! These tests run the full challenge/callback sequence against a mock CAS
//! server listening on an ephemeral local port.

mod common;
mod handshake;
