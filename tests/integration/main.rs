//! Integration tests for restaurant retrieval and full session rounds.
//!
//! Provider tests stand up a local `wiremock` server per test, so no real
//! network traffic is made.

mod providers;
mod retrieval;
mod session_flow;
