//! Integration tests for the QR view bridge
//!
//! Bridge behavior is exercised end to end through its handle against the
//! simulated provider; configuration loading is tested against real files.
