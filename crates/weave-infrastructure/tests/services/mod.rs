//! Plain Registry Tests
