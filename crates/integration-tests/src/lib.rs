//! Cross-crate tests live in `tests/`. This library is intentionally empty.
