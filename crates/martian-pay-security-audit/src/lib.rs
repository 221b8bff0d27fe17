//! Source-level security checks for the webhook receiver. See `tests/`.
