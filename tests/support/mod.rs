//! Shared test support utilities for behaviour-driven suites.
//!
//! Exposes the `locale` helpers (for example `StepLocale`) that parse locale
//! parameters in BDD steps, keeping any whitespace so blank tags reach the
//! configuration loader unchanged.
pub mod locale;
