//! Domain types shared by the medisched crates: appointments, doctors,
//! patients, the caller principal, the clock seam and the error type.

pub mod clock;
pub mod errors;
pub mod models;
