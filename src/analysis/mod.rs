//! Pure statistics over a [`CanonicalDataset`](crate::data::model::CanonicalDataset).
//!
//! `metrics` holds the individual calculations; `compare` validates a
//! selection and assembles them into a [`compare::ResultBundle`].

pub mod compare;
pub mod metrics;
