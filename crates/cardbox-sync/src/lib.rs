//! The reconciliation engine for cardbox.
//!
//! [`Engine`] keeps a [`CardStore`](cardbox_core::store::CardStore) in step
//! with a folder of card files reached through a
//! [`CardService`](cardbox_core::service::CardService). Scans insert what is
//! missing and leave existing contacts alone; explicit create and edit
//! operations change the card file first and only then the store.
//!
//! Domain rejections come back as outcome values. Only infrastructure
//! failures (store, file system) are errors.

mod engine;
pub mod error;
mod locks;
mod outcome;


pub use engine::Engine;
pub use error::{Error, Result};
pub use outcome::{
  CardDetails, CreateOutcome, DetailsOutcome, EditOutcome, RejectReason,
  Rejection, ScanReport, SyncOutcome,
};
