// Copyright (c) 2025 CCNx PIT Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Pending Interest Table.
//!
//! Tracks outstanding Interests so that a Content Object can be matched back
//! to every face that asked for it, and so duplicate Interests for one name
//! are aggregated onto a single entry.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ccnx_pit_lib::clock::ManualClock;
//! use ccnx_pit_lib::name::Name;
//! use ccnx_pit_lib::pit::{FaceId, Interest, PitTable, StaticFib};
//!
//! let mut fib = StaticFib::new();
//! fib.add_route(&Name::new(), [FaceId(0)]).unwrap();
//!
//! let mut pit = PitTable::new(Arc::new(ManualClock::default()));
//! let interest = Interest::new(Name::parse("/video/a.mpg").unwrap(), FaceId(1));
//! let id = pit.create(&interest, &fib).unwrap().id();
//!
//! let data = Name::parse("/video/a.mpg/seg0").unwrap();
//! assert_eq!(pit.lookup_by_content(&data).map(|e| e.id()), Some(id));
//! ```

mod entry;
mod error;
mod fib;
mod observer;
mod policy;
mod shared;
mod table;

pub use entry::{EntryId, FaceId, Interest, PitEntry};
pub use error::{PitError, PitResult};
pub use fib::{Fib, FibRoute, StaticFib};
pub use observer::{EraseReason, PitObserver, TracingObserver};
pub use policy::{
    EvictionKind, EvictionPolicy, FifoPolicy, NearestExpiryPolicy, PersistentPolicy,
};
pub use shared::SharedPit;
pub use table::PitTable;
