//! Transfer-point optimization for transit itineraries.
//!
//! Given itineraries found by an upstream search, [`optimizer::Optimizer`] decides where
//! each pair of consecutive trips should be joined. It honors operator-declared transfers
//! (guaranteed, stay-seated, forbidden) and prefers waits that leave a safe margin, without
//! ever changing which trips are ridden.

pub mod model;
pub mod optimizer;
pub mod shared;

pub mod prelude {
    pub use crate::model::{
        AccessLeg, DeclaredTransfer, EgressLeg, Itinerary, Leg, PointRef, StopTime, Timetable,
        TimetableBuilder, TransferLeg, TransferPoint, TransferPriority, TransitLeg,
    };
    pub use crate::optimizer::{
        Config, DefaultSlackProvider, OptimizedItinerary, Optimizer, SlackConfig, SlackProvider,
    };
    pub use crate::shared::time::{Duration, Time};
}
