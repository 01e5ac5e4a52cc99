//! Roster domain models.
//!
//! Provides the data types for a shift-rostering problem and its
//! solutions.
//!
//! # Domain Mappings
//!
//! | u-roster | Volunteer rota | Clinic | Support desk |
//! |----------|----------------|--------|--------------|
//! | Slot | Shift | Session | On-call window |
//! | Participant | Volunteer | Doctor | Engineer |
//! | Day Group | Day | Clinic day | Calendar day |
//! | Solution | Rota | Session plan | On-call schedule |

mod assignment;
mod participant;
mod roster;
mod slot;

pub use assignment::{Assignment, RosterEntry, Solution};
pub use participant::{Participant, Quota};
pub use roster::{DayGroup, RosterModel, RosterRequest, VACANT_NAME};
pub use slot::{Assignee, SentinelId, Slot, SlotInput};
