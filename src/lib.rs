//! Weekly safety and workforce KPIs for construction companies and
//! projects.
//!
//! Everything lives in one tree — companies own projects, projects own
//! weeks, weeks own their documents — persisted as a single JSON file.
//! Two rules keep the numbers honest: the safety pyramid of a week is a
//! running snapshot that each stored weekly report rolls into exactly
//! once (`rollup`), and a newly created week is seeded from its nearest
//! predecessor with hour and numeric cells reset (`carryover`). The UI
//! shell sits on top of `services` and `state`; nothing in here draws.

pub mod carryover;
pub mod error;
pub mod incidents;
pub mod metrics;
pub mod pyramid;
pub mod report;
pub mod rollup;
pub mod roster;
pub mod services;
pub mod specialty;
pub mod state;
pub mod store;
pub mod types;
pub mod util;
