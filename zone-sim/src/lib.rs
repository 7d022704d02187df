//! Zone: factions roaming a grid map, driven by the `zone-paths` engine.
//!
//! The simulation is deliberately thin: squads spawn, idle, and travel
//! along planned routes one cell per tick, re-planning when an allied squad
//! steps into their way. Hostile squads meeting on a cell are reported as
//! encounters.

pub mod config;
pub mod map;
pub mod messages;
pub mod squad;
pub mod world;

pub use config::{ConfigError, FactionConfig, SimConfig};
pub use map::{AreaMap, MapError, SpawnArea};
pub use messages::{LogEntry, MessageLog, MsgKind, init_logging};
pub use squad::{Activity, Squad};
pub use world::World;
