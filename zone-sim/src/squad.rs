use std::collections::VecDeque;
use std::fmt;

use zone_core::Location;

/// A group of actors of one faction that moves as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Squad {
    pub id: u32,
    pub faction: String,
    pub location: Location,
    /// Number of actors in the squad.
    pub actors: u32,
    /// Where the squad is heading, if anywhere.
    pub destination: Option<Location>,
    /// Remaining cells to walk, next cell first.
    pub route: VecDeque<Location>,
    /// Ticks left before the squad acts again.
    pub idle_ticks: u32,
}

/// What a squad is doing this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Waiting,
    Moving,
    /// Free to pick a new task.
    Ready,
}

impl Squad {
    pub fn new(id: u32, faction: &str, location: Location, actors: u32) -> Self {
        Self {
            id,
            faction: faction.to_owned(),
            location,
            actors,
            destination: None,
            route: VecDeque::new(),
            idle_ticks: 0,
        }
    }

    pub fn activity(&self) -> Activity {
        if self.idle_ticks > 0 {
            Activity::Waiting
        } else if self.destination.is_some() {
            Activity::Moving
        } else {
            Activity::Ready
        }
    }

    /// Follow `path` (which excludes the current cell) to its last cell.
    pub fn set_route(&mut self, path: Vec<Location>) {
        self.destination = path.last().copied();
        self.route = path.into();
    }

    /// Drop the current route and wait `ticks`.
    pub fn halt(&mut self, ticks: u32) {
        self.destination = None;
        self.route.clear();
        self.idle_ticks = ticks;
    }

    /// Upper-case first letter of the faction name.
    pub fn initial(&self) -> char {
        self.faction
            .chars()
            .next()
            .map_or('?', |c| c.to_ascii_uppercase())
    }
}

impl fmt::Display for Squad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} squad({})", self.faction, self.actors)
    }
}
