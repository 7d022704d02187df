//! The simulation state and its tick.

use std::collections::{HashMap, HashSet};

use rand::rngs::SmallRng;
use rand::{RngExt, SeedableRng};
use zone_core::Location;
use zone_paths::{PathPlanner, PlannerError};

use crate::config::SimConfig;
use crate::map::{AreaMap, SpawnArea};
use crate::messages::{MessageLog, MsgKind};
use crate::squad::Squad;

/// Random draws before scanning an area cell by cell.
const PLACEMENT_ATTEMPTS: usize = 64;

const MAX_ACTORS: u32 = 5;

/// Squads roaming one map.
#[derive(Debug)]
pub struct World {
    config: SimConfig,
    planner: PathPlanner,
    map: AreaMap,
    squads: Vec<Squad>,
    next_id: u32,
    rng: SmallRng,
    log: MessageLog,
    ticks: u64,
    /// Hostile pairs (lower id first) in contact after the last tick.
    contacts: HashSet<(u32, u32)>,
}

impl World {
    /// Build a world on `map`. Messages go to `log`.
    pub fn new(config: &SimConfig, map: AreaMap, log: MessageLog) -> Result<Self, PlannerError> {
        let planner = PathPlanner::new(config.planner_config(), map.obstacles.clone())?;
        let seed = config
            .seed
            .unwrap_or_else(|| rand::rng().random_range(0..u64::MAX));
        log::info!("world seed {seed}");
        Ok(Self {
            config: config.clone(),
            planner,
            map,
            squads: Vec::new(),
            next_id: 1,
            rng: SmallRng::seed_from_u64(seed),
            log,
            ticks: 0,
            contacts: HashSet::new(),
        })
    }

    /// Spawn the starting squads of every faction.
    pub fn populate(&mut self) {
        let names: Vec<String> = self.config.factions.iter().map(|f| f.name.clone()).collect();
        for name in names {
            let count = self
                .rng
                .random_range(self.config.min_faction_squads..=self.config.max_faction_squads);
            for _ in 0..count {
                self.spawn(&name, None);
            }
        }
    }

    /// Add a squad of `faction` at `location`, or at a random open cell of
    /// the faction's spawn area. Returns the new squad's id, or `None` for an
    /// unknown faction or a blocked cell.
    pub fn spawn(&mut self, faction: &str, location: Option<Location>) -> Option<u32> {
        let bias = self.config.faction(faction)?.spawn_bias;
        let location = match location {
            Some(loc) if self.planner.is_blocked(loc, None) => return None,
            Some(loc) => loc,
            None => {
                let area = SpawnArea::new(self.planner.bounds(), bias, None);
                self.random_cell(area, &HashSet::new())?
            }
        };
        let actors = self.rng.random_range(1..=MAX_ACTORS);
        let id = self.next_id;
        self.next_id += 1;
        let squad = Squad::new(id, faction, location, actors);
        self.log
            .push(MsgKind::Info, Some(location), &format!("{squad} spawned"));
        self.squads.push(squad);
        Some(id)
    }

    /// Advance the simulation by one step.
    pub fn tick(&mut self) {
        self.ticks += 1;
        let every = self.config.spawn_frequency;
        if every > 0 && self.ticks % every == 0 && !self.config.factions.is_empty() {
            let i = self.rng.random_range(0..self.config.factions.len());
            let name = self.config.factions[i].name.clone();
            self.spawn(&name, None);
        }
        for i in 0..self.squads.len() {
            self.step(i);
        }
        self.detect_encounters();
    }

    fn step(&mut self, i: usize) {
        let squad = &mut self.squads[i];
        if squad.idle_ticks > 0 {
            squad.idle_ticks -= 1;
        } else if squad.destination.is_some() {
            self.advance(i);
        } else {
            self.pick_task(i);
        }
    }

    /// Either wait a while or head somewhere random, with even odds.
    fn pick_task(&mut self, i: usize) {
        if self.rng.random_range(0..2) == 0 {
            let ticks = self
                .rng
                .random_range(self.config.min_idle_ticks..=self.config.max_idle_ticks);
            let squad = &mut self.squads[i];
            squad.halt(ticks);
            let text = format!("{squad} is waiting for {ticks} ticks");
            self.log.push(MsgKind::Idle, Some(squad.location), &text);
            return;
        }
        let mut avoid = self.occupied_by_others(i);
        avoid.insert(self.squads[i].location);
        match self.random_cell(SpawnArea::full(self.planner.bounds()), &avoid) {
            Some(dest) => self.start_move(i, dest),
            None => self.squads[i].halt(self.config.min_idle_ticks),
        }
    }

    /// Plan a route for squad `i` to `dest` around every other squad.
    fn start_move(&mut self, i: usize, dest: Location) {
        let occupied = self.occupied_by_others(i);
        let from = self.squads[i].location;
        match self.planner.find_path(from, dest, Some(&occupied)) {
            Some(path) if !path.is_empty() => {
                let squad = &mut self.squads[i];
                squad.set_route(path);
                let text = format!("{squad} is moving to {dest}");
                self.log.push(MsgKind::Move, Some(from), &text);
            }
            _ => {
                let squad = &mut self.squads[i];
                squad.halt(self.config.min_idle_ticks);
                let text = format!("{squad} found no route to {dest}");
                self.log.push(MsgKind::Idle, Some(from), &text);
            }
        }
    }

    /// Walk squad `i` one cell along its route, re-planning first if the
    /// next cell has been taken.
    fn advance(&mut self, i: usize) {
        let occupied = self.occupied_by_others(i);
        let squad = &self.squads[i];
        let (Some(&next), Some(dest)) = (squad.route.front(), squad.destination) else {
            self.squads[i].destination = None;
            return;
        };
        if occupied.contains(&next) {
            let from = squad.location;
            match self.planner.find_path(from, dest, Some(&occupied)) {
                Some(path) if path.first().is_some_and(|c| !occupied.contains(c)) => {
                    log::trace!("squad {} re-routed at {from}", squad.id);
                    self.squads[i].set_route(path);
                }
                _ => {
                    let squad = &mut self.squads[i];
                    squad.halt(self.config.min_idle_ticks);
                    let text = format!("{squad} is blocked on the way to {dest}");
                    self.log.push(MsgKind::Idle, Some(from), &text);
                    return;
                }
            }
        }
        let squad = &mut self.squads[i];
        if let Some(next) = squad.route.pop_front() {
            squad.location = next;
        }
        if squad.route.is_empty() {
            squad.destination = None;
        }
    }

    /// Report hostile squads that have just come within one cell of each
    /// other, and hold both in place for the combat duration.
    fn detect_encounters(&mut self) {
        let mut contacts = HashSet::new();
        let mut fresh = Vec::new();
        for a in 0..self.squads.len() {
            for b in a + 1..self.squads.len() {
                let (sa, sb) = (&self.squads[a], &self.squads[b]);
                if sa.location != sb.location && !sa.location.is_adjacent(sb.location) {
                    continue;
                }
                if !self.are_hostile(&sa.faction, &sb.faction) {
                    continue;
                }
                let key = (sa.id.min(sb.id), sa.id.max(sb.id));
                if !self.contacts.contains(&key) {
                    fresh.push((a, b));
                }
                contacts.insert(key);
            }
        }
        for (a, b) in fresh {
            let ticks = self.config.combat_ticks;
            self.squads[a].halt(ticks);
            self.squads[b].halt(ticks);
            let text = format!("{} engaged {}", self.squads[a], self.squads[b]);
            self.log
                .push(MsgKind::Combat, Some(self.squads[a].location), &text);
        }
        self.contacts = contacts;
    }

    /// Whether either faction attacks the other.
    pub fn are_hostile(&self, a: &str, b: &str) -> bool {
        let hates = |x: &str, y: &str| self.config.faction(x).is_some_and(|f| f.is_hostile_to(y));
        hates(a, b) || hates(b, a)
    }

    fn occupied_by_others(&self, i: usize) -> HashSet<Location> {
        self.squads
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, s)| s.location)
            .collect()
    }

    /// A random cell of `area` that is neither an obstacle nor in `avoid`.
    fn random_cell(&mut self, area: SpawnArea, avoid: &HashSet<Location>) -> Option<Location> {
        if area.is_empty() {
            return None;
        }
        let free = |loc: Location| !self.map.is_obstacle(loc) && !avoid.contains(&loc);
        for _ in 0..PLACEMENT_ATTEMPTS {
            let loc = Location::new(
                self.rng.random_range(area.min.x..area.max.x),
                self.rng.random_range(area.min.y..area.max.y),
            );
            if free(loc) {
                return Some(loc);
            }
        }
        (area.min.x..area.max.x)
            .flat_map(|x| (area.min.y..area.max.y).map(move |y| Location::new(x, y)))
            .find(|&loc| free(loc))
    }

    /// Text picture of the map, three columns per cell: `#` obstacle, `T`
    /// trader, `F` field, `P` point of interest, squads as faction initial
    /// and actor count (`*` when several squads share a cell).
    pub fn draw(&self) -> String {
        let bounds = self.planner.bounds();
        let mut stacks: HashMap<Location, (char, u32, usize)> = HashMap::new();
        for squad in &self.squads {
            let entry = stacks.entry(squad.location).or_insert((squad.initial(), 0, 0));
            entry.1 += squad.actors;
            entry.2 += 1;
        }

        let mut out = String::with_capacity(bounds.len() * 3 + bounds.height as usize);
        for y in 0..bounds.height {
            let mut row = String::with_capacity(bounds.width as usize * 3);
            for x in 0..bounds.width {
                let loc = Location::new(x, y);
                let cell = match stacks.get(&loc) {
                    Some(&(_, actors, n)) if n > 1 => format!("*{actors}"),
                    Some(&(initial, actors, _)) => format!("{initial}{actors}"),
                    None if self.map.is_obstacle(loc) => "#".to_owned(),
                    None if self.map.traders.contains(&loc) => "T".to_owned(),
                    None if self.map.fields.contains(&loc) => "F".to_owned(),
                    None if self.map.pois.contains(&loc) => "P".to_owned(),
                    None => ".".to_owned(),
                };
                row.push_str(&format!("{cell:<3}"));
            }
            out.push_str(row.trim_end());
            out.push('\n');
        }
        out
    }

    pub fn squads(&self) -> &[Squad] {
        &self.squads
    }

    pub fn squad(&self, id: u32) -> Option<&Squad> {
        self.squads.iter().find(|s| s.id == id)
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut MessageLog {
        &mut self.log
    }

    pub fn map(&self) -> &AreaMap {
        &self.map
    }

    pub fn planner(&self) -> &PathPlanner {
        &self.planner
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
