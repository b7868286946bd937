//! Test helper functions for building actors, scripts and runs.

use glam::IVec2;

use crate::actor::{ActorId, Combatants};
use crate::command::Command;
use crate::config::SimulationConfig;
use crate::display::{MemorySink, NullSink};
use crate::log::CommandLog;
use crate::simulation::{RunReport, Simulation};

/// Player at 3 HP and Enemy at 1 HP, both at the origin.
pub fn reference_actors() -> Combatants {
    Combatants::new(3, 1)
}

/// The scripted five-command sequence:
/// Move(Enemy, 0, 1), Attack(Player -> Enemy, 1), Move(Player, 1, 0),
/// Attack(Enemy -> Player, 1), Move(Player, 0, -1).
pub fn reference_script() -> Vec<Command> {
    vec![
        Command::movement(ActorId::Enemy, IVec2::new(0, 1)),
        attack(ActorId::Player, 1),
        Command::movement(ActorId::Player, IVec2::new(1, 0)),
        attack(ActorId::Enemy, 1),
        Command::movement(ActorId::Player, IVec2::new(0, -1)),
    ]
}

/// Attack by `source` on its opponent.
pub fn attack(source: ActorId, amount: i32) -> Command {
    Command::attack(source, source.opponent(), amount).unwrap()
}

/// Appends `commands` to a fresh log.
pub fn log_of(commands: impl IntoIterator<Item = Command>) -> CommandLog {
    let mut log = CommandLog::new();
    for command in commands {
        log.append(command);
    }
    log
}

/// Runs an unpaced seeded simulation to completion.
pub fn run_seeded(seed: u64) -> (RunReport, Vec<String>) {
    run_seeded_with(SimulationConfig::unpaced(), seed)
}

/// Runs a seeded simulation with `config` to completion.
pub fn run_seeded_with(config: SimulationConfig, seed: u64) -> (RunReport, Vec<String>) {
    let mut sim = Simulation::seeded(config, seed).unwrap();
    let mut sink = MemorySink::new();
    let report = sim.run(&mut sink).unwrap();
    (report, sink.into_lines())
}

/// Runs a seeded simulation and returns only the report.
pub fn report_for(seed: u64) -> RunReport {
    let mut sim = Simulation::seeded(SimulationConfig::unpaced(), seed).unwrap();
    sim.run(&mut NullSink).unwrap()
}
