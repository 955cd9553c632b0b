//! Arena files: a layout plus run settings stored as TOML.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use pathrunner_core::{CellCoord, Layout};
use serde::{Deserialize, Serialize};

const SUPPORTED_ARENA_VERSION: u32 = 1;

/// Tick limit applied when neither the arena nor the command line sets one.
pub(crate) const DEFAULT_MAX_TICKS: u64 = 500;

/// Contents of an arena file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ArenaFile {
    /// Format version, currently always 1.
    pub(crate) version: u32,
    /// Initial arrangement of the session.
    pub(crate) layout: Layout,
    /// Settings for the `run` subcommand.
    #[serde(default)]
    pub(crate) run: RunSettings,
}

impl ArenaFile {
    /// Wraps a layout with default run settings.
    pub(crate) fn new(layout: Layout) -> Self {
        Self {
            version: SUPPORTED_ARENA_VERSION,
            layout,
            run: RunSettings::default(),
        }
    }
}

/// Settings controlling a session run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RunSettings {
    /// Number of ticks after which the run gives up.
    pub(crate) max_ticks: u64,
    /// Whether the grid is printed after every tick.
    pub(crate) render: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            max_ticks: DEFAULT_MAX_TICKS,
            render: false,
        }
    }
}

/// Reads and validates an arena file.
pub(crate) fn load(path: &Path) -> Result<ArenaFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read arena file at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid arena file {}", path.display()))
}

/// Parses arena TOML contents.
pub(crate) fn parse(contents: &str) -> Result<ArenaFile> {
    let arena: ArenaFile = toml::from_str(contents).context("failed to parse arena toml contents")?;
    if arena.version != SUPPORTED_ARENA_VERSION {
        bail!(
            "unsupported arena version {}; expected {}",
            arena.version,
            SUPPORTED_ARENA_VERSION
        );
    }
    if arena.run.max_ticks == 0 {
        bail!("run.max_ticks must be greater than zero");
    }
    Ok(arena)
}

/// Serialises an arena into TOML.
pub(crate) fn to_toml(arena: &ArenaFile) -> Result<String> {
    toml::to_string(arena).context("failed to serialise arena")
}

/// Writes an arena file, replacing any existing file.
pub(crate) fn save(path: &Path, arena: &ArenaFile) -> Result<()> {
    let contents = to_toml(arena)?;
    fs::write(path, contents)
        .with_context(|| format!("failed to write arena file at {}", path.display()))
}

const DEFAULT_BARRIERS: [(u32, u32); 53] = [
    (5, 6), (4, 6), (3, 6), (2, 6), (1, 6), (0, 6), (6, 6), (7, 6), (8, 6), (9, 6),
    (12, 6), (10, 6), (11, 6), (13, 6), (14, 6), (15, 6), (16, 6), (17, 6), (18, 6), (19, 6),
    (2, 0), (2, 1), (3, 1), (4, 1), (4, 2), (5, 4), (4, 3), (6, 4), (8, 4), (7, 4),
    (9, 4), (10, 4), (11, 4), (12, 4), (4, 4), (13, 4), (14, 4), (15, 4), (16, 4), (17, 4),
    (18, 4), (7, 0), (7, 1), (7, 2), (10, 3), (10, 2), (10, 1), (13, 0), (13, 1), (13, 2),
    (16, 3), (16, 2), (16, 1),
];

/// Built-in 20x15 maze. Row 6 is a solid wall, so the destination can only be
/// reached after collecting the power-up inside the upper maze.
pub(crate) fn default_layout() -> Layout {
    Layout {
        columns: 20,
        rows: 15,
        agent: CellCoord::new(0, 0),
        adversary: CellCoord::new(7, 7),
        destination: CellCoord::new(9, 9),
        power_up: CellCoord::new(3, 0),
        barriers: DEFAULT_BARRIERS
            .iter()
            .map(|&(column, row)| CellCoord::new(column, row))
            .collect(),
    }
}
