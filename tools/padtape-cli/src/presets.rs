//! Built-in watch lists for known games

use clap::ValueEnum;

use padtape_core::memory::{Watch, WatchError, parse_watches};

/// Games with known RAM addresses (NTSC-U releases)
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Crash Bandicoot: Warped
    Crash3,
    /// Crash Bandicoot 2: Cortex Strikes Back
    Crash2,
}

const CRASH3: &str = "\
lives, 0x80068F58, 1
wumpa, 0x80068F5C, 2
crystals, 0x80068F60, 4
";

const CRASH2: &str = "\
lives, 0x800673A0, 1
wumpa, 0x800673A4, 2
";

impl Preset {
    /// Watch file text for this game
    pub fn source(self) -> &'static str {
        match self {
            Preset::Crash3 => CRASH3,
            Preset::Crash2 => CRASH2,
        }
    }

    pub fn watches(self) -> Result<Vec<Watch>, WatchError> {
        parse_watches(self.source())
    }
}
