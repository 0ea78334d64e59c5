//! Yamaha THR10/THR5 patch conversion.
//!
//! Reads the multi-patch `.YDL` preset files written by the THR Editor and
//! turns single patches into the SysEx dumps the amplifier accepts, either
//! for a MIDI port or for a `.syx` file.
//!
//! ```no_run
//! use thrpatch::{sysex, ydl};
//!
//! let presets = ydl::read_file("presets.ydl")?;
//! let message = sysex::build(&presets.extract(0)?);
//! assert_eq!(message.as_bytes().len(), sysex::SYSEX_SIZE);
//! # Ok::<(), thrpatch::Error>(())
//! ```

pub mod error;
pub mod progmem;
pub mod sink;
pub mod sysex;
pub mod ydl;

pub use error::{Error, FormatError, IndexError, ValueError};
pub use sink::{SyxFile, SysexSink};
pub use sysex::SysexMessage;
pub use ydl::{Container, Entry, PatchRecord};

/// Extracts patch `index` and wraps it into a SysEx message.
pub fn patch_message(container: &Container, index: usize) -> Result<SysexMessage, IndexError> {
    let record = container.extract(index)?;
    Ok(sysex::build(&record))
}
