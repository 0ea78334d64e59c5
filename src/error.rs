//! Error types for container parsing, message assembly and output.

use std::path::PathBuf;

use thiserror::Error;

/// The input buffer is not a YDL preset container.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// The first 7 bytes are not `DTAB01d`.
    #[error("not a YDL preset file (missing \"DTAB01d\" signature)")]
    BadMagic,
}

/// A patch index does not address a complete record in the container.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    #[error("patch index {index} is out of range (file holds {count} patches)")]
    OutOfRange { index: usize, count: usize },
}

/// A patch payload has the wrong size for the assembler.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueError {
    #[error("patch data must be exactly {expected} bytes, got {actual}")]
    BadPatchLength { actual: usize, expected: usize },
}

/// Any failure of a conversion run.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Value(#[from] ValueError),

    /// Cannot open or read the preset file
    #[error("cannot open preset file {}: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cannot create or write the output file
    #[error("cannot write output file {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cannot open or write to the MIDI device
    #[error("MIDI device error: {0}")]
    Device(String),
}
