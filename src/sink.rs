//! Destinations for assembled patch messages.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use tempfile::NamedTempFile;

use crate::error::Error;
use crate::sysex::SysexMessage;

/// Something that accepts complete SysEx messages.
pub trait SysexSink {
    /// Human readable destination, for logs.
    fn describe(&self) -> String;

    fn send(&mut self, message: &SysexMessage) -> Result<(), Error>;
}

impl SysexSink for Vec<u8> {
    fn describe(&self) -> String {
        String::from("memory")
    }

    fn send(&mut self, message: &SysexMessage) -> Result<(), Error> {
        self.extend_from_slice(message.as_bytes());
        Ok(())
    }
}

/// Writes each message to a standard `.syx` file, replacing it.
///
/// The bytes go to a temporary file next to the destination first, so a
/// failed write never leaves a truncated dump behind.
#[derive(Debug, Clone)]
pub struct SyxFile {
    path: PathBuf,
}

impl SyxFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: std::io::Error) -> Error {
        Error::WriteOutput {
            path: self.path.clone(),
            source,
        }
    }
}

impl SysexSink for SyxFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn send(&mut self, message: &SysexMessage) -> Result<(), Error> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        tmp.write_all(message.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.write_error(e.error))?;

        info!("Wrote {} bytes to {}", message.as_bytes().len(), self.path.display());
        Ok(())
    }
}

#[cfg(feature = "midi")]
pub use self::midi::{output_ports, MidiPort};

#[cfg(feature = "midi")]
mod midi {
    use log::{debug, info};
    use midir::{MidiOutput, MidiOutputConnection, MidiOutputPort};

    use super::SysexSink;
    use crate::error::Error;
    use crate::sysex::SysexMessage;

    const CLIENT_NAME: &str = "thrpatch";
    const PORT_NAME: &str = "thrpatch-out";

    fn new_output() -> Result<MidiOutput, Error> {
        MidiOutput::new(CLIENT_NAME)
            .map_err(|e| Error::Device(format!("failed to create MIDI client: {}", e)))
    }

    /// Names of all MIDI output ports, in port order.
    pub fn output_ports() -> Result<Vec<String>, Error> {
        let output = new_output()?;
        Ok(output
            .ports()
            .iter()
            .map(|port| output.port_name(port).unwrap_or_default())
            .collect())
    }

    /// An open connection to a MIDI output port. Closed on drop.
    pub struct MidiPort {
        conn: Option<MidiOutputConnection>,
        name: String,
    }

    impl MidiPort {
        /// Connects to the port whose number is `selector`, or else the first
        /// port whose name contains `selector` (case-insensitive).
        pub fn open(selector: &str) -> Result<Self, Error> {
            let output = new_output()?;
            let ports = output.ports();

            let port = find_port(&output, &ports, selector)
                .ok_or_else(|| Error::Device(format!("no MIDI output port matches '{}'", selector)))?;
            let name = output.port_name(&port).unwrap_or_else(|_| selector.to_string());

            let conn = output
                .connect(&port, PORT_NAME)
                .map_err(|e| Error::Device(format!("failed to open {}: {}", name, e)))?;
            debug!("MIDI: connected to {}", name);

            Ok(Self {
                conn: Some(conn),
                name,
            })
        }
    }

    fn find_port(
        output: &MidiOutput,
        ports: &[MidiOutputPort],
        selector: &str,
    ) -> Option<MidiOutputPort> {
        if let Ok(index) = selector.parse::<usize>() {
            return ports.get(index).cloned();
        }

        let needle = selector.to_lowercase();
        ports
            .iter()
            .find(|port| {
                output
                    .port_name(port)
                    .map(|name| name.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .cloned()
    }

    impl SysexSink for MidiPort {
        fn describe(&self) -> String {
            self.name.clone()
        }

        fn send(&mut self, message: &SysexMessage) -> Result<(), Error> {
            let conn = self
                .conn
                .as_mut()
                .ok_or_else(|| Error::Device(format!("{} is closed", self.name)))?;
            conn.send(message.as_bytes())
                .map_err(|e| Error::Device(format!("failed to send to {}: {}", self.name, e)))?;

            info!("Sent {} bytes to {}", message.as_bytes().len(), self.name);
            Ok(())
        }
    }

    impl Drop for MidiPort {
        fn drop(&mut self) {
            if let Some(conn) = self.conn.take() {
                conn.close();
                debug!("MIDI: closed {}", self.name);
            }
        }
    }
}
