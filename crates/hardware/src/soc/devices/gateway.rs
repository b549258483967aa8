//! File-backed device gateway.
//!
//! Devices are named byte streams. Device `F1` is backed by the file
//! `<directory>/F1.<extension>`; read and write handles are opened lazily on
//! first use and kept until [`DeviceGateway::close_all`].

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::common::{Result, SimError};
use crate::config::DeviceConfig;

/// Open handles and the directory they resolve against.
#[derive(Debug)]
pub struct DeviceGateway {
    directory: PathBuf,
    extension: String,
    readers: HashMap<String, BufReader<File>>,
    writers: HashMap<String, File>,
}

impl DeviceGateway {
    /// Creates a gateway with no open handles.
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            extension: config.extension.clone(),
            readers: HashMap::new(),
            writers: HashMap::new(),
        }
    }

    /// Returns the backing path of a device.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{name}.{}", self.extension))
    }

    /// Returns the directory devices resolve against.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Reports whether a device is ready: its backing file exists and is
    /// both readable and writable. Never opens a handle.
    pub fn test(&self, name: &str) -> bool {
        let path = self.path_of(name);
        let ready = fs::metadata(&path)
            .is_ok_and(|meta| meta.is_file() && !meta.permissions().readonly())
            && File::open(&path).is_ok()
            && OpenOptions::new().append(true).open(&path).is_ok();
        debug!(device = name, ready, "test device");
        ready
    }

    /// Reads `count` bytes from a device.
    ///
    /// Bytes past the end of the stream read as zero, so an exhausted input
    /// device keeps producing `00`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Device`] if the backing file cannot be opened or read.
    pub fn read(&mut self, name: &str, count: usize) -> Result<Vec<u8>> {
        if !self.readers.contains_key(name) {
            let path = self.path_of(name);
            let file = File::open(&path).map_err(|source| device_error(name, source))?;
            info!(device = name, path = %path.display(), "opened input device");
            let _ = self.readers.insert(name.to_owned(), BufReader::new(file));
        }
        let Some(reader) = self.readers.get_mut(name) else {
            return Err(device_error(name, io::ErrorKind::NotFound.into()));
        };

        let mut buf = vec![0u8; count];
        let mut filled = 0;
        while filled < count {
            match reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    warn!(device = name, "read past end of stream; returning zero bytes");
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(device_error(name, e)),
            }
        }
        Ok(buf)
    }

    /// Appends bytes to a device, flushing immediately.
    ///
    /// The first write to a device truncates its backing file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Device`] if the backing file cannot be opened or written.
    pub fn write(&mut self, name: &str, data: &[u8]) -> Result<()> {
        if !self.writers.contains_key(name) {
            let path = self.path_of(name);
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&path)
                .map_err(|source| device_error(name, source))?;
            info!(device = name, path = %path.display(), "opened output device");
            let _ = self.writers.insert(name.to_owned(), file);
        }
        let Some(writer) = self.writers.get_mut(name) else {
            return Err(device_error(name, io::ErrorKind::NotFound.into()));
        };
        writer
            .write_all(data)
            .and_then(|()| writer.flush())
            .map_err(|source| device_error(name, source))
    }

    /// Returns `true` if any handle is open.
    pub fn has_open_handles(&self) -> bool {
        !self.readers.is_empty() || !self.writers.is_empty()
    }

    /// Flushes and releases every open handle. Safe to call repeatedly.
    pub fn close_all(&mut self) {
        for (name, mut writer) in self.writers.drain() {
            if let Err(e) = writer.flush() {
                warn!(device = %name, error = %e, "flush on close failed");
            }
        }
        self.readers.clear();
    }
}

fn device_error(name: &str, source: io::Error) -> SimError {
    SimError::Device {
        name: name.to_owned(),
        source,
    }
}
