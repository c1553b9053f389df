use std::{fs, io};
use std::path::{Path, PathBuf};
use std::fmt::Debug;

use crate::error::{Result, Chainable};
use crate::value::Value;

/// Something values can be written to. Files accept text only.
pub trait Sink: Debug {
    fn write<V: Into<Value> + 'static>(&self, value: V) -> Result<()> {
        self.write_value(value.into())
    }

    fn write_value(&self, value: Value) -> Result<()>;
}

impl Sink for fs::File {
    fn write_value(&self, value: Value) -> Result<()> {
        let text = match value {
            Value::String(text) => text,
            other => return err!("file sink only accepts text", "found" => other.kind()),
        };

        let mut file = io::BufWriter::new(self);
        io::Write::write_all(&mut file, text.as_bytes())?;
        io::Write::flush(&mut file)?;
        Ok(())
    }
}

impl Sink for &Path {
    fn write_value(&self, value: Value) -> Result<()> {
        fs::File::create(self)
            .chain(error! {
                "failed to open/create file for writing",
                "file path" => self.display()
            })?
            .write(value)
    }
}

impl Sink for PathBuf {
    fn write_value(&self, value: Value) -> Result<()> {
        <&Path as Sink>::write(&self.as_path(), value)
    }
}

impl<T: Sink> Sink for &T {
    fn write_value(&self, value: Value) -> Result<()> {
        <T as Sink>::write(self, value)
    }
}
