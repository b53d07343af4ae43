use std::fs::File;
use std::io::{
    self,
    BufWriter,
    Write,
};
use std::path::Path;
use timstrace::TraceSummary;

use crate::cli::SerializationFormat;

/// Streams trace summaries to a writer, as one json array or as one json
/// document per line.
pub struct TraceWriter<W: Write> {
    writer: W,
    format: SerializationFormat,
    written: usize,
}

impl TraceWriter<BufWriter<File>> {
    pub fn create(path: &Path, format: SerializationFormat) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?), format))
    }
}

impl<W: Write> TraceWriter<W> {
    pub fn new(writer: W, format: SerializationFormat) -> Self {
        Self {
            writer,
            format,
            written: 0,
        }
    }

    pub fn write(&mut self, trace: &TraceSummary) -> io::Result<()> {
        let separator: &[u8] = match (self.format, self.written) {
            (SerializationFormat::Ndjson, 0) => b"",
            (SerializationFormat::Ndjson, _) => b"\n",
            (_, 0) => b"[",
            (_, _) => b",",
        };
        self.writer.write_all(separator)?;
        match self.format {
            SerializationFormat::PrettyJson => serde_json::to_writer_pretty(&mut self.writer, trace),
            SerializationFormat::Json | SerializationFormat::Ndjson => {
                serde_json::to_writer(&mut self.writer, trace)
            }
        }
        .map_err(io::Error::other)?;
        self.written += 1;
        Ok(())
    }

    /// Terminates the document and flushes. Returns the number of traces written.
    pub fn finish(mut self) -> io::Result<usize> {
        let tail: &[u8] = match (self.format, self.written) {
            (SerializationFormat::Ndjson, 0) => b"",
            (SerializationFormat::Ndjson, _) => b"\n",
            (_, 0) => b"[]",
            (_, _) => b"]",
        };
        self.writer.write_all(tail)?;
        self.writer.flush()?;
        Ok(self.written)
    }
}
