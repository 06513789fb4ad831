//! Output regions: the single target both flows overwrite.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// A region that can be replaced with plain text or with markup.
///
/// Every write is a full replace; the last writer wins.
pub trait OutputRegion: Send {
    fn set_text(&mut self, text: &str);
    fn set_markup(&mut self, markup: &str);
}

/// Handle shared between concurrently running flows.
pub type SharedRegion = Arc<Mutex<dyn OutputRegion>>;

/// What a region currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionContent {
    #[default]
    Empty,
    Text(String),
    Markup(String),
}

/// In-memory region that keeps only its latest content.
#[derive(Debug, Default)]
pub struct MemoryRegion {
    content: RegionContent,
    writes: usize,
}

impl MemoryRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Region pre-filled with content, as if an earlier write had happened.
    pub fn with_content(content: RegionContent) -> Self {
        Self { content, writes: 0 }
    }

    pub fn content(&self) -> &RegionContent {
        &self.content
    }

    /// Number of writes since creation.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn shared(self) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(self))
    }
}

impl OutputRegion for MemoryRegion {
    fn set_text(&mut self, text: &str) {
        self.content = RegionContent::Text(text.to_string());
        self.writes += 1;
    }

    fn set_markup(&mut self, markup: &str) {
        self.content = RegionContent::Markup(markup.to_string());
        self.writes += 1;
    }
}

/// Region that prints each replacement to a writer, e.g. stdout.
#[derive(Debug)]
pub struct ConsoleRegion<W> {
    writer: W,
}

impl<W: Write + Send> ConsoleRegion<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn replace(&mut self, body: &str) {
        let result = writeln!(self.writer, "{}", body).and_then(|()| self.writer.flush());
        if let Err(e) = result {
            tracing::warn!("Failed to write output region: {}", e);
        }
    }
}

impl<W: Write + Send> OutputRegion for ConsoleRegion<W> {
    fn set_text(&mut self, text: &str) {
        self.replace(text);
    }

    fn set_markup(&mut self, markup: &str) {
        self.replace(markup.trim_end());
    }
}
