use sicsim_core::common::hex;

/// Longest text record payload, in bytes.
const TEXT_CHUNK: usize = 30;

/// Builds object-program text one record at a time.
#[derive(Default)]
pub struct ObjectBuilder {
    lines: Vec<String>,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: &str, start: u32, length: u32) -> Self {
        self.lines.push(format!("H{name:<6}{start:06X}{length:06X}"));
        self
    }

    pub fn define(mut self, symbols: &[(&str, u32)]) -> Self {
        let body: String = symbols
            .iter()
            .map(|(name, addr)| format!("{name:<6}{addr:06X}"))
            .collect();
        self.lines.push(format!("D{body}"));
        self
    }

    pub fn refer(mut self, names: &[&str]) -> Self {
        let body: String = names.iter().map(|name| format!("{name:<6}")).collect();
        self.lines.push(format!("R{body}"));
        self
    }

    /// Emits as many text records as needed for `bytes`.
    pub fn text(mut self, start: u32, bytes: &[u8]) -> Self {
        for (i, chunk) in bytes.chunks(TEXT_CHUNK).enumerate() {
            let addr = start + (i * TEXT_CHUNK) as u32;
            self.lines.push(format!(
                "T{addr:06X}{:02X}{}",
                chunk.len(),
                hex::encode(chunk)
            ));
        }
        self
    }

    pub fn modify(mut self, addr: u32, half_bytes: u32, sign: char, symbol: &str) -> Self {
        self.lines
            .push(format!("M{addr:06X}{half_bytes:02X}{sign}{symbol}"));
        self
    }

    /// Modification record relocating by the enclosing section's start.
    pub fn modify_local(mut self, addr: u32, half_bytes: u32) -> Self {
        self.lines.push(format!("M{addr:06X}{half_bytes:02X}"));
        self
    }

    pub fn end(mut self, first: Option<u32>) -> Self {
        self.lines.push(match first {
            Some(addr) => format!("E{addr:06X}"),
            None => "E".to_owned(),
        });
        self
    }

    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_owned());
        self
    }

    pub fn build(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Single-section program `TEST` holding `code` at `start`, entered at `start`.
pub fn program(start: u32, code: &[u8]) -> String {
    ObjectBuilder::new()
        .header("TEST", start, code.len() as u32)
        .text(start, code)
        .end(Some(start))
        .build()
}
