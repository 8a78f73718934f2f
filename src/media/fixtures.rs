//! Builds OpenEXR headers byte by byte for tests.

use std::io;
use std::path::Path;

pub struct HeaderBuilder {
    bytes: Vec<u8>,
}

impl HeaderBuilder {
    pub fn new() -> Self {
        Self::with_version(2)
    }

    pub fn with_long_names() -> Self {
        Self::with_version(2 | 0x400)
    }

    fn with_version(version: u32) -> Self {
        let mut bytes = vec![0x76, 0x2f, 0x31, 0x01];
        bytes.extend_from_slice(&version.to_le_bytes());
        Self { bytes }
    }

    /// Header carrying every structural attribute a scanline file has.
    pub fn structural() -> Self {
        let window = [0u8; 16];
        let mut channels = Vec::new();
        for name in [b"B", b"G", b"R"] {
            channels.extend_from_slice(name);
            channels.push(0);
            channels.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0]);
        }
        channels.push(0);

        Self::new()
            .attribute("channels", "chlist", &channels)
            .compression(3)
            .attribute("dataWindow", "box2i", &window)
            .attribute("displayWindow", "box2i", &window)
            .attribute("lineOrder", "lineOrder", &[0])
            .attribute("screenWindowCenter", "v2f", &[0u8; 8])
            .float("screenWindowWidth", 1.0)
    }

    pub fn attribute(mut self, name: &str, type_name: &str, value: &[u8]) -> Self {
        self.bytes.extend_from_slice(name.as_bytes());
        self.bytes.push(0);
        self.bytes.extend_from_slice(type_name.as_bytes());
        self.bytes.push(0);
        self.bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
        self.bytes.extend_from_slice(value);
        self
    }

    pub fn int(self, name: &str, value: i32) -> Self {
        self.attribute(name, "int", &value.to_le_bytes())
    }

    pub fn float(self, name: &str, value: f32) -> Self {
        self.attribute(name, "float", &value.to_le_bytes())
    }

    pub fn string(self, name: &str, value: &str) -> Self {
        self.attribute(name, "string", value.as_bytes())
    }

    pub fn rational(self, name: &str, numerator: i32, denominator: u32) -> Self {
        let mut value = numerator.to_le_bytes().to_vec();
        value.extend_from_slice(&denominator.to_le_bytes());
        self.attribute(name, "rational", &value)
    }

    pub fn chromaticities(self, name: &str, values: [f32; 8]) -> Self {
        let value: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.attribute(name, "chromaticities", &value)
    }

    pub fn compression(self, code: u8) -> Self {
        self.attribute("compression", "compression", &[code])
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.bytes.push(0);
        self.bytes
    }

    pub fn write_to(self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.finish())
    }
}
