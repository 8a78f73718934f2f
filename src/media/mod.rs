pub mod attribute;
pub mod exr_header;

#[cfg(test)]
pub mod fixtures;

use std::path::Path;

use crate::error::Result;
use crate::media::attribute::Attribute;

/// Reads the metadata attributes of a single image file.
///
/// Failing to open the file or to make sense of its header are per-file
/// conditions; callers log them and move on to the next file.
pub trait ImageAccessor {
    fn read_attributes(&self, path: &Path) -> Result<Vec<Attribute>>;
}
