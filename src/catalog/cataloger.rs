use std::path::Path;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::catalog::classifier::{AttributeClassifier, Validation};
use crate::database::repo::{AttrRecord, CatalogStore, TypedValue};
use crate::error::Result;
use crate::media::attribute::{Attribute, AttributeValue};
use crate::media::ImageAccessor;
use crate::utils::volume::VolumePathResolver;

/// Attributes with this name are always decoded as chromaticities, whatever
/// their scalar type.
const CHROMATICITIES: &str = "chromaticities";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub cataloged: usize,
    pub required_skipped: usize,
    pub unsupported_skipped: usize,
    pub mismatches: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Cataloged(FileStats),
    Skipped { reason: String },
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ScanSummary {
    /// Every sequence under the root, whatever its extension.
    pub sequences_found: usize,
    /// First frames handed to the cataloger.
    pub files_seen: usize,
    pub files_cataloged: usize,
    pub files_skipped: usize,
    pub attributes_cataloged: usize,
    pub required_skipped: usize,
    pub unsupported_skipped: usize,
    pub mismatches: usize,
    /// `path: reason` for every skipped file.
    pub skipped_files: Vec<String>,
}

impl ScanSummary {
    pub fn record(&mut self, path: &Path, outcome: &FileOutcome) {
        self.files_seen += 1;
        match outcome {
            FileOutcome::Cataloged(stats) => {
                self.files_cataloged += 1;
                self.attributes_cataloged += stats.cataloged;
                self.required_skipped += stats.required_skipped;
                self.unsupported_skipped += stats.unsupported_skipped;
                self.mismatches += stats.mismatches;
            }
            FileOutcome::Skipped { reason } => {
                self.files_skipped += 1;
                self.skipped_files
                    .push(format!("{}: {}", path.display(), reason));
            }
        }
    }
}

/// Reads attributes through an [`ImageAccessor`] and writes the catalogable
/// ones to the store. Records are batched with [`Cataloger::catalog_attribute`]
/// and committed together by [`Cataloger::flush`].
pub struct Cataloger<A> {
    store: CatalogStore,
    classifier: AttributeClassifier,
    accessor: A,
    resolver: VolumePathResolver,
    pending: Vec<AttrRecord>,
}

impl<A: ImageAccessor> Cataloger<A> {
    pub fn new(store: CatalogStore, accessor: A, resolver: VolumePathResolver) -> Self {
        Self {
            store,
            classifier: AttributeClassifier::new(),
            accessor,
            resolver,
            pending: Vec::new(),
        }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn ensure_schema(&self) -> Result<()> {
        Ok(self.store.ensure_schema()?)
    }

    /// Queues the catalog and value rows for one attribute. Returns `false`
    /// when its value has no table; nothing is queued then.
    pub fn catalog_attribute(&mut self, path: &Path, attribute: &Attribute) -> bool {
        let full_path = self.full_path(path);
        match self.record_for(&full_path, attribute) {
            Some(record) => {
                debug!(
                    "{} -> {}{}",
                    attribute,
                    record.value.table(),
                    if self.classifier.is_canonical(&attribute.name) {
                        " (canonical)"
                    } else {
                        ""
                    }
                );
                self.pending.push(record);
                true
            }
            None => {
                warn!("don't know how to insert attribute `{}'", attribute);
                false
            }
        }
    }

    /// Writes every queued record in one transaction. The queue is emptied
    /// either way, so a failed batch is never retried.
    pub fn flush(&mut self) -> Result<usize> {
        let records = std::mem::take(&mut self.pending);
        self.store.write(&records)?;
        Ok(records.len())
    }

    /// Catalogs every non-structural attribute of one file. Failures are
    /// logged and reported in the outcome; nothing here aborts a scan.
    pub fn catalog_attributes_for_file(&mut self, path: &Path) -> FileOutcome {
        info!("--> {}", path.display());

        let attributes = match self.accessor.read_attributes(path) {
            Ok(attributes) => attributes,
            Err(e) => {
                error!("{}", e);
                return FileOutcome::Skipped {
                    reason: e.to_string(),
                };
            }
        };

        let mut stats = FileStats::default();

        for attribute in &attributes {
            if self.classifier.is_required(&attribute.name) {
                stats.required_skipped += 1;
                continue;
            }

            match self.classifier.validate(attribute) {
                Ok(Validation::Mismatch(mismatch)) => {
                    warn!("{}", mismatch);
                    stats.mismatches += 1;
                }
                Ok(_) => {}
                Err(e) => error!("Could not validate `{}`: {}", attribute.name, e),
            }

            if self.catalog_attribute(path, attribute) {
                stats.cataloged += 1;
            } else {
                stats.unsupported_skipped += 1;
            }
        }

        if let Err(e) = self.flush() {
            error!("Failed to write catalog rows for {:?}: {}", path, e);
            return FileOutcome::Skipped {
                reason: e.to_string(),
            };
        }

        FileOutcome::Cataloged(stats)
    }

    fn full_path(&self, path: &Path) -> String {
        self.resolver.resolve(path).to_string_lossy().into_owned()
    }

    fn record_for(&self, full_path: &str, attribute: &Attribute) -> Option<AttrRecord> {
        let value = typed_value(attribute)?;
        let desc = attribute.value.type_desc();
        Some(AttrRecord {
            full_path: full_path.to_string(),
            name: attribute.name.clone(),
            canonical_name: self
                .classifier
                .canonical_name(&attribute.name)
                .map(str::to_string),
            type_name: desc.kind.as_str(),
            aggregate: desc.aggregate.as_str(),
            vec_semantics: desc.vec_semantics.as_str(),
            count: desc.count,
            value,
        })
    }
}

fn typed_value(attribute: &Attribute) -> Option<TypedValue> {
    if attribute.name == CHROMATICITIES {
        return match &attribute.value {
            AttributeValue::Chromaticity(values) => Some(TypedValue::Chromaticity((*values).into())),
            _ => None,
        };
    }

    match &attribute.value {
        AttributeValue::Integer(quantity) => Some(TypedValue::Int(*quantity)),
        AttributeValue::Rational {
            numerator,
            denominator,
        } => Some(TypedValue::Rational {
            numerator: *numerator,
            denominator: *denominator,
        }),
        AttributeValue::Float(quantity) => Some(TypedValue::Real(*quantity)),
        AttributeValue::String(text) => Some(TypedValue::Text(text.clone())),
        AttributeValue::Chromaticity(values) => Some(TypedValue::Chromaticity((*values).into())),
        AttributeValue::Unsupported { .. } => None,
    }
}
