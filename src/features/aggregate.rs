//! Merge a file's fragments into one feature set

use super::{Extractor, FeatureFragment, FeatureSet};
use std::path::Path;
use tracing::warn;

/// Merge fragments in the order given (category order, then registration
/// order). On a key collision the later fragment wins; a collision means two
/// extractors share a feature name, which is a registry defect.
pub fn aggregate<'a, I>(path: &Path, fragments: I) -> FeatureSet
where
    I: IntoIterator<Item = (&'a dyn Extractor, FeatureFragment)>,
{
    let mut set = FeatureSet::new();
    for (extractor, fragment) in fragments {
        for (key, value) in fragment {
            if set.insert(key.clone(), value).is_some() {
                warn!(
                    "Duplicate feature `{}` from extractor {} in {}",
                    key,
                    extractor.name(),
                    path.display()
                );
                debug_assert!(false, "duplicate feature key `{}`", key);
            }
        }
    }
    set
}
