use std::collections::HashMap;

use super::bundle::vendor_of;

/// Vendors that prefix more than one registered bundle, each listed once in order of
/// first appearance.
pub fn shared_vendors<S: AsRef<str>>(bundles: &[S]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for bundle in bundles {
        let vendor = vendor_of(bundle.as_ref());
        let count = counts.entry(vendor).or_insert(0);
        if *count == 0 {
            order.push(vendor);
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter(|vendor| counts[vendor] > 1)
        .map(str::to_string)
        .collect()
}
