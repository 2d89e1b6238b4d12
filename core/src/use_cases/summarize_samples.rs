use crate::domain::dtos::tree::Tree;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How often one rooted topology appears among the samples.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopologyFrequency {
    pub signature: String,
    pub count: usize,
    pub frequency: f64,
}

/// Posterior frequency of every sampled topology, most frequent first.
///
/// Ties are ordered by signature so the summary is stable.
pub fn summarize_samples<'a, I>(trees: I) -> Vec<TopologyFrequency>
where
    I: IntoIterator<Item = &'a Tree>,
{
    let mut counts = HashMap::<String, usize>::new();
    let mut total = 0;

    for tree in trees {
        *counts.entry(tree.topology_signature()).or_default() += 1;
        total += 1;
    }

    let mut frequencies = counts
        .into_iter()
        .map(|(signature, count)| TopologyFrequency {
            signature,
            count,
            frequency: count as f64 / total as f64,
        })
        .collect::<Vec<_>>();

    frequencies.sort_by(|a, b| {
        b.count.cmp(&a.count).then_with(|| a.signature.cmp(&b.signature))
    });

    frequencies
}
