// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Picks the authoritative observation of a tag among clusters.

use crate::types::ImageStreamTag;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use std::collections::BTreeMap;

/// Return the cluster whose image for the tag was created last.
///
/// Ties go to the first cluster in name order. Images without a creation
/// timestamp lose against any image that has one.
pub fn find_newest(observations: &BTreeMap<String, ImageStreamTag>) -> Option<&str> {
    let mut newest: Option<(&str, Option<&Time>)> = None;

    for (cluster, tag) in observations {
        let created = tag.image.created();
        match newest {
            Some((_, current)) if !is_newer(created, current) => {}
            _ => newest = Some((cluster.as_str(), created)),
        }
    }

    newest.map(|(cluster, _)| cluster)
}

fn is_newer(candidate: Option<&Time>, current: Option<&Time>) -> bool {
    match (candidate, current) {
        (Some(candidate), Some(current)) => candidate.0 > current.0,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Whether both tags resolve to the same image, compared by digest only
pub fn same_image(a: &ImageStreamTag, b: &ImageStreamTag) -> bool {
    match (a.image.digest(), b.image.digest()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(digest: &str, created: Option<&str>) -> ImageStreamTag {
        let mut image = serde_json::json!({"metadata": {"name": digest}});
        if let Some(created) = created {
            image["metadata"]["creationTimestamp"] = serde_json::json!(created);
        }
        serde_json::from_value(serde_json::json!({ "image": image })).unwrap()
    }

    fn observations(entries: &[(&str, ImageStreamTag)]) -> BTreeMap<String, ImageStreamTag> {
        entries
            .iter()
            .map(|(cluster, tag)| (cluster.to_string(), tag.clone()))
            .collect()
    }

    const NOW: &str = "2026-03-01T12:00:00Z";
    const MINUTE_AGO: &str = "2026-03-01T11:59:00Z";
    const MINUTE_LATER: &str = "2026-03-01T12:01:00Z";

    #[test]
    fn test_find_newest_empty() {
        assert_eq!(find_newest(&BTreeMap::new()), None);
    }

    #[test]
    fn test_find_newest_single_cluster() {
        let obs = observations(&[("cluster1", tag("sha256:a", Some(NOW)))]);
        assert_eq!(find_newest(&obs), Some("cluster1"));
    }

    #[test]
    fn test_find_newest_two_clusters() {
        let obs = observations(&[
            ("cluster1", tag("sha256:a", Some(NOW))),
            ("cluster2", tag("sha256:b", Some(MINUTE_AGO))),
        ]);
        assert_eq!(find_newest(&obs), Some("cluster1"));
    }

    #[test]
    fn test_find_newest_three_clusters() {
        let obs = observations(&[
            ("cluster1", tag("sha256:a", Some(NOW))),
            ("cluster2", tag("sha256:b", Some(MINUTE_LATER))),
            ("cluster3", tag("sha256:c", Some(MINUTE_AGO))),
        ]);
        assert_eq!(find_newest(&obs), Some("cluster2"));
    }

    #[test]
    fn test_find_newest_tie_goes_to_first_cluster() {
        let obs = observations(&[
            ("cluster2", tag("sha256:b", Some(NOW))),
            ("cluster1", tag("sha256:a", Some(NOW))),
        ]);
        assert_eq!(find_newest(&obs), Some("cluster1"));
    }

    #[test]
    fn test_find_newest_missing_timestamp_loses() {
        let obs = observations(&[
            ("cluster1", tag("sha256:a", None)),
            ("cluster2", tag("sha256:b", Some(MINUTE_AGO))),
        ]);
        assert_eq!(find_newest(&obs), Some("cluster2"));
    }

    #[test]
    fn test_same_image_by_digest() {
        assert!(same_image(&tag("sha256:a", Some(NOW)), &tag("sha256:a", Some(MINUTE_AGO))));
        assert!(!same_image(&tag("sha256:a", Some(NOW)), &tag("sha256:b", Some(NOW))));
        assert!(!same_image(&ImageStreamTag::default(), &ImageStreamTag::default()));
    }
}
