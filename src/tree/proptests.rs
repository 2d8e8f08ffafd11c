use super::*;
use crate::text::TerminatorText;

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

const TERMINATORS: [char; 4] = ['$', '%', '#', '&'];

/// Every root-to-leaf path as (leaf start, concatenated label)
fn paths(tree: &SuffixTree) -> Vec<(usize, Vec<char>)> {
    let text = tree.chars();
    let mut out = Vec::new();
    let mut stack: Vec<(&Node, Vec<char>)> = vec![(tree.root().as_ref(), Vec::new())];
    while let Some((node, label)) = stack.pop() {
        if let Some(start) = node.leaf_start() {
            out.push((start, label));
            continue;
        }
        for (edge, child) in node.children() {
            let mut next = label.clone();
            next.extend_from_slice(edge.label(text));
            stack.push((child.as_ref(), next));
        }
    }
    out.sort();
    out
}

fn validate_tree(tree: &SuffixTree) {
    let text = tree.chars();
    let mut stack: Vec<(&Arc<Node>, bool)> = vec![(tree.root(), true)];
    while let Some((node, is_root)) = stack.pop() {
        if node.is_leaf() {
            assert!(node.children().is_empty(), "leaf with children");
            continue;
        }
        if !is_root {
            assert!(node.children().len() >= 2, "internal node with one child");
        }
        let mut firsts = HashSet::new();
        for (edge, child) in node.children() {
            assert!(edge.length() > 0, "empty edge label");
            assert!(
                firsts.insert(edge.first_char(text)),
                "sibling edges share a first character"
            );
            stack.push((child, false));
        }
    }
}

fn build(docs: &[String], config: &BuildConfig) -> BuiltSuffixTree {
    let texts: Vec<_> = docs
        .iter()
        .zip(TERMINATORS)
        .map(|(doc, t)| TerminatorText::new(doc, t).unwrap())
        .collect();
    build_tree_with(&texts, config).unwrap()
}

fn expected_suffixes(tree: &SuffixTree) -> Vec<(usize, Vec<char>)> {
    let text = tree.text();
    let mut out = Vec::new();
    for doc in 0..text.segment_count() as u32 {
        let start = text.segment_start(doc);
        let segment = text.segment(doc);
        for offset in 0..segment.len() {
            out.push((start + offset, segment[offset..].to_vec()));
        }
    }
    out.sort();
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_paths_are_exactly_the_suffixes(s in "[ab]{0,40}") {
        let built = build(&[s], &BuildConfig::default());
        validate_tree(&built.tree);
        prop_assert_eq!(paths(&built.tree), expected_suffixes(&built.tree));
    }

    #[test]
    fn prop_paths_over_wider_alphabet(s in "[a-e]{0,80}") {
        let built = build(&[s], &BuildConfig::default());
        validate_tree(&built.tree);
        prop_assert_eq!(paths(&built.tree), expected_suffixes(&built.tree));
    }

    #[test]
    fn prop_generalized_paths_stay_in_one_document(
        docs in prop::collection::vec("[abc]{0,20}", 1..=4)
    ) {
        let built = build(&docs, &BuildConfig::default());
        validate_tree(&built.tree);

        let text = built.tree.text();
        for (start, label) in paths(&built.tree) {
            let terminators = label.iter().filter(|c| text.is_terminator(**c)).count();
            prop_assert_eq!(terminators, 1);
            prop_assert!(text.is_terminator(*label.last().unwrap()));
            let end = start + label.len() - 1;
            prop_assert_eq!(text.segment_of(start), text.segment_of(end));
        }
        prop_assert_eq!(paths(&built.tree), expected_suffixes(&built.tree));
    }

    #[test]
    fn prop_build_is_deterministic(s in "[abc]{0,60}") {
        let first = build(&[s.clone()], &BuildConfig::default());
        let second = build(&[s], &BuildConfig::default());
        prop_assert_eq!(first.root(), second.root());
    }

    #[test]
    fn prop_root_rederivation_builds_same_tree(s in "[ab]{0,60}") {
        let linked = build(&[s.clone()], &BuildConfig::default());
        let naive = build(&[s], &BuildConfig { suffix_links: false, ..Default::default() });
        prop_assert_eq!(linked.root(), naive.root());
        prop_assert_eq!(linked.stats.rule_applications(), naive.stats.rule_applications());
    }

    #[test]
    fn prop_rule_applications_linear(s in "[ab]{0,200}") {
        let built = build(&[s], &BuildConfig::default());
        let n = built.tree.text().len() as u64;
        prop_assert_eq!(built.stats.phases, n);
        prop_assert_eq!(built.stats.leaves(), n);
        prop_assert!(built.stats.rule3_stops <= n);
        prop_assert!(built.stats.rule_applications() <= 3 * n);
    }
}
