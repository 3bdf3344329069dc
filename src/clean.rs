use fnv::FnvHashSet;

use select::document::Document;
use select::node::Node;
use select::predicate::{Class, Name, Predicate};

/// Matches the known non content regions of a rendered wiki page: tables of
/// contents, reference lists, navigation boxes, preformatted blocks,
/// embedded map links and phone number widgets.
fn boilerplate_regions() -> impl Predicate {
    Name("pre")
        .or(Name("div").and(Class("toc")))
        .or(Name("div").and(Class("navbox")))
        .or(Name("ol").and(Class("references")))
        .or(Name("a").and(Class("mw-kartographer-maplink")))
        .or(Name("abbr").and(Class("phone")))
}

pub trait DocumentCleaner {
    /// Whether the node is the root of a boilerplate region.
    fn is_boilerplate(node: &Node) -> bool {
        node.is(boilerplate_regions())
    }

    /// Indices of every node inside a boilerplate region of `doc`.
    ///
    /// The removals are independent, non overlapping subtrees; a page
    /// without any of the target regions yields an empty set. Downstream
    /// extraction treats the returned indices as excised from the document.
    fn boilerplate_nodes(doc: &Document) -> FnvHashSet<usize> {
        fn mark(node: &Node, removed: &mut FnvHashSet<usize>) {
            removed.insert(node.index());
            for child in node.children() {
                mark(&child, removed);
            }
        }

        let mut removed = FnvHashSet::default();
        for node in doc.find(boilerplate_regions()) {
            mark(&node, &mut removed);
        }
        removed
    }
}

/// A standard implementation of a cleaner that strips the wiki template
/// regions listed in [`boilerplate_regions`].
pub struct DefaultDocumentCleaner;

impl DocumentCleaner for DefaultDocumentCleaner {}
