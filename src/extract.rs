use fnv::FnvHashSet;

use select::document::Document;
use select::node::Node;

use crate::clean::{DefaultDocumentCleaner, DocumentCleaner};
use crate::stopwords::StopWords;

pub const PUNCTUATION: &str = r###",."'!?&-/:;()#$%*+<=>@[\]^_`{|}~"###;

/// Context free class assigned to a paragraph candidate from its own
/// statistics alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfClass {
    Bad,
    Good,
    NearGood,
    Short,
}

/// Final class after the context sensitive revision pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphClass {
    Bad,
    Good,
}

/// One paragraph candidate produced by [`ContentExtractor::paragraphs`].
#[derive(Debug, Clone)]
pub struct Paragraph {
    /// Whitespace normalized text of the block.
    pub text: String,
    pub word_count: usize,
    /// Final content class.
    pub class: ParagraphClass,
    /// Context free class; kept because short blocks are excluded from the
    /// document even when the revision pass marks them good.
    pub cf_class: CfClass,
}

impl Paragraph {
    /// Whether the paragraph makes it into the output document.
    pub fn is_accepted(&self) -> bool {
        self.class == ParagraphClass::Good && self.cf_class != CfClass::Short
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Statistical boilerplate/content classifier over stripped HTML.
///
/// Classifies block level text segments by stopword density, link density
/// and length, then revises borderline segments from their neighbours.
/// Without a stopword vocabulary the two density thresholds are zeroed and
/// classification falls back to length and link density alone. Heading
/// promotion is disabled in both modes; wiki section headings are template
/// furniture here, not prose.
#[derive(Debug)]
pub struct ContentExtractor {
    stopwords: Option<StopWords>,
}

impl ContentExtractor {
    pub const LENGTH_LOW: usize = 70;
    pub const LENGTH_HIGH: usize = 200;
    pub const STOPWORDS_LOW: f64 = 0.30;
    pub const STOPWORDS_HIGH: f64 = 0.32;
    pub const MAX_LINK_DENSITY: f64 = 0.2;

    pub fn new(stopwords: Option<StopWords>) -> Self {
        Self { stopwords }
    }

    /// Ordered paragraph candidates for a page, boilerplate regions
    /// excised, each candidate carrying both of its classes.
    pub fn paragraphs(&self, html: &str) -> Vec<Paragraph> {
        let doc = Document::from(html);
        let removed = DefaultDocumentCleaner::boilerplate_nodes(&doc);

        let mut segmenter = Segmenter::new(&removed);
        for index in 0..doc.nodes.len() {
            if let Some(node) = Node::new(&doc, index) {
                if node.parent().is_none() {
                    segmenter.walk(&node);
                }
            }
        }
        let blocks = segmenter.finish();

        let cf_classes: Vec<_> = blocks
            .iter()
            .map(|block| self.context_free_class(&block.text, block.chars_in_links))
            .collect();
        let final_classes = Self::revise(&cf_classes);

        blocks
            .into_iter()
            .zip(cf_classes.into_iter().zip(final_classes))
            .map(|(block, (cf_class, class))| Paragraph {
                word_count: words(&block.text).count(),
                text: block.text,
                class,
                cf_class,
            })
            .collect()
    }

    fn thresholds(&self) -> (f64, f64) {
        if self.stopwords.is_some() {
            (Self::STOPWORDS_LOW, Self::STOPWORDS_HIGH)
        } else {
            (0.0, 0.0)
        }
    }

    fn stopword_density(&self, text: &str) -> f64 {
        let stopwords = match &self.stopwords {
            Some(s) => s,
            None => return 0.0,
        };
        let mut total = 0usize;
        let mut stops = 0usize;
        for word in words(text) {
            total += 1;
            if stopwords.is_stopword(word) {
                stops += 1;
            }
        }
        if total == 0 {
            0.0
        } else {
            stops as f64 / total as f64
        }
    }

    fn context_free_class(&self, text: &str, chars_in_links: usize) -> CfClass {
        let length = text.chars().count();
        let link_density = chars_in_links as f64 / length.max(1) as f64;

        if link_density > Self::MAX_LINK_DENSITY {
            return CfClass::Bad;
        }
        if text.contains('\u{a9}') || text.contains("&copy;") {
            return CfClass::Bad;
        }
        if length < Self::LENGTH_LOW {
            return if chars_in_links > 0 {
                CfClass::Bad
            } else {
                CfClass::Short
            };
        }

        let (low, high) = self.thresholds();
        let density = self.stopword_density(text);
        if density >= high {
            if length > Self::LENGTH_HIGH {
                CfClass::Good
            } else {
                CfClass::NearGood
            }
        } else if density >= low {
            CfClass::NearGood
        } else {
            CfClass::Bad
        }
    }

    /// Context sensitive revision: short blocks take the class of their
    /// surroundings, near good blocks survive unless sandwiched by bad ones.
    fn revise(cf_classes: &[CfClass]) -> Vec<ParagraphClass> {
        let mut classes = cf_classes.to_vec();

        let mut resolved_shorts = Vec::new();
        for i in 0..classes.len() {
            if classes[i] != CfClass::Short {
                continue;
            }
            let prev = Self::neighbour(&classes, i, true, true);
            let next = Self::neighbour(&classes, i, false, true);
            let class = match (prev, next) {
                (CfClass::Good, CfClass::Good) => CfClass::Good,
                (CfClass::Bad, CfClass::Bad) => CfClass::Bad,
                _ => {
                    // one good side; rescue the block when a near good run
                    // separates it from the bad side
                    let prev_neargood = prev == CfClass::Bad
                        && Self::neighbour(&classes, i, true, false) == CfClass::NearGood;
                    let next_neargood = next == CfClass::Bad
                        && Self::neighbour(&classes, i, false, false) == CfClass::NearGood;
                    if prev_neargood || next_neargood {
                        CfClass::Good
                    } else {
                        CfClass::Bad
                    }
                }
            };
            resolved_shorts.push((i, class));
        }
        for (i, class) in resolved_shorts {
            classes[i] = class;
        }

        for i in 0..classes.len() {
            if classes[i] != CfClass::NearGood {
                continue;
            }
            let prev = Self::neighbour(&classes, i, true, true);
            let next = Self::neighbour(&classes, i, false, true);
            classes[i] = if prev == CfClass::Bad && next == CfClass::Bad {
                CfClass::Bad
            } else {
                CfClass::Good
            };
        }

        classes
            .into_iter()
            .map(|class| match class {
                CfClass::Good => ParagraphClass::Good,
                _ => ParagraphClass::Bad,
            })
            .collect()
    }

    /// Nearest decided (good/bad) class in the given direction; the document
    /// boundary counts as bad.
    fn neighbour(classes: &[CfClass], from: usize, backwards: bool, ignore_neargood: bool) -> CfClass {
        let step: isize = if backwards { -1 } else { 1 };
        let boundary: isize = if backwards { -1 } else { classes.len() as isize };
        let mut i = from as isize;
        loop {
            i += step;
            if i == boundary {
                return CfClass::Bad;
            }
            match classes[i as usize] {
                class @ (CfClass::Good | CfClass::Bad) => return class,
                CfClass::NearGood if !ignore_neargood => return CfClass::NearGood,
                _ => {}
            }
        }
    }
}

/// Returns an iterator over all words of the text.
pub fn words(txt: &str) -> impl Iterator<Item = &str> {
    txt.split(|c: char| c.is_whitespace() || is_punctuation(c))
        .filter(|s| !s.is_empty())
}

/// Whether the char is a punctuation.
pub fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(c)
}

/// Tags whose subtrees never contribute prose.
const IGNORED_TAGS: [&str; 9] = [
    "script", "style", "head", "noscript", "iframe", "textarea", "select", "svg", "object",
];

/// Block level tags; entering or leaving one terminates the current
/// paragraph candidate.
const BLOCK_TAGS: [&str; 39] = [
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "caption",
    "center",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "legend",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "section",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
    "pre",
];

#[derive(Debug, Default)]
struct RawBlock {
    text: String,
    chars_in_links: usize,
}

/// Walks the DOM in document order, splitting text into block level
/// candidates and skipping excised boilerplate subtrees.
struct Segmenter<'a> {
    removed: &'a FnvHashSet<usize>,
    blocks: Vec<RawBlock>,
    current: RawBlock,
    link_depth: usize,
}

impl<'a> Segmenter<'a> {
    fn new(removed: &'a FnvHashSet<usize>) -> Self {
        Self {
            removed,
            blocks: Vec::new(),
            current: RawBlock::default(),
            link_depth: 0,
        }
    }

    fn walk(&mut self, node: &Node) {
        if self.removed.contains(&node.index()) {
            return;
        }
        if let Some(text) = node.as_text() {
            self.current.text.push_str(text);
            if self.link_depth > 0 {
                self.current.chars_in_links += text.chars().count();
            }
            return;
        }
        let name = match node.name() {
            Some(name) => name,
            // comments and other non-element data
            None => return,
        };
        if IGNORED_TAGS.contains(&name) {
            return;
        }
        if name == "br" {
            self.flush();
            return;
        }

        let is_block = BLOCK_TAGS.contains(&name);
        if is_block {
            self.flush();
        }
        if name == "a" {
            self.link_depth += 1;
        }
        for child in node.children() {
            self.walk(&child);
        }
        if name == "a" {
            self.link_depth -= 1;
        }
        if is_block {
            self.flush();
        }
    }

    fn flush(&mut self) {
        let block = std::mem::take(&mut self.current);
        let text = block.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            self.blocks.push(RawBlock {
                text,
                chars_in_links: block.chars_in_links,
            });
        }
    }

    fn finish(mut self) -> Vec<RawBlock> {
        self.flush();
        self.blocks
    }
}
