//! Collapsible multi-select country tree

/// Separator written after every selected country
pub const COUNTRY_DELIMITER: char = ';';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryNodeKind {
    /// Region or sub-region that can be expanded
    Heading { expanded: bool },
    /// A selectable country
    Leaf { selected: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryNode {
    pub label: String,
    /// Nesting level, 0 for top level regions
    pub depth: usize,
    pub kind: CountryNodeKind,
}

/// Countries stored in pre-order so a heading is followed by its contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryTree {
    nodes: Vec<CountryNode>,
}

/// Declarative description of a tree used to build a [`CountryTree`]
pub enum CountryGroup {
    Region(&'static str, Vec<CountryGroup>),
    Country(&'static str),
}

impl CountryTree {
    /// Build a tree with every heading collapsed and nothing selected
    pub fn new(groups: &[CountryGroup]) -> Self {
        fn push(nodes: &mut Vec<CountryNode>, group: &CountryGroup, depth: usize) {
            match group {
                CountryGroup::Region(label, children) => {
                    nodes.push(CountryNode {
                        label: (*label).to_string(),
                        depth,
                        kind: CountryNodeKind::Heading { expanded: false },
                    });
                    for child in children {
                        push(nodes, child, depth + 1);
                    }
                }
                CountryGroup::Country(label) => nodes.push(CountryNode {
                    label: (*label).to_string(),
                    depth,
                    kind: CountryNodeKind::Leaf { selected: false },
                }),
            }
        }

        let mut nodes = Vec::new();
        for group in groups {
            push(&mut nodes, group, 0);
        }
        Self { nodes }
    }

    pub fn nodes(&self) -> &[CountryNode] {
        &self.nodes
    }

    /// Indices of nodes whose enclosing headings are all expanded
    pub fn visible_nodes(&self) -> Vec<usize> {
        let mut visible = Vec::new();
        // Depth below which everything is hidden by a collapsed heading
        let mut collapsed_at: Option<usize> = None;
        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(depth) = collapsed_at {
                if node.depth > depth {
                    continue;
                }
                collapsed_at = None;
            }
            visible.push(index);
            if let CountryNodeKind::Heading { expanded: false } = node.kind {
                collapsed_at = Some(node.depth);
            }
        }
        visible
    }

    /// Expand or collapse a heading, or select or deselect a country
    pub fn toggle(&mut self, index: usize) {
        let Some(node) = self.nodes.get_mut(index) else {
            return;
        };
        node.kind = match node.kind {
            CountryNodeKind::Heading { expanded } => CountryNodeKind::Heading {
                expanded: !expanded,
            },
            CountryNodeKind::Leaf { selected } => CountryNodeKind::Leaf {
                selected: !selected,
            },
        };
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|n| match n.kind {
            CountryNodeKind::Leaf { selected: true } => Some(n.label.as_str()),
            _ => None,
        })
    }

    /// Concatenate the selected countries in tree order, each followed by the delimiter
    pub fn serialize(&self) -> String {
        self.selected().fold(String::new(), |mut out, label| {
            out.push_str(label);
            out.push(COUNTRY_DELIMITER);
            out
        })
    }
}
