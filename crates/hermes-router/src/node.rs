//! Radix tree node implementation.
//!
//! Each node is one path segment. Nodes at a route boundary carry a
//! [`MethodRouter`] with the values registered for that path.

use crate::method_router::MethodRouter;
use crate::params::Params;

/// Type of path segment in the radix tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal segment (e.g., "users")
    Static,
    /// Named parameter (e.g., "{id}")
    Param(String),
    /// Catch-all tail (e.g., "*path")
    Wildcard(String),
}

/// A node in the radix tree.
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// The path segment this node represents
    pub segment: String,

    /// The kind of segment
    pub kind: SegmentKind,

    /// Pattern of the first route registered at this node
    pub pattern: Option<String>,

    /// Values for this node, when it ends a route
    pub methods: Option<MethodRouter<T>>,

    /// Static children, sorted by segment for binary search
    pub static_children: Vec<Node<T>>,

    /// Parameter child (at most one per node)
    pub param_child: Option<Box<Node<T>>>,

    /// Wildcard child (at most one per node, always a leaf)
    pub wildcard_child: Option<Box<Node<T>>>,
}

/// Outcome of [`Node::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    /// The value was stored.
    Added,
    /// The method was already registered at this path.
    Duplicate,
    /// A wildcard segment was followed by more segments.
    WildcardNotLast,
}

impl<T> Node<T> {
    fn with_kind(segment: String, kind: SegmentKind) -> Self {
        Self {
            segment,
            kind,
            pattern: None,
            methods: None,
            static_children: Vec::new(),
            param_child: None,
            wildcard_child: None,
        }
    }

    /// Creates a root node for the tree.
    #[must_use]
    pub fn root() -> Self {
        Self::with_kind(String::new(), SegmentKind::Static)
    }

    /// Inserts a value for `method` at `path`.
    pub fn insert(&mut self, path: &str, method: http::Method, value: T) -> Inserted {
        let segments = parse_path(path);
        if let Some(position) = segments
            .iter()
            .position(|(_, kind)| matches!(kind, SegmentKind::Wildcard(_)))
        {
            if position + 1 != segments.len() {
                return Inserted::WildcardNotLast;
            }
        }
        self.insert_segments(&segments, path, method, value)
    }

    fn insert_segments(
        &mut self,
        segments: &[(String, SegmentKind)],
        path: &str,
        method: http::Method,
        value: T,
    ) -> Inserted {
        let Some(((segment, kind), remaining)) = segments.split_first() else {
            if self.pattern.is_none() {
                self.pattern = Some(path.to_string());
            }
            let methods = self.methods.get_or_insert_with(MethodRouter::new);
            return if methods.insert(method, value) {
                Inserted::Added
            } else {
                Inserted::Duplicate
            };
        };

        let child = match kind {
            SegmentKind::Static => {
                match self
                    .static_children
                    .binary_search_by(|c| c.segment.as_str().cmp(segment))
                {
                    Ok(index) => &mut self.static_children[index],
                    Err(index) => {
                        self.static_children.insert(
                            index,
                            Self::with_kind(segment.clone(), SegmentKind::Static),
                        );
                        &mut self.static_children[index]
                    }
                }
            }
            SegmentKind::Param(_) => self
                .param_child
                .get_or_insert_with(|| Box::new(Self::with_kind(segment.clone(), kind.clone())))
                .as_mut(),
            SegmentKind::Wildcard(_) => self
                .wildcard_child
                .get_or_insert_with(|| Box::new(Self::with_kind(segment.clone(), kind.clone())))
                .as_mut(),
        };
        child.insert_segments(remaining, path, method, value)
    }

    /// Matches a path against the tree.
    ///
    /// Returns the node ending the route and the extracted parameters.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&Self, Params)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Params::new();
        let node = self.match_segments(&segments, &mut params)?;
        Some((node, params))
    }

    fn match_segments<'a>(&'a self, segments: &[&str], params: &mut Params) -> Option<&'a Self> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.methods.as_ref().map(|_| self);
        };

        if let Some(child) = self.find_static_child(segment) {
            if let Some(found) = child.match_segments(remaining, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.len();
                params.push(name.clone(), (*segment).to_string());
                if let Some(found) = child.match_segments(remaining, params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        if let Some(child) = &self.wildcard_child {
            if let SegmentKind::Wildcard(name) = &child.kind {
                if child.methods.is_some() {
                    params.push(name.clone(), segments.join("/"));
                    return Some(child);
                }
            }
        }

        None
    }

    fn find_static_child(&self, segment: &str) -> Option<&Self> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.static_children[i])
    }
}

fn parse_path(path: &str) -> Vec<(String, SegmentKind)> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            if let Some(name) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                (s.to_string(), SegmentKind::Param(name.to_string()))
            } else if let Some(name) = s.strip_prefix('*') {
                (s.to_string(), SegmentKind::Wildcard(name.to_string()))
            } else {
                (s.to_string(), SegmentKind::Static)
            }
        })
        .collect()
}
