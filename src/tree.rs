use std::cmp::min;
use std::mem;
use std::str;

use crate::escape::{EscapedPath, EscapedRef};
use crate::params::{Param, Params};
use crate::unescape::try_unescape;

// Returns the number of path parameters a pattern can capture. Counts raw
// wildcard bytes, so it may overcount escaped colons; it is only a capacity
// hint.
pub(crate) fn count_params(path: &str) -> usize {
  path.bytes().filter(|&c| c == b':' || c == b'*').count()
}

// Returns the number of '/'-separated sections in a pattern, an upper bound
// for the number of backtrack points a lookup can accumulate.
pub(crate) fn count_sections(path: &str) -> usize {
  path.bytes().filter(|&c| c == b'/').count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeType {
  Static,
  Root,
  Param,
  CatchAll,
}

/// The result of a tree lookup.
///
/// On a hit, `handlers` is the value registered for the matched pattern,
/// `full_path` is the pattern itself and `params` are the captures in
/// pattern order. On a miss, `tsr` reports whether the same path with a
/// trailing slash added or removed would have matched.
#[derive(Debug)]
pub struct RouteLookup<'t, 'p, T> {
  pub handlers: Option<&'t T>,
  pub params: Option<&'p Params>,
  pub full_path: Option<&'t str>,
  pub tsr: bool,
}

/// A backtrack point recorded when the matcher takes a static child even
/// though the node also has a parametric one. `path_index` is the offset of
/// the node's fragment in the request path; every remaining path the walk
/// sees is a suffix of the request, so an offset is all that has to be
/// remembered.
#[derive(Debug)]
pub struct SkippedNode<'t, T> {
  node: &'t Node<T>,
  path_index: usize,
  params_count: usize,
}

// A node in the radix tree, ordered by priority. The priority is the number
// of handler-bearing patterns reachable through the subtree.
#[derive(Debug)]
pub struct Node<T> {
  path: Vec<u8>,
  indices: Vec<u8>,
  wild_child: bool,
  node_type: NodeType,
  priority: u32,
  // child nodes, with at most one wildcard child at the end of the list
  children: Vec<Box<Node<T>>>,
  handlers: Option<T>,
  full_path: String,
}

impl<T> Default for Node<T> {
  fn default() -> Self {
    Node {
      path: Vec::new(),
      indices: Vec::new(),
      wild_child: false,
      node_type: NodeType::Static,
      priority: 0,
      children: Vec::new(),
      handlers: None,
      full_path: String::new(),
    }
  }
}

impl<T> Node<T> {
  pub fn new() -> Node<T> {
    Node::default()
  }

  // Increments the priority of the given child and reorders if necessary.
  fn increment_child_prio(&mut self, pos: usize) -> usize {
    self.children[pos].priority += 1;
    let prio = self.children[pos].priority;

    // adjust position (move to front)
    let mut new_pos = pos;
    while new_pos > 0 && self.children[new_pos - 1].priority < prio {
      self.children.swap(new_pos - 1, new_pos);
      new_pos -= 1;
    }

    // build new index char string
    if new_pos != pos {
      self.indices = [
        &self.indices[..new_pos],    // unchanged prefix, might be empty
        &self.indices[pos..pos + 1], // the index char we move
        &self.indices[new_pos..pos], // rest without char at 'pos'
        &self.indices[pos + 1..],
      ]
      .concat();
    }

    new_pos
  }

  // Adds a child node, keeping the wildcard child at the end of the list.
  fn add_child(&mut self, child: Box<Node<T>>) {
    if self.wild_child && !self.children.is_empty() {
      let last = self.children.len() - 1;
      self.children.insert(last, child);
    } else {
      self.children.push(child);
    }
  }

  /// add_route adds a node with the given handlers to the path.
  /// Not safe for concurrent use; registration is a startup-phase API and
  /// any conflict with a previously registered pattern panics.
  pub fn add_route(&mut self, path: &str, handlers: T) {
    let full_path = path;
    self.priority += 1;

    let route = EscapedPath::parse(path);

    // empty tree
    if self.path.is_empty() && self.children.is_empty() {
      self.insert_child(route.as_ref(), full_path, handlers);
      self.node_type = NodeType::Root;
      return;
    }

    self.walk_route(route.as_ref(), full_path, handlers);
  }

  fn walk_route(&mut self, mut path: EscapedRef<'_>, full_path: &str, handlers: T) {
    // Find the longest common prefix, stopping short of any byte that
    // starts a wildcard in the new pattern. The stored key contains no
    // unescaped ':' or '*', but it may hold a literal colon that must not
    // swallow a parameter of the same spelling.
    let mut i = 0;
    let max = min(path.len(), self.path.len());
    while i < max && path[i] == self.path[i] {
      // a stored colon is a literal unless this is the parameter node
      // itself, so it must not swallow the start of a new wildcard
      if self.node_type != NodeType::Param
        && ((path[i] == b':' && !path.is_literal(i)) || path[i] == b'*')
      {
        break;
      }
      i += 1;
    }

    // split edge
    if i < self.path.len() {
      let child = Node {
        path: self.path[i..].to_vec(),
        wild_child: self.wild_child,
        node_type: NodeType::Static,
        indices: mem::take(&mut self.indices),
        priority: self.priority - 1,
        children: mem::take(&mut self.children),
        handlers: self.handlers.take(),
        full_path: mem::take(&mut self.full_path),
      };

      self.indices = vec![self.path[i]];
      self.children = vec![Box::new(child)];
      self.path.truncate(i);
      self.wild_child = false;
    }

    // make the new node a child of this node
    if path.len() > i {
      path = path.slice_off(i);

      // '/' after param
      if self.node_type == NodeType::Param && path[0] == b'/' && self.children.len() == 1 {
        self.children[0].priority += 1;
        return self.children[0].walk_route(path, full_path, handlers);
      }

      let idxc = path[0];
      let wild = (idxc == b':' && !path.is_literal(0)) || idxc == b'*';

      if !wild {
        // check if a child with the next path byte exists
        for i in 0..self.indices.len() {
          if idxc == self.indices[i] {
            let i = self.increment_child_prio(i);
            return self.children[i].walk_route(path, full_path, handlers);
          }
        }
      }

      if !wild && self.node_type != NodeType::CatchAll {
        // otherwise insert a new static child
        self.indices.push(idxc);
        self.add_child(Box::new(Node::default()));
        let i = self.increment_child_prio(self.indices.len() - 1);
        return self.children[i].insert_child(path, full_path, handlers);
      } else if self.wild_child {
        // inserting a wildcard node: check if it conflicts with the
        // existing wildcard child, which is always at the end of the list
        let last = self.children.len() - 1;
        let child = &mut self.children[last];
        child.priority += 1;

        // check if the wildcard matches
        if path.len() >= child.path.len()
          && child.path[..] == path[..child.path.len()]
          // adding a child to a catch-all is not possible
          && child.node_type != NodeType::CatchAll
          // check for a longer wildcard, e.g. :name and :names
          && (child.path.len() >= path.len() || path[child.path.len()] == b'/')
        {
          return child.walk_route(path, full_path, handlers);
        }

        // wildcard conflict
        let path_str = str::from_utf8(&path[..]).unwrap();
        let path_seg = if child.node_type == NodeType::CatchAll {
          path_str
        } else {
          path_str.splitn(2, '/').next().unwrap()
        };
        let wild_seg = str::from_utf8(&child.path).unwrap();
        let prefix = format!(
          "{}{}",
          &full_path[..full_path.find(path_seg).unwrap_or(0)],
          wild_seg
        );

        panic!(
          "'{}' in new path '{}' conflicts with existing wildcard '{}' in existing prefix '{}'",
          path_seg, full_path, wild_seg, prefix
        );
      }

      return self.insert_child(path, full_path, handlers);
    }

    // otherwise attach the handlers to the current node
    if self.handlers.is_some() {
      panic!("handlers are already registered for path '{}'", full_path);
    }
    self.handlers = Some(handlers);
    self.full_path = full_path.to_string();
  }

  fn insert_child(&mut self, mut path: EscapedRef<'_>, full_path: &str, handlers: T) {
    let mut n = self;

    loop {
      // find prefix until the first wildcard
      let (start, end, valid) = match find_wildcard(&path) {
        Some(wildcard) => wildcard,
        None => break,
      };

      // the wildcard name must not contain ':' or '*'
      if !valid {
        panic!(
          "only one wildcard per path segment is allowed, has: '{}' in path '{}'",
          str::from_utf8(&path[start..]).unwrap(),
          full_path
        );
      }

      // check if the wildcard has a name
      if end - start < 2 {
        panic!(
          "wildcards must be named with a non-empty name in path '{}'",
          full_path
        );
      }

      if path[start] == b':' {
        // param
        if start > 0 {
          // insert the prefix before the current wildcard
          n.path = path[..start].to_vec();
          path = path.slice_off(start);
        }

        let wildcard_len = end - start;
        n.add_child(Box::new(Node {
          node_type: NodeType::Param,
          path: path[..wildcard_len].to_vec(),
          ..Node::default()
        }));
        n.wild_child = true;
        n = n.children.last_mut().unwrap();
        n.priority += 1;

        // if the path doesn't end with the wildcard, then there will be
        // another subpath starting with '/'
        if wildcard_len < path.len() {
          path = path.slice_off(wildcard_len);

          n.add_child(Box::new(Node {
            priority: 1,
            ..Node::default()
          }));
          n = n.children.last_mut().unwrap();
          continue;
        }

        // otherwise we're done; insert the handlers in the new leaf
        n.handlers = Some(handlers);
        n.full_path = full_path.to_string();
        return;
      }

      // catch-all
      if end != path.len() {
        panic!(
          "catch-all routes are only allowed at the end of the path in path '{}'",
          full_path
        );
      }

      if !n.path.is_empty() && n.path[n.path.len() - 1] == b'/' {
        let path_seg = n
          .children
          .first()
          .map(|child| {
            str::from_utf8(&child.path)
              .unwrap()
              .splitn(2, '/')
              .next()
              .unwrap()
          })
          .unwrap_or("");
        panic!(
          "catch-all wildcard '{}' in new path '{}' conflicts with existing path segment '{}' in existing prefix '{}{}'",
          str::from_utf8(&path[..]).unwrap(),
          full_path,
          path_seg,
          str::from_utf8(&n.path).unwrap(),
          path_seg
        );
      }

      // currently fixed width 1 for '/'
      if start == 0 || path[start - 1] != b'/' {
        panic!("no / before catch-all in path '{}'", full_path);
      }
      let i = start - 1;

      n.path = path[..i].to_vec();

      // first node: catch-all node with empty path
      n.add_child(Box::new(Node {
        wild_child: true,
        node_type: NodeType::CatchAll,
        ..Node::default()
      }));
      n.indices = vec![b'/'];
      n = n.children.last_mut().unwrap();
      n.priority += 1;

      // second node: node holding the variable
      n.children = vec![Box::new(Node {
        path: path[i..].to_vec(),
        node_type: NodeType::CatchAll,
        handlers: Some(handlers),
        priority: 1,
        full_path: full_path.to_string(),
        ..Node::default()
      })];

      return;
    }

    // if no wildcard was found, simply insert the path and handlers
    n.path = path.to_vec();
    n.handlers = Some(handlers);
    n.full_path = full_path.to_string();
  }

  /// get_value returns the handlers registered with the given path. The
  /// values of wildcards are appended to the caller-provided params buffer,
  /// which is cleared first and can be reused across lookups, as can the
  /// skipped-nodes scratch. If no handlers can be found, a TSR (trailing
  /// slash redirect) recommendation is made if a handler exists with an
  /// extra (without the) trailing slash for the given path.
  pub fn get_value<'t, 'p>(
    &'t self,
    path: &str,
    params: &'p mut Params,
    skipped_nodes: &mut Vec<SkippedNode<'t, T>>,
    unescape: bool,
  ) -> RouteLookup<'t, 'p, T> {
    let full = path.as_bytes();
    let mut current = self;
    let mut pos = 0;
    let mut params_set = false;
    let mut backtracking = false;

    params.clear();
    skipped_nodes.clear();

    // outer loop for walking the tree
    'walk: loop {
      let prefix: &[u8] = &current.path;
      let path = &full[pos..];

      if path.len() > prefix.len() && &path[..prefix.len()] == prefix {
        pos += prefix.len();
        let path = &full[pos..];
        let idxc = path[0];

        // try all the non-wildcard children first by matching the indices.
        // when restarting from a backtrack point the static children have
        // already been ruled out, so dispatch goes straight to the wildcard.
        if !backtracking {
          for i in 0..current.indices.len() {
            if current.indices[i] == idxc {
              if current.wild_child {
                // the parametric child could have been taken instead;
                // remember it in case the static branch dead-ends
                skipped_nodes.push(SkippedNode {
                  node: current,
                  path_index: pos - prefix.len(),
                  params_count: params.len(),
                });
              }

              current = &current.children[i];
              continue 'walk;
            }
          }
        }
        backtracking = false;

        if !current.wild_child {
          // the walk dead-ends here; roll back to the most recent skipped
          // parametric branch that still covers the current position
          if path != [b'/'] {
            while let Some(skipped) = skipped_nodes.pop() {
              if pos >= skipped.path_index {
                pos = skipped.path_index;
                current = skipped.node;
                params.truncate(skipped.params_count);
                backtracking = true;
                continue 'walk;
              }
            }
          }

          // nothing found; we can recommend to redirect to the same URL
          // without a trailing slash if a leaf exists for that path
          let tsr = path == [b'/'] && current.handlers.is_some();
          return RouteLookup {
            handlers: None,
            params: if params_set { Some(&*params) } else { None },
            full_path: None,
            tsr,
          };
        }

        // handle the wildcard child, which is always at the end of the list
        let child = &current.children[current.children.len() - 1];
        match child.node_type {
          NodeType::Param => {
            // find param end (either '/' or path end)
            let mut end = 0;
            while end < path.len() && path[end] != b'/' {
              end += 1;
            }

            // save param value
            let raw = str::from_utf8(&path[..end]).unwrap();
            let value = if unescape {
              match try_unescape(raw) {
                Some(unescaped) => unescaped.into_owned(),
                None => raw.to_string(),
              }
            } else {
              raw.to_string()
            };
            params.push(Param {
              key: String::from_utf8(child.path[1..].to_vec()).unwrap(),
              value,
            });
            params_set = true;

            // we need to go deeper!
            if end < path.len() {
              if !child.children.is_empty() {
                pos += end;
                current = &child.children[0];
                continue 'walk;
              }

              // ... but we can't
              let tsr = path.len() == end + 1;
              return RouteLookup {
                handlers: None,
                params: Some(&*params),
                full_path: None,
                tsr,
              };
            }

            if child.handlers.is_some() {
              return RouteLookup {
                handlers: child.handlers.as_ref(),
                params: Some(&*params),
                full_path: Some(child.full_path.as_str()),
                tsr: false,
              };
            }

            if child.children.len() == 1 {
              // no handlers found; check if handlers for this path plus a
              // trailing slash exist for TSR recommendation
              let grandchild = &child.children[0];
              let tsr = (grandchild.path == [b'/'] && grandchild.handlers.is_some())
                || (grandchild.path.is_empty() && grandchild.indices == [b'/']);
              return RouteLookup {
                handlers: None,
                params: Some(&*params),
                full_path: None,
                tsr,
              };
            }

            return RouteLookup {
              handlers: None,
              params: Some(&*params),
              full_path: None,
              tsr: false,
            };
          }

          NodeType::CatchAll => {
            // save the remainder, including the leading '/'
            let raw = str::from_utf8(path).unwrap();
            let value = if unescape {
              match try_unescape(raw) {
                Some(unescaped) => unescaped.into_owned(),
                None => raw.to_string(),
              }
            } else {
              raw.to_string()
            };
            params.push(Param {
              key: String::from_utf8(child.path[2..].to_vec()).unwrap(),
              value,
            });

            return RouteLookup {
              handlers: child.handlers.as_ref(),
              params: Some(&*params),
              full_path: Some(child.full_path.as_str()),
              tsr: false,
            };
          }

          _ => panic!("invalid node type"),
        }
      } else if path == prefix {
        // the walk ended on this node; if it carries no handlers, roll back
        // to the most recent skipped parametric branch
        if current.handlers.is_none() && path != [b'/'] {
          let mut restored = false;
          while let Some(skipped) = skipped_nodes.pop() {
            if pos >= skipped.path_index {
              pos = skipped.path_index;
              current = skipped.node;
              params.truncate(skipped.params_count);
              backtracking = true;
              restored = true;
              break;
            }
          }
          if restored {
            continue 'walk;
          }
        }

        // we should have reached the node containing the handlers;
        // check if this node has handlers registered
        if current.handlers.is_some() {
          return RouteLookup {
            handlers: current.handlers.as_ref(),
            params: if params_set { Some(&*params) } else { None },
            full_path: Some(current.full_path.as_str()),
            tsr: false,
          };
        }

        // if there are no handlers for this route, but this route has a
        // wildcard child, there must be handlers for this path with an
        // additional trailing slash
        if path == [b'/'] && current.wild_child && current.node_type != NodeType::Root {
          return RouteLookup {
            handlers: None,
            params: if params_set { Some(&*params) } else { None },
            full_path: None,
            tsr: true,
          };
        }

        if path == [b'/'] && current.node_type == NodeType::Static {
          return RouteLookup {
            handlers: None,
            params: if params_set { Some(&*params) } else { None },
            full_path: None,
            tsr: true,
          };
        }

        // no handlers found; check if handlers for this path plus a
        // trailing slash exist for trailing slash recommendation
        for i in 0..current.indices.len() {
          if current.indices[i] == b'/' {
            let child = &current.children[i];
            let tsr = (child.path.len() == 1 && child.handlers.is_some())
              || (child.node_type == NodeType::CatchAll && child.children[0].handlers.is_some());
            return RouteLookup {
              handlers: None,
              params: if params_set { Some(&*params) } else { None },
              full_path: None,
              tsr,
            };
          }
        }

        return RouteLookup {
          handlers: None,
          params: if params_set { Some(&*params) } else { None },
          full_path: None,
          tsr: false,
        };
      }

      // nothing matches; we can recommend to redirect to the same URL with
      // an extra trailing slash if a leaf exists for that path
      let tsr = path == [b'/']
        || (prefix.len() == path.len() + 1
          && prefix[path.len()] == b'/'
          && path == &prefix[..prefix.len() - 1]
          && current.handlers.is_some());

      if !tsr && path != [b'/'] {
        while let Some(skipped) = skipped_nodes.pop() {
          if pos >= skipped.path_index {
            pos = skipped.path_index;
            current = skipped.node;
            params.truncate(skipped.params_count);
            backtracking = true;
            continue 'walk;
          }
        }
      }

      return RouteLookup {
        handlers: None,
        params: if params_set { Some(&*params) } else { None },
        full_path: None,
        tsr,
      };
    }
  }

  /// Makes a case-insensitive lookup of the given path and tries to find
  /// the pattern registered for it. It can optionally also fix trailing
  /// slashes. Returns the case-corrected path on success.
  pub fn find_case_insensitive_path(&self, path: &str, fix_trailing_slash: bool) -> Option<String> {
    let mut ci_path = Vec::with_capacity(path.len() + 1);

    if self.find_case_insensitive_path_rec(path.as_bytes(), &mut ci_path, [0; 4], fix_trailing_slash)
    {
      Some(String::from_utf8(ci_path).unwrap())
    } else {
      None
    }
  }

  // recursive case-insensitive lookup function used by
  // find_case_insensitive_path
  fn find_case_insensitive_path_rec(
    &self,
    path: &[u8],
    ci_path: &mut Vec<u8>,
    mut rb: [u8; 4],
    fix_trailing_slash: bool,
  ) -> bool {
    let mut n = self;
    let mut path = path;
    let mut np_len = n.path.len();

    // outer loop for walking the tree
    'walk: while path.len() >= np_len
      && (np_len == 0 || equal_fold(&path[1..np_len], &n.path[1..]))
    {
      // add the common prefix to the result with the tree's casing
      let old_path = path;
      path = &path[np_len..];
      ci_path.extend_from_slice(&n.path);

      if path.is_empty() {
        // we should have reached the node containing the handlers;
        // check if this node has handlers registered
        if n.handlers.is_some() {
          return true;
        }

        // no handlers found; try to fix the path by adding a trailing slash
        if fix_trailing_slash {
          for i in 0..n.indices.len() {
            if n.indices[i] == b'/' {
              let child = &n.children[i];
              if (child.path.len() == 1 && child.handlers.is_some())
                || (child.node_type == NodeType::CatchAll
                  && child.children[0].handlers.is_some())
              {
                ci_path.push(b'/');
                return true;
              }
              return false;
            }
          }
        }
        return false;
      }

      // if this node does not have a wildcard (param or catch-all) child,
      // we can just look up the next child node and continue to walk down
      // the tree
      if !n.wild_child {
        // skip rune bytes already processed
        rb = shift_n_rune_bytes(rb, np_len);

        if rb[0] != 0 {
          // old rune not finished
          let idxc = rb[0];
          for i in 0..n.indices.len() {
            if n.indices[i] == idxc {
              // continue with child node
              n = &n.children[i];
              np_len = n.path.len();
              continue 'walk;
            }
          }
        } else {
          // process a new rune
          let mut rv = '\0';

          // find rune start; runes are up to 4 byte long, -4 would
          // definitely be another rune
          let mut off = 0;
          let max = min(np_len, 3);
          while off < max {
            let i = np_len - off;
            if rune_start(old_path[i]) {
              // read rune from cached path
              rv = decode_rune(&old_path[i..]).0;
              break;
            }
            off += 1;
          }

          // calculate the lowercase bytes of the current rune
          let lo = to_lower(rv);
          rb = encode_rune(lo);

          // skip already processed bytes
          rb = shift_n_rune_bytes(rb, off);

          let idxc = rb[0];
          for i in 0..n.indices.len() {
            // lowercase matches
            if n.indices[i] == idxc {
              // must use a recursive approach since both the uppercase
              // byte and the lowercase byte might exist as an index
              let prev_len = ci_path.len();
              if n.children[i]
                .find_case_insensitive_path_rec(path, ci_path, rb, fix_trailing_slash)
              {
                return true;
              }
              ci_path.truncate(prev_len);
              break;
            }
          }

          // if we found no match, the same for the uppercase rune,
          // if it differs
          let up = to_upper(rv);
          if up != lo {
            rb = encode_rune(up);
            rb = shift_n_rune_bytes(rb, off);

            let idxc = rb[0];
            for i in 0..n.indices.len() {
              // uppercase matches
              if n.indices[i] == idxc {
                // continue with child node
                n = &n.children[i];
                np_len = n.path.len();
                continue 'walk;
              }
            }
          }
        }

        // nothing found; we can recommend to redirect to the same URL
        // without a trailing slash if a leaf exists for that path
        return fix_trailing_slash && path == [b'/'] && n.handlers.is_some();
      }

      // the wildcard child is kept at the end of the list; request bytes
      // pass through it verbatim
      n = &n.children[n.children.len() - 1];
      match n.node_type {
        NodeType::Param => {
          // find param end (either '/' or path end)
          let mut end = 0;
          while end < path.len() && path[end] != b'/' {
            end += 1;
          }

          // add the param value to the case insensitive path
          ci_path.extend_from_slice(&path[..end]);

          // we need to go deeper!
          if end < path.len() {
            if !n.children.is_empty() {
              // continue with child node
              path = &path[end..];
              n = &n.children[0];
              np_len = n.path.len();
              continue 'walk;
            }

            // ... but we can't
            if fix_trailing_slash && path.len() == end + 1 {
              return true;
            }
            return false;
          }

          if n.handlers.is_some() {
            return true;
          }

          if fix_trailing_slash && n.children.len() == 1 {
            // no handlers found; check if handlers for this path plus a
            // trailing slash exist
            let child = &n.children[0];
            if child.path == [b'/'] && child.handlers.is_some() {
              ci_path.push(b'/');
              return true;
            }
          }

          return false;
        }

        NodeType::CatchAll => {
          ci_path.extend_from_slice(path);
          return true;
        }

        _ => panic!("invalid node type"),
      }
    }

    // nothing found; try to fix the path by adding / removing a trailing
    // slash
    if fix_trailing_slash {
      if path == [b'/'] {
        return true;
      }
      if path.len() + 1 == np_len
        && n.path[path.len()] == b'/'
        && equal_fold(&path[1..], &n.path[1..path.len()])
        && n.handlers.is_some()
      {
        ci_path.extend_from_slice(&n.path);
        return true;
      }
    }

    false
  }
}

// Searches for the first unescaped wildcard in the pattern and checks its
// name for invalid characters. Returns (start, end, valid).
fn find_wildcard(path: &EscapedRef<'_>) -> Option<(usize, usize, bool)> {
  // find start
  for start in 0..path.len() {
    let c = path[start];
    if (c != b':' || path.is_literal(start)) && c != b'*' {
      continue;
    }

    // find end and check for invalid characters; a literal colon is part
    // of the name, not a second wildcard
    let mut valid = true;
    for end in start + 1..path.len() {
      match path[end] {
        b'/' => return Some((start, end, valid)),
        b':' if !path.is_literal(end) => valid = false,
        b'*' => valid = false,
        _ => {}
      }
    }
    return Some((start, path.len(), valid));
  }

  None
}

// Shift bytes in the rune buffer by n bytes left.
fn shift_n_rune_bytes(bytes: [u8; 4], n: usize) -> [u8; 4] {
  match n {
    0 => bytes,
    1 => [bytes[1], bytes[2], bytes[3], 0],
    2 => [bytes[2], bytes[3], 0, 0],
    3 => [bytes[3], 0, 0, 0],
    _ => [0; 4],
  }
}

// Reports whether the byte could be the first byte of an encoded,
// possibly invalid rune. Second and subsequent bytes always have the top
// two bits set to 10.
fn rune_start(b: u8) -> bool {
  b & 0xC0 != 0x80
}

// Decodes the first rune in the slice. Invalid UTF-8 yields the
// replacement character with a width of one byte, so byte-identical
// invalid sequences still compare equal.
fn decode_rune(bytes: &[u8]) -> (char, usize) {
  let width = match bytes[0] {
    0x00..=0x7F => 1,
    0xC0..=0xDF => 2,
    0xE0..=0xEF => 3,
    0xF0..=0xF7 => 4,
    _ => 1,
  };

  if bytes.len() < width {
    return (char::REPLACEMENT_CHARACTER, 1);
  }

  match str::from_utf8(&bytes[..width]) {
    Ok(s) => (s.chars().next().unwrap(), width),
    Err(_) => (char::REPLACEMENT_CHARACTER, 1),
  }
}

fn encode_rune(c: char) -> [u8; 4] {
  let mut buf = [0; 4];
  c.encode_utf8(&mut buf);
  buf
}

// The simple (one to one) lowercase mapping; runes without one are kept.
fn to_lower(c: char) -> char {
  let mut lower = c.to_lowercase();
  match (lower.next(), lower.next()) {
    (Some(l), None) => l,
    _ => c,
  }
}

// The simple (one to one) uppercase mapping; runes without one are kept.
fn to_upper(c: char) -> char {
  let mut upper = c.to_uppercase();
  match (upper.next(), upper.next()) {
    (Some(u), None) => u,
    _ => c,
  }
}

// Compares two byte strings for equality under the simple case folding,
// rune by rune.
fn equal_fold(mut a: &[u8], mut b: &[u8]) -> bool {
  while !a.is_empty() && !b.is_empty() {
    let (ar, an) = decode_rune(a);
    let (br, bn) = decode_rune(b);
    if to_lower(ar) != to_lower(br) {
      return false;
    }
    a = &a[an..];
    b = &b[bn..];
  }
  a.is_empty() && b.is_empty()
}
