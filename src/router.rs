use std::cmp::Eq;
use std::collections::HashMap;
use std::hash::Hash;

use http::Method;

use crate::params::Params;
use crate::tree::{count_params, count_sections, Node, RouteLookup, SkippedNode};

/// The result of a successful router lookup: the registered value, the
/// pattern it was registered under and the captured parameters.
#[derive(Debug)]
pub struct RouteMatch<'r, V> {
  pub value: &'r V,
  pub full_path: &'r str,
  pub params: Params,
}

/// Router dispatches request paths to values via configurable routes. One
/// tree is kept per key; HTTP routers key by method.
///
/// Routes are registered during a single-threaded startup phase; afterwards
/// the trees are immutable and lookups may run concurrently.
pub struct Router<K: Eq + Hash, V> {
  trees: HashMap<K, Node<V>>,

  // registration-time bounds used to pre-size the lookup buffers
  max_params: usize,
  max_sections: usize,

  /// If enabled, the upper layer is expected to redirect when a lookup
  /// misses but reports a trailing-slash recommendation.
  pub redirect_trailing_slash: bool,

  /// If enabled, the upper layer is expected to try a case-insensitive
  /// lookup of the path when a lookup misses, and redirect to the
  /// corrected path.
  pub redirect_fixed_path: bool,

  /// If enabled, the upper layer checks `allowed` for other methods
  /// matching the current path and answers with MethodNotAllowed.
  pub handle_method_not_allowed: bool,
}

impl<K: Eq + Hash, V> Default for Router<K, V> {
  fn default() -> Self {
    Router {
      trees: HashMap::new(),
      max_params: 0,
      max_sections: 0,
      redirect_trailing_slash: true,
      redirect_fixed_path: true,
      handle_method_not_allowed: true,
    }
  }
}

impl<K: Eq + Hash, V> Router<K, V> {
  pub fn new() -> Router<K, V> {
    Router::default()
  }

  /// Registers a value for the given path and key. The path must begin
  /// with '/'; any pattern error or conflict with a previously registered
  /// route panics, aborting startup.
  pub fn handle(&mut self, path: &str, key: K, value: V) {
    if !path.starts_with('/') {
      panic!("path must begin with '/' in path '{}'", path);
    }

    self.max_params = self.max_params.max(count_params(path));
    self.max_sections = self.max_sections.max(count_sections(path));

    self
      .trees
      .entry(key)
      .or_insert_with(Node::default)
      .add_route(path, value);
  }

  /// Looks up the value registered for the given key and path, allocating
  /// parameter and backtrack buffers sized for the registered routes.
  /// `Err(tsr)` reports whether a redirect to the same path with or
  /// without a trailing slash would succeed.
  pub fn lookup(&self, key: &K, path: &str) -> Result<RouteMatch<'_, V>, bool> {
    let tree = match self.trees.get(key) {
      Some(tree) => tree,
      None => return Err(false),
    };

    let mut params = Params::with_capacity(self.max_params);
    let mut skipped = Vec::with_capacity(self.max_sections);
    self.lookup_in(tree, path, &mut params, &mut skipped, false)
  }

  /// Like `lookup`, but with caller-provided buffers that are reused
  /// across requests, and an `unescape` switch for percent-decoding the
  /// captured parameters.
  pub fn lookup_with<'r>(
    &'r self,
    key: &K,
    path: &str,
    params: &mut Params,
    skipped: &mut Vec<SkippedNode<'r, V>>,
    unescape: bool,
  ) -> Result<RouteMatch<'r, V>, bool> {
    let tree = match self.trees.get(key) {
      Some(tree) => tree,
      None => return Err(false),
    };
    self.lookup_in(tree, path, params, skipped, unescape)
  }

  fn lookup_in<'r>(
    &'r self,
    tree: &'r Node<V>,
    path: &str,
    params: &mut Params,
    skipped: &mut Vec<SkippedNode<'r, V>>,
    unescape: bool,
  ) -> Result<RouteMatch<'r, V>, bool> {
    let value = tree.get_value(path, params, skipped, unescape);

    match value {
      RouteLookup {
        handlers: Some(handlers),
        full_path: Some(full_path),
        params,
        ..
      } => Ok(RouteMatch {
        value: handlers,
        full_path,
        params: params
          .map(|found| Params::from(found.iter().cloned().collect::<Vec<_>>()))
          .unwrap_or_default(),
      }),
      RouteLookup { tsr, .. } => Err(tsr),
    }
  }

  /// Performs a case-insensitive lookup of the given path in the tree for
  /// `key`, returning the path with the registered casing.
  pub fn case_insensitive_lookup(&self, key: &K, path: &str, fix_trailing_slash: bool) -> Option<String> {
    self
      .trees
      .get(key)
      .and_then(|tree| tree.find_case_insensitive_path(path, fix_trailing_slash))
  }
}

impl<V> Router<Method, V> {
  /// Registers a value for GET requests.
  pub fn get(&mut self, path: &str, value: V) {
    self.handle(path, Method::GET, value);
  }

  /// Registers a value for HEAD requests.
  pub fn head(&mut self, path: &str, value: V) {
    self.handle(path, Method::HEAD, value);
  }

  /// Registers a value for OPTIONS requests.
  pub fn options(&mut self, path: &str, value: V) {
    self.handle(path, Method::OPTIONS, value);
  }

  /// Registers a value for POST requests.
  pub fn post(&mut self, path: &str, value: V) {
    self.handle(path, Method::POST, value);
  }

  /// Registers a value for PUT requests.
  pub fn put(&mut self, path: &str, value: V) {
    self.handle(path, Method::PUT, value);
  }

  /// Registers a value for PATCH requests.
  pub fn patch(&mut self, path: &str, value: V) {
    self.handle(path, Method::PATCH, value);
  }

  /// Registers a value for DELETE requests.
  pub fn delete(&mut self, path: &str, value: V) {
    self.handle(path, Method::DELETE, value);
  }

  /// Returns the methods with a route matching the given path, for the
  /// upper layer's `Allow` header and 405 responses. The path `*` reports
  /// every registered method. OPTIONS is appended whenever any method
  /// matches.
  pub fn allowed(&self, path: &str) -> Vec<String> {
    let mut allowed: Vec<String> = Vec::new();

    match path {
      "*" => {
        for method in self.trees.keys() {
          if *method != Method::OPTIONS {
            allowed.push(method.to_string());
          }
        }
      }
      _ => {
        for (method, tree) in &self.trees {
          if *method == Method::OPTIONS {
            continue;
          }

          let mut params = Params::with_capacity(self.max_params);
          let mut skipped = Vec::with_capacity(self.max_sections);
          let value = tree.get_value(path, &mut params, &mut skipped, false);
          if value.handlers.is_some() {
            allowed.push(method.to_string());
          }
        }
      }
    }

    if !allowed.is_empty() {
      allowed.push(Method::OPTIONS.to_string());
    }

    allowed
  }
}
