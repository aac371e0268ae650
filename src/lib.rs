#![deny(rust_2018_idioms)]

//! A lightweight high performance HTTP request path matcher.
//!
//! Patterns with support for dynamic and catch-all segments are organised
//! into a compressing dynamic trie (radix tree) for efficient matching,
//! with one tree kept per HTTP method.
//!
//! ```rust
//! use routetree::{Node, Params};
//!
//! let mut tree = Node::new();
//! tree.add_route("/", "Welcome!");
//! tree.add_route("/user/:name", "A User");
//!
//! let mut params = Params::new();
//! let mut skipped = Vec::new();
//! let matched = tree.get_value("/user/gordon", &mut params, &mut skipped, false);
//! assert_eq!(matched.handlers, Some(&"A User"));
//! assert_eq!(matched.full_path, Some("/user/:name"));
//! assert_eq!(matched.params.unwrap().by_name("name"), Some("gordon"));
//! ```
//!
//! The registered path, against which incoming requests are matched, can
//! contain two types of parameters:
//! ```text
//!  Syntax    Type
//!  :name     named parameter
//!  *name     catch-all parameter
//! ```
//!
//! Named parameters are dynamic path segments. They match anything until
//! the next '/' or the path end:
//! ```text
//!  Path: /blog/:category/:post
//!
//!  /blog/rust/request-routers            match: category="rust", post="request-routers"
//!  /blog/rust/request-routers/           no match, but a trailing-slash redirect is recommended
//!  /blog/rust/                           no match
//! ```
//!
//! Unlike in a plain prefix tree, a static segment and a parameter may be
//! registered for the same position, e.g. `/user/new` next to
//! `/user/:name`. The matcher tries static segments first and backtracks
//! into the parameter when the static branch dead-ends, so the precedence
//! at every position is static, then parameter, then catch-all.
//!
//! Catch-all parameters match anything until the path end, including the
//! directory index (the '/' before the catch-all). Since they match
//! anything until the end, catch-all parameters must always be the final
//! path element.
//! ```text
//!  Path: /files/*filepath
//!
//!  /files/                             match: filepath="/"
//!  /files/LICENSE                      match: filepath="/LICENSE"
//!  /files/templates/article.html       match: filepath="/templates/article.html"
//!  /files                              no match, but a trailing-slash redirect is recommended
//! ```
//!
//! A literal colon can be registered by escaping it with a backslash:
//! the pattern `/rate\:limit` matches the request path `/rate:limit`.
//!
//! The value of parameters is saved as an ordered list of key/value pairs,
//! in the order the wildcards appear in the pattern. There are two ways to
//! retrieve the value of a parameter:
//! ```text
//!  1) by the name of the parameter
//!     let user = params.by_name("user") // defined by :user or *user
//!
//!  2) by the index of the parameter
//!     let third_key   = &params[2].key;   // the name of the 3rd parameter
//!     let third_value = &params[2].value; // the value of the 3rd parameter
//! ```
//!
//! ## How does it work?
//!
//! The matcher relies on a tree structure which makes heavy use of *common
//! prefixes*, it is basically a *compact* [*prefix tree*](https://en.wikipedia.org/wiki/Trie)
//! (or [*Radix tree*](https://en.wikipedia.org/wiki/Radix_tree)). Nodes
//! with a common prefix share a parent. Here is a short example what the
//! routing tree for the `GET` request method could look like:
//!
//! ```text
//! Priority   Path             Value
//! 9          \                *<1>
//! 3          ├s               None
//! 2          |├earch\         *<2>
//! 1          |└upport\        *<3>
//! 2          ├blog\           *<4>
//! 1          |    └:post      None
//! 1          |         └\     *<5>
//! 2          ├about-us\       *<6>
//! 1          |        └team\  *<7>
//! 1          └contact\        *<8>
//! ```
//!
//! Every `*<num>` represents the registered handler value. Following a
//! path through the tree from the root to a leaf reassembles the complete
//! route, e.g. `/blog/:post`.
//!
//! Since URL paths have a hierarchical structure and make use only of a
//! limited set of characters (byte values), it is very likely that there
//! are a lot of common prefixes. This allows us to easily reduce the
//! routing into ever smaller problems.
//!
//! For even better scalability, the child nodes on each tree level are
//! ordered by priority, where the priority is just the number of values
//! registered in sub nodes (children, grandchildren, and so on..). This
//! helps in two ways:
//!
//! 1. Nodes which are part of the most routing paths are evaluated first.
//!    This helps make as many routes as possible reachable as fast as
//!    possible.
//! 2. It acts as a cost compensation. The longest reachable path (highest
//!    cost) can always be evaluated first.
//!
//! ```text
//! ├------------
//! ├---------
//! ├-----
//! ├----
//! ├--
//! ├--
//! └-
//! ```

mod escape;
mod params;
mod router;
mod tree;
mod unescape;

pub use params::{Param, Params};
pub use router::{RouteMatch, Router};
pub use tree::{Node, RouteLookup, SkippedNode};
