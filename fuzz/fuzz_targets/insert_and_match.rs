#![no_main]
use libfuzzer_sys::fuzz_target;

use routetree::{Node, Params};
use std::panic::{self, AssertUnwindSafe};

fuzz_target!(|data: (Vec<(String, i32)>, String)| {
  let mut tree = Node::new();

  for (route, item) in data.0 {
    // registration aborts on pattern errors and conflicts; skip those seeds
    if panic::catch_unwind(AssertUnwindSafe(|| tree.add_route(&route, item))).is_err() {
      return;
    }
  }

  let mut params = Params::new();
  let mut skipped = Vec::new();
  let _ = tree.get_value(&data.1, &mut params, &mut skipped, true);
});
