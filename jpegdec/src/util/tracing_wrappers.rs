// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

// A local `macro_rules! warn` clashes with the built-in `#[warn]` attribute,
// so the no-op macros get their public names on import.
#[cfg(not(feature = "tracing"))]
mod noop {
    macro_rules! noop_debug {
        ($($t:tt)*) => {};
    }
    macro_rules! noop_trace {
        ($($t:tt)*) => {};
    }
    macro_rules! noop_warn {
        ($($t:tt)*) => {};
    }
    pub(crate) use {noop_debug, noop_trace, noop_warn};
}

#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub(crate) use noop::{noop_debug as debug, noop_trace as trace, noop_warn as warn};
