// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod catalog;
pub mod detail;
pub mod ids;
pub mod nav;
pub mod search;
pub mod state;

pub use catalog::*;
pub use detail::*;
pub use ids::*;
pub use nav::*;
pub use search::*;
pub use state::*;
