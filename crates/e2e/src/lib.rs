//! Coffee Cart Scenario Framework
//!
//! Plays declarative YAML scenarios against in-process storefront
//! sessions, the same way a browser suite would click through the site.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Scenario Runner                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── load specs from tests/specs                          │
//! │    ├── StorefrontDriver::new(config) -> fresh session       │
//! │    └── execute_step(step) -> StepResult                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestSpec (YAML)                                            │
//! │    ├── name, description, tags, config?                     │
//! │    └── steps: [Step]                                        │
//! │          ├── activate { item, times? }                      │
//! │          ├── accept_promotion / discard_promotion           │
//! │          ├── hover / open_checkout / submit { ... }         │
//! │          ├── sleep { ms }                                   │
//! │          └── assert { total?, lines?, preview?, ... }       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod driver;
pub mod error;
pub mod runner;
pub mod spec;

pub use cli::HarnessArgs;
pub use driver::{StepResult, StorefrontDriver};
pub use error::{E2eError, E2eResult};
pub use runner::TestRunner;
pub use spec::{TestSpec, TestStep};
