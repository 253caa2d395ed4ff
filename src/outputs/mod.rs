//! Output writers for finished brief payloads.
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── technology-usa-morning.json
//!     └── politics-global-evening.json
//! ```

pub mod json;
