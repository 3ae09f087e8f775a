//! # Voxel Terrain Demo
//!
//! Streams terrain around a walking observer without a window, logging what was
//! generated. It simply calls into the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    match voxel_terrain::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
