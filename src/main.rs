//! # bird-scrambler CLI
//!
//! Command-line interface for the bird scrambler.
//!
//! ## Usage
//! ```bash
//! bird-scrambler run --source ~/birdmash/images --archive ~/birdmash/used_images
//! bird-scrambler check ~/birdmash/images/robin.jpg
//! bird-scrambler scramble robin.jpg robin_scrambled.jpg --difficulty birder
//! ```

mod cli;

use bird_scrambler::Result;

fn main() -> Result<()> {
    bird_scrambler::init_tracing()?;
    cli::run()
}
