//! Render a command string (argument or stdin) to SVG on stdout.
//!
//! `cargo run --example render --features tracing -- "ZoomIn(-5,5,-5,5);f(x)=x^2-4"`

use std::io::Read;

use graphpaper::{ParseOptions, RenderOptions, render_command};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let input = match std::env::args().nth(1) {
        Some(command) => command,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| miette::miette!("failed to read stdin: {e}"))?;
            buf
        }
    };

    let svg = render_command(
        input.trim(),
        &ParseOptions::default(),
        &RenderOptions::default(),
    )?;
    println!("{svg}");
    Ok(())
}
