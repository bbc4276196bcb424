use anyhow::Result;
use clap::Parser;
use icon_render::icon_gen::{self, Args};

fn main() -> Result<()> {
    let args = Args::parse();

    icon_gen::generate_icons(args)
}
