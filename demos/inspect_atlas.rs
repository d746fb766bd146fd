use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{bail, Context, Result};
use texatlas::{
    binary, texture_packer, Atlas, AtlasSet, DecodedImage, DirectoryResolver, ReaderSettings,
};

/// Prints the regions of an atlas descriptor.
///
/// `inspect_atlas <atlas.json|atlas.bin> [compiled.bin]`
///
/// Images are resolved relative to the descriptor. When a second path is
/// given, the first page is compiled into a binary atlas record.
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        bail!("usage: inspect_atlas <atlas.json|atlas.bin> [compiled.bin]");
    };
    let output = args.next();

    let input = Path::new(&input);
    let root = input.parent().unwrap_or_else(|| Path::new("."));
    let mut resolver = DirectoryResolver::new(root);
    let settings = ReaderSettings::default();

    let set = match input.extension().and_then(|e| e.to_str()) {
        Some("json") => texture_packer::load_atlas_file(input, &mut resolver, &settings)?,
        _ => {
            let mut set = AtlasSet::default();
            set.push(
                binary::load_atlas_file(input, &mut resolver, &settings)?,
                settings.duplicates,
            )?;
            set
        }
    };

    for atlas in set.pages() {
        print_atlas(atlas);
    }

    if let Some(output) = output {
        let atlas = set.pages().first().context("descriptor has no pages")?;
        let file = File::create(&output).with_context(|| format!("unable to create {output}"))?;
        binary::write_atlas(BufWriter::new(file), atlas, &settings)?;
        log::info!("compiled `{}` into {output}", atlas.image_name());
    }

    Ok(())
}

fn print_atlas(atlas: &Atlas<DecodedImage>) {
    let size = atlas.image().size;
    println!(
        "{} ({}x{}, {} regions)",
        atlas.image_name(),
        size.x,
        size.y,
        atlas.region_count()
    );

    for region in atlas.regions() {
        let rect = region.source_rect;
        print!(
            "  {:<32} {:>5} {:>5} {:>5} {:>5}",
            region.name, rect.x, rect.y, rect.w, rect.h
        );
        if region.rotated {
            print!(" rotated");
        }
        if region.is_trimmed() {
            print!(
                " trimmed {}x{} at {},{}",
                region.original_size.x, region.original_size.y, region.offset.x, region.offset.y
            );
        }
        if let Some(pivot) = region.pivot {
            print!(" pivot {:.2},{:.2}", pivot.x, pivot.y);
        }
        println!();
    }
}
