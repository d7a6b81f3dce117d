// SPDX-License-Identifier: MIT
//! Basic usage example for resource bundles

use std::io::Read;
use std::sync::Arc;

use resource_bundle::codegen::{generate_c_header, generate_c_source};
use resource_bundle::{
    BundleReader, BundleWriter, CodegenOptions, EntryOptions, Registry, StaticResource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Resource Bundle - Basic Usage ===\n");

    // Step 1: Build a bundle
    println!("1. Building bundle...");
    let stylesheet = b"window { background: #fafafa; }\n".repeat(20);
    let mut writer = BundleWriter::new();
    writer.add_resource("/org/example/app/ui/main.ui", b"<interface/>\n".to_vec())?;
    writer.add_resource_with_options(
        "/org/example/app/style.css",
        stylesheet.clone(),
        EntryOptions::compressed(),
    )?;
    let data = writer.finalize()?;
    println!("   Bundle: {} bytes", data.len());

    // Step 2: Inspect it
    println!("\n2. Reading bundle...");
    let reader = Arc::new(BundleReader::from_vec(data.clone())?);
    for path in reader.resource_paths() {
        let info = reader.get_info(&path)?;
        println!(
            "   {} ({} bytes{})",
            path,
            info.size,
            if info.is_compressed() { ", compressed" } else { "" }
        );
    }
    let stats = reader.stats();
    println!(
        "   {} files, {} directories, ratio {:.2}",
        stats.file_count,
        stats.directory_count,
        stats.compression_ratio()
    );

    // Step 3: Resolve through a registry
    println!("\n3. Registry lookups...");
    let registry = Registry::new();
    registry.register(Arc::clone(&reader));
    let mut css = String::new();
    registry
        .open_stream("/org/example/app/style.css")?
        .read_to_string(&mut css)?;
    assert_eq!(css.as_bytes(), &stylesheet[..]);
    println!("   /org/example/app/ -> {:?}", registry.enumerate_children("/org/example/app/")?);
    registry.unregister(&reader);

    // Step 4: Embedded data with explicit registration
    println!("\n4. Static resource...");
    let embedded: &'static [u8] = Box::leak(data.clone().into_boxed_slice());
    let resource: &'static StaticResource = Box::leak(Box::new(StaticResource::new(embedded)));
    resource.init()?;
    let ui = resource_bundle::registry::lookup_data("/org/example/app/ui/main.ui")?;
    println!("   main.ui: {:?}", String::from_utf8_lossy(&ui));
    resource.fini();

    // Step 5: Generate C
    println!("\n5. Generating C...");
    let options = CodegenOptions::new("example")?;
    let source = generate_c_source(&data, &options);
    let header = generate_c_header(&options);
    println!("   example.c: {} lines", source.lines().count());
    println!("   example.h: {} lines", header.lines().count());

    println!("\n=== Done ===");
    Ok(())
}
