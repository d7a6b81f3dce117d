// SPDX-License-Identifier: MIT
//! Rust module embedding a bundle
//!
//! The generated items only use absolute paths so the output can be pulled in
//! with `include!` anywhere in a crate that depends on `resource_bundle`.

use super::CodegenOptions;

const BYTES_PER_ROW: usize = 12;

/// Generate a Rust module for `data`
///
/// With `external_data` the bytes are read at compile time from
/// `<c_name>.gresource` next to the generated file.
pub fn generate_rust_source(data: &[u8], options: &CodegenOptions) -> String {
    let c_name = &options.c_name;
    let upper = c_name.to_ascii_uppercase();
    let vis = if options.internal { "pub(crate)" } else { "pub" };

    let mut out = String::with_capacity(data.len() * 6 + 1024);
    out.push_str("// Generated by resource-compiler. Do not edit.\n\n");

    if options.external_data {
        out.push_str(&format!(
            "static {upper}_RESOURCE_DATA: &[u8] = include_bytes!(\"{c_name}.gresource\");\n"
        ));
    } else {
        out.push_str(&format!(
            "static {upper}_RESOURCE_DATA: [u8; {}] = [\n",
            data.len()
        ));
        for row in data.chunks(BYTES_PER_ROW) {
            out.push_str("   ");
            for byte in row {
                out.push_str(&format!(" 0x{:02x},", byte));
            }
            out.push('\n');
        }
        out.push_str("];\n");
    }

    out.push_str(&format!(
        "\n{vis} static {upper}_RESOURCE: ::resource_bundle::StaticResource =\n    \
         ::resource_bundle::StaticResource::new(&{upper}_RESOURCE_DATA);\n\
         \n\
         {vis} fn {c_name}_get_resource() -> ::std::result::Result<::std::sync::Arc<::resource_bundle::BundleReader>, ::resource_bundle::ReadError> {{\n    \
         {upper}_RESOURCE.get_resource()\n\
         }}\n\
         \n\
         {vis} fn {c_name}_register_resource() -> ::std::result::Result<(), ::resource_bundle::ReadError> {{\n    \
         {upper}_RESOURCE.init()\n\
         }}\n\
         \n\
         {vis} fn {c_name}_unregister_resource() {{\n    \
         {upper}_RESOURCE.fini()\n\
         }}\n"
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_data() {
        let source = generate_rust_source(&[0x47, 0x56, 0xff], &CodegenOptions::new("app").unwrap());
        assert!(source.contains("static APP_RESOURCE_DATA: [u8; 3] = [\n    0x47, 0x56, 0xff,\n];\n"));
        assert!(source.contains("pub static APP_RESOURCE: ::resource_bundle::StaticResource"));
        assert!(source.contains("pub fn app_get_resource() -> "));
        assert!(source.contains("pub fn app_register_resource()"));
        assert!(source.contains("pub fn app_unregister_resource()"));
    }

    #[test]
    fn test_rows_wrap() {
        let source = generate_rust_source(&[0; 13], &CodegenOptions::new("app").unwrap());
        let rows: Vec<&str> = source.lines().filter(|l| l.starts_with("    0x")).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], "    0x00,");
    }

    #[test]
    fn test_internal_external() {
        let mut options = CodegenOptions::new("app").unwrap();
        options.internal = true;
        options.external_data = true;
        let source = generate_rust_source(&[1, 2, 3], &options);
        assert!(source.contains("include_bytes!(\"app.gresource\")"));
        assert!(source.contains("pub(crate) fn app_get_resource() -> "));
        assert!(!source.contains("0x01"));
    }
}
